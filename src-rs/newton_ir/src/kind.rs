use std::fmt;

/// The grammar category of an IR node
///
/// Productions (`Constraint`, `QuantityExpression`, ...) group other nodes.
/// Terminals are leaves or operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    /// A list of constraints
    ConstraintList,
    /// A single `lhs <op> rhs` constraint
    Constraint,
    /// A sum or difference of terms
    QuantityExpression,
    /// A product or quotient of factors
    QuantityTerm,
    /// An operand with optional exponents
    QuantityFactor,
    /// A list of parameters
    ParameterList,
    /// A formal parameter or a parameter binding
    Parameter,
    /// An identifier leaf
    Identifier,
    /// A numeric literal leaf
    NumericConst,
    /// `+`
    Plus,
    /// binary `-`
    Minus,
    /// `*`
    Mul,
    /// `/`
    Div,
    /// `**`
    Exponent,
    /// unary `-`
    Negate,
    /// `<`
    Lt,
    /// `<=`
    Le,
    /// `>`
    Gt,
    /// `>=`
    Ge,
    /// `==`
    Equivalent,
    /// `~`
    Proportional,
    /// `=`
    Equals,
    /// A link in a chain of siblings
    Sequence,
}

impl NodeKind {
    /// Returns the nesting level of a production
    ///
    /// Lower levels are closer to the root. Terminals and sequence links
    /// have no level.
    #[must_use]
    pub const fn level(self) -> Option<u8> {
        match self {
            Self::ConstraintList | Self::ParameterList => Some(0),
            Self::Constraint | Self::Parameter => Some(1),
            Self::QuantityExpression => Some(2),
            Self::QuantityTerm => Some(3),
            Self::QuantityFactor => Some(4),
            Self::Identifier
            | Self::NumericConst
            | Self::Plus
            | Self::Minus
            | Self::Mul
            | Self::Div
            | Self::Exponent
            | Self::Negate
            | Self::Lt
            | Self::Le
            | Self::Gt
            | Self::Ge
            | Self::Equivalent
            | Self::Proportional
            | Self::Equals
            | Self::Sequence => None,
        }
    }

    /// Returns the source text of an operator
    #[must_use]
    pub const fn symbol(self) -> Option<&'static str> {
        match self {
            Self::Plus => Some("+"),
            Self::Minus | Self::Negate => Some("-"),
            Self::Mul => Some("*"),
            Self::Div => Some("/"),
            Self::Exponent => Some("**"),
            Self::Lt => Some("<"),
            Self::Le => Some("<="),
            Self::Gt => Some(">"),
            Self::Ge => Some(">="),
            Self::Equivalent => Some("=="),
            Self::Proportional => Some("~"),
            Self::Equals => Some("="),
            Self::ConstraintList
            | Self::Constraint
            | Self::QuantityExpression
            | Self::QuantityTerm
            | Self::QuantityFactor
            | Self::ParameterList
            | Self::Parameter
            | Self::Identifier
            | Self::NumericConst
            | Self::Sequence => None,
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::ConstraintList => "constraint list",
            Self::Constraint => "constraint",
            Self::QuantityExpression => "quantity expression",
            Self::QuantityTerm => "quantity term",
            Self::QuantityFactor => "quantity factor",
            Self::ParameterList => "parameter list",
            Self::Parameter => "parameter",
            Self::Identifier => "identifier",
            Self::NumericConst => "numeric constant",
            Self::Sequence => "sequence",
            Self::Plus
            | Self::Minus
            | Self::Mul
            | Self::Div
            | Self::Exponent
            | Self::Negate
            | Self::Lt
            | Self::Le
            | Self::Gt
            | Self::Ge
            | Self::Equivalent
            | Self::Proportional
            | Self::Equals => return write!(f, "`{}`", self.symbol().unwrap_or_default()),
        };

        write!(f, "{name}")
    }
}

/// A grammar production identified by the node kinds that can start it
///
/// Operator productions are collapsed into their operator terminals in the
/// tree, so the locator matches them by their first set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Production {
    /// `<`, `<=`, `>`, `>=`, `==` or `~`
    CompareOp,
    /// A comparison operator or an assignment `=`
    CompareOrAssignOp,
    /// `+` or `-`
    LowPrecedenceBinaryOp,
    /// `*` or `/`
    MidPrecedenceBinaryOp,
    /// `**`
    HighPrecedenceBinaryOp,
    /// unary `-`
    UnaryOp,
}

impl Production {
    /// Returns the node kinds that can start the production
    #[must_use]
    pub const fn first_set(self) -> &'static [NodeKind] {
        match self {
            Self::CompareOp => &[
                NodeKind::Lt,
                NodeKind::Le,
                NodeKind::Gt,
                NodeKind::Ge,
                NodeKind::Equivalent,
                NodeKind::Proportional,
            ],
            Self::CompareOrAssignOp => &[
                NodeKind::Lt,
                NodeKind::Le,
                NodeKind::Gt,
                NodeKind::Ge,
                NodeKind::Equivalent,
                NodeKind::Proportional,
                NodeKind::Equals,
            ],
            Self::LowPrecedenceBinaryOp => &[NodeKind::Plus, NodeKind::Minus],
            Self::MidPrecedenceBinaryOp => &[NodeKind::Mul, NodeKind::Div],
            Self::HighPrecedenceBinaryOp => &[NodeKind::Exponent],
            Self::UnaryOp => &[NodeKind::Negate],
        }
    }

    /// Checks if `kind` can start the production
    #[must_use]
    pub fn contains(self, kind: NodeKind) -> bool {
        self.first_set().contains(&kind)
    }
}

impl fmt::Display for Production {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CompareOp => write!(f, "comparison operator"),
            Self::CompareOrAssignOp => write!(f, "comparison or assignment operator"),
            Self::LowPrecedenceBinaryOp => write!(f, "low precedence binary operator"),
            Self::MidPrecedenceBinaryOp => write!(f, "mid precedence binary operator"),
            Self::HighPrecedenceBinaryOp => write!(f, "high precedence binary operator"),
            Self::UnaryOp => write!(f, "unary operator"),
        }
    }
}
