use std::fmt;

use newton_ir::NodeKind;
use newton_physics::PhysicsError;
use newton_shared::{
    error::{AsNewtonError, Context, ErrorLocation},
    span::Span,
};
use newton_symbol_table::SymbolTableError;

/// A structural error that aborts a check
///
/// These errors mean the tree or the bindings do not have the shape the
/// grammar guarantees. Value and dimension mismatches are never errors;
/// they are recorded in the report instead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckError {
    /// A child that the grammar guarantees is missing
    MissingNode {
        /// What was expected
        expected: &'static str,
        /// The span of the parent node
        span: Option<Span>,
    },
    /// A node of an unexpected kind was found
    UnexpectedNode {
        /// The kind that was found
        kind: NodeKind,
        /// The span of the node
        span: Option<Span>,
    },
    /// A constraint has no comparison operator
    MissingComparisonOperator {
        /// The span of the constraint
        span: Option<Span>,
    },
    /// The bindings hold no parameter for an identifier of the invariant
    UnboundParameter {
        /// The identifier in the constraint
        identifier: String,
        /// The number of the parameter
        parameter_number: usize,
        /// The subindex of the parameter
        subindex: usize,
        /// The span of the identifier
        span: Option<Span>,
    },
    /// An identifier names no visible signal, unit or constant
    UnresolvedIdentifier {
        /// The identifier
        identifier: String,
        /// The span of the identifier
        span: Option<Span>,
    },
    /// A concrete zero was raised to a zero exponent
    ZeroToZeroPower {
        /// The span of the factor
        span: Option<Span>,
    },
    /// A term multiplies two vector quantities
    VectorProduct {
        /// The span of the term
        span: Option<Span>,
    },
    /// A symbol table lookup failed
    Symbol(SymbolTableError),
    /// Exponent arithmetic failed
    Physics(PhysicsError),
}

impl CheckError {
    /// Creates a new error indicating that a required child is missing
    #[must_use]
    pub const fn missing_node(expected: &'static str, span: Option<Span>) -> Self {
        Self::MissingNode { expected, span }
    }

    /// Creates a new error indicating that a node has an unexpected kind
    #[must_use]
    pub const fn unexpected_node(kind: NodeKind, span: Option<Span>) -> Self {
        Self::UnexpectedNode { kind, span }
    }

    /// Creates a new error indicating that a constraint has no comparison operator
    #[must_use]
    pub const fn missing_comparison_operator(span: Option<Span>) -> Self {
        Self::MissingComparisonOperator { span }
    }

    /// Creates a new error indicating that a parameter has no binding
    #[must_use]
    pub const fn unbound_parameter(
        identifier: String,
        parameter_number: usize,
        subindex: usize,
        span: Option<Span>,
    ) -> Self {
        Self::UnboundParameter {
            identifier,
            parameter_number,
            subindex,
            span,
        }
    }

    /// Creates a new error indicating that an identifier could not be resolved
    #[must_use]
    pub const fn unresolved_identifier(identifier: String, span: Option<Span>) -> Self {
        Self::UnresolvedIdentifier { identifier, span }
    }

    /// Creates a new error indicating that zero was raised to a zero exponent
    #[must_use]
    pub const fn zero_to_zero_power(span: Option<Span>) -> Self {
        Self::ZeroToZeroPower { span }
    }

    /// Creates a new error indicating that a term multiplies two vectors
    #[must_use]
    pub const fn vector_product(span: Option<Span>) -> Self {
        Self::VectorProduct { span }
    }

    const fn span(&self) -> Option<Span> {
        match self {
            Self::MissingNode { span, .. }
            | Self::UnexpectedNode { span, .. }
            | Self::MissingComparisonOperator { span }
            | Self::UnboundParameter { span, .. }
            | Self::UnresolvedIdentifier { span, .. }
            | Self::ZeroToZeroPower { span }
            | Self::VectorProduct { span } => *span,
            Self::Symbol(_) | Self::Physics(_) => None,
        }
    }
}

impl From<SymbolTableError> for CheckError {
    fn from(error: SymbolTableError) -> Self {
        Self::Symbol(error)
    }
}

impl From<PhysicsError> for CheckError {
    fn from(error: PhysicsError) -> Self {
        Self::Physics(error)
    }
}

impl fmt::Display for CheckError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingNode { expected, .. } => write!(f, "expected {expected}"),
            Self::UnexpectedNode { kind, .. } => write!(f, "unexpected {kind}"),
            Self::MissingComparisonOperator { .. } => {
                write!(f, "constraint has no comparison operator")
            }
            Self::UnboundParameter {
                identifier,
                parameter_number,
                subindex,
                ..
            } => write!(
                f,
                "no binding for `{identifier}` (parameter {parameter_number}, subindex {subindex})"
            ),
            Self::UnresolvedIdentifier { identifier, .. } => {
                write!(f, "`{identifier}` is not a known signal, unit or constant")
            }
            Self::ZeroToZeroPower { .. } => write!(f, "zero raised to the power of zero"),
            Self::VectorProduct { .. } => {
                write!(f, "a term cannot multiply two vector quantities")
            }
            Self::Symbol(error) => write!(f, "{error}"),
            Self::Physics(error) => write!(f, "{error}"),
        }
    }
}

impl std::error::Error for CheckError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Symbol(error) => Some(error),
            Self::Physics(error) => Some(error),
            Self::MissingNode { .. }
            | Self::UnexpectedNode { .. }
            | Self::MissingComparisonOperator { .. }
            | Self::UnboundParameter { .. }
            | Self::UnresolvedIdentifier { .. }
            | Self::ZeroToZeroPower { .. }
            | Self::VectorProduct { .. } => None,
        }
    }
}

impl AsNewtonError for CheckError {
    fn message(&self) -> String {
        self.to_string()
    }

    fn context(&self) -> Vec<Context> {
        match self {
            Self::UnboundParameter { .. } => vec![Context::Note(
                "the bindings do not match the parameter list of the invariant".to_string(),
            )],
            Self::MissingNode { .. }
            | Self::UnexpectedNode { .. }
            | Self::MissingComparisonOperator { .. } => vec![Context::Note(
                "the tree does not have the shape of a constraint".to_string(),
            )],
            Self::Symbol(error) => error.context(),
            Self::Physics(error) => error.context(),
            Self::UnresolvedIdentifier { .. }
            | Self::ZeroToZeroPower { .. }
            | Self::VectorProduct { .. } => vec![],
        }
    }

    fn error_location(&self, source: &str) -> Option<ErrorLocation> {
        match self {
            Self::Symbol(error) => error.error_location(source),
            Self::MissingNode { .. }
            | Self::UnexpectedNode { .. }
            | Self::MissingComparisonOperator { .. }
            | Self::UnboundParameter { .. }
            | Self::UnresolvedIdentifier { .. }
            | Self::ZeroToZeroPower { .. }
            | Self::VectorProduct { .. }
            | Self::Physics(_) => self
                .span()
                .map(|span| ErrorLocation::from_source_and_span(source, span)),
        }
    }
}
