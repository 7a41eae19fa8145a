//! The value and dimension tracks over quantity expressions

use std::sync::Arc;

use newton_ir::{
    IrNode, NodeKind, Production,
    locator::{find_nth_of_production, find_nth_of_type},
    parameter::find_parameter_by_number_and_subindex,
};
use newton_physics::{Physics, is_dimensionless};
use newton_shared::scope::ScopeId;
use newton_symbol_table::SymbolTable;
use tracing::trace;

use crate::{error::CheckError, options::CheckOptions};

/// The result of evaluating part of an expression on both tracks
///
/// A `value` of `None` means no concrete value reached this node. A
/// `physics` of `None` means the node is a plain number and is
/// dimensionless.
#[derive(Debug, Clone)]
pub struct Quantity {
    pub value: Option<f64>,
    pub physics: Option<Arc<Physics>>,
    pub is_vector: bool,
    pub trace: String,
}

impl Quantity {
    const fn new(value: Option<f64>, physics: Option<Arc<Physics>>, trace: String) -> Self {
        Self {
            value,
            physics,
            is_vector: false,
            trace,
        }
    }

    pub fn physics(&self) -> Option<&Physics> {
        self.physics.as_deref()
    }

    /// Returns the value used in comparisons, where an unresolved value is 0
    pub fn comparable_value(&self) -> f64 {
        self.value.unwrap_or(0.0)
    }
}

/// Walks quantity expressions against a symbol table and optional bindings
///
/// Semantic failures found below the comparison (mismatched `+` operands,
/// exponents with dimensions, division by zero) are collected and turned
/// into report messages by the caller.
pub struct Evaluator<'a> {
    table: &'a SymbolTable,
    scope: ScopeId,
    bindings: Option<&'a IrNode>,
    options: CheckOptions,
    value_failures: Vec<String>,
    dimension_failures: Vec<String>,
}

impl<'a> Evaluator<'a> {
    pub const fn new(
        table: &'a SymbolTable,
        scope: ScopeId,
        bindings: Option<&'a IrNode>,
        options: CheckOptions,
    ) -> Self {
        Self {
            table,
            scope,
            bindings,
            options,
            value_failures: Vec::new(),
            dimension_failures: Vec::new(),
        }
    }

    pub const fn precision(&self) -> usize {
        self.options.trace_precision()
    }

    /// Takes the failures collected since the last call
    pub fn take_failures(&mut self) -> (Vec<String>, Vec<String>) {
        (
            std::mem::take(&mut self.value_failures),
            std::mem::take(&mut self.dimension_failures),
        )
    }

    /// Evaluates `term (+|- term)*`
    pub fn expression(&mut self, expression: &IrNode) -> Result<Quantity, CheckError> {
        let first = find_nth_of_type(expression, NodeKind::QuantityTerm, 0)
            .ok_or(CheckError::missing_node("a quantity term", expression.span()))?;
        let mut result = self.term(first)?;

        for index in 1.. {
            let Some(term) = find_nth_of_type(expression, NodeKind::QuantityTerm, index) else {
                break;
            };
            let op = find_nth_of_production(expression, Production::LowPrecedenceBinaryOp, index - 1)
                .ok_or(CheckError::missing_node("`+` or `-`", expression.span()))?;
            let right = self.term(term)?;

            result = self.add_or_subtract(result, op.kind(), right);
        }

        Ok(result)
    }

    fn add_or_subtract(&mut self, left: Quantity, op: NodeKind, right: Quantity) -> Quantity {
        let symbol = op.symbol().unwrap_or_default();

        if !newton_physics::are_equivalent(left.physics(), right.physics()) {
            self.dimension_failures.push(format!(
                "dimensions of {} and {} do not match in `{symbol}`",
                left.trace, right.trace
            ));
        }

        let value = match (left.value, right.value) {
            (None, None) => None,
            (Some(left), None) => Some(left),
            (None, Some(right)) if op == NodeKind::Minus => Some(-right),
            (None, Some(right)) => Some(right),
            (Some(left), Some(right)) if op == NodeKind::Minus => Some(left - right),
            (Some(left), Some(right)) => Some(left + right),
        };

        Quantity {
            value,
            physics: left.physics,
            is_vector: left.is_vector || right.is_vector,
            trace: format!("{}{symbol}{}", left.trace, right.trace),
        }
    }

    /// Evaluates `[-] factor (*|/ factor)*`
    ///
    /// Unset factors count as 1. A term without any concrete factor stays
    /// unset.
    pub fn term(&mut self, term: &IrNode) -> Result<Quantity, CheckError> {
        let first = find_nth_of_type(term, NodeKind::QuantityFactor, 0)
            .ok_or(CheckError::missing_node("a quantity factor", term.span()))?;
        let mut result = self.factor(first)?;

        for index in 1.. {
            let Some(factor) = find_nth_of_type(term, NodeKind::QuantityFactor, index) else {
                break;
            };
            let op = find_nth_of_production(term, Production::MidPrecedenceBinaryOp, index - 1)
                .ok_or(CheckError::missing_node("`*` or `/`", term.span()))?;
            let right = self.factor(factor)?;

            if result.is_vector && right.is_vector {
                return Err(CheckError::vector_product(term.span()));
            }

            result = self.multiply_or_divide(result, op.kind(), right)?;
        }

        if find_nth_of_production(term, Production::UnaryOp, 0).is_some() {
            result.value = result.value.map(|value| -value);
            result.trace = format!("-{}", result.trace);
        }

        Ok(result)
    }

    fn multiply_or_divide(
        &mut self,
        left: Quantity,
        op: NodeKind,
        right: Quantity,
    ) -> Result<Quantity, CheckError> {
        let divide = op == NodeKind::Div;
        let symbol = op.symbol().unwrap_or_default();
        let trace = format!("{}{symbol}{}", left.trace, right.trace);

        if divide && right.value == Some(0.0) {
            self.value_failures.push(format!("division by zero in {trace}"));
        }

        let value = match (left.value, right.value) {
            (value, None) => value,
            (None, Some(right)) if divide => Some(right.recip()),
            (None, Some(right)) => Some(right),
            (Some(left), Some(right)) if divide => Some(left / right),
            (Some(left), Some(right)) => Some(left * right),
        };

        let physics = match (left.physics, right.physics) {
            (physics, None) => physics,
            (None, Some(mut other)) => {
                if divide {
                    Arc::make_mut(&mut other).multiply_exponents(-1.0);
                }
                Some(other)
            }
            (Some(mut combined), Some(other)) => {
                let physics = Arc::make_mut(&mut combined);
                if divide {
                    physics.subtract_exponents(&other)?;
                } else {
                    physics.add_exponents(&other)?;
                }
                Some(combined)
            }
        };

        Ok(Quantity {
            value,
            physics,
            is_vector: left.is_vector || right.is_vector,
            trace,
        })
    }

    /// Evaluates `operand (** exponent)*`
    pub fn factor(&mut self, factor: &IrNode) -> Result<Quantity, CheckError> {
        let operand = factor
            .left()
            .ok_or(CheckError::missing_node("an operand", factor.span()))?;
        let mut result = self.operand(operand)?;

        for index in 0.. {
            let Some(op) = find_nth_of_production(factor, Production::HighPrecedenceBinaryOp, index)
            else {
                break;
            };
            let exponent = find_nth_of_type(op, NodeKind::QuantityExpression, 0)
                .ok_or(CheckError::missing_node("an exponent", factor.span()))?;
            let exponent = self.expression(exponent)?;

            result = self.power(result, exponent, factor)?;
        }

        Ok(result)
    }

    fn power(
        &mut self,
        mut base: Quantity,
        exponent: Quantity,
        factor: &IrNode,
    ) -> Result<Quantity, CheckError> {
        if !is_dimensionless(exponent.physics()) {
            self.dimension_failures.push(format!(
                "exponent {} of {} is not dimensionless",
                exponent.trace, base.trace
            ));
        }

        if base.value == Some(0.0) && exponent.value == Some(0.0) {
            return Err(CheckError::zero_to_zero_power(factor.span()));
        }

        // an unset exponent leaves the base unchanged but unset
        match exponent.value {
            Some(power) => {
                base.value = base.value.map(|value| value.powf(power));
                if let Some(physics) = base.physics.as_mut() {
                    Arc::make_mut(physics).multiply_exponents(power);
                }
            }
            None => base.value = None,
        }

        base.trace = format!("{}**({})", base.trace, exponent.trace);
        Ok(base)
    }

    fn operand(&mut self, operand: &IrNode) -> Result<Quantity, CheckError> {
        match operand.kind() {
            NodeKind::Identifier => self.identifier(operand),
            NodeKind::NumericConst => {
                let value = operand
                    .value()
                    .ok_or(CheckError::missing_node("a numeric value", operand.span()))?;
                let trace = format!(" {value:.precision$} ", precision = self.precision());

                Ok(Quantity::new(Some(value), None, trace))
            }
            NodeKind::QuantityExpression => {
                let mut inner = self.expression(operand)?;
                inner.trace = format!("({})", inner.trace);
                Ok(inner)
            }
            kind @ (NodeKind::ConstraintList
            | NodeKind::Constraint
            | NodeKind::QuantityTerm
            | NodeKind::QuantityFactor
            | NodeKind::ParameterList
            | NodeKind::Parameter
            | NodeKind::Plus
            | NodeKind::Minus
            | NodeKind::Mul
            | NodeKind::Div
            | NodeKind::Exponent
            | NodeKind::Negate
            | NodeKind::Lt
            | NodeKind::Le
            | NodeKind::Gt
            | NodeKind::Ge
            | NodeKind::Equivalent
            | NodeKind::Proportional
            | NodeKind::Equals
            | NodeKind::Sequence) => Err(CheckError::unexpected_node(kind, operand.span())),
        }
    }

    fn identifier(&self, node: &IrNode) -> Result<Quantity, CheckError> {
        let name = node
            .token()
            .ok_or(CheckError::missing_node("an identifier", node.span()))?;

        let physics = self
            .resolve(node, name)
            .ok_or_else(|| CheckError::unresolved_identifier(name.to_string(), node.span()))?;

        let (value, physics) = match node.parameter_number() {
            Some(number) if !physics.is_constant && !self.is_unit_name(name) => {
                self.bound_value(node, name, number, physics)?
            }
            _ if physics.is_constant => (physics.value, physics),
            _ => (None, physics),
        };

        trace!(identifier = name, value, physics = %physics, "identifier resolved");

        let trace = if self.table.dimension_for_name(self.scope, name).is_some() {
            format!(" {name} ")
        } else {
            match value {
                Some(value) => {
                    format!(" ({name} : {value:.precision$}) ", precision = self.precision())
                }
                None => format!(" ({name} : unset) "),
            }
        };

        Ok(Quantity {
            value,
            is_vector: physics.is_vector,
            physics: Some(physics),
            trace,
        })
    }

    fn resolve(&self, node: &IrNode, name: &str) -> Option<Arc<Physics>> {
        if let Some(physics) = node.physics() {
            return Some(Arc::clone(physics));
        }

        node.subindex()
            .and_then(|subindex| {
                self.table
                    .physics_for_identifier_and_subindex(self.scope, name, subindex)
            })
            .or_else(|| self.table.resolve_physics(self.scope, name))
            .map(Arc::clone)
    }

    fn is_unit_name(&self, name: &str) -> bool {
        self.table
            .physics_for_dimension_alias(ScopeId::ROOT, name)
            .or_else(|| {
                self.table
                    .physics_for_dimension_alias_abbreviation(ScopeId::ROOT, name)
            })
            .is_some()
    }

    fn bound_value(
        &self,
        node: &IrNode,
        name: &str,
        number: usize,
        physics: Arc<Physics>,
    ) -> Result<(Option<f64>, Arc<Physics>), CheckError> {
        let Some(bindings) = self.bindings else {
            return Ok((None, physics));
        };

        let subindex = physics.subindex;
        let binding = find_parameter_by_number_and_subindex(bindings, number, subindex)
            .ok_or_else(|| {
                CheckError::unbound_parameter(name.to_string(), number, subindex, node.span())
            })?;

        trace!(identifier = name, number, subindex, value = binding.value(), "binding found");

        let physics = binding.physics().map_or(physics, Arc::clone);
        Ok((binding.value(), physics))
    }
}

#[cfg(test)]
mod tests {
    use newton_ir::build;
    use newton_symbol_table::{BaseSignal, Derivation};

    use super::*;

    fn table() -> SymbolTable {
        let mut table = SymbolTable::new();
        for (identifier, name, symbol) in [("time", "second", "s"), ("distance", "meter", "m")] {
            table
                .declare_base_signal(
                    ScopeId::ROOT,
                    BaseSignal::new(identifier, Derivation::None)
                        .with_name(name)
                        .with_symbol(symbol),
                )
                .expect("base signal should be declared");
        }
        table
    }

    fn number(value: f64) -> IrNode {
        build::factor(IrNode::numeric_const(value), [])
    }

    fn name(identifier: &str) -> IrNode {
        build::factor(IrNode::identifier(identifier), [])
    }

    fn single(factor: IrNode) -> IrNode {
        build::expression(build::term(false, factor, []), [])
    }

    #[test]
    fn term_without_concrete_factor_is_unset() {
        // time * distance, neither bound
        let table = table();
        let mut evaluator = Evaluator::new(&table, ScopeId::ROOT, None, CheckOptions::new());
        let term = build::term(false, name("time"), [(NodeKind::Mul, name("distance"))]);

        let Ok(result) = evaluator.term(&term) else {
            panic!("expected the term to evaluate");
        };

        assert_eq!(result.value, None);
        assert_eq!(result.comparable_value(), 0.0);
        let Some(physics) = result.physics() else {
            panic!("expected dimensions");
        };
        assert_eq!(physics.dimensions.exponent_of("second"), Some(1.0));
        assert_eq!(physics.dimensions.exponent_of("meter"), Some(1.0));
    }

    #[test]
    fn unset_factor_counts_as_one() {
        // 3 * time / 2
        let table = table();
        let mut evaluator = Evaluator::new(&table, ScopeId::ROOT, None, CheckOptions::new());
        let term = build::term(
            false,
            number(3.0),
            [(NodeKind::Mul, name("time")), (NodeKind::Div, number(2.0))],
        );

        let Ok(result) = evaluator.term(&term) else {
            panic!("expected the term to evaluate");
        };

        assert_eq!(result.value, Some(1.5));
    }

    #[test]
    fn unary_minus_negates_value() {
        let table = table();
        let mut evaluator = Evaluator::new(&table, ScopeId::ROOT, None, CheckOptions::new());
        let term = build::term(true, number(4.0), []);

        let Ok(result) = evaluator.term(&term) else {
            panic!("expected the term to evaluate");
        };

        assert_eq!(result.value, Some(-4.0));
        assert!(result.trace.starts_with('-'));
    }

    #[test]
    fn expression_keeps_unset_terms_out_of_the_sum() {
        // 2 + time - 5
        let table = table();
        let mut evaluator = Evaluator::new(&table, ScopeId::ROOT, None, CheckOptions::new());
        let expression = build::expression(
            build::term(false, number(2.0), []),
            [
                (NodeKind::Plus, build::term(false, name("time"), [])),
                (NodeKind::Minus, build::term(false, number(5.0), [])),
            ],
        );

        let Ok(result) = evaluator.expression(&expression) else {
            panic!("expected the expression to evaluate");
        };

        assert_eq!(result.value, Some(-3.0));
        // `2 + time` mixes a number with a time
        let (values, dimensions) = evaluator.take_failures();
        assert!(values.is_empty());
        assert_eq!(dimensions.len(), 1);
    }

    #[test]
    fn fractional_exponent_scales_dimensions() {
        // time ** 0.5
        let table = table();
        let mut evaluator = Evaluator::new(&table, ScopeId::ROOT, None, CheckOptions::new());
        let factor = build::factor(IrNode::identifier("time"), [single(number(0.5))]);

        let Ok(result) = evaluator.factor(&factor) else {
            panic!("expected the factor to evaluate");
        };

        let Some(physics) = result.physics() else {
            panic!("expected dimensions");
        };
        assert_eq!(physics.dimensions.exponent_of("second"), Some(0.5));
        assert_eq!(result.trace, " (time : unset) **( 0.500000 )");
    }

    #[test]
    fn exponent_with_dimensions_is_reported() {
        // 2 ** time
        let table = table();
        let mut evaluator = Evaluator::new(&table, ScopeId::ROOT, None, CheckOptions::new());
        let factor = build::factor(IrNode::numeric_const(2.0), [single(name("time"))]);

        assert!(evaluator.factor(&factor).is_ok());

        let (_, dimensions) = evaluator.take_failures();
        assert_eq!(dimensions.len(), 1);
    }

    #[test]
    fn zero_to_zero_is_fatal() {
        let table = table();
        let mut evaluator = Evaluator::new(&table, ScopeId::ROOT, None, CheckOptions::new());
        let factor = build::factor(IrNode::numeric_const(0.0), [single(number(0.0))]);

        let result = evaluator.factor(&factor);

        assert_eq!(result.map(|_| ()), Err(CheckError::zero_to_zero_power(None)));
    }

    #[test]
    fn division_by_zero_is_reported() {
        let table = table();
        let mut evaluator = Evaluator::new(&table, ScopeId::ROOT, None, CheckOptions::new());
        let term = build::term(false, number(1.0), [(NodeKind::Div, number(0.0))]);

        let Ok(result) = evaluator.term(&term) else {
            panic!("expected the term to evaluate");
        };

        assert_eq!(result.value, Some(f64::INFINITY));
        let (values, _) = evaluator.take_failures();
        assert_eq!(values.len(), 1);
    }

    #[test]
    fn two_vector_factors_are_fatal() {
        let mut table = table();
        let velocity = table
            .init_physics("velocity", ScopeId::ROOT)
            .with_id(97)
            .as_vector();
        table
            .publish_physics(ScopeId::ROOT, velocity, None)
            .expect("velocity should be published");

        let mut evaluator = Evaluator::new(&table, ScopeId::ROOT, None, CheckOptions::new());
        let term = build::term(false, name("velocity"), [(NodeKind::Mul, name("velocity"))]);

        let result = evaluator.term(&term);

        assert_eq!(result.map(|_| ()), Err(CheckError::vector_product(None)));
    }

    #[test]
    fn unit_names_trace_without_value() {
        let table = table();
        let mut evaluator = Evaluator::new(&table, ScopeId::ROOT, None, CheckOptions::new());

        let Ok(result) = evaluator.factor(&name("meter")) else {
            panic!("expected `meter` to resolve");
        };

        assert_eq!(result.trace, " meter ");
    }

    #[test]
    fn unknown_identifier_is_fatal() {
        let table = table();
        let mut evaluator = Evaluator::new(&table, ScopeId::ROOT, None, CheckOptions::new());

        let result = evaluator.factor(&name("furlong"));

        assert_eq!(
            result.map(|_| ()),
            Err(CheckError::unresolved_identifier("furlong".to_string(), None))
        );
    }

    #[test]
    fn parenthesized_expression_is_one_operand() {
        // (1 + 2) * 3
        let table = table();
        let mut evaluator = Evaluator::new(&table, ScopeId::ROOT, None, CheckOptions::new());
        let inner = build::expression(
            build::term(false, number(1.0), []),
            [(NodeKind::Plus, build::term(false, number(2.0), []))],
        );
        let term = build::term(
            false,
            build::factor(inner, []),
            [(NodeKind::Mul, number(3.0))],
        );

        let Ok(result) = evaluator.term(&term) else {
            panic!("expected the term to evaluate");
        };

        assert_eq!(result.value, Some(9.0));
        assert!(result.trace.starts_with('('));
    }
}
