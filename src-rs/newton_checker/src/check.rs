use newton_ir::{
    IrNode, NodeKind, Production,
    locator::{all_of_type, find_nth_of_production, find_nth_of_type},
};
use newton_physics::are_equivalent;
use newton_shared::scope::ScopeId;
use newton_symbol_table::{Invariant, SymbolTable};
use tracing::{debug, instrument, warn};

use crate::{
    error::CheckError,
    evaluate::{Evaluator, Quantity},
    options::CheckOptions,
    report::{ConstraintReport, Report},
};

/// Checks every constraint of `invariant` against `bindings`
///
/// `bindings` is a parameter list whose parameters carry a number, a value
/// and optionally a physics. An identifier that names a parameter of the
/// invariant takes the value of the binding with the same number and
/// subindex, and the binding's physics when it has one.
///
/// Every constraint is checked unless
/// [`CheckOptions::stop_at_first_failure`] is set.
///
/// # Errors
///
/// Returns an error if a constraint does not have the shape of a
/// comparison, an identifier cannot be resolved, a parameter has no
/// binding, or a term is undefined (`0 ** 0`, a product of two vectors).
#[instrument(skip_all, fields(invariant = invariant.identifier()))]
pub fn satisfies_constraints(
    table: &SymbolTable,
    invariant: &Invariant,
    bindings: &IrNode,
    options: CheckOptions,
) -> Result<Report, CheckError> {
    table.scope(invariant.scope())?;

    let constraints = constraints_of(invariant.constraints());
    let mut evaluator = Evaluator::new(table, invariant.scope(), Some(bindings), options);
    let mut constraint_reports = Vec::new();

    for (index, constraint) in constraints.enumerate() {
        let report = check_constraint(&mut evaluator, constraint, Production::CompareOp, true)?;

        debug!(
            constraint = index,
            value = report.satisfies_value_constraint,
            dimension = report.satisfies_dimension_constraint,
            "constraint checked"
        );

        let failed = !report.is_satisfied();
        constraint_reports.push(report);

        if failed && options.stop_at_first_failure() {
            break;
        }
    }

    Ok(Report {
        invariant: invariant.identifier().to_string(),
        constraint_reports,
    })
}

/// Checks the dimensions of a single statement `lhs <op> rhs`
///
/// The operator may be a comparison or an assignment `=`. No bindings are
/// used, so only the dimension track is checked and the value verdict is
/// always satisfied.
///
/// # Errors
///
/// Returns an error if the tree does not have the shape of a statement or
/// an identifier cannot be resolved.
#[instrument(skip_all, fields(%scope))]
pub fn check_expression_or_statement(
    table: &SymbolTable,
    scope: ScopeId,
    statement: &IrNode,
    options: CheckOptions,
) -> Result<ConstraintReport, CheckError> {
    table.scope(scope)?;

    let statement = if statement.kind() == NodeKind::Constraint {
        statement
    } else {
        find_nth_of_type(statement, NodeKind::Constraint, 0)
            .ok_or(CheckError::missing_node("a statement", statement.span()))?
    };

    let mut evaluator = Evaluator::new(table, scope, None, options);
    let report = check_constraint(&mut evaluator, statement, Production::CompareOrAssignOp, false)?;

    debug!(
        dimension = report.satisfies_dimension_constraint,
        "statement checked"
    );
    Ok(report)
}

fn constraints_of(constraints: &IrNode) -> Box<dyn Iterator<Item = &IrNode> + '_> {
    if constraints.kind() == NodeKind::Constraint {
        Box::new(std::iter::once(constraints))
    } else {
        Box::new(all_of_type(constraints, NodeKind::Constraint))
    }
}

fn check_constraint(
    evaluator: &mut Evaluator<'_>,
    constraint: &IrNode,
    operators: Production,
    check_values: bool,
) -> Result<ConstraintReport, CheckError> {
    let left = find_nth_of_type(constraint, NodeKind::QuantityExpression, 0)
        .ok_or(CheckError::missing_node("a left-hand side", constraint.span()))?;
    let left = evaluator.expression(left)?;

    let op = find_nth_of_production(constraint, operators, 0)
        .ok_or(CheckError::missing_comparison_operator(constraint.span()))?
        .kind();

    let right = find_nth_of_type(constraint, NodeKind::QuantityExpression, 1)
        .ok_or(CheckError::missing_node("a right-hand side", constraint.span()))?;
    let right = evaluator.expression(right)?;

    let (mut value_failures, mut dimension_failures) = evaluator.take_failures();

    if check_values && !compare_values(&left, op, &right)? {
        let precision = evaluator.precision();
        value_failures.push(format!(
            "LHS {} of value {:.precision$} should be {} RHS {} of value {:.precision$}",
            left.trace,
            left.comparable_value(),
            op.symbol().unwrap_or_default(),
            right.trace,
            right.comparable_value(),
        ));
    }

    if !are_equivalent(left.physics(), right.physics()) {
        dimension_failures.push(format!(
            "dimensions of LHS {} and RHS {} do not match",
            left.trace, right.trace
        ));
    }

    if !check_values {
        value_failures.clear();
    }

    let report = ConstraintReport {
        satisfies_value_constraint: value_failures.is_empty(),
        satisfies_dimension_constraint: dimension_failures.is_empty(),
        value_error_message: join(&value_failures),
        dimension_error_message: join(&dimension_failures),
    };

    if let Some(message) = &report.value_error_message {
        warn!(%message, "value check failed");
    }
    if let Some(message) = &report.dimension_error_message {
        warn!(%message, "dimension check failed");
    }

    Ok(report)
}

/// Compares the two sides, treating unresolved values as 0
///
/// `~` only asserts proportionality, so its value check always holds.
#[expect(
    clippy::float_cmp,
    reason = "constraints compare values exactly, without a tolerance"
)]
fn compare_values(left: &Quantity, op: NodeKind, right: &Quantity) -> Result<bool, CheckError> {
    let left = left.comparable_value();
    let right = right.comparable_value();

    match op {
        NodeKind::Lt => Ok(left < right),
        NodeKind::Le => Ok(left <= right),
        NodeKind::Gt => Ok(left > right),
        NodeKind::Ge => Ok(left >= right),
        NodeKind::Equivalent | NodeKind::Equals => Ok(left == right),
        NodeKind::Proportional => Ok(true),
        NodeKind::ConstraintList
        | NodeKind::Constraint
        | NodeKind::QuantityExpression
        | NodeKind::QuantityTerm
        | NodeKind::QuantityFactor
        | NodeKind::ParameterList
        | NodeKind::Parameter
        | NodeKind::Identifier
        | NodeKind::NumericConst
        | NodeKind::Plus
        | NodeKind::Minus
        | NodeKind::Mul
        | NodeKind::Div
        | NodeKind::Exponent
        | NodeKind::Negate
        | NodeKind::Sequence => Err(CheckError::missing_comparison_operator(None)),
    }
}

fn join(messages: &[String]) -> Option<String> {
    (!messages.is_empty()).then(|| messages.join("; "))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use newton_ir::{build, parameter::number_parameters_zero_to_n};
    use newton_physics::Physics;
    use newton_symbol_table::{BaseSignal, Derivation};

    use super::*;

    // builds `time`, `distance` and the invariant `fall(d : distance, t : time) = { <constraints> }`
    fn fall(constraints: IrNode) -> (SymbolTable, Arc<Invariant>) {
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

        let typed = |name: &str, signal: &str| {
            let mut parameter = IrNode::parameter(name);
            parameter.add_leaf(IrNode::identifier(signal));
            parameter
        };
        let parameters = build::parameter_list([typed("d", "distance"), typed("t", "time")]);

        let invariant = table
            .add_invariant(ScopeId::ROOT, "fall", parameters, constraints, None)
            .expect("invariant should be registered");

        (table, invariant)
    }

    fn operand(name: &str) -> IrNode {
        build::expression(
            build::term(false, build::factor(IrNode::identifier(name), []), []),
            [],
        )
    }

    fn signal(table: &SymbolTable, name: &str) -> Arc<Physics> {
        let Some(physics) = table.physics_for_identifier(ScopeId::ROOT, name) else {
            panic!("expected `{name}` to be declared");
        };
        Arc::clone(physics)
    }

    fn bind(table: &SymbolTable, values: [(&str, &str, f64); 2]) -> IrNode {
        let mut bindings = build::parameter_list(values.map(|(name, physics, value)| {
            IrNode::parameter(name)
                .with_physics(signal(table, physics))
                .with_value(value)
        }));
        number_parameters_zero_to_n(&mut bindings);
        bindings
    }

    #[test]
    fn every_constraint_gets_a_report() {
        // build `{ d >= d, d < d }`
        let (table, invariant) = fall(build::constraint_list([
            build::constraint(operand("d"), NodeKind::Ge, operand("d")),
            build::constraint(operand("d"), NodeKind::Lt, operand("d")),
        ]));
        let bindings = bind(&table, [("d", "distance", 3.0), ("t", "time", 1.0)]);

        // check the result
        let Ok(report) = satisfies_constraints(&table, &invariant, &bindings, CheckOptions::new())
        else {
            panic!("expected the check to run");
        };

        assert_eq!(report.invariant, "fall");
        assert_eq!(report.constraint_reports.len(), 2);
        assert!(report.constraint_reports[0].is_satisfied());
        assert!(!report.constraint_reports[1].satisfies_value_constraint);
        assert!(report.constraint_reports[1].satisfies_dimension_constraint);
        assert_eq!(
            report.constraint_reports[1].value_error_message.as_deref(),
            Some("LHS  (d : 3.000000)  of value 3.000000 should be < RHS  (d : 3.000000)  of value 3.000000")
        );
    }

    #[test]
    fn value_and_dimension_fail_independently() {
        // build `{ d >= t }`, true in value but not in dimension
        let (table, invariant) = fall(build::constraint_list([build::constraint(
            operand("d"),
            NodeKind::Ge,
            operand("t"),
        )]));
        let bindings = bind(&table, [("d", "distance", 3.0), ("t", "time", 1.0)]);

        let Ok(report) = satisfies_constraints(&table, &invariant, &bindings, CheckOptions::new())
        else {
            panic!("expected the check to run");
        };

        let [constraint] = report.constraint_reports.as_slice() else {
            panic!("expected a single constraint report");
        };
        assert!(constraint.satisfies_value_constraint);
        assert!(!constraint.satisfies_dimension_constraint);
        let Some(message) = &constraint.dimension_error_message else {
            panic!("expected a dimension message");
        };
        assert!(message.contains("(d : 3.000000)"));
        assert!(message.contains("(t : 1.000000)"));
    }

    #[test]
    fn stop_at_first_failure_skips_the_rest() {
        let (table, invariant) = fall(build::constraint_list([
            build::constraint(operand("d"), NodeKind::Lt, operand("d")),
            build::constraint(operand("d"), NodeKind::Ge, operand("d")),
        ]));
        let bindings = bind(&table, [("d", "distance", 3.0), ("t", "time", 1.0)]);
        let options = CheckOptions::new().with_stop_at_first_failure(true);

        let Ok(report) = satisfies_constraints(&table, &invariant, &bindings, options) else {
            panic!("expected the check to run");
        };

        assert_eq!(report.constraint_reports.len(), 1);
    }

    #[test]
    fn single_constraint_root_is_checked() {
        let (table, invariant) = fall(build::constraint(
            operand("t"),
            NodeKind::Equivalent,
            operand("t"),
        ));
        let bindings = bind(&table, [("d", "distance", 3.0), ("t", "time", 1.0)]);

        let Ok(report) = satisfies_constraints(&table, &invariant, &bindings, CheckOptions::new())
        else {
            panic!("expected the check to run");
        };

        assert_eq!(report.constraint_reports.len(), 1);
        assert!(report.is_satisfied());
    }

    #[test]
    fn missing_binding_is_fatal() {
        let (table, invariant) = fall(build::constraint(
            operand("t"),
            NodeKind::Equivalent,
            operand("t"),
        ));
        let mut bindings = build::parameter_list([IrNode::parameter("d").with_value(1.0)]);
        number_parameters_zero_to_n(&mut bindings);

        let result = satisfies_constraints(&table, &invariant, &bindings, CheckOptions::new());

        assert_eq!(
            result,
            Err(CheckError::unbound_parameter("t".to_string(), 1, 0, None))
        );
    }

    #[test]
    fn constraint_without_operator_is_fatal() {
        let mut constraint = IrNode::new(NodeKind::Constraint);
        constraint.add_leaf(operand("d"));
        constraint.add_leaf_with_chaining_seq(operand("d"));
        let (table, invariant) = fall(constraint);
        let bindings = bind(&table, [("d", "distance", 3.0), ("t", "time", 1.0)]);

        let result = satisfies_constraints(&table, &invariant, &bindings, CheckOptions::new());

        assert_eq!(result, Err(CheckError::missing_comparison_operator(None)));
    }

    #[test]
    fn statement_checks_only_dimensions() {
        // build `d = t * 2` against the declared signals
        let (table, _) = fall(build::constraint_list([]));
        let statement = build::constraint(
            operand("distance"),
            NodeKind::Equals,
            build::expression(
                build::term(
                    false,
                    build::factor(IrNode::identifier("time"), []),
                    [(
                        NodeKind::Mul,
                        build::factor(IrNode::numeric_const(2.0), []),
                    )],
                ),
                [],
            ),
        );

        let Ok(report) =
            check_expression_or_statement(&table, ScopeId::ROOT, &statement, CheckOptions::new())
        else {
            panic!("expected the statement to be checked");
        };

        assert!(report.satisfies_value_constraint);
        assert!(report.value_error_message.is_none());
        assert!(!report.satisfies_dimension_constraint);
        assert_eq!(
            report.dimension_error_message.as_deref(),
            Some("dimensions of LHS  (distance : unset)  and RHS  (time : unset) * 2.000000  do not match")
        );
    }

    #[test]
    fn statement_with_matching_units_passes() {
        let (table, _) = fall(build::constraint_list([]));
        let statement =
            build::constraint_list([build::constraint(operand("d"), NodeKind::Equals, operand("meter"))]);

        // `d` is not a parameter here, so it cannot resolve
        let result =
            check_expression_or_statement(&table, ScopeId::ROOT, &statement, CheckOptions::new());
        assert_eq!(
            result,
            Err(CheckError::unresolved_identifier("d".to_string(), None))
        );

        let statement = build::constraint(operand("distance"), NodeKind::Equals, operand("meter"));
        let Ok(report) =
            check_expression_or_statement(&table, ScopeId::ROOT, &statement, CheckOptions::new())
        else {
            panic!("expected the statement to be checked");
        };
        assert!(report.is_satisfied());
    }

    #[test]
    fn trace_precision_is_configurable() {
        let (table, invariant) = fall(build::constraint(
            operand("d"),
            NodeKind::Lt,
            operand("d"),
        ));
        let bindings = bind(&table, [("d", "distance", 3.0), ("t", "time", 1.0)]);
        let options = CheckOptions::new().with_trace_precision(1);

        let Ok(report) = satisfies_constraints(&table, &invariant, &bindings, options) else {
            panic!("expected the check to run");
        };

        assert_eq!(
            report.constraint_reports[0].value_error_message.as_deref(),
            Some("LHS  (d : 3.0)  of value 3.0 should be < RHS  (d : 3.0)  of value 3.0")
        );
    }
}
