//! Helpers for assembling IR trees in the shape the checker expects
//!
//! Every helper places its first child with [`IrNode::add_leaf`] and the
//! remaining children with [`IrNode::add_leaf_with_chaining_seq`], so a
//! depth-first walk visits children in source order.

use crate::{kind::NodeKind, node::IrNode};

/// Builds a constraint list from individual constraints
#[must_use]
pub fn constraint_list(constraints: impl IntoIterator<Item = IrNode>) -> IrNode {
    chain(IrNode::new(NodeKind::ConstraintList), constraints)
}

/// Builds a parameter list from individual parameters
#[must_use]
pub fn parameter_list(parameters: impl IntoIterator<Item = IrNode>) -> IrNode {
    chain(IrNode::new(NodeKind::ParameterList), parameters)
}

/// Builds `left <op> right`
///
/// `op` is expected to be a comparison operator or `=`.
#[must_use]
pub fn constraint(left: IrNode, op: NodeKind, right: IrNode) -> IrNode {
    chain(
        IrNode::new(NodeKind::Constraint),
        [left, IrNode::new(op), right],
    )
}

/// Builds `first (<op> term)*` where each op is `+` or `-`
#[must_use]
pub fn expression(first: IrNode, rest: impl IntoIterator<Item = (NodeKind, IrNode)>) -> IrNode {
    let rest = rest
        .into_iter()
        .flat_map(|(op, term)| [IrNode::new(op), term]);

    chain(
        IrNode::new(NodeKind::QuantityExpression),
        std::iter::once(first).chain(rest),
    )
}

/// Builds `[-] first (<op> factor)*` where each op is `*` or `/`
#[must_use]
pub fn term(
    negated: bool,
    first: IrNode,
    rest: impl IntoIterator<Item = (NodeKind, IrNode)>,
) -> IrNode {
    let negation = negated.then(|| IrNode::new(NodeKind::Negate));
    let rest = rest
        .into_iter()
        .flat_map(|(op, factor)| [IrNode::new(op), factor]);

    chain(
        IrNode::new(NodeKind::QuantityTerm),
        negation.into_iter().chain(std::iter::once(first)).chain(rest),
    )
}

/// Builds `operand (** exponent)*`
///
/// The operand is an identifier, a numeric constant, or a quantity
/// expression for a parenthesized operand. Each exponent is a quantity
/// expression and becomes the left child of its `**` node.
#[must_use]
pub fn factor(operand: IrNode, exponents: impl IntoIterator<Item = IrNode>) -> IrNode {
    let exponents = exponents.into_iter().map(|exponent| {
        let mut op = IrNode::new(NodeKind::Exponent);
        op.add_leaf(exponent);
        op
    });

    chain(
        IrNode::new(NodeKind::QuantityFactor),
        std::iter::once(operand).chain(exponents),
    )
}

fn chain(mut parent: IrNode, children: impl IntoIterator<Item = IrNode>) -> IrNode {
    let mut children = children.into_iter();

    if let Some(first) = children.next() {
        parent.add_leaf(first);
    }

    for child in children {
        parent.add_leaf_with_chaining_seq(child);
    }

    parent
}

#[cfg(test)]
mod tests {
    use newton_shared::span::Span;

    use super::*;
    use crate::locator::{all_of_type, find_nth_of_production, find_nth_of_type};
    use crate::Production;

    #[test]
    fn constraint_has_two_expressions_and_an_operator() {
        // period ~ 2
        let left = expression(term(false, factor(IrNode::identifier("period"), []), []), []);
        let right = expression(
            term(false, factor(IrNode::numeric_const(2.0), []), []),
            [],
        );

        let constraint = constraint(left, NodeKind::Proportional, right)
            .with_span(Span::random_span());

        assert_eq!(
            all_of_type(&constraint, NodeKind::QuantityExpression).count(),
            2
        );
        assert_eq!(
            find_nth_of_production(&constraint, Production::CompareOp, 0).map(IrNode::kind),
            Some(NodeKind::Proportional)
        );
        assert!(constraint.span().is_some());
    }

    #[test]
    fn negated_term_starts_with_unary_operator() {
        let term = term(
            true,
            factor(IrNode::identifier("x"), []),
            [(NodeKind::Div, factor(IrNode::identifier("y"), []))],
        );

        assert_eq!(term.left().map(IrNode::kind), Some(NodeKind::Negate));
        assert!(find_nth_of_production(&term, Production::UnaryOp, 0).is_some());
        assert!(find_nth_of_type(&term, NodeKind::QuantityFactor, 1).is_some());
    }

    #[test]
    fn constraint_list_chains_constraints() {
        let single = || {
            constraint(
                expression(term(false, factor(IrNode::identifier("a"), []), []), []),
                NodeKind::Ge,
                expression(term(false, factor(IrNode::numeric_const(0.0), []), []), []),
            )
        };

        let list = constraint_list([single(), single(), single()]);

        assert_eq!(all_of_type(&list, NodeKind::Constraint).count(), 3);
    }
}
