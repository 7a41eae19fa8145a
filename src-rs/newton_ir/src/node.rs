//! IR node with optional physics, value and source information

use std::sync::Arc;

use newton_physics::Physics;
use newton_shared::span::Span;

use crate::kind::NodeKind;

/// A node in the IR tree
///
/// Leaves carry a token (identifiers), a value (numeric constants and
/// parameter bindings), an attached [`Physics`] and, for identifiers that
/// name an invariant parameter, the parameter's number.
#[derive(Debug, Clone, PartialEq)]
pub struct IrNode {
    kind: NodeKind,
    token: Option<String>,
    value: Option<f64>,
    physics: Option<Arc<Physics>>,
    parameter_number: Option<usize>,
    subindex: Option<usize>,
    span: Option<Span>,
    left: Option<Box<IrNode>>,
    right: Option<Box<IrNode>>,
}

impl IrNode {
    /// Creates a childless node of the given kind
    #[must_use]
    pub const fn new(kind: NodeKind) -> Self {
        Self {
            kind,
            token: None,
            value: None,
            physics: None,
            parameter_number: None,
            subindex: None,
            span: None,
            left: None,
            right: None,
        }
    }

    /// Creates an identifier leaf
    #[must_use]
    pub fn identifier(name: impl Into<String>) -> Self {
        Self {
            token: Some(name.into()),
            ..Self::new(NodeKind::Identifier)
        }
    }

    /// Creates a numeric constant leaf
    #[must_use]
    pub fn numeric_const(value: f64) -> Self {
        Self {
            value: Some(value),
            ..Self::new(NodeKind::NumericConst)
        }
    }

    /// Creates a parameter node named `name`
    ///
    /// The name is also stored as an identifier in the left child.
    #[must_use]
    pub fn parameter(name: impl Into<String>) -> Self {
        let name = name.into();
        let mut node = Self {
            token: Some(name.clone()),
            ..Self::new(NodeKind::Parameter)
        };
        node.add_leaf(Self::identifier(name));
        node
    }

    /// Creates a sequence link holding `node` as its left child
    #[must_use]
    pub fn sequence(node: Self) -> Self {
        let span = node.span;
        Self {
            span,
            left: Some(Box::new(node)),
            ..Self::new(NodeKind::Sequence)
        }
    }

    /// Sets the value of the node
    #[must_use]
    pub fn with_value(self, value: f64) -> Self {
        Self {
            value: Some(value),
            ..self
        }
    }

    /// Attaches a physics to the node
    #[must_use]
    pub fn with_physics(self, physics: Arc<Physics>) -> Self {
        Self {
            physics: Some(physics),
            ..self
        }
    }

    /// Sets the parameter number of the node
    #[must_use]
    pub fn with_parameter_number(self, parameter_number: usize) -> Self {
        Self {
            parameter_number: Some(parameter_number),
            ..self
        }
    }

    /// Selects one component of a multi-axis signal, as in `x @ 1`
    #[must_use]
    pub fn with_subindex(self, subindex: usize) -> Self {
        Self {
            subindex: Some(subindex),
            ..self
        }
    }

    /// Sets the source span of the node
    #[must_use]
    pub fn with_span(self, span: Span) -> Self {
        Self {
            span: Some(span),
            ..self
        }
    }

    /// Returns the kind of the node
    #[must_use]
    pub const fn kind(&self) -> NodeKind {
        self.kind
    }

    /// Returns the token of the node
    #[must_use]
    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    /// Returns the value of the node
    #[must_use]
    pub const fn value(&self) -> Option<f64> {
        self.value
    }

    /// Returns the attached physics
    #[must_use]
    pub const fn physics(&self) -> Option<&Arc<Physics>> {
        self.physics.as_ref()
    }

    /// Returns the parameter number of the node
    #[must_use]
    pub const fn parameter_number(&self) -> Option<usize> {
        self.parameter_number
    }

    /// Returns the selected subindex of the node
    #[must_use]
    pub const fn subindex(&self) -> Option<usize> {
        self.subindex
    }

    /// Returns the source span of the node
    #[must_use]
    pub const fn span(&self) -> Option<Span> {
        self.span
    }

    /// Returns the left child
    #[must_use]
    pub fn left(&self) -> Option<&Self> {
        self.left.as_deref()
    }

    /// Returns the right child
    #[must_use]
    pub fn right(&self) -> Option<&Self> {
        self.right.as_deref()
    }

    /// Returns the children of the node, left before right
    pub fn children(&self) -> impl Iterator<Item = &Self> {
        self.left().into_iter().chain(self.right())
    }

    /// Attaches a physics to the node in place
    pub fn set_physics(&mut self, physics: Arc<Physics>) {
        self.physics = Some(physics);
    }

    /// Sets the parameter number of the node in place
    pub const fn set_parameter_number(&mut self, parameter_number: usize) {
        self.parameter_number = Some(parameter_number);
    }

    /// Adds `node` at the end of the right spine
    ///
    /// The new node becomes the left child of the first spine node without a
    /// left child, or else the right child of the first spine node without a
    /// right child.
    pub fn add_leaf(&mut self, node: Self) {
        let tail = self.spine_tail();

        if tail.left.is_none() {
            tail.left = Some(Box::new(node));
        } else {
            tail.right = Some(Box::new(node));
        }
    }

    /// Adds `node` at the end of the right spine, wrapped in a sequence link
    ///
    /// Use this for every sibling after the first so that a chain of
    /// siblings keeps its left-to-right order.
    pub fn add_leaf_with_chaining_seq(&mut self, node: Self) {
        let tail = self.spine_tail();

        if tail.left.is_none() {
            tail.left = Some(Box::new(node));
        } else {
            tail.right = Some(Box::new(Self::sequence(node)));
        }
    }

    /// Visits every node of the tree in pre-order, left before right
    pub fn walk(&self) -> impl Iterator<Item = &Self> {
        let mut stack = vec![self];
        std::iter::from_fn(move || {
            let node = stack.pop()?;
            stack.extend(node.right());
            stack.extend(node.left());
            Some(node)
        })
    }

    /// Visits every node of the tree mutably in pre-order, left before right
    pub fn walk_mut(&mut self, visit: &mut impl FnMut(&mut Self)) {
        visit(self);

        if let Some(left) = self.left.as_deref_mut() {
            left.walk_mut(visit);
        }

        if let Some(right) = self.right.as_deref_mut() {
            right.walk_mut(visit);
        }
    }

    fn spine_tail(&mut self) -> &mut Self {
        let mut node = self;
        while node.left.is_some() && node.right.is_some() {
            node = node
                .right
                .as_deref_mut()
                .expect("right child was checked to exist");
        }
        node
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(root: &IrNode) -> Vec<String> {
        root.walk()
            .filter_map(|node| node.token().map(str::to_string))
            .collect()
    }

    #[test]
    fn chaining_keeps_left_to_right_order() {
        // build a list with three identifiers
        let mut list = IrNode::new(NodeKind::ConstraintList);
        list.add_leaf(IrNode::identifier("a"));
        list.add_leaf_with_chaining_seq(IrNode::identifier("b"));
        list.add_leaf_with_chaining_seq(IrNode::identifier("c"));

        // check the shape
        assert_eq!(list.left().and_then(IrNode::token), Some("a"));
        let first_link = list.right().expect("first link");
        assert_eq!(first_link.kind(), NodeKind::Sequence);
        let second_link = first_link.right().expect("second link");
        assert_eq!(second_link.left().and_then(IrNode::token), Some("c"));

        // check the order
        assert_eq!(tokens(&list), vec!["a", "b", "c"]);
    }

    #[test]
    fn add_leaf_fills_left_then_right() {
        let mut node = IrNode::new(NodeKind::Constraint);
        node.add_leaf(IrNode::identifier("left"));
        node.add_leaf(IrNode::identifier("right"));

        assert_eq!(node.left().and_then(IrNode::token), Some("left"));
        assert_eq!(node.right().and_then(IrNode::token), Some("right"));
    }

    #[test]
    fn parameter_stores_name_twice() {
        let parameter = IrNode::parameter("L").with_value(1.0);

        assert_eq!(parameter.kind(), NodeKind::Parameter);
        assert_eq!(parameter.token(), Some("L"));
        assert_eq!(parameter.left().map(IrNode::kind), Some(NodeKind::Identifier));
        assert_eq!(parameter.value(), Some(1.0));
    }

    #[test]
    fn walk_mut_visits_every_node() {
        let mut list = IrNode::new(NodeKind::ParameterList);
        list.add_leaf(IrNode::parameter("x"));
        list.add_leaf_with_chaining_seq(IrNode::parameter("y"));

        let mut visited = 0;
        list.walk_mut(&mut |_| visited += 1);

        // list, x, x's identifier, link, y, y's identifier
        assert_eq!(visited, 6);
        assert_eq!(list.walk().count(), 6);
    }
}
