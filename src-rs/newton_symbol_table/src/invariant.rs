use std::sync::Arc;

use newton_ir::{IrNode, NodeKind};
use newton_physics::Physics;
use newton_shared::{scope::ScopeId, span::Span};

/// A named physical law
///
/// The parameters are numbered from zero and every constraint identifier
/// that names a parameter carries that number and the parameter's physics.
#[derive(Debug, Clone, PartialEq)]
pub struct Invariant {
    identifier: String,
    scope: ScopeId,
    parameter_list: IrNode,
    constraints: IrNode,
    id: u64,
    span: Option<Span>,
}

impl Invariant {
    pub(crate) const fn new(
        identifier: String,
        scope: ScopeId,
        parameter_list: IrNode,
        constraints: IrNode,
        id: u64,
        span: Option<Span>,
    ) -> Self {
        Self {
            identifier,
            scope,
            parameter_list,
            constraints,
            id,
            span,
        }
    }

    /// Returns the name of the invariant
    #[must_use]
    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    /// Returns the scope of the invariant body
    #[must_use]
    pub const fn scope(&self) -> ScopeId {
        self.scope
    }

    /// Returns the numbered parameter list
    #[must_use]
    pub const fn parameter_list(&self) -> &IrNode {
        &self.parameter_list
    }

    /// Returns the constraint list
    #[must_use]
    pub const fn constraints(&self) -> &IrNode {
        &self.constraints
    }

    /// Returns the product of the parameter physics ids
    #[must_use]
    pub const fn id(&self) -> u64 {
        self.id
    }

    /// Returns where the invariant was declared
    #[must_use]
    pub const fn span(&self) -> Option<Span> {
        self.span
    }

    /// Returns the number of parameters
    #[must_use]
    pub fn parameter_count(&self) -> usize {
        self.parameter_list
            .walk()
            .filter(|node| node.kind() == NodeKind::Parameter)
            .count()
    }
}

/// A numbered parameter and the physics it was typed with
#[derive(Debug, Clone)]
pub(crate) struct TypedParameter {
    pub(crate) name: String,
    pub(crate) number: usize,
    pub(crate) physics: Arc<Physics>,
}

/// Stamps every identifier that names a parameter with its number and physics
///
/// An identifier with a subindex gets the matching component through
/// `component`, falling back to the parameter's own physics.
pub(crate) fn stamp_parameters(
    constraints: &mut IrNode,
    parameters: &[TypedParameter],
    component: impl Fn(&Physics, usize) -> Option<Arc<Physics>>,
) {
    constraints.walk_mut(&mut |node| {
        if node.kind() != NodeKind::Identifier {
            return;
        }

        let Some(parameter) = parameters
            .iter()
            .find(|parameter| node.token() == Some(parameter.name.as_str()))
        else {
            return;
        };

        let physics = node
            .subindex()
            .and_then(|subindex| component(parameter.physics.as_ref(), subindex))
            .unwrap_or_else(|| Arc::clone(&parameter.physics));

        node.set_physics(physics);
        node.set_parameter_number(parameter.number);
    });
}
