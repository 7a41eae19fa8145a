use std::sync::Arc;

use indexmap::IndexMap;
use newton_physics::{Dimension, Physics};
use newton_shared::{scope::ScopeId, span::Span};

/// A lexical namespace of the symbol table
///
/// Only the root scope holds dimensions. Physics are keyed by identifier
/// and subindex and keep their declaration order.
#[derive(Debug, Clone, PartialEq)]
pub struct Scope {
    id: ScopeId,
    parent: Option<ScopeId>,
    children: Vec<ScopeId>,
    dimensions: IndexMap<String, Arc<Dimension>>,
    physics: IndexMap<(String, usize), Arc<Physics>>,
    current_subindex: usize,
    begin: Option<Span>,
    end: Option<Span>,
}

impl Scope {
    pub(crate) fn new(id: ScopeId, parent: Option<ScopeId>, begin: Option<Span>) -> Self {
        Self {
            id,
            parent,
            children: Vec::new(),
            dimensions: IndexMap::new(),
            physics: IndexMap::new(),
            current_subindex: 0,
            begin,
            end: None,
        }
    }

    /// Returns the handle of the scope
    #[must_use]
    pub const fn id(&self) -> ScopeId {
        self.id
    }

    /// Returns the enclosing scope, or `None` for the root
    #[must_use]
    pub const fn parent(&self) -> Option<ScopeId> {
        self.parent
    }

    /// Returns the most recently opened child scope
    #[must_use]
    pub fn first_child(&self) -> Option<ScopeId> {
        self.children.last().copied()
    }

    /// Returns every child scope in the order they were opened
    #[must_use]
    pub fn children(&self) -> &[ScopeId] {
        &self.children
    }

    /// Returns the dimensions registered in this scope
    pub fn dimensions(&self) -> impl Iterator<Item = &Arc<Dimension>> {
        self.dimensions.values()
    }

    /// Returns the physics declared in this scope, in declaration order
    pub fn physics(&self) -> impl Iterator<Item = &Arc<Physics>> {
        self.physics.values()
    }

    /// Returns the subindex given to physics created without one
    #[must_use]
    pub const fn current_subindex(&self) -> usize {
        self.current_subindex
    }

    /// Returns where the scope was opened
    #[must_use]
    pub const fn begin(&self) -> Option<Span> {
        self.begin
    }

    /// Returns where the scope was closed, or `None` while it is open
    #[must_use]
    pub const fn end(&self) -> Option<Span> {
        self.end
    }

    /// Returns true if the scope has not been closed
    #[must_use]
    pub const fn is_open(&self) -> bool {
        self.end.is_none()
    }

    pub(crate) fn dimension(&self, name: &str) -> Option<&Arc<Dimension>> {
        self.dimensions.get(name)
    }

    pub(crate) fn local_physics(&self, identifier: &str, subindex: usize) -> Option<&Arc<Physics>> {
        self.physics
            .iter()
            .find(|((name, index), _)| name == identifier && *index == subindex)
            .map(|(_, physics)| physics)
    }

    pub(crate) fn contains_physics(&self, identifier: &str, subindex: usize) -> bool {
        self.local_physics(identifier, subindex).is_some()
    }

    pub(crate) fn insert_dimension(&mut self, dimension: Arc<Dimension>) {
        self.dimensions.insert(dimension.name.clone(), dimension);
    }

    pub(crate) fn insert_physics(&mut self, physics: Arc<Physics>) {
        let key = (physics.identifier.clone(), physics.subindex);
        self.physics.insert(key, physics);
    }

    pub(crate) fn add_child(&mut self, child: ScopeId) {
        self.children.push(child);
    }

    pub(crate) const fn set_current_subindex(&mut self, subindex: usize) {
        self.current_subindex = subindex;
    }

    pub(crate) const fn close(&mut self, end: Span) {
        self.end = Some(end);
    }
}
