use std::sync::Arc;

use newton_ir::{IrNode, NodeKind, parameter::number_parameters_zero_to_n};
use newton_physics::{Dimension, Physics, PrimeAllocator, fingerprint};
use newton_shared::{scope::ScopeId, span::Span};
use tracing::debug;

use crate::{
    declare::{BaseSignal, Derivation, SubindexRange},
    error::SymbolTableError,
    invariant::{Invariant, TypedParameter, stamp_parameters},
    scope::Scope,
};

/// The symbol table of one compilation unit
///
/// Scopes are stored in an arena and named by [`ScopeId`]. The root scope
/// always exists. Published physics are shared behind [`Arc`] and never
/// mutated; evaluation works on clones.
#[derive(Debug, Clone)]
pub struct SymbolTable {
    scopes: Vec<Scope>,
    invariants: Vec<Arc<Invariant>>,
    primes: PrimeAllocator,
}

impl SymbolTable {
    /// Creates a table holding only the root scope
    #[must_use]
    pub fn new() -> Self {
        Self {
            scopes: vec![Scope::new(ScopeId::ROOT, None, None)],
            invariants: Vec::new(),
            primes: PrimeAllocator::new(),
        }
    }

    /// Returns the root scope
    ///
    /// # Panics
    ///
    /// Panics if the root scope is missing, which cannot happen for a table
    /// created with [`SymbolTable::new`].
    #[must_use]
    pub fn root(&self) -> &Scope {
        self.scopes
            .first()
            .expect("the root scope is created with the table")
    }

    /// Returns the scope named by `scope`
    ///
    /// # Errors
    ///
    /// Returns an error if the scope does not belong to this table.
    pub fn scope(&self, scope: ScopeId) -> Result<&Scope, SymbolTableError> {
        self.scopes
            .get(scope.index())
            .ok_or(SymbolTableError::unknown_scope(scope))
    }

    fn scope_mut(&mut self, scope: ScopeId) -> Result<&mut Scope, SymbolTableError> {
        self.scopes
            .get_mut(scope.index())
            .ok_or(SymbolTableError::unknown_scope(scope))
    }

    /// Opens a child scope of `parent`
    ///
    /// # Errors
    ///
    /// Returns an error if the parent scope does not belong to this table.
    pub fn open_scope(
        &mut self,
        parent: ScopeId,
        begin: Option<Span>,
    ) -> Result<ScopeId, SymbolTableError> {
        let child = ScopeId::new(self.scopes.len());
        self.scope_mut(parent)?.add_child(child);
        self.scopes.push(Scope::new(child, Some(parent), begin));

        debug!(%parent, %child, "scope opened");
        Ok(child)
    }

    /// Closes `scope`, recording where it ends
    ///
    /// # Errors
    ///
    /// Returns an error if the scope does not belong to this table.
    pub fn close_scope(&mut self, scope: ScopeId, end: Span) -> Result<(), SymbolTableError> {
        self.scope_mut(scope)?.close(end);

        debug!(%scope, "scope closed");
        Ok(())
    }

    /// Sets the subindex used by [`SymbolTable::add_or_lookup_physics`] in `scope`
    ///
    /// # Errors
    ///
    /// Returns an error if the scope does not belong to this table.
    pub fn set_current_subindex(
        &mut self,
        scope: ScopeId,
        subindex: usize,
    ) -> Result<(), SymbolTableError> {
        self.scope_mut(scope)?.set_current_subindex(subindex);
        Ok(())
    }

    /// Registers a base dimension in the root scope
    ///
    /// Dimensions can only be registered at the root, so this takes no
    /// scope. The dimension gets the next unused prime.
    ///
    /// # Errors
    ///
    /// Returns an error if a dimension with the same name already exists.
    pub fn add_dimension(
        &mut self,
        name: impl Into<String>,
        abbreviation: Option<String>,
        span: Option<Span>,
    ) -> Result<Arc<Dimension>, SymbolTableError> {
        let name = name.into();
        if self.root().dimension(&name).is_some() {
            return Err(SymbolTableError::duplicate_dimension(name, span));
        }

        let prime = self.primes.next_prime();
        let mut dimension = Dimension::new(name, abbreviation, prime);
        if let Some(span) = span {
            dimension = dimension.with_span(span);
        }
        let dimension = Arc::new(dimension);

        self.scope_mut(ScopeId::ROOT)?
            .insert_dimension(Arc::clone(&dimension));

        debug!(dimension = %dimension.name, prime, "dimension registered");
        Ok(dimension)
    }

    /// Returns the dimension registry in registration order
    pub fn dimension_registry(&self) -> impl Iterator<Item = &Arc<Dimension>> {
        self.root().dimensions()
    }

    /// Finds a dimension by its display name, searching from `scope` up to the root
    #[must_use]
    pub fn dimension_for_name(&self, scope: ScopeId, name: &str) -> Option<&Arc<Dimension>> {
        self.ancestors(scope).find_map(|scope| scope.dimension(name))
    }

    /// Returns the registered dimension named `name`
    ///
    /// # Errors
    ///
    /// Returns an error if no dimension with this name is registered.
    pub fn dimension(&self, name: &str) -> Result<&Arc<Dimension>, SymbolTableError> {
        self.root()
            .dimension(name)
            .ok_or_else(|| SymbolTableError::unknown_dimension(name.to_string()))
    }

    /// Creates a dimensionless physics over the current registry
    ///
    /// The physics is not published. Use [`SymbolTable::publish_physics`]
    /// once its dimensions are set.
    #[must_use]
    pub fn init_physics(&self, identifier: impl Into<String>, scope: ScopeId) -> Physics {
        Physics::new(identifier, scope, self.dimension_registry())
    }

    /// Publishes `physics` in `scope`
    ///
    /// The physics is moved into the scope and is immutable from then on.
    ///
    /// # Errors
    ///
    /// Returns an error if the scope is unknown or already holds a physics
    /// with the same identifier and subindex.
    pub fn publish_physics(
        &mut self,
        scope: ScopeId,
        mut physics: Physics,
        span: Option<Span>,
    ) -> Result<Arc<Physics>, SymbolTableError> {
        let target = self.scope_mut(scope)?;
        if target.contains_physics(&physics.identifier, physics.subindex) {
            return Err(SymbolTableError::duplicate_physics(
                physics.identifier,
                physics.subindex,
                span,
            ));
        }

        physics.scope = scope;
        let physics = Arc::new(physics);
        target.insert_physics(Arc::clone(&physics));

        debug!(
            %scope,
            physics = %physics.identifier,
            subindex = physics.subindex,
            id = physics.id,
            "physics published"
        );
        Ok(physics)
    }

    /// Defines or fetches a physics by identifier in `scope` only
    ///
    /// Ancestor scopes are not searched. A new physics is dimensionless, has
    /// a fresh prime id and takes the scope's current subindex.
    ///
    /// # Errors
    ///
    /// Returns an error if the scope does not belong to this table.
    pub fn add_or_lookup_physics(
        &mut self,
        scope: ScopeId,
        identifier: &str,
    ) -> Result<Arc<Physics>, SymbolTableError> {
        let local = self.scope(scope)?;
        let subindex = local.current_subindex();
        if let Some(physics) = local.local_physics(identifier, subindex) {
            return Ok(Arc::clone(physics));
        }

        let id = self.primes.next_prime();
        let physics = self
            .init_physics(identifier, scope)
            .with_id(id)
            .with_subindex(subindex);
        self.publish_physics(scope, physics, None)
    }

    /// Finds a physics by identifier, searching from `scope` up to the root
    ///
    /// For a multi-axis signal this is its first component.
    #[must_use]
    pub fn physics_for_identifier(&self, scope: ScopeId, identifier: &str) -> Option<&Arc<Physics>> {
        self.find_physics(scope, |physics| physics.identifier == identifier)
    }

    /// Finds a physics by the display name of its unit, such as `meter`
    #[must_use]
    pub fn physics_for_dimension_alias(&self, scope: ScopeId, alias: &str) -> Option<&Arc<Physics>> {
        self.find_physics(scope, |physics| {
            physics.dimension_alias.as_deref() == Some(alias)
        })
    }

    /// Finds a physics by the abbreviation of its unit, such as `m`
    #[must_use]
    pub fn physics_for_dimension_alias_abbreviation(
        &self,
        scope: ScopeId,
        abbreviation: &str,
    ) -> Option<&Arc<Physics>> {
        self.find_physics(scope, |physics| {
            physics.dimension_alias_abbreviation.as_deref() == Some(abbreviation)
        })
    }

    /// Finds one component of a multi-axis signal
    #[must_use]
    pub fn physics_for_identifier_and_subindex(
        &self,
        scope: ScopeId,
        identifier: &str,
        subindex: usize,
    ) -> Option<&Arc<Physics>> {
        self.ancestors(scope)
            .find_map(|scope| scope.local_physics(identifier, subindex))
    }

    /// Finds a physics by identifier, then by unit name, then by unit abbreviation
    #[must_use]
    pub fn resolve_physics(&self, scope: ScopeId, name: &str) -> Option<&Arc<Physics>> {
        self.physics_for_identifier(scope, name)
            .or_else(|| self.physics_for_dimension_alias(scope, name))
            .or_else(|| self.physics_for_dimension_alias_abbreviation(scope, name))
    }

    /// Returns `scope` followed by each of its ancestors up to the root
    ///
    /// An unknown scope yields nothing.
    pub fn ancestors(&self, scope: ScopeId) -> impl Iterator<Item = &Scope> {
        std::iter::successors(self.scopes.get(scope.index()), |scope| {
            scope
                .parent()
                .and_then(|parent| self.scopes.get(parent.index()))
        })
    }

    /// Declares a signal and publishes one physics per subindex
    ///
    /// A signal without a derivation registers its unit name as a base
    /// dimension if it is not registered yet. Every component gets a fresh
    /// prime id. The components are returned in subindex order.
    ///
    /// # Errors
    ///
    /// Returns an error if the subindex range is empty, the derivation names
    /// an unknown signal, the unit name is missing for a base dimension, or a
    /// component is already declared in `scope`.
    pub fn declare_base_signal(
        &mut self,
        scope: ScopeId,
        signal: BaseSignal,
    ) -> Result<Vec<Arc<Physics>>, SymbolTableError> {
        let BaseSignal {
            identifier,
            name,
            symbol,
            derivation,
            subindices,
            span,
        } = signal;

        let SubindexRange { start, end } =
            subindices.unwrap_or(SubindexRange { start: 0, end: 0 });
        if start > end {
            return Err(SymbolTableError::invalid_subindex_range(
                identifier, start, end,
            ));
        }

        let derived = self.derive_physics(
            scope,
            &identifier,
            name.as_deref(),
            symbol.as_deref(),
            &derivation,
            span,
        )?;

        let mut components = Vec::with_capacity(end - start + 1);
        for subindex in start..=end {
            let id = self.primes.next_prime();
            let physics = derived
                .clone()
                .with_id(id)
                .with_subindex(subindex)
                .with_alias(name.clone(), symbol.clone());
            components.push(self.publish_physics(scope, physics, span)?);
        }

        Ok(components)
    }

    /// Declares a constant with a concrete value
    ///
    /// # Errors
    ///
    /// Returns an error if the derivation names an unknown signal or the
    /// constant is already declared in `scope`.
    pub fn declare_constant(
        &mut self,
        scope: ScopeId,
        identifier: &str,
        value: f64,
        derivation: &Derivation,
        span: Option<Span>,
    ) -> Result<Arc<Physics>, SymbolTableError> {
        let derived = self.derive_physics(scope, identifier, None, None, derivation, span)?;
        let id = self.primes.next_prime();

        self.publish_physics(scope, derived.with_id(id).with_constant_value(value), span)
    }

    fn derive_physics(
        &mut self,
        scope: ScopeId,
        identifier: &str,
        name: Option<&str>,
        symbol: Option<&str>,
        derivation: &Derivation,
        span: Option<Span>,
    ) -> Result<Physics, SymbolTableError> {
        self.scope(scope)?;

        match derivation {
            Derivation::None => {
                let Some(name) = name else {
                    return Err(SymbolTableError::missing_dimension_name(
                        identifier.to_string(),
                        span,
                    ));
                };

                let dimension = match self.dimension_for_name(ScopeId::ROOT, name) {
                    Some(dimension) => Arc::clone(dimension),
                    None => self.add_dimension(name, symbol.map(str::to_string), span)?,
                };

                let mut physics = self.init_physics(identifier, scope);
                physics.increment_exponent(&dimension)?;
                Ok(physics)
            }
            Derivation::Dimensionless => Ok(self.init_physics(identifier, scope)),
            Derivation::Product(factors) => {
                let mut physics = self.init_physics(identifier, scope);

                for factor in factors {
                    let base = self
                        .resolve_physics(scope, &factor.identifier)
                        .ok_or_else(|| {
                            SymbolTableError::unknown_physics(factor.identifier.clone(), span)
                        })?;

                    let mut powered = Physics::clone(base);
                    powered.multiply_exponents(factor.exponent);
                    physics.add_exponents(&powered)?;
                }

                Ok(physics)
            }
        }
    }

    /// Registers an invariant declared in `scope`
    ///
    /// The parameters are numbered `0..N` in reading order and typed from
    /// their attached physics or, failing that, from the signal named by
    /// their right child. Constraint identifiers that name a parameter are
    /// stamped with its number and physics. The id of the invariant is the
    /// product of the parameter physics ids.
    ///
    /// # Errors
    ///
    /// Returns an error if the scope is unknown, a parameter cannot be typed,
    /// or a parameter is named like a unit name or abbreviation.
    pub fn add_invariant(
        &mut self,
        scope: ScopeId,
        identifier: impl Into<String>,
        mut parameter_list: IrNode,
        mut constraints: IrNode,
        span: Option<Span>,
    ) -> Result<Arc<Invariant>, SymbolTableError> {
        self.scope(scope)?;
        let identifier = identifier.into();

        number_parameters_zero_to_n(&mut parameter_list);
        let parameters = self.typed_parameters(scope, &parameter_list)?;

        // unit names never take a binding in a constraint
        if let Some(shadowing) = parameter_list.walk().find(|node| {
            node.kind() == NodeKind::Parameter
                && node.token().is_some_and(|name| self.is_unit_name(name))
        }) {
            return Err(SymbolTableError::parameter_named_like_unit(
                shadowing.token().unwrap_or_default().to_string(),
                shadowing.span(),
            ));
        }

        let mut typed = parameters.iter();
        parameter_list.walk_mut(&mut |node| {
            if node.kind() == NodeKind::Parameter
                && let Some(parameter) = typed.next()
            {
                node.set_physics(Arc::clone(&parameter.physics));
            }
        });

        stamp_parameters(&mut constraints, &parameters, |physics, subindex| {
            self.physics_for_identifier_and_subindex(scope, &physics.identifier, subindex)
                .cloned()
        });

        let id = fingerprint(parameters.iter().map(|parameter| parameter.physics.id));
        let invariant = Arc::new(Invariant::new(
            identifier,
            scope,
            parameter_list,
            constraints,
            id,
            span,
        ));
        self.invariants.push(Arc::clone(&invariant));

        debug!(
            invariant = invariant.identifier(),
            parameters = parameters.len(),
            id,
            "invariant registered"
        );
        Ok(invariant)
    }

    /// Returns the registered invariants in registration order
    pub fn invariants(&self) -> impl Iterator<Item = &Arc<Invariant>> {
        self.invariants.iter()
    }

    /// Finds the first registered invariant named `identifier`
    #[must_use]
    pub fn invariant_for_identifier(&self, identifier: &str) -> Option<&Arc<Invariant>> {
        self.invariants
            .iter()
            .find(|invariant| invariant.identifier() == identifier)
    }

    /// Finds the first registered invariant whose parameters have the same physics
    ///
    /// The fingerprint does not depend on parameter order or names.
    ///
    /// # Errors
    ///
    /// Returns an error if a parameter of `parameter_list` cannot be typed
    /// from `scope`.
    pub fn invariant_by_parameters(
        &self,
        scope: ScopeId,
        parameter_list: &IrNode,
    ) -> Result<Option<&Arc<Invariant>>, SymbolTableError> {
        let parameters = self.typed_parameters(scope, parameter_list)?;
        let id = fingerprint(parameters.iter().map(|parameter| parameter.physics.id));

        Ok(self.invariants.iter().find(|invariant| invariant.id() == id))
    }

    fn typed_parameters(
        &self,
        scope: ScopeId,
        parameter_list: &IrNode,
    ) -> Result<Vec<TypedParameter>, SymbolTableError> {
        parameter_list
            .walk()
            .filter(|node| node.kind() == NodeKind::Parameter)
            .enumerate()
            .map(|(index, parameter)| {
                let name = parameter.token().unwrap_or_default().to_string();
                let physics = match parameter.physics() {
                    Some(physics) => Arc::clone(physics),
                    None => {
                        let signal = parameter
                            .right()
                            .and_then(IrNode::token)
                            .ok_or_else(|| {
                                SymbolTableError::unknown_parameter(name.clone(), parameter.span())
                            })?;

                        self.resolve_physics(scope, signal)
                            .map(Arc::clone)
                            .ok_or_else(|| {
                                SymbolTableError::unknown_physics(
                                    signal.to_string(),
                                    parameter.span(),
                                )
                            })?
                    }
                };

                Ok(TypedParameter {
                    name,
                    number: parameter.parameter_number().unwrap_or(index),
                    physics,
                })
            })
            .collect()
    }

    fn is_unit_name(&self, name: &str) -> bool {
        self.physics_for_dimension_alias(ScopeId::ROOT, name)
            .or_else(|| self.physics_for_dimension_alias_abbreviation(ScopeId::ROOT, name))
            .is_some()
    }

    fn find_physics(
        &self,
        scope: ScopeId,
        matches: impl Fn(&Physics) -> bool,
    ) -> Option<&Arc<Physics>> {
        self.ancestors(scope)
            .find_map(|scope| scope.physics().find(|physics| matches(physics)))
    }
}

impl Default for SymbolTable {
    fn default() -> Self {
        Self::new()
    }
}
