use std::sync::Arc;

use newton_checker::{CheckOptions, ConstraintReport, Report};
use newton_ir::IrNode;
use newton_physics::{Dimension, Physics};
use newton_shared::{scope::ScopeId, span::Span};
use newton_symbol_table::{BaseSignal, Derivation, Invariant, SymbolTable};
use tracing::debug;

use crate::error::ApiError;

/// The checking context of one compilation unit
///
/// Declarations are made while the description is read. Queries and checks
/// are made afterwards, against the same table.
#[derive(Debug, Clone, Default)]
pub struct Newton {
    table: SymbolTable,
    options: CheckOptions,
}

impl Newton {
    /// Creates an empty context with the default check options
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the options used by every check
    #[must_use]
    pub fn with_options(mut self, options: CheckOptions) -> Self {
        self.options = options;
        self
    }

    /// Returns the options used by every check
    #[must_use]
    pub const fn options(&self) -> CheckOptions {
        self.options
    }

    /// Returns the symbol table built by the declarations so far
    #[must_use]
    pub const fn table(&self) -> &SymbolTable {
        &self.table
    }

    /// Opens a child scope of `parent`
    ///
    /// # Errors
    ///
    /// Returns an error if `parent` is not a scope of this context.
    pub fn open_scope(
        &mut self,
        parent: ScopeId,
        begin: Option<Span>,
    ) -> Result<ScopeId, ApiError> {
        Ok(self.table.open_scope(parent, begin)?)
    }

    /// Closes `scope`
    ///
    /// # Errors
    ///
    /// Returns an error if `scope` is not a scope of this context.
    pub fn close_scope(&mut self, scope: ScopeId, end: Span) -> Result<(), ApiError> {
        Ok(self.table.close_scope(scope, end)?)
    }

    /// Registers a base dimension
    ///
    /// # Errors
    ///
    /// Returns an error if the dimension is already registered.
    pub fn add_dimension(
        &mut self,
        name: impl Into<String>,
        abbreviation: Option<String>,
        span: Option<Span>,
    ) -> Result<Arc<Dimension>, ApiError> {
        Ok(self.table.add_dimension(name, abbreviation, span)?)
    }

    /// Returns the physics of `identifier` in `scope`, creating a dimensionless one if needed
    ///
    /// # Errors
    ///
    /// Returns an error if `scope` is not a scope of this context.
    pub fn add_physics_for_token(
        &mut self,
        scope: ScopeId,
        identifier: &str,
    ) -> Result<Arc<Physics>, ApiError> {
        Ok(self.table.add_or_lookup_physics(scope, identifier)?)
    }

    /// Declares a signal, returning one physics per component
    ///
    /// # Errors
    ///
    /// Returns an error if the declaration is rejected by the symbol table.
    pub fn declare_base_signal(
        &mut self,
        scope: ScopeId,
        signal: BaseSignal,
    ) -> Result<Vec<Arc<Physics>>, ApiError> {
        Ok(self.table.declare_base_signal(scope, signal)?)
    }

    /// Declares a constant with a concrete value
    ///
    /// # Errors
    ///
    /// Returns an error if the declaration is rejected by the symbol table.
    pub fn declare_constant(
        &mut self,
        scope: ScopeId,
        identifier: &str,
        value: f64,
        derivation: &Derivation,
        span: Option<Span>,
    ) -> Result<Arc<Physics>, ApiError> {
        Ok(self
            .table
            .declare_constant(scope, identifier, value, derivation, span)?)
    }

    /// Registers an invariant
    ///
    /// # Errors
    ///
    /// Returns an error if a parameter cannot be typed in `scope`.
    pub fn add_invariant(
        &mut self,
        scope: ScopeId,
        identifier: impl Into<String>,
        parameter_list: IrNode,
        constraints: IrNode,
        span: Option<Span>,
    ) -> Result<Arc<Invariant>, ApiError> {
        Ok(self
            .table
            .add_invariant(scope, identifier, parameter_list, constraints, span)?)
    }

    /// Returns the physics named `name` as seen from the root scope
    ///
    /// The name may be an identifier, a unit name or a unit abbreviation.
    #[must_use]
    pub fn physics_type_by_name(&self, name: &str) -> Option<&Arc<Physics>> {
        self.table.resolve_physics(ScopeId::ROOT, name)
    }

    /// Returns the component `subindex` of the physics named `name` at the root scope
    #[must_use]
    pub fn physics_type_by_name_and_subindex(
        &self,
        name: &str,
        subindex: usize,
    ) -> Option<&Arc<Physics>> {
        self.table
            .physics_for_identifier_and_subindex(ScopeId::ROOT, name, subindex)
    }

    /// Finds the first registered invariant named `name`
    #[must_use]
    pub fn invariant_by_name(&self, name: &str) -> Option<&Arc<Invariant>> {
        self.table.invariant_for_identifier(name)
    }

    /// Finds the invariant whose parameters have the physics of `parameter_list`
    ///
    /// # Errors
    ///
    /// Returns an error if a parameter cannot be typed in `scope`.
    pub fn invariant_by_parameters(
        &self,
        scope: ScopeId,
        parameter_list: &IrNode,
    ) -> Result<Option<&Arc<Invariant>>, ApiError> {
        Ok(self.table.invariant_by_parameters(scope, parameter_list)?)
    }

    /// Checks `invariant` against `bindings`
    ///
    /// # Errors
    ///
    /// Returns an error if the check is aborted.
    pub fn satisfies_constraints(
        &self,
        invariant: &Invariant,
        bindings: &IrNode,
    ) -> Result<Report, ApiError> {
        Ok(newton_checker::satisfies_constraints(
            &self.table,
            invariant,
            bindings,
            self.options,
        )?)
    }

    /// Checks the invariant named `name` against `bindings`
    ///
    /// # Errors
    ///
    /// Returns an error if no invariant is named `name` or the check is aborted.
    pub fn check_invariant(&self, name: &str, bindings: &IrNode) -> Result<Report, ApiError> {
        let invariant = self
            .invariant_by_name(name)
            .ok_or_else(|| ApiError::unknown_invariant(name.to_string()))?;

        let report = self.satisfies_constraints(invariant, bindings)?;
        debug!(invariant = name, satisfied = report.is_satisfied(), "invariant checked");
        Ok(report)
    }

    /// Checks the dimensions of the statement `tree` as seen from `scope`
    ///
    /// # Errors
    ///
    /// Returns an error if the statement cannot be checked.
    pub fn dimension_check_tree(
        &self,
        scope: ScopeId,
        tree: &IrNode,
    ) -> Result<ConstraintReport, ApiError> {
        Ok(newton_checker::check_expression_or_statement(
            &self.table,
            scope,
            tree,
            self.options,
        )?)
    }
}
