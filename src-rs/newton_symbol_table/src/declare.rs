//! Declarations of base signals and constants

use newton_shared::span::Span;

/// How the dimensions of a signal or constant are derived
#[derive(Debug, Clone, PartialEq)]
pub enum Derivation {
    /// The signal is itself a base dimension, named by the signal's `name`
    None,
    /// The signal has no dimensions
    Dimensionless,
    /// The signal is a product of powers of other signals
    Product(Vec<DerivationFactor>),
}

/// One factor `identifier ** exponent` of a derived signal
#[derive(Debug, Clone, PartialEq)]
pub struct DerivationFactor {
    /// The identifier, unit name or unit abbreviation of the factor
    pub identifier: String,
    /// The power the factor is raised to
    pub exponent: f64,
}

impl DerivationFactor {
    /// Creates a factor `identifier ** exponent`
    #[must_use]
    pub fn new(identifier: impl Into<String>, exponent: f64) -> Self {
        Self {
            identifier: identifier.into(),
            exponent,
        }
    }
}

/// An inclusive range of subindices, as in `i : 0 to 2`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubindexRange {
    /// The first subindex
    pub start: usize,
    /// The last subindex
    pub end: usize,
}

/// A signal declaration
///
/// ```text
/// distance : signal = {
///     name = meter English;
///     symbol = m;
///     derivation = none;
/// }
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct BaseSignal {
    /// The identifier of the signal, e.g. `distance`
    pub identifier: String,
    /// The unit name, e.g. `meter`
    pub name: Option<String>,
    /// The unit abbreviation, e.g. `m`
    pub symbol: Option<String>,
    /// How the dimensions of the signal are derived
    pub derivation: Derivation,
    /// The components of a multi-axis signal
    pub subindices: Option<SubindexRange>,
    /// Where the signal was declared
    pub span: Option<Span>,
}

impl BaseSignal {
    /// Creates a signal declaration without unit names
    #[must_use]
    pub fn new(identifier: impl Into<String>, derivation: Derivation) -> Self {
        Self {
            identifier: identifier.into(),
            name: None,
            symbol: None,
            derivation,
            subindices: None,
            span: None,
        }
    }

    /// Sets the unit name of the signal
    #[must_use]
    pub fn with_name(self, name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..self
        }
    }

    /// Sets the unit abbreviation of the signal
    #[must_use]
    pub fn with_symbol(self, symbol: impl Into<String>) -> Self {
        Self {
            symbol: Some(symbol.into()),
            ..self
        }
    }

    /// Declares one component per subindex in `start..=end`
    #[must_use]
    pub fn with_subindices(self, start: usize, end: usize) -> Self {
        Self {
            subindices: Some(SubindexRange { start, end }),
            ..self
        }
    }

    /// Sets the declaration span of the signal
    #[must_use]
    pub fn with_span(self, span: Span) -> Self {
        Self {
            span: Some(span),
            ..self
        }
    }
}

#[cfg(test)]
mod tests {
    use newton_shared::scope::ScopeId;

    use super::*;
    use crate::{SymbolTable, SymbolTableError, test::construct::kinematics};

    #[test]
    fn base_signal_registers_its_dimension() {
        let table = kinematics();

        let Some(time) = table.physics_for_identifier(ScopeId::ROOT, "time") else {
            panic!("expected `time` to be declared");
        };

        // created before `meter` was registered
        assert_eq!(time.dimensions.len(), 1);
        assert_eq!(time.dimensions.exponent_of("second"), Some(1.0));
        assert_eq!(time.dimension_alias.as_deref(), Some("second"));
        assert!(table.dimension_for_name(ScopeId::ROOT, "meter").is_some());
    }

    #[test]
    fn derived_signal_combines_factors() {
        let table = kinematics();

        let Some(acceleration) = table.physics_for_identifier(ScopeId::ROOT, "acceleration")
        else {
            panic!("expected `acceleration` to be declared");
        };

        assert_eq!(acceleration.dimensions.len(), 2);
        assert_eq!(acceleration.dimensions.exponent_of("second"), Some(-2.0));
        assert_eq!(acceleration.dimensions.exponent_of("meter"), Some(1.0));
    }

    #[test]
    fn derivation_may_name_a_unit() {
        let mut table = kinematics();
        let speed = Derivation::Product(vec![
            DerivationFactor::new("meter", 1.0),
            DerivationFactor::new("s", -1.0),
        ]);

        let Ok(components) =
            table.declare_base_signal(ScopeId::ROOT, BaseSignal::new("speed", speed))
        else {
            panic!("expected `speed` to be declared");
        };

        let [speed] = components.as_slice() else {
            panic!("expected a single component");
        };
        assert_eq!(speed.dimensions.exponent_of("second"), Some(-1.0));
        assert_eq!(speed.dimensions.exponent_of("meter"), Some(1.0));
    }

    #[test]
    fn unknown_factor_is_rejected() {
        let mut table = kinematics();
        let signal = BaseSignal::new(
            "jerk",
            Derivation::Product(vec![DerivationFactor::new("furlong", 1.0)]),
        );

        let result = table.declare_base_signal(ScopeId::ROOT, signal);

        assert_eq!(
            result,
            Err(SymbolTableError::unknown_physics("furlong".to_string(), None))
        );
    }

    #[test]
    fn subindex_range_declares_one_component_each() {
        let mut table = kinematics();
        let distance = Derivation::Product(vec![DerivationFactor::new("distance", 1.0)]);
        let signal = BaseSignal::new("position", distance).with_subindices(0, 2);

        let Ok(components) = table.declare_base_signal(ScopeId::ROOT, signal) else {
            panic!("expected `position` to be declared");
        };

        assert_eq!(
            components
                .iter()
                .map(|component| component.subindex)
                .collect::<Vec<_>>(),
            [0, 1, 2]
        );
        assert_ne!(components[0].id, components[1].id);
        let Some(y) = table.physics_for_identifier_and_subindex(ScopeId::ROOT, "position", 1)
        else {
            panic!("expected `position@1` to be declared");
        };
        assert_eq!(y.id, components[1].id);
    }

    #[test]
    fn empty_subindex_range_is_rejected() {
        let mut table = SymbolTable::new();
        let signal = BaseSignal::new("axis", Derivation::Dimensionless).with_subindices(3, 1);

        let result = table.declare_base_signal(ScopeId::ROOT, signal);

        assert_eq!(
            result,
            Err(SymbolTableError::invalid_subindex_range("axis".to_string(), 3, 1))
        );
    }

    #[test]
    fn base_dimension_requires_a_name() {
        let mut table = SymbolTable::new();

        let result =
            table.declare_base_signal(ScopeId::ROOT, BaseSignal::new("time", Derivation::None));

        assert_eq!(
            result,
            Err(SymbolTableError::missing_dimension_name("time".to_string(), None))
        );
    }

    #[test]
    fn constant_carries_its_value() {
        let table = kinematics();

        let Some(g) = table.physics_for_identifier(ScopeId::ROOT, "g") else {
            panic!("expected `g` to be declared");
        };

        assert!(g.is_constant);
        assert_eq!(g.value, Some(9.8));
        assert_eq!(g.dimensions.exponent_of("second"), Some(-2.0));
    }

    #[test]
    fn redeclaring_in_the_same_scope_is_rejected() {
        let mut table = kinematics();

        let result =
            table.declare_constant(ScopeId::ROOT, "g", 9.81, &Derivation::Dimensionless, None);

        assert_eq!(
            result,
            Err(SymbolTableError::duplicate_physics("g".to_string(), 0, None))
        );
    }
}
