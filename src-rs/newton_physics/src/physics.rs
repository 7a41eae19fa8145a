use std::{fmt, sync::Arc};

use newton_shared::scope::ScopeId;

use crate::{dimension::Dimension, error::PhysicsError, exponent::ExponentVector};

/// The unit signature of a quantity, signal or constant
///
/// Published physics live behind an `Arc` in the symbol table and are never
/// mutated after publication. Expression evaluation clones the parts it
/// needs (usually only [`Physics::dimensions`]) and works on the copy.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Physics {
    /// The identifier the quantity was declared with, e.g. `acceleration`
    pub identifier: String,
    /// A prime fingerprint of the quantity
    pub id: u64,
    /// The component of a multi-axis signal that this physics describes
    pub subindex: usize,
    /// The scope that owns the physics
    pub scope: ScopeId,
    /// Whether the quantity is a vector
    pub is_vector: bool,
    /// Whether the quantity is a constant with a fixed value
    pub is_constant: bool,
    /// The value of the quantity, if it has one
    pub value: Option<f64>,
    /// The exponent vector over the dimension registry
    pub dimensions: ExponentVector,
    /// The human unit name, e.g. `meter`
    pub dimension_alias: Option<String>,
    /// The human unit abbreviation, e.g. `m`
    pub dimension_alias_abbreviation: Option<String>,
}

impl Physics {
    /// Creates a dimensionless physics over the given registry
    ///
    /// Every quantity starts dimensionless and acquires dimensions only
    /// through exponent arithmetic.
    #[must_use]
    pub fn new<'a>(
        identifier: impl Into<String>,
        scope: ScopeId,
        registry: impl IntoIterator<Item = &'a Arc<Dimension>>,
    ) -> Self {
        Self {
            identifier: identifier.into(),
            id: 1,
            subindex: 0,
            scope,
            is_vector: false,
            is_constant: false,
            value: None,
            dimensions: ExponentVector::dimensionless(registry),
            dimension_alias: None,
            dimension_alias_abbreviation: None,
        }
    }

    /// Sets the prime fingerprint of the physics
    #[must_use]
    pub fn with_id(self, id: u64) -> Self {
        Self { id, ..self }
    }

    /// Sets the subindex of the physics
    #[must_use]
    pub fn with_subindex(self, subindex: usize) -> Self {
        Self { subindex, ..self }
    }

    /// Sets the unit name and abbreviation of the physics
    #[must_use]
    pub fn with_alias(self, alias: Option<String>, abbreviation: Option<String>) -> Self {
        Self {
            dimension_alias: alias,
            dimension_alias_abbreviation: abbreviation,
            ..self
        }
    }

    /// Marks the physics as a constant with the given value
    #[must_use]
    pub fn with_constant_value(self, value: f64) -> Self {
        Self {
            is_constant: true,
            value: Some(value),
            ..self
        }
    }

    /// Marks the physics as a vector quantity
    #[must_use]
    pub fn as_vector(self) -> Self {
        Self {
            is_vector: true,
            ..self
        }
    }

    /// Checks if every exponent of the physics is zero
    #[must_use]
    pub fn is_dimensionless(&self) -> bool {
        self.dimensions.is_dimensionless()
    }

    /// Adds the exponents of `other`, as when multiplying by `other`
    ///
    /// # Errors
    ///
    /// Returns an error if the two physics were built from different registries.
    pub fn add_exponents(&mut self, other: &Self) -> Result<(), PhysicsError> {
        self.dimensions.add_exponents(&other.dimensions)
    }

    /// Subtracts the exponents of `other`, as when dividing by `other`
    ///
    /// # Errors
    ///
    /// Returns an error if the two physics were built from different registries.
    pub fn subtract_exponents(&mut self, other: &Self) -> Result<(), PhysicsError> {
        self.dimensions.subtract_exponents(&other.dimensions)
    }

    /// Multiplies every exponent by `scalar`, as when raising to a power
    pub fn multiply_exponents(&mut self, scalar: f64) {
        self.dimensions.multiply_exponents(scalar);
    }

    /// Adds 1 to the exponent of `dimension`
    ///
    /// # Errors
    ///
    /// Returns an error if the dimension is not in the registry the physics was built from.
    pub fn increment_exponent(&mut self, dimension: &Dimension) -> Result<(), PhysicsError> {
        self.dimensions.increment_exponent(dimension)
    }
}

impl fmt::Display for Physics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.identifier)?;
        if self.subindex != 0 {
            write!(f, "@{}", self.subindex)?;
        }
        write!(f, " : {}", self.dimensions)
    }
}

/// Checks if a physics is absent or has only zero exponents
///
/// An absent physics is compatible with anything.
#[must_use]
pub fn is_dimensionless(physics: Option<&Physics>) -> bool {
    physics.is_none_or(Physics::is_dimensionless)
}

/// Checks if two physics have the same dimensions
///
/// Two absent or dimensionless physics are always equivalent. Otherwise the
/// exponent vectors must share a registry and have exactly equal entries.
#[must_use]
pub fn are_equivalent(left: Option<&Physics>, right: Option<&Physics>) -> bool {
    if is_dimensionless(left) && is_dimensionless(right) {
        return true;
    }

    match (left, right) {
        (Some(left), Some(right)) => left.dimensions.is_equivalent(&right.dimensions),
        (None, _) | (_, None) => false,
    }
}
