use std::{fmt, sync::Arc};

use crate::{dimension::Dimension, error::PhysicsError};

/// The exponent of one base dimension inside a physics signature
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Exponent {
    /// The base dimension
    pub dimension: Arc<Dimension>,
    /// The exponent of the dimension, which may be fractional
    pub value: f64,
}

/// An exponent vector parallel to the dimension registry
///
/// Every vector built from the same registry has exactly one entry per
/// registered dimension, in registration order. For example, with the
/// registry `[second, meter]`, an acceleration is `[-2.0, 1.0]`.
///
/// The registry only grows, so a vector created before a dimension was
/// registered is a prefix of a newer one. Missing trailing entries read as
/// zero.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ExponentVector(Vec<Exponent>);

impl ExponentVector {
    /// Creates a dimensionless vector with one zero entry per dimension
    #[must_use]
    pub fn dimensionless<'a>(registry: impl IntoIterator<Item = &'a Arc<Dimension>>) -> Self {
        Self(
            registry
                .into_iter()
                .map(|dimension| Exponent {
                    dimension: Arc::clone(dimension),
                    value: 0.0,
                })
                .collect(),
        )
    }

    /// Returns the number of entries in the vector
    #[must_use]
    pub const fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if the vector has no entries
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns an iterator over the entries of the vector
    pub fn iter(&self) -> impl Iterator<Item = &Exponent> {
        self.0.iter()
    }

    /// Returns the exponent of the dimension with the given name
    #[must_use]
    pub fn exponent_of(&self, name: &str) -> Option<f64> {
        self.0
            .iter()
            .find(|exponent| exponent.dimension.name == name)
            .map(|exponent| exponent.value)
    }

    /// Checks if every exponent is exactly zero
    #[must_use]
    pub fn is_dimensionless(&self) -> bool {
        self.0.iter().all(|exponent| exponent.value == 0.0)
    }

    /// Adds the exponents of `other` to `self`
    ///
    /// This is the dimensional effect of multiplying two quantities.
    ///
    /// # Errors
    ///
    /// Returns an error if the vectors come from different registries.
    pub fn add_exponents(&mut self, other: &Self) -> Result<(), PhysicsError> {
        self.zip_with(other, |dest, src| dest + src)
    }

    /// Subtracts the exponents of `other` from `self`
    ///
    /// This is the dimensional effect of dividing two quantities.
    ///
    /// # Errors
    ///
    /// Returns an error if the vectors come from different registries.
    pub fn subtract_exponents(&mut self, other: &Self) -> Result<(), PhysicsError> {
        self.zip_with(other, |dest, src| dest - src)
    }

    /// Multiplies every exponent by `scalar`
    ///
    /// This is the dimensional effect of raising a quantity to the power
    /// `scalar`. Fractional powers are allowed, so `frequency ** 0.5` has an
    /// exponent of `-0.5` for time.
    pub fn multiply_exponents(&mut self, scalar: f64) {
        for exponent in &mut self.0 {
            exponent.value *= scalar;
        }
    }

    /// Adds 1 to the exponent of `dimension`
    ///
    /// The slot is matched by the dimension's prime, not by its name.
    ///
    /// # Errors
    ///
    /// Returns an error if the dimension is not part of the vector.
    pub fn increment_exponent(&mut self, dimension: &Dimension) -> Result<(), PhysicsError> {
        let exponent = self
            .0
            .iter_mut()
            .find(|exponent| exponent.dimension.prime == dimension.prime)
            .ok_or_else(|| PhysicsError::unknown_dimension(dimension.name.clone()))?;

        exponent.value += 1.0;
        Ok(())
    }

    /// Checks if two vectors share a registry and have exactly equal exponents
    #[must_use]
    pub fn is_equivalent(&self, other: &Self) -> bool {
        let longest = self.0.len().max(other.0.len());

        #[expect(
            clippy::float_cmp,
            reason = "dimensional equivalence uses exact exponent equality"
        )]
        let equal = self.check_registry(other).is_ok()
            && (0..longest).all(|index| self.value_at(index) == other.value_at(index));

        equal
    }

    fn value_at(&self, index: usize) -> f64 {
        self.0.get(index).map_or(0.0, |exponent| exponent.value)
    }

    fn check_registry(&self, other: &Self) -> Result<(), PhysicsError> {
        let mismatch = self
            .0
            .iter()
            .zip(&other.0)
            .find(|(left, right)| left.dimension.prime != right.dimension.prime);

        match mismatch {
            Some((left, right)) => Err(PhysicsError::registry_mismatch(
                left.dimension.name.clone(),
                right.dimension.name.clone(),
            )),
            None => Ok(()),
        }
    }

    fn zip_with(&mut self, other: &Self, op: impl Fn(f64, f64) -> f64) -> Result<(), PhysicsError> {
        self.check_registry(other)?;

        if let Some(missing) = other.0.get(self.0.len()..) {
            self.0.extend(missing.iter().map(|exponent| Exponent {
                dimension: Arc::clone(&exponent.dimension),
                value: 0.0,
            }));
        }

        for (index, dest) in self.0.iter_mut().enumerate() {
            let src = other.0.get(index).map_or(0.0, |exponent| exponent.value);
            dest.value = op(dest.value, src);
        }

        Ok(())
    }
}

impl fmt::Display for ExponentVector {
    /// Formats the vector as a product of dimensions, such as `m*s^-2`
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut nonzero = self.0.iter().filter(|exponent| exponent.value != 0.0).peekable();

        if nonzero.peek().is_none() {
            return write!(f, "1");
        }

        let mut first = true;
        for exponent in nonzero {
            if !first {
                write!(f, "*")?;
            }
            first = false;

            write!(f, "{}", exponent.dimension.short_name())?;

            #[expect(clippy::float_cmp, reason = "an exponent of exactly 1 is omitted")]
            let is_one = exponent.value == 1.0;
            if !is_one {
                write!(f, "^{}", exponent.value)?;
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry() -> Vec<Arc<Dimension>> {
        vec![
            Arc::new(Dimension::new("second", Some("s".to_string()), 2)),
            Arc::new(Dimension::new("meter", Some("m".to_string()), 3)),
            Arc::new(Dimension::new("kilogram", Some("kg".to_string()), 5)),
        ]
    }

    fn vector(values: [f64; 3]) -> ExponentVector {
        let mut vector = ExponentVector::dimensionless(&registry());
        for (exponent, value) in vector.0.iter_mut().zip(values) {
            exponent.value = value;
        }
        vector
    }

    #[test]
    fn dimensionless_has_one_zero_per_dimension() {
        let vector = ExponentVector::dimensionless(&registry());

        assert_eq!(vector.len(), 3);
        assert!(vector.is_dimensionless());
        assert_eq!(vector.to_string(), "1");
    }

    #[test]
    fn add_then_subtract_restores_original() {
        let original = vector([-2.0, 1.0, 0.0]);
        let other = vector([1.0, 3.0, -1.0]);

        let mut result = original.clone();
        result.add_exponents(&other).expect("same registry");
        assert_eq!(result.exponent_of("meter"), Some(4.0));

        result.subtract_exponents(&other).expect("same registry");
        assert!(result.is_equivalent(&original));
    }

    #[test]
    fn multiply_supports_fractional_powers() {
        // frequency ** 0.5
        let mut frequency = vector([-1.0, 0.0, 0.0]);

        frequency.multiply_exponents(0.5);

        assert_eq!(frequency.exponent_of("second"), Some(-0.5));
        assert_eq!(frequency.to_string(), "s^-0.5");
    }

    #[test]
    fn increment_matches_by_prime() {
        let mut vector = ExponentVector::dimensionless(&registry());
        // same prime as `meter` but a different name
        let renamed = Dimension::new("metre", None, 3);

        vector.increment_exponent(&renamed).expect("prime is registered");

        assert_eq!(vector.exponent_of("meter"), Some(1.0));
    }

    #[test]
    fn increment_unknown_dimension_fails() {
        let mut vector = ExponentVector::dimensionless(&registry());
        let ampere = Dimension::new("ampere", Some("A".to_string()), 7);

        let result = vector.increment_exponent(&ampere);

        assert_eq!(
            result,
            Err(PhysicsError::unknown_dimension("ampere".to_string()))
        );
    }

    #[test]
    fn older_vector_is_padded_with_zeros() {
        // a vector created before `kilogram` was registered
        let mut short = ExponentVector::dimensionless(&registry()[..2]);
        let mass = vector([0.0, 0.0, 1.0]);

        short.add_exponents(&mass).expect("prefix of the same registry");

        assert_eq!(short.len(), 3);
        assert_eq!(short.exponent_of("kilogram"), Some(1.0));
        assert!(ExponentVector::dimensionless(&registry()[..1]).is_equivalent(&vector([0.0; 3])));
    }

    #[test]
    fn foreign_registry_is_rejected() {
        let mut local = vector([1.0, 0.0, 0.0]);
        let foreign = ExponentVector::dimensionless(&[Arc::new(Dimension::new(
            "candela",
            None,
            11,
        ))]);

        let result = local.add_exponents(&foreign);

        assert_eq!(
            result,
            Err(PhysicsError::registry_mismatch(
                "second".to_string(),
                "candela".to_string()
            ))
        );
        assert!(!local.is_equivalent(&foreign));
    }

    #[test]
    fn display_lists_nonzero_dimensions() {
        let acceleration = vector([-2.0, 1.0, 0.0]);
        assert_eq!(acceleration.to_string(), "s^-2*m");
    }
}
