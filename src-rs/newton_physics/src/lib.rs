//! The physics model of the Newton dimension checker
//!
//! A [`Physics`] is the unit signature of a quantity: an exponent vector
//! parallel to the ordered set of base [`Dimension`]s declared for a
//! compilation unit, together with the quantity's identity, value and flags.
//!
//! Unit algebra is implemented as exponent arithmetic:
//!
//! - multiplying two quantities adds their exponents
//! - dividing subtracts them
//! - raising a quantity to a power multiplies every exponent by that power
//!
//! Two signatures are equivalent when their exponents are exactly equal.
//! A missing signature and a dimensionless one are compatible with each other.

mod dimension;
mod error;
mod exponent;
mod fingerprint;
mod physics;

pub use dimension::Dimension;
pub use error::PhysicsError;
pub use exponent::{Exponent, ExponentVector};
pub use fingerprint::{PrimeAllocator, fingerprint};
pub use physics::{Physics, are_equivalent, is_dimensionless};
