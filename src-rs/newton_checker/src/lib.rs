//! Constraint checking for the Newton dimension checker
//!
//! An invariant is checked by walking each of its constraints twice at
//! once: the value track evaluates both sides numerically from the
//! parameter bindings, and the dimension track propagates exponent vectors
//! through the same expressions. The two tracks fail independently and
//! both verdicts end up in the [`ConstraintReport`].
//!
//! A tree that does not have the shape the grammar guarantees is a
//! [`CheckError`] and aborts the check. A value or dimension mismatch is
//! only reported.

mod check;
mod error;
mod evaluate;
mod options;
mod report;

pub use check::{check_expression_or_statement, satisfies_constraints};
pub use error::CheckError;
pub use options::CheckOptions;
pub use report::{ConstraintReport, Report};
