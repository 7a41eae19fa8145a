//! Newton: dimension and invariant checking for physical laws
//!
//! A [`Newton`] context owns the symbol table of one compilation unit.
//! Declarations (dimensions, signals, constants and invariants) are added
//! while the description is being read. Afterwards, an invariant can be
//! checked against concrete parameter bindings, which yields a
//! [`Report`](checker::Report) with an independent value verdict and
//! dimension verdict for every constraint.
//!
//! The member crates are re-exported for callers that need the lower-level
//! pieces, such as the IR builders.

mod api;
mod error;

pub use api::Newton;
pub use error::ApiError;

pub use newton_checker as checker;
pub use newton_ir as ir;
pub use newton_physics as physics;
pub use newton_shared as shared;
pub use newton_symbol_table as symbol_table;
