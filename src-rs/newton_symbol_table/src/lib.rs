//! Scoped symbol table for the Newton dimension checker
//!
//! The [`SymbolTable`] owns every scope of a compilation unit in an arena.
//! The root scope holds the dimension registry. Every scope holds the
//! physics declared in it, and the table keeps the registration list of
//! invariants.
//!
//! Declarations only ever look at the local scope. Lookups search the
//! local scope first and then walk the parent chain up to the root.

mod declare;
mod error;
mod invariant;
mod scope;
mod table;

#[cfg(test)]
mod test;

pub use declare::{BaseSignal, Derivation, DerivationFactor, SubindexRange};
pub use error::SymbolTableError;
pub use invariant::Invariant;
pub use scope::Scope;
pub use table::SymbolTable;
