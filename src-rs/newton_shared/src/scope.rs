//! Handles for scopes in the symbol table

use std::fmt;

/// An opaque handle to a scope owned by a symbol table
///
/// Scopes live in an arena inside the symbol table, and a `ScopeId` is the
/// index of a scope in that arena. The handle is only meaningful for the
/// table that created it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ScopeId(usize);

impl ScopeId {
    /// The root scope of every symbol table
    pub const ROOT: Self = Self(0);

    /// Creates a new scope handle from an arena index
    #[must_use]
    pub const fn new(index: usize) -> Self {
        Self(index)
    }

    /// Returns the arena index of the scope
    #[must_use]
    pub const fn index(self) -> usize {
        self.0
    }

    /// Returns true if this is the root scope
    #[must_use]
    pub const fn is_root(self) -> bool {
        self.0 == Self::ROOT.0
    }
}

impl fmt::Display for ScopeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "scope #{}", self.0)
    }
}
