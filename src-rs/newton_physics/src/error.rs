use std::fmt;

use newton_shared::error::{AsNewtonError, Context};

/// An error from exponent arithmetic
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PhysicsError {
    /// The two exponent vectors were built from different registries
    RegistryMismatch {
        /// The dimension held by the destination slot
        expected: String,
        /// The dimension held by the same slot of the source
        found: String,
    },
    /// The dimension does not appear in the exponent vector
    UnknownDimension {
        /// The name of the dimension
        name: String,
    },
}

impl PhysicsError {
    /// Creates a new error indicating that two exponent vectors disagree on a slot
    #[must_use]
    pub const fn registry_mismatch(expected: String, found: String) -> Self {
        Self::RegistryMismatch { expected, found }
    }

    /// Creates a new error indicating that a dimension is not in the exponent vector
    #[must_use]
    pub const fn unknown_dimension(name: String) -> Self {
        Self::UnknownDimension { name }
    }
}

impl fmt::Display for PhysicsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RegistryMismatch { expected, found } => write!(
                f,
                "exponent slot holds dimension `{found}`, expected `{expected}`"
            ),
            Self::UnknownDimension { name } => {
                write!(f, "dimension `{name}` is not part of the exponent vector")
            }
        }
    }
}

impl std::error::Error for PhysicsError {}

impl AsNewtonError for PhysicsError {
    fn message(&self) -> String {
        self.to_string()
    }

    fn context(&self) -> Vec<Context> {
        match self {
            Self::RegistryMismatch { .. } => vec![Context::Note(
                "the two quantities were built from different dimension registries".to_string(),
            )],
            Self::UnknownDimension { .. } => vec![],
        }
    }
}
