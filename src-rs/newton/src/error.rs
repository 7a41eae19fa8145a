use std::fmt;

use newton_checker::CheckError;
use newton_shared::error::{AsNewtonError, Context, ErrorLocation, NewtonError};
use newton_symbol_table::SymbolTableError;

/// An error returned by the [`Newton`](crate::Newton) API
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// A declaration or lookup failed
    Symbol(SymbolTableError),
    /// A check was aborted
    Check(CheckError),
    /// No invariant with this name is registered
    UnknownInvariant {
        /// The name of the invariant
        identifier: String,
    },
}

impl ApiError {
    /// Creates a new error indicating that an invariant is not registered
    #[must_use]
    pub const fn unknown_invariant(identifier: String) -> Self {
        Self::UnknownInvariant { identifier }
    }
}

impl From<SymbolTableError> for ApiError {
    fn from(error: SymbolTableError) -> Self {
        Self::Symbol(error)
    }
}

impl From<CheckError> for ApiError {
    fn from(error: CheckError) -> Self {
        Self::Check(error)
    }
}

impl From<ApiError> for NewtonError {
    fn from(error: ApiError) -> Self {
        Self::from_error(&error)
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Symbol(error) => write!(f, "{error}"),
            Self::Check(error) => write!(f, "{error}"),
            Self::UnknownInvariant { identifier } => {
                write!(f, "invariant `{identifier}` is not defined")
            }
        }
    }
}

impl std::error::Error for ApiError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Symbol(error) => Some(error),
            Self::Check(error) => Some(error),
            Self::UnknownInvariant { .. } => None,
        }
    }
}

impl AsNewtonError for ApiError {
    fn message(&self) -> String {
        self.to_string()
    }

    fn context(&self) -> Vec<Context> {
        match self {
            Self::Symbol(error) => error.context(),
            Self::Check(error) => error.context(),
            Self::UnknownInvariant { .. } => vec![],
        }
    }

    fn error_location(&self, source: &str) -> Option<ErrorLocation> {
        match self {
            Self::Symbol(error) => error.error_location(source),
            Self::Check(error) => error.error_location(source),
            Self::UnknownInvariant { .. } => None,
        }
    }
}
