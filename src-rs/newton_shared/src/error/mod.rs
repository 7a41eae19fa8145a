//! Errors for the Newton dimension checker

mod context;
mod location;
mod traits;

use std::fmt;

pub use context::Context;
pub use location::ErrorLocation;
pub use traits::AsNewtonError;

/// Unified error representation for Newton
///
/// Each Newton crate has its own error enum. Any of them can be converted
/// into a `NewtonError`, which is the form handed to the embedding
/// application for display: a message, optional context and, when the
/// source text is available, the location of the offending declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewtonError {
    message: String,
    location: Option<ErrorLocation>,
    context: Vec<Context>,
}

impl NewtonError {
    /// Creates a new `NewtonError` from an error that implements `AsNewtonError`
    ///
    /// The resulting error has no source location. Use
    /// [`NewtonError::from_error_with_source`] when the source text is at hand.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use newton_shared::error::{AsNewtonError, NewtonError};
    ///
    /// struct SimpleError(String);
    ///
    /// impl AsNewtonError for SimpleError {
    ///     fn message(&self) -> String {
    ///         self.0.clone()
    ///     }
    /// }
    ///
    /// let error = NewtonError::from_error(&SimpleError("unknown dimension".to_string()));
    /// assert_eq!(error.message(), "unknown dimension");
    /// assert!(error.location().is_none());
    /// ```
    pub fn from_error(error: &impl AsNewtonError) -> Self {
        Self {
            message: error.message(),
            location: None,
            context: error.context(),
        }
    }

    /// Creates a new `NewtonError` and resolves its location against `source`
    pub fn from_error_with_source(error: &impl AsNewtonError, source: &str) -> Self {
        Self {
            message: error.message(),
            location: error.error_location(source),
            context: error.context(),
        }
    }

    /// Creates a new `NewtonError`, resolving its location only if `source` is given
    pub fn from_error_with_optional_source(error: &impl AsNewtonError, source: Option<&str>) -> Self {
        match source {
            Some(source) => Self::from_error_with_source(error, source),
            None => Self::from_error(error),
        }
    }

    /// Returns the human-readable error message
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns the source location, if one was resolved
    #[must_use]
    pub const fn location(&self) -> Option<&ErrorLocation> {
        self.location.as_ref()
    }

    /// Returns the context attached to the error
    #[must_use]
    pub fn context(&self) -> &[Context] {
        &self.context
    }
}

impl fmt::Display for NewtonError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.location {
            Some(location) => write!(
                f,
                "{}:{}: {}",
                location.line(),
                location.column(),
                self.message
            )?,
            None => write!(f, "{}", self.message)?,
        }

        for context in &self.context {
            write!(f, "\n  = {context}")?;
        }

        Ok(())
    }
}

impl std::error::Error for NewtonError {}
