use crate::error::{Context, ErrorLocation};

/// Trait for types that can be converted to Newton error messages.
///
/// Every error enum in the Newton crates implements this trait so that
/// the embedding application can report symbol table, IR and checker
/// failures in one consistent format.
pub trait AsNewtonError {
    /// Returns the primary error message.
    ///
    /// This should be a concise description of what went wrong.
    fn message(&self) -> String;

    /// Returns additional context information about the error.
    ///
    /// Returns an empty vector if no context is available.
    fn context(&self) -> Vec<Context> {
        vec![]
    }

    /// Returns the location of the error in the source code.
    ///
    /// Errors that carry a span of the declaration or node at fault should
    /// resolve it against `source` here.
    fn error_location(&self, source: &str) -> Option<ErrorLocation> {
        let _ = source;
        None
    }
}
