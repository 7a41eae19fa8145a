use std::fmt;

use newton_shared::{scope::ScopeId, span::Span};

/// A base physical dimension, such as `meter` or `second`
///
/// Dimensions are registered once, in the root scope, and are never
/// modified afterwards. The exponent of a dimension only exists inside an
/// [`ExponentVector`](crate::ExponentVector); the registry entry itself
/// carries no exponent.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Dimension {
    /// The display name of the dimension, e.g. `meter`
    pub name: String,
    /// The abbreviation of the dimension, e.g. `m`
    pub abbreviation: Option<String>,
    /// The prime number that identifies this dimension
    pub prime: u64,
    /// The scope that defined the dimension
    pub scope: ScopeId,
    /// Where the dimension was declared
    pub span: Option<Span>,
}

impl Dimension {
    /// Creates a new dimension in the root scope
    #[must_use]
    pub fn new(name: impl Into<String>, abbreviation: Option<String>, prime: u64) -> Self {
        Self {
            name: name.into(),
            abbreviation,
            prime,
            scope: ScopeId::ROOT,
            span: None,
        }
    }

    /// Sets the declaration span of the dimension
    #[must_use]
    pub fn with_span(self, span: Span) -> Self {
        Self {
            span: Some(span),
            ..self
        }
    }

    /// Returns the abbreviation if there is one, otherwise the name
    #[must_use]
    pub fn short_name(&self) -> &str {
        self.abbreviation.as_deref().unwrap_or(&self.name)
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.abbreviation {
            Some(abbreviation) => write!(f, "{} ({abbreviation})", self.name),
            None => write!(f, "{}", self.name),
        }
    }
}
