use std::fmt;

use newton_physics::PhysicsError;
use newton_shared::{
    error::{AsNewtonError, Context, ErrorLocation},
    scope::ScopeId,
    span::Span,
};

/// An error raised while declaring or resolving symbols
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SymbolTableError {
    /// The scope handle does not belong to this table
    UnknownScope {
        /// The unknown scope
        scope: ScopeId,
    },
    /// A dimension with the same name is already registered
    DuplicateDimension {
        /// The name of the dimension
        name: String,
        /// Where the second declaration was made
        span: Option<Span>,
    },
    /// No dimension with this name is registered
    UnknownDimension {
        /// The name of the dimension
        name: String,
    },
    /// A base signal without a derivation gives no dimension name
    MissingDimensionName {
        /// The identifier of the signal
        identifier: String,
        /// Where the signal was declared
        span: Option<Span>,
    },
    /// No physics with this identifier, alias or abbreviation is visible
    UnknownPhysics {
        /// The identifier that was looked up
        identifier: String,
        /// Where the identifier was used
        span: Option<Span>,
    },
    /// A physics with the same identifier and subindex already exists in the scope
    DuplicatePhysics {
        /// The identifier of the physics
        identifier: String,
        /// The subindex of the physics
        subindex: usize,
        /// Where the second declaration was made
        span: Option<Span>,
    },
    /// The subindex range ends before it starts
    InvalidSubindexRange {
        /// The identifier of the signal
        identifier: String,
        /// The first subindex
        start: usize,
        /// The last subindex
        end: usize,
    },
    /// A parameter has neither a physics nor a type name
    UnknownParameter {
        /// The name of the parameter
        name: String,
        /// Where the parameter was declared
        span: Option<Span>,
    },
    /// A parameter is named like a unit, so its uses would read as the unit
    ParameterNamedLikeUnit {
        /// The name of the parameter
        name: String,
        /// Where the parameter was declared
        span: Option<Span>,
    },
    /// Exponent arithmetic failed while deriving a signal
    Physics(PhysicsError),
}

impl SymbolTableError {
    /// Creates a new error indicating that a scope handle is unknown
    #[must_use]
    pub const fn unknown_scope(scope: ScopeId) -> Self {
        Self::UnknownScope { scope }
    }

    /// Creates a new error indicating that a dimension is declared twice
    #[must_use]
    pub const fn duplicate_dimension(name: String, span: Option<Span>) -> Self {
        Self::DuplicateDimension { name, span }
    }

    /// Creates a new error indicating that a dimension is not registered
    #[must_use]
    pub const fn unknown_dimension(name: String) -> Self {
        Self::UnknownDimension { name }
    }

    /// Creates a new error indicating that a base signal names no dimension
    #[must_use]
    pub const fn missing_dimension_name(identifier: String, span: Option<Span>) -> Self {
        Self::MissingDimensionName { identifier, span }
    }

    /// Creates a new error indicating that a physics could not be resolved
    #[must_use]
    pub const fn unknown_physics(identifier: String, span: Option<Span>) -> Self {
        Self::UnknownPhysics { identifier, span }
    }

    /// Creates a new error indicating that a physics is declared twice in a scope
    #[must_use]
    pub const fn duplicate_physics(identifier: String, subindex: usize, span: Option<Span>) -> Self {
        Self::DuplicatePhysics {
            identifier,
            subindex,
            span,
        }
    }

    /// Creates a new error indicating that a subindex range is empty
    #[must_use]
    pub const fn invalid_subindex_range(identifier: String, start: usize, end: usize) -> Self {
        Self::InvalidSubindexRange {
            identifier,
            start,
            end,
        }
    }

    /// Creates a new error indicating that a parameter cannot be typed
    #[must_use]
    pub const fn unknown_parameter(name: String, span: Option<Span>) -> Self {
        Self::UnknownParameter { name, span }
    }

    /// Creates a new error indicating that a parameter is named like a unit
    #[must_use]
    pub const fn parameter_named_like_unit(name: String, span: Option<Span>) -> Self {
        Self::ParameterNamedLikeUnit { name, span }
    }

    const fn span(&self) -> Option<Span> {
        match self {
            Self::DuplicateDimension { span, .. }
            | Self::MissingDimensionName { span, .. }
            | Self::UnknownPhysics { span, .. }
            | Self::DuplicatePhysics { span, .. }
            | Self::UnknownParameter { span, .. }
            | Self::ParameterNamedLikeUnit { span, .. } => *span,
            Self::UnknownScope { .. }
            | Self::UnknownDimension { .. }
            | Self::InvalidSubindexRange { .. }
            | Self::Physics(_) => None,
        }
    }
}

impl From<PhysicsError> for SymbolTableError {
    fn from(error: PhysicsError) -> Self {
        Self::Physics(error)
    }
}

impl fmt::Display for SymbolTableError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownScope { scope } => write!(f, "{scope} does not exist"),
            Self::DuplicateDimension { name, .. } => {
                write!(f, "dimension `{name}` is already registered")
            }
            Self::UnknownDimension { name } => write!(f, "dimension `{name}` is not registered"),
            Self::MissingDimensionName { identifier, .. } => {
                write!(f, "base signal `{identifier}` does not name its dimension")
            }
            Self::UnknownPhysics { identifier, .. } => {
                write!(f, "`{identifier}` does not name a known signal or constant")
            }
            Self::DuplicatePhysics {
                identifier,
                subindex,
                ..
            } => {
                if *subindex == 0 {
                    write!(f, "`{identifier}` is already declared in this scope")
                } else {
                    write!(
                        f,
                        "`{identifier}@{subindex}` is already declared in this scope"
                    )
                }
            }
            Self::InvalidSubindexRange {
                identifier,
                start,
                end,
            } => write!(
                f,
                "subindex range `{start} to {end}` of `{identifier}` ends before it starts"
            ),
            Self::UnknownParameter { name, .. } => {
                write!(f, "parameter `{name}` has no signal type")
            }
            Self::ParameterNamedLikeUnit { name, .. } => {
                write!(f, "parameter `{name}` has the name of a unit")
            }
            Self::Physics(error) => write!(f, "{error}"),
        }
    }
}

impl std::error::Error for SymbolTableError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Physics(error) => Some(error),
            Self::UnknownScope { .. }
            | Self::DuplicateDimension { .. }
            | Self::UnknownDimension { .. }
            | Self::MissingDimensionName { .. }
            | Self::UnknownPhysics { .. }
            | Self::DuplicatePhysics { .. }
            | Self::InvalidSubindexRange { .. }
            | Self::UnknownParameter { .. }
            | Self::ParameterNamedLikeUnit { .. } => None,
        }
    }
}

impl AsNewtonError for SymbolTableError {
    fn message(&self) -> String {
        self.to_string()
    }

    fn context(&self) -> Vec<Context> {
        match self {
            Self::MissingDimensionName { .. } => vec![Context::Help(
                "give the signal a `name` or a derivation".to_string(),
            )],
            Self::UnknownParameter { .. } => vec![Context::Help(
                "parameters are written as `name : signal`".to_string(),
            )],
            Self::ParameterNamedLikeUnit { .. } => vec![Context::Help(
                "rename the parameter so it does not match a unit name or abbreviation"
                    .to_string(),
            )],
            Self::Physics(error) => error.context(),
            Self::UnknownScope { .. }
            | Self::DuplicateDimension { .. }
            | Self::UnknownDimension { .. }
            | Self::UnknownPhysics { .. }
            | Self::DuplicatePhysics { .. }
            | Self::InvalidSubindexRange { .. } => vec![],
        }
    }

    fn error_location(&self, source: &str) -> Option<ErrorLocation> {
        self.span()
            .map(|span| ErrorLocation::from_source_and_span(source, span))
    }
}
