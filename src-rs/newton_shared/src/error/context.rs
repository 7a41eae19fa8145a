use std::fmt;

/// Contextual information attached to an error
///
/// # Examples
///
/// ```rust
/// use newton_shared::error::Context;
///
/// let note = Context::Note("parameter `L` is declared as `distance`".to_string());
/// let help = Context::Help("bind `L` with a value in meters".to_string());
///
/// assert_eq!(note.to_string(), "note: parameter `L` is declared as `distance`");
/// assert_eq!(help.to_string(), "help: bind `L` with a value in meters");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Context {
    /// Additional information about the error, such as where a symbol was declared
    Note(String),

    /// A suggestion for resolving the error
    Help(String),
}

impl fmt::Display for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Note(note) => write!(f, "note: {note}"),
            Self::Help(help) => write!(f, "help: {help}"),
        }
    }
}
