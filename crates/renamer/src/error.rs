//! Error type shared by the naming core, manual edits and host collaborators.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, RenameError>;

/// Failures surfaced by the renamer library.
///
/// Collisions against the name universe are never errors; they drive the
/// resolver's retry loop.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RenameError {
    /// The request cannot be composed as given.
    #[error("invalid name request: {0}")]
    InvalidRequest(String),

    /// A character or padding count is out of range for the target name.
    #[error("invalid count {count} for '{name}': {reason}")]
    InvalidCount {
        name: String,
        count: usize,
        reason: &'static str,
    },

    /// Host applications reject names starting with a digit.
    #[error("'{0}' starts with a digit")]
    LeadingDigit(String),

    /// Composition or trimming left nothing behind.
    #[error("renaming '{0}' would produce an empty name")]
    EmptyName(String),

    /// No auto-suffix is configured for the node type.
    #[error("no suffix configured for node type '{0}'")]
    UnknownNodeType(String),

    #[error("'{0}' has no '_' separator")]
    MissingSeparator(String),

    /// The collision loop gave up before finding a free name.
    #[error("no free name for '{base}' after {attempts} attempts")]
    RetriesExhausted { base: String, attempts: usize },

    #[error("node '{0}' does not exist")]
    NodeMissing(String),

    #[error("name '{0}' is already taken")]
    NameTaken(String),
}
