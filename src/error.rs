use std::path::PathBuf;

use thiserror::Error;

/// Errors produced by the editing core.
#[derive(Debug, Error)]
pub enum EditError {
    /// Backing storage could not be obtained.
    #[error("allocation failed: could not reserve room for {requested} elements")]
    Allocation { requested: usize },

    /// An index outside the range an operation promises to accept.
    #[error("index {index} out of range for length {len}")]
    Index { index: usize, len: usize },

    /// A value rejected by an operation's input contract.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// A file loader or writer failed.
    #[error("I/O failure on '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl EditError {
    pub fn index(index: usize, len: usize) -> Self {
        Self::Index { index, len }
    }

    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput(message.into())
    }

    /// Whether the error is a user-level condition the caller can report and move past.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::InvalidInput(_) | Self::Io { .. })
    }
}

pub type EditResult<T> = Result<T, EditError>;
