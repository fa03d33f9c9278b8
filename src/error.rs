use std::io;
use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, EditorError>;

#[derive(Debug, Error)]
pub enum EditorError {
    #[error("offset {offset} is out of range (document length {len})")]
    OutOfRange { offset: usize, len: usize },

    #[error("Invalid line number: {0}")]
    InvalidLineNumber(usize),

    #[error("Please enter a valid number: {0:?}")]
    InvalidNumber(String),

    #[error("Invalid search pattern: {0}")]
    InvalidPattern(String),

    #[error("Error accessing {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("a save is already in progress")]
    SaveInProgress,

    #[error("Could not access clipboard: {0}")]
    Clipboard(String),
}

impl EditorError {
    pub fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        EditorError::Io {
            path: path.into(),
            source,
        }
    }
}
