//! Error types for the fallible editor boundaries.
//!
//! Pointer handling never fails: misrouted events degrade to no-ops. Only
//! explicit commands and configuration loading report errors.

use thiserror::Error;

/// Editor errors.
#[derive(Debug, Error)]
pub enum EditorError {
    #[error("Settings error: {0}")]
    Settings(#[from] serde_json::Error),
    #[error("Script error: {0}")]
    Script(String),
    #[error("Unknown shape handle")]
    UnknownShape,
    #[error("Clipboard is empty")]
    EmptyClipboard,
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for editor commands.
pub type EditorResult<T> = Result<T, EditorError>;
