//! Error types for the dungeon agents crate

use thiserror::Error;

/// Main error type for the dungeon agents crate
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    #[error("action index {index} is out of range (must be 0-3)")]
    InvalidAction { index: usize },

    #[error("invalid persona '{input}'. Expected one of: {expected}")]
    ParsePersona { input: String, expected: String },

    #[error("invalid character '{character}' at row {row}, column {column} in dungeon layout")]
    InvalidTile {
        character: char,
        row: usize,
        column: usize,
    },

    #[error("dungeon layout is malformed: {message}")]
    InvalidLayout { message: String },

    #[error("invalid configuration: {message}")]
    InvalidConfiguration { message: String },

    #[error("unsupported {kind} format version {found} (expected {expected})")]
    UnsupportedVersion {
        kind: String,
        found: u32,
        expected: u32,
    },

    #[error("search node {node} is not fully expanded but has no untried legal action")]
    UnexpandableNode { node: usize },

    #[error("failed to {operation}: {source}")]
    Io {
        operation: String,
        #[source]
        source: std::io::Error,
    },

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("failed to {operation}: {message}")]
    SerializationContext { operation: String, message: String },

    #[error("progress bar template error: {message}")]
    ProgressBarTemplate { message: String },
}

/// Convenience type alias for Results using the crate's Error type
pub type Result<T> = std::result::Result<T, Error>;

impl From<std::io::Error> for Error {
    fn from(source: std::io::Error) -> Self {
        Error::Io {
            operation: "IO operation".to_string(),
            source,
        }
    }
}
