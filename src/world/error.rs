//! Error types for enemy and level data loading.

use thiserror::Error;

/// Errors that can occur when loading RON data files.
#[derive(Debug, Error)]
pub enum DataLoadError {
    /// File or directory could not be found.
    #[error("File not found: {0}")]
    FileNotFound(String),

    /// File could not be read.
    #[error("Failed to read file '{path}': {details}")]
    ReadError { path: String, details: String },

    /// RON parsing failed.
    #[error("Parse error in '{path}': {details}")]
    ParseError { path: String, details: String },

    /// Patrol bounds or speeds that make no sense.
    #[error("Invalid value for '{field}' in '{path}': {details}")]
    InvalidValue {
        path: String,
        field: &'static str,
        details: String,
    },

    /// Level spawns an enemy kind with no definition.
    #[error("Unknown enemy kind '{kind}' in level '{level}'")]
    UnknownEnemyKind { kind: String, level: String },
}
