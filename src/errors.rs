/*!
 * Error types for the submerge application.
 *
 * This module contains custom error types for different parts of the application,
 * using the thiserror crate for ergonomic error definitions.
 */

// Allow dead code - error types are for library consumers
#![allow(dead_code)]

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur when loading transcript documents
#[derive(Error, Debug)]
pub enum TranscriptError {
    /// Error reading the document from disk
    #[error("Failed to read transcript {path:?}: {source}")]
    Read {
        /// Path of the unreadable document
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Error decoding the document from disk
    #[error("Failed to decode transcript {path:?}: {source}")]
    Parse {
        /// Path of the malformed document
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Error decoding an in-memory document
    #[error("Failed to decode transcript JSON: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Errors that can occur during track merging
#[derive(Error, Debug)]
pub enum MergeError {}

/// Main application error type that wraps all other errors
#[derive(Error, Debug)]
pub enum AppError {
    /// An input path that does not exist
    #[error("Input not found: {0:?}")]
    MissingInput(PathBuf),

    /// Error from transcript loading or decoding
    #[error("Transcript error: {0}")]
    Transcript(#[from] TranscriptError),

    /// Error from track merging
    #[error("Merge error: {0}")]
    Merge(#[from] MergeError),

    /// A batch run that discovered no transcript pairs
    #[error("No transcript pairs found under {0:?}")]
    NothingToMerge(PathBuf),

    /// Invalid configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// Error from a file operation
    #[error("File error: {0}")]
    File(String),

    /// Any other error
    #[error("Unknown error: {0}")]
    Unknown(String),
}

impl AppError {
    /// Process exit code for this error.
    ///
    /// The mapping is exhaustive: every variant owns exactly one code, and
    /// success (0) is reserved for the no-error path. Scripts can rely on
    /// these values staying put.
    pub fn exit_code(&self) -> i32 {
        match self {
            AppError::Unknown(_) => 1,
            AppError::Config(_) => 2,
            AppError::MissingInput(_) => 3,
            AppError::Transcript(_) => 4,
            AppError::Merge(_) => 4,
            AppError::File(_) => 5,
            AppError::NothingToMerge(_) => 6,
        }
    }
}

// Utility functions for error conversion
impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        Self::Unknown(error.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(error: std::io::Error) -> Self {
        Self::File(error.to_string())
    }
}
