//! Error handling module for EmptyCut

use thiserror::Error;

use crate::domain::errors::DomainError;

/// Main error type for EmptyCut operations
#[derive(Error, Debug)]
pub enum EmptyCutError {
    /// Input file not found or inaccessible
    #[error("Input file not found: {path}")]
    InputFileNotFound { path: String },

    /// Configuration could not be assembled
    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    /// Processing failed and the service explained why
    #[error("Processing failed: {message}")]
    ProcessingFailed { message: String },

    /// Processing succeeded but the result could not be saved
    #[error("Download failed: {message}")]
    DownloadFailed { message: String },

    /// Domain error
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// I/O error
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// YAML serialization error
    #[error("Serialization error: {0}")]
    YamlError(#[from] serde_yaml::Error),
}

/// Result type alias for EmptyCut operations
pub type EmptyCutResult<T> = std::result::Result<T, EmptyCutError>;
