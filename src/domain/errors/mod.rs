// Domain errors - Error types for the domain layer

use std::fmt;

/// Domain-specific error types
#[derive(Debug, Clone, PartialEq)]
pub enum DomainError {
    /// Invalid arguments provided
    BadArgs(String),
    /// File not found
    FileNotFound(String),
    /// A submission is already in flight
    Busy(String),
    /// Network failure talking to the processing service
    Transport(String),
    /// The processing service did not answer in time
    Timeout(String),
    /// Non-2xx answer from the processing service
    Server { status: u16, detail: Option<String> },
    /// 2xx answer that could not be understood
    InvalidResponse(String),
    /// Configuration could not be loaded or is invalid
    ConfigFail(String),
    /// File system operation failed
    FsFail(String),
    /// Media probing failed
    ProbeFail(String),
    /// Internal error
    InternalError(String),
}

impl DomainError {
    /// Message reported by the service itself, if any
    pub fn server_detail(&self) -> Option<&str> {
        match self {
            DomainError::Server { detail, .. } => detail.as_deref(),
            _ => None,
        }
    }
}

impl fmt::Display for DomainError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DomainError::BadArgs(msg) => write!(f, "Bad arguments: {}", msg),
            DomainError::FileNotFound(msg) => write!(f, "File not found: {}", msg),
            DomainError::Busy(msg) => write!(f, "Busy: {}", msg),
            DomainError::Transport(msg) => write!(f, "Transport error: {}", msg),
            DomainError::Timeout(msg) => write!(f, "Timed out: {}", msg),
            DomainError::Server { status, detail } => match detail {
                Some(detail) => write!(f, "Server error {}: {}", status, detail),
                None => write!(f, "Server error {}", status),
            },
            DomainError::InvalidResponse(msg) => write!(f, "Invalid response: {}", msg),
            DomainError::ConfigFail(msg) => write!(f, "Configuration error: {}", msg),
            DomainError::FsFail(msg) => write!(f, "File system error: {}", msg),
            DomainError::ProbeFail(msg) => write!(f, "Probe failed: {}", msg),
            DomainError::InternalError(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for DomainError {}
