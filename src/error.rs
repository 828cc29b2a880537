//! Error handling and custom error types
//!
//! Provides unified error handling across the application using thiserror.
//! Every variant maps onto one [`ErrorKind`], and the `Display` text of the
//! classified variants is safe to show to an end user as-is.

use crate::models::Action;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

pub const NETWORK_FAILURE_MESSAGE: &str =
    "Could not reach the analysis service. Please check your connection and try again.";
pub const TIMEOUT_MESSAGE: &str =
    "The analysis service took too long to respond. Please try again.";
pub const INVALID_RESPONSE_MESSAGE: &str =
    "The analysis service returned an invalid response. Please try again.";
pub const UNKNOWN_ERROR_MESSAGE: &str = "An unknown error occurred. Please try again.";

#[derive(Error, Debug)]
pub enum Error {
    #[error("{0}")]
    InvalidInput(String),

    #[error("{action} is already in progress")]
    AlreadyPending { action: Action },

    #[error("{message}")]
    Network {
        message: String,
        #[source]
        source: Option<reqwest::Error>,
    },

    #[error("{message}")]
    Server { status: u16, message: String },

    #[error("{message}")]
    SchemaViolation { message: String, detail: String },

    #[error("Model provider error: {0}")]
    AiProvider(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("{0}")]
    Unknown(String),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Error::InvalidInput(message.into())
    }

    /// Transport-level failure with no response received.
    pub fn network(source: reqwest::Error) -> Self {
        let message = if source.is_timeout() {
            TIMEOUT_MESSAGE
        } else {
            NETWORK_FAILURE_MESSAGE
        };
        Error::Network {
            message: message.to_string(),
            source: Some(source),
        }
    }

    /// A success response whose body did not match the expected shape.
    /// `detail` is kept for logs only.
    pub fn schema_violation(detail: impl Into<String>) -> Self {
        Error::SchemaViolation {
            message: INVALID_RESPONSE_MESSAGE.to_string(),
            detail: detail.into(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::InvalidInput(_) | Error::AlreadyPending { .. } => ErrorKind::InvalidInput,
            Error::Network { .. } => ErrorKind::NetworkFailure,
            Error::Server { .. } => ErrorKind::ServerError,
            Error::SchemaViolation { .. } => ErrorKind::SchemaViolation,
            Error::AiProvider(_)
            | Error::Config(_)
            | Error::Io(_)
            | Error::Serialization(_)
            | Error::Unknown(_) => ErrorKind::Unknown,
        }
    }

    /// Message suitable for direct display. Internal variants collapse to a
    /// generic sentence so raw library text never reaches a user.
    pub fn user_message(&self) -> String {
        match self {
            Error::AiProvider(_) | Error::Config(_) | Error::Io(_) | Error::Serialization(_) => {
                UNKNOWN_ERROR_MESSAGE.to_string()
            }
            Error::Unknown(message) if message.trim().is_empty() => {
                UNKNOWN_ERROR_MESSAGE.to_string()
            }
            other => other.to_string(),
        }
    }
}

/// Failure taxonomy shared by the client and the orchestrator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorKind {
    InvalidInput,
    NetworkFailure,
    ServerError,
    SchemaViolation,
    Unknown,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ErrorKind::InvalidInput => "InvalidInput",
            ErrorKind::NetworkFailure => "NetworkFailure",
            ErrorKind::ServerError => "ServerError",
            ErrorKind::SchemaViolation => "SchemaViolation",
            ErrorKind::Unknown => "Unknown",
        };
        f.write_str(name)
    }
}

/// The storable form of a failure: what an operation slot keeps after `Failed`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperationError {
    pub kind: ErrorKind,
    pub message: String,
}

impl From<&Error> for OperationError {
    fn from(err: &Error) -> Self {
        Self {
            kind: err.kind(),
            message: err.user_message(),
        }
    }
}

/// Rebuild an error from its stored form, used when replaying canned failures.
impl From<OperationError> for Error {
    fn from(err: OperationError) -> Self {
        match err.kind {
            ErrorKind::InvalidInput => Error::InvalidInput(err.message),
            ErrorKind::NetworkFailure => Error::Network {
                message: err.message,
                source: None,
            },
            ErrorKind::ServerError => Error::Server {
                status: 500,
                message: err.message,
            },
            ErrorKind::SchemaViolation => Error::SchemaViolation {
                message: err.message,
                detail: String::new(),
            },
            ErrorKind::Unknown => Error::Unknown(err.message),
        }
    }
}

impl OperationError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

impl fmt::Display for OperationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_server_error_keeps_backend_message() {
        let err = Error::Server {
            status: 500,
            message: "quota exceeded".to_string(),
        };
        let op = OperationError::from(&err);
        assert_eq!(op.kind, ErrorKind::ServerError);
        assert_eq!(op.message, "quota exceeded");
    }

    #[test]
    fn test_schema_violation_hides_parser_detail() {
        let err = Error::schema_violation("missing field `alignmentTable` at line 1 column 2");
        assert_eq!(err.kind(), ErrorKind::SchemaViolation);
        assert_eq!(err.to_string(), INVALID_RESPONSE_MESSAGE);
        assert!(!err.user_message().contains("alignmentTable"));
    }

    #[test]
    fn test_internal_errors_collapse_to_generic_message() {
        let err: Error = serde_json::from_str::<u8>("nope").unwrap_err().into();
        assert_eq!(err.kind(), ErrorKind::Unknown);
        assert_eq!(err.user_message(), UNKNOWN_ERROR_MESSAGE);

        let err = Error::Unknown("   ".to_string());
        assert_eq!(err.user_message(), UNKNOWN_ERROR_MESSAGE);
    }

    #[test]
    fn test_already_pending_is_local_input_error() {
        let err = Error::AlreadyPending {
            action: Action::FindJobs,
        };
        assert_eq!(err.kind(), ErrorKind::InvalidInput);
        assert_eq!(err.to_string(), "Job search is already in progress");
    }
}
