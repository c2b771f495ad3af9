// src/error.rs
//! Error types for the Hoppy Hour client.
//!
//! `ApiError` is what a single logical API call fails with; its status alone
//! decides whether the request pipeline tries again. `AppError` is the wider
//! vocabulary used by configuration, credentials, and the CLI.

use crate::api::responses::ErrorBody;
use crate::constants::NON_RETRYABLE_STATUSES;
use std::fmt;
use std::time::Duration;
use thiserror::Error;

/// Broad classification of a failed call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiErrorKind {
    /// The backend answered with a 4xx status.
    Client,
    /// The backend answered with a 5xx (or otherwise unexpected) status.
    Server,
    /// No response arrived: timeout, refused connection, DNS or socket failure.
    Transport,
    /// The request could not be built locally.
    Setup,
}

impl fmt::Display for ApiErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Client => write!(f, "client"),
            Self::Server => write!(f, "server"),
            Self::Transport => write!(f, "transport"),
            Self::Setup => write!(f, "setup"),
        }
    }
}

/// Machine-readable error codes as a typed vocabulary.
///
/// The four transport codes are assigned by this client. Codes reported by
/// the backend in an error body are kept verbatim in `Service`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ErrorCode {
    Timeout,
    ConnectionRefused,
    NetworkError,
    SetupError,
    Service(String),
}

impl ErrorCode {
    /// Parse a code string, recognizing the transport codes by name.
    pub fn from_api_response(code: &str) -> Self {
        match code {
            "TIMEOUT" => Self::Timeout,
            "CONNECTION_REFUSED" => Self::ConnectionRefused,
            "NETWORK_ERROR" => Self::NetworkError,
            "SETUP_ERROR" => Self::SetupError,
            other => Self::Service(other.to_string()),
        }
    }

    fn kind(&self) -> ApiErrorKind {
        match self {
            Self::SetupError => ApiErrorKind::Setup,
            _ => ApiErrorKind::Transport,
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Timeout => write!(f, "TIMEOUT"),
            Self::ConnectionRefused => write!(f, "CONNECTION_REFUSED"),
            Self::NetworkError => write!(f, "NETWORK_ERROR"),
            Self::SetupError => write!(f, "SETUP_ERROR"),
            Self::Service(code) => write!(f, "{}", code),
        }
    }
}

/// A failed API call.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("{kind} error (status {status}): {message}")]
pub struct ApiError {
    pub kind: ApiErrorKind,
    /// HTTP status, or 0 when no response was received.
    pub status: u16,
    pub code: Option<ErrorCode>,
    pub message: String,
    pub details: Option<serde_json::Value>,
    /// How long the failing attempt took.
    pub duration: Duration,
}

impl ApiError {
    /// Builds an error from a non-2xx response.
    pub fn from_response(status: u16, body: &str, duration: Duration) -> Self {
        let parsed = ErrorBody::parse(body);
        let message = parsed
            .message
            .or_else(|| {
                reqwest::StatusCode::from_u16(status)
                    .ok()
                    .and_then(|s| s.canonical_reason())
                    .map(str::to_string)
            })
            .unwrap_or_else(|| format!("HTTP {}", status));

        Self {
            kind: if (400..500).contains(&status) {
                ApiErrorKind::Client
            } else {
                ApiErrorKind::Server
            },
            status,
            code: parsed.code.as_deref().map(ErrorCode::from_api_response),
            message,
            details: parsed.details,
            duration,
        }
    }

    /// Builds an error for an attempt that never produced a response.
    pub fn transport(code: ErrorCode, message: impl Into<String>, duration: Duration) -> Self {
        Self {
            kind: code.kind(),
            status: 0,
            code: Some(code),
            message: message.into(),
            details: None,
            duration,
        }
    }

    /// Whether another attempt could succeed.
    ///
    /// A pure function of the status: everything outside the client-correctable
    /// set is retried, including transport failures (status 0).
    pub fn is_retryable(&self) -> bool {
        !NON_RETRYABLE_STATUSES.contains(&self.status)
    }

    pub fn is_unauthorized(&self) -> bool {
        self.status == 401
    }
}

/// Main application error type.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Missing configuration: {0}")]
    MissingConfiguration(String),

    #[error(transparent)]
    Api(#[from] ApiError),

    #[error("Network failure: {0}")]
    NetworkFailure(#[from] reqwest::Error),

    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    #[error("Filesystem IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    ValidationError(#[from] crate::types::ValidationError),
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::MalformedResponse(err.to_string())
    }
}

impl AppError {
    /// The underlying API error, if this failure came from the backend.
    pub fn as_api_error(&self) -> Option<&ApiError> {
        match self {
            AppError::Api(e) => Some(e),
            _ => None,
        }
    }
}

/// Result type alias for convenience
pub type Result<T, E = AppError> = std::result::Result<T, E>;
