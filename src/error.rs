// src/error.rs
//! Crate error types with structured error handling.
//!
//! Error types form the vocabulary for failure modes in the system.
//! Remote errors are surfaced to the caller untranslated; only the
//! rate-limit case receives special treatment (transparent retry,
//! see [`crate::retry::RetryPolicy`]).

use std::fmt;
use thiserror::Error;

/// Notion API error codes as a typed vocabulary.
///
/// Instead of matching against magic strings like `"rate_limited"`,
/// the domain vocabulary is encoded in the type system. Each variant
/// tells you exactly what the Notion API reported and enables
/// pattern-based recovery without stringly-typed dispatch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotionErrorCode {
    /// API rate limit exceeded — back off and retry
    RateLimited,
    /// The requested object does not exist or is inaccessible
    ObjectNotFound,
    /// API key is invalid or expired
    Unauthorized,
    /// API key lacks permission for this resource
    RestrictedResource,
    /// Request body contains invalid JSON
    InvalidJson,
    /// Request parameters failed Notion's validation
    ValidationFailed,
    /// Conflict with current state of the resource
    Conflict,
    /// Notion internal server error
    InternalError,
    /// Notion is temporarily unavailable
    ServiceUnavailable,
    /// HTTP status code fallback when the error body is unparseable
    HttpStatus(u16),
    /// An error code this client doesn't recognize yet
    Unknown(String),
}

impl NotionErrorCode {
    /// Parse a Notion API error code string into the typed vocabulary.
    pub fn from_api_response(code: &str) -> Self {
        match code {
            "rate_limited" => Self::RateLimited,
            "object_not_found" => Self::ObjectNotFound,
            "unauthorized" => Self::Unauthorized,
            "restricted_resource" => Self::RestrictedResource,
            "invalid_json" => Self::InvalidJson,
            "validation_error" => Self::ValidationFailed,
            "conflict_error" => Self::Conflict,
            "internal_server_error" => Self::InternalError,
            "service_unavailable" => Self::ServiceUnavailable,
            other => Self::Unknown(other.to_string()),
        }
    }

    /// Create from an HTTP status code when the error body is unparseable.
    pub fn from_http_status(status: u16) -> Self {
        match status {
            429 => Self::RateLimited,
            other => Self::HttpStatus(other),
        }
    }

    /// Whether this error signals rate limiting (HTTP 429 equivalent).
    pub fn is_rate_limited(&self) -> bool {
        matches!(self, Self::RateLimited | Self::HttpStatus(429))
    }

    /// Whether this error means the resource simply doesn't exist.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::ObjectNotFound)
    }

    /// Whether this error is an authentication or permission failure.
    pub fn is_auth(&self) -> bool {
        matches!(self, Self::Unauthorized | Self::RestrictedResource)
    }
}

impl fmt::Display for NotionErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RateLimited => write!(f, "rate_limited"),
            Self::ObjectNotFound => write!(f, "object_not_found"),
            Self::Unauthorized => write!(f, "unauthorized"),
            Self::RestrictedResource => write!(f, "restricted_resource"),
            Self::InvalidJson => write!(f, "invalid_json"),
            Self::ValidationFailed => write!(f, "validation_error"),
            Self::Conflict => write!(f, "conflict_error"),
            Self::InternalError => write!(f, "internal_server_error"),
            Self::ServiceUnavailable => write!(f, "service_unavailable"),
            Self::HttpStatus(code) => write!(f, "http_{}", code),
            Self::Unknown(code) => write!(f, "{}", code),
        }
    }
}

/// Main crate error type.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Missing configuration: {0}")]
    MissingConfiguration(String),

    #[error(transparent)]
    Validation(#[from] crate::types::ValidationError),

    #[error("Network failure: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Notion API returned an error ({code}): {message}")]
    Api {
        code: NotionErrorCode,
        message: String,
        status: reqwest::StatusCode,
    },

    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Not implemented: {0}")]
    NotImplemented(&'static str),
}

impl Error {
    /// Builds a rate-limit error the way the wire would report it.
    pub fn rate_limited(message: impl Into<String>) -> Self {
        Error::Api {
            code: NotionErrorCode::RateLimited,
            message: message.into(),
            status: reqwest::StatusCode::TOO_MANY_REQUESTS,
        }
    }

    /// Builds an object-not-found error the way the wire would report it.
    pub fn not_found(message: impl Into<String>) -> Self {
        Error::Api {
            code: NotionErrorCode::ObjectNotFound,
            message: message.into(),
            status: reqwest::StatusCode::NOT_FOUND,
        }
    }

    /// Builds an unauthorized error the way the wire would report it.
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Error::Api {
            code: NotionErrorCode::Unauthorized,
            message: message.into(),
            status: reqwest::StatusCode::UNAUTHORIZED,
        }
    }

    /// Whether this error signals rate limiting and is safe to retry.
    pub fn is_rate_limited(&self) -> bool {
        match self {
            Error::Api { code, status, .. } => {
                code.is_rate_limited() || status.as_u16() == 429
            }
            _ => false,
        }
    }

    /// Whether the remote reported the target object as missing.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::Api { code, .. } if code.is_not_found())
    }

    /// Whether the remote rejected the request for auth reasons.
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Error::Api { code, .. } if code.is_auth())
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::MalformedResponse(err.to_string())
    }
}

/// Result type alias for convenience
pub type Result<T, E = Error> = std::result::Result<T, E>;
