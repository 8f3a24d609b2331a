// src/error.rs
//! Application error types with structured error handling.
//!
//! Every failure a command can hit is one variant of [`AppError`]. Errors are
//! never recovered locally: they travel to the command boundary in `main`,
//! which prints the message (and a hint for remote errors) and exits non-zero.

use std::fmt;
use thiserror::Error;

/// Notion API error codes as a typed vocabulary.
///
/// The remote reports failures as `{ "code": "...", "message": "..." }`.
/// Parsing the code once lets the rest of the crate match on variants
/// instead of magic strings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotionErrorCode {
    /// API rate limit exceeded
    RateLimited,
    /// The requested object does not exist or is not shared with the integration
    ObjectNotFound,
    /// API token is invalid or expired
    Unauthorized,
    /// Integration lacks permission for this resource
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
    /// An error code this client doesn't recognize
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
        Self::HttpStatus(status)
    }

    /// Whether this error means the resource simply doesn't exist.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::ObjectNotFound)
    }

    /// An actionable suggestion for the user, if one applies.
    ///
    /// Validation errors only get a hint when the message says which part of
    /// the request was rejected.
    pub fn hint(&self, message: &str) -> Option<&'static str> {
        match self {
            Self::ObjectNotFound => Some(
                "Check the ID is correct and the page/database is shared with your integration",
            ),
            Self::Unauthorized => {
                Some("Run 'notion auth login' to authenticate, or check your token")
            }
            Self::RestrictedResource => Some(
                "Your integration doesn't have access. Share the page/database with your integration in Notion",
            ),
            Self::RateLimited => Some("Too many requests. Wait a moment and try again"),
            Self::ValidationFailed if message.contains("is not a property") => Some(
                "Check property names with 'notion db view <id>' or 'notion page props <id>'",
            ),
            Self::ValidationFailed if message.contains("body failed validation") => {
                Some("Check your input format. Use --debug for request details")
            }
            Self::Conflict => {
                Some("The resource was modified by another process. Retry the operation")
            }
            Self::InternalError | Self::ServiceUnavailable => {
                Some("Notion's servers are having issues. Try again in a few minutes")
            }
            _ => None,
        }
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

/// Main application error type.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("property {0:?} not found in schema")]
    UnknownProperty(String),

    #[error("no valid operator found in expression {0:?}")]
    NoOperatorFound(String),

    #[error("invalid property format {0:?}, expected key=value")]
    InvalidPropertyFormat(String),

    #[error("{code}: {message}")]
    NotionService {
        code: NotionErrorCode,
        message: String,
        status: reqwest::StatusCode,
    },

    #[error("request failed: {0}")]
    NetworkFailure(#[from] reqwest::Error),

    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("malformed response: {0}")]
    MalformedResponse(String),

    #[error("not authenticated. Run 'notion auth login' or set NOTION_TOKEN")]
    NotAuthenticated,

    #[error("{0}")]
    MissingArgument(String),

    #[error("{context}: {source}")]
    Context {
        context: String,
        #[source]
        source: Box<AppError>,
    },

    #[error(transparent)]
    Validation(#[from] crate::types::ValidationError),
}

impl AppError {
    /// Wraps the error with a short description of the failing step,
    /// e.g. `get database schema: object_not_found: ...`.
    pub fn context(self, context: impl Into<String>) -> Self {
        AppError::Context {
            context: context.into(),
            source: Box::new(self),
        }
    }

    /// The actionable hint for remote errors, looking through any context layers.
    pub fn hint(&self) -> Option<&'static str> {
        match self {
            AppError::NotionService { code, message, .. } => code.hint(message),
            AppError::Context { source, .. } => source.hint(),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::MalformedResponse(err.to_string())
    }
}

/// Adds [`AppError::context`] to any `Result` whose error converts into `AppError`.
pub trait ResultExt<T> {
    fn context(self, context: &str) -> Result<T>;
}

impl<T, E: Into<AppError>> ResultExt<T> for std::result::Result<T, E> {
    fn context(self, context: &str) -> Result<T> {
        self.map_err(|e| e.into().context(context))
    }
}

/// Result type alias for convenience
pub type Result<T, E = AppError> = std::result::Result<T, E>;
