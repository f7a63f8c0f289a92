// src/error.rs
//! Application error types with structured error handling.
//!
//! Each variant names what went wrong and where. The pipeline recovers
//! locally from only two conditions (a malformed `file` property and a root
//! page that is not a database); everything else surfaces here.

use std::fmt;
use thiserror::Error;

/// Error names reported by Notion's web API as a typed vocabulary.
///
/// Error bodies look like `{"errorId": "...", "name": "ValidationError",
/// "message": "..."}`; the `name` is mapped here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotionErrorCode {
    /// Too many requests, back off before retrying
    RateLimited,
    /// The requested record does not exist or is not shared
    NotFound,
    /// Missing or expired `token_v2`
    Unauthorized,
    /// Request parameters failed Notion's validation
    ValidationFailed,
    /// Notion internal server error
    InternalError,
    /// Notion is temporarily unavailable
    ServiceUnavailable,
    /// HTTP status code fallback when the error body is unparseable
    HttpStatus(u16),
    /// An error name this client doesn't recognize yet
    Unknown(String),
}

impl NotionErrorCode {
    /// Parse the `name` field of an error body into the typed vocabulary.
    pub fn from_api_response(name: &str) -> Self {
        match name {
            "RateLimitedError" => Self::RateLimited,
            "NotFound" | "NotFoundError" => Self::NotFound,
            "UnauthorizedError" => Self::Unauthorized,
            "ValidationError" => Self::ValidationFailed,
            "InternalServerError" => Self::InternalError,
            "ServiceUnavailableError" => Self::ServiceUnavailable,
            other => Self::Unknown(other.to_string()),
        }
    }

    /// Create from an HTTP status code when the error body is unparseable.
    pub fn from_http_status(status: u16) -> Self {
        match status {
            401 | 403 => Self::Unauthorized,
            404 => Self::NotFound,
            429 => Self::RateLimited,
            503 => Self::ServiceUnavailable,
            other => Self::HttpStatus(other),
        }
    }

    /// Whether this error is transient.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::RateLimited | Self::ServiceUnavailable | Self::InternalError
        )
    }
}

impl fmt::Display for NotionErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RateLimited => write!(f, "rate_limited"),
            Self::NotFound => write!(f, "not_found"),
            Self::Unauthorized => write!(f, "unauthorized"),
            Self::ValidationFailed => write!(f, "validation_error"),
            Self::InternalError => write!(f, "internal_server_error"),
            Self::ServiceUnavailable => write!(f, "service_unavailable"),
            Self::HttpStatus(code) => write!(f, "http_{}", code),
            Self::Unknown(name) => write!(f, "{}", name),
        }
    }
}

/// Rejected image URL input.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ImageUrlError {
    #[error("URL can't be empty")]
    Empty,

    #[error("Invalid image URL: {0}")]
    Malformed(String),
}

/// A raw property value whose shape does not match its schema type.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DecodeError {
    #[error("expected {expected} at {path}")]
    UnexpectedShape {
        expected: &'static str,
        path: &'static str,
    },

    #[error("no date decoration found")]
    MissingDate,

    #[error("malformed date decoration: {0}")]
    MalformedDate(String),

    #[error(transparent)]
    ImageUrl(#[from] ImageUrlError),
}

/// Main application error type.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Missing configuration: {0}")]
    MissingConfiguration(String),

    #[error("Network failure: {0}")]
    NetworkFailure(#[from] reqwest::Error),

    #[error("Notion API returned an error ({code}): {message}")]
    NotionService {
        code: NotionErrorCode,
        message: String,
        status: reqwest::StatusCode,
    },

    #[error("Root page {0} was not returned by Notion")]
    RootPageMissing(String),

    #[error("No published post has slug '{0}'")]
    PostNotFound(String),

    #[error("Malformed response from {endpoint}: {message}")]
    MalformedResponse { endpoint: String, message: String },

    #[error("Property '{property}' of page {page_id} could not be decoded: {source}")]
    PropertyDecode {
        page_id: String,
        property: String,
        #[source]
        source: DecodeError,
    },

    #[error("User lookup for {user_id} failed: {source}")]
    UserLookup {
        user_id: String,
        #[source]
        source: Box<AppError>,
    },

    #[error("Filesystem IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    ValidationError(#[from] crate::types::ValidationError),

    #[error("Internal error: {message}")]
    InternalError { message: String },
}

impl AppError {
    /// Wraps a decode failure with the page and property it came from.
    pub fn property_decode(page_id: &str, property: &str, source: DecodeError) -> Self {
        AppError::PropertyDecode {
            page_id: page_id.to_string(),
            property: property.to_string(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_error_names() {
        assert_eq!(
            NotionErrorCode::from_api_response("UnauthorizedError"),
            NotionErrorCode::Unauthorized
        );
        assert_eq!(
            NotionErrorCode::from_api_response("ValidationError"),
            NotionErrorCode::ValidationFailed
        );
        assert_eq!(
            NotionErrorCode::from_api_response("Teapot"),
            NotionErrorCode::Unknown("Teapot".to_string())
        );
    }

    #[test]
    fn maps_http_status_fallback() {
        assert_eq!(
            NotionErrorCode::from_http_status(429),
            NotionErrorCode::RateLimited
        );
        assert!(NotionErrorCode::from_http_status(503).is_retryable());
        assert_eq!(NotionErrorCode::from_http_status(418).to_string(), "http_418");
    }

    #[test]
    fn image_url_error_message() {
        let err: DecodeError = ImageUrlError::Empty.into();
        assert_eq!(err.to_string(), "URL can't be empty");
    }

    #[test]
    fn property_decode_names_page_and_property() {
        let err = AppError::property_decode("p1", "date", DecodeError::MissingDate);
        assert_eq!(
            err.to_string(),
            "Property 'date' of page p1 could not be decoded: no date decoration found"
        );
    }
}
