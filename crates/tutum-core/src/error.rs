//! Error types for Tutum operations.
//!
//! Every failure in the workspace is reported through [`Error`]. Nothing is retried or
//! swallowed; each variant keeps enough context (status code, file path, transport
//! message) for the caller to surface it verbatim.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for Tutum operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// The credentials file exists but could not be parsed.
    #[error("Malformed Tutum configuration file found at {}: {message}", .path.display())]
    ConfigMalformed {
        /// Location of the offending file
        path: PathBuf,
        /// Parser message
        message: String,
    },

    /// No credential source produced a user and API key.
    #[error(
        "Couldn't find any Tutum credentials in ~/.tutum or environment variables TUTUM_USER and TUTUM_APIKEY"
    )]
    CredentialsNotFound,

    /// An authenticated call was attempted before credentials were resolved.
    #[error("Not authenticated: no Tutum credentials have been loaded")]
    Unauthenticated,

    /// DNS, connection or TLS failure.
    #[error("HTTP request failed: {0}")]
    Transport(String),

    /// The call did not complete before its deadline.
    #[error("Request timed out: {0}")]
    Timeout(String),

    /// The API answered with anything other than `200 OK`.
    #[error("Failed API call: {code}")]
    UnexpectedStatus {
        /// HTTP status code returned by the API
        code: u16,
    },

    /// The response body could not be read after a `200 OK`.
    #[error("Failed to read response body: {0}")]
    BodyRead(String),

    /// The response body did not match the expected shape.
    #[error("Failed to decode response: {0}")]
    Decode(String),

    /// The base URL or a pagination link is not a usable URL.
    #[error("Invalid endpoint: {0}")]
    InvalidEndpoint(String),

    /// Invalid UUID format
    #[error("Invalid UUID: {0}")]
    InvalidUuid(String),
}

/// Specialized result type for Tutum operations.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Returns the error code for this error type.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::ConfigMalformed { .. } => "CONFIG_MALFORMED",
            Self::CredentialsNotFound => "CREDENTIALS_NOT_FOUND",
            Self::Unauthenticated => "UNAUTHENTICATED",
            Self::Transport(_) => "TRANSPORT_ERROR",
            Self::Timeout(_) => "TIMEOUT",
            Self::UnexpectedStatus { .. } => "UNEXPECTED_STATUS",
            Self::BodyRead(_) => "BODY_READ_ERROR",
            Self::Decode(_) => "DECODE_ERROR",
            Self::InvalidEndpoint(_) => "INVALID_ENDPOINT",
            Self::InvalidUuid(_) => "INVALID_UUID",
        }
    }

    /// Returns the HTTP status code carried by the error, if any.
    #[must_use]
    pub const fn status_code(&self) -> Option<u16> {
        match self {
            Self::UnexpectedStatus { code } => Some(*code),
            _ => None,
        }
    }

    /// Returns true when the failure happened before any request was sent.
    #[must_use]
    pub const fn is_credentials_error(&self) -> bool {
        matches!(
            self,
            Self::ConfigMalformed { .. } | Self::CredentialsNotFound | Self::Unauthenticated
        )
    }
}

// Conversions from external error types
impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout(err.to_string())
        } else if err.is_body() || err.is_decode() {
            Self::BodyRead(err.to_string())
        } else {
            Self::Transport(err.to_string())
        }
    }
}

impl From<url::ParseError> for Error {
    fn from(err: url::ParseError) -> Self {
        Self::InvalidEndpoint(err.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::Decode(err.to_string())
    }
}

impl From<uuid::Error> for Error {
    fn from(err: uuid::Error) -> Self {
        Self::InvalidUuid(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(
            Error::ConfigMalformed {
                path: PathBuf::from("/home/alice/.tutum"),
                message: "bad".to_string()
            }
            .error_code(),
            "CONFIG_MALFORMED"
        );
        assert_eq!(
            Error::CredentialsNotFound.error_code(),
            "CREDENTIALS_NOT_FOUND"
        );
        assert_eq!(Error::Unauthenticated.error_code(), "UNAUTHENTICATED");
        assert_eq!(
            Error::Transport("test".to_string()).error_code(),
            "TRANSPORT_ERROR"
        );
        assert_eq!(Error::Timeout("test".to_string()).error_code(), "TIMEOUT");
        assert_eq!(
            Error::UnexpectedStatus { code: 404 }.error_code(),
            "UNEXPECTED_STATUS"
        );
        assert_eq!(
            Error::BodyRead("test".to_string()).error_code(),
            "BODY_READ_ERROR"
        );
        assert_eq!(
            Error::Decode("test".to_string()).error_code(),
            "DECODE_ERROR"
        );
        assert_eq!(
            Error::InvalidEndpoint("test".to_string()).error_code(),
            "INVALID_ENDPOINT"
        );
        assert_eq!(
            Error::InvalidUuid("test".to_string()).error_code(),
            "INVALID_UUID"
        );
    }

    #[test]
    fn test_error_display() {
        let err = Error::UnexpectedStatus { code: 201 };
        assert_eq!(err.to_string(), "Failed API call: 201");

        let err = Error::ConfigMalformed {
            path: PathBuf::from("/home/alice/.tutum"),
            message: "expected `=`".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Malformed Tutum configuration file found at /home/alice/.tutum: expected `=`"
        );
    }

    #[test]
    fn test_credentials_not_found_names_both_sources() {
        let message = Error::CredentialsNotFound.to_string();
        assert!(message.contains("~/.tutum"));
        assert!(message.contains("TUTUM_USER"));
        assert!(message.contains("TUTUM_APIKEY"));
    }

    #[test]
    fn test_status_code() {
        assert_eq!(Error::UnexpectedStatus { code: 500 }.status_code(), Some(500));
        assert_eq!(Error::Unauthenticated.status_code(), None);
    }

    #[test]
    fn test_is_credentials_error() {
        assert!(Error::CredentialsNotFound.is_credentials_error());
        assert!(Error::Unauthenticated.is_credentials_error());
        assert!(!Error::UnexpectedStatus { code: 401 }.is_credentials_error());
    }

    #[test]
    fn test_from_url_parse_error() {
        let err = url::Url::parse("not a url").unwrap_err();
        let tutum_err: Error = err.into();
        assert!(matches!(tutum_err, Error::InvalidEndpoint(_)));
    }

    #[test]
    fn test_from_uuid_error() {
        let err = uuid::Uuid::parse_str("not-a-uuid").unwrap_err();
        let tutum_err: Error = err.into();
        assert!(matches!(tutum_err, Error::InvalidUuid(_)));
    }

    #[test]
    fn test_from_serde_json_error() {
        let err = serde_json::from_str::<serde_json::Value>("{invalid json}").unwrap_err();
        let tutum_err: Error = err.into();
        assert!(matches!(tutum_err, Error::Decode(_)));
    }
}
