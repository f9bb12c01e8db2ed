//! Error types for the archivematica library.
//!
//! Every operation returns the unified [`Error`]. Its variants separate
//! permission problems, missing resources, other request failures, local
//! filesystem problems and caller mistakes, so callers can branch on the
//! variant instead of matching message text.

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

/// The unified error type for archivematica operations.
#[derive(Debug, Error)]
pub enum Error {
    /// The server answered 403 Forbidden (bad API key or missing permission).
    #[error("{message}")]
    Authorization { status: u16, message: String },

    /// The server answered 404 where a 404 was not expected.
    #[error("{message}")]
    NotFound { status: u16, message: String },

    /// Any other unexpected status, an unusable body, or a transport failure.
    #[error("{message}")]
    Request {
        status: Option<u16>,
        message: String,
        #[source]
        source: Option<TransportError>,
    },

    /// A download precondition or write failed.
    #[error("filesystem error: {0}")]
    Filesystem(#[from] FilesystemError),

    /// An argument was rejected before any request was made.
    #[error("invalid input: {0}")]
    InvalidInput(#[from] InvalidInputError),
}

impl Error {
    /// Build a request failure without an underlying transport error.
    pub(crate) fn request(status: Option<u16>, message: impl Into<String>) -> Self {
        Error::Request {
            status,
            message: message.into(),
            source: None,
        }
    }

    /// The HTTP status code carried by this error, if any.
    ///
    /// Callers deciding whether to retry a [`Error::Request`] can use this to
    /// tell server-side (5xx) failures from client-side (4xx) ones.
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::Authorization { status, .. } | Error::NotFound { status, .. } => Some(*status),
            Error::Request { status, .. } => *status,
            Error::Filesystem(_) | Error::InvalidInput(_) => None,
        }
    }

    /// Returns true for 403 responses.
    pub fn is_authorization(&self) -> bool {
        matches!(self, Error::Authorization { .. })
    }

    /// Returns true for unexpected 404 responses.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::NotFound { .. })
    }
}

/// Transport-level failures, raised before any response was obtained.
#[derive(Debug, Error)]
pub enum TransportError {
    /// Network connection failed.
    #[error("connection failed: {message}")]
    Connection { message: String },

    /// Request timed out.
    #[error("request timed out: {message}")]
    Timeout { message: String },

    /// Any other HTTP client error.
    #[error("HTTP error: {message}")]
    Http { message: String },
}

impl From<&reqwest::Error> for TransportError {
    fn from(err: &reqwest::Error) -> Self {
        if err.is_timeout() {
            TransportError::Timeout {
                message: err.to_string(),
            }
        } else if err.is_connect() {
            TransportError::Connection {
                message: err.to_string(),
            }
        } else {
            TransportError::Http {
                message: err.to_string(),
            }
        }
    }
}

impl From<reqwest::Error> for Error {
    /// Transport failures become request failures carrying the client's
    /// message. Connection, timeout and body errors carry no status.
    ///
    /// Only status-carrying client errors, such as those produced by
    /// `reqwest::Response::error_for_status`, have a code; a 403 among them
    /// is reported as an authorization failure.
    fn from(err: reqwest::Error) -> Self {
        let status = err.status().map(|s| s.as_u16());
        let message = match status {
            Some(code) => format!("Request failed, {}: {}", code, err),
            None => format!("Request failed: {}", err),
        };

        if status == Some(403) {
            return Error::Authorization {
                status: 403,
                message: format!("Invalid credentials or insufficient permissions: {}", message),
            };
        }

        Error::Request {
            status,
            message,
            source: Some(TransportError::from(&err)),
        }
    }
}

/// Failures around the download destination.
#[derive(Debug, Error)]
pub enum FilesystemError {
    /// The destination is missing, not a directory, or read-only.
    #[error("{} does not exist, is not a directory or is not writeable", path.display())]
    UnusableDirectory { path: PathBuf },

    /// Reading from or writing to the destination failed.
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Input validation errors.
#[derive(Debug, Error)]
pub enum InvalidInputError {
    /// Invalid service URL.
    #[error("invalid URL '{value}': {reason}")]
    Url { value: String, reason: String },

    /// Unknown transfer type.
    #[error("invalid transfer type ({value}) provided, must be one of {allowed}")]
    TransferType { value: String, allowed: String },

    /// Unknown package type.
    #[error("invalid package type ({value}) provided, must be one of {allowed}")]
    PackageType { value: String, allowed: String },

    /// Package listings may only be filtered to AIPs or DIPs.
    #[error("optional package type was {value}, must be AIP or DIP if provided")]
    ListingFilter { value: String },

    /// Unknown reingest type.
    #[error("reingest type was {value}, must be one of FULL, OBJECTS or METADATA_ONLY")]
    ReingestType { value: String },

    /// Unknown location purpose code.
    #[error("invalid location purpose ({value}), must be one of {allowed}")]
    LocationPurpose { value: String, allowed: String },

    /// Unknown space type.
    #[error("there is no space type called {value}")]
    SpaceType { value: String },

    /// A space was requested without all of its required fields.
    #[error("missing required fields for a {space} space: {}", missing.join(", "))]
    MissingSpaceFields { space: String, missing: Vec<String> },

    /// Package deletion requires a positive user id.
    #[error("user ID must be an integer greater than 0, got {value}")]
    UserId { value: i64 },

    /// A duplicated package cannot reuse the original's UUID.
    #[error("new package UUID cannot match old UUID ({uuid})")]
    DuplicateUuid { uuid: String },

    /// Credentials that cannot be sent as an HTTP header.
    #[error("credentials contain characters not allowed in an HTTP header")]
    Credentials,

    /// Generic invalid input.
    #[error("{message}")]
    Other { message: String },
}

/// Join a list of allowed values for an error message.
pub(crate) fn allowed_values<T: fmt::Display>(values: &[T]) -> String {
    values
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_is_exposed_for_response_errors() {
        let err = Error::NotFound {
            status: 404,
            message: "gone".to_string(),
        };
        assert_eq!(err.status(), Some(404));
        assert!(err.is_not_found());

        let err = Error::request(Some(502), "bad gateway");
        assert_eq!(err.status(), Some(502));
        assert!(!err.is_authorization());
    }

    #[test]
    fn local_errors_have_no_status() {
        let err: Error = InvalidInputError::UserId { value: 0 }.into();
        assert_eq!(err.status(), None);
        assert_eq!(
            err.to_string(),
            "invalid input: user ID must be an integer greater than 0, got 0"
        );
    }

    #[test]
    fn missing_fields_are_listed() {
        let err = InvalidInputError::MissingSpaceFields {
            space: "Local Filesystem".to_string(),
            missing: vec!["path".to_string(), "staging_path".to_string()],
        };
        assert_eq!(
            err.to_string(),
            "missing required fields for a Local Filesystem space: path, staging_path"
        );
    }
}
