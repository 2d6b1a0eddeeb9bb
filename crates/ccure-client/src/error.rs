//! Error types for ccure-client.
//!
//! Every error carries an HTTP-style status code and a message so callers can
//! report failures uniformly, whether they came from the transport, the remote
//! server, or a local usage check.

use std::time::Duration;

/// Result type alias for ccure operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for ccure operations.
#[derive(Debug, thiserror::Error)]
#[error("{kind}")]
pub struct Error {
    /// The kind of error that occurred.
    pub kind: ErrorKind,
    /// Optional source error.
    #[source]
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl Error {
    /// Create a new error with the given kind.
    pub fn new(kind: ErrorKind) -> Self {
        Self { kind, source: None }
    }

    /// Create a new error with the given kind and source.
    pub fn with_source(
        kind: ErrorKind,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self {
            kind,
            source: Some(Box::new(source)),
        }
    }

    /// Shorthand for an unsupported-operation error.
    pub fn unsupported(operation: impl Into<String>, object_type: impl Into<String>) -> Self {
        Self::new(ErrorKind::Unsupported {
            operation: operation.into(),
            object_type: object_type.into(),
        })
    }

    /// Shorthand for a usage error.
    pub fn usage(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Usage(message.into()))
    }

    /// The status code reported for this error.
    pub fn status_code(&self) -> u16 {
        self.kind.status_code()
    }

    /// The message reported for this error.
    pub fn message(&self) -> String {
        self.kind.to_string()
    }

    /// Returns true if the server reported the session as expired (HTTP 401).
    pub fn is_session_expired(&self) -> bool {
        matches!(self.kind, ErrorKind::SessionExpired(_))
    }

    /// Returns true if the request never reached the server, so sending it
    /// again cannot duplicate a write.
    pub fn is_retry_safe(&self) -> bool {
        matches!(self.kind, ErrorKind::ConnectTimeout { .. })
    }

    /// Returns true if the operation is not supported for the object type.
    pub fn is_unsupported(&self) -> bool {
        matches!(self.kind, ErrorKind::Unsupported { .. })
    }
}

/// The kind of error that occurred.
#[derive(Debug, thiserror::Error)]
pub enum ErrorKind {
    /// Timed out while connecting. The request was never sent.
    #[error("Unable to connect to remote server in {timeout:?}")]
    ConnectTimeout { timeout: Duration },

    /// The server accepted the connection but sent nothing in time.
    #[error("No response from remote server in {timeout:?}")]
    ReadTimeout { timeout: Duration },

    /// Redirect limit reached.
    #[error("Too many redirects")]
    TooManyRedirects,

    /// The request URL could not be built.
    #[error("A valid URL wasn't provided for this request: {0}")]
    InvalidUrl(String),

    /// DNS failure, connection refused, TLS failure.
    #[error("Could not connect to the remote host: {0}")]
    Connection(String),

    /// Any other transport failure. It is unknown whether the server saw it.
    #[error("An exception occurred while handling this request: {0}")]
    Request(String),

    /// The session token was rejected (HTTP 401).
    #[error("Session expired: {0}")]
    SessionExpired(String),

    /// The login call itself failed. Never treated as an expired session.
    #[error("Login failed: {status} {message}")]
    LoginFailed { status: u16, message: String },

    /// Any other non-2xx response.
    #[error("HTTP error: {status} {message}")]
    Http { status: u16, message: String },

    /// The operation is not available for this object type.
    #[error("{operation} is not supported for {object_type}")]
    Unsupported {
        operation: String,
        object_type: String,
    },

    /// The caller built an invalid request.
    #[error("Usage error: {0}")]
    Usage(String),

    /// No object matched a lookup that expected one.
    #[error("Not found: {0}")]
    NotFound(String),

    /// A fetched object lacks the requested property.
    #[error("Object has no `{property}` property")]
    MissingProperty { property: String },

    /// The server answered 2xx with a payload of the wrong shape.
    #[error("Unexpected response: {0}")]
    UnexpectedResponse(String),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(String),

    /// Form body serialization error.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Invalid configuration.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl ErrorKind {
    /// The status code reported for this error kind.
    pub fn status_code(&self) -> u16 {
        match self {
            ErrorKind::ConnectTimeout { .. } | ErrorKind::ReadTimeout { .. } => 408,
            ErrorKind::TooManyRedirects => 421,
            ErrorKind::InvalidUrl(_) => 422,
            ErrorKind::Connection(_) | ErrorKind::Request(_) => 400,
            ErrorKind::SessionExpired(_) => 401,
            ErrorKind::LoginFailed { status, .. } | ErrorKind::Http { status, .. } => *status,
            ErrorKind::Unsupported { .. } => 501,
            ErrorKind::Usage(_)
            | ErrorKind::MissingProperty { .. }
            | ErrorKind::Json(_)
            | ErrorKind::Serialization(_) => 400,
            ErrorKind::NotFound(_) => 404,
            ErrorKind::UnexpectedResponse(_) => 502,
            ErrorKind::Config(_) => 500,
        }
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        let kind = if err.is_redirect() {
            ErrorKind::TooManyRedirects
        } else if err.is_builder() {
            ErrorKind::InvalidUrl(err.to_string())
        } else if err.is_connect() {
            ErrorKind::Connection(err.to_string())
        } else {
            ErrorKind::Request(err.to_string())
        };

        Error::with_source(kind, err)
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::with_source(ErrorKind::Json(err.to_string()), err)
    }
}

impl From<serde_urlencoded::ser::Error> for Error {
    fn from(err: serde_urlencoded::ser::Error) -> Self {
        Error::with_source(ErrorKind::Serialization(err.to_string()), err)
    }
}

impl From<url::ParseError> for Error {
    fn from(err: url::ParseError) -> Self {
        Error::with_source(ErrorKind::InvalidUrl(err.to_string()), err)
    }
}
