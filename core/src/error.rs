//! Error types for the request wrapper.
//!
//! # Design
//! Every non-2xx response becomes one `HttpError` carrying the numeric status
//! and the best-effort parsed body, so callers branch on status the same way
//! whichever transport produced it. Network failures keep the transport's own
//! error as the source instead of being flattened into a message.

use std::fmt;

use serde_json::Value;

/// A non-2xx response.
#[derive(Debug, Clone, PartialEq)]
pub struct HttpError {
    pub status: u16,
    /// Parsed response body: JSON for JSON responses, a string for text,
    /// `null` when the body was empty or could not be parsed.
    pub body: Value,
}

impl HttpError {
    pub fn new(status: u16, body: Value) -> Self {
        Self { status, body }
    }

    pub fn is_not_found(&self) -> bool {
        self.status == 404
    }

    pub fn is_client_error(&self) -> bool {
        (400..500).contains(&self.status)
    }

    pub fn is_server_error(&self) -> bool {
        (500..600).contains(&self.status)
    }

    /// The `message` field of a JSON error body, if there is one.
    pub fn message(&self) -> Option<&str> {
        self.body.get("message").and_then(Value::as_str)
    }
}

impl fmt::Display for HttpError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "HTTP Error {}", self.status)
    }
}

impl std::error::Error for HttpError {}

/// Errors returned by `ApiClient` calls.
#[derive(Debug)]
pub enum RequestError {
    /// The server answered with a non-2xx status.
    Http(HttpError),

    /// The exchange itself failed: connection refused, timeout, broken body.
    Transport(reqwest::Error),

    /// The call's cancellation signal fired before the exchange settled.
    Aborted,

    /// The base URL or path does not form a valid URL.
    InvalidUrl(String),

    /// The query parameters are not a flat object of scalars.
    InvalidParams(String),

    /// A header name or value is not valid HTTP.
    InvalidHeader(String),

    /// The request body could not be serialized to JSON.
    SerializationError(String),

    /// A successful response body did not fit the declared response type.
    DeserializationError(String),
}

impl RequestError {
    /// Status code of an HTTP error, `None` for every other failure.
    pub fn status(&self) -> Option<u16> {
        match self {
            RequestError::Http(e) => Some(e.status),
            _ => None,
        }
    }

    pub fn as_http(&self) -> Option<&HttpError> {
        match self {
            RequestError::Http(e) => Some(e),
            _ => None,
        }
    }

    pub fn is_aborted(&self) -> bool {
        matches!(self, RequestError::Aborted)
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, RequestError::Transport(e) if e.is_timeout())
    }
}

impl fmt::Display for RequestError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RequestError::Http(e) => write!(f, "{e}"),
            RequestError::Transport(e) => write!(f, "transport error: {e}"),
            RequestError::Aborted => write!(f, "request aborted"),
            RequestError::InvalidUrl(msg) => write!(f, "invalid url: {msg}"),
            RequestError::InvalidParams(msg) => write!(f, "invalid query parameters: {msg}"),
            RequestError::InvalidHeader(msg) => write!(f, "invalid header: {msg}"),
            RequestError::SerializationError(msg) => {
                write!(f, "serialization failed: {msg}")
            }
            RequestError::DeserializationError(msg) => {
                write!(f, "deserialization failed: {msg}")
            }
        }
    }
}

impl std::error::Error for RequestError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RequestError::Http(e) => Some(e),
            RequestError::Transport(e) => Some(e),
            _ => None,
        }
    }
}

impl From<HttpError> for RequestError {
    fn from(err: HttpError) -> Self {
        RequestError::Http(err)
    }
}

impl From<reqwest::Error> for RequestError {
    fn from(err: reqwest::Error) -> Self {
        RequestError::Transport(err)
    }
}
