// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Error types for reqkit
//!
//! Distinguishes "failed to build", "failed to send" and "failed to parse".
//! Non-fatal conditions (bad proxy, HTTP/2 setup, bad base URL) are logged
//! where they happen and never reach this type.

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias for reqkit operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for reqkit
#[derive(Error, Debug)]
pub enum Error {
    /// The network call itself failed (DNS, refused connection, TLS, ...)
    #[error("Send to {url} failed: {source}")]
    Send {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The whole-call deadline elapsed
    #[error("Request to {url} timed out after {duration_ms}ms")]
    Timeout { url: String, duration_ms: u64 },

    /// Reading the response body failed
    #[error("Failed to read response body from {url}: {source}")]
    BodyRead {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// A multipart upload file could not be read
    #[error("Cannot read upload file {path:?} for field '{field}': {source}")]
    Upload {
        field: String,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Transport client could not be constructed, even without HTTP/2
    #[error("Transport setup failed: {0}")]
    TransportSetup(String),

    /// Method string is not a valid HTTP token
    #[error("Invalid HTTP method '{0}'")]
    InvalidMethod(String),

    /// URL parsing failed
    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    /// JSON (de)serialization failed
    #[error("Deserialization error: {0}")]
    Deserialization(#[from] serde_json::Error),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Background send task failed to complete
    #[error("Dispatch error: {0}")]
    Dispatch(String),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Wrap a transport error from a send, splitting out deadline expiry
    pub fn send(url: impl Into<String>, source: reqwest::Error, timeout_ms: u64) -> Self {
        let url = url.into();
        if source.is_timeout() {
            Error::Timeout {
                url,
                duration_ms: timeout_ms,
            }
        } else {
            Error::Send { url, source }
        }
    }

    /// Create a dispatch error
    pub fn dispatch<S: Into<String>>(msg: S) -> Self {
        Error::Dispatch(msg.into())
    }

    /// Create a generic error
    pub fn other<S: Into<String>>(msg: S) -> Self {
        Error::Other(msg.into())
    }

    /// Check if this is a timeout error
    pub fn is_timeout(&self) -> bool {
        matches!(self, Error::Timeout { .. })
    }

    /// Check if the request never produced a response
    pub fn is_send_failure(&self) -> bool {
        matches!(self, Error::Send { .. } | Error::Timeout { .. })
    }

    /// Check if the failure happened while parsing data
    pub fn is_parse_failure(&self) -> bool {
        matches!(self, Error::Deserialization(_) | Error::Url(_))
    }

    /// Get URL if available
    pub fn url(&self) -> Option<&str> {
        match self {
            Error::Send { url, .. } => Some(url),
            Error::Timeout { url, .. } => Some(url),
            Error::BodyRead { url, .. } => Some(url),
            _ => None,
        }
    }
}

impl From<String> for Error {
    fn from(s: String) -> Self {
        Error::Other(s)
    }
}

impl From<&str> for Error {
    fn from(s: &str) -> Self {
        Error::Other(s.to_string())
    }
}

/// Helper trait for adding context to errors
pub trait ErrorContext<T> {
    /// Attach a URL to timeout errors that lack one
    fn with_url(self, url: &str) -> Result<T>;

    /// Prefix the error with an operation description
    fn context(self, msg: &str) -> Result<T>;
}

impl<T, E: Into<Error>> ErrorContext<T> for std::result::Result<T, E> {
    fn with_url(self, url: &str) -> Result<T> {
        self.map_err(|e| match e.into() {
            Error::Timeout { url: u, duration_ms } if u.is_empty() => Error::Timeout {
                url: url.to_string(),
                duration_ms,
            },
            other => other,
        })
    }

    fn context(self, msg: &str) -> Result<T> {
        self.map_err(|e| {
            let err = e.into();
            Error::Other(format!("{}: {}", msg, err))
        })
    }
}
