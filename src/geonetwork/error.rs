//! Error types for GeoNetwork client operations
//!
//! Configuration and structural problems (unknown versions, misused search
//! expectations, missing document fields) are hard failures. Expected
//! runtime conditions such as a failed ping or a lagging search index are
//! absorbed into boolean and retry outcomes before they ever become a
//! `GnError`, and only surface here once the caller's budget is spent.

use super::http::TransportError;
use super::version::GnVersion;
use thiserror::Error;

/// Main error type for GeoNetwork client and harness operations
#[derive(Debug, Error)]
pub enum GnError {
    /// Version tag outside the statically known set
    #[error("Unknown GN version '{tag}'")]
    UnsupportedVersion { tag: String },

    /// The health check of a freshly built client did not pass
    #[error("Error pinging GN {version} at {service_url}")]
    ConnectionFailed {
        service_url: String,
        version: GnVersion,
    },

    /// Transport-level failure (malformed URL, connection refused, ...)
    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    /// The catalog answered with a non-OK status
    #[error("GN service {url} returned HTTP status {status}")]
    ServerError { url: String, status: u16 },

    /// The catalog answered with a body we could not make sense of
    #[error("Failed to parse GN response: {message}")]
    ResponseParse { message: String },

    /// Both or neither of the search expectation forms were supplied
    #[error("Invalid search expectation: {reason}")]
    InvalidExpectation { reason: String },

    /// The search index never reached the expected count
    #[error("Expected value {expected} not found after {retries} retries. Found {actual}")]
    ConsistencyTimeout {
        expected: usize,
        actual: usize,
        retries: u32,
        waited_ms: u64,
    },

    /// A wait between search attempts was interrupted and the policy says stop
    #[error("Search for {expected} results interrupted after {attempts} attempts. Found {actual}")]
    SearchInterrupted {
        expected: usize,
        actual: usize,
        attempts: u32,
    },

    /// A step of a namespaced path was not present in the document
    #[error("Missing field '{step}' in namespace {namespace}")]
    MissingField { step: String, namespace: String },

    /// Reading a local query document failed
    #[error("I/O error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Invalid configuration value
    #[error("Configuration error: {message}")]
    Config { message: String },
}

impl GnError {
    /// Helper to create response parsing errors
    pub fn parse(message: impl Into<String>) -> Self {
        Self::ResponseParse {
            message: message.into(),
        }
    }

    /// Helper to create configuration errors
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Helper to create I/O errors with the offending path
    pub fn io(path: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Whether this error is a configuration or structural problem that
    /// should never be retried
    pub fn is_configuration_error(&self) -> bool {
        matches!(
            self,
            GnError::UnsupportedVersion { .. }
                | GnError::InvalidExpectation { .. }
                | GnError::MissingField { .. }
                | GnError::Config { .. }
        )
    }
}

impl From<roxmltree::Error> for GnError {
    fn from(e: roxmltree::Error) -> Self {
        GnError::parse(e.to_string())
    }
}

/// Result type for GeoNetwork operations
pub type GnResult<T> = Result<T, GnError>;
