//! HTTP transport for GeoNetwork services
//!
//! The [`Transport`] trait is the narrow view of an HTTP connection the
//! client needs: issue a GET or an XML POST, and remember the status of the
//! last response. [`HttpConnection`] implements it on top of a blocking
//! `reqwest` client with optional basic-auth credentials.
//!
//! A connection is stateful (`last_status` is overwritten by every call), so
//! all request methods take `&mut self`.

use log::{debug, warn};
use reqwest::header::CONTENT_TYPE;
use std::time::Duration;
use url::Url;

/// Default per-request timeout
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Error type for transport operations
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    /// The URL could not be parsed or is not an http(s) URL with a host
    MalformedUrl { url: String, reason: String },
    /// The request could not be sent or the response could not be read
    Request { url: String, reason: String },
    /// The underlying HTTP client could not be built
    Setup(String),
}

impl std::fmt::Display for TransportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TransportError::MalformedUrl { url, reason } => {
                write!(f, "Malformed URL '{}': {}", url, reason)
            }
            TransportError::Request { url, reason } => {
                write!(f, "Request to {} failed: {}", url, reason)
            }
            TransportError::Setup(msg) => write!(f, "HTTP client setup failed: {}", msg),
        }
    }
}

impl std::error::Error for TransportError {}

/// Minimal HTTP capability used by the GeoNetwork client
pub trait Transport {
    /// When set, successful responses are not read; request methods then
    /// return `Ok(None)` on 2xx.
    fn set_ignore_response_content_on_success(&mut self, ignore: bool);

    /// Issue a GET. Returns the body of a 2xx response unless content is
    /// being ignored, `None` otherwise.
    fn get(&mut self, url: &str) -> Result<Option<String>, TransportError>;

    /// POST an XML document. Same body semantics as [`Transport::get`].
    fn post_xml(&mut self, url: &str, body: &str) -> Result<Option<String>, TransportError>;

    /// Status of the last response, `None` if no response was received
    fn last_status(&self) -> Option<u16>;
}

/// Validate a service URL
///
/// Checks that:
/// - URL is well-formed
/// - Scheme is http or https
/// - Host is present
pub fn validate_url(url: &str) -> Result<Url, TransportError> {
    let malformed = |reason: String| TransportError::MalformedUrl {
        url: url.to_string(),
        reason,
    };

    if url.is_empty() {
        return Err(malformed("URL cannot be empty".to_string()));
    }

    let parsed = Url::parse(url).map_err(|e| malformed(e.to_string()))?;

    match parsed.scheme() {
        "http" | "https" => {}
        scheme => {
            return Err(malformed(format!(
                "invalid scheme '{}': must be 'http' or 'https'",
                scheme
            )));
        }
    }

    match parsed.host_str() {
        None | Some("") => Err(malformed("missing host".to_string())),
        _ => Ok(parsed),
    }
}

/// Blocking HTTP connection with optional basic authentication
pub struct HttpConnection {
    http_client: reqwest::blocking::Client,
    username: Option<String>,
    password: Option<String>,
    ignore_response_content_on_success: bool,
    last_status: Option<u16>,
}

impl HttpConnection {
    /// Anonymous connection with the default timeout
    pub fn new() -> Result<Self, TransportError> {
        Self::with_timeout(DEFAULT_REQUEST_TIMEOUT)
    }

    /// Anonymous connection with a custom request timeout
    pub fn with_timeout(timeout: Duration) -> Result<Self, TransportError> {
        let http_client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| TransportError::Setup(e.to_string()))?;

        Ok(Self {
            http_client,
            username: None,
            password: None,
            ignore_response_content_on_success: false,
            last_status: None,
        })
    }

    /// Attach basic-auth credentials to every request
    pub fn with_credentials(
        mut self,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        self.username = Some(username.into());
        self.password = Some(password.into());
        self
    }

    pub fn username(&self) -> Option<&str> {
        self.username.as_deref()
    }

    fn execute(
        &mut self,
        url: &str,
        request: reqwest::blocking::RequestBuilder,
    ) -> Result<Option<String>, TransportError> {
        let request = match &self.username {
            Some(user) => request.basic_auth(user, self.password.as_deref()),
            None => request,
        };

        let response = request.send().map_err(|e| TransportError::Request {
            url: url.to_string(),
            reason: e.to_string(),
        })?;

        let status = response.status();
        self.last_status = Some(status.as_u16());
        debug!("HTTP {} <- {}", status.as_u16(), url);

        if !status.is_success() {
            warn!("Bad response from {}: HTTP {}", url, status.as_u16());
            return Ok(None);
        }

        if self.ignore_response_content_on_success {
            return Ok(None);
        }

        response.text().map(Some).map_err(|e| TransportError::Request {
            url: url.to_string(),
            reason: format!("failed to read response body: {}", e),
        })
    }
}

impl Transport for HttpConnection {
    fn set_ignore_response_content_on_success(&mut self, ignore: bool) {
        self.ignore_response_content_on_success = ignore;
    }

    fn get(&mut self, url: &str) -> Result<Option<String>, TransportError> {
        let parsed = validate_url(url)?;
        self.last_status = None;
        let request = self.http_client.get(parsed);
        self.execute(url, request)
    }

    fn post_xml(&mut self, url: &str, body: &str) -> Result<Option<String>, TransportError> {
        let parsed = validate_url(url)?;
        self.last_status = None;
        let request = self
            .http_client
            .post(parsed)
            .header(CONTENT_TYPE, "application/xml")
            .body(body.to_string());
        self.execute(url, request)
    }

    fn last_status(&self) -> Option<u16> {
        self.last_status
    }
}
