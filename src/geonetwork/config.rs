//! GeoNetwork connection configuration
//!
//! Supports layered configuration:
//! 1. Defaults (a local GeoNetwork 2.6 with admin/admin)
//! 2. Constructor parameters
//! 3. Environment variables (for CI and online tests)
//! 4. Builder methods
//!
//! # Environment Variables
//! - `GN_SERVICE_URL`: service base URL (default: http://localhost:8080/geonetwork)
//! - `GN_USERNAME`: user name (default: admin)
//! - `GN_PASSWORD`: password (default: admin)
//! - `GN_VERSION`: server version tag, e.g. `V26`, `2.10`, `3` (default: V26)
//! - `GN_REQUEST_TIMEOUT_SECS`: per-request timeout (default: 30)
//! - `GN_SEARCH_MAX_RETRIES`: delayed search attempts (default: 5)
//! - `GN_SEARCH_WAIT_MS`: first wait between attempts (default: 1000)
//! - `GN_SEARCH_WAIT_INCREMENT_MS`: wait growth per attempt (default: 1000)
//!
//! ```rust,ignore
//! // export GN_SERVICE_URL=http://catalog:8080/geonetwork
//! // export GN_VERSION=2.10
//! let config = GnConfig::from_env()?.with_request_timeout(Duration::from_secs(5));
//! let client = connect_from_config(&config)?;
//! ```

use super::error::GnResult;
use super::http::DEFAULT_REQUEST_TIMEOUT;
use super::test_harness::verifier::RetryPolicy;
use super::version::GnVersion;
use std::env;
use std::time::Duration;

pub const DEFAULT_SERVICE_URL: &str = "http://localhost:8080/geonetwork";

/// Connection and harness settings for one GeoNetwork instance
#[derive(Debug, Clone)]
pub struct GnConfig {
    /// Service base URL, e.g. `http://localhost:8080/geonetwork`
    pub service_url: String,

    pub username: String,

    pub password: String,

    /// Declared server version
    pub version: GnVersion,

    /// Per-request HTTP timeout
    pub request_timeout: Duration,

    /// Delayed search policy used by the harness
    pub search_retry: RetryPolicy,
}

impl GnConfig {
    pub fn new(
        service_url: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
        version: GnVersion,
    ) -> Self {
        Self {
            service_url: service_url.into(),
            username: username.into(),
            password: password.into(),
            version,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            search_retry: RetryPolicy::default(),
        }
    }

    /// Load configuration from environment variables with fallback to defaults
    ///
    /// Fails only when `GN_VERSION` is set to an unknown version; bad numeric
    /// values fall back to their defaults.
    pub fn from_env() -> GnResult<Self> {
        let service_url =
            env::var("GN_SERVICE_URL").unwrap_or_else(|_| DEFAULT_SERVICE_URL.to_string());
        let username = env::var("GN_USERNAME").unwrap_or_else(|_| "admin".to_string());
        let password = env::var("GN_PASSWORD").unwrap_or_else(|_| "admin".to_string());

        let version = match env::var("GN_VERSION") {
            Ok(tag) => tag.parse()?,
            Err(_) => GnVersion::V26,
        };

        let request_timeout = env_u64("GN_REQUEST_TIMEOUT_SECS")
            .map(Duration::from_secs)
            .unwrap_or(DEFAULT_REQUEST_TIMEOUT);

        let defaults = RetryPolicy::default();
        let search_retry = RetryPolicy {
            max_attempts: env_u64("GN_SEARCH_MAX_RETRIES")
                .and_then(|v| u32::try_from(v).ok())
                .unwrap_or(defaults.max_attempts),
            initial_wait: env_u64("GN_SEARCH_WAIT_MS")
                .map(Duration::from_millis)
                .unwrap_or(defaults.initial_wait),
            wait_increment: env_u64("GN_SEARCH_WAIT_INCREMENT_MS")
                .map(Duration::from_millis)
                .unwrap_or(defaults.wait_increment),
            ..defaults
        };
        search_retry.validate()?;

        Ok(Self {
            service_url,
            username,
            password,
            version,
            request_timeout,
            search_retry,
        })
    }

    pub fn with_service_url(mut self, service_url: impl Into<String>) -> Self {
        self.service_url = service_url.into();
        self
    }

    pub fn with_credentials(
        mut self,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        self.username = username.into();
        self.password = password.into();
        self
    }

    pub fn with_version(mut self, version: GnVersion) -> Self {
        self.version = version;
        self
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    pub fn with_search_retry(mut self, policy: RetryPolicy) -> Self {
        self.search_retry = policy;
        self
    }

    /// Summary for logging. The password is never included.
    pub fn summary(&self) -> String {
        format!(
            "GN Configuration: url={}, user={}, version={}, timeout={}s, search_attempts={}, search_wait={}ms+{}ms",
            self.service_url,
            self.username,
            self.version,
            self.request_timeout.as_secs(),
            self.search_retry.max_attempts,
            self.search_retry.initial_wait.as_millis(),
            self.search_retry.wait_increment.as_millis(),
        )
    }
}

impl Default for GnConfig {
    fn default() -> Self {
        Self::new(DEFAULT_SERVICE_URL, "admin", "admin", GnVersion::V26)
    }
}

fn env_u64(key: &str) -> Option<u64> {
    env::var(key).ok().and_then(|v| v.trim().parse().ok())
}
