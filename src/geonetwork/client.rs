//! GeoNetwork catalog client and version-aware client factory
//!
//! [`GnClient`] talks to the XML services of a GeoNetwork instance using the
//! protocol fragments of its [`GnInfo`] descriptor. Clients are normally
//! obtained through [`connect`] (or [`connect_with`] for a custom
//! transport), which resolves the version, builds the client and pings it
//! once before handing it out.
//!
//! ```rust,no_run
//! use geonetwork_manager::geonetwork::client::{connect, CatalogClient};
//! use geonetwork_manager::geonetwork::search::SearchRequest;
//!
//! let mut client = connect("V28", "http://localhost:8080/geonetwork", "admin", "admin")?;
//! let response = client.search(&SearchRequest::new())?;
//! println!("{} records", response.count());
//! # Ok::<(), geonetwork_manager::geonetwork::error::GnError>(())
//! ```

use super::config::GnConfig;
use super::error::{GnError, GnResult};
use super::health;
use super::http::{HttpConnection, Transport};
use super::search::{SearchRequest, SearchResponse};
use super::version::{GnInfo, GnVersion};
use log::{debug, info};
use std::fs;
use std::path::Path;

/// Operations the harness needs from a catalog client
pub trait CatalogClient {
    /// Cheap liveness/auth check
    fn ping(&mut self) -> bool;

    /// Run a structured search
    fn search(&mut self, request: &SearchRequest) -> GnResult<SearchResponse>;

    /// Run a search from a raw request document on disk
    fn search_document(&mut self, document: &Path) -> GnResult<SearchResponse>;

    /// Delete a metadata record by its internal id
    fn delete_metadata(&mut self, id: i64) -> GnResult<()>;
}

/// Client for one GeoNetwork instance
pub struct GnClient<T: Transport = HttpConnection> {
    info: &'static GnInfo,
    service_url: String,
    connection: T,
}

impl<T: Transport> GnClient<T> {
    /// Build a client without checking the connection.
    ///
    /// Prefer [`connect_with`], which guarantees the client has been pinged.
    pub fn with_transport(
        version: GnVersion,
        service_url: impl Into<String>,
        connection: T,
    ) -> Self {
        Self {
            info: GnInfo::get(version),
            service_url: service_url.into().trim_end_matches('/').to_string(),
            connection,
        }
    }

    pub fn version(&self) -> GnVersion {
        self.info.version()
    }

    pub fn info(&self) -> &'static GnInfo {
        self.info
    }

    pub fn service_url(&self) -> &str {
        &self.service_url
    }

    pub fn connection(&self) -> &T {
        &self.connection
    }

    fn service(&self, name: &str) -> String {
        format!("{}{}", self.service_url, self.info.service_path(name))
    }

    /// POST a request document and return the body of a 200 response
    fn post(&mut self, url: &str, body: &str) -> GnResult<String> {
        self.connection.set_ignore_response_content_on_success(false);
        let response = self.connection.post_xml(url, body)?;

        match (self.connection.last_status(), response) {
            (Some(200), Some(body)) => Ok(body),
            (Some(200), None) => Err(GnError::parse(format!("empty response from {}", url))),
            (status, _) => Err(GnError::ServerError {
                url: url.to_string(),
                status: status.unwrap_or(0),
            }),
        }
    }

    fn run_search(&mut self, body: &str) -> GnResult<SearchResponse> {
        let url = self.service("xml.search");
        let xml = self.post(&url, body)?;
        let response = SearchResponse::parse(&xml)?;
        debug!("Search returned {} records", response.count());
        Ok(response)
    }
}

impl<T: Transport> CatalogClient for GnClient<T> {
    fn ping(&mut self) -> bool {
        health::ping(&mut self.connection, &self.service_url, self.info)
    }

    fn search(&mut self, request: &SearchRequest) -> GnResult<SearchResponse> {
        self.run_search(&request.to_xml())
    }

    fn search_document(&mut self, document: &Path) -> GnResult<SearchResponse> {
        let body = fs::read_to_string(document)
            .map_err(|e| GnError::io(document.display().to_string(), e))?;
        self.run_search(&body)
    }

    fn delete_metadata(&mut self, id: i64) -> GnResult<()> {
        let url = self.service("metadata.delete");
        let body = format!(
            "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<request><id>{}</id></request>",
            id
        );
        self.post(&url, &body)?;
        debug!("Deleted metadata {}", id);
        Ok(())
    }
}

/// Build a client over `transport` and ping it once.
///
/// Never returns a client whose health check did not pass.
pub fn connect_with<T: Transport>(
    version: GnVersion,
    service_url: &str,
    transport: T,
) -> GnResult<GnClient<T>> {
    let mut client = GnClient::with_transport(version, service_url, transport);

    if !client.ping() {
        return Err(GnError::ConnectionFailed {
            service_url: service_url.to_string(),
            version,
        });
    }

    info!("Connected to GN {} at {}", version, service_url);
    Ok(client)
}

/// Resolve `version_tag`, build an authenticated HTTP client and ping it.
///
/// Fails with `UnsupportedVersion` before touching the network when the tag
/// is unknown, and with `ConnectionFailed` when the ping does not pass.
pub fn connect(
    version_tag: &str,
    service_url: &str,
    username: &str,
    password: &str,
) -> GnResult<GnClient<HttpConnection>> {
    let version: GnVersion = version_tag.parse()?;
    let connection = HttpConnection::new()?.with_credentials(username, password);
    connect_with(version, service_url, connection)
}

/// [`connect`] using a loaded configuration
pub fn connect_from_config(config: &GnConfig) -> GnResult<GnClient<HttpConnection>> {
    let connection = HttpConnection::with_timeout(config.request_timeout)?
        .with_credentials(config.username.as_str(), config.password.as_str());
    connect_with(config.version, &config.service_url, connection)
}
