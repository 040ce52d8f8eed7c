//! Liveness and authentication check for GeoNetwork instances.
//!
//! The probe hits a cheap, side-effect free service (`test.csw`) that answers
//! 200 to both anonymous and authenticated sessions. It never retries and
//! never fails loudly: every problem is logged and reported as `false`.

use super::http::{Transport, TransportError};
use super::version::GnInfo;
use log::{debug, error, info};

/// Build the health check URL for a service
pub fn health_check_url(service_url: &str, info: &GnInfo) -> String {
    format!(
        "{}{}",
        service_url.trim_end_matches('/'),
        info.health_check_path()
    )
}

/// Ping a GeoNetwork instance through `transport`.
///
/// Returns `true` only when the health check endpoint answers HTTP 200.
pub fn ping<T: Transport + ?Sized>(transport: &mut T, service_url: &str, info: &GnInfo) -> bool {
    debug!("PING {} ({})", service_url, info.version());

    transport.set_ignore_response_content_on_success(true);
    let url = health_check_url(service_url, info);

    match transport.get(&url) {
        Ok(_) => {}
        Err(TransportError::MalformedUrl { url, reason }) => {
            error!("Malformed health check URL '{}': {}", url, reason);
            return false;
        }
        Err(e) => {
            info!("PING failed: {}", e);
            return false;
        }
    }

    if transport.last_status() != Some(200) {
        info!(
            "PING failed: {} answered {:?}",
            url,
            transport.last_status()
        );
        return false;
    }

    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geonetwork::version::GnVersion;

    #[test]
    fn test_health_check_url_per_version() {
        assert_eq!(
            health_check_url("http://localhost:8080/geonetwork", GnVersion::V26.info()),
            "http://localhost:8080/geonetwork/srv/en/test.csw"
        );
        assert_eq!(
            health_check_url("http://localhost:8080/geonetwork/", GnVersion::V3.info()),
            "http://localhost:8080/geonetwork/srv/eng/test.csw"
        );
    }
}
