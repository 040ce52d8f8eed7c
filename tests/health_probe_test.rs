//! Tests for the GeoNetwork health probe

mod common;

use common::{init_logging, Reply, ScriptedTransport};
use geonetwork_manager::geonetwork::health::ping;
use geonetwork_manager::geonetwork::http::{HttpConnection, Transport};
use geonetwork_manager::geonetwork::version::GnVersion;

/// A syntactically invalid base URL yields false, without panicking or sending
#[test]
fn test_invalid_base_url_returns_false() {
    init_logging();
    let mut connection = HttpConnection::new().unwrap();
    assert!(!ping(&mut connection, "not a url", GnVersion::V26.info()));
    assert_eq!(connection.last_status(), None);

    let mut transport = ScriptedTransport::new(vec![Reply::ok()]);
    assert!(!ping(&mut transport, "geonetwork", GnVersion::V28.info()));
    assert!(transport.requests.is_empty());
}

/// HTTP 200 is the only passing answer
#[test]
fn test_only_status_200_passes() {
    init_logging();
    let mut ok = ScriptedTransport::new(vec![Reply::ok()]);
    assert!(ping(&mut ok, "http://localhost:8080/geonetwork", GnVersion::V26.info()));

    for status in [201, 204, 302, 401, 403, 404, 500, 503] {
        let mut transport = ScriptedTransport::new(vec![Reply::status(status)]);
        assert!(
            !ping(&mut transport, "http://localhost:8080/geonetwork", GnVersion::V26.info()),
            "status {} must not pass",
            status
        );
    }
}

/// Connection failures are reported as false too
#[test]
fn test_transport_failure_returns_false() {
    init_logging();
    let mut transport = ScriptedTransport::new(vec![Reply::Fail("connection refused".into())]);
    assert!(!ping(&mut transport, "http://localhost:1/geonetwork", GnVersion::V3.info()));
}

/// The probe hits the version's test.csw with a GET and ignores the body
#[test]
fn test_probe_request_shape() {
    let mut transport = ScriptedTransport::new(vec![Reply::ok(), Reply::ok()]);
    ping(&mut transport, "http://gn.example.org/geonetwork", GnVersion::V26.info());
    ping(&mut transport, "http://gn.example.org/geonetwork/", GnVersion::V210.info());

    assert_eq!(transport.requests.len(), 2);
    assert_eq!(transport.requests[0].method, "GET");
    assert_eq!(
        transport.requests[0].url,
        "http://gn.example.org/geonetwork/srv/en/test.csw"
    );
    assert_eq!(
        transport.requests[1].url,
        "http://gn.example.org/geonetwork/srv/eng/test.csw"
    );
    assert!(transport.requests.iter().all(|r| r.ignoring_content));
}

/// One call, one request: the probe never retries
#[test]
fn test_probe_does_not_retry() {
    let mut transport = ScriptedTransport::new(vec![Reply::status(503), Reply::ok()]);
    assert!(!ping(&mut transport, "http://localhost:8080/geonetwork", GnVersion::V28.info()));
    assert_eq!(transport.requests.len(), 1);
}
