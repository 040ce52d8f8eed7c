//! # geonetwork-manager
//!
//! A version-aware client for GeoNetwork metadata catalogs, with a test
//! harness that copes with the catalog's asynchronous search indexing.
//!
//! ## Features
//!
//! - **Version dispatch**: each supported GeoNetwork release maps to a fixed
//!   protocol descriptor (language code, service paths)
//! - **Health probe**: cheap liveness/auth check that never errors, it only
//!   answers yes or no
//! - **Checked construction**: clients are pinged before they are handed out
//! - **Delayed search assertions**: searches are repeated with linear backoff
//!   until the index reflects inserts and deletes
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use geonetwork_manager::geonetwork::{connect, CatalogClient, SearchRequest};
//! use geonetwork_manager::geonetwork::test_harness::DelayedSearch;
//!
//! let mut client = connect("2.10", "http://localhost:8080/geonetwork", "admin", "admin")?;
//! for metadata in &client.search(&SearchRequest::new())? {
//!     client.delete_metadata(metadata.id)?;
//! }
//! DelayedSearch::new().assert_count(0, &mut client, &SearchRequest::new())?;
//! # Ok::<(), geonetwork_manager::geonetwork::GnError>(())
//! ```

pub mod geonetwork;
