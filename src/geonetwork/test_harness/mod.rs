//! Test harness for scenarios against a live, eventually consistent catalog
//!
//! GeoNetwork updates its search index asynchronously. The harness provides:
//! - Delayed search assertions that absorb indexing lag
//! - Catalog reset between scenarios
//!
//! ```rust,no_run
//! use geonetwork_manager::geonetwork::client::connect_from_config;
//! use geonetwork_manager::geonetwork::config::GnConfig;
//! use geonetwork_manager::geonetwork::search::SearchRequest;
//! use geonetwork_manager::geonetwork::test_harness::{begin_scenario, DelayedSearch};
//!
//! let config = GnConfig::from_env()?;
//! let mut client = connect_from_config(&config)?;
//! let verifier = DelayedSearch::with_policy(config.search_retry.clone())?
//!     .with_label("insert_and_find");
//!
//! begin_scenario("insert_and_find", &mut client, &verifier)?;
//! // ... insert metadata ...
//! verifier.assert_count(1, &mut client, &SearchRequest::new())?;
//! # Ok::<(), geonetwork_manager::geonetwork::error::GnError>(())
//! ```

pub mod reset;
pub mod verifier;

pub use reset::{begin_scenario, remove_all_metadata};
pub use verifier::{
    DelayedSearch, InterruptHandle, InterruptPolicy, InterruptibleWaiter, RetryPolicy,
    SearchExpectation, ThreadWaiter, VerifyReport, WaitOutcome, Waiter,
};
