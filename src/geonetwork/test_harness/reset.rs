//! Catalog reset between scenarios
//!
//! Every scenario starts from an empty catalog. Deletions go through the
//! same asynchronous indexing as inserts, so the reset is only considered
//! done once a delayed search confirms zero hits.

use super::verifier::{DelayedSearch, Waiter};
use crate::geonetwork::client::CatalogClient;
use crate::geonetwork::error::GnResult;
use crate::geonetwork::search::SearchRequest;
use log::info;

/// Delete every metadata record and wait until the index shows none.
///
/// Returns the number of records deleted.
pub fn remove_all_metadata<C, W>(client: &mut C, verifier: &DelayedSearch<W>) -> GnResult<usize>
where
    C: CatalogClient + ?Sized,
    W: Waiter,
{
    // No filter: every record matches
    let request = SearchRequest::new();
    let response = client.search(&request)?;

    info!("Found {} existing metadata", response.count());

    let mut removed = 0;
    for metadata in &response {
        info!("Removing MD ID:{} UUID:{}", metadata.id, metadata.uuid);
        client.delete_metadata(metadata.id)?;
        removed += 1;
    }

    verifier.assert_count(0, client, &request)?;
    info!("All metadata removed successfully");
    Ok(removed)
}

/// Log the scenario banner and reset the catalog.
pub fn begin_scenario<C, W>(
    name: &str,
    client: &mut C,
    verifier: &DelayedSearch<W>,
) -> GnResult<usize>
where
    C: CatalogClient + ?Sized,
    W: Waiter,
{
    info!("====================> {}", name);
    remove_all_metadata(client, verifier)
}

