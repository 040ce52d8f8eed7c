pub mod client;
pub mod config;
pub mod error;
pub mod health;
pub mod http;
pub mod search;
pub mod test_harness;
pub mod version;
pub mod xml;

// Re-export main types for convenience
pub use client::{connect, connect_from_config, connect_with, CatalogClient, GnClient};
pub use config::GnConfig;
pub use error::{GnError, GnResult};
pub use http::{HttpConnection, Transport, TransportError};
pub use search::{SearchEntry, SearchField, SearchRequest, SearchResponse};
pub use version::{GnInfo, GnVersion};
