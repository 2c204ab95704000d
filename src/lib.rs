//! GeoSearch-RS: charging-station and point-of-interest search gateway
//!
//! Plans a handful of provider queries per request, runs them concurrently,
//! merges and deduplicates what comes back, and returns one canonical shape.
//! EV reachable-range and route calls are forwarded to the same provider.

pub mod config;
pub mod error;
pub mod metrics;
pub mod network;
pub mod providers;
pub mod results;
pub mod routing;
pub mod search;
pub mod web;

pub use config::Settings;
pub use error::SearchError;
pub use providers::SearchProvider;
pub use results::{CanonicalPoi, ResultContainer};
pub use routing::RoutingService;
pub use search::{ResultAggregator, SearchQuery};

/// Application version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default per-query timeout in seconds
pub const DEFAULT_TIMEOUT: u64 = 5;

/// Maximum per-query timeout that can be set
pub const MAX_TIMEOUT: u64 = 30;
