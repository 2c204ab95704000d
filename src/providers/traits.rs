//! Provider traits and types

use crate::results::RawProviderRecord;
use crate::routing::{EvRouteQuery, ReachableRangeQuery};
use crate::search::SearchQuery;
use std::collections::HashMap;

/// HTTP request to be made for one sub-query
#[derive(Debug, Clone)]
pub struct ProviderRequest {
    /// URL to request, path already encoded
    pub url: String,
    /// Query parameters
    pub params: HashMap<String, String>,
}

impl ProviderRequest {
    /// Create a GET request
    pub fn get(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            params: HashMap::new(),
        }
    }

    /// Add a query parameter
    pub fn param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.insert(key.into(), value.into());
        self
    }
}

/// HTTP response from a provider request
#[derive(Debug)]
pub struct ProviderResponse {
    /// HTTP status code
    pub status: u16,
    /// Response body as text
    pub text: String,
}

impl ProviderResponse {
    /// Parse response as JSON
    pub fn json<T: serde::de::DeserializeOwned>(&self) -> anyhow::Result<T> {
        Ok(serde_json::from_str(&self.text)?)
    }

    /// Check if response is successful (2xx)
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// A geo-search provider offering category-code and keyword search.
///
/// Implementations only translate: building the request for a query and
/// parsing a response into raw records. Transport, timeouts and failure
/// isolation belong to the executor.
pub trait SearchProvider: Send + Sync {
    /// Short identifier, also used as the `source` of canonical records
    fn name(&self) -> &str;

    /// Human-readable name for error messages
    fn display_name(&self) -> &str {
        self.name()
    }

    /// Whether credentials are present
    fn is_configured(&self) -> bool;

    /// Build the HTTP request for a query
    fn request(&self, query: &SearchQuery) -> anyhow::Result<ProviderRequest>;

    /// Parse the HTTP response into raw records, preserving provider order
    fn response(&self, response: ProviderResponse) -> anyhow::Result<Vec<RawProviderRecord>>;
}

/// A search provider that also calculates EV reachable ranges and routes.
///
/// Responses are forwarded to the caller as-is, so only request building
/// is provider specific.
pub trait RoutingProvider: SearchProvider {
    /// Build the reachable-range request
    fn reachable_range_request(&self, query: &ReachableRangeQuery) -> anyhow::Result<ProviderRequest>;

    /// Build the charge-aware route request
    fn ev_route_request(&self, query: &EvRouteQuery) -> anyhow::Result<ProviderRequest>;
}
