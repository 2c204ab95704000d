//! Forwarding of routing calls to the provider

use super::models::{EvRouteQuery, ReachableRangeQuery};
use crate::error::{Result, SearchError};
use crate::network::HttpClient;
use crate::providers::{ProviderRequest, RoutingProvider};
use serde_json::Value;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{error, info, info_span, warn, Instrument};
use uuid::Uuid;

/// Issues one provider request per call and hands back its JSON body
pub struct RoutingService {
    client: HttpClient,
    provider: Arc<dyn RoutingProvider>,
    timeout: Duration,
}

impl RoutingService {
    pub fn new(client: HttpClient, provider: Arc<dyn RoutingProvider>) -> Self {
        Self {
            client,
            provider,
            timeout: Duration::from_secs(crate::DEFAULT_TIMEOUT),
        }
    }

    /// Set request timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Fail fast when the provider cannot be called at all
    pub fn ensure_configured(&self) -> Result<()> {
        if self.provider.is_configured() {
            Ok(())
        } else {
            Err(SearchError::MissingCredentials {
                provider: self.provider.display_name().to_string(),
            })
        }
    }

    /// Area reachable on the query's energy budget
    pub async fn reachable_range(&self, query: &ReachableRangeQuery) -> Result<Value> {
        const OPERATION: &str = "reachable range";
        self.ensure_configured()?;
        let request = self
            .provider
            .reachable_range_request(query)
            .map_err(|e| unavailable(OPERATION, e))?;
        self.forward(OPERATION, request).await
    }

    /// Route with charging-aware consumption between two waypoints
    pub async fn ev_route(&self, query: &EvRouteQuery) -> Result<Value> {
        const OPERATION: &str = "EV route";
        self.ensure_configured()?;
        let request = self
            .provider
            .ev_route_request(query)
            .map_err(|e| unavailable(OPERATION, e))?;
        self.forward(OPERATION, request).await
    }

    async fn forward(&self, operation: &'static str, request: ProviderRequest) -> Result<Value> {
        let span = info_span!("forward", operation, request_id = %Uuid::new_v4());

        async move {
            let start = Instant::now();
            let response = self
                .client
                .execute_with_timeout(request, self.timeout)
                .await
                .map_err(|e| unavailable(operation, e))?;

            if !response.is_success() {
                warn!("Provider answered HTTP {} for {}", response.status, operation);
                return Err(SearchError::ProviderStatus {
                    provider: self.provider.display_name().to_string(),
                    status: response.status,
                    body: response.text,
                });
            }

            let data: Value = response.json().map_err(|e| unavailable(operation, e))?;
            info!("{} calculated in {:?}", operation, start.elapsed());
            Ok(data)
        }
        .instrument(span)
        .await
    }
}

fn unavailable(operation: &'static str, err: anyhow::Error) -> SearchError {
    error!("Failed to calculate {}: {}", operation, err);
    SearchError::ProviderUnavailable {
        operation,
        reason: err.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::TomTom;
    use crate::search::Location;

    #[tokio::test]
    async fn test_unconfigured_provider_is_fatal() {
        let service = RoutingService::new(HttpClient::new().unwrap(), Arc::new(TomTom::new(None)));
        let query = ReachableRangeQuery::new(Location::new(37.77, -122.42).unwrap(), 40.0).unwrap();

        let err = service.reachable_range(&query).await.unwrap_err();
        assert!(matches!(err, SearchError::MissingCredentials { .. }));
    }
}
