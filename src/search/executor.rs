//! Single sub-query execution with failure isolation

use super::models::SearchQuery;
use crate::network::HttpClient;
use crate::providers::SearchProvider;
use crate::results::{QueryFailure, RawProviderRecord};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::time::timeout;
use tracing::{debug, error, warn};

/// How one sub-query ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryStatus {
    Succeeded,
    Failed(QueryFailure),
}

impl QueryStatus {
    pub fn is_success(&self) -> bool {
        matches!(self, QueryStatus::Succeeded)
    }
}

/// Result of running one [`SearchQuery`]
#[derive(Debug, Clone)]
pub struct QueryOutcome {
    /// Category tag of the originating query
    pub category: String,
    /// Records in provider order; empty on failure
    pub records: Vec<RawProviderRecord>,
    pub status: QueryStatus,
    pub elapsed: Duration,
}

impl QueryOutcome {
    fn failed(category: String, failure: QueryFailure, elapsed: Duration) -> Self {
        Self {
            category,
            records: Vec::new(),
            status: QueryStatus::Failed(failure),
            elapsed,
        }
    }
}

/// Runs sub-queries against one provider, one attempt each
#[derive(Clone)]
pub struct QueryExecutor {
    client: HttpClient,
    provider: Arc<dyn SearchProvider>,
    timeout: Duration,
}

impl QueryExecutor {
    pub fn new(client: HttpClient, provider: Arc<dyn SearchProvider>) -> Self {
        Self {
            client,
            provider,
            timeout: Duration::from_secs(crate::DEFAULT_TIMEOUT),
        }
    }

    /// Set per-query timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn provider(&self) -> &Arc<dyn SearchProvider> {
        &self.provider
    }

    /// Execute one query. Never fails: any problem yields an empty outcome.
    pub async fn execute(&self, query: SearchQuery) -> QueryOutcome {
        let category = query.category().to_string();
        let start = Instant::now();

        let request = match self.provider.request(&query) {
            Ok(req) => req,
            Err(e) => {
                error!("Failed to build request for '{}': {}", category, e);
                return QueryOutcome::failed(category, QueryFailure::Request, start.elapsed());
            }
        };

        debug!(
            "Querying {:?} '{}' with timeout {:?}",
            query.endpoint_kind(),
            category,
            self.timeout
        );

        let result = timeout(
            self.timeout,
            self.client.execute_with_timeout(request, self.timeout),
        )
        .await;
        let elapsed = start.elapsed();

        let response = match result {
            Ok(Ok(response)) => response,
            Ok(Err(e)) => {
                warn!("Request failed for '{}': {}", category, e);
                let failure = match e.downcast_ref::<reqwest::Error>() {
                    Some(err) if err.is_timeout() => QueryFailure::Timeout,
                    _ => QueryFailure::Network,
                };
                return QueryOutcome::failed(category, failure, elapsed);
            }
            Err(_) => {
                warn!("Timeout for '{}' after {:?}", category, elapsed);
                return QueryOutcome::failed(category, QueryFailure::Timeout, elapsed);
            }
        };

        let status = response.status;
        if !response.is_success() {
            warn!("'{}' returned HTTP {}", category, status);
            return QueryOutcome::failed(category, QueryFailure::HttpStatus(status), elapsed);
        }

        match self.provider.response(response) {
            Ok(records) => {
                debug!(
                    "'{}' returned {} records in {:?}",
                    category,
                    records.len(),
                    elapsed
                );
                QueryOutcome {
                    category,
                    records,
                    status: QueryStatus::Succeeded,
                    elapsed,
                }
            }
            Err(e) => {
                warn!("Failed to parse response for '{}': {}", category, e);
                QueryOutcome::failed(category, QueryFailure::Parse, elapsed)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::TomTom;
    use crate::search::SearchArea;

    #[tokio::test]
    async fn test_unconfigured_provider_fails_locally() {
        let executor = QueryExecutor::new(HttpClient::new().unwrap(), Arc::new(TomTom::new(None)));
        let area = SearchArea::new(37.77, -122.42, 1000.0, 10).unwrap();
        let query = SearchQuery::keyword_search("cafe", "restaurants", &area, 10);

        let outcome = executor.execute(query).await;

        assert_eq!(outcome.category, "restaurants");
        assert!(outcome.records.is_empty());
        assert_eq!(outcome.status, QueryStatus::Failed(QueryFailure::Request));
    }
}
