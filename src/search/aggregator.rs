//! Scatter-gather over a query plan

use super::executor::{QueryExecutor, QueryOutcome, QueryStatus};
use super::models::{PoiSearch, SearchArea, SearchFilter, SearchQuery, StationSearch};
use super::plan::{distinct_categories, metrics_tag, SearchPlanBuilder};
use crate::error::{Result, SearchError};
use crate::metrics::Metrics;
use crate::network::HttpClient;
use crate::providers::SearchProvider;
use crate::results::{
    AggregationStats, CanonicalPoi, QueryFailure, ResponseNormalizer, ResultContainer,
    TaggedRecord,
};
use futures::stream::{self, StreamExt};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::{timeout_at, Instant};
use tracing::{debug, info, info_span, warn, Instrument};
use uuid::Uuid;

/// Merged, id-unique records of one plan, in first-seen order
#[derive(Debug)]
pub struct Aggregation {
    pub records: Vec<TaggedRecord>,
    pub stats: AggregationStats,
}

/// Canonical answer for one user-facing search
#[derive(Debug)]
pub struct SearchResponse {
    pub results: Vec<CanonicalPoi>,
    pub total_results: usize,
    /// Internal bookkeeping; not part of the public response body
    pub stats: AggregationStats,
}

/// Coordinates concurrent sub-queries and merges what they return
pub struct ResultAggregator {
    executor: QueryExecutor,
    metrics: Arc<Metrics>,
    /// Maximum sub-queries in flight
    max_in_flight: usize,
    /// Request-level deadline
    aggregate_timeout: Duration,
    /// Distinct POI categories accepted per request
    max_categories: usize,
}

impl ResultAggregator {
    /// Create a new aggregator
    pub fn new(client: HttpClient, provider: Arc<dyn SearchProvider>) -> Self {
        Self {
            executor: QueryExecutor::new(client, provider),
            metrics: Arc::new(Metrics::new()),
            max_in_flight: 8,
            aggregate_timeout: Duration::from_secs(15),
            max_categories: 10,
        }
    }

    /// Set per-query timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.executor = self.executor.with_timeout(timeout);
        self
    }

    /// Set request-level deadline
    pub fn with_aggregate_timeout(mut self, timeout: Duration) -> Self {
        self.aggregate_timeout = timeout;
        self
    }

    /// Bound concurrent sub-queries
    pub fn with_max_in_flight(mut self, max_in_flight: usize) -> Self {
        self.max_in_flight = max_in_flight.max(1);
        self
    }

    /// Bound distinct categories per POI search
    pub fn with_max_categories(mut self, max_categories: usize) -> Self {
        self.max_categories = max_categories;
        self
    }

    /// Share a metrics collector
    pub fn with_metrics(mut self, metrics: Arc<Metrics>) -> Self {
        self.metrics = metrics;
        self
    }

    pub fn metrics(&self) -> &Arc<Metrics> {
        &self.metrics
    }

    pub fn provider(&self) -> &Arc<dyn SearchProvider> {
        self.executor.provider()
    }

    /// Fail fast when the provider cannot be called at all
    pub fn ensure_configured(&self) -> Result<()> {
        let provider = self.provider();
        if provider.is_configured() {
            Ok(())
        } else {
            Err(SearchError::MissingCredentials {
                provider: provider.display_name().to_string(),
            })
        }
    }

    /// Charging stations near a location
    pub async fn search_stations(&self, search: &StationSearch) -> Result<SearchResponse> {
        self.search(&search.area, &SearchFilter::Charger(search.charger_type))
            .await
    }

    /// Categorized points of interest near a location
    pub async fn search_pois(&self, search: &PoiSearch) -> Result<SearchResponse> {
        let requested = distinct_categories(&search.categories).len();
        if requested > self.max_categories {
            return Err(SearchError::TooManyCategories {
                requested,
                max: self.max_categories,
            });
        }
        self.search(&search.area, &SearchFilter::Categories(search.categories.clone()))
            .await
    }

    /// Plan, aggregate and normalize
    pub async fn search(&self, area: &SearchArea, filter: &SearchFilter) -> Result<SearchResponse> {
        self.ensure_configured()?;

        let plan = SearchPlanBuilder::build(area, filter);
        let Aggregation { records, stats } = self.aggregate(plan).await;

        let normalizer = ResponseNormalizer::new(filter.record_kind(), self.provider().name());
        let results = normalizer.normalize_all(records);

        Ok(SearchResponse {
            total_results: results.len(),
            results,
            stats,
        })
    }

    /// Run every query of `plan` concurrently and merge as they complete.
    ///
    /// Outcomes are merged on this task only, in completion order; within one
    /// outcome the provider's record order is kept. The first query to
    /// deliver an id owns its category. Dropping the returned future cancels
    /// all outstanding sub-queries.
    pub async fn aggregate(&self, plan: Vec<SearchQuery>) -> Aggregation {
        let span = info_span!("aggregate", request_id = %Uuid::new_v4(), planned = plan.len());
        self.aggregate_inner(plan).instrument(span).await
    }

    async fn aggregate_inner(&self, plan: Vec<SearchQuery>) -> Aggregation {
        let planned = plan.len();
        let deadline = Instant::now() + self.aggregate_timeout;
        let mut stats = AggregationStats::new(planned);
        let mut container = ResultContainer::new();

        self.metrics.inc_aggregation();
        info!("Dispatching {} sub-queries", planned);

        let mut outcomes = stream::iter(plan)
            .map(|query| self.executor.execute(query))
            .buffer_unordered(self.max_in_flight);

        loop {
            match timeout_at(deadline, outcomes.next()).await {
                Ok(Some(outcome)) => self.merge(outcome, &mut container, &mut stats),
                Ok(None) => break,
                Err(_) => {
                    stats.cancelled = planned - stats.completed();
                    warn!(
                        "Aggregation deadline of {:?} reached; cancelling {} sub-queries",
                        self.aggregate_timeout, stats.cancelled
                    );
                    break;
                }
            }
        }

        if stats.all_failed() {
            self.metrics.inc_outage();
            warn!("All {} sub-queries failed; returning empty result", planned);
        }

        info!(
            succeeded = stats.succeeded,
            failed = stats.failed,
            timed_out = stats.timed_out,
            cancelled = stats.cancelled,
            duplicates = stats.duplicates,
            "Aggregated {} unique records",
            container.len()
        );

        Aggregation {
            records: container.into_records(),
            stats,
        }
    }

    fn merge(
        &self,
        outcome: QueryOutcome,
        container: &mut ResultContainer,
        stats: &mut AggregationStats,
    ) {
        let QueryOutcome {
            category,
            records,
            status,
            elapsed,
        } = outcome;

        let tag = metrics_tag(&category);
        self.metrics
            .record_response_time(tag, elapsed.as_millis() as u64);

        match status {
            QueryStatus::Succeeded => {
                stats.succeeded += 1;
                self.metrics.record_success(tag);
                let received = records.len();
                let added = container.extend(records, &category, stats);
                debug!("'{}' kept {} of {} records", category, added, received);
            }
            QueryStatus::Failed(failure) => {
                if failure == QueryFailure::Timeout {
                    stats.timed_out += 1;
                } else {
                    stats.failed += 1;
                }
                self.metrics.record_failure(tag);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::TomTom;
    use crate::search::ChargerType;

    fn aggregator(api_key: Option<&str>) -> ResultAggregator {
        ResultAggregator::new(
            HttpClient::new().unwrap(),
            Arc::new(TomTom::new(api_key.map(str::to_string))),
        )
    }

    #[tokio::test]
    async fn test_missing_credentials_is_fatal() {
        let search = StationSearch {
            area: SearchArea::new(37.77, -122.42, 50_000.0, 100).unwrap(),
            charger_type: ChargerType::Any,
        };

        let err = aggregator(None).search_stations(&search).await.unwrap_err();
        assert!(matches!(err, SearchError::MissingCredentials { .. }));
        assert_eq!(err.to_string(), "TomTom API key not configured");
    }

    #[tokio::test]
    async fn test_empty_plan() {
        let aggregation = aggregator(Some("k")).aggregate(Vec::new()).await;
        assert!(aggregation.records.is_empty());
        assert_eq!(aggregation.stats, AggregationStats::new(0));
        assert!(!aggregation.stats.all_failed());
    }

    #[tokio::test]
    async fn test_empty_categories_return_nothing() {
        let search = PoiSearch {
            area: SearchArea::new(37.77, -122.42, 50_000.0, 100).unwrap(),
            categories: Vec::new(),
        };
        let response = aggregator(Some("k")).search_pois(&search).await.unwrap();
        assert_eq!(response.total_results, 0);
        assert_eq!(response.stats.planned, 0);
    }

    #[tokio::test]
    async fn test_too_many_categories_rejected() {
        let area = SearchArea::new(37.77, -122.42, 50_000.0, 100).unwrap();
        let junk = PoiSearch {
            area,
            categories: (0..3).map(|i| format!("junk-{}", i)).collect(),
        };

        let err = aggregator(Some("k"))
            .with_max_categories(2)
            .search_pois(&junk)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            SearchError::TooManyCategories { requested: 3, max: 2 }
        ));
        assert!(err.is_input_error());
    }
}
