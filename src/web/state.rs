//! Application state shared across handlers

use crate::config::Settings;
use crate::metrics::Metrics;
use crate::network::HttpClient;
use crate::providers::TomTom;
use crate::routing::RoutingService;
use crate::search::ResultAggregator;
use std::sync::Arc;
use std::time::Instant;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Global settings
    pub settings: Arc<Settings>,
    /// Search aggregator
    pub aggregator: Arc<ResultAggregator>,
    /// Range and route pass-through
    pub routing: Arc<RoutingService>,
    /// Sub-query metrics
    pub metrics: Arc<Metrics>,
    /// Process start, for uptime reporting
    pub started_at: Instant,
}

impl AppState {
    /// Create new application state backed by the TomTom provider
    pub fn new(settings: Settings, client: HttpClient) -> Self {
        let provider = Arc::new(TomTom::with_settings(&settings.provider));
        let metrics = Arc::new(Metrics::new());

        let routing = RoutingService::new(client.clone(), provider.clone())
            .with_timeout(settings.query_timeout());
        let aggregator = ResultAggregator::new(client, provider)
            .with_timeout(settings.query_timeout())
            .with_aggregate_timeout(settings.aggregate_timeout())
            .with_max_in_flight(settings.search.max_in_flight)
            .with_max_categories(settings.search.max_categories)
            .with_metrics(metrics.clone());

        Self {
            settings: Arc::new(settings),
            aggregator: Arc::new(aggregator),
            routing: Arc::new(routing),
            metrics,
            started_at: Instant::now(),
        }
    }

    /// Get instance name
    pub fn instance_name(&self) -> &str {
        &self.settings.general.instance_name
    }
}
