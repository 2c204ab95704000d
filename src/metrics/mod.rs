//! Metrics collection module
//!
//! Tracks sub-query outcomes and latency per category tag, plus aggregation
//! totals. Nothing here is surfaced in search responses.

use serde::Serialize;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::RwLock;

/// Process-wide metrics collector
pub struct Metrics {
    /// Total aggregation count
    pub total_aggregations: AtomicU64,
    /// Aggregations where every sub-query failed
    pub total_outages: AtomicU64,
    /// Sub-query response times per category (last 100, in ms)
    response_times: RwLock<HashMap<String, Vec<u64>>>,
    /// Sub-query failure counts per category
    failures: RwLock<HashMap<String, u64>>,
    /// Sub-query success counts per category
    successes: RwLock<HashMap<String, u64>>,
}

impl Metrics {
    /// Create a new metrics instance
    pub fn new() -> Self {
        Self {
            total_aggregations: AtomicU64::new(0),
            total_outages: AtomicU64::new(0),
            response_times: RwLock::new(HashMap::new()),
            failures: RwLock::new(HashMap::new()),
            successes: RwLock::new(HashMap::new()),
        }
    }

    /// Increment aggregation count
    pub fn inc_aggregation(&self) {
        self.total_aggregations.fetch_add(1, Ordering::Relaxed);
    }

    /// Increment outage count
    pub fn inc_outage(&self) {
        self.total_outages.fetch_add(1, Ordering::Relaxed);
    }

    /// Record sub-query response time
    pub fn record_response_time(&self, category: &str, time_ms: u64) {
        let Ok(mut times) = self.response_times.write() else {
            return;
        };
        let entry = times.entry(category.to_string()).or_default();

        // Keep last 100 response times
        if entry.len() >= 100 {
            entry.remove(0);
        }
        entry.push(time_ms);
    }

    /// Record sub-query failure
    pub fn record_failure(&self, category: &str) {
        Self::bump(&self.failures, category);
    }

    /// Record sub-query success
    pub fn record_success(&self, category: &str) {
        Self::bump(&self.successes, category);
    }

    fn bump(map: &RwLock<HashMap<String, u64>>, category: &str) {
        if let Ok(mut counts) = map.write() {
            *counts.entry(category.to_string()).or_insert(0) += 1;
        }
    }

    /// Get total aggregations
    pub fn get_total_aggregations(&self) -> u64 {
        self.total_aggregations.load(Ordering::Relaxed)
    }

    /// Get average response time for a category
    pub fn get_avg_response_time(&self, category: &str) -> Option<u64> {
        let times = self.response_times.read().ok()?;
        times.get(category).and_then(|t| {
            if t.is_empty() {
                None
            } else {
                Some(t.iter().sum::<u64>() / t.len() as u64)
            }
        })
    }

    /// Success/failure counts for a category
    pub fn get_counts(&self, category: &str) -> (u64, u64) {
        let read = |map: &RwLock<HashMap<String, u64>>| {
            map.read()
                .ok()
                .and_then(|m| m.get(category).copied())
                .unwrap_or(0)
        };
        (read(&self.successes), read(&self.failures))
    }

    /// Get reliability percentage for a category
    pub fn get_reliability(&self, category: &str) -> f64 {
        let (success_count, error_count) = self.get_counts(category);

        let total = error_count + success_count;
        if total == 0 {
            100.0
        } else {
            (success_count as f64 / total as f64) * 100.0
        }
    }

    /// Snapshot of everything, for the stats endpoint
    pub fn snapshot(&self) -> MetricsSnapshot {
        let mut names: Vec<String> = Vec::new();
        for map in [&self.successes, &self.failures] {
            if let Ok(m) = map.read() {
                names.extend(m.keys().cloned());
            }
        }
        names.sort();
        names.dedup();

        let categories = names
            .into_iter()
            .map(|name| {
                let (succeeded, failed) = self.get_counts(&name);
                let stats = CategoryStats {
                    succeeded,
                    failed,
                    avg_response_time: self.get_avg_response_time(&name),
                    reliability: self.get_reliability(&name),
                };
                (name, stats)
            })
            .collect();

        MetricsSnapshot {
            aggregations: self.get_total_aggregations(),
            outages: self.total_outages.load(Ordering::Relaxed),
            categories,
        }
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

/// Statistics for a single category tag
#[derive(Debug, Clone, Serialize)]
pub struct CategoryStats {
    pub succeeded: u64,
    pub failed: u64,
    pub avg_response_time: Option<u64>,
    pub reliability: f64,
}

/// Point-in-time view of all metrics
#[derive(Debug, Clone, Serialize)]
pub struct MetricsSnapshot {
    pub aggregations: u64,
    pub outages: u64,
    pub categories: HashMap<String, CategoryStats>,
}
