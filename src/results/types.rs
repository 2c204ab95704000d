//! Result type definitions

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One record exactly as the provider returned it.
///
/// Every field is optional from our point of view; accessors never panic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawProviderRecord(Value);

impl RawProviderRecord {
    pub fn new(value: Value) -> Self {
        Self(value)
    }

    /// Provider-assigned identifier. Numeric ids are stringified.
    pub fn id(&self) -> Option<String> {
        match self.0.get("id")? {
            Value::String(id) if !id.is_empty() => Some(id.clone()),
            Value::Number(id) => Some(id.to_string()),
            _ => None,
        }
    }

    /// Walk a path of object keys
    pub fn get(&self, path: &[&str]) -> Option<&Value> {
        path.iter().try_fold(&self.0, |value, key| value.get(key))
    }

    /// String at `path`, if present and non-empty
    pub fn get_str(&self, path: &[&str]) -> Option<&str> {
        self.get(path)
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
    }

    /// Number at `path`, if present and numeric
    pub fn get_f64(&self, path: &[&str]) -> Option<f64> {
        self.get(path).and_then(Value::as_f64)
    }
}

/// A raw record tagged with the category of the query that first produced it
#[derive(Debug, Clone, PartialEq)]
pub struct TaggedRecord {
    pub id: String,
    pub record: RawProviderRecord,
    pub category: String,
}

/// Which canonical shape a search produces
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordKind {
    Station,
    Poi,
}

impl RecordKind {
    /// Display name used when the provider omits one
    pub fn placeholder_name(&self) -> &'static str {
        match self {
            RecordKind::Station => "Unknown Station",
            RecordKind::Poi => "Unknown POI",
        }
    }
}

/// Provider-agnostic station / point-of-interest record.
///
/// Numeric fields are passed through without range checks, but they are typed:
/// a provider value that is not a JSON number (say `"lat": "north"`) becomes
/// `None` rather than being echoed back as-is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanonicalPoi {
    pub id: String,
    pub name: String,
    /// Tag of the query that first surfaced this record
    pub category: String,
    pub address: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    #[serde(rename = "distance")]
    pub distance_meters: Option<f64>,
    pub phone: Option<String>,
    pub url: Option<String>,
    #[serde(rename = "categories")]
    pub raw_categories: Vec<String>,
    pub source: String,
}

/// Why a single sub-query produced nothing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QueryFailure {
    /// The request could not be built
    Request,
    /// Transport-level failure
    Network,
    /// Non-success HTTP status
    HttpStatus(u16),
    /// Body was not a valid provider payload
    Parse,
    /// Per-query deadline elapsed
    Timeout,
}

impl std::fmt::Display for QueryFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            QueryFailure::Request => write!(f, "request error"),
            QueryFailure::Network => write!(f, "network error"),
            QueryFailure::HttpStatus(status) => write!(f, "HTTP {}", status),
            QueryFailure::Parse => write!(f, "parse error"),
            QueryFailure::Timeout => write!(f, "timeout"),
        }
    }
}

/// Per-call bookkeeping for one aggregation
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AggregationStats {
    /// Sub-queries in the plan
    pub planned: usize,
    /// Sub-queries that returned a payload
    pub succeeded: usize,
    /// Sub-queries that failed (transport, status, parse)
    pub failed: usize,
    /// Sub-queries that hit their own deadline
    pub timed_out: usize,
    /// Sub-queries dropped when the request-level deadline fired
    pub cancelled: usize,
    /// Records discarded because their id was already seen
    pub duplicates: usize,
    /// Records discarded because they carried no id
    pub missing_id: usize,
}

impl AggregationStats {
    pub fn new(planned: usize) -> Self {
        Self {
            planned,
            ..Default::default()
        }
    }

    /// Sub-queries that finished one way or another
    pub fn completed(&self) -> usize {
        self.succeeded + self.failed + self.timed_out
    }

    /// True when there was something to ask and nothing answered
    pub fn all_failed(&self) -> bool {
        self.planned > 0 && self.succeeded == 0
    }
}
