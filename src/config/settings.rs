//! Settings structures for GeoSearch-RS configuration

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Main settings structure matching settings.yml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub general: GeneralSettings,
    pub server: ServerSettings,
    pub outgoing: OutgoingSettings,
    pub provider: ProviderSettings,
    pub search: SearchSettings,
}

impl Settings {
    /// Load settings from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let settings: Settings = serde_yaml::from_str(&content)?;
        Ok(settings)
    }

    /// Merge with environment variables
    pub fn merge_env(&mut self) {
        self.merge_from(|key| std::env::var(key).ok());
    }

    /// Apply overrides from an arbitrary key lookup (environment in production)
    pub fn merge_from<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(val) = lookup("GEOSEARCH_DEBUG") {
            self.general.debug = val.parse().unwrap_or(false);
        }
        if let Some(val) = lookup("TOMTOM_API_KEY") {
            if !val.trim().is_empty() {
                self.provider.api_key = Some(val);
            }
        }
        if let Some(val) = lookup("TOMTOM_BASE_URL") {
            self.provider.base_url = val;
        }
        // GEOSEARCH_PORT wins over the bare PORT most hosting platforms set
        for key in ["PORT", "GEOSEARCH_PORT"] {
            if let Some(port) = lookup(key).and_then(|v| v.parse().ok()) {
                self.server.port = port;
            }
        }
        if let Some(val) = lookup("GEOSEARCH_BIND_ADDRESS") {
            self.server.bind_address = val;
        }
        if let Some(val) = lookup("FRONTEND_URL") {
            self.server.allowed_origins = vec![val];
        }
    }

    /// Per-query timeout, clamped to the configured maximum
    pub fn query_timeout(&self) -> Duration {
        let max = self
            .outgoing
            .max_request_timeout
            .unwrap_or(crate::MAX_TIMEOUT as f64);
        Duration::from_secs_f64(self.outgoing.request_timeout.clamp(0.1, max))
    }

    /// Request-level deadline for one aggregation
    pub fn aggregate_timeout(&self) -> Duration {
        Duration::from_secs_f64(self.search.aggregate_timeout.max(0.1))
    }
}

/// General settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralSettings {
    /// Enable debug logging
    pub debug: bool,
    /// Instance name reported by /health
    pub instance_name: String,
}

impl Default for GeneralSettings {
    fn default() -> Self {
        Self {
            debug: false,
            instance_name: "GeoSearch".to_string(),
        }
    }
}

/// Server settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    /// Server port
    pub port: u16,
    /// Bind address
    pub bind_address: String,
    /// Origins allowed by the CORS layer
    pub allowed_origins: Vec<String>,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            port: 3001,
            bind_address: "127.0.0.1".to_string(),
            allowed_origins: vec!["http://localhost:5173".to_string()],
        }
    }
}

/// Outgoing request settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutgoingSettings {
    /// Per-query timeout in seconds
    pub request_timeout: f64,
    /// Upper bound for `request_timeout`
    pub max_request_timeout: Option<f64>,
    /// Pool max idle connections per host
    pub pool_maxsize: usize,
    /// Verify SSL certificates
    pub verify_ssl: bool,
    /// Proxy settings
    pub proxies: ProxySettings,
}

impl Default for OutgoingSettings {
    fn default() -> Self {
        Self {
            request_timeout: crate::DEFAULT_TIMEOUT as f64,
            max_request_timeout: Some(crate::MAX_TIMEOUT as f64),
            pool_maxsize: 20,
            verify_ssl: true,
            proxies: ProxySettings::default(),
        }
    }
}

/// Proxy settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ProxySettings {
    pub http: Option<String>,
    pub https: Option<String>,
    pub all: Option<String>,
}

/// External geo-search provider settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderSettings {
    /// API base URL
    pub base_url: String,
    /// API key; absent means every aggregation fails with a configuration error
    pub api_key: Option<String>,
    /// Geopolitical view parameter
    pub view: String,
}

impl Default for ProviderSettings {
    fn default() -> Self {
        Self {
            base_url: "https://api.tomtom.com".to_string(),
            api_key: None,
            view: "Unified".to_string(),
        }
    }
}

/// Search behavior settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchSettings {
    /// Radius in meters when the request omits one
    pub default_radius: f64,
    /// Result limit when the request omits one
    pub default_limit: u32,
    /// POI categories when the request omits them
    pub default_categories: Vec<String>,
    /// Distinct POI categories accepted per request
    pub max_categories: usize,
    /// Maximum sub-queries in flight per aggregation
    pub max_in_flight: usize,
    /// Request-level deadline in seconds
    pub aggregate_timeout: f64,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            default_radius: 50_000.0,
            default_limit: 100,
            default_categories: vec!["parks".to_string()],
            max_categories: 10,
            max_in_flight: 8,
            aggregate_timeout: 15.0,
        }
    }
}
