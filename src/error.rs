//! Caller-visible error types.
//!
//! Per-query provider failures during an aggregation never show up here: they
//! are absorbed by the executor and only counted. What remains is the
//! configuration and input taxonomy that stops a call before it starts, plus
//! the upstream failures of single-request routing pass-throughs.

/// Errors that abort a whole call.
#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    /// Provider credentials are absent.
    #[error("{provider} API key not configured")]
    MissingCredentials { provider: String },

    /// Required request fields were not supplied; holds the field list.
    #[error("{0} are required")]
    MissingParameter(&'static str),

    /// Latitude/longitude out of range or not finite.
    #[error("invalid location: lat={lat}, lon={lon}")]
    InvalidLocation { lat: f64, lon: f64 },

    /// Radius must be a positive number of meters.
    #[error("invalid radius: {0}")]
    InvalidRadius(f64),

    /// A supplied field has an unusable value.
    #[error("invalid {name}: {value}")]
    InvalidParameter { name: &'static str, value: String },

    /// More distinct POI categories than one request may fan out to.
    #[error("{requested} categories requested, at most {max} allowed")]
    TooManyCategories { requested: usize, max: usize },

    /// Pass-through call answered with a non-success status.
    #[error("{provider} API error: HTTP {status}")]
    ProviderStatus {
        provider: String,
        status: u16,
        body: String,
    },

    /// Pass-through call failed in transport or returned an unreadable body.
    #[error("failed to calculate {operation}: {reason}")]
    ProviderUnavailable {
        operation: &'static str,
        reason: String,
    },
}

impl SearchError {
    /// Whether the error stems from the caller's input rather than server setup
    /// or the provider.
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            SearchError::MissingParameter(_)
                | SearchError::InvalidLocation { .. }
                | SearchError::InvalidRadius(_)
                | SearchError::InvalidParameter { .. }
                | SearchError::TooManyCategories { .. }
        )
    }
}

/// Convenience type alias for search results.
pub type Result<T> = std::result::Result<T, SearchError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_missing_credentials() {
        let err = SearchError::MissingCredentials {
            provider: "TomTom".into(),
        };
        assert_eq!(err.to_string(), "TomTom API key not configured");
        assert!(!err.is_input_error());
    }

    #[test]
    fn display_invalid_location() {
        let err = SearchError::InvalidLocation { lat: 91.0, lon: 0.0 };
        assert_eq!(err.to_string(), "invalid location: lat=91, lon=0");
        assert!(err.is_input_error());
    }

    #[test]
    fn display_missing_parameter() {
        let err = SearchError::MissingParameter("latitude and longitude");
        assert_eq!(err.to_string(), "latitude and longitude are required");
    }

    #[test]
    fn provider_errors_are_not_input_errors() {
        let err = SearchError::ProviderStatus {
            provider: "TomTom".into(),
            status: 403,
            body: "Forbidden".into(),
        };
        assert_eq!(err.to_string(), "TomTom API error: HTTP 403");
        assert!(!err.is_input_error());

        let err = SearchError::ProviderUnavailable {
            operation: "EV route",
            reason: "connection refused".into(),
        };
        assert!(!err.is_input_error());
    }
}
