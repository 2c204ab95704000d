//! TomTom Search and Routing API provider implementation

use super::traits::*;
use crate::config::ProviderSettings;
use crate::results::RawProviderRecord;
use crate::routing::{EvRouteQuery, ReachableRangeQuery};
use crate::search::{Location, SearchQuery, SearchTarget};
use anyhow::{anyhow, Result as AnyhowResult};
use serde::Deserialize;
use url::Url;

/// TomTom search and EV routing
pub struct TomTom {
    base_url: String,
    api_key: Option<String>,
    view: String,
}

/// The part of a search response we care about
#[derive(Debug, Deserialize)]
struct SearchResponseBody {
    #[serde(default)]
    results: Option<Vec<serde_json::Value>>,
}

impl TomTom {
    pub fn new(api_key: Option<String>) -> Self {
        Self::with_settings(&ProviderSettings {
            api_key,
            ..Default::default()
        })
    }

    pub fn with_settings(settings: &ProviderSettings) -> Self {
        Self {
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            api_key: settings.api_key.clone().filter(|k| !k.trim().is_empty()),
            view: settings.view.clone(),
        }
    }

    /// Point the provider at another host (mock servers, regional endpoints)
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    fn search_url(&self, query: &SearchQuery) -> AnyhowResult<String> {
        let (endpoint, text) = match query.target() {
            SearchTarget::Category { label, .. } => ("categorySearch", label.as_str()),
            SearchTarget::Keyword(keyword) => ("poiSearch", keyword.as_str()),
        };
        let url = format!(
            "{}/search/2/{}/{}.json",
            self.base_url,
            endpoint,
            urlencoding::encode(text)
        );
        Url::parse(&url)?;
        Ok(url)
    }

    fn routing_url(&self, operation: &str, waypoints: &[Location]) -> AnyhowResult<String> {
        let waypoints: Vec<String> = waypoints
            .iter()
            .map(|point| format!("{},{}", point.lat, point.lon))
            .collect();
        let url = format!(
            "{}/routing/1/{}/{}/json",
            self.base_url,
            operation,
            waypoints.join(":")
        );
        Url::parse(&url)?;
        Ok(url)
    }

    fn key(&self) -> AnyhowResult<&str> {
        self.api_key
            .as_deref()
            .ok_or_else(|| anyhow!("TomTom API key not configured"))
    }
}

impl SearchProvider for TomTom {
    fn name(&self) -> &str {
        "tomtom"
    }

    fn display_name(&self) -> &str {
        "TomTom"
    }

    fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    fn request(&self, query: &SearchQuery) -> AnyhowResult<ProviderRequest> {
        let key = self.key()?;
        let location = query.location();

        let mut request = ProviderRequest::get(self.search_url(query)?)
            .param("key", key)
            .param("lat", location.lat.to_string())
            .param("lon", location.lon.to_string())
            .param("radius", query.radius_meters().to_string())
            .param("limit", query.result_limit().to_string())
            .param("view", self.view.as_str());

        if let Some(code) = query.category_code() {
            request = request.param("categorySet", code);
        }

        Ok(request)
    }

    fn response(&self, response: ProviderResponse) -> AnyhowResult<Vec<RawProviderRecord>> {
        if !response.is_success() {
            return Err(anyhow!("HTTP error: {}", response.status));
        }

        let body: SearchResponseBody = response.json()?;
        Ok(body
            .results
            .unwrap_or_default()
            .into_iter()
            .map(RawProviderRecord::new)
            .collect())
    }
}

impl RoutingProvider for TomTom {
    fn reachable_range_request(&self, query: &ReachableRangeQuery) -> AnyhowResult<ProviderRequest> {
        let url = self.routing_url("calculateReachableRange", &[query.origin])?;

        Ok(ProviderRequest::get(url)
            .param("key", self.key()?)
            .param("energyBudgetInkWh", query.energy_budget_kwh.to_string())
            .param("vehicleEngineType", "electric")
            .param("routeType", query.route_type.as_str())
            .param(
                "constantSpeedConsumptionInkWhPerHundredkm",
                query.consumption_curve.as_str(),
            ))
    }

    fn ev_route_request(&self, query: &EvRouteQuery) -> AnyhowResult<ProviderRequest> {
        let url = self.routing_url("calculateRoute", &[query.origin, query.destination])?;

        Ok(ProviderRequest::get(url)
            .param("key", self.key()?)
            .param("routeType", "eco")
            .param("traffic", "true")
            .param("vehicleEngineType", "electric")
            .param("currentChargeInkWh", query.current_charge_kwh.to_string())
            .param("maxChargeInkWh", query.max_charge_kwh.to_string())
            .param("auxiliaryPowerInkW", query.auxiliary_power_kw.to_string())
            .param(
                "constantSpeedConsumptionInkWhPerHundredkm",
                query.consumption_curve.as_str(),
            ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::SearchArea;

    fn area() -> SearchArea {
        SearchArea::new(37.77, -122.42, 50_000.0, 100).unwrap()
    }

    fn response(status: u16, text: &str) -> ProviderResponse {
        ProviderResponse {
            status,
            text: text.to_string(),
        }
    }

    #[test]
    fn test_keyword_request() {
        let tomtom = TomTom::new(Some("k".into()));
        let query = SearchQuery::keyword_search("fast charging", "fast charging", &area(), 100);
        let request = tomtom.request(&query).unwrap();

        assert_eq!(
            request.url,
            "https://api.tomtom.com/search/2/poiSearch/fast%20charging.json"
        );
        assert_eq!(request.params["key"], "k");
        assert_eq!(request.params["lat"], "37.77");
        assert_eq!(request.params["lon"], "-122.42");
        assert_eq!(request.params["radius"], "50000");
        assert_eq!(request.params["limit"], "100");
        assert_eq!(request.params["view"], "Unified");
        assert!(!request.params.contains_key("categorySet"));
    }

    #[test]
    fn test_category_request() {
        let tomtom = TomTom::new(Some("k".into())).with_base_url("http://localhost:9000/");
        let query = SearchQuery::category_search("9927", "national park", "parks", &area(), 100);
        let request = tomtom.request(&query).unwrap();

        assert_eq!(
            request.url,
            "http://localhost:9000/search/2/categorySearch/national%20park.json"
        );
        assert_eq!(request.params["categorySet"], "9927");
    }

    #[test]
    fn test_request_without_key_fails() {
        let tomtom = TomTom::new(None);
        assert!(!tomtom.is_configured());
        let query = SearchQuery::keyword_search("cafe", "restaurants", &area(), 50);
        assert!(tomtom.request(&query).is_err());
    }

    #[test]
    fn test_parse_results_in_order() {
        let tomtom = TomTom::new(Some("k".into()));
        let records = tomtom
            .response(response(200, r#"{"summary":{},"results":[{"id":"b"},{"id":"a"}]}"#))
            .unwrap();
        let ids: Vec<_> = records.iter().filter_map(|r| r.id()).collect();
        assert_eq!(ids, vec!["b", "a"]);
    }

    #[test]
    fn test_missing_results_is_empty() {
        let tomtom = TomTom::new(Some("k".into()));
        assert!(tomtom.response(response(200, "{}")).unwrap().is_empty());
    }

    #[test]
    fn test_reachable_range_request() {
        let tomtom = TomTom::new(Some("k".into()));
        let query = ReachableRangeQuery::new(Location::new(37.77, -122.42).unwrap(), 42.5).unwrap();
        let request = tomtom.reachable_range_request(&query).unwrap();

        assert_eq!(
            request.url,
            "https://api.tomtom.com/routing/1/calculateReachableRange/37.77,-122.42/json"
        );
        assert_eq!(request.params["energyBudgetInkWh"], "42.5");
        assert_eq!(request.params["vehicleEngineType"], "electric");
        assert_eq!(request.params["routeType"], "eco");
        assert_eq!(
            request.params["constantSpeedConsumptionInkWhPerHundredkm"],
            "50,15:80,20:120,30"
        );
    }

    #[test]
    fn test_ev_route_request() {
        let tomtom = TomTom::new(Some("k".into()));
        let query = EvRouteQuery::new(
            Location::new(37.77, -122.42).unwrap(),
            Location::new(34.05, -118.24).unwrap(),
            40.0,
            75.0,
        )
        .unwrap();
        let request = tomtom.ev_route_request(&query).unwrap();

        assert_eq!(
            request.url,
            "https://api.tomtom.com/routing/1/calculateRoute/37.77,-122.42:34.05,-118.24/json"
        );
        assert_eq!(request.params["routeType"], "eco");
        assert_eq!(request.params["traffic"], "true");
        assert_eq!(request.params["currentChargeInkWh"], "40");
        assert_eq!(request.params["maxChargeInkWh"], "75");
        assert_eq!(request.params["auxiliaryPowerInkW"], "1.7");
    }

    #[test]
    fn test_error_responses() {
        let tomtom = TomTom::new(Some("k".into()));
        assert!(tomtom.response(response(403, "{}")).is_err());
        assert!(tomtom.response(response(200, "<html>")).is_err());
        assert!(tomtom.response(response(200, r#"{"results": 5}"#)).is_err());
    }
}
