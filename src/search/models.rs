//! Search query and related data models

use crate::error::{Result, SearchError};
use crate::results::RecordKind;
use serde::{Deserialize, Serialize};

/// A validated WGS84 coordinate
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub lat: f64,
    pub lon: f64,
}

impl Location {
    /// Create a location, rejecting non-finite or out-of-range coordinates
    pub fn new(lat: f64, lon: f64) -> Result<Self> {
        let valid = lat.is_finite()
            && lon.is_finite()
            && (-90.0..=90.0).contains(&lat)
            && (-180.0..=180.0).contains(&lon);
        if !valid {
            return Err(SearchError::InvalidLocation { lat, lon });
        }
        Ok(Self { lat, lon })
    }
}

/// Where to search: center, radius and the caller's result limit
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SearchArea {
    pub location: Location,
    pub radius_meters: u32,
    pub limit: u32,
}

impl SearchArea {
    /// Validate raw request values into a search area
    pub fn new(lat: f64, lon: f64, radius: f64, limit: u32) -> Result<Self> {
        let location = Location::new(lat, lon)?;
        if !radius.is_finite() || radius <= 0.0 {
            return Err(SearchError::InvalidRadius(radius));
        }
        Ok(Self {
            location,
            radius_meters: radius.ceil().min(u32::MAX as f64) as u32,
            limit,
        })
    }
}

/// Charger-type filter for station searches
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChargerType {
    /// DC fast charging
    Fast,
    /// Level 2 / destination charging
    Level2,
    /// No filter
    #[default]
    Any,
}

impl ChargerType {
    /// Parse the request parameter; anything unrecognised means no filter
    pub fn from_param(value: Option<&str>) -> Self {
        match value.map(str::trim) {
            Some("fast") => ChargerType::Fast,
            Some("level2") => ChargerType::Level2,
            _ => ChargerType::Any,
        }
    }
}

/// What the plan should look for
#[derive(Debug, Clone, PartialEq)]
pub enum SearchFilter {
    /// Charging stations of a given type
    Charger(ChargerType),
    /// Points of interest in the named categories
    Categories(Vec<String>),
}

impl SearchFilter {
    /// The kind of canonical record this filter produces
    pub fn record_kind(&self) -> RecordKind {
        match self {
            SearchFilter::Charger(_) => RecordKind::Station,
            SearchFilter::Categories(_) => RecordKind::Poi,
        }
    }
}

/// Provider endpoint a query is sent to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EndpointKind {
    CategorySearch,
    KeywordSearch,
}

/// The single search criterion of a query
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SearchTarget {
    /// Provider category code, plus the free text the category endpoint wants
    Category { code: String, label: String },
    /// Free-text keyword
    Keyword(String),
}

/// One planned call to the provider
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchQuery {
    target: SearchTarget,
    category: String,
    location: Location,
    radius_meters: u32,
    result_limit: u32,
}

impl SearchQuery {
    /// Category-code search
    pub fn category_search(
        code: impl Into<String>,
        label: impl Into<String>,
        category: impl Into<String>,
        area: &SearchArea,
        result_limit: u32,
    ) -> Self {
        Self::new(
            SearchTarget::Category {
                code: code.into(),
                label: label.into(),
            },
            category.into(),
            area,
            result_limit,
        )
    }

    /// Keyword search
    pub fn keyword_search(
        keyword: impl Into<String>,
        category: impl Into<String>,
        area: &SearchArea,
        result_limit: u32,
    ) -> Self {
        Self::new(
            SearchTarget::Keyword(keyword.into()),
            category.into(),
            area,
            result_limit,
        )
    }

    fn new(target: SearchTarget, category: String, area: &SearchArea, result_limit: u32) -> Self {
        Self {
            target,
            category,
            location: area.location,
            radius_meters: area.radius_meters,
            result_limit,
        }
    }

    pub fn endpoint_kind(&self) -> EndpointKind {
        match self.target {
            SearchTarget::Category { .. } => EndpointKind::CategorySearch,
            SearchTarget::Keyword(_) => EndpointKind::KeywordSearch,
        }
    }

    pub fn target(&self) -> &SearchTarget {
        &self.target
    }

    pub fn category_code(&self) -> Option<&str> {
        match &self.target {
            SearchTarget::Category { code, .. } => Some(code),
            SearchTarget::Keyword(_) => None,
        }
    }

    pub fn keyword(&self) -> Option<&str> {
        match &self.target {
            SearchTarget::Keyword(keyword) => Some(keyword),
            SearchTarget::Category { .. } => None,
        }
    }

    /// Tag attached to every record this query surfaces first
    pub fn category(&self) -> &str {
        &self.category
    }

    pub fn location(&self) -> Location {
        self.location
    }

    pub fn radius_meters(&self) -> u32 {
        self.radius_meters
    }

    pub fn result_limit(&self) -> u32 {
        self.result_limit
    }
}

/// Charging-station search request
#[derive(Debug, Clone, PartialEq)]
pub struct StationSearch {
    pub area: SearchArea,
    pub charger_type: ChargerType,
}

/// Categorized POI search request
#[derive(Debug, Clone, PartialEq)]
pub struct PoiSearch {
    pub area: SearchArea,
    pub categories: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn area() -> SearchArea {
        SearchArea::new(37.77, -122.42, 50_000.0, 100).unwrap()
    }

    #[test]
    fn test_location_bounds() {
        assert!(Location::new(37.77, -122.42).is_ok());
        assert!(Location::new(90.0, 180.0).is_ok());
        assert!(Location::new(90.1, 0.0).is_err());
        assert!(Location::new(0.0, -180.5).is_err());
        assert!(Location::new(f64::NAN, 0.0).is_err());
    }

    #[test]
    fn test_radius_validation() {
        assert!(matches!(
            SearchArea::new(0.0, 0.0, 0.0, 10),
            Err(SearchError::InvalidRadius(_))
        ));
        assert!(SearchArea::new(0.0, 0.0, f64::INFINITY, 10).is_err());
        assert_eq!(SearchArea::new(0.0, 0.0, 1500.4, 10).unwrap().radius_meters, 1501);
    }

    #[test]
    fn test_charger_type_param() {
        assert_eq!(ChargerType::from_param(Some("fast")), ChargerType::Fast);
        assert_eq!(ChargerType::from_param(Some("level2")), ChargerType::Level2);
        assert_eq!(ChargerType::from_param(Some("level1")), ChargerType::Any);
        assert_eq!(ChargerType::from_param(None), ChargerType::Any);
    }

    #[test]
    fn test_query_exposes_exactly_one_criterion() {
        let by_code = SearchQuery::category_search("7309", "electric vehicle station", "ev", &area(), 100);
        assert_eq!(by_code.endpoint_kind(), EndpointKind::CategorySearch);
        assert_eq!(by_code.category_code(), Some("7309"));
        assert!(by_code.keyword().is_none());

        let by_keyword = SearchQuery::keyword_search("cafe", "restaurants", &area(), 50);
        assert_eq!(by_keyword.endpoint_kind(), EndpointKind::KeywordSearch);
        assert_eq!(by_keyword.keyword(), Some("cafe"));
        assert!(by_keyword.category_code().is_none());
        assert_eq!(by_keyword.category(), "restaurants");
        assert_eq!(by_keyword.radius_meters(), 50_000);
    }
}
