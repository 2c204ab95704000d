//! Query planning: turn one user request into the provider calls it needs

use super::models::{ChargerType, SearchArea, SearchFilter, SearchQuery};
use once_cell::sync::Lazy;
use std::collections::{HashMap, HashSet};

/// Provider category code for electric vehicle stations
pub const EV_STATION_CODE: &str = "7309";

/// Free text sent with the EV station category search
pub const EV_STATION_LABEL: &str = "electric vehicle station";

/// Largest page the provider returns for one call
pub const MAX_RESULT_LIMIT: u32 = 100;

/// Cap for supplementary keyword searches in POI mode
pub const KEYWORD_RESULT_LIMIT: u32 = 50;

/// Keyword searches of the `fast` station plan
const FAST_TERMS: [&str; 3] = ["supercharger", "fast charging", "dc charging"];

/// Keyword searches of the `level2` station plan
const LEVEL2_TERMS: [&str; 2] = ["level 2 charging", "destination charging"];

/// Keyword search of the default station plan
const STATION_TERM: &str = "charging station";

/// Metrics bucket shared by every tag outside the fixed vocabulary
pub const OTHER_TAG: &str = "other";

/// A user-facing POI category
#[derive(Debug, Clone)]
pub struct CategoryEntry {
    /// Provider category code
    pub code: &'static str,
    /// Text for the category endpoint path
    pub label: &'static str,
    /// Extra keyword searches run alongside the category search
    pub synonyms: &'static [&'static str],
}

static CATEGORIES: Lazy<HashMap<&'static str, CategoryEntry>> = Lazy::new(|| {
    let entries = [
        (
            "parks",
            CategoryEntry {
                code: "9927",
                label: "national park",
                synonyms: &[
                    "national park",
                    "state park",
                    "national monument",
                    "national forest",
                    "regional park",
                ],
            },
        ),
        (
            "attractions",
            CategoryEntry {
                code: "9909",
                label: "attractions",
                synonyms: &[
                    "tourist attraction",
                    "landmark",
                    "scenic viewpoint",
                    "observation deck",
                    "visitor center",
                ],
            },
        ),
        (
            "museums",
            CategoryEntry {
                code: "9902",
                label: "museums",
                synonyms: &[
                    "museum",
                    "art gallery",
                    "science center",
                    "history center",
                    "cultural center",
                ],
            },
        ),
        (
            "restaurants",
            CategoryEntry {
                code: "9376",
                label: "restaurants",
                synonyms: &["restaurant", "cafe", "diner", "food court", "brewery"],
            },
        ),
        (
            "hotels",
            CategoryEntry {
                code: "9373",
                label: "hotels",
                synonyms: &["hotel", "motel", "resort", "inn", "lodge"],
            },
        ),
        (
            // shares the parks code, but has no keyword synonyms of its own
            "scenic",
            CategoryEntry {
                code: "9927",
                label: "scenic",
                synonyms: &[],
            },
        ),
        (
            "camping",
            CategoryEntry {
                code: "9911",
                label: "camping",
                synonyms: &[
                    "campground",
                    "rv park",
                    "camping",
                    "national forest campground",
                    "state park camping",
                ],
            },
        ),
    ];
    entries.into_iter().collect()
});

/// Look up a user-facing category name
pub fn lookup_category(name: &str) -> Option<&'static CategoryEntry> {
    CATEGORIES.get(name)
}

/// Names of all known categories, sorted
pub fn category_names() -> Vec<&'static str> {
    let mut names: Vec<_> = CATEGORIES.keys().copied().collect();
    names.sort_unstable();
    names
}

/// Requested category names in first-occurrence order, without repeats
pub fn distinct_categories(categories: &[String]) -> Vec<&str> {
    let mut seen = HashSet::new();
    categories
        .iter()
        .map(String::as_str)
        .filter(|name| seen.insert(*name))
        .collect()
}

/// Metrics key for a category tag.
///
/// Station terms and table categories keep their own key; any other
/// caller-supplied name lands in [`OTHER_TAG`] so the key space stays fixed.
pub fn metrics_tag(tag: &str) -> &str {
    let known = lookup_category(tag).is_some()
        || tag == EV_STATION_LABEL
        || tag == STATION_TERM
        || FAST_TERMS.contains(&tag)
        || LEVEL2_TERMS.contains(&tag);
    if known {
        tag
    } else {
        OTHER_TAG
    }
}

/// Builds the ordered list of provider queries for a request
pub struct SearchPlanBuilder;

impl SearchPlanBuilder {
    /// Plan the queries for a filter. Pure; never fails.
    pub fn build(area: &SearchArea, filter: &SearchFilter) -> Vec<SearchQuery> {
        match filter {
            SearchFilter::Charger(charger_type) => Self::stations(area, *charger_type),
            SearchFilter::Categories(categories) => Self::pois(area, categories),
        }
    }

    /// Station plan: a fixed set of searches per charger type
    pub fn stations(area: &SearchArea, charger_type: ChargerType) -> Vec<SearchQuery> {
        let limit = area.limit.min(MAX_RESULT_LIMIT);
        let keyword = |term: &str| SearchQuery::keyword_search(term, term, area, limit);
        let ev_stations = || {
            SearchQuery::category_search(EV_STATION_CODE, EV_STATION_LABEL, EV_STATION_LABEL, area, limit)
        };

        match charger_type {
            ChargerType::Fast => FAST_TERMS.into_iter().map(|term| keyword(term)).collect(),
            ChargerType::Level2 => LEVEL2_TERMS
                .into_iter()
                .map(|term| keyword(term))
                .chain(std::iter::once(ev_stations()))
                .collect(),
            ChargerType::Any => vec![ev_stations(), keyword(STATION_TERM)],
        }
    }

    /// POI plan: all category searches first, then every registered synonym.
    /// Repeated names are planned once.
    pub fn pois(area: &SearchArea, categories: &[String]) -> Vec<SearchQuery> {
        let category_limit = area.limit.min(MAX_RESULT_LIMIT);
        let keyword_limit = area.limit.min(KEYWORD_RESULT_LIMIT);
        let names = distinct_categories(categories);

        let category_searches = names.iter().map(|&name| match lookup_category(name) {
            Some(entry) => {
                SearchQuery::category_search(entry.code, entry.label, name, area, category_limit)
            }
            // unknown names are treated as a literal provider code
            None => SearchQuery::category_search(name, name, name, area, category_limit),
        });

        let keyword_searches = names.iter().flat_map(move |&name| {
            lookup_category(name)
                .map(|entry| entry.synonyms)
                .unwrap_or_default()
                .iter()
                .map(move |term| SearchQuery::keyword_search(*term, name, area, keyword_limit))
        });

        category_searches.chain(keyword_searches).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::models::EndpointKind;

    fn area(limit: u32) -> SearchArea {
        SearchArea::new(37.77, -122.42, 50_000.0, limit).unwrap()
    }

    fn categories(plan: &[SearchQuery]) -> Vec<&str> {
        plan.iter().map(|q| q.category()).collect()
    }

    #[test]
    fn test_fast_plan() {
        let plan = SearchPlanBuilder::build(&area(100), &SearchFilter::Charger(ChargerType::Fast));
        assert_eq!(plan.len(), 3);
        for query in &plan {
            assert!(["supercharger", "fast charging", "dc charging"].contains(&query.category()));
        }
    }

    #[test]
    fn test_level2_plan() {
        let plan = SearchPlanBuilder::stations(&area(100), ChargerType::Level2);
        assert_eq!(plan.len(), 3);
        let kinds: Vec<_> = plan.iter().map(|q| q.endpoint_kind()).collect();
        assert_eq!(
            kinds,
            vec![
                EndpointKind::KeywordSearch,
                EndpointKind::KeywordSearch,
                EndpointKind::CategorySearch
            ]
        );
        assert_eq!(plan[2].category_code(), Some(EV_STATION_CODE));
    }

    #[test]
    fn test_default_plan() {
        let plan = SearchPlanBuilder::stations(&area(100), ChargerType::Any);
        assert_eq!(plan.len(), 2);
        assert_eq!(plan[0].category_code(), Some(EV_STATION_CODE));
        assert_eq!(plan[1].keyword(), Some("charging station"));
    }

    #[test]
    fn test_station_limit_capped() {
        let plan = SearchPlanBuilder::stations(&area(500), ChargerType::Any);
        assert!(plan.iter().all(|q| q.result_limit() == MAX_RESULT_LIMIT));

        let plan = SearchPlanBuilder::stations(&area(20), ChargerType::Any);
        assert!(plan.iter().all(|q| q.result_limit() == 20));
    }

    #[test]
    fn test_parks_plan() {
        let plan = SearchPlanBuilder::build(&area(100), &SearchFilter::Categories(vec!["parks".into()]));
        assert_eq!(plan.len(), 6);

        let category_searches: Vec<_> = plan
            .iter()
            .filter(|q| q.endpoint_kind() == EndpointKind::CategorySearch)
            .collect();
        assert_eq!(category_searches.len(), 1);
        assert_eq!(category_searches[0].category_code(), Some("9927"));

        assert!(categories(&plan).iter().all(|c| *c == "parks"));
        assert!(plan[1..].iter().all(|q| q.result_limit() == KEYWORD_RESULT_LIMIT));
    }

    #[test]
    fn test_multi_category_order() {
        let requested = vec!["restaurants".to_string(), "scenic".to_string()];
        let plan = SearchPlanBuilder::pois(&area(100), &requested);

        // two category searches, then five restaurant synonyms; scenic has none
        assert_eq!(plan.len(), 7);
        assert_eq!(plan[0].category_code(), Some("9376"));
        assert_eq!(plan[1].category_code(), Some("9927"));
        assert_eq!(plan[1].category(), "scenic");
        assert!(plan[2..].iter().all(|q| q.category() == "restaurants"));
    }

    #[test]
    fn test_unknown_category_passes_through() {
        let plan = SearchPlanBuilder::pois(&area(100), &["7315".to_string()]);
        assert_eq!(plan.len(), 1);
        assert_eq!(plan[0].category_code(), Some("7315"));
        assert_eq!(plan[0].category(), "7315");
    }

    #[test]
    fn test_repeated_categories_planned_once() {
        let requested = vec!["parks".to_string(), "junk".to_string(), "parks".to_string(), "junk".to_string()];
        let plan = SearchPlanBuilder::pois(&area(100), &requested);

        // parks: 1 + 5 synonyms, junk: 1
        assert_eq!(plan.len(), 7);
        assert_eq!(distinct_categories(&requested), vec!["parks", "junk"]);
    }

    #[test]
    fn test_metrics_tag_buckets_unknown_names() {
        assert_eq!(metrics_tag("parks"), "parks");
        assert_eq!(metrics_tag("supercharger"), "supercharger");
        assert_eq!(metrics_tag(EV_STATION_LABEL), EV_STATION_LABEL);
        assert_eq!(metrics_tag("charging station"), "charging station");
        assert_eq!(metrics_tag("junk-17"), OTHER_TAG);
        assert_eq!(metrics_tag("7315"), OTHER_TAG);
    }

    #[test]
    fn test_empty_categories_plan_nothing() {
        assert!(SearchPlanBuilder::pois(&area(100), &[]).is_empty());
    }

    #[test]
    fn test_category_table() {
        assert_eq!(category_names().len(), 7);
        assert_eq!(lookup_category("hotels").map(|e| e.code), Some("9373"));
        assert!(lookup_category("Parks").is_none());
    }
}
