//! Search orchestration module
//!
//! Plans provider sub-queries, executes them concurrently, and aggregates
//! their results into one deduplicated, canonical response.

mod aggregator;
mod executor;
mod models;
mod plan;

pub use aggregator::{Aggregation, ResultAggregator, SearchResponse};
pub use executor::{QueryExecutor, QueryOutcome, QueryStatus};
pub use models::*;
pub use plan::{
    category_names, distinct_categories, lookup_category, metrics_tag, CategoryEntry,
    SearchPlanBuilder, EV_STATION_CODE, EV_STATION_LABEL, KEYWORD_RESULT_LIMIT, MAX_RESULT_LIMIT,
    OTHER_TAG,
};
