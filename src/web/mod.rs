//! Web server module
//!
//! Provides the HTTP API for GeoSearch-RS.

mod handlers;
mod routes;
mod state;

pub use handlers::{
    ApiError, ApiResponse, EvRouteBody, PoiSearchBody, PoisData, ReachableRangeBody,
    StationSearchBody, StationsData,
};
pub use routes::create_router;
pub use state::AppState;
