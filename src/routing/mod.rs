//! EV range and route calculation
//!
//! Single provider calls whose answers are forwarded to the caller unchanged.

mod models;
mod service;

pub use models::*;
pub use service::RoutingService;
