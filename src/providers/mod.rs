//! Geo-search provider module
//!
//! Defines the SearchProvider trait and the TomTom implementation.

mod traits;

pub mod tomtom;

pub use tomtom::TomTom;
pub use traits::*;
