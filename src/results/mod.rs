//! Result types, merging and normalization
//!
//! Defines the raw and canonical record shapes, the id-based dedup container,
//! and the normalizer that maps one onto the other.

mod container;
mod normalizer;
mod types;

pub use container::{Admission, ResultContainer};
pub use normalizer::ResponseNormalizer;
pub use types::*;
