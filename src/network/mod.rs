//! HTTP networking module
//!
//! Provides the outgoing HTTP client used for provider calls.

mod client;

pub use client::HttpClient;
