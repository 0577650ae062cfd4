//! # HTTP Middleware
//!
//! - `metrics`: per-request counters for the Prometheus recorder.

pub mod metrics;
