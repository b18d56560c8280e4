//! Prometheus-backed metrics adapters.
//!
//! Compiled only with the `metrics` feature; otherwise the workflow records
//! into [`crate::domain::ports::NoOpDecisionMetrics`].

mod prometheus_decisions;

pub use prometheus_decisions::{DECISIONS_TOTAL, PrometheusDecisionMetrics};
