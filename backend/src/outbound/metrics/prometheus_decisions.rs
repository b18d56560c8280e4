//! Prometheus adapter for decision outcome metrics.

use async_trait::async_trait;
use prometheus::{IntCounterVec, Opts, Registry};

use crate::domain::Decision;
use crate::domain::ports::{DecisionMetrics, DecisionMetricsError, DecisionOutcomeKind};

/// Counter name exported on `/metrics`.
pub const DECISIONS_TOTAL: &str = "cgpa_decisions_total";

/// Prometheus-backed decision recorder.
///
/// - **Name**: `cgpa_decisions_total`
/// - **Type**: Counter
/// - **Labels**: `decision` (`approved`, `rejected`) and `outcome`
///   (`applied`, `propagation_skipped`, `conflict`, `failed`)
pub struct PrometheusDecisionMetrics {
    decisions_total: IntCounterVec,
}

impl PrometheusDecisionMetrics {
    /// Create and register the counter with `registry`.
    ///
    /// # Errors
    ///
    /// Fails when a metric with the same name is already registered.
    pub fn new(registry: &Registry) -> Result<Self, prometheus::Error> {
        let decisions_total = IntCounterVec::new(
            Opts::new(DECISIONS_TOTAL, "CGPA request decisions by outcome"),
            &["decision", "outcome"],
        )?;
        registry.register(Box::new(decisions_total.clone()))?;
        Ok(Self { decisions_total })
    }
}

#[async_trait]
impl DecisionMetrics for PrometheusDecisionMetrics {
    async fn record_decision(
        &self,
        decision: Decision,
        outcome: DecisionOutcomeKind,
    ) -> Result<(), DecisionMetricsError> {
        self.decisions_total
            .get_metric_with_label_values(&[decision.as_str(), outcome.as_label()])
            .map_err(|err| DecisionMetricsError::export(err.to_string()))?
            .inc();
        Ok(())
    }
}
