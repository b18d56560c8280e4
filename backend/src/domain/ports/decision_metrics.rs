//! Port for recording decision outcomes.
//!
//! Keeps the workflow service free of any particular metrics backend.

use async_trait::async_trait;

use crate::domain::Decision;

use super::define_port_error;

define_port_error! {
    /// Errors exposed when recording decision metrics.
    pub enum DecisionMetricsError {
        /// Metric exporter rejected the write.
        Export { message: String } => "decision metrics exporter failed: {message}",
    }
}

/// How a decision attempt ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecisionOutcomeKind {
    /// Status written; for approvals the cgpa was propagated.
    Applied,
    /// Status written but the student record was missing.
    PropagationSkipped,
    /// The request had already been decided.
    Conflict,
    /// Any other failure.
    Failed,
}

impl DecisionOutcomeKind {
    /// Metric label value.
    #[must_use]
    pub const fn as_label(self) -> &'static str {
        match self {
            Self::Applied => "applied",
            Self::PropagationSkipped => "propagation_skipped",
            Self::Conflict => "conflict",
            Self::Failed => "failed",
        }
    }
}

/// Metrics recording port for decisions.
#[async_trait]
pub trait DecisionMetrics: Send + Sync {
    /// Record one decision attempt.
    async fn record_decision(
        &self,
        decision: Decision,
        outcome: DecisionOutcomeKind,
    ) -> Result<(), DecisionMetricsError>;
}

/// Discards every record; used when metrics are disabled.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoOpDecisionMetrics;

#[async_trait]
impl DecisionMetrics for NoOpDecisionMetrics {
    async fn record_decision(
        &self,
        _decision: Decision,
        _outcome: DecisionOutcomeKind,
    ) -> Result<(), DecisionMetricsError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[tokio::test]
    async fn noop_accepts_every_outcome() {
        let metrics = NoOpDecisionMetrics;
        for outcome in [
            DecisionOutcomeKind::Applied,
            DecisionOutcomeKind::PropagationSkipped,
            DecisionOutcomeKind::Conflict,
            DecisionOutcomeKind::Failed,
        ] {
            assert!(
                metrics
                    .record_decision(Decision::Approved, outcome)
                    .await
                    .is_ok()
            );
        }
    }

    #[rstest]
    #[case(DecisionOutcomeKind::Applied, "applied")]
    #[case(DecisionOutcomeKind::PropagationSkipped, "propagation_skipped")]
    fn labels_are_snake_case(#[case] outcome: DecisionOutcomeKind, #[case] expected: &str) {
        assert_eq!(outcome.as_label(), expected);
    }
}
