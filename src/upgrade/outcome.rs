//! Per-service upgrade outcomes and the run summary.

use crate::error::RupError;

/// Terminal result of one service upgrade attempt.
#[derive(Debug)]
pub enum UpgradeOutcome {
    /// The upgrade began and finalized cleanly.
    Succeeded,
    /// A precondition failed before anything was invoked.
    Skipped { reason: RupError },
    /// The upgrade was attempted but did not complete cleanly.
    Failed { error: RupError },
}

impl UpgradeOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, UpgradeOutcome::Succeeded)
    }
}

/// Outcome of one dispatched job.
#[derive(Debug)]
pub struct ServiceResult {
    pub service: String,
    pub outcome: UpgradeOutcome,
}

/// Aggregated results of a whole run.
#[derive(Debug, Default)]
pub struct RunSummary {
    results: Vec<ServiceResult>,
}

impl RunSummary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, service: &str, outcome: UpgradeOutcome) {
        self.results.push(ServiceResult {
            service: service.to_string(),
            outcome,
        });
    }

    pub fn results(&self) -> &[ServiceResult] {
        &self.results
    }

    /// Outcome recorded for a service, if any.
    pub fn outcome_for(&self, service: &str) -> Option<&UpgradeOutcome> {
        self.results
            .iter()
            .find(|r| r.service == service)
            .map(|r| &r.outcome)
    }

    pub fn total(&self) -> usize {
        self.results.len()
    }

    pub fn succeeded(&self) -> usize {
        self.results.iter().filter(|r| r.outcome.is_success()).count()
    }

    pub fn skipped(&self) -> usize {
        self.results
            .iter()
            .filter(|r| matches!(r.outcome, UpgradeOutcome::Skipped { .. }))
            .count()
    }

    pub fn failed(&self) -> usize {
        self.results
            .iter()
            .filter(|r| matches!(r.outcome, UpgradeOutcome::Failed { .. }))
            .count()
    }
}
