//! Per-service upgrade controller.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::directory::ServiceDirectory;
use crate::error::RupError;
use crate::rancher::api::RancherApi;
use crate::upgrade::gate::{ActionGate, PollSettings};
use crate::upgrade::outcome::UpgradeOutcome;
use crate::upgrade::steps::UpgradeSteps;
use crate::upgrade::{ACTION_FINISH_UPGRADE, ACTION_UPGRADE};

/// One unit of work: upgrade `service_name` to `image`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpgradeJob {
    pub service_name: String,
    pub image: String,
}

/// Phase of a single service upgrade.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpgradePhase {
    Idle,
    Upgrading,
    AwaitingFinish,
    Finished,
    Aborted,
}

impl std::fmt::Display for UpgradePhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Idle => write!(f, "Idle"),
            Self::Upgrading => write!(f, "Upgrading"),
            Self::AwaitingFinish => write!(f, "AwaitingFinish"),
            Self::Finished => write!(f, "Finished"),
            Self::Aborted => write!(f, "Aborted"),
        }
    }
}

/// Drives one service through the upgrade flow.
///
/// Advances from Idle through Upgrading and AwaitingFinish to Finished,
/// aborting with a terminal outcome at the first failed precondition or
/// step. Always returns an outcome; workers never see an error or a panic
/// from here.
pub struct ServiceUpgrader {
    directory: Arc<ServiceDirectory>,
    gate: ActionGate,
    steps: UpgradeSteps,
    poll: PollSettings,
}

impl ServiceUpgrader {
    pub fn new(
        api: Arc<dyn RancherApi>,
        directory: Arc<ServiceDirectory>,
        poll: PollSettings,
    ) -> Self {
        Self {
            directory,
            gate: ActionGate::new(Arc::clone(&api)),
            steps: UpgradeSteps::new(api),
            poll,
        }
    }

    /// Run the full upgrade flow for one job.
    pub async fn upgrade_service(&self, job: &UpgradeJob) -> UpgradeOutcome {
        debug!(
            "Service {} entering phase {}",
            job.service_name,
            UpgradePhase::Idle
        );

        let outcome = self.run_flow(job).await;

        let terminal = if outcome.is_success() {
            UpgradePhase::Finished
        } else {
            UpgradePhase::Aborted
        };
        debug!(
            "Service {} reached terminal phase {}",
            job.service_name, terminal
        );

        outcome
    }

    async fn run_flow(&self, job: &UpgradeJob) -> UpgradeOutcome {
        let name = job.service_name.as_str();

        let id = match self.directory.resolve(name) {
            Ok(id) => id,
            Err(e) => {
                warn!("Skipping {}: {}", name, e);
                return UpgradeOutcome::Skipped { reason: e };
            }
        };

        match self.gate.is_available(id, ACTION_UPGRADE).await {
            Ok(true) => {}
            Ok(false) => {
                let reason = RupError::ActionUnavailable {
                    action: ACTION_UPGRADE.to_string(),
                    service: name.to_string(),
                };
                warn!("Skipping {}: {}", name, reason);
                return UpgradeOutcome::Skipped { reason };
            }
            // A failed check reads as "not available". Nothing has been
            // invoked yet, so skipping is safe.
            Err(e) => {
                warn!("Skipping {}: availability check failed: {}", name, e);
                return UpgradeOutcome::Skipped { reason: e };
            }
        }

        debug!("Service {} entering phase {}", name, UpgradePhase::Upgrading);
        if let Err(e) = self.steps.begin_upgrade(id, name, &job.image).await {
            // The gate check was a separate request; the server may reject
            // an action it reported available a moment earlier.
            warn!("{}", e);
            return UpgradeOutcome::Failed { error: e };
        }

        debug!(
            "Service {} entering phase {}",
            name,
            UpgradePhase::AwaitingFinish
        );
        if !self
            .gate
            .wait_until_available(id, ACTION_FINISH_UPGRADE, &self.poll)
            .await
        {
            let error = RupError::FinalizeTimeout {
                action: ACTION_FINISH_UPGRADE.to_string(),
                service: name.to_string(),
                attempts: self.poll.max_attempts,
            };
            warn!("{}", error);
            return UpgradeOutcome::Failed { error };
        }

        if let Err(e) = self.steps.finish_upgrade(id, name).await {
            warn!("{}", e);
            return UpgradeOutcome::Failed { error: e };
        }

        UpgradeOutcome::Succeeded
    }
}
