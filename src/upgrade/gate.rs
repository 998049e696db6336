//! Action availability gate.

use std::sync::Arc;
use std::time::Duration;

use tracing::debug;

use crate::error::RupError;
use crate::rancher::api::RancherApi;

/// Bounds for the finalize-availability poll.
#[derive(Debug, Clone)]
pub struct PollSettings {
    /// Delay between consecutive availability checks.
    pub interval: Duration,
    /// Total number of checks before giving up.
    pub max_attempts: u32,
}

impl Default for PollSettings {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(1),
            max_attempts: 600,
        }
    }
}

/// Checks action availability against the live service record.
///
/// Every check fetches the record fresh. Availability is only as current as
/// the moment of the response; the server may still reject an action invoked
/// right after a positive check.
pub struct ActionGate {
    api: Arc<dyn RancherApi>,
}

impl ActionGate {
    pub fn new(api: Arc<dyn RancherApi>) -> Self {
        Self { api }
    }

    /// Whether `action` is currently invocable on the service.
    pub async fn is_available(&self, id: &str, action: &str) -> Result<bool, RupError> {
        let service = self.api.get_service(id).await?;
        Ok(service.has_action(action))
    }

    /// Poll until `action` becomes available, up to `poll.max_attempts`
    /// checks spaced `poll.interval` apart. The first check is immediate and
    /// there is no sleep after the last one.
    ///
    /// Failed checks count toward the bound and are retried like an
    /// unavailable action. Returns false once attempts are exhausted.
    pub async fn wait_until_available(&self, id: &str, action: &str, poll: &PollSettings) -> bool {
        for attempt in 1..=poll.max_attempts {
            match self.is_available(id, action).await {
                Ok(true) => {
                    debug!(
                        "Action {} available on {} after {} attempt(s)",
                        action, id, attempt
                    );
                    return true;
                }
                Ok(false) => {
                    debug!(
                        "Action {} not yet available on {} (attempt {}/{})",
                        action, id, attempt, poll.max_attempts
                    );
                }
                Err(e) => {
                    debug!(
                        "Availability check for {} on {} failed (attempt {}/{}): {}",
                        action, id, attempt, poll.max_attempts, e
                    );
                }
            }

            if attempt < poll.max_attempts {
                tokio::time::sleep(poll.interval).await;
            }
        }

        false
    }
}
