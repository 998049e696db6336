//! Upgrade step invocations.

use std::sync::Arc;

use tracing::info;

use crate::error::RupError;
use crate::rancher::api::RancherApi;
use crate::rancher::types::{InServiceStrategy, LaunchConfig, Service, ServiceUpgrade};
use crate::upgrade::image::image_uuid;
use crate::upgrade::{ACTION_FINISH_UPGRADE, ACTION_UPGRADE};

/// Invokes the begin and finish upgrade actions on a service.
///
/// Each step is a single side-effecting call; the controller checks the
/// gate immediately beforehand. The server can still reject an action if
/// the service state moved in between, and that rejection surfaces here as
/// an invocation error.
pub struct UpgradeSteps {
    api: Arc<dyn RancherApi>,
}

impl UpgradeSteps {
    pub fn new(api: Arc<dyn RancherApi>) -> Self {
        Self { api }
    }

    /// Start an in-service upgrade to `image`. New containers come up
    /// before old ones stop, so the service keeps serving.
    pub async fn begin_upgrade(
        &self,
        id: &str,
        service_name: &str,
        image: &str,
    ) -> Result<Service, RupError> {
        info!("Upgrading {} to {}", service_name, image);

        let payload = ServiceUpgrade {
            in_service_strategy: InServiceStrategy {
                launch_config: LaunchConfig {
                    image_uuid: image_uuid(image),
                },
                start_first: true,
            },
        };
        let body =
            serde_json::to_value(&payload).map_err(|e| RupError::api(module_path!(), e))?;

        self.api
            .invoke_action(id, ACTION_UPGRADE, Some(body))
            .await
            .map_err(|e| RupError::upgrade(ACTION_UPGRADE, service_name, e))
    }

    /// Finalize a completed upgrade, discarding the old containers.
    pub async fn finish_upgrade(&self, id: &str, service_name: &str) -> Result<Service, RupError> {
        info!("Finishing upgrade on {}", service_name);

        self.api
            .invoke_action(id, ACTION_FINISH_UPGRADE, None)
            .await
            .map_err(|e| RupError::upgrade(ACTION_FINISH_UPGRADE, service_name, e))
    }
}
