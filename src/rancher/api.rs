//! The remote orchestration API seam.

use async_trait::async_trait;
use serde_json::Value;

use crate::error::RupError;
use crate::rancher::types::Service;

/// The slice of the Rancher v1 API the upgrade flow depends on.
///
/// Implemented by [`RancherClient`](crate::rancher::client::RancherClient);
/// tests substitute in-memory fakes.
#[async_trait]
pub trait RancherApi: Send + Sync {
    /// List every service visible to the configured credentials.
    async fn list_services(&self) -> Result<Vec<Service>, RupError>;

    /// Fetch the current record for one service.
    async fn get_service(&self, id: &str) -> Result<Service, RupError>;

    /// Invoke a named action on a service, with an optional JSON body.
    /// Returns the updated service record.
    async fn invoke_action(
        &self,
        id: &str,
        action: &str,
        payload: Option<Value>,
    ) -> Result<Service, RupError>;
}
