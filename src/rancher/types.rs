//! Wire types for the Rancher v1 API.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// One page of the `/v1/services` collection.
#[derive(Debug, Clone, Deserialize)]
pub struct ServiceCollection {
    #[serde(default)]
    pub data: Vec<Service>,
    #[serde(default)]
    pub pagination: Option<Pagination>,
}

/// Pagination links attached to a collection response.
#[derive(Debug, Clone, Deserialize)]
pub struct Pagination {
    #[serde(default)]
    pub next: Option<String>,
}

/// A service record as returned by the server.
///
/// `actions` maps every currently invocable action name to its invocation
/// URL; the key set is the service's available-actions set.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Service {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub actions: HashMap<String, String>,
}

impl Service {
    /// Whether the named action is currently invocable.
    pub fn has_action(&self, action: &str) -> bool {
        self.actions.contains_key(action)
    }
}

/// Request body for the `upgrade` action.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceUpgrade {
    pub in_service_strategy: InServiceStrategy,
}

/// In-service upgrade strategy: containers are replaced under the same
/// service, new ones starting before old ones stop.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InServiceStrategy {
    pub launch_config: LaunchConfig,
    pub start_first: bool,
}

/// The slice of the launch config the upgrade rewrites.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LaunchConfig {
    pub image_uuid: String,
}
