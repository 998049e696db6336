//! Service name directory.

use std::collections::HashMap;

use tracing::{debug, warn};

use crate::error::RupError;
use crate::rancher::api::RancherApi;

/// Immutable name-to-identifier index over the server's service listing.
///
/// Built exactly once at startup and shared read-only by every worker.
/// Workers never list services again; a service created mid-run is simply
/// not upgradable in that run.
#[derive(Debug, Default)]
pub struct ServiceDirectory {
    services: HashMap<String, String>,
}

impl ServiceDirectory {
    /// Build the directory from one full service listing.
    ///
    /// When two services share a name the later record wins; each collision
    /// is logged so the ambiguity is visible in the run output.
    pub async fn build(api: &dyn RancherApi) -> Result<Self, RupError> {
        let listed = api
            .list_services()
            .await
            .map_err(|e| RupError::ServiceMap(e.to_string()))?;

        let mut services = HashMap::with_capacity(listed.len());
        for service in listed {
            if let Some(previous) = services.insert(service.name.clone(), service.id.clone()) {
                warn!(
                    "Duplicate service name {}: {} replaces {}",
                    service.name, service.id, previous
                );
            }
        }

        debug!("Service directory built with {} entries", services.len());
        Ok(Self { services })
    }

    /// Look up the identifier for a service name.
    pub fn resolve(&self, name: &str) -> Result<&str, RupError> {
        self.services
            .get(name)
            .map(String::as_str)
            .ok_or_else(|| RupError::UnknownService(name.to_string()))
    }

    pub fn len(&self) -> usize {
        self.services.len()
    }

    pub fn is_empty(&self) -> bool {
        self.services.is_empty()
    }

    #[cfg(test)]
    fn from_entries(entries: &[(&str, &str)]) -> Self {
        let services = entries
            .iter()
            .map(|(name, id)| (name.to_string(), id.to_string()))
            .collect();
        Self { services }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_known_service() {
        let directory = ServiceDirectory::from_entries(&[("web", "1s1"), ("worker", "1s2")]);

        assert_eq!(directory.resolve("web").unwrap(), "1s1");
        assert_eq!(directory.resolve("worker").unwrap(), "1s2");
    }

    #[test]
    fn test_resolve_unknown_service() {
        let directory = ServiceDirectory::from_entries(&[("web", "1s1")]);

        let err = directory.resolve("db").unwrap_err();
        assert!(matches!(err, RupError::UnknownService(name) if name == "db"));
    }

    #[test]
    fn test_len_and_is_empty() {
        let empty = ServiceDirectory::default();
        assert!(empty.is_empty());
        assert_eq!(empty.len(), 0);

        let directory = ServiceDirectory::from_entries(&[("web", "1s1")]);
        assert!(!directory.is_empty());
        assert_eq!(directory.len(), 1);
    }
}
