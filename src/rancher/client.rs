//! HTTP client for the Rancher v1 API.

use std::time::Duration;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;

use crate::error::RupError;
use crate::rancher::api::RancherApi;
use crate::rancher::types::{Service, ServiceCollection};

/// Per-request timeout applied to every API call.
const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Rancher v1 API client authenticated with an access/secret key pair.
pub struct RancherClient {
    http: reqwest::Client,
    base_url: String,
    access_key: String,
    secret_key: String,
}

impl RancherClient {
    /// Build a client for the given endpoint. A trailing slash on the URL
    /// is tolerated and trimmed.
    pub fn new(url: &str, access_key: &str, secret_key: &str) -> Result<Self, RupError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(|e| RupError::api(module_path!(), e))?;

        Ok(Self {
            http,
            base_url: url.trim_end_matches('/').to_string(),
            access_key: access_key.to_string(),
            secret_key: secret_key.to_string(),
        })
    }

    fn services_url(&self) -> String {
        format!("{}/v1/services", self.base_url)
    }

    fn service_url(&self, id: &str) -> String {
        format!("{}/v1/services/{}", self.base_url, id)
    }

    fn action_url(&self, id: &str, action: &str) -> String {
        format!("{}/v1/services/{}/?action={}", self.base_url, id, action)
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, RupError> {
        let response = self
            .http
            .get(url)
            .basic_auth(&self.access_key, Some(&self.secret_key))
            .send()
            .await
            .map_err(|e| RupError::api(module_path!(), e))?;

        Self::decode(response).await
    }

    async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, RupError> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(RupError::Api(
                module_path!().to_string(),
                format!("HTTP {}: {}", status, body),
            ));
        }

        response
            .json::<T>()
            .await
            .map_err(|e| RupError::api(module_path!(), e))
    }
}

#[async_trait]
impl RancherApi for RancherClient {
    async fn list_services(&self) -> Result<Vec<Service>, RupError> {
        let mut services = Vec::new();
        let mut next_url = Some(self.services_url());

        // Collections are paginated; walk the next links until exhausted.
        while let Some(url) = next_url {
            debug!("Fetching service collection page: {}", url);
            let page: ServiceCollection = self.get_json(&url).await?;
            services.extend(page.data);
            next_url = page.pagination.and_then(|p| p.next);
        }

        debug!("Listed {} services", services.len());
        Ok(services)
    }

    async fn get_service(&self, id: &str) -> Result<Service, RupError> {
        self.get_json(&self.service_url(id)).await
    }

    async fn invoke_action(
        &self,
        id: &str,
        action: &str,
        payload: Option<Value>,
    ) -> Result<Service, RupError> {
        debug!("Invoking action {} on service {}", action, id);

        let mut request = self
            .http
            .post(self.action_url(id, action))
            .basic_auth(&self.access_key, Some(&self.secret_key));

        if let Some(body) = payload {
            request = request.json(&body);
        }

        let response = request
            .send()
            .await
            .map_err(|e| RupError::api(module_path!(), e))?;

        Self::decode(response).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{basic_auth, body_json, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_client(url: &str) -> RancherClient {
        match RancherClient::new(url, "key", "secret") {
            Ok(client) => client,
            Err(e) => panic!("client build failed: {}", e),
        }
    }

    #[test]
    fn test_url_builders_trim_trailing_slash() {
        let client = test_client("http://rancher.example.com:8080/");

        assert_eq!(
            client.services_url(),
            "http://rancher.example.com:8080/v1/services"
        );
        assert_eq!(
            client.service_url("1s1"),
            "http://rancher.example.com:8080/v1/services/1s1"
        );
        assert_eq!(
            client.action_url("1s1", "upgrade"),
            "http://rancher.example.com:8080/v1/services/1s1/?action=upgrade"
        );
    }

    #[tokio::test]
    async fn test_list_services_follows_pagination() {
        let server = MockServer::start().await;

        // First page serves exactly once; the follow-up request carries the
        // marker from the next link.
        Mock::given(method("GET"))
            .and(path("/v1/services"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": [{"id": "1s1", "name": "web"}],
                "pagination": {"next": format!("{}/v1/services?marker=m1", server.uri())}
            })))
            .up_to_n_times(1)
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path("/v1/services"))
            .and(query_param("marker", "m1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": [{"id": "1s2", "name": "worker"}],
                "pagination": {}
            })))
            .mount(&server)
            .await;

        let client = test_client(&server.uri());
        let services = client.list_services().await.unwrap();

        assert_eq!(services.len(), 2);
        assert_eq!(services[0].name, "web");
        assert_eq!(services[1].name, "worker");
    }

    #[tokio::test]
    async fn test_get_service_sends_basic_auth() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/v1/services/1s1"))
            .and(basic_auth("key", "secret"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": "1s1",
                "name": "web",
                "state": "active",
                "actions": {"upgrade": "http://r/v1/services/1s1/?action=upgrade"}
            })))
            .mount(&server)
            .await;

        let client = test_client(&server.uri());
        let service = client.get_service("1s1").await.unwrap();

        assert_eq!(service.name, "web");
        assert!(service.has_action("upgrade"));
    }

    #[tokio::test]
    async fn test_get_service_maps_http_error() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/v1/services/1s1"))
            .respond_with(ResponseTemplate::new(500).set_body_string("server on fire"))
            .mount(&server)
            .await;

        let client = test_client(&server.uri());
        let err = client.get_service("1s1").await.unwrap_err();

        match err {
            RupError::Api(_, detail) => {
                assert!(detail.contains("500"), "unexpected detail: {}", detail);
                assert!(detail.contains("server on fire"));
            }
            other => panic!("expected Api error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_invoke_action_posts_payload() {
        let server = MockServer::start().await;

        let payload = json!({
            "inServiceStrategy": {
                "launchConfig": {"imageUuid": "docker:registry.example.com/web:v2"},
                "startFirst": true
            }
        });

        Mock::given(method("POST"))
            .and(path("/v1/services/1s1/"))
            .and(query_param("action", "upgrade"))
            .and(basic_auth("key", "secret"))
            .and(body_json(payload.clone()))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": "1s1",
                "name": "web",
                "state": "upgrading",
                "actions": {}
            })))
            .mount(&server)
            .await;

        let client = test_client(&server.uri());
        let service = client
            .invoke_action("1s1", "upgrade", Some(payload))
            .await
            .unwrap();

        assert_eq!(service.state.as_deref(), Some("upgrading"));
    }

    #[tokio::test]
    async fn test_invoke_action_without_payload_sends_no_body() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v1/services/1s1/"))
            .and(query_param("action", "finishupgrade"))
            .and(wiremock::matchers::body_string(""))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": "1s1",
                "name": "web",
                "state": "active",
                "actions": {"upgrade": "http://r/v1/services/1s1/?action=upgrade"}
            })))
            .mount(&server)
            .await;

        let client = test_client(&server.uri());
        let service = client.invoke_action("1s1", "finishupgrade", None).await.unwrap();

        assert_eq!(service.state.as_deref(), Some("active"));
    }
}
