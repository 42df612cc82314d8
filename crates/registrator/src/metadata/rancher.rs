//! Rancher — HTTP client for the Rancher metadata service.

use std::time::Duration;

use reqwest::{header, Client, StatusCode};
use tracing::debug;

use super::error::MetadataError;
use super::model::{ContainerMetadata, HostInfo};

/// Client for `http://rancher-metadata/<version>`.
///
/// Cheap to clone; the inner `reqwest::Client` pools connections.
#[derive(Debug, Clone)]
pub struct RancherMetadata {
    base_url: String,
    http_client: Client,
}

impl RancherMetadata {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, MetadataError> {
        let http_client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(MetadataError::Client)?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            http_client,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub async fn container(&self, name: &str) -> Result<ContainerMetadata, MetadataError> {
        let url = format!("{}/containers/{}", self.base_url, name);
        debug!(%url, "Fetching container metadata");

        let wrap = |source| MetadataError::Container {
            name: name.to_string(),
            source,
        };

        let response = self
            .http_client
            .get(&url)
            .header(header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(wrap)?;

        if response.status() == StatusCode::NOT_FOUND {
            return Err(MetadataError::NotFound(name.to_string()));
        }

        response
            .error_for_status()
            .map_err(wrap)?
            .json::<ContainerMetadata>()
            .await
            .map_err(wrap)
    }

    pub async fn host(&self) -> Result<HostInfo, MetadataError> {
        let url = format!("{}/self/host", self.base_url);
        debug!(%url, "Fetching host metadata");

        let host = self
            .http_client
            .get(&url)
            .header(header::ACCEPT, "application/json")
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(MetadataError::Host)?
            .json::<HostInfo>()
            .await
            .map_err(MetadataError::Host)?;

        if host.agent_ip.is_empty() {
            return Err(MetadataError::NoHostIp);
        }
        Ok(host)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;
    use serde_json::json;

    fn client(server: &MockServer) -> RancherMetadata {
        RancherMetadata::new(&server.url("/latest/"), Duration::from_secs(5)).unwrap()
    }

    #[tokio::test]
    async fn test_fetch_container() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(GET)
                .path("/latest/containers/web_1")
                .header("accept", "application/json");
            then.status(200).json_body(json!({
                "uuid": "0b4c6c2e",
                "name": "web_1",
                "labels": {"SERVICE_NAME": "web"},
                "ports": ["10.42.0.3:8080:80/tcp"]
            }));
        });

        let meta = client(&server).container("web_1").await.unwrap();

        mock.assert();
        assert_eq!(meta.uuid, "0b4c6c2e");
        assert_eq!(meta.ports.len(), 1);
    }

    #[tokio::test]
    async fn test_fetch_container_not_found() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/latest/containers/ghost");
            then.status(404).body("Not found");
        });

        let err = client(&server).container("ghost").await.unwrap_err();
        assert!(matches!(err, MetadataError::NotFound(ref n) if n == "ghost"));
    }

    #[tokio::test]
    async fn test_fetch_container_server_error() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/latest/containers/web_1");
            then.status(500);
        });

        let err = client(&server).container("web_1").await.unwrap_err();
        assert!(matches!(err, MetadataError::Container { .. }));
    }

    #[tokio::test]
    async fn test_fetch_host() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/latest/self/host");
            then.status(200).json_body(json!({"agent_ip": "10.0.0.5", "name": "node-1"}));
        });

        let host = client(&server).host().await.unwrap();
        assert_eq!(host.agent_ip, "10.0.0.5");
    }

    #[tokio::test]
    async fn test_fetch_host_without_agent_ip() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/latest/self/host");
            then.status(200).json_body(json!({"agent_ip": ""}));
        });

        let err = client(&server).host().await.unwrap_err();
        assert!(matches!(err, MetadataError::NoHostIp));
    }

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let client = RancherMetadata::new("http://rancher-metadata/latest/", Duration::from_secs(1)).unwrap();
        assert_eq!(client.base_url(), "http://rancher-metadata/latest");
    }
}
