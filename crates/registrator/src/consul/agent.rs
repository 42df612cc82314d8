//! Agent — HTTP client for the local Consul agent's service endpoints.

use std::time::Duration;

use reqwest::{Client, RequestBuilder};
use tracing::debug;

use super::error::RegistryError;
use crate::compile::ServiceDefinition;

/// Client for `PUT /v1/agent/service/{register,deregister}`.
#[derive(Debug, Clone)]
pub struct ConsulClient {
    agent_url: String,
    token: Option<String>,
    http_client: Client,
}

impl ConsulClient {
    /// An empty `token` disables ACL authentication.
    pub fn new(agent_url: &str, token: &str, timeout: Duration) -> Result<Self, RegistryError> {
        let http_client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(RegistryError::Client)?;

        Ok(Self {
            agent_url: agent_url.trim_end_matches('/').to_string(),
            token: Some(token.to_string()).filter(|t| !t.is_empty()),
            http_client,
        })
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.token {
            Some(token) => request.query(&[("token", token)]),
            None => request,
        }
    }

    pub async fn register(&self, definition: &ServiceDefinition) -> Result<(), RegistryError> {
        let url = format!("{}/v1/agent/service/register", self.agent_url);
        debug!(service_id = %definition.id, "Registering service");

        let wrap = |source| RegistryError::Register {
            id: definition.id.clone(),
            source,
        };

        self.authorize(self.http_client.put(&url))
            .json(definition)
            .send()
            .await
            .map_err(wrap)?
            .error_for_status()
            .map_err(wrap)?;
        Ok(())
    }

    pub async fn deregister(&self, service_id: &str) -> Result<(), RegistryError> {
        let url = format!("{}/v1/agent/service/deregister/{}", self.agent_url, service_id);
        debug!(%service_id, "Deregistering service");

        let wrap = |source| RegistryError::Deregister {
            id: service_id.to_string(),
            source,
        };

        self.authorize(self.http_client.put(&url))
            .send()
            .await
            .map_err(wrap)?
            .error_for_status()
            .map_err(wrap)?;
        Ok(())
    }
}
