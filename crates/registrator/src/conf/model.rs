//! Model — RegistratorConfig and its defaults.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::docker::client::DEFAULT_NAME_LABEL;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistratorConfig {
    /// Prepended to every registered service name.
    pub service_prefix: String,
    pub consul_agent: String,
    /// Consul ACL token; empty means no token is sent.
    pub consul_token: String,
    /// Seconds to wait before sweeping already-running containers.
    pub startup_delay_secs: u64,
    pub metadata_url: String,
    pub docker_socket: String,
    /// Container label holding the metadata-service name of a container.
    pub name_label: String,
    pub http_timeout_secs: u64,
}

impl RegistratorConfig {
    pub fn startup_delay(&self) -> Duration {
        Duration::from_secs(self.startup_delay_secs)
    }

    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_secs)
    }
}

impl Default for RegistratorConfig {
    fn default() -> Self {
        Self {
            service_prefix: String::new(),
            consul_agent: "http://localhost:8500".to_string(),
            consul_token: String::new(),
            startup_delay_secs: 30,
            metadata_url: "http://rancher-metadata/latest".to_string(),
            docker_socket: String::new(),
            name_label: DEFAULT_NAME_LABEL.to_string(),
            http_timeout_secs: 10,
        }
    }
}
