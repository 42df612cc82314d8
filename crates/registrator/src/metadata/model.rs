//! Model — Rancher metadata service payloads.

use std::collections::HashMap;

use serde::Deserialize;

/// `GET /containers/<name>`. Only the fields the compiler needs are decoded.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ContainerMetadata {
    pub uuid: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub labels: HashMap<String, String>,
    /// Raw `<hostIP>:<publicPort>:<privatePort>/<transport>` strings.
    #[serde(default)]
    pub ports: Vec<String>,
}

/// `GET /self/host`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct HostInfo {
    pub agent_ip: String,
}
