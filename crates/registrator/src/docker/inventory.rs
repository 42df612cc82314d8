//! Inventory — point-in-time list of running containers for the startup sweep.

use bollard::models::ContainerSummary;
use bollard::query_parameters::ListContainersOptions;

use super::client::{resolve_container_name, DockerClient, DockerError};

/// A running container, named the way the metadata service knows it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunningContainer {
    pub id: String,
    pub name: String,
    pub image: String,
}

impl RunningContainer {
    /// Convert a list-API summary; `None` when no usable name exists.
    pub fn from_summary(s: ContainerSummary, name_label: &str) -> Option<Self> {
        let docker_name = s.names.as_deref().and_then(|n| n.first()).map(String::as_str);
        let name = resolve_container_name(s.labels.as_ref(), name_label, docker_name)?;

        Some(Self {
            id: s.id.unwrap_or_default(),
            name,
            image: s.image.unwrap_or_default(),
        })
    }
}

impl DockerClient {
    /// Containers currently running (the list API's default, `all = false`).
    pub async fn list_running(&self) -> Result<Vec<RunningContainer>, DockerError> {
        let options = Some(ListContainersOptions {
            all: false,
            ..Default::default()
        });
        let containers = self.client.list_containers(options).await?;

        Ok(containers
            .into_iter()
            .filter_map(|c| {
                let id = c.id.clone().unwrap_or_default();
                let running = RunningContainer::from_summary(c, &self.name_label);
                if running.is_none() {
                    tracing::warn!(container_id = %id, "Running container has no usable name, skipping");
                }
                running
            })
            .collect())
    }
}
