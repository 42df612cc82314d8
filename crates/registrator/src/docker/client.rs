//! Docker client — core struct, constructor, error types.
//!
//! Domain methods live in sibling modules (`inventory`, `event`) which add
//! `impl DockerClient` blocks.

use bollard::Docker;
use thiserror::Error;

/// Label Rancher sets to the metadata-service name of a container.
pub const DEFAULT_NAME_LABEL: &str = "io.rancher.container.name";

#[derive(Error, Debug)]
pub enum DockerError {
    #[error("Docker connection failed: {0}")]
    ConnectionFailed(String),
    #[error("Stream closed")]
    StreamClosed,
    #[error("Bollard error: {0}")]
    BollardError(#[from] bollard::errors::Error),
}

#[derive(Debug, Clone)]
pub struct DockerClient {
    pub(super) client: Docker,
    /// Label consulted first when naming a container for the metadata lookup.
    pub(super) name_label: String,
}

impl DockerClient {
    pub fn new(socket_path: &str, name_label: &str) -> Result<Self, DockerError> {
        let connection = if socket_path.is_empty() {
            Docker::connect_with_defaults()
                .map_err(|e| DockerError::ConnectionFailed(e.to_string()))?
        } else {
            let clean_path = socket_path.trim_start_matches("unix://");
            Docker::connect_with_socket(clean_path, 120, &bollard::API_DEFAULT_VERSION)
                .map_err(|e| DockerError::ConnectionFailed(e.to_string()))?
        };

        Ok(DockerClient {
            client: connection,
            name_label: name_label.to_string(),
        })
    }

    /// Round-trip to the daemon so a bad socket fails at boot, not on the
    /// first event.
    pub async fn ping(&self) -> Result<(), DockerError> {
        self.client.ping().await?;
        Ok(())
    }
}

/// Name used to query the metadata service for a container.
///
/// The configured label wins (Rancher's `io.rancher.container.name` by
/// default); otherwise the Docker name without its leading slash.
pub fn resolve_container_name(
    labels: Option<&std::collections::HashMap<String, String>>,
    name_label: &str,
    fallback: Option<&str>,
) -> Option<String> {
    labels
        .and_then(|l| l.get(name_label))
        .filter(|n| !n.is_empty())
        .map(|n| n.to_string())
        .or_else(|| {
            fallback
                .map(|n| n.trim_start_matches('/'))
                .filter(|n| !n.is_empty())
                .map(str::to_string)
        })
}
