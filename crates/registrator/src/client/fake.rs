//! Fake — test doubles for the collaborator traits.
//!
//! Deterministic, in-memory implementations of [`ContainerRuntime`],
//! [`MetadataSource`] and [`ServiceRegistry`] for unit-testing the pipeline
//! and runtime loops without Docker, Rancher or Consul.

use std::collections::{HashMap, HashSet};

use tokio::sync::Mutex;

use super::docker::{BoxFuture, ContainerRuntime, EventStream, MetadataSource, ServiceRegistry};
use crate::compile::ServiceDefinition;
use crate::consul::RegistryError;
use crate::docker::{ContainerEvent, DockerError, RunningContainer};
use crate::metadata::{ContainerMetadata, HostInfo, MetadataError};

// ── Runtime ─────────────────────────────────────────────────────

/// A fake container runtime with a fixed container list and event backlog.
/// The event stream yields the backlog and then ends.
#[derive(Default)]
pub struct FakeRuntime {
    containers: Vec<RunningContainer>,
    events: Vec<ContainerEvent>,
}

impl FakeRuntime {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_container(mut self, container: RunningContainer) -> Self {
        self.containers.push(container);
        self
    }

    pub fn with_event(mut self, event: ContainerEvent) -> Self {
        self.events.push(event);
        self
    }
}

impl ContainerRuntime for FakeRuntime {
    fn running_containers(&self) -> BoxFuture<'_, Result<Vec<RunningContainer>, DockerError>> {
        Box::pin(async move { Ok(self.containers.clone()) })
    }

    fn events(&self) -> EventStream<'_> {
        let events: Vec<Result<ContainerEvent, DockerError>> =
            self.events.iter().cloned().map(Ok).collect();
        Box::pin(tokio_stream::iter(events))
    }
}

// ── Metadata ────────────────────────────────────────────────────

/// A fake metadata service keyed by container name.
#[derive(Default)]
pub struct FakeMetadata {
    containers: HashMap<String, ContainerMetadata>,
    host_ip: Option<String>,
}

impl FakeMetadata {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a container under `name`.
    pub fn with_container(mut self, name: &str, metadata: ContainerMetadata) -> Self {
        self.containers.insert(name.to_string(), metadata);
        self
    }

    /// Without a host IP every host lookup fails.
    pub fn with_host_ip(mut self, ip: &str) -> Self {
        self.host_ip = Some(ip.to_string());
        self
    }
}

impl MetadataSource for FakeMetadata {
    fn container<'a>(&'a self, name: &'a str) -> BoxFuture<'a, Result<ContainerMetadata, MetadataError>> {
        Box::pin(async move {
            self.containers
                .get(name)
                .cloned()
                .ok_or_else(|| MetadataError::NotFound(name.to_string()))
        })
    }

    fn host(&self) -> BoxFuture<'_, Result<HostInfo, MetadataError>> {
        Box::pin(async move {
            self.host_ip
                .clone()
                .map(|agent_ip| HostInfo { agent_ip })
                .ok_or(MetadataError::NoHostIp)
        })
    }
}

// ── Registry ────────────────────────────────────────────────────

#[derive(Default)]
struct RegistryLog {
    registered: Vec<ServiceDefinition>,
    deregistered: Vec<String>,
}

/// A fake registry that records every call. IDs passed to
/// [`FakeRegistry::reject`] fail instead of being recorded.
#[derive(Default)]
pub struct FakeRegistry {
    log: Mutex<RegistryLog>,
    rejected: HashSet<String>,
}

impl FakeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reject(mut self, service_id: &str) -> Self {
        self.rejected.insert(service_id.to_string());
        self
    }

    pub async fn registered(&self) -> Vec<ServiceDefinition> {
        self.log.lock().await.registered.clone()
    }

    pub async fn deregistered(&self) -> Vec<String> {
        self.log.lock().await.deregistered.clone()
    }

    pub async fn call_count(&self) -> usize {
        let log = self.log.lock().await;
        log.registered.len() + log.deregistered.len()
    }

    fn check(&self, service_id: &str) -> Result<(), RegistryError> {
        if self.rejected.contains(service_id) {
            return Err(RegistryError::Rejected {
                id: service_id.to_string(),
                reason: "rejected by fake registry".to_string(),
            });
        }
        Ok(())
    }
}

impl ServiceRegistry for FakeRegistry {
    fn register<'a>(&'a self, definition: &'a ServiceDefinition) -> BoxFuture<'a, Result<(), RegistryError>> {
        Box::pin(async move {
            self.check(&definition.id)?;
            self.log.lock().await.registered.push(definition.clone());
            Ok(())
        })
    }

    fn deregister<'a>(&'a self, service_id: &'a str) -> BoxFuture<'a, Result<(), RegistryError>> {
        Box::pin(async move {
            self.check(service_id)?;
            self.log.lock().await.deregistered.push(service_id.to_string());
            Ok(())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::docker::EventAction;
    use futures_util::StreamExt;

    #[tokio::test]
    async fn test_fake_runtime_replays_events_then_ends() {
        let runtime = FakeRuntime::new().with_event(ContainerEvent {
            action: EventAction::Start,
            name: "web".to_string(),
            image: "nginx".to_string(),
            time: None,
        });

        let events: Vec<_> = runtime.events().collect().await;
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].as_ref().unwrap().name, "web");
    }

    #[tokio::test]
    async fn test_fake_metadata_unknown_container() {
        let metadata = FakeMetadata::new();
        let err = metadata.container("ghost").await.unwrap_err();
        assert!(matches!(err, MetadataError::NotFound(_)));
        assert!(matches!(metadata.host().await, Err(MetadataError::NoHostIp)));
    }

    #[tokio::test]
    async fn test_fake_registry_records_and_rejects() {
        let registry = FakeRegistry::new().reject("bad:1");
        registry.deregister("good:1").await.unwrap();
        assert!(registry.deregister("bad:1").await.is_err());
        assert_eq!(registry.deregistered().await, vec!["good:1".to_string()]);
        assert_eq!(registry.call_count().await, 1);
    }
}
