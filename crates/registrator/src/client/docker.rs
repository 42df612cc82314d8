//! Collaborator traits — abstract interfaces for everything the pipeline
//! talks to over the network.
//!
//! `live.rs` provides the real Bollard/reqwest-backed implementations.
//! `fake.rs` provides in-memory test doubles.

use std::future::Future;
use std::pin::Pin;

use crate::compile::ServiceDefinition;
use crate::consul::RegistryError;
use crate::docker::{ContainerEvent, DockerError, RunningContainer};
use crate::metadata::{ContainerMetadata, HostInfo, MetadataError};

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

pub type EventStream<'a> =
    Pin<Box<dyn tokio_stream::Stream<Item = Result<ContainerEvent, DockerError>> + Send + 'a>>;

/// Container runtime: lifecycle events plus a snapshot of what is running.
///
/// Object-safe thanks to `Pin<Box<…>>` returns. Implementations must be
/// `Send + Sync` so they can live inside `Arc<RegistratorState>`.
pub trait ContainerRuntime: Send + Sync {
    fn running_containers(&self) -> BoxFuture<'_, Result<Vec<RunningContainer>, DockerError>>;

    fn events(&self) -> EventStream<'_>;
}

/// Source of per-container metadata and the host's reachable IP.
pub trait MetadataSource: Send + Sync {
    fn container<'a>(&'a self, name: &'a str) -> BoxFuture<'a, Result<ContainerMetadata, MetadataError>>;

    fn host(&self) -> BoxFuture<'_, Result<HostInfo, MetadataError>>;
}

/// Service registry. Both calls are idempotent from the caller's side.
pub trait ServiceRegistry: Send + Sync {
    fn register<'a>(&'a self, definition: &'a ServiceDefinition) -> BoxFuture<'a, Result<(), RegistryError>>;

    fn deregister<'a>(&'a self, service_id: &'a str) -> BoxFuture<'a, Result<(), RegistryError>>;
}
