//! Live — implements the collaborator traits for the real clients.

use super::docker::{BoxFuture, ContainerRuntime, EventStream, MetadataSource, ServiceRegistry};
use crate::compile::ServiceDefinition;
use crate::consul::{ConsulClient, RegistryError};
use crate::docker::{DockerClient, DockerError, RunningContainer};
use crate::metadata::{ContainerMetadata, HostInfo, MetadataError, RancherMetadata};

impl ContainerRuntime for DockerClient {
    fn running_containers(&self) -> BoxFuture<'_, Result<Vec<RunningContainer>, DockerError>> {
        Box::pin(self.list_running())
    }

    fn events(&self) -> EventStream<'_> {
        Box::pin(self.stream_container_events())
    }
}

impl MetadataSource for RancherMetadata {
    fn container<'a>(&'a self, name: &'a str) -> BoxFuture<'a, Result<ContainerMetadata, MetadataError>> {
        Box::pin(RancherMetadata::container(self, name))
    }

    fn host(&self) -> BoxFuture<'_, Result<HostInfo, MetadataError>> {
        Box::pin(RancherMetadata::host(self))
    }
}

impl ServiceRegistry for ConsulClient {
    fn register<'a>(&'a self, definition: &'a ServiceDefinition) -> BoxFuture<'a, Result<(), RegistryError>> {
        Box::pin(ConsulClient::register(self, definition))
    }

    fn deregister<'a>(&'a self, service_id: &'a str) -> BoxFuture<'a, Result<(), RegistryError>> {
        Box::pin(ConsulClient::deregister(self, service_id))
    }
}
