//! Client module — collaborator traits, live bindings and fakes.

pub mod docker;
#[cfg(test)]
pub mod fake;
pub mod live;

pub use docker::{BoxFuture, ContainerRuntime, EventStream, MetadataSource, ServiceRegistry};
