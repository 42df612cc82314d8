//! Metadata module — container and host lookups against Rancher metadata.

pub mod error;
pub mod model;
pub mod rancher;

pub use error::MetadataError;
pub use model::{ContainerMetadata, HostInfo};
pub use rancher::RancherMetadata;
