//! Context — the value threaded through one pipeline run, and the pure
//! stages that transform it.
//!
//! Every stage consumes the context and returns a new one (or a [`Halt`]),
//! so no two pipelines ever share an accumulator.

use tracing::debug;

use crate::compile::check::assemble_checks;
use crate::compile::labels::{self, parse_check_labels};
use crate::compile::ports::build_port_mappings;
use crate::compile::service::{build_service_definitions, service_id, ServiceIdentity};
use crate::compile::{PortMapping, ServiceDefinition};
use crate::metadata::{ContainerMetadata, HostInfo};

use super::error::{Halt, PipelineError, SkipReason};

/// Position in the register/deregister state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Fetched,
    HostResolved,
    PortsMapped,
    NotIgnored,
    Named,
    Tagged,
    ChecksBuilt,
}

#[derive(Debug, Clone)]
pub struct PipelineContext {
    /// Name the container was looked up by.
    pub container: String,
    pub metadata: ContainerMetadata,
    pub host_ip: Option<String>,
    pub port_mappings: Vec<PortMapping>,
    pub service_name: Option<String>,
    pub tags: Option<Vec<String>>,
    pub stage: Stage,
}

impl PipelineContext {
    pub fn fetched(container: &str, metadata: ContainerMetadata) -> Self {
        Self {
            container: container.to_string(),
            metadata,
            host_ip: None,
            port_mappings: Vec::new(),
            service_name: None,
            tags: None,
            stage: Stage::Fetched,
        }
    }

    fn advance(self, stage: Stage) -> Self {
        debug!(container = %self.container, ?stage, "Pipeline stage complete");
        Self { stage, ..self }
    }

    /// Metadata display name, or the lookup name when the service sent none.
    pub fn display_name(&self) -> &str {
        if self.metadata.name.is_empty() {
            &self.container
        } else {
            &self.metadata.name
        }
    }

    pub fn with_host(self, host: HostInfo) -> Self {
        Self {
            host_ip: Some(host.agent_ip),
            ..self
        }
        .advance(Stage::HostResolved)
    }

    pub fn map_ports(self) -> Result<Self, Halt> {
        let host_ip = self.host_ip.as_deref().ok_or(PipelineError::HostUnresolved)?;
        let port_mappings = build_port_mappings(&self.metadata.ports, host_ip)?
            .ok_or(Halt::Skip(SkipReason::NoPorts))?;

        Ok(Self {
            port_mappings,
            ..self
        }
        .advance(Stage::PortsMapped))
    }

    pub fn check_ignore(self) -> Result<Self, Halt> {
        if labels::is_ignored(&self.metadata.labels) {
            return Err(Halt::Skip(SkipReason::Ignored));
        }
        Ok(self.advance(Stage::NotIgnored))
    }

    /// `SERVICE_NAME`, defaulting to the container's display name.
    pub fn resolve_name(self) -> Self {
        let service_name = labels::service_name(&self.metadata.labels)
            .or_else(|| Some(self.display_name().to_string()).filter(|n| !n.is_empty()));
        Self {
            service_name,
            ..self
        }
        .advance(Stage::Named)
    }

    pub fn resolve_tags(self) -> Self {
        let tags = labels::service_tags(&self.metadata.labels);
        Self { tags, ..self }.advance(Stage::Tagged)
    }

    pub fn build_checks(self) -> Result<Self, Halt> {
        let fragments = parse_check_labels(&self.metadata.labels)?;
        let port_mappings = assemble_checks(self.display_name(), self.port_mappings.clone(), &fragments);
        Ok(Self {
            port_mappings,
            ..self
        }
        .advance(Stage::ChecksBuilt))
    }

    pub fn service_definitions(&self, prefix: &str) -> Result<Vec<ServiceDefinition>, Halt> {
        let identity = ServiceIdentity {
            uuid: &self.metadata.uuid,
            container_name: self.display_name(),
            prefix,
            service_name: self.service_name.as_deref(),
            tags: self.tags.as_deref(),
        };
        Ok(build_service_definitions(identity, &self.port_mappings)?)
    }

    /// IDs to deregister, recomputed from the current mappings.
    pub fn service_ids(&self) -> Vec<String> {
        self.port_mappings
            .iter()
            .map(|m| service_id(&self.metadata.uuid, m))
            .collect()
    }
}
