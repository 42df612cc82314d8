//! Orchestrator — sequence fetch, compile and fan-out for one container.
//!
//! Register: Fetched → HostResolved → PortsMapped → NotIgnored → Named →
//! Tagged → ChecksBuilt → Registered.
//! Deregister: Fetched → HostResolved → PortsMapped → Deregistered.
//!
//! Nothing is remembered between runs; deregistration recomputes the IDs
//! from whatever the metadata service reports now.

use std::sync::Arc;

use tracing::{error, info, warn};

use crate::client::{MetadataSource, ServiceRegistry};
use crate::docker::{ContainerEvent, EventAction};

use super::context::PipelineContext;
use super::error::{Halt, PipelineError, SkipReason};
use super::fanout::{deregister_all, register_all, FanOutReport};

/// Terminal state of a pipeline run that did not fail.
#[derive(Debug)]
pub enum PipelineOutcome {
    Registered(FanOutReport),
    Deregistered(FanOutReport),
    Skipped(SkipReason),
}

/// Cheap to clone: every run gets its own copy and its own context.
#[derive(Clone)]
pub struct Pipeline {
    metadata: Arc<dyn MetadataSource>,
    registry: Arc<dyn ServiceRegistry>,
    prefix: String,
}

impl Pipeline {
    pub fn new(
        metadata: Arc<dyn MetadataSource>,
        registry: Arc<dyn ServiceRegistry>,
        prefix: &str,
    ) -> Self {
        Self {
            metadata,
            registry,
            prefix: prefix.to_string(),
        }
    }

    async fn resolve(&self, container: &str) -> Result<PipelineContext, Halt> {
        let metadata = self.metadata.container(container).await?;
        let ctx = PipelineContext::fetched(container, metadata);
        let host = self.metadata.host().await?;
        ctx.with_host(host).map_ports()
    }

    async fn run_register(&self, container: &str) -> Result<FanOutReport, Halt> {
        let ctx = self
            .resolve(container)
            .await?
            .check_ignore()?
            .resolve_name()
            .resolve_tags()
            .build_checks()?;
        let definitions = ctx.service_definitions(&self.prefix)?;
        Ok(register_all(self.registry.as_ref(), &definitions).await)
    }

    async fn run_deregister(&self, container: &str) -> Result<FanOutReport, Halt> {
        let ctx = self.resolve(container).await?;
        Ok(deregister_all(self.registry.as_ref(), &ctx.service_ids()).await)
    }

    pub async fn register(&self, container: &str) -> Result<PipelineOutcome, PipelineError> {
        settle(self.run_register(container).await, PipelineOutcome::Registered)
    }

    pub async fn deregister(&self, container: &str) -> Result<PipelineOutcome, PipelineError> {
        settle(self.run_deregister(container).await, PipelineOutcome::Deregistered)
    }

    /// Run the pipeline matching an engine event and log how it ended.
    /// Never fails: errors are logged and swallowed so the caller keeps going.
    pub async fn handle_event(&self, event: ContainerEvent) {
        info!(
            container = %event.name,
            image = %event.image,
            time = %event.timestamp(),
            "Container {}",
            event.action.as_str()
        );

        let result = match event.action {
            EventAction::Start => self.register(&event.name).await,
            EventAction::Stop => self.deregister(&event.name).await,
        };
        log_outcome(&event.name, event.action, result);
    }
}

fn settle(
    result: Result<FanOutReport, Halt>,
    done: fn(FanOutReport) -> PipelineOutcome,
) -> Result<PipelineOutcome, PipelineError> {
    match result {
        Ok(report) => Ok(done(report)),
        Err(Halt::Skip(reason)) => Ok(PipelineOutcome::Skipped(reason)),
        Err(Halt::Fail(err)) => Err(err),
    }
}

pub fn log_outcome(container: &str, action: EventAction, result: Result<PipelineOutcome, PipelineError>) {
    match result {
        Ok(PipelineOutcome::Skipped(reason)) => {
            info!(%container, %reason, "Nothing to do for container");
        }
        Ok(PipelineOutcome::Registered(report)) | Ok(PipelineOutcome::Deregistered(report)) => {
            if report.is_complete() {
                info!(
                    %container,
                    services = report.succeeded.len(),
                    "Pipeline finished for {} event",
                    action.as_str()
                );
            } else {
                warn!(
                    %container,
                    succeeded = report.succeeded.len(),
                    failed = report.failed.len(),
                    "Pipeline finished with registry errors for {} event",
                    action.as_str()
                );
            }
        }
        Err(e) => {
            error!(%container, "Pipeline failed for {} event: {}", action.as_str(), e);
        }
    }
}
