use std::sync::Arc;

use crate::client::ContainerRuntime;
use crate::conf::RegistratorConfig;
use crate::pipeline::Pipeline;

/// Process-wide handles. Holds no per-container data: every pipeline run
/// builds its own context from fresh metadata.
pub struct RegistratorState {
    pub runtime: Arc<dyn ContainerRuntime>,
    pub pipeline: Pipeline,
    pub config: RegistratorConfig,
}

impl RegistratorState {
    pub fn new(runtime: Arc<dyn ContainerRuntime>, pipeline: Pipeline, config: RegistratorConfig) -> Self {
        Self {
            runtime,
            pipeline,
            config,
        }
    }
}

pub type SharedState = Arc<RegistratorState>;
