//! Sweep — register every already-running container once, after a delay.

use futures_util::future::join_all;
use tracing::{error, info};

use crate::docker::EventAction;
use crate::pipeline::orchestrator::log_outcome;
use crate::state::SharedState;

/// Wait the configured startup delay (the metadata service may not be
/// reachable yet), then run the register pipeline for every running container
/// concurrently, unthrottled.
///
/// Returns the number of containers the sweep visited.
pub async fn startup_sweep(state: SharedState) -> usize {
    tokio::time::sleep(state.config.startup_delay()).await;
    info!("Startup sweep started");

    let containers = match state.runtime.running_containers().await {
        Ok(containers) => containers,
        Err(e) => {
            error!("Startup sweep could not list containers: {}", e);
            return 0;
        }
    };

    let handles = containers.into_iter().map(|container| {
        let pipeline = state.pipeline.clone();
        tokio::spawn(async move {
            info!(container = %container.name, image = %container.image, "Container found");
            let result = pipeline.register(&container.name).await;
            log_outcome(&container.name, EventAction::Start, result);
        })
    });

    let visited = join_all(handles)
        .await
        .into_iter()
        .filter(|joined| match joined {
            Ok(()) => true,
            Err(e) => {
                error!("Startup sweep task panicked: {}", e);
                false
            }
        })
        .count();

    info!("Startup sweep finished ({} containers)", visited);
    visited
}
