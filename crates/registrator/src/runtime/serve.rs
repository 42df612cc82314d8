//! Serve — follow the engine's event stream and dispatch one pipeline per event.

use std::future::Future;

use tokio::task::JoinSet;
use tokio_stream::StreamExt;
use tracing::{error, info};

use crate::docker::DockerError;
use crate::runtime::stop::shutdown_signal;
use crate::state::SharedState;

/// Run the event loop until shutdown, printing the startup banner first.
pub async fn serve(state: SharedState) -> Result<(), Box<dyn std::error::Error>> {
    let config = &state.config;
    info!("");
    info!("========================================");
    info!("Registrator is ready!");
    info!("Consul agent: {}", config.consul_agent);
    info!("Metadata service: {}", config.metadata_url);
    if !config.service_prefix.is_empty() {
        info!("Service prefix: {}", config.service_prefix);
    }
    info!("Press Ctrl+C to shutdown gracefully");
    info!("========================================");
    info!("");

    event_loop(state, shutdown_signal()).await?;

    info!("Registrator shutdown complete");
    Ok(())
}

/// Spawn a pipeline for every start/stop event until `shutdown` resolves or
/// the engine closes the stream.
///
/// Events are dispatched in arrival order but their pipelines run
/// concurrently; a stop may overtake the start before it. In-flight pipelines
/// are awaited before returning.
pub async fn event_loop<F>(state: SharedState, shutdown: F) -> Result<(), DockerError>
where
    F: Future<Output = ()>,
{
    let mut events = state.runtime.events();
    let mut tasks = JoinSet::new();
    tokio::pin!(shutdown);

    info!("Listening for container events");

    let result = loop {
        tokio::select! {
            biased;

            _ = &mut shutdown => {
                info!("Shutdown requested, stopping event loop");
                break Ok(());
            }
            Some(joined) = tasks.join_next(), if !tasks.is_empty() => {
                if let Err(e) = joined {
                    error!("Pipeline task panicked: {}", e);
                }
            }
            next = events.next() => match next {
                Some(Ok(event)) => {
                    let pipeline = state.pipeline.clone();
                    tasks.spawn(async move { pipeline.handle_event(event).await });
                }
                Some(Err(e)) => error!("Docker event stream error: {}", e),
                None => {
                    error!("Docker event stream closed");
                    break Err(DockerError::StreamClosed);
                }
            },
        }
    };

    if !tasks.is_empty() {
        info!("Waiting for {} in-flight pipelines", tasks.len());
    }
    while let Some(joined) = tasks.join_next().await {
        if let Err(e) = joined {
            error!("Pipeline task panicked: {}", e);
        }
    }

    result
}
