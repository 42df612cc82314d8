//! Boot — logging init, config load, client construction, state creation.

use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::conf::RegistratorConfig;
use crate::consul::ConsulClient;
use crate::docker::DockerClient;
use crate::metadata::RancherMetadata;
use crate::pipeline::Pipeline;
use crate::runtime::sweep;
use crate::state::{RegistratorState, SharedState};

/// Initialise the tracing / logging subsystem.
pub fn init_logging() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "registrator=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Load config, connect to Docker, build the HTTP clients and shared state,
/// and spawn the delayed startup sweep.
///
pub async fn boot() -> Result<SharedState, Box<dyn std::error::Error>> {
    info!("Starting registrator v{}", env!("CARGO_PKG_VERSION"));

    let config = RegistratorConfig::load()?;
    config.validate().map_err(|e| {
        error!("Invalid configuration: {}", e);
        e
    })?;
    info!(
        "Loaded configuration: consul_agent={}, metadata_url={}, prefix={:?}",
        config.consul_agent, config.metadata_url, config.service_prefix
    );

    info!(
        "Connecting to Docker daemon at: {}",
        if config.docker_socket.is_empty() {
            "default socket"
        } else {
            &config.docker_socket
        }
    );

    let docker_client = DockerClient::new(&config.docker_socket, &config.name_label)?;
    docker_client.ping().await.map_err(|e| {
        error!("Failed to connect to Docker: {}", e);
        e
    })?;
    info!("Successfully connected to Docker daemon");

    let metadata = RancherMetadata::new(&config.metadata_url, config.http_timeout())?;
    let registry = ConsulClient::new(&config.consul_agent, &config.consul_token, config.http_timeout())?;
    let pipeline = Pipeline::new(Arc::new(metadata), Arc::new(registry), &config.service_prefix);

    let state = Arc::new(RegistratorState::new(Arc::new(docker_client), pipeline, config));
    info!("Initialized shared application state");

    info!("Startup sweep scheduled in {}s", state.config.startup_delay_secs);
    tokio::spawn(sweep::startup_sweep(Arc::clone(&state)));

    Ok(state)
}
