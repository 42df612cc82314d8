//! Fan-out — issue one registry call per item concurrently and collect every
//! result. A failed call never cancels or rolls back the others.

use futures_util::future::join_all;
use tracing::{error, info};

use crate::client::ServiceRegistry;
use crate::compile::ServiceDefinition;
use crate::consul::RegistryError;

/// Per-item results of one fan-out.
#[derive(Debug, Default)]
pub struct FanOutReport {
    pub succeeded: Vec<String>,
    pub failed: Vec<(String, RegistryError)>,
}

impl FanOutReport {
    fn collect(results: Vec<(String, Result<(), RegistryError>)>) -> Self {
        results
            .into_iter()
            .fold(Self::default(), |mut report, (id, result)| {
                match result {
                    Ok(()) => report.succeeded.push(id),
                    Err(e) => report.failed.push((id, e)),
                }
                report
            })
    }

    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }
}

pub async fn register_all(registry: &dyn ServiceRegistry, definitions: &[ServiceDefinition]) -> FanOutReport {
    let calls = definitions.iter().map(|definition| async move {
        let result = registry.register(definition).await;
        match &result {
            Ok(()) => info!(service_id = %definition.id, service = %definition.name, "Service registered"),
            Err(e) => error!(service_id = %definition.id, "Registration failed: {}", e),
        }
        (definition.id.clone(), result)
    });
    FanOutReport::collect(join_all(calls).await)
}

pub async fn deregister_all(registry: &dyn ServiceRegistry, service_ids: &[String]) -> FanOutReport {
    let calls = service_ids.iter().map(|service_id| async move {
        let result = registry.deregister(service_id).await;
        match &result {
            Ok(()) => info!(%service_id, "Service deregistered"),
            Err(e) => error!(%service_id, "Deregistration failed: {}", e),
        }
        (service_id.clone(), result)
    });
    FanOutReport::collect(join_all(calls).await)
}
