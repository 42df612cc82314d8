//! Check — render check fragments against port mappings.

use serde::Serialize;

use super::labels::{CheckFragment, CheckFragments, CheckKind};
use super::ports::PortMapping;

pub const DEFAULT_INTERVAL: &str = "10s";
pub const DEFAULT_TIMEOUT: &str = "1s";

/// What a health check probes. HTTPS checks are HTTP checks with an
/// `https://` URL, which is how Consul models them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CheckTarget {
    Http(String),
    Tcp(String),
    Script(String),
    Ttl(String),
}

/// Fully specified health check attached to a service definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CheckSpec {
    pub id: String,
    pub name: String,
    #[serde(flatten)]
    pub target: CheckTarget,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub interval: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout: Option<String>,
    #[serde(rename = "status", skip_serializing_if = "Option::is_none")]
    pub initial_status: Option<String>,
}

impl CheckSpec {
    pub fn is_ttl(&self) -> bool {
        matches!(self.target, CheckTarget::Ttl(_))
    }
}

fn render_target(kind: CheckKind, value: &str, mapping: &PortMapping) -> CheckTarget {
    let host = &mapping.address;
    let port = mapping.public_port;
    match kind {
        CheckKind::Http => CheckTarget::Http(format!("http://{}:{}{}", host, port, value)),
        CheckKind::Https => CheckTarget::Http(format!("https://{}:{}{}", host, port, value)),
        CheckKind::Tcp => CheckTarget::Tcp(format!("{}:{}", host, port)),
        // only the first occurrence of each placeholder is substituted
        CheckKind::Script => CheckTarget::Script(
            value
                .replacen("$SERVICE_IP", host, 1)
                .replacen("$SERVICE_PORT", &port.to_string(), 1),
        ),
        CheckKind::Ttl => CheckTarget::Ttl(value.to_string()),
    }
}

/// Build the check for one mapping from its fragment.
///
/// Returns `None` when the fragment declares no check kind. TTL checks are
/// pushed by the service, so interval and timeout are dropped even when
/// they were set explicitly.
pub fn build_check(
    container_name: &str,
    fragment: &CheckFragment,
    mapping: &PortMapping,
) -> Option<CheckSpec> {
    let (kind, label) = fragment.primary()?;
    let target = render_target(kind, &label.value, mapping);
    let check_id = format!("{}_{}", container_name, label.key);

    let mut check = CheckSpec {
        id: check_id.clone(),
        name: check_id,
        target,
        interval: Some(fragment.interval.clone().unwrap_or_else(|| DEFAULT_INTERVAL.to_string())),
        timeout: Some(fragment.timeout.clone().unwrap_or_else(|| DEFAULT_TIMEOUT.to_string())),
        initial_status: fragment.status.clone(),
    };
    if check.is_ttl() {
        check.interval = None;
        check.timeout = None;
    }
    Some(check)
}

/// Attach a check to every mapping whose private port has a fragment.
pub fn assemble_checks(
    container_name: &str,
    mappings: Vec<PortMapping>,
    fragments: &CheckFragments,
) -> Vec<PortMapping> {
    mappings
        .into_iter()
        .map(|mapping| {
            let Some(fragment) = fragments.get(&mapping.private_port) else {
                return mapping;
            };
            let check = build_check(container_name, fragment, &mapping);
            if check.is_none() {
                tracing::warn!(
                    container = %container_name,
                    private_port = mapping.private_port,
                    "Check overrides present but no check kind declared, skipping check"
                );
            }
            mapping.with_check(check)
        })
        .collect()
}
