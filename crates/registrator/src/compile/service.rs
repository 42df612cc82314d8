//! Service — turn checked port mappings into Consul service definitions.

use serde::Serialize;

use super::check::CheckSpec;
use super::error::CompileError;
use super::ports::{PortMapping, Transport};

/// One reachable endpoint as sent to the registry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct ServiceDefinition {
    #[serde(rename = "ID")]
    pub id: String,
    pub name: String,
    pub address: String,
    pub port: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub check: Option<CheckSpec>,
}

/// `<uuid>:<publicPort>`, suffixed with `:udp` so a tcp and a udp mapping on
/// the same public port never share an ID.
pub fn service_id(uuid: &str, mapping: &PortMapping) -> String {
    match mapping.transport {
        Transport::Tcp => format!("{}:{}", uuid, mapping.public_port),
        Transport::Udp => format!("{}:{}:udp", uuid, mapping.public_port),
    }
}

/// Naming inputs shared by every definition of one container.
#[derive(Debug, Clone, Copy)]
pub struct ServiceIdentity<'a> {
    pub uuid: &'a str,
    pub container_name: &'a str,
    pub prefix: &'a str,
    pub service_name: Option<&'a str>,
    pub tags: Option<&'a [String]>,
}

pub fn build_service_definitions(
    identity: ServiceIdentity<'_>,
    mappings: &[PortMapping],
) -> Result<Vec<ServiceDefinition>, CompileError> {
    let service_name = identity
        .service_name
        .filter(|name| !name.is_empty())
        .ok_or_else(|| CompileError::MissingServiceName(identity.container_name.to_string()))?;

    let base_name = format!("{}{}", identity.prefix, service_name);
    let disambiguate = mappings.len() > 1;
    let tags = identity.tags.filter(|t| !t.is_empty()).map(<[String]>::to_vec);

    Ok(mappings
        .iter()
        .map(|mapping| ServiceDefinition {
            id: service_id(identity.uuid, mapping),
            name: if disambiguate {
                format!("{}-{}", base_name, mapping.private_port)
            } else {
                base_name.clone()
            },
            address: mapping.address.clone(),
            port: mapping.public_port,
            tags: tags.clone(),
            check: mapping.check.clone(),
        })
        .collect())
}
