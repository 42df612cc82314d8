//! Ports — parse Rancher port-publish strings into [`PortMapping`] records.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use super::check::CheckSpec;
use super::error::CompileError;

/// Transport protocol of a published port.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Transport {
    Tcp,
    Udp,
}

impl Transport {
    pub fn as_str(&self) -> &'static str {
        match self {
            Transport::Tcp => "tcp",
            Transport::Udp => "udp",
        }
    }
}

impl fmt::Display for Transport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Transport {
    type Err = CompileError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "tcp" => Ok(Transport::Tcp),
            "udp" => Ok(Transport::Udp),
            other => Err(CompileError::UnsupportedTransport(other.to_string())),
        }
    }
}

/// One published container port, bound to the resolved host IP.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PortMapping {
    pub address: String,
    pub public_port: u16,
    pub private_port: u16,
    pub transport: Transport,
    pub check: Option<CheckSpec>,
}

impl PortMapping {
    /// Attach (or clear) the health check, returning the updated mapping.
    pub fn with_check(self, check: Option<CheckSpec>) -> Self {
        Self { check, ..self }
    }
}

/// Parse a single `<hostIP>:<publicPort>:<privatePort>/<transport>` string.
///
/// The embedded host IP is discarded in favour of `host_ip`: Rancher reports
/// the address the container sees, not the one other hosts can reach.
pub fn parse_port_mapping(raw: &str, host_ip: &str) -> Result<PortMapping, CompileError> {
    let invalid = || CompileError::InvalidPortMapping(raw.to_string());

    // rsplitn keeps IPv6-ish host parts intact on the left
    let mut parts = raw.trim().rsplitn(3, ':');
    let private_part = parts.next().ok_or_else(invalid)?;
    let public_part = parts.next().ok_or_else(invalid)?;
    if parts.next().is_none() {
        return Err(invalid());
    }

    let (private_str, transport) = match private_part.split_once('/') {
        Some((port, proto)) => (port, proto.parse::<Transport>()?),
        None => (private_part, Transport::Tcp),
    };

    let public_port = public_part.parse::<u16>().map_err(|_| invalid())?;
    let private_port = private_str.parse::<u16>().map_err(|_| invalid())?;

    Ok(PortMapping {
        address: host_ip.to_string(),
        public_port,
        private_port,
        transport,
        check: None,
    })
}

/// Build port mappings for every raw publish string, preserving input order.
///
/// Returns `Ok(None)` when the container publishes no ports, which callers
/// treat as a skip rather than an error.
pub fn build_port_mappings(
    raw_ports: &[String],
    host_ip: &str,
) -> Result<Option<Vec<PortMapping>>, CompileError> {
    if raw_ports.is_empty() {
        return Ok(None);
    }

    raw_ports
        .iter()
        .map(|raw| parse_port_mapping(raw, host_ip))
        .collect::<Result<Vec<_>, _>>()
        .map(Some)
}
