use thiserror::Error;

#[derive(Error, Debug)]
pub enum MetadataError {
    #[error("Container not found in metadata service: {0}")]
    NotFound(String),
    #[error("Metadata lookup for container {name} failed: {source}")]
    Container {
        name: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("Host lookup failed: {0}")]
    Host(#[source] reqwest::Error),
    #[error("Metadata service reported no agent IP for this host")]
    NoHostIp,
    #[error("HTTP client setup failed: {0}")]
    Client(#[source] reqwest::Error),
}
