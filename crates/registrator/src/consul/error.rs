use thiserror::Error;

#[derive(Error, Debug)]
pub enum RegistryError {
    #[error("Register {id} failed: {source}")]
    Register {
        id: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("Deregister {id} failed: {source}")]
    Deregister {
        id: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("Registry rejected {id}: {reason}")]
    Rejected { id: String, reason: String },
    #[error("HTTP client setup failed: {0}")]
    Client(#[source] reqwest::Error),
}
