use thiserror::Error;

/// Failures raised while compiling container metadata into service definitions.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CompileError {
    #[error("Invalid port mapping: {0}")]
    InvalidPortMapping(String),
    #[error("Unsupported transport: {0}")]
    UnsupportedTransport(String),
    #[error("Unmatched check {0}")]
    UnmatchedCheck(String),
    #[error("No service name for container {0}")]
    MissingServiceName(String),
}
