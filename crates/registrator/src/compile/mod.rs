//! Compile module — container labels and ports to service definitions.
//!
//! Pure and synchronous: everything here is a function of the metadata handed
//! in, so the pipeline can run it for any number of containers concurrently.

pub mod check;
pub mod error;
pub mod labels;
pub mod ports;
pub mod service;

pub use check::{CheckSpec, CheckTarget};
pub use error::CompileError;
pub use ports::{PortMapping, Transport};
pub use service::ServiceDefinition;
