//! Consul module — service registration against the local Consul agent.

pub mod agent;
pub mod error;

pub use agent::ConsulClient;
pub use error::RegistryError;
