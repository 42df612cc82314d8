//! Docker module — bollard-backed event source and container inventory.

pub mod client;
pub mod event;
pub mod inventory;

pub use client::{DockerClient, DockerError};
pub use event::{ContainerEvent, EventAction};
pub use inventory::RunningContainer;
