//! Runtime module — process lifecycle: boot, startup sweep, event loop, shutdown.

pub mod boot;
pub mod serve;
pub mod stop;
pub mod sweep;
