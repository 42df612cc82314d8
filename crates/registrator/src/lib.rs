// Module layout for the registrator: container events in, Consul services out.

// Core infrastructure
pub mod client;
pub mod conf;
pub mod docker;
pub mod state;

// Domain modules
pub mod compile;
pub mod consul;
pub mod metadata;
pub mod pipeline;
pub mod runtime;
