//! Pipeline module — one linear register/deregister flow per container.

pub mod context;
pub mod error;
pub mod fanout;
pub mod orchestrator;

pub use context::{PipelineContext, Stage};
pub use error::{Halt, PipelineError, SkipReason};
pub use fanout::FanOutReport;
pub use orchestrator::{Pipeline, PipelineOutcome};
