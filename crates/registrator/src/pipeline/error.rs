//! Pipeline outcomes — skips, failures and the halt signal stages return.

use std::fmt;

use thiserror::Error;

use crate::compile::CompileError;
use crate::metadata::MetadataError;

/// Why a pipeline stopped early without touching the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    NoPorts,
    Ignored,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::NoPorts => f.write_str("no ports exposed"),
            SkipReason::Ignored => f.write_str("ignored"),
        }
    }
}

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error(transparent)]
    Metadata(#[from] MetadataError),
    #[error(transparent)]
    Compile(#[from] CompileError),
    #[error("Port mapping attempted before the host IP was resolved")]
    HostUnresolved,
}

/// Early exit from a stage. `?` converts any pipeline error into a failure.
#[derive(Debug)]
pub enum Halt {
    Skip(SkipReason),
    Fail(PipelineError),
}

impl From<PipelineError> for Halt {
    fn from(err: PipelineError) -> Self {
        Halt::Fail(err)
    }
}

impl From<MetadataError> for Halt {
    fn from(err: MetadataError) -> Self {
        Halt::Fail(err.into())
    }
}

impl From<CompileError> for Halt {
    fn from(err: CompileError) -> Self {
        Halt::Fail(err.into())
    }
}
