use thiserror::Error;

use crate::assertions::AssertionFailure;
use crate::compute::ComputeError;
use crate::terraform::{ResetFailure, ToolError};

#[derive(Debug, Error)]
pub enum HarnessError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Tool(#[from] ToolError),

    #[error(transparent)]
    Compute(#[from] ComputeError),

    #[error(transparent)]
    Assertion(#[from] AssertionFailure),

    #[error("unknown scenario: {0}")]
    UnknownScenario(String),

    /// A run failed and the default workspace could not be re-selected afterwards.
    #[error("{primary}; workspace reset also failed: {reset}")]
    ResetAfterFailure {
        primary: Box<HarnessError>,
        #[source]
        reset: ToolError,
    },
}

impl ResetFailure for HarnessError {
    fn with_reset_failure(self, reset: ToolError) -> Self {
        HarnessError::ResetAfterFailure {
            primary: Box::new(self),
            reset,
        }
    }
}
