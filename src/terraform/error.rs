use thiserror::Error;

/// Errors raised while driving the provisioning tool.
///
/// Every variant is fatal for the run: there are no retries.
#[derive(Debug, Error)]
pub enum ToolError {
    /// The binary could not be started at all (missing from PATH, not executable).
    #[error("failed to launch `{command}`: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    /// The tool ran and exited with a non-zero (or no) exit code.
    #[error("`{command}` failed ({status}): {stderr}")]
    Failed {
        command: String,
        status: String,
        stderr: String,
    },

    /// A plan after apply reported pending changes.
    #[error("drift detected in workspace '{workspace}': plan reports pending changes after apply")]
    Drift { workspace: String, plan: String },

    #[error("malformed output JSON: {0}")]
    MalformedOutput(#[from] serde_json::Error),

    /// The outputs parsed but do not fit the requested typed view.
    #[error("unexpected output shape: {0}")]
    UnexpectedOutputShape(#[source] serde_json::Error),

    #[error("invalid variable set: {0}")]
    InvalidVariables(String),

    #[error("variable file error: {0}")]
    VarFile(#[source] std::io::Error),

    #[error("plan artifact error: {0}")]
    PlanArtifact(#[source] std::io::Error),

    /// The default workspace could not be re-selected after an earlier failure.
    #[error("{primary}; workspace reset also failed: {reset}")]
    ResetAfterFailure {
        primary: Box<ToolError>,
        reset: Box<ToolError>,
    },
}

/// Error types that can carry a failed workspace reset next to the failure
/// that preceded it.
pub trait ResetFailure: From<ToolError> {
    fn with_reset_failure(self, reset: ToolError) -> Self;
}

impl ResetFailure for ToolError {
    fn with_reset_failure(self, reset: ToolError) -> Self {
        ToolError::ResetAfterFailure {
            primary: Box::new(self),
            reset: Box::new(reset),
        }
    }
}

impl ToolError {
    pub(crate) fn failed(command: String, code: Option<i32>, stderr: &[u8]) -> Self {
        let status = match code {
            Some(code) => format!("exit code {}", code),
            None => "terminated by signal".to_string(),
        };
        ToolError::Failed {
            command,
            status,
            stderr: String::from_utf8_lossy(stderr).trim().to_string(),
        }
    }
}
