use async_trait::async_trait;
use tokio::process::Command;

use super::ToolError;

pub const DEFAULT_TF_COMMAND: &str = "tofu";

/// Exit status and captured streams of one tool invocation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ToolOutput {
    pub code: Option<i32>,
    pub stdout: Vec<u8>,
    pub stderr: Vec<u8>,
}

impl ToolOutput {
    pub fn with_code(code: i32) -> Self {
        Self {
            code: Some(code),
            ..Self::default()
        }
    }

    pub fn with_stdout(mut self, stdout: impl Into<Vec<u8>>) -> Self {
        self.stdout = stdout.into();
        self
    }

    pub fn with_stderr(mut self, stderr: impl Into<Vec<u8>>) -> Self {
        self.stderr = stderr.into();
        self
    }

    pub fn success(&self) -> bool {
        self.code == Some(0)
    }
}

/// Runs the provisioning binary. Implementations report the exit code and
/// never interpret it; the lifecycle runner decides what counts as failure.
#[async_trait]
pub trait ToolExecutor: Send + Sync {
    fn program(&self) -> &str;
    async fn execute(&self, args: &[String]) -> Result<ToolOutput, ToolError>;
}

/// Spawns the real binary with captured output and the inherited environment.
#[derive(Debug, Clone)]
pub struct ProcessExecutor {
    binary: String,
}

impl ProcessExecutor {
    pub fn new(binary: impl Into<String>) -> Self {
        Self {
            binary: binary.into(),
        }
    }
}

impl Default for ProcessExecutor {
    fn default() -> Self {
        Self::new(DEFAULT_TF_COMMAND)
    }
}

#[async_trait]
impl ToolExecutor for ProcessExecutor {
    fn program(&self) -> &str {
        &self.binary
    }

    async fn execute(&self, args: &[String]) -> Result<ToolOutput, ToolError> {
        tracing::debug!(command = %self.binary, args = ?args, "spawning tool");

        let output = Command::new(&self.binary)
            .args(args)
            .output()
            .await
            .map_err(|source| ToolError::Spawn {
                command: self.binary.clone(),
                source,
            })?;

        Ok(ToolOutput {
            code: output.status.code(),
            stdout: output.stdout,
            stderr: output.stderr,
        })
    }
}
