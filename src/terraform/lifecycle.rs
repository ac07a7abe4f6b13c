use std::any::Any;
use std::fmt;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use futures::FutureExt;
use tempfile::NamedTempFile;
use tracing::{debug, error, info, warn};

use super::{Outputs, ResetFailure, TfVars, ToolError, ToolExecutor, ToolOutput};

const DEFAULT_WORKSPACE: &str = "default";

/// Exit code of `plan -detailed-exitcode` when changes are pending.
const PLAN_CHANGES_PENDING: i32 = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    SelectWorkspace,
    Init,
    Plan,
    Apply,
    DriftCheck,
    Output,
    Destroy,
    ResetWorkspace,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Phase::SelectWorkspace => "workspace-select",
            Phase::Init => "init",
            Phase::Plan => "plan",
            Phase::Apply => "apply",
            Phase::DriftCheck => "drift-check",
            Phase::Output => "output",
            Phase::Destroy => "destroy",
            Phase::ResetWorkspace => "workspace-reset",
        };
        f.write_str(name)
    }
}

enum Completion<T, E> {
    Finished(Result<T, E>),
    Panicked(Box<dyn Any + Send>),
}

/// Apply/verify/destroy lifecycle for one fixture directory.
///
/// Resources are NOT destroyed when the body returns an error or panics;
/// they stay up for post-mortem inspection. The default workspace is
/// re-selected on every exit path once the fixture workspace was selected.
pub struct Lifecycle {
    executor: Arc<dyn ToolExecutor>,
    fixture_dir: PathBuf,
    workspace: Option<String>,
    tfvars: TfVars,
    skip_destroy: bool,
}

impl Lifecycle {
    pub fn new(executor: Arc<dyn ToolExecutor>, fixture_dir: impl Into<PathBuf>) -> Self {
        Self {
            executor,
            fixture_dir: fixture_dir.into(),
            workspace: None,
            tfvars: TfVars::new(),
            skip_destroy: false,
        }
    }

    pub fn with_workspace(mut self, workspace: impl Into<String>) -> Self {
        self.workspace = Some(workspace.into());
        self
    }

    pub fn with_tfvars(mut self, tfvars: TfVars) -> Self {
        self.tfvars = tfvars;
        self
    }

    pub fn with_skip_destroy(mut self, skip_destroy: bool) -> Self {
        self.skip_destroy = skip_destroy;
        self
    }

    /// The requested workspace; `None` when absent or empty.
    pub fn workspace(&self) -> Option<&str> {
        self.workspace.as_deref().filter(|w| !w.is_empty())
    }

    fn workspace_label(&self) -> &str {
        self.workspace().unwrap_or(DEFAULT_WORKSPACE)
    }

    fn command_args(&self, args: &[&str]) -> Vec<String> {
        std::iter::once(format!("-chdir={}", self.fixture_dir.display()))
            .chain(args.iter().map(|arg| arg.to_string()))
            .collect()
    }

    fn describe(&self, args: &[String]) -> String {
        format!("{} {}", self.executor.program(), args.join(" "))
    }

    async fn run_checked(&self, phase: Phase, args: &[&str]) -> Result<ToolOutput, ToolError> {
        let args = self.command_args(args);
        debug!(phase = %phase, workspace = self.workspace_label(), "running phase");

        let output = self.executor.execute(&args).await?;
        if !output.success() {
            error!(
                phase = %phase,
                workspace = self.workspace_label(),
                exit_code = ?output.code,
                "phase failed"
            );
            return Err(ToolError::failed(
                self.describe(&args),
                output.code,
                &output.stderr,
            ));
        }

        info!(phase = %phase, workspace = self.workspace_label(), "phase complete");
        Ok(output)
    }

    /// `workspace select -or-create <name>`; no-op without a workspace name.
    pub async fn select_workspace(&self) -> Result<(), ToolError> {
        let Some(workspace) = self.workspace() else {
            debug!("no workspace requested, staying on the current one");
            return Ok(());
        };
        self.run_checked(
            Phase::SelectWorkspace,
            &["workspace", "select", "-or-create", workspace],
        )
        .await?;
        Ok(())
    }

    pub async fn reset_workspace(&self) -> Result<(), ToolError> {
        self.run_checked(
            Phase::ResetWorkspace,
            &["workspace", "select", DEFAULT_WORKSPACE],
        )
        .await?;
        Ok(())
    }

    async fn plan(&self, var_file: &Path, plan_file: &Path) -> Result<(), ToolError> {
        let var_arg = var_file_arg(var_file);
        let out_arg = format!("-out={}", plan_file.display());
        self.run_checked(
            Phase::Plan,
            &[
                "plan",
                "-no-color",
                "-input=false",
                var_arg.as_str(),
                out_arg.as_str(),
            ],
        )
        .await?;
        Ok(())
    }

    async fn apply(&self, plan_file: &Path) -> Result<(), ToolError> {
        let plan_arg = plan_file.display().to_string();
        self.run_checked(
            Phase::Apply,
            &[
                "apply",
                "-no-color",
                "-input=false",
                "-auto-approve",
                plan_arg.as_str(),
            ],
        )
        .await?;
        Ok(())
    }

    /// Re-plans with `-detailed-exitcode`: 0 passes, 2 is drift, anything else a tool error.
    async fn check_drift(&self, var_file: &Path) -> Result<(), ToolError> {
        let var_arg = var_file_arg(var_file);
        let args = self.command_args(&[
            "plan",
            "-no-color",
            "-input=false",
            "-detailed-exitcode",
            var_arg.as_str(),
        ]);
        debug!(phase = %Phase::DriftCheck, workspace = self.workspace_label(), "running phase");

        let output = self.executor.execute(&args).await?;
        match output.code {
            Some(0) => {
                info!(
                    phase = %Phase::DriftCheck,
                    workspace = self.workspace_label(),
                    "no pending changes after apply"
                );
                Ok(())
            }
            Some(PLAN_CHANGES_PENDING) => {
                error!(
                    phase = %Phase::DriftCheck,
                    workspace = self.workspace_label(),
                    "plan reports pending changes after apply"
                );
                Err(ToolError::Drift {
                    workspace: self.workspace_label().to_string(),
                    plan: String::from_utf8_lossy(&output.stdout).into_owned(),
                })
            }
            code => Err(ToolError::failed(
                self.describe(&args),
                code,
                &output.stderr,
            )),
        }
    }

    async fn output(&self) -> Result<Outputs, ToolError> {
        let output = self
            .run_checked(Phase::Output, &["output", "-no-color", "-json"])
            .await?;
        let outputs = Outputs::parse(&output.stdout)?;
        debug!(count = outputs.len(), "outputs projected");
        Ok(outputs)
    }

    async fn destroy(&self, var_file: &Path) -> Result<(), ToolError> {
        let var_arg = var_file_arg(var_file);
        self.run_checked(
            Phase::Destroy,
            &[
                "destroy",
                "-no-color",
                "-input=false",
                "-auto-approve",
                var_arg.as_str(),
            ],
        )
        .await?;
        Ok(())
    }

    /// init → var file → plan → apply (same artifact) → drift check → output.
    ///
    /// The variable file is returned so destroy can reuse it.
    async fn provision(&self) -> Result<(NamedTempFile, Outputs), ToolError> {
        self.run_checked(Phase::Init, &["init", "-no-color", "-input=false"])
            .await?;

        let var_file = self.tfvars.write_temp()?;
        let plan_file = tempfile::Builder::new()
            .prefix("tf")
            .suffix(".plan")
            .tempfile()
            .map_err(ToolError::PlanArtifact)?
            .into_temp_path();

        self.plan(var_file.path(), &plan_file).await?;
        self.apply(&plan_file).await?;
        plan_file.close().map_err(ToolError::PlanArtifact)?;

        self.check_drift(var_file.path()).await?;
        let outputs = self.output().await?;
        Ok((var_file, outputs))
    }

    async fn run_selected<F, Fut, T, E>(&self, body: F) -> Completion<T, E>
    where
        F: FnOnce(Outputs) -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: From<ToolError>,
    {
        let (var_file, outputs) = match self.provision().await {
            Ok(provisioned) => provisioned,
            Err(e) => return Completion::Finished(Err(e.into())),
        };

        let outcome = AssertUnwindSafe(async move { body(outputs).await })
            .catch_unwind()
            .await;

        match outcome {
            Ok(Ok(value)) => {
                if self.skip_destroy {
                    info!(
                        workspace = self.workspace_label(),
                        "skipping destroy phase, resources left in place"
                    );
                } else if let Err(e) = self.destroy(var_file.path()).await {
                    return Completion::Finished(Err(e.into()));
                }
                Completion::Finished(Ok(value))
            }
            Ok(Err(e)) => {
                warn!(
                    workspace = self.workspace_label(),
                    "verification failed, skipping destroy so resources can be inspected"
                );
                Completion::Finished(Err(e))
            }
            Err(payload) => {
                warn!(
                    workspace = self.workspace_label(),
                    "verification panicked, skipping destroy so resources can be inspected"
                );
                Completion::Panicked(payload)
            }
        }
    }

    /// Runs the full lifecycle, handing the projected outputs to `body`.
    ///
    /// A failed workspace selection aborts before anything else runs. After
    /// that, the default workspace is always re-selected. A reset failure
    /// after an earlier failure is attached to that error.
    pub async fn run_in_workspace<F, Fut, T, E>(&self, body: F) -> Result<T, E>
    where
        F: FnOnce(Outputs) -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: ResetFailure,
    {
        self.select_workspace().await?;

        let completion = self.run_selected(body).await;
        let reset = self.reset_workspace().await;

        match completion {
            Completion::Finished(Ok(value)) => {
                reset?;
                Ok(value)
            }
            Completion::Finished(Err(e)) => match reset {
                Ok(()) => Err(e),
                Err(reset_err) => {
                    error!(error = %reset_err, "workspace reset failed after an earlier failure");
                    Err(e.with_reset_failure(reset_err))
                }
            },
            Completion::Panicked(payload) => {
                if let Err(reset_err) = reset {
                    error!(error = %reset_err, "workspace reset failed after a panic");
                }
                std::panic::resume_unwind(payload)
            }
        }
    }
}

impl fmt::Debug for Lifecycle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Lifecycle")
            .field("program", &self.executor.program())
            .field("fixture_dir", &self.fixture_dir)
            .field("workspace", &self.workspace)
            .field("skip_destroy", &self.skip_destroy)
            .finish()
    }
}

fn var_file_arg(var_file: &Path) -> String {
    format!("-var-file={}", var_file.display())
}
