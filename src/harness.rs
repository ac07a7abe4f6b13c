use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tabled::settings::Style;
use tabled::{Table, Tabled};
use tracing::{error, info};

use crate::compute::ComputeClient;
use crate::config::HarnessConfig;
use crate::error::HarnessError;
use crate::scenarios::Scenario;
use crate::terraform::{Lifecycle, ToolExecutor};

/// Outcome of one scenario run.
#[derive(Debug)]
pub struct ScenarioResult {
    pub name: String,
    pub workspace: String,
    pub duration: Duration,
    /// Number of checks evaluated; zero when the run failed before verification.
    pub checks: usize,
    pub error: Option<HarnessError>,
}

impl ScenarioResult {
    pub fn passed(&self) -> bool {
        self.error.is_none()
    }
}

/// Runs scenarios one after another against a single root fixture directory.
pub struct Harness {
    config: HarnessConfig,
    fixture_dir: PathBuf,
    executor: Arc<dyn ToolExecutor>,
    client: ComputeClient,
}

impl Harness {
    pub fn new(
        config: HarnessConfig,
        fixture_dir: impl Into<PathBuf>,
        executor: Arc<dyn ToolExecutor>,
        client: ComputeClient,
    ) -> Self {
        Self {
            config,
            fixture_dir: fixture_dir.into(),
            executor,
            client,
        }
    }

    /// Every scenario runs even when an earlier one failed.
    pub async fn run_all(&self, scenarios: &[Box<dyn Scenario>]) -> Vec<ScenarioResult> {
        let mut results = Vec::with_capacity(scenarios.len());
        for scenario in scenarios {
            results.push(self.run_scenario(scenario.as_ref()).await);
        }
        results
    }

    pub async fn run_scenario(&self, scenario: &dyn Scenario) -> ScenarioResult {
        let ctx = self.config.scenario_context();
        let workspace = scenario.workspace(&ctx);
        info!(scenario = scenario.name(), workspace = %workspace, "starting scenario");

        let started = Instant::now();
        let outcome = self.execute(scenario, &workspace).await;
        let duration = started.elapsed();

        match &outcome {
            Ok(checks) => info!(
                scenario = scenario.name(),
                checks,
                elapsed_secs = duration.as_secs(),
                "scenario passed"
            ),
            Err(e) => error!(
                scenario = scenario.name(),
                error = %e,
                elapsed_secs = duration.as_secs(),
                "scenario failed"
            ),
        }

        let (checks, error) = match outcome {
            Ok(checks) => (checks, None),
            Err(e) => (0, Some(e)),
        };
        ScenarioResult {
            name: scenario.name().to_string(),
            workspace,
            duration,
            checks,
            error,
        }
    }

    async fn execute(&self, scenario: &dyn Scenario, workspace: &str) -> Result<usize, HarnessError> {
        let ctx = self.config.scenario_context();
        let lifecycle = Lifecycle::new(Arc::clone(&self.executor), &self.fixture_dir)
            .with_workspace(workspace)
            .with_tfvars(scenario.tfvars(&ctx)?)
            .with_skip_destroy(self.config.skip_destroy);

        let client = &self.client;
        lifecycle
            .run_in_workspace(|outputs| async move {
                let report = scenario.verify(&ctx, &outputs, client).await?;
                let checks = report.into_result(scenario.name())?;
                Ok::<_, HarnessError>(checks)
            })
            .await
    }
}

#[derive(Tabled)]
struct SummaryRow {
    #[tabled(rename = "Scenario")]
    scenario: String,
    #[tabled(rename = "Workspace")]
    workspace: String,
    #[tabled(rename = "Result")]
    result: &'static str,
    #[tabled(rename = "Checks")]
    checks: usize,
    #[tabled(rename = "Duration")]
    duration: String,
    #[tabled(rename = "Error")]
    error: String,
}

pub fn render_summary(results: &[ScenarioResult]) -> String {
    let rows = results.iter().map(|result| SummaryRow {
        scenario: result.name.clone(),
        workspace: result.workspace.clone(),
        result: if result.passed() { "PASS" } else { "FAIL" },
        checks: result.checks,
        duration: format!("{:.1}s", result.duration.as_secs_f64()),
        error: result
            .error
            .as_ref()
            .map(|e| first_line(&e.to_string()).to_string())
            .unwrap_or_default(),
    });

    Table::new(rows).with(Style::modern()).to_string()
}

fn first_line(message: &str) -> &str {
    message.lines().next().unwrap_or_default()
}
