//! The module fixtures exercised by the harness.

mod expectations;
mod flow_logging;
mod inputs;
mod ipv6_ula_nat;
mod psc;

use std::collections::BTreeMap;

use async_trait::async_trait;

use crate::assertions::CheckReport;
use crate::compute::{ComputeClient, ComputeError};
use crate::error::HarnessError;
use crate::terraform::{Outputs, TfVars, ToolError};

pub use expectations::ModuleExpectations;
pub use flow_logging::FlowLoggingScenario;
pub use inputs::{FlowLogInputs, ModuleInputs, ModuleOptions, NatInputs, PscInputs};
pub use ipv6_ula_nat::Ipv6UlaNatScenario;
pub use psc::{PSC_ADDRESS, PscScenario};

/// Run-wide values every fixture derives its inputs from.
#[derive(Debug, Clone, PartialEq)]
pub struct ScenarioContext {
    pub project_id: String,
    pub prefix: String,
    pub labels: BTreeMap<String, String>,
}

impl ScenarioContext {
    /// Resource name and workspace name of a fixture.
    pub fn fixture_name(&self, fixture: &str) -> String {
        format!("{}-{}", self.prefix, fixture)
    }

    /// `fixture=<name>` overlaid with the environment labels.
    pub fn fixture_labels(&self, fixture: &str) -> BTreeMap<String, String> {
        let mut labels = BTreeMap::from([("fixture".to_string(), fixture.to_string())]);
        labels.extend(self.labels.clone());
        labels
    }
}

#[async_trait]
pub trait Scenario: Send + Sync {
    fn name(&self) -> &'static str;
    fn description(&self) -> &'static str;
    fn inputs(&self, ctx: &ScenarioContext) -> ModuleInputs;

    fn workspace(&self, ctx: &ScenarioContext) -> String {
        ctx.fixture_name(self.name())
    }

    fn tfvars(&self, ctx: &ScenarioContext) -> Result<TfVars, ToolError> {
        TfVars::from_serializable(&self.inputs(ctx))
    }

    fn expectations(&self, ctx: &ScenarioContext) -> ModuleExpectations {
        ModuleExpectations::from_inputs(&self.inputs(ctx))
    }

    async fn verify(
        &self,
        ctx: &ScenarioContext,
        outputs: &Outputs,
        client: &ComputeClient,
    ) -> Result<CheckReport, ComputeError> {
        self.expectations(ctx).verify(outputs, client).await
    }
}

pub fn all_scenarios() -> Vec<Box<dyn Scenario>> {
    vec![
        Box::new(FlowLoggingScenario),
        Box::new(Ipv6UlaNatScenario),
        Box::new(PscScenario),
    ]
}

pub fn get_scenario(name: &str) -> Result<Box<dyn Scenario>, HarnessError> {
    match name {
        "flow-logging" => Ok(Box::new(FlowLoggingScenario)),
        "ipv6-ula-nat" => Ok(Box::new(Ipv6UlaNatScenario)),
        "psc" => Ok(Box::new(PscScenario)),
        other => Err(HarnessError::UnknownScenario(other.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx() -> ScenarioContext {
        ScenarioContext {
            project_id: "p".to_string(),
            prefix: "mrpn".to_string(),
            labels: BTreeMap::new(),
        }
    }

    #[test]
    fn test_get_scenario_psc() {
        let scenario = get_scenario("psc").unwrap();
        assert_eq!(scenario.name(), "psc");
        assert_eq!(scenario.workspace(&ctx()), "mrpn-psc");
    }

    #[test]
    fn test_get_scenario_unknown() {
        let result = get_scenario("unknown");
        match result {
            Err(HarnessError::UnknownScenario(name)) => assert_eq!(name, "unknown"),
            _ => panic!("expected UnknownScenario error"),
        }
    }

    #[test]
    fn test_registry_names_resolve() {
        let names: Vec<&str> = all_scenarios().iter().map(|s| s.name()).collect();
        assert_eq!(names, vec!["flow-logging", "ipv6-ula-nat", "psc"]);
        for name in names {
            assert_eq!(get_scenario(name).unwrap().name(), name);
        }
    }

    #[test]
    fn test_fixture_labels_prefer_environment() {
        let mut ctx = ctx();
        ctx.labels.insert("fixture".to_string(), "shared".to_string());
        ctx.labels.insert("owner".to_string(), "ci".to_string());

        let labels = ctx.fixture_labels("psc");
        assert_eq!(labels["fixture"], "shared");
        assert_eq!(labels["owner"], "ci");
    }

    #[test]
    fn test_fixtures_use_distinct_workspaces() {
        let ctx = ctx();
        let workspaces: std::collections::BTreeSet<String> =
            all_scenarios().iter().map(|s| s.workspace(&ctx)).collect();
        assert_eq!(workspaces.len(), 3);
    }
}
