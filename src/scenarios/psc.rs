use super::{ModuleInputs, PscInputs, Scenario, ScenarioContext};

pub const PSC_ADDRESS: &str = "10.10.10.10";

pub struct PscScenario;

impl Scenario for PscScenario {
    fn name(&self) -> &'static str {
        "psc"
    }

    fn description(&self) -> &'static str {
        "dual-region network with a Private Service Connect endpoint for Google APIs"
    }

    fn inputs(&self, ctx: &ScenarioContext) -> ModuleInputs {
        ModuleInputs {
            psc: Some(PscInputs {
                address: PSC_ADDRESS.to_string(),
            }),
            labels: Some(ctx.fixture_labels(self.name())),
            ..ModuleInputs::new(
                &ctx.project_id,
                ctx.fixture_name(self.name()),
                &["us-west1", "us-central1"],
            )
        }
    }
}
