use super::{ModuleInputs, ModuleOptions, NatInputs, Scenario, ScenarioContext};

pub struct Ipv6UlaNatScenario;

impl Scenario for Ipv6UlaNatScenario {
    fn name(&self) -> &'static str {
        "ipv6-ula-nat"
    }

    fn description(&self) -> &'static str {
        "dual-region network with internal IPv6 (ULA) and Cloud NAT"
    }

    fn inputs(&self, ctx: &ScenarioContext) -> ModuleInputs {
        ModuleInputs {
            options: Some(ModuleOptions {
                ipv6_ula: Some(true),
                ..ModuleOptions::default()
            }),
            nat: Some(NatInputs::default()),
            labels: Some(ctx.fixture_labels(self.name())),
            ..ModuleInputs::new(
                &ctx.project_id,
                ctx.fixture_name(self.name()),
                &["us-west1", "us-east1"],
            )
        }
    }
}
