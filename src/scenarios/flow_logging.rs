use super::{FlowLogInputs, ModuleInputs, Scenario, ScenarioContext};

pub struct FlowLoggingScenario;

impl Scenario for FlowLoggingScenario {
    fn name(&self) -> &'static str {
        "flow-logging"
    }

    fn description(&self) -> &'static str {
        "dual-region network with VPC flow logs on every subnet"
    }

    fn inputs(&self, ctx: &ScenarioContext) -> ModuleInputs {
        ModuleInputs {
            flow_logs: Some(FlowLogInputs {
                aggregation_interval: "INTERVAL_5_SEC".to_string(),
                flow_sampling: 0.5,
                metadata: "INCLUDE_ALL_METADATA".to_string(),
                metadata_fields: vec![],
                filter_expr: "true".to_string(),
            }),
            // Environment labels go through the module's default label set here.
            default_labels: Some(ctx.labels.clone()),
            ..ModuleInputs::new(
                &ctx.project_id,
                ctx.fixture_name(self.name()),
                &["us-west1", "us-central1"],
            )
        }
    }
}
