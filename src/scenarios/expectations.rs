use tracing::debug;

use super::ModuleInputs;
use crate::assertions::{
    CheckReport, FlowLogExpectation, NatExpectation, NetworkExpectation, OutputExpectation,
    PscExpectation, RouteExpectation, RouterExpectation, SubnetworkExpectation, check_no_psc,
};
use crate::compute::{ComputeClient, ComputeError};
use crate::naming;
use crate::terraform::Outputs;

const PSC_TARGET_RESTRICTED: &str = "vpc-sc";
const PSC_TARGET_ALL_APIS: &str = "all-apis";

/// Everything a module run with a given input set should produce.
#[derive(Debug, Clone, PartialEq)]
pub struct ModuleExpectations {
    pub project: String,
    pub name: String,
    pub outputs: OutputExpectation,
    pub network: NetworkExpectation,
    pub subnetworks: Vec<SubnetworkExpectation>,
    pub routes: RouteExpectation,
    pub routers: Vec<RouterExpectation>,
    pub psc: Option<PscExpectation>,
}

impl ModuleExpectations {
    pub fn from_inputs(inputs: &ModuleInputs) -> Self {
        let project = inputs.project_id.as_str();
        let name = inputs.name.as_str();
        let network_link = naming::network_self_link(project, name);
        let gateway = naming::default_internet_gateway(project);
        let ipv6 = inputs.ipv6_ula();

        let subnetworks = inputs
            .regions
            .iter()
            .enumerate()
            .map(|(index, region)| SubnetworkExpectation {
                name: naming::subnet_name(name, region),
                network: network_link.clone(),
                region: naming::region_self_link(project, region),
                ip_cidr_range: naming::primary_ipv4_cidr(index),
                private_ip_google_access: true,
                flow_logs: inputs.flow_logs.as_ref().map(|f| FlowLogExpectation {
                    aggregation_interval: f.aggregation_interval.clone(),
                    flow_sampling: f.flow_sampling,
                    metadata: f.metadata.clone(),
                    filter_expr: f.filter_expr.clone(),
                }),
                ipv6_ula: ipv6,
            })
            .collect::<Vec<_>>();

        let network = NetworkExpectation::new(
            name,
            inputs
                .regions
                .iter()
                .map(|region| {
                    naming::subnetwork_self_link(project, region, &naming::subnet_name(name, region))
                }),
        )
        .with_ula(ipv6);

        let psc_enabled = inputs.psc.is_some();
        let restricted = inputs.restricted_apis_access();
        let routes = RouteExpectation {
            restricted_apis: (restricted && !psc_enabled)
                .then(|| RouteExpectation::restricted_apis(name, &gateway)),
            private_apis: (!restricted && !psc_enabled)
                .then(|| RouteExpectation::private_apis(name, &gateway)),
            tagged_nat: (!inputs.nat_tags().is_empty())
                .then(|| RouteExpectation::tagged_nat(name, &gateway, inputs.nat_tags())),
        };

        let logging_filter = inputs
            .nat
            .as_ref()
            .and_then(|n| n.logging_filter.as_deref());
        let routers = inputs
            .regions
            .iter()
            .map(|region| RouterExpectation {
                region: region.clone(),
                nat: inputs
                    .nat
                    .as_ref()
                    .map(|_| NatExpectation::new(naming::subnet_name(name, region), logging_filter)),
            })
            .collect();

        let psc = inputs.psc.as_ref().map(|psc| PscExpectation {
            address_name: name.to_string(),
            address: psc.address.clone(),
            forwarding_rule_name: naming::psc_forwarding_rule_name(name),
            target: if restricted {
                PSC_TARGET_RESTRICTED
            } else {
                PSC_TARGET_ALL_APIS
            }
            .to_string(),
            labels: inputs.effective_labels(),
        });

        Self {
            project: project.to_string(),
            name: name.to_string(),
            outputs: OutputExpectation {
                project: project.to_string(),
                name: name.to_string(),
                regions: inputs.regions.clone(),
                ipv6,
            },
            network,
            subnetworks,
            routes,
            routers,
            psc,
        }
    }

    /// Checks the Output Mapping and then the live resources.
    ///
    /// A missing network or subnetwork is recorded as a mismatch; other API
    /// failures abort the verification.
    pub async fn verify(
        &self,
        outputs: &Outputs,
        client: &ComputeClient,
    ) -> Result<CheckReport, ComputeError> {
        let mut report = CheckReport::new();
        let project = self.project.as_str();

        self.outputs.check(outputs, &mut report);

        match client.get_network(project, &self.name).await {
            Ok(network) => self.network.check(&network, &mut report),
            Err(err @ ComputeError::NotFound { .. }) => {
                report.fail("network", "an existing network", err.to_string())
            }
            Err(err) => return Err(err),
        }

        for expected in &self.subnetworks {
            let region = region_name(&expected.region);
            match client.get_subnetwork(project, region, &expected.name).await {
                Ok(subnet) => expected.check(&subnet, &mut report),
                Err(err @ ComputeError::NotFound { .. }) => report.fail(
                    format!("subnetwork[{}]", expected.name),
                    "an existing subnetwork",
                    err.to_string(),
                ),
                Err(err) => return Err(err),
            }
        }

        let filter = naming::network_filter(&self.name);

        let routes = client.list_routes(project, &filter).await?;
        debug!(count = routes.len(), network = %self.name, "listed routes");
        self.routes.check(&routes, &mut report);

        for expected in &self.routers {
            let routers = client
                .list_routers(project, &expected.region, &filter)
                .await?;
            debug!(count = routers.len(), region = %expected.region, "listed routers");
            expected.check(&routers, &mut report);
        }

        let addresses = client.list_global_addresses(project, &filter).await?;
        let rules = client
            .list_global_forwarding_rules(project, &filter)
            .await?;
        debug!(
            addresses = addresses.len(),
            forwarding_rules = rules.len(),
            "listed PSC resources"
        );
        match &self.psc {
            Some(psc) => {
                psc.check_addresses(&addresses, &mut report);
                psc.check_forwarding_rules(&rules, &mut report);
            }
            None => check_no_psc(&addresses, &rules, &mut report),
        }

        Ok(report)
    }
}

fn region_name(self_link: &str) -> &str {
    self_link.rsplit('/').next().unwrap_or(self_link)
}
