use std::collections::BTreeSet;

use super::CheckReport;
use crate::compute::Network;

pub const DEFAULT_DESCRIPTION: &str = "custom vpc";
pub const DEFAULT_MTU: u32 = 1460;
pub const DEFAULT_ROUTING_MODE: &str = "GLOBAL";

/// Expected attributes of the VPC network.
#[derive(Debug, Clone, PartialEq)]
pub struct NetworkExpectation {
    pub name: String,
    pub description: String,
    pub enable_ula_internal_ipv6: bool,
    pub mtu: u32,
    pub routing_mode: String,
    pub subnetworks: BTreeSet<String>,
}

impl NetworkExpectation {
    pub fn new(name: impl Into<String>, subnetworks: impl IntoIterator<Item = String>) -> Self {
        Self {
            name: name.into(),
            description: DEFAULT_DESCRIPTION.to_string(),
            enable_ula_internal_ipv6: false,
            mtu: DEFAULT_MTU,
            routing_mode: DEFAULT_ROUTING_MODE.to_string(),
            subnetworks: subnetworks.into_iter().collect(),
        }
    }

    pub fn with_ula(mut self, enabled: bool) -> Self {
        self.enable_ula_internal_ipv6 = enabled;
        self
    }

    pub fn check(&self, network: &Network, report: &mut CheckReport) {
        report.expect_eq("network.name", self.name.as_str(), network.name.as_str());
        report.expect_eq(
            "network.description",
            self.description.as_str(),
            network.description.as_str(),
        );
        report.expect_eq(
            "network.auto_create_subnetworks",
            false,
            network.auto_create_subnetworks,
        );
        report.expect_eq(
            "network.enable_ula_internal_ipv6",
            self.enable_ula_internal_ipv6,
            network.enable_ula_internal_ipv6,
        );
        report.expect_eq("network.mtu", self.mtu, network.mtu);
        report.expect_empty("network.peerings", &network.peerings);
        report.expect_eq(
            "network.routing_config.routing_mode",
            self.routing_mode.as_str(),
            network.routing_config.routing_mode.as_str(),
        );

        report.expect_count(
            "network.subnetworks",
            self.subnetworks.len(),
            &network.subnetworks,
        );
        for subnetwork in &network.subnetworks {
            report.expect(
                "network.subnetworks[]",
                self.subnetworks.contains(subnetwork),
                format!("one of {:?}", self.subnetworks),
                subnetwork,
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compute::RoutingConfig;

    fn expected() -> NetworkExpectation {
        NetworkExpectation::new(
            "mrpn-psc",
            vec!["link/us-we1".to_string(), "link/us-ce1".to_string()],
        )
    }

    fn network() -> Network {
        Network {
            name: "mrpn-psc".to_string(),
            description: "custom vpc".to_string(),
            mtu: 1460,
            routing_config: RoutingConfig {
                routing_mode: "GLOBAL".to_string(),
            },
            subnetworks: vec!["link/us-ce1".to_string(), "link/us-we1".to_string()],
            ..Network::default()
        }
    }

    #[test]
    fn test_matching_network_passes_in_any_subnet_order() {
        let mut report = CheckReport::new();
        expected().check(&network(), &mut report);
        assert!(report.is_success(), "{:?}", report.mismatches());
    }

    #[test]
    fn test_unexpected_subnetwork_fails() {
        let mut live = network();
        live.subnetworks[0] = "link/eu-we1".to_string();

        let mut report = CheckReport::new();
        expected().check(&live, &mut report);

        assert_eq!(report.mismatches().len(), 1);
        assert_eq!(report.mismatches()[0].path, "network.subnetworks[]");
    }

    #[test]
    fn test_missing_subnetworks_fail_cardinality() {
        let mut live = network();
        live.subnetworks.clear();

        let mut report = CheckReport::new();
        expected().check(&live, &mut report);

        assert_eq!(report.mismatches()[0].path, "network.subnetworks");
    }

    #[test]
    fn test_ula_expectation() {
        let mut report = CheckReport::new();
        expected().with_ula(true).check(&network(), &mut report);
        assert_eq!(
            report.mismatches()[0].path,
            "network.enable_ula_internal_ipv6"
        );
    }
}
