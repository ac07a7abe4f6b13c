use serde_json::{Map, Value, json};

use super::CheckReport;
use super::subnetwork::is_global_ipv6_range;
use crate::naming;
use crate::terraform::{NetworkOutputs, Outputs};

/// Expected Output Mapping for a network built from the module defaults.
#[derive(Debug, Clone, PartialEq)]
pub struct OutputExpectation {
    pub project: String,
    pub name: String,
    pub regions: Vec<String>,
    /// ULA ranges are allocated by the provider, so only their shape is checked.
    pub ipv6: bool,
}

impl OutputExpectation {
    pub fn check(&self, outputs: &Outputs, report: &mut CheckReport) {
        let actual = outputs.to_value();
        let mut expected = expected_outputs(&self.project, &self.name, &self.regions);

        match outputs.deserialize::<NetworkOutputs>() {
            Ok(network) => {
                if self.ipv6 {
                    self.adopt_ipv6_ranges(&network, &mut expected, report);
                }
                check_subnet_consistency(&network, report);
            }
            Err(err) => report.fail("outputs", "network module outputs", err.to_string()),
        }

        report.expect_json("outputs", &expected, &actual);
    }

    // Validates each allocated IPv6 range and copies it into the expected
    // mapping so the exact comparison covers every other field.
    fn adopt_ipv6_ranges(&self, network: &NetworkOutputs, expected: &mut Value, report: &mut CheckReport) {
        for region in &self.regions {
            let subnet = naming::subnet_name(&self.name, region);

            let by_name = network
                .subnets_by_name
                .get(&subnet)
                .map(|s| s.primary_ipv6_cidr.clone())
                .unwrap_or_default();
            report.expect(
                format!("outputs/subnets_by_name/{}/primary_ipv6_cidr", subnet),
                is_global_ipv6_range(&by_name),
                "a global scope IPv6 range",
                &by_name,
            );
            if let Some(slot) =
                expected.pointer_mut(&format!("/subnets_by_name/{}/primary_ipv6_cidr", subnet))
            {
                *slot = Value::String(by_name);
            }

            let by_region = network
                .subnets_by_region
                .get(region)
                .map(|s| s.primary_ipv6_cidr.clone())
                .unwrap_or_default();
            report.expect(
                format!("outputs/subnets_by_region/{}/primary_ipv6_cidr", region),
                is_global_ipv6_range(&by_region),
                "a global scope IPv6 range",
                &by_region,
            );
            if let Some(slot) =
                expected.pointer_mut(&format!("/subnets_by_region/{}/primary_ipv6_cidr", region))
            {
                *slot = Value::String(by_region);
            }
        }
    }
}

/// The mapping the module produces for `name` across `regions` with default
/// subnet ranges and no IPv6.
pub fn expected_outputs(project: &str, name: &str, regions: &[String]) -> Value {
    let mut by_name = Map::new();
    let mut by_region = Map::new();

    for (index, region) in regions.iter().enumerate() {
        let subnet = naming::subnet_name(name, region);
        let self_link = naming::subnetwork_self_link(project, region, &subnet);
        let id = naming::subnetwork_id(project, region, &subnet);

        by_name.insert(
            subnet.clone(),
            json!({
                "region": region,
                "self_link": self_link,
                "id": id,
                "primary_ipv4_cidr": naming::primary_ipv4_cidr(index),
                "primary_ipv6_cidr": "",
                "secondary_ipv4_cidrs": {},
                "gateway_address": naming::gateway_address(index),
            }),
        );
        by_region.insert(
            region.clone(),
            json!({
                "name": subnet,
                "self_link": self_link,
                "id": id,
                "primary_ipv4_cidr": naming::primary_ipv4_cidr(index),
                "primary_ipv6_cidr": "",
                "secondary_ipv4_cidrs": {},
                "gateway_address": naming::gateway_address(index),
            }),
        );
    }

    json!({
        "self_link": naming::network_self_link(project, name),
        "id": naming::network_id(project, name),
        "subnets_by_name": by_name,
        "subnets_by_region": by_region,
    })
}

/// Both subnet views must describe the same subnets, apart from the key they
/// are indexed by.
pub fn check_subnet_consistency(network: &NetworkOutputs, report: &mut CheckReport) {
    report.expect_eq(
        "outputs/subnets_by_region (count)",
        network.subnets_by_name.len(),
        network.subnets_by_region.len(),
    );

    for (name, subnet) in &network.subnets_by_name {
        let path = format!("outputs/subnets_by_region/{}", subnet.region);
        let Some(regional) = network.subnets_by_region.get(&subnet.region) else {
            report.fail(path, format!("entry for {}", name), "<missing>");
            continue;
        };

        report.expect_eq(format!("{}/name", path), name.as_str(), regional.name.as_str());
        report.expect_eq(
            format!("{}/self_link", path),
            subnet.self_link.as_str(),
            regional.self_link.as_str(),
        );
        report.expect_eq(format!("{}/id", path), subnet.id.as_str(), regional.id.as_str());
        report.expect_eq(
            format!("{}/primary_ipv4_cidr", path),
            subnet.primary_ipv4_cidr.as_str(),
            regional.primary_ipv4_cidr.as_str(),
        );
        report.expect_eq(
            format!("{}/primary_ipv6_cidr", path),
            subnet.primary_ipv6_cidr.as_str(),
            regional.primary_ipv6_cidr.as_str(),
        );
        report.expect_eq(
            format!("{}/secondary_ipv4_cidrs", path),
            &subnet.secondary_ipv4_cidrs,
            &regional.secondary_ipv4_cidrs,
        );
        report.expect_eq(
            format!("{}/gateway_address", path),
            subnet.gateway_address.as_str(),
            regional.gateway_address.as_str(),
        );
    }
}
