use std::net::Ipv6Addr;

use ipnetwork::Ipv6Network;

use super::CheckReport;
use crate::compute::Subnetwork;

pub const IPV6_GOOGLE_ACCESS_ENABLED: &str = "ENABLE_OUTBOUND_VM_ACCESS_TO_GOOGLE";
pub const IPV6_GOOGLE_ACCESS_DISABLED: &str = "DISABLE_GOOGLE_ACCESS";

#[derive(Debug, Clone, PartialEq)]
pub struct FlowLogExpectation {
    pub aggregation_interval: String,
    pub flow_sampling: f64,
    pub metadata: String,
    pub filter_expr: String,
}

/// Expected attributes of one regional subnetwork.
#[derive(Debug, Clone, PartialEq)]
pub struct SubnetworkExpectation {
    pub name: String,
    pub network: String,
    pub region: String,
    pub ip_cidr_range: String,
    pub private_ip_google_access: bool,
    pub flow_logs: Option<FlowLogExpectation>,
    pub ipv6_ula: bool,
}

impl SubnetworkExpectation {
    pub fn check(&self, subnet: &Subnetwork, report: &mut CheckReport) {
        let path = |field: &str| format!("subnetwork[{}].{}", self.name, field);

        report.expect_eq(path("name"), self.name.as_str(), subnet.name.as_str());
        report.expect(
            path("description"),
            subnet.description.is_empty(),
            "empty",
            &subnet.description,
        );
        report.expect_eq(
            path("ip_cidr_range"),
            self.ip_cidr_range.as_str(),
            subnet.ip_cidr_range.as_str(),
        );
        report.expect_eq(path("network"), self.network.as_str(), subnet.network.as_str());
        report.expect_eq(path("region"), self.region.as_str(), subnet.region.as_str());
        report.expect_eq(
            path("private_ip_google_access"),
            self.private_ip_google_access,
            subnet.private_ip_google_access,
        );
        report.expect_eq(path("purpose"), "PRIVATE", subnet.purpose.as_str());
        report.expect(path("role"), subnet.role.is_empty(), "empty", &subnet.role);
        report.expect_empty(path("secondary_ip_ranges"), &subnet.secondary_ip_ranges);
        report.expect(path("state"), subnet.state.is_empty(), "empty", &subnet.state);
        report.expect(
            path("external_ipv6_prefix"),
            subnet.external_ipv6_prefix.is_empty(),
            "empty",
            &subnet.external_ipv6_prefix,
        );

        self.check_flow_logs(subnet, report);
        self.check_ipv6(subnet, report);
    }

    fn check_flow_logs(&self, subnet: &Subnetwork, report: &mut CheckReport) {
        let path = |field: &str| format!("subnetwork[{}].{}", self.name, field);
        let log_config = &subnet.log_config;

        match &self.flow_logs {
            Some(flow_logs) => {
                report.expect_eq(path("enable_flow_logs"), true, subnet.enable_flow_logs);
                report.expect_eq(path("log_config.enable"), true, log_config.enable);
                report.expect_eq(
                    path("log_config.aggregation_interval"),
                    flow_logs.aggregation_interval.as_str(),
                    log_config.aggregation_interval.as_str(),
                );
                report.expect_eq(
                    path("log_config.filter_expr"),
                    flow_logs.filter_expr.as_str(),
                    log_config.filter_expr.as_str(),
                );
                report.expect_eq(
                    path("log_config.flow_sampling"),
                    flow_logs.flow_sampling,
                    log_config.flow_sampling,
                );
                report.expect_eq(
                    path("log_config.metadata"),
                    flow_logs.metadata.as_str(),
                    log_config.metadata.as_str(),
                );
                report.expect_empty(
                    path("log_config.metadata_fields"),
                    &log_config.metadata_fields,
                );
            }
            None => {
                report.expect_eq(path("enable_flow_logs"), false, subnet.enable_flow_logs);
                report.expect_eq(path("log_config.enable"), false, log_config.enable);
            }
        }
    }

    fn check_ipv6(&self, subnet: &Subnetwork, report: &mut CheckReport) {
        let path = |field: &str| format!("subnetwork[{}].{}", self.name, field);

        if self.ipv6_ula {
            report.expect(
                path("internal_ipv6_prefix"),
                is_global_ipv6_range(&subnet.internal_ipv6_prefix),
                "a global scope IPv6 prefix",
                &subnet.internal_ipv6_prefix,
            );
            report.expect(
                path("ipv6_cidr_range"),
                is_global_ipv6_range(&subnet.ipv6_cidr_range),
                "a global scope IPv6 range",
                &subnet.ipv6_cidr_range,
            );
            report.expect_eq(
                path("private_ipv6_google_access"),
                IPV6_GOOGLE_ACCESS_ENABLED,
                subnet.private_ipv6_google_access.as_str(),
            );
            report.expect_eq(path("stack_type"), "IPV4_IPV6", subnet.stack_type.as_str());
        } else {
            report.expect(
                path("internal_ipv6_prefix"),
                subnet.internal_ipv6_prefix.is_empty(),
                "empty",
                &subnet.internal_ipv6_prefix,
            );
            report.expect(
                path("ipv6_cidr_range"),
                subnet.ipv6_cidr_range.is_empty(),
                "empty",
                &subnet.ipv6_cidr_range,
            );
            report.expect_eq(
                path("private_ipv6_google_access"),
                IPV6_GOOGLE_ACCESS_DISABLED,
                subnet.private_ipv6_google_access.as_str(),
            );
            report.expect_eq(path("stack_type"), "IPV4_ONLY", subnet.stack_type.as_str());
        }
    }
}

pub fn parse_ipv6_network(cidr: &str) -> Option<Ipv6Network> {
    cidr.parse::<Ipv6Network>().ok()
}

/// True for a parseable IPv6 network range (no host bits set) whose address
/// has global scope.
///
/// Unique local ranges (fc00::/7) count as global scope (RFC 4193 §3.3).
pub fn is_global_ipv6_range(cidr: &str) -> bool {
    parse_ipv6_network(cidr)
        .is_some_and(|network| network.network() == network.ip() && has_global_scope(network.ip()))
}

fn has_global_scope(ip: Ipv6Addr) -> bool {
    let [first, second, ..] = ip.segments();
    let link_local = first & 0xffc0 == 0xfe80;
    let site_local = first & 0xffc0 == 0xfec0;
    // 2001:db8::/32, RFC 3849
    let documentation = first == 0x2001 && second == 0x0db8;
    !(ip.is_unspecified()
        || ip.is_loopback()
        || ip.is_multicast()
        || link_local
        || site_local
        || documentation)
}
