use std::collections::BTreeMap;

use super::CheckReport;
use crate::compute::{Address, ForwardingRule};

pub const SERVICE_DIRECTORY_REGION: &str = "us-central1";

/// Private Service Connect endpoint expectations.
#[derive(Debug, Clone, PartialEq)]
pub struct PscExpectation {
    pub address_name: String,
    pub address: String,
    pub forwarding_rule_name: String,
    pub target: String,
    /// Must be a subset of the forwarding rule labels.
    pub labels: BTreeMap<String, String>,
}

impl PscExpectation {
    pub fn check_addresses(&self, addresses: &[Address], report: &mut CheckReport) {
        report.expect_count("psc.addresses", 1, addresses);
        for address in addresses {
            report.expect_eq(
                "psc.address.name",
                self.address_name.as_str(),
                address.name.as_str(),
            );
            report.expect_eq(
                "psc.address.address",
                self.address.as_str(),
                address.address.as_str(),
            );
            report.expect_eq(
                "psc.address.address_type",
                "INTERNAL",
                address.address_type.as_str(),
            );
            report.expect_eq(
                "psc.address.purpose",
                "PRIVATE_SERVICE_CONNECT",
                address.purpose.as_str(),
            );
        }
    }

    pub fn check_forwarding_rules(&self, rules: &[ForwardingRule], report: &mut CheckReport) {
        report.expect_count("psc.forwarding_rules", 1, rules);
        for rule in rules {
            report.expect_eq(
                "psc.forwarding_rule.name",
                self.forwarding_rule_name.as_str(),
                rule.name.as_str(),
            );
            let missing: Vec<(&String, &String)> = self
                .labels
                .iter()
                .filter(|(key, value)| rule.labels.get(*key) != Some(*value))
                .collect();
            report.expect(
                "psc.forwarding_rule.labels",
                missing.is_empty(),
                format!("superset of {:?}", self.labels),
                &rule.labels,
            );
            report.expect_eq(
                "psc.forwarding_rule.ip_address",
                self.address.as_str(),
                rule.ip_address.as_str(),
            );
            report.expect_eq("psc.forwarding_rule.ip_protocol", "TCP", rule.ip_protocol.as_str());
            report.expect_eq("psc.forwarding_rule.all_ports", false, rule.all_ports);
            report.expect_empty("psc.forwarding_rule.ports", &rule.ports);
            report.expect_eq(
                "psc.forwarding_rule.allow_global_access",
                false,
                rule.allow_global_access,
            );
            report.expect_eq(
                "psc.forwarding_rule.allow_psc_global_access",
                false,
                rule.allow_psc_global_access,
            );
            report.expect(
                "psc.forwarding_rule.backend_service",
                rule.backend_service.is_empty(),
                "empty",
                &rule.backend_service,
            );
            report.expect(
                "psc.forwarding_rule.external_managed_backend_bucket_migration_state",
                rule.external_managed_backend_bucket_migration_state.is_empty(),
                "empty",
                &rule.external_managed_backend_bucket_migration_state,
            );
            report.expect(
                "psc.forwarding_rule.external_managed_backend_bucket_migration_testing_percentage",
                rule.external_managed_backend_bucket_migration_testing_percentage == 0.0,
                "0",
                rule.external_managed_backend_bucket_migration_testing_percentage,
            );
            report.expect(
                "psc.forwarding_rule.load_balancing_scheme",
                rule.load_balancing_scheme.is_empty(),
                "empty",
                &rule.load_balancing_scheme,
            );
            report.expect_eq(
                "psc.forwarding_rule.target",
                self.target.as_str(),
                rule.target.as_str(),
            );

            let registrations = &rule.service_directory_registrations;
            report.expect_count("psc.forwarding_rule.service_directory_registrations", 1, registrations);
            for registration in registrations {
                // Namespace is generated by the provider.
                report.expect(
                    "psc.service_directory_registration.namespace",
                    !registration.namespace.is_empty(),
                    "non-empty",
                    &registration.namespace,
                );
                report.expect(
                    "psc.service_directory_registration.service",
                    registration.service.is_empty(),
                    "empty",
                    &registration.service,
                );
                report.expect_eq(
                    "psc.service_directory_registration.service_directory_region",
                    SERVICE_DIRECTORY_REGION,
                    registration.service_directory_region.as_str(),
                );
            }
        }
    }
}

/// With no PSC configured neither collection may contain anything.
pub fn check_no_psc(addresses: &[Address], rules: &[ForwardingRule], report: &mut CheckReport) {
    report.expect_empty("psc.addresses", addresses);
    report.expect_empty("psc.forwarding_rules", rules);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compute::ServiceDirectoryRegistration;

    fn expectation() -> PscExpectation {
        PscExpectation {
            address_name: "mrpn-psc".to_string(),
            address: "10.10.10.10".to_string(),
            forwarding_rule_name: "mrpnpsc".to_string(),
            target: "vpc-sc".to_string(),
            labels: BTreeMap::from([("fixture".to_string(), "psc".to_string())]),
        }
    }

    fn rule() -> ForwardingRule {
        ForwardingRule {
            name: "mrpnpsc".to_string(),
            labels: BTreeMap::from([
                ("fixture".to_string(), "psc".to_string()),
                ("goog-terraform-provisioned".to_string(), "true".to_string()),
            ]),
            ip_address: "10.10.10.10".to_string(),
            ip_protocol: "TCP".to_string(),
            target: "vpc-sc".to_string(),
            service_directory_registrations: vec![ServiceDirectoryRegistration {
                namespace: "goog-psc-mrpn-psc-0a1b".to_string(),
                service: String::new(),
                service_directory_region: "us-central1".to_string(),
            }],
            ..ForwardingRule::default()
        }
    }

    #[test]
    fn test_address_checks() {
        let address = Address {
            name: "mrpn-psc".to_string(),
            address: "10.10.10.10".to_string(),
            address_type: "INTERNAL".to_string(),
            purpose: "PRIVATE_SERVICE_CONNECT".to_string(),
            ..Address::default()
        };

        let mut report = CheckReport::new();
        expectation().check_addresses(&[address], &mut report);
        assert!(report.is_success(), "{:?}", report.mismatches());
    }

    #[test]
    fn test_forwarding_rule_with_extra_labels_passes() {
        let mut report = CheckReport::new();
        expectation().check_forwarding_rules(&[rule()], &mut report);
        assert!(report.is_success(), "{:?}", report.mismatches());
    }

    #[test]
    fn test_forwarding_rule_missing_label_and_scheme_set() {
        let mut live = rule();
        live.labels.remove("fixture");
        live.load_balancing_scheme = "INTERNAL".to_string();

        let mut report = CheckReport::new();
        expectation().check_forwarding_rules(&[live], &mut report);

        let paths: Vec<&str> = report.mismatches().iter().map(|m| m.path.as_str()).collect();
        assert_eq!(
            paths,
            vec![
                "psc.forwarding_rule.labels",
                "psc.forwarding_rule.load_balancing_scheme",
            ]
        );
    }

    #[test]
    fn test_no_psc_requires_empty_collections() {
        let mut report = CheckReport::new();
        check_no_psc(&[], &[], &mut report);
        assert!(report.is_success());

        let mut report = CheckReport::new();
        check_no_psc(&[], &[rule()], &mut report);
        assert_eq!(report.mismatches()[0].path, "psc.forwarding_rules");
    }
}
