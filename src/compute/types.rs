use std::collections::BTreeMap;

use serde::Deserialize;

/// One page of a Compute Engine `list` response.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", bound(deserialize = "T: Deserialize<'de>"))]
pub struct ListResponse<T> {
    #[serde(default)]
    pub items: Vec<T>,
    #[serde(default)]
    pub next_page_token: Option<String>,
}

/// Body of a non-2xx response: `{"error": {"code": 404, "message": "..."}}`.
#[derive(Debug, Default, Deserialize)]
pub struct ApiErrorBody {
    #[serde(default)]
    pub error: ApiErrorDetail,
}

#[derive(Debug, Default, Deserialize)]
pub struct ApiErrorDetail {
    #[serde(default)]
    pub code: u16,
    #[serde(default)]
    pub message: String,
}

// The API omits false, zero and empty fields, so every struct defaults.

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Network {
    pub name: String,
    pub description: String,
    pub self_link: String,
    pub auto_create_subnetworks: bool,
    pub enable_ula_internal_ipv6: bool,
    pub mtu: u32,
    pub peerings: Vec<serde_json::Value>,
    pub routing_config: RoutingConfig,
    pub subnetworks: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RoutingConfig {
    pub routing_mode: String,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Subnetwork {
    pub name: String,
    pub description: String,
    pub self_link: String,
    pub network: String,
    pub region: String,
    pub ip_cidr_range: String,
    pub ipv6_cidr_range: String,
    pub internal_ipv6_prefix: String,
    pub external_ipv6_prefix: String,
    pub enable_flow_logs: bool,
    pub log_config: SubnetworkLogConfig,
    pub private_ip_google_access: bool,
    pub private_ipv6_google_access: String,
    pub purpose: String,
    pub role: String,
    pub secondary_ip_ranges: Vec<SecondaryIpRange>,
    pub stack_type: String,
    pub state: String,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SubnetworkLogConfig {
    pub enable: bool,
    pub aggregation_interval: String,
    pub filter_expr: String,
    pub flow_sampling: f64,
    pub metadata: String,
    pub metadata_fields: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SecondaryIpRange {
    pub range_name: String,
    pub ip_cidr_range: String,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Route {
    pub name: String,
    pub description: String,
    pub network: String,
    pub dest_range: String,
    pub next_hop_gateway: String,
    pub priority: u32,
    pub tags: Vec<String>,
}

impl Route {
    pub fn is_tagged(&self) -> bool {
        !self.tags.is_empty()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Router {
    pub name: String,
    pub network: String,
    pub region: String,
    pub nats: Vec<RouterNat>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RouterNat {
    pub name: String,
    pub log_config: NatLogConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NatLogConfig {
    pub enable: bool,
    pub filter: String,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Address {
    pub name: String,
    pub address: String,
    pub address_type: String,
    pub purpose: String,
    pub network: String,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ForwardingRule {
    pub name: String,
    pub network: String,
    pub labels: BTreeMap<String, String>,
    #[serde(rename = "IPAddress")]
    pub ip_address: String,
    #[serde(rename = "IPProtocol")]
    pub ip_protocol: String,
    pub all_ports: bool,
    pub ports: Vec<String>,
    pub allow_global_access: bool,
    pub allow_psc_global_access: bool,
    pub backend_service: String,
    pub external_managed_backend_bucket_migration_state: String,
    pub external_managed_backend_bucket_migration_testing_percentage: f64,
    pub load_balancing_scheme: String,
    pub target: String,
    pub service_directory_registrations: Vec<ServiceDirectoryRegistration>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ServiceDirectoryRegistration {
    pub namespace: String,
    pub service: String,
    pub service_directory_region: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_network_deserialization_camel_case() {
        let json = r#"{
            "kind": "compute#network",
            "id": "5571230418903478212",
            "name": "mrpn-psc",
            "description": "custom vpc",
            "selfLink": "https://www.googleapis.com/compute/v1/projects/p/global/networks/mrpn-psc",
            "autoCreateSubnetworks": false,
            "mtu": 1460,
            "routingConfig": {"routingMode": "GLOBAL"},
            "subnetworks": ["https://www.googleapis.com/compute/v1/projects/p/regions/us-west1/subnetworks/mrpn-psc-us-we1"],
            "networkFirewallPolicyEnforcementOrder": "AFTER_CLASSIC_FIREWALL"
        }"#;

        let network: Network = serde_json::from_str(json).unwrap();
        assert_eq!(network.name, "mrpn-psc");
        assert_eq!(network.mtu, 1460);
        assert_eq!(network.routing_config.routing_mode, "GLOBAL");
        assert!(!network.enable_ula_internal_ipv6, "omitted booleans default to false");
        assert!(network.peerings.is_empty());
        assert_eq!(network.subnetworks.len(), 1);
    }

    #[test]
    fn test_subnetwork_log_config_deserialization() {
        let json = r#"{
            "name": "mrpn-flow-logging-us-we1",
            "ipCidrRange": "172.16.0.0/24",
            "enableFlowLogs": true,
            "privateIpGoogleAccess": true,
            "privateIpv6GoogleAccess": "DISABLE_GOOGLE_ACCESS",
            "purpose": "PRIVATE",
            "stackType": "IPV4_ONLY",
            "logConfig": {
                "enable": true,
                "aggregationInterval": "INTERVAL_5_SEC",
                "flowSampling": 0.5,
                "metadata": "INCLUDE_ALL_METADATA",
                "filterExpr": "true"
            }
        }"#;

        let subnet: Subnetwork = serde_json::from_str(json).unwrap();
        assert!(subnet.enable_flow_logs);
        assert!(subnet.log_config.enable);
        assert_eq!(subnet.log_config.aggregation_interval, "INTERVAL_5_SEC");
        assert_eq!(subnet.log_config.flow_sampling, 0.5);
        assert!(subnet.log_config.metadata_fields.is_empty());
        assert!(subnet.secondary_ip_ranges.is_empty());
        assert!(subnet.role.is_empty());
    }

    #[test]
    fn test_forwarding_rule_uppercase_ip_fields() {
        let json = r#"{
            "name": "mrpnpsc",
            "IPAddress": "10.10.10.10",
            "IPProtocol": "TCP",
            "target": "vpc-sc",
            "labels": {"fixture": "psc"},
            "serviceDirectoryRegistrations": [
                {"namespace": "goog-psc-mrpn-psc-1234", "serviceDirectoryRegion": "us-central1"}
            ]
        }"#;

        let rule: ForwardingRule = serde_json::from_str(json).unwrap();
        assert_eq!(rule.ip_address, "10.10.10.10");
        assert_eq!(rule.ip_protocol, "TCP");
        assert_eq!(rule.labels["fixture"], "psc");
        assert_eq!(rule.service_directory_registrations.len(), 1);
        assert!(rule.service_directory_registrations[0].service.is_empty());
        assert!(rule.load_balancing_scheme.is_empty());
    }

    #[test]
    fn test_list_response_without_items() {
        let json = r#"{"kind": "compute#routeList", "id": "projects/p/global/routes"}"#;
        let page: ListResponse<Route> = serde_json::from_str(json).unwrap();
        assert!(page.items.is_empty());
        assert!(page.next_page_token.is_none());
    }

    fn parse_page<T: serde::de::DeserializeOwned>(json: &str) -> ListResponse<T> {
        serde_json::from_str(json).unwrap()
    }

    #[derive(Debug, Deserialize)]
    struct NoDefault {
        name: String,
    }

    #[test]
    fn test_list_response_generic_item_without_default() {
        let page: ListResponse<NoDefault> =
            parse_page(r#"{"items": [{"name": "a"}, {"name": "b"}], "nextPageToken": "t2"}"#);
        let names: Vec<&str> = page.items.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, ["a", "b"]);
        assert_eq!(page.next_page_token.as_deref(), Some("t2"));

        let empty: ListResponse<NoDefault> = parse_page("{}");
        assert!(empty.items.is_empty());
    }

    #[test]
    fn test_router_nat_log_config() {
        let json = r#"{
            "name": "mrpn-ipv6-ula-nat-us-we1",
            "nats": [{"name": "mrpn-ipv6-ula-nat-us-we1", "logConfig": {"filter": "ALL"}}]
        }"#;
        let router: Router = serde_json::from_str(json).unwrap();
        assert_eq!(router.nats.len(), 1);
        assert!(!router.nats[0].log_config.enable);
        assert_eq!(router.nats[0].log_config.filter, "ALL");
    }

    #[test]
    fn test_api_error_body() {
        let json = r#"{"error": {"code": 404, "message": "The resource was not found", "errors": []}}"#;
        let body: ApiErrorBody = serde_json::from_str(json).unwrap();
        assert_eq!(body.error.code, 404);
        assert_eq!(body.error.message, "The resource was not found");
    }

    #[test]
    fn test_route_is_tagged() {
        let mut route = Route::default();
        assert!(!route.is_tagged());
        route.tags.push("nat".to_string());
        assert!(route.is_tagged());
    }
}
