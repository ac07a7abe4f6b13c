use super::CheckReport;
use crate::compute::Route;

pub const RESTRICTED_APIS_CIDR: &str = "199.36.153.4/30";
pub const PRIVATE_APIS_CIDR: &str = "199.36.153.8/30";
pub const DEFAULT_ROUTE_CIDRS: [&str; 2] = ["0.0.0.0/0", "::/0"];

const API_ROUTE_PRIORITY: u32 = 1000;
const TAGGED_NAT_PRIORITY: u32 = 900;

/// A route the module is expected to create exactly once.
#[derive(Debug, Clone, PartialEq)]
pub struct ExpectedRoute {
    pub name: String,
    pub description: String,
    pub dest_range: String,
    pub next_hop_gateway: String,
    pub priority: u32,
    /// Instance tags the route must carry; it may carry others.
    pub tags: Vec<String>,
}

/// Route table expectations for one network.
///
/// Routes are selected by destination range; each selected group must have
/// the expected cardinality regardless of listing order.
#[derive(Debug, Clone, PartialEq)]
pub struct RouteExpectation {
    pub restricted_apis: Option<ExpectedRoute>,
    pub private_apis: Option<ExpectedRoute>,
    pub tagged_nat: Option<ExpectedRoute>,
}

impl RouteExpectation {
    pub fn none() -> Self {
        Self {
            restricted_apis: None,
            private_apis: None,
            tagged_nat: None,
        }
    }

    pub fn restricted_apis(name: &str, gateway: &str) -> ExpectedRoute {
        ExpectedRoute {
            name: format!("{}-restricted-apis", name),
            description: "Route for restricted Google API access".to_string(),
            dest_range: RESTRICTED_APIS_CIDR.to_string(),
            next_hop_gateway: gateway.to_string(),
            priority: API_ROUTE_PRIORITY,
            tags: Vec::new(),
        }
    }

    pub fn private_apis(name: &str, gateway: &str) -> ExpectedRoute {
        ExpectedRoute {
            name: format!("{}-private-apis", name),
            description: "Route for private Google API access".to_string(),
            dest_range: PRIVATE_APIS_CIDR.to_string(),
            next_hop_gateway: gateway.to_string(),
            priority: API_ROUTE_PRIORITY,
            tags: Vec::new(),
        }
    }

    pub fn tagged_nat(name: &str, gateway: &str, tags: &[String]) -> ExpectedRoute {
        ExpectedRoute {
            name: format!("{}-tagged-nat", name),
            description: "Route to NAT gateway for tagged resources".to_string(),
            dest_range: DEFAULT_ROUTE_CIDRS[0].to_string(),
            next_hop_gateway: gateway.to_string(),
            priority: TAGGED_NAT_PRIORITY,
            tags: tags.to_vec(),
        }
    }

    pub fn check(&self, routes: &[Route], report: &mut CheckReport) {
        let untagged_defaults: Vec<&Route> = routes
            .iter()
            .filter(|r| !r.is_tagged() && DEFAULT_ROUTE_CIDRS.contains(&r.dest_range.as_str()))
            .collect();
        report.expect_empty("routes[untagged default]", &untagged_defaults);

        check_group(
            "routes[restricted apis]",
            RESTRICTED_APIS_CIDR,
            self.restricted_apis.as_ref(),
            routes,
            report,
        );
        check_group(
            "routes[private apis]",
            PRIVATE_APIS_CIDR,
            self.private_apis.as_ref(),
            routes,
            report,
        );

        let tagged: Vec<&Route> = routes.iter().filter(|r| r.is_tagged()).collect();
        match &self.tagged_nat {
            Some(expected) => {
                report.expect_count("routes[tagged]", 1, &tagged);
                for route in tagged {
                    check_route("routes[tagged]", expected, route, report);
                }
            }
            None => report.expect_empty("routes[tagged]", &tagged),
        }
    }
}

fn check_group(
    path: &str,
    dest_range: &str,
    expected: Option<&ExpectedRoute>,
    routes: &[Route],
    report: &mut CheckReport,
) {
    let matching: Vec<&Route> = routes.iter().filter(|r| r.dest_range == dest_range).collect();
    match expected {
        Some(expected) => {
            report.expect_count(path, 1, &matching);
            for route in matching {
                check_route(path, expected, route, report);
            }
        }
        None => report.expect_empty(path, &matching),
    }
}

fn check_route(path: &str, expected: &ExpectedRoute, route: &Route, report: &mut CheckReport) {
    report.expect_eq(format!("{}.name", path), expected.name.as_str(), route.name.as_str());
    report.expect_eq(
        format!("{}.description", path),
        expected.description.as_str(),
        route.description.as_str(),
    );
    report.expect_eq(
        format!("{}.dest_range", path),
        expected.dest_range.as_str(),
        route.dest_range.as_str(),
    );
    report.expect_eq(
        format!("{}.next_hop_gateway", path),
        expected.next_hop_gateway.as_str(),
        route.next_hop_gateway.as_str(),
    );
    report.expect_eq(format!("{}.priority", path), expected.priority, route.priority);

    let missing: Vec<&String> = expected
        .tags
        .iter()
        .filter(|tag| !route.tags.contains(tag))
        .collect();
    report.expect_empty(format!("{}.tags", path), &missing);
}
