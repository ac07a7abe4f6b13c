//! Expected-state tables for the network module and the report they fill.
//!
//! Every check records into a [`CheckReport`] instead of failing fast, so a
//! scenario run surfaces all of its mismatches at once.

mod network;
mod outputs;
mod psc;
mod report;
mod routers;
mod routes;
mod subnetwork;

pub use network::NetworkExpectation;
pub use outputs::{OutputExpectation, check_subnet_consistency, expected_outputs};
pub use psc::{PscExpectation, SERVICE_DIRECTORY_REGION, check_no_psc};
pub use report::{AssertionFailure, CheckReport, Mismatch, diff_values};
pub use routers::{DEFAULT_NAT_LOG_FILTER, NatExpectation, RouterExpectation};
pub use routes::{
    ExpectedRoute, PRIVATE_APIS_CIDR, RESTRICTED_APIS_CIDR, RouteExpectation,
};
pub use subnetwork::{
    FlowLogExpectation, SubnetworkExpectation, is_global_ipv6_range,
};
