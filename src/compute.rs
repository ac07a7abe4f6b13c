//! Minimal Compute Engine v1 REST surface used to inspect live resources.

mod auth;
mod client;
mod error;
mod types;

pub(crate) use auth::gcloud;
pub use auth::{ACCESS_TOKEN_ENV, resolve_access_token};
pub use client::ComputeClient;
pub use error::ComputeError;
pub use types::{
    Address, ForwardingRule, NatLogConfig, Network, Route, Router, RouterNat, RoutingConfig,
    SecondaryIpRange, ServiceDirectoryRegistration, Subnetwork, SubnetworkLogConfig,
};
