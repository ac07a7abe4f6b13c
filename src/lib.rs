//! mrpn-harness - integration harness for the multi-region private network module
//!
//! Provisions module fixtures with a Terraform-compatible CLI, then checks the
//! module outputs and the live Compute Engine resources against expectations.

pub mod assertions;
pub mod cli;
pub mod compute;
pub mod config;
pub mod harness;
pub mod naming;
pub mod scenarios;
pub mod terraform;

mod error;

pub use compute::{ComputeClient, ComputeError};
pub use config::HarnessConfig;
pub use error::HarnessError;
pub use harness::{Harness, ScenarioResult, render_summary};
pub use scenarios::{Scenario, ScenarioContext, all_scenarios, get_scenario};
pub use terraform::{
    Lifecycle, Outputs, ProcessExecutor, ResetFailure, TfVars, ToolError, ToolExecutor,
};
