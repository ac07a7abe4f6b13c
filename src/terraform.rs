//! Orchestration of a Terraform-compatible CLI (`tofu` by default).
//!
//! The [`Lifecycle`] runner drives one fixture through
//! select → init → plan → apply → drift check → output → body → destroy → reset.

mod command;
mod error;
mod lifecycle;
mod output;
mod vars;

pub use command::{DEFAULT_TF_COMMAND, ProcessExecutor, ToolExecutor, ToolOutput};
pub use error::{ResetFailure, ToolError};
pub use lifecycle::{Lifecycle, Phase};
pub use output::{NetworkOutputs, Outputs, SubnetByName, SubnetByRegion};
pub use vars::TfVars;
