use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::config::RawSettings;

#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Provision, verify and tear down scenarios (all of them when none are named)
    Run(RunArgs),
    /// List the available scenarios
    List,
    /// Print the variable set a scenario would apply
    Vars(VarsArgs),
}

/// Settings shared by every command that builds module inputs.
#[derive(clap::Args, Debug, Clone, Default)]
pub struct SettingsArgs {
    /// Prefix for every resource and workspace name
    #[arg(long, env = "TEST_PREFIX")]
    pub prefix: Option<String>,

    /// Project to deploy into
    #[arg(long, env = "TEST_GOOGLE_CLOUD_PROJECT")]
    pub project: Option<String>,

    /// Extra resource labels as key:value,key:value
    #[arg(long, env = "TEST_GOOGLE_LABELS")]
    pub labels: Option<String>,
}

#[derive(clap::Args, Debug)]
pub struct RunArgs {
    pub scenarios: Vec<String>,

    /// Root module fixture directory
    #[arg(long, default_value = "tests/fixtures/root")]
    pub fixture_dir: PathBuf,

    #[command(flatten)]
    pub settings: SettingsArgs,

    /// Terraform-compatible binary to run
    #[arg(long, env = "TEST_TF_COMMAND")]
    pub tf_command: Option<String>,

    /// Leave resources in place after successful verification
    #[arg(
        long,
        env = "TEST_SKIP_DESTROY_PHASE",
        num_args = 0..=1,
        require_equals = true,
        default_missing_value = "true"
    )]
    pub skip_destroy: Option<String>,
}

#[derive(clap::Args, Debug)]
pub struct VarsArgs {
    pub scenario: String,

    #[command(flatten)]
    pub settings: SettingsArgs,
}

impl From<SettingsArgs> for RawSettings {
    fn from(args: SettingsArgs) -> Self {
        RawSettings {
            prefix: args.prefix,
            project: args.project,
            labels: args.labels,
            ..RawSettings::default()
        }
    }
}

impl RunArgs {
    pub fn raw_settings(&self) -> RawSettings {
        RawSettings {
            tf_command: self.tf_command.clone(),
            skip_destroy: self.skip_destroy.clone(),
            ..self.settings.clone().into()
        }
    }
}
