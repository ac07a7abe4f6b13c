use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use color_eyre::eyre::Result;
use tracing::error;
use tracing_subscriber::EnvFilter;

use mrpn_harness::cli::{Cli, Command, RunArgs, VarsArgs};
use mrpn_harness::compute::resolve_access_token;
use mrpn_harness::config::validate_fixture_dir;
use mrpn_harness::{
    ComputeClient, Harness, HarnessConfig, ProcessExecutor, all_scenarios, get_scenario,
    render_summary,
};

#[tokio::main]
async fn main() -> Result<ExitCode> {
    color_eyre::install()?;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::List => {
            for scenario in all_scenarios() {
                println!("{:<14} {}", scenario.name(), scenario.description());
            }
            Ok(ExitCode::SUCCESS)
        }
        Command::Vars(args) => print_vars(args),
        Command::Run(args) => run(args).await,
    }
}

fn env_lookup(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

fn print_vars(args: VarsArgs) -> Result<ExitCode> {
    let scenario = get_scenario(&args.scenario)?;
    let config = HarnessConfig::resolve(args.settings.into(), env_lookup)?;
    let tfvars = scenario.tfvars(&config.scenario_context())?;
    println!("{}", serde_json::to_string_pretty(&tfvars)?);
    Ok(ExitCode::SUCCESS)
}

async fn run(args: RunArgs) -> Result<ExitCode> {
    let scenarios = if args.scenarios.is_empty() {
        all_scenarios()
    } else {
        args.scenarios
            .iter()
            .map(|name| get_scenario(name))
            .collect::<Result<Vec<_>, _>>()?
    };

    let config = HarnessConfig::resolve(args.raw_settings(), env_lookup)?;
    let fixture_dir = validate_fixture_dir(&args.fixture_dir)?;
    let client = ComputeClient::new(resolve_access_token()?)?;
    let executor = Arc::new(ProcessExecutor::new(config.tf_command.as_str()));

    let harness = Harness::new(config, fixture_dir, executor, client);
    let results = harness.run_all(&scenarios).await;
    println!("{}", render_summary(&results));

    let failed = results.iter().filter(|r| !r.passed()).count();
    if failed > 0 {
        error!(failed, total = results.len(), "scenarios failed");
        return Ok(ExitCode::FAILURE);
    }
    Ok(ExitCode::SUCCESS)
}
