use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing::{error, info};

use deployer_client::{LocalArtifacts, RestClient};
use deployer_rollout::{Operator, RolloutError};

mod commands;
mod settings;

use commands::deploy::DeployArgs;
use commands::list::ListArgs;
use commands::terminate::TerminateArgs;
use commands::update::UpdateArgs;
use settings::Settings;

#[derive(Parser)]
#[command(
    name = "flink-deployer",
    about = "Deploy and update long-running Flink jobs through savepoints",
    version,
    propagate_version = true,
)]
struct Cli {
    /// Path to a deployer.toml
    #[arg(long, global = true, env = "FLINK_DEPLOYER_CONFIG")]
    config: Option<PathBuf>,

    /// Base URL of the cluster's REST API
    #[arg(long, global = true, env = "FLINK_BASE_URL")]
    base_url: Option<String>,

    /// Token sent as a bearer credential on every request
    #[arg(long, global = true, env = "FLINK_API_TOKEN", hide_env_values = true)]
    api_token: Option<String>,

    /// Log every request and poll attempt
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Upload (or reuse) an artifact and start it, optionally from a savepoint
    Deploy(DeployArgs),
    /// Savepoint the running job, cancel it, and start the new artifact from
    /// the savepoint.
    ///
    /// If the final deploy fails the old job stays cancelled; redeploy from
    /// the logged savepoint with `deploy --savepoint-path`.
    Update(UpdateArgs),
    /// Cancel the running instance of a job without a savepoint
    Terminate(TerminateArgs),
    /// List the cluster's jobs
    List(ListArgs),
}

fn init_tracing(verbose: bool) {
    let default = if verbose {
        "flink_deployer=debug,deployer_rollout=debug,deployer_client=debug"
    } else {
        "flink_deployer=info,deployer_rollout=info,deployer_client=info"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default)),
        )
        .with_writer(std::io::stderr)
        .init();
}

/// 2 for invocation mistakes (same as clap usage errors), 1 otherwise.
fn exit_code(err: &anyhow::Error) -> u8 {
    match err.downcast_ref::<RolloutError>() {
        Some(rollout) if rollout.is_configuration() => 2,
        _ => 1,
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{err:#}");
            ExitCode::from(exit_code(&err))
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let settings = Settings::resolve(
        cli.config.as_deref(),
        cli.base_url.clone(),
        cli.api_token.clone(),
    )?;
    info!(url = %settings.base_url, "using control plane");

    let client = RestClient::new(
        &settings.base_url,
        settings.api_token.clone(),
        settings.config.request_timeout(),
    )?;
    let artifacts = LocalArtifacts;

    match cli.command {
        Commands::Deploy(args) => {
            let operator = Operator::new(&client, &artifacts);
            commands::deploy::deploy(&operator, args).await
        }
        Commands::Update(args) => {
            let policy = settings.savepoint_backoff(args.savepoint_wait_secs);
            let operator = Operator::new(&client, &artifacts).with_savepoint_backoff(policy);
            commands::update::update(&operator, &settings, args).await
        }
        Commands::Terminate(args) => {
            let operator = Operator::new(&client, &artifacts);
            commands::terminate::terminate(&operator, args).await
        }
        Commands::List(args) => commands::list::list(&client, args).await,
    }
}
