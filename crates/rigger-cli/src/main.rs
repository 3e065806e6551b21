//! Rigger CLI - pull a Helm chart, render it and overlay it with kustomize

use clap::{Parser, Subcommand};
use console::style;
use rigger_lifecycle::InitSource;
use std::path::PathBuf;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

mod commands;
mod config;
mod error;
mod exit_codes;

use config::{ConfigFile, Overrides, Settings};
use error::{CliError, Result};

#[derive(Parser)]
#[command(name = "rigger")]
#[command(author = "Rigger Contributors")]
#[command(version)]
#[command(about = "Pull a Helm chart, render it and overlay it with kustomize", long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable debug output
    #[arg(long, global = true, env = "RIGGER_DEBUG")]
    debug: bool,

    /// Workspace directory holding .rigger/, base/ and overlays/
    #[arg(long, global = true, env = "RIGGER_WORKSPACE")]
    workspace: Option<PathBuf>,

    /// Helm executable
    #[arg(long, global = true, env = "RIGGER_HELM_BINARY")]
    helm_binary: Option<PathBuf>,

    /// Kustomize executable
    #[arg(long, global = true, env = "RIGGER_KUSTOMIZE_BINARY")]
    kustomize_binary: Option<PathBuf>,

    /// Config file (default: <config dir>/rigger/config.yaml)
    #[arg(long, global = true, env = "RIGGER_CONFIG")]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start a workspace from a chart or pre-rendered manifests
    Init {
        /// Chart reference: http(s) URL to a .tgz, local archive or chart directory
        #[arg(
            long,
            env = "RIGGER_CHART",
            conflicts_with = "raw",
            required_unless_present = "raw"
        )]
        chart: Option<String>,

        /// Directory of pre-rendered manifests to overlay
        #[arg(long, env = "RIGGER_RAW")]
        raw: Option<PathBuf>,
    },

    /// Re-render the recorded chart
    Update,

    /// Wait until the upstream chart changes
    Watch {
        /// Polling interval, e.g. `30s` or `5m`
        #[arg(long, env = "RIGGER_WATCH_INTERVAL", value_parser = humantime::parse_duration)]
        interval: Option<Duration>,
    },
}

#[tokio::main]
async fn main() {
    miette::set_panic_hook();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            let code = if err.use_stderr() {
                exit_codes::USAGE_ERROR
            } else {
                exit_codes::SUCCESS
            };
            let _ = err.print();
            std::process::exit(code);
        }
    };

    init_tracing(cli.debug);

    match run(cli).await {
        Ok(()) => std::process::exit(exit_codes::SUCCESS),
        Err(CliError::ShouldUseUpdate) => {
            eprintln!(
                "{} Existing workspace kept. Run {} to refresh it.",
                style("⚠").yellow().bold(),
                style("rigger update").cyan()
            );
            std::process::exit(exit_codes::SHOULD_USE_UPDATE);
        }
        Err(err) => {
            let code = err.exit_code();
            eprintln!("{:?}", miette::Report::new(err));
            std::process::exit(code);
        }
    }
}

fn init_tracing(debug: bool) {
    let filter = if debug {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();
}

async fn run(cli: Cli) -> Result<()> {
    let file = ConfigFile::load(cli.config.as_deref())?;
    let interval = match &cli.command {
        Commands::Watch { interval } => *interval,
        _ => None,
    };
    let settings = Settings::resolve(
        Overrides {
            workspace: cli.workspace,
            helm_binary: cli.helm_binary,
            kustomize_binary: cli.kustomize_binary,
            watch_interval: interval,
        },
        file,
    )?;
    tracing::debug!(workspace = %settings.workspace.display(), "resolved settings");

    match cli.command {
        Commands::Init { chart, raw } => {
            let source = match (chart, raw) {
                (_, Some(raw)) => InitSource::Raw(raw),
                (Some(chart), None) => InitSource::Chart(chart),
                (None, None) => return Err(CliError::usage("One of --chart or --raw is required")),
            };
            commands::init::run(&settings, source).await
        }
        Commands::Update => commands::update::run(&settings).await,
        Commands::Watch { .. } => commands::watch::run(&settings).await,
    }
}
