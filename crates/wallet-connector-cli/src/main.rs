/*
[INPUT]:  CLI arguments, YAML configuration file
[OUTPUT]: Connector commands executed against the embedded wallet service
[POS]:    Binary entry point
[UPDATE]: When changing CLI flags, startup flow, or logging setup
*/

mod cli;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use clap::Parser;
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

use cli::Command;
use wallet_connector_cli::CliConfig;
use wallet_connector_cli::config::default_config_path;

#[derive(Parser, Debug)]
#[command(name = "wallet-connector", version, about = "Embedded wallet connector")]
struct Cli {
    /// Configuration file (defaults to <data_dir>/wallet-connector/config.yaml)
    #[arg(long = "config", value_name = "PATH", global = true)]
    config_path: Option<PathBuf>,
    #[arg(long = "log-level", value_name = "LEVEL", default_value = "info", global = true)]
    log_level: String,
    /// Write logs to this file instead of stderr
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    log_file: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Cli::parse();
    let _log_guard = init_tracing(&args.log_level, args.log_file.as_deref())?;

    let config_path = match args.config_path {
        Some(path) => path,
        None => default_config_path()?,
    };

    if let Command::Init { output } = args.command {
        let output = output.unwrap_or(config_path);
        return cli::init::run_init(&output);
    }

    let config = CliConfig::from_file(&config_path).context("load config")?;
    info!(
        config_path = %config_path.display(),
        client_id = %config.client_id,
        active_chain = config.active_chain,
        "configuration loaded"
    );

    cli::commands::run(args.command, config, &config_path).await
}

fn init_tracing(log_level: &str, log_file: Option<&Path>) -> Result<Option<WorkerGuard>> {
    let filter = EnvFilter::try_new(log_level).context("invalid log level")?;

    let Some(path) = log_file else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .try_init()
            .map_err(|err| anyhow!(err))
            .context("initialize tracing subscriber")?;
        return Ok(None);
    };

    let file_name = path
        .file_name()
        .context("log file path must name a file")?;
    let dir = path
        .parent()
        .filter(|dir| !dir.as_os_str().is_empty())
        .unwrap_or(Path::new("."));
    let (writer, guard) = tracing_appender::non_blocking(tracing_appender::rolling::never(dir, file_name));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(false)
        .try_init()
        .map_err(|err| anyhow!(err))
        .context("initialize tracing subscriber")?;
    Ok(Some(guard))
}
