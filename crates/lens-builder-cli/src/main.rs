/*
[INPUT]:  CLI arguments, optional settings file, WALLET_PRIVATE_KEY
[OUTPUT]: Executed builder command and a process exit code
[POS]:    Binary entry point
[UPDATE]: When changing CLI flags, startup flow, or exit code mapping
*/

use std::process::ExitCode;

use anyhow::{Context, Result, anyhow};
use clap::Parser;
use console::style;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use lens_builder_cli::{Cli, CommandContext, Settings, commands, exit_status_for};

#[tokio::main]
async fn main() -> ExitCode {
    let args = Cli::parse();
    if let Err(err) = init_tracing(&args.log_level) {
        eprintln!("{} {err:#}", style("error:").red().bold());
        return ExitCode::from(2);
    }

    let status = match run(args).await {
        Ok(status) => status,
        Err(err) => {
            error!(error = %format!("{err:#}"), "command failed");
            eprintln!("{} {err:#}", style("error:").red().bold());
            exit_status_for(&err)
        }
    };
    info!(code = status.code(), ?status, "finished");
    ExitCode::from(status.code())
}

async fn run(args: Cli) -> Result<lens_builder_adapter::ExitStatus> {
    let settings = Settings::load(args.settings.as_deref()).context("load settings")?;
    let ctx = CommandContext::new(settings, args.environment);
    commands::run(args.command, &ctx).await
}

fn init_tracing(log_level: &str) -> Result<()> {
    let filter = EnvFilter::try_new(log_level).context("invalid log level")?;
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|err| anyhow!(err))
        .context("initialize tracing subscriber")?;
    Ok(())
}
