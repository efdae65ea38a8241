use std::process::ExitCode;

use anyhow::Context as _;
use clap::Parser as _;

#[tokio::main]
async fn main() -> ExitCode {
    if let Err(err) = try_main().await {
        eprintln!("{err:#}");
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}

async fn try_main() -> anyhow::Result<()> {
    fillerskip::logging::init().context("init logging")?;

    let cli = fillerskip::cli::Cli::parse();
    tracing::debug!(?cli, "parsed cli");

    match cli.command {
        fillerskip::cli::Command::Check(args) => {
            fillerskip::check::run(args).await.context("check")?;
        }
        fillerskip::cli::Command::Resolve(args) => {
            fillerskip::resolve::run(args).await.context("resolve")?;
        }
        fillerskip::cli::Command::Cache {
            command: fillerskip::cli::CacheCommand::Clear(args),
        } => {
            fillerskip::store::run_clear(args).await.context("cache clear")?;
        }
    }

    Ok(())
}
