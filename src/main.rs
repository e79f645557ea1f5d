use std::process::ExitCode;

use loco_translate::cli::{CliArgs, build_command};
use loco_translate::{Credentials, Endpoints, Orchestrator, SyncResult};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

fn init_tracing(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("loco_translate={level},warn")));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

async fn run(args: CliArgs) -> SyncResult<()> {
    let credentials = Credentials::from_env()?;
    let endpoints = Endpoints::from_env();

    let orchestrator = Orchestrator::from_config(&credentials, &endpoints, args.options)?
        .with_plural_table(args.plurals);
    let summary = orchestrator.run().await?;

    if summary.dry_run {
        info!(
            "dry run: {} of {} assets would be translated",
            summary.selected, summary.examined
        );
    }
    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    let matches = build_command().get_matches();
    let args = match CliArgs::from_matches(&matches) {
        Ok(args) => args,
        Err(e) => {
            init_tracing(false);
            error!("{}", e);
            return ExitCode::FAILURE;
        }
    };
    init_tracing(args.verbose);

    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}
