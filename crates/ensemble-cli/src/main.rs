//! Ensemble CLI entry point.

use std::sync::Arc;

use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::{fmt, EnvFilter};

use ensemble_assistants::OpenAiClient;
use ensemble_cli::{Cli, Result, RustylineConsole};
use ensemble_orchestrator::SessionController;

fn main() {
    // Load .env.local before clap reads env fallbacks (OPENAI_API_KEY etc.)
    ensemble_core::load_env();

    let cli = Cli::parse();

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(cli.log_level().to_string()));

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run(&cli) {
        error!(error = %e, "Ensemble stopped");
        eprintln!("Error: {}", e);
        if e.is_fatal() {
            std::process::exit(1);
        }
    }
}

fn run(cli: &Cli) -> Result<()> {
    let mut client = OpenAiClient::from_env()?;
    if let Some(base_url) = &cli.api_base {
        client = client.with_base_url(base_url);
    }
    info!(base_url = client.base_url(), allow_list = %cli.allow_list.display(), "Starting");

    let controller = SessionController::new(Arc::new(client), &cli.allow_list)
        .with_poll_policy(cli.poll_policy());

    let runtime = tokio::runtime::Runtime::new()?;
    let mut console = RustylineConsole::new(Some(ensemble_core::history_file()))?;
    runtime.block_on(controller.run(&mut console))?;
    Ok(())
}
