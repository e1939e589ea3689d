//! calendar-mcp entry point.

use std::process::ExitCode;

use clap::Parser;
use tracing::{debug, error, warn};

use calendar_mcp_core::init_tracing;
use calendar_mcp_server::cli::Cli;
use calendar_mcp_server::serve_stdio;

#[tokio::main]
async fn main() -> ExitCode {
    // Load .env before parsing so it can supply env-backed flags
    let dotenv = dotenvy::dotenv();
    let cli = Cli::parse();

    if let Err(e) = init_tracing(cli.tracing_config()) {
        eprintln!("error: {}", e);
        return ExitCode::FAILURE;
    }

    match dotenv {
        Ok(path) => debug!(path = %path.display(), "loaded environment file"),
        Err(e) if e.not_found() => {}
        Err(e) => warn!(error = %e, "failed to load .env"),
    }

    match serve_stdio(cli.server_config()).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "calendar-mcp exited with an error");
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}
