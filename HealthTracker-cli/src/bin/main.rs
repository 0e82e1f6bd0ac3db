use std::process::ExitCode;

use tracing::{error, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use health_tracker_cli::{run, Invocation, USAGE};
use health_tracker_data::ClientConfig;

/// Entry point of the `health-tracker` command
///
/// Loads the client configuration (including a `.env` file), runs one
/// command against the backend and prints the result as JSON on stdout.
/// Logs go to stderr.
#[tokio::main]
async fn main() -> ExitCode {
    // Initialize tracing for structured logging
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(env_filter)
        .init();

    let invocation = match Invocation::parse(std::env::args().skip(1)) {
        Ok(invocation) => invocation,
        Err(e) => {
            eprintln!("{}\n\n{}", e, USAGE);
            return ExitCode::from(2);
        }
    };

    let config = match ClientConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("Invalid configuration: {}", e);
            return ExitCode::FAILURE;
        }
    };

    match run(&config, &invocation).await {
        Ok(output) => match serde_json::to_string_pretty(&output) {
            Ok(text) => {
                println!("{}", text);
                info!("Done");
                ExitCode::SUCCESS
            }
            Err(e) => {
                error!("Failed to format output: {}", e);
                ExitCode::FAILURE
            }
        },
        Err(e) => {
            error!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}
