//! meeting-digest - Structured Markdown summaries of meeting transcripts
//!
//! Entry point for the meeting-digest CLI and HTTP server.

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use meeting_digest::cli::{Cli, Commands};
use meeting_digest::config::Settings;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();

    if let Commands::Completions { shell } = cli.command {
        meeting_digest::cli::completions::print(shell);
        return Ok(());
    }

    // Settings load may warn (bad PORT and the like); route that through a
    // scoped stderr logger since the configured level is not known yet.
    let settings = tracing::subscriber::with_default(stderr_logger("warn"), Settings::load)?;

    // Initialize logging
    let default_level = if cli.verbose {
        "debug"
    } else {
        settings.general.log_level.as_str()
    };
    stderr_logger(default_level).init();

    // Execute command
    match cli.command {
        Commands::Serve { host, port } => {
            meeting_digest::cli::commands::serve(&settings, host, port).await?;
        }
        Commands::Summarize(source) => {
            meeting_digest::cli::commands::summarize(&settings, source).await?;
        }
        Commands::Prompt(source) => {
            meeting_digest::cli::commands::print_prompt(source)?;
        }
        Commands::Config(config_cmd) => {
            meeting_digest::cli::commands::config_command(&settings, config_cmd)?;
        }
        Commands::Completions { .. } => unreachable!(),
    }

    Ok(())
}

/// stderr formatter filtered by `RUST_LOG`, falling back to `default_level`.
fn stderr_logger(default_level: &str) -> impl tracing::Subscriber + Send + Sync + 'static {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
}
