//! CLI command implementations

use anyhow::{Context, Result};
use std::io::Read;
use std::path::Path;
use std::sync::Arc;

use crate::cli::args::{ConfigCommand, TranscriptSource};
use crate::config::Settings;
use crate::llm::{build_prompt, build_provider};
use crate::pipeline::{SummarizeRequest, SummaryService};
use crate::transcript::{extract, UploadedFile};

const REDACTED: &str = "<redacted>";

/// Run the HTTP API until interrupted
pub async fn serve(settings: &Settings, host: Option<String>, port: Option<u16>) -> Result<()> {
    let mut settings = settings.clone();
    if let Some(host) = host {
        settings.server.host = host;
    }
    if let Some(port) = port {
        settings.server.port = port;
    }

    crate::server::start_server(&settings).await
}

/// Summarize a transcript through the same pipeline the server uses.
pub async fn summarize(settings: &Settings, source: TranscriptSource) -> Result<()> {
    settings.validate()?;
    let provider = build_provider(settings)?;
    let service = SummaryService::new(Arc::from(provider));

    let request = read_source(&source)?;
    match service.handle(request).await {
        Ok(summary) => {
            println!("{}", summary.markdown);
            Ok(())
        }
        Err(e) => anyhow::bail!("{}", e.message),
    }
}

/// Print the prompt for a transcript without contacting the LLM.
pub fn print_prompt(source: TranscriptSource) -> Result<()> {
    let input = read_source(&source)?.into_input()?;
    let transcript = extract(&input)?;
    print!("{}", build_prompt(&transcript.text));
    Ok(())
}

/// Handle config subcommands
pub fn config_command(settings: &Settings, cmd: ConfigCommand) -> Result<()> {
    match cmd {
        ConfigCommand::Show => {
            let toml = toml::to_string_pretty(&redacted(settings))?;
            println!("{}", toml);
        }
        ConfigCommand::Path => {
            let path = Settings::config_path()?;
            println!("{}", path.display());
        }
        ConfigCommand::Init { force } => {
            let path = Settings::config_path()?;
            if path.exists() && !force {
                anyhow::bail!(
                    "Config file already exists at {}. Use --force to overwrite.",
                    path.display()
                );
            }
            Settings::write_default(&path)?;
            println!("Configuration initialized at: {}", path.display());
        }
    }

    Ok(())
}

// Helper functions

fn read_source(source: &TranscriptSource) -> Result<SummarizeRequest> {
    if let Some(text) = &source.text {
        return Ok(SummarizeRequest::from_text(text.clone()));
    }

    let path = source
        .path
        .as_deref()
        .context("Provide a transcript path or --text")?;

    if path == Path::new("-") {
        let mut text = String::new();
        std::io::stdin()
            .read_to_string(&mut text)
            .context("Failed to read transcript from stdin")?;
        return Ok(SummarizeRequest::from_text(text));
    }

    let bytes = std::fs::read(path)
        .with_context(|| format!("Failed to read transcript file: {}", path.display()))?;
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    Ok(SummarizeRequest::from_file(UploadedFile {
        bytes,
        name,
        mime_type: source.mime.clone().unwrap_or_default(),
    }))
}

fn redacted(settings: &Settings) -> Settings {
    let mut settings = settings.clone();
    if !settings.llm.api_key.is_empty() {
        settings.llm.api_key = REDACTED.to_string();
    }
    settings
}
