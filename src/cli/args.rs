//! CLI argument definitions using clap

use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

/// meeting-digest - Structured Markdown summaries of meeting transcripts
#[derive(Parser, Debug)]
#[command(name = "meeting-digest")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the HTTP API (POST /api/summarize)
    Serve {
        /// Address to bind (overrides server.host)
        #[arg(long)]
        host: Option<String>,

        /// Port to bind (overrides server.port and PORT)
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Summarize a transcript once and print the Markdown
    Summarize(TranscriptSource),

    /// Print the exact prompt that would be sent, without calling the LLM
    Prompt(TranscriptSource),

    /// Configuration management
    #[command(subcommand)]
    Config(ConfigCommand),

    /// Generate shell completion scripts
    Completions {
        /// Target shell
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Where the transcript comes from
#[derive(Args, Debug, Clone)]
pub struct TranscriptSource {
    /// Transcript file (.txt or .pdf), or `-` for stdin
    #[arg(conflicts_with = "text", required_unless_present = "text")]
    pub path: Option<PathBuf>,

    /// Transcript text given inline
    #[arg(short, long)]
    pub text: Option<String>,

    /// Declared MIME type of the file (defaults to suffix detection)
    #[arg(long, requires = "path")]
    pub mime: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Show current configuration
    Show,

    /// Show configuration file path
    Path,

    /// Initialize default configuration
    Init {
        /// Force overwrite existing config
        #[arg(short, long)]
        force: bool,
    },
}
