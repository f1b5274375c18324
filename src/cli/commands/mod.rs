//! CLI commands implementation.
//!
//! This module contains the CLI parser and dispatches to command-specific modules.

mod analyze;
mod config_cmd;
mod flow;
mod serve;
mod status;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::config::{load_settings_with_options, LoadOptions};
use crate::llm::LlmProvider;

#[derive(Parser)]
#[command(name = "genuinai")]
#[command(about = "Summarize text, detect bias and extract insights with a language model")]
#[command(version)]
pub struct Cli {
    /// Config file path (overrides auto-discovery)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Model provider (gemini, openai, ollama)
    #[arg(long, global = true, value_parser = parse_provider)]
    provider: Option<LlmProvider>,

    /// Model name (overrides config and LLM_MODEL)
    #[arg(long, global = true)]
    model: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

fn parse_provider(s: &str) -> Result<LlmProvider, String> {
    LlmProvider::parse(s).ok_or_else(|| format!("unknown provider '{}'", s))
}

/// Check if verbose mode is enabled (for early logging setup).
pub fn is_verbose() -> bool {
    std::env::args().any(|arg| arg == "-v" || arg == "--verbose")
}

#[derive(Subcommand)]
enum Commands {
    /// Start the web interface
    Serve {
        /// Address to bind: port, host, or host:port
        #[arg(short, long)]
        bind: Option<String>,
    },

    /// Summarize, detect bias and analyze a text (all three flows)
    Analyze {
        /// Plain-text file to analyze ('-' reads stdin)
        file: Option<PathBuf>,
        /// Analyze this text instead of a file
        #[arg(long, short)]
        text: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Run a single flow and print its JSON output
    Flow {
        /// Flow name: summarize, detect-bias or analyze
        name: String,
        /// Plain-text file to use as input ('-' reads stdin)
        file: Option<PathBuf>,
        /// Use this text instead of a file
        #[arg(long, short)]
        text: Option<String>,
    },

    /// Show provider configuration and reachability
    Status {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Configuration management
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(Subcommand)]
enum ConfigCommands {
    /// Print the effective configuration (API keys are never shown)
    Show,
}

/// Parse arguments, load configuration and run the selected command.
pub async fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // CLI flags override config and environment
    let options = LoadOptions {
        config_path: cli.config,
        provider: cli.provider,
        model: cli.model,
    };
    let (settings, config) = load_settings_with_options(options).await?;

    match cli.command {
        Commands::Serve { bind } => {
            let bind = bind.unwrap_or_else(|| settings.bind.clone());
            serve::cmd_serve(&settings, &bind).await
        }
        Commands::Analyze { file, text, json } => {
            analyze::cmd_analyze(&settings, file.as_deref(), text, json).await
        }
        Commands::Flow { name, file, text } => {
            flow::cmd_flow(&settings, &name, file.as_deref(), text).await
        }
        Commands::Status { json } => status::cmd_status(&settings, json).await,
        Commands::Config { command } => match command {
            ConfigCommands::Show => config_cmd::cmd_config_show(&settings, &config),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_analyze() {
        let cli = Cli::try_parse_from(["genuinai", "analyze", "--json", "article.txt"]).unwrap();
        match cli.command {
            Commands::Analyze { file, text, json } => {
                assert_eq!(file, Some(PathBuf::from("article.txt")));
                assert!(text.is_none());
                assert!(json);
            }
            _ => panic!("expected analyze"),
        }
    }

    #[test]
    fn test_parse_global_provider() {
        let cli = Cli::try_parse_from(["genuinai", "status", "--provider", "ollama", "-v"]).unwrap();
        assert_eq!(cli.provider, Some(LlmProvider::Ollama));
        assert!(cli.verbose);

        assert!(Cli::try_parse_from(["genuinai", "status", "--provider", "nope"]).is_err());
    }
}
