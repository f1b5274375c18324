//! Configuration management commands.

use console::style;

use crate::cli::icons::Icon;
use crate::config::{Config, ServerConfig, Settings};

/// Print the effective configuration as TOML.
pub fn cmd_config_show(settings: &Settings, config: &Config) -> anyhow::Result<()> {
    match config.source_path {
        Some(ref path) => eprintln!("{} Config file: {}", Icon::Info, path.display()),
        None => eprintln!("{} No config file found, using defaults", Icon::Info),
    }
    eprintln!(
        "  {} {}",
        Icon::Detail,
        style("Environment and command-line overrides applied").dim()
    );

    let effective = Config {
        server: ServerConfig {
            bind: Some(settings.bind.clone()),
            max_upload_bytes: Some(settings.max_upload_bytes),
        },
        llm: settings.llm.clone(),
        source_path: None,
    };
    println!("{}", effective.to_toml()?);
    Ok(())
}
