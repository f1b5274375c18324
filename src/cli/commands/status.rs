//! Status command.

use console::style;

use crate::cli::helpers::provider;
use crate::cli::icons::Icon;
use crate::config::Settings;

/// Show provider settings and whether the endpoint answers.
pub async fn cmd_status(settings: &Settings, json: bool) -> anyhow::Result<()> {
    let llm = &settings.llm;
    let has_key = llm.api_key.is_some();
    let available = match provider(settings) {
        Ok(p) => p.is_available().await,
        Err(e) => {
            tracing::debug!("Provider unavailable: {}", e);
            false
        }
    };

    if json {
        let status = serde_json::json!({
            "version": env!("CARGO_PKG_VERSION"),
            "enabled": llm.enabled,
            "provider": llm.provider.as_str(),
            "endpoint": llm.endpoint(),
            "model": llm.model(),
            "api_key_set": has_key,
            "available": available,
            "bind": settings.bind,
        });
        println!("{}", serde_json::to_string_pretty(&status)?);
        return Ok(());
    }

    println!("\n{}", style("GenuinAI Status").bold());
    println!("  {} Provider: {}", Icon::Detail, llm.provider);
    println!("  {} Endpoint: {}", Icon::Detail, llm.endpoint());
    println!("  {} Model:    {}", Icon::Detail, llm.model());

    if llm.provider.requires_api_key() {
        if has_key {
            println!("  {} API key set", Icon::Ok);
        } else {
            println!("  {} No API key (set LLM_API_KEY)", Icon::Warn);
        }
    }

    if !llm.enabled {
        println!("  {} Model calls disabled (LLM_ENABLED=false)", Icon::Warn);
    } else if available {
        println!("  {} Provider reachable", Icon::Ok);
    } else {
        println!("  {} Provider not reachable", Icon::Fail);
    }

    Ok(())
}
