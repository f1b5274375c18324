//! Flow command: run one flow and print its output record.

use std::path::Path;

use crate::cli::helpers::{input_text, provider, spinner};
use crate::config::Settings;
use crate::flows::FlowKind;

/// Run the named flow on a file or inline text.
pub async fn cmd_flow(
    settings: &Settings,
    name: &str,
    file: Option<&Path>,
    text: Option<String>,
) -> anyhow::Result<()> {
    let kind = FlowKind::from_name(name).ok_or_else(|| {
        let known: Vec<_> = FlowKind::ALL.iter().map(|f| f.name()).collect();
        anyhow::anyhow!("Unknown flow '{}'. Available: {}", name, known.join(", "))
    })?;

    let text = input_text(file, text).await?;
    if text.trim().is_empty() {
        anyhow::bail!("Input required: enter some text to analyze");
    }
    let provider = provider(settings)?;

    let pb = spinner(&format!("Running {}...", kind));
    let outcome = kind.run_json(provider.as_ref(), kind.input_for_text(&text)).await;
    pb.finish_and_clear();

    println!("{}", serde_json::to_string_pretty(&outcome?)?);
    Ok(())
}
