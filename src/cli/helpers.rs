//! Shared helper functions for CLI commands.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use tokio::io::{AsyncRead, AsyncReadExt};

use crate::analysis::{read_text, UploadedFile};
use crate::config::Settings;
use crate::llm::{LlmClient, ModelProvider};

/// Resolve the input text from `--text`, a file, or stdin (`-`).
///
/// Files go through the same plain-text check as web uploads.
pub async fn input_text(file: Option<&Path>, text: Option<String>) -> anyhow::Result<String> {
    if let Some(text) = text {
        return Ok(text);
    }

    match file {
        Some(path) if path == Path::new("-") => Ok(read_all(tokio::io::stdin()).await?),
        Some(path) => {
            let file = UploadedFile::from_path(path)
                .await
                .map_err(|e| anyhow::anyhow!("Failed to read {}: {}", path.display(), e))?;
            Ok(read_text(&file)?)
        }
        None => anyhow::bail!("No input. Pass a FILE, '-' for stdin, or --text."),
    }
}

/// Read a whole stream as UTF-8 text without blocking the runtime.
async fn read_all<R: AsyncRead + Unpin>(mut reader: R) -> std::io::Result<String> {
    let mut buf = String::new();
    reader.read_to_string(&mut buf).await?;
    Ok(buf)
}

/// Build the configured model provider.
pub fn provider(settings: &Settings) -> anyhow::Result<Arc<dyn ModelProvider>> {
    Ok(Arc::new(LlmClient::new(settings.llm.clone())?))
}

/// Spinner shown on stderr while model calls are in flight.
pub fn spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.cyan} {msg}") {
        pb.set_style(style);
    }
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}
