//! Analyze command: run all three flows on a text.

use std::path::Path;

use console::style;

use crate::analysis::{AggregateResult, AnalysisSession, Analyzer, Notifier};
use crate::cli::helpers::{input_text, provider, spinner};
use crate::cli::icons::Icon;
use crate::config::Settings;

/// Analyze a file or inline text and print the results.
pub async fn cmd_analyze(
    settings: &Settings,
    file: Option<&Path>,
    text: Option<String>,
    json: bool,
) -> anyhow::Result<()> {
    let text = input_text(file, text).await?;
    let analyzer = Analyzer::new(provider(settings)?);

    let (notifier, mut notifications) = Notifier::channel();
    let mut session = AnalysisSession::new(notifier).with_text(text);

    let pb = spinner("Analyzing text (summary, bias, insights)...");
    let outcome = session.analyze(&analyzer).await;
    pb.finish_and_clear();

    for note in notifications.drain() {
        let icon = Icon::for_notification(&note);
        eprintln!("{} {}: {}", icon, style(&note.title).bold(), note.description);
    }

    let result = outcome?;
    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        print_result(&result);
    }
    Ok(())
}

fn print_result(result: &AggregateResult) {
    println!("\n{}", style("Summary").bold().cyan());
    println!("{}", result.summary.summary.trim());

    println!("\n{}", style("Bias Detection").bold().cyan());
    if result.bias_detected() {
        println!("{} {}", Icon::Warn, style("Potential Bias Detected").yellow());
    } else {
        println!("{} {}", Icon::Ok, style("No Bias Detected").green());
    }
    for paragraph in &result.explanation.preamble {
        println!("{}", paragraph);
    }
    for section in &result.explanation.sections {
        println!("{} {}", Icon::Bullet, style(&section.title).bold());
        for paragraph in &section.paragraphs {
            println!("  {}", paragraph);
        }
    }
    for paragraph in &result.explanation.conclusion {
        println!("\n{}", paragraph);
    }

    println!("\n{}", style("Insights").bold().cyan());
    println!("{}", result.insights.analysis.trim());
}
