//! GenuinAI - text summarization, bias detection and insight extraction.
//!
//! Three prompt flows run against a generative model: `summarize`,
//! `detect-bias` and `analyze`. The [`analysis::Analyzer`] fans a text out
//! to all three concurrently and joins the results; the web UI and CLI are
//! thin presenters over it.

pub mod analysis;
pub mod cli;
pub mod config;
pub mod flows;
pub mod llm;
pub mod server;
pub mod utils;
