//! Command-line interface for GenuinAI.

mod commands;
pub mod helpers;
pub mod icons;

pub use commands::{is_verbose, run};
