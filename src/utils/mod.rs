//! Shared utility functions.
//!
//! - `html`: HTML escaping for safe rendering
//! - `mime`: MIME type checks for uploads

mod html;
mod mime;

pub use html::html_escape;
pub use mime::{is_plain_text, mime_essence, sniff_binary};
