//! HTTP request handlers for the web server.

mod api;
mod helpers;
mod page;
mod static_files;

// Re-export handlers for use by the router
pub use api::{api_analyze, api_flow, api_status};
pub use page::{analyze_form, index, upload_form};
pub use static_files::{serve_css, serve_js};
