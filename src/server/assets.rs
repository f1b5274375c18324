//! Static asset constants (CSS and JavaScript).

/// Stylesheet for the web interface.
pub const CSS: &str = include_str!("styles.css");

/// Tab switching, loading state, upload and toast handling.
pub const JS: &str = include_str!("scripts.js");
