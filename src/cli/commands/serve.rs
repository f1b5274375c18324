//! Web server command.

use console::style;

use crate::cli::icons::Icon;
use crate::config::Settings;

/// Start the web server.
pub async fn cmd_serve(settings: &Settings, bind: &str) -> anyhow::Result<()> {
    let addr = parse_bind_address(bind);

    println!(
        "{} Starting GenuinAI at {}",
        Icon::Info,
        style(format!("http://{}", addr)).bold()
    );
    println!(
        "  {} Provider: {} ({})",
        Icon::Detail,
        settings.llm.provider,
        settings.llm.model()
    );
    println!("  Press Ctrl+C to stop");

    crate::server::serve(settings, &addr).await
}

/// Parse a bind address that can be:
/// - Just a port: "3030" -> 127.0.0.1:3030
/// - Just a host: "0.0.0.0" -> 0.0.0.0:3030
/// - Host and port: "0.0.0.0:3030" -> 0.0.0.0:3030
fn parse_bind_address(bind: &str) -> String {
    if let Ok(port) = bind.parse::<u16>() {
        return format!("127.0.0.1:{}", port);
    }

    if let Some((host, port_str)) = bind.rsplit_once(':') {
        if port_str.parse::<u16>().is_ok() {
            return format!("{}:{}", host, port_str);
        }
    }

    format!("{}:3030", bind)
}
