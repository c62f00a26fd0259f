mod cli;
mod config;
mod core;
mod server;
mod utils;

use cli::Cli;
use utils::logging;

/// Workdays MCP Server
///
/// Serves two tools over stdio:
/// - `get_current_time`: current time in a timezone with a custom template
/// - `get_workdays_from_api`: official workdays, holidays and makeup workdays of a month
///
/// Usage: npx @modelcontextprotocol/inspector cargo run --bin mcp-server-workdays
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Parse CLI arguments
    let config = Cli::parse_config()?;

    // Initialize logging only if LOG_LEVEL environment variable is set
    logging::init_logging()?;

    tracing::info!(
        user_agent = %config.user_agent,
        default_timeout_ms = config.default_timeout.as_millis() as u64,
        "configuration loaded"
    );
    if let Some(ref proxy) = config.proxy_url {
        tracing::info!("Using proxy: {}", proxy);
    }

    // Run the MCP server
    if let Err(e) = server::run(config).await {
        tracing::error!("Failed to run Workdays MCP server: {}", e);
        return Err(e);
    }

    Ok(())
}
