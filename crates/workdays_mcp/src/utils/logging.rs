use tracing_subscriber::EnvFilter;

use crate::core::error::{WorkdayServerError, WorkdayServerResult};

/// Initialize logging when `LOG_LEVEL` is set
///
/// Output goes to stderr without ANSI colours; stdout carries the MCP protocol.
/// `RUST_LOG`, when present, takes precedence over `LOG_LEVEL` as the filter.
pub fn init_logging() -> WorkdayServerResult<()> {
    let Ok(log_level) = std::env::var("LOG_LEVEL") else {
        return Ok(());
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&log_level)),
        )
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .try_init()
        .map_err(|e| WorkdayServerError::LoggingInitialization(e.to_string()))?;

    tracing::info!("Starting Workdays MCP server with log level: {}", log_level);
    Ok(())
}
