use std::time::Duration;

use clap::Parser;
use url::Url;

use crate::config::{
    Config, DEFAULT_NATE_MIRROR_URL, DEFAULT_NATE_URL, DEFAULT_TIMOR_URL, DEFAULT_USER_AGENT,
    ProviderEndpoints,
};
use crate::core::{
    error::{WorkdayServerError, WorkdayServerResult},
    utils::year_url,
};

/// Workdays MCP Server
///
/// A Model Context Protocol server exposing two tools:
/// - `get_current_time`: current time in any IANA timezone, custom template
/// - `get_workdays_from_api`: official workdays, holidays and makeup workdays
///   of a month, from the timor or holiday-cn (nate) calendars
///
/// ## Development
/// ```bash
/// npx @modelcontextprotocol/inspector cargo run --bin mcp-server-workdays
/// ```
///
/// ## Configuration
/// Add to your MCP client configuration:
/// ```json
/// {
///   "mcpServers": {
///     "workdays": {
///       "command": "mcp-server-workdays",
///       "env": {
///         "LOG_LEVEL": "info"
///       }
///     }
///   }
/// }
/// ```
///
/// ## Environment Variables
/// - `LOG_LEVEL`: Enables logging to stderr at the given level (trace, debug, info, warn, error)
#[derive(Parser, Debug, Clone)]
#[command(name = "mcp-server-workdays")]
#[command(about = "MCP server for timezone-aware time and official workday calendars")]
#[command(version)]
pub struct Cli {
    /// Custom User-Agent string to use for provider requests
    #[arg(long, default_value = DEFAULT_USER_AGENT)]
    pub user_agent: String,

    /// Timeout in seconds used when a tool call does not specify one
    #[arg(long, default_value_t = 8.0)]
    pub default_timeout: f64,

    /// Proxy URL to use for requests (e.g., http://proxy:8080)
    #[arg(long)]
    pub proxy_url: Option<String>,

    /// URL template of the timor yearly API; `{year}` is substituted
    #[arg(long, default_value = DEFAULT_TIMOR_URL)]
    pub timor_url: String,

    /// URL template of the holiday-cn yearly JSON
    #[arg(long, default_value = DEFAULT_NATE_URL)]
    pub nate_url: String,

    /// URL template of the holiday-cn mirror, tried when the primary fails
    #[arg(long, default_value = DEFAULT_NATE_MIRROR_URL)]
    pub nate_mirror_url: String,
}

impl Cli {
    /// Parse CLI arguments and convert to configuration
    pub fn parse_config() -> WorkdayServerResult<Config> {
        Self::parse().into_config()
    }

    pub fn into_config(self) -> WorkdayServerResult<Config> {
        if !self.default_timeout.is_finite() || self.default_timeout <= 0.0 {
            return Err(WorkdayServerError::InvalidParams {
                message: format!(
                    "default timeout must be a positive number of seconds, got {}",
                    self.default_timeout
                ),
            });
        }

        for template in [&self.timor_url, &self.nate_url, &self.nate_mirror_url] {
            validate_url_template(template)?;
        }
        if let Some(proxy) = &self.proxy_url {
            Url::parse(proxy).map_err(|e| WorkdayServerError::InvalidParams {
                message: format!("invalid proxy URL {}: {}", proxy, e),
            })?;
        }

        let default_timeout = Duration::try_from_secs_f64(self.default_timeout).map_err(|e| {
            WorkdayServerError::InvalidParams {
                message: format!("default timeout {} out of range: {}", self.default_timeout, e),
            }
        })?;

        Ok(Config {
            user_agent: self.user_agent,
            default_timeout,
            proxy_url: self.proxy_url,
            endpoints: ProviderEndpoints {
                timor: self.timor_url,
                nate: self.nate_url,
                nate_mirror: self.nate_mirror_url,
            },
        })
    }
}

fn validate_url_template(template: &str) -> WorkdayServerResult<()> {
    let url = Url::parse(&year_url(template, 2024)).map_err(|e| {
        WorkdayServerError::InvalidParams {
            message: format!("invalid provider URL template {}: {}", template, e),
        }
    })?;

    match url.scheme() {
        "http" | "https" => Ok(()),
        scheme => Err(WorkdayServerError::InvalidParams {
            message: format!("unsupported URL scheme '{}' in {}", scheme, template),
        }),
    }
}
