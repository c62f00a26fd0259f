use std::time::Duration;

pub const DEFAULT_TIMOR_URL: &str = "https://timor.tech/api/holiday/year/{year}";
pub const DEFAULT_NATE_URL: &str =
    "https://raw.githubusercontent.com/NateScarlet/holiday-cn/master/{year}.json";
pub const DEFAULT_NATE_MIRROR_URL: &str =
    "https://cdn.jsdelivr.net/gh/NateScarlet/holiday-cn@master/{year}.json";
pub const DEFAULT_USER_AGENT: &str =
    concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// Per-year URL templates of the holiday providers; `{year}` is substituted
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderEndpoints {
    pub timor: String,
    pub nate: String,
    pub nate_mirror: String,
}

impl Default for ProviderEndpoints {
    fn default() -> Self {
        Self {
            timor: DEFAULT_TIMOR_URL.to_string(),
            nate: DEFAULT_NATE_URL.to_string(),
            nate_mirror: DEFAULT_NATE_MIRROR_URL.to_string(),
        }
    }
}

/// Configuration derived from CLI arguments
#[derive(Debug, Clone)]
pub struct Config {
    pub user_agent: String,
    pub default_timeout: Duration,
    pub proxy_url: Option<String>,
    pub endpoints: ProviderEndpoints,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            user_agent: DEFAULT_USER_AGENT.to_string(),
            default_timeout: crate::core::utils::DEFAULT_TIMEOUT,
            proxy_url: None,
            endpoints: ProviderEndpoints::default(),
        }
    }
}
