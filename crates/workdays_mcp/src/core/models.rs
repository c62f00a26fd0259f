use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use chrono::NaiveDate;
use derive_getters::Getters;
use rmcp::schemars;
use serde::{Deserialize, Deserializer, Serialize};

use crate::core::error::{WorkdayServerError, WorkdayServerResult};
use crate::core::utils::{DEFAULT_TIME_TEMPLATE, LOCAL_TIMEZONE, MIN_TIMEOUT};

/// Helper function to deserialize and trim strings
fn deserialize_trimmed_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    Ok(s.trim().to_string())
}

fn default_timezone() -> String {
    LOCAL_TIMEZONE.to_string()
}

fn default_time_template() -> String {
    DEFAULT_TIME_TEMPLATE.to_string()
}

fn default_provider() -> String {
    Provider::Timor.to_string()
}

/// Upstream holiday calendar provider
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Provider {
    /// timor.tech yearly holiday API
    Timor,
    /// NateScarlet/holiday-cn yearly JSON published on GitHub
    Nate,
}

impl Provider {
    pub const ALL: [Provider; 2] = [Provider::Timor, Provider::Nate];

    pub fn as_str(&self) -> &'static str {
        match self {
            Provider::Timor => "timor",
            Provider::Nate => "nate",
        }
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Provider {
    type Err = WorkdayServerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "timor" => Ok(Provider::Timor),
            "nate" => Ok(Provider::Nate),
            _ => Err(WorkdayServerError::UnsupportedProvider {
                provider: s.to_string(),
            }),
        }
    }
}

/// One year of normalized provider data
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct YearHolidays {
    /// Dates officially designated as non-working
    pub holidays: BTreeSet<NaiveDate>,
    /// Weekend dates redesignated as working days
    pub makeup_workdays: BTreeSet<NaiveDate>,
}

/// Workday calendar for a single month
#[derive(Debug, Clone, Serialize)]
pub struct WorkdayResult {
    /// Provider the calendar was sourced from
    pub provider: String,
    pub year: i32,
    pub month: u32,
    /// Working dates (YYYY-MM-DD), makeup workdays included
    pub workdays: Vec<String>,
    /// Official holidays (YYYY-MM-DD)
    pub holidays: Vec<String>,
    /// Weekend dates turned into working days (YYYY-MM-DD)
    pub makeup_workdays: Vec<String>,
    /// Always 0; failures are reported as errors instead
    pub errors: u32,
}

/// Request to get the current time in a timezone
#[derive(Debug, Deserialize, schemars::JsonSchema, Getters)]
pub struct GetCurrentTimeRequest {
    /// IANA timezone name (e.g. 'Asia/Shanghai') or 'local'
    #[serde(default = "default_timezone", deserialize_with = "deserialize_trimmed_string")]
    tz: String,
    /// Output template; supports %Y %m %d %H %M %S and %z (as +HH:MM)
    #[serde(default = "default_time_template")]
    fmt: String,
}

impl GetCurrentTimeRequest {
    #[cfg(test)]
    pub fn new(tz: impl Into<String>, fmt: impl Into<String>) -> Self {
        Self {
            tz: tz.into(),
            fmt: fmt.into(),
        }
    }
}

/// Request for the official workdays of a month
#[derive(Debug, Deserialize, schemars::JsonSchema, Getters)]
pub struct GetWorkdaysRequest {
    /// Year (>= 1970); defaults to the current year in `tz`
    #[serde(default)]
    year: Option<i32>,
    /// Month (1-12); defaults to the current month in `tz`
    #[serde(default)]
    month: Option<u32>,
    /// Timezone used only to derive the default year and month
    #[serde(default = "default_timezone", deserialize_with = "deserialize_trimmed_string")]
    tz: String,
    /// Holiday data provider: 'timor' or 'nate'
    #[serde(default = "default_provider", deserialize_with = "deserialize_trimmed_string")]
    provider: String,
    /// Request timeout in seconds (default 8.0)
    #[serde(default)]
    timeout: Option<f64>,
}

impl GetWorkdaysRequest {
    #[cfg(test)]
    pub fn new(
        year: Option<i32>,
        month: Option<u32>,
        tz: impl Into<String>,
        provider: impl Into<String>,
        timeout: Option<f64>,
    ) -> Self {
        Self {
            year,
            month,
            tz: tz.into(),
            provider: provider.into(),
            timeout,
        }
    }

    /// Requested timeout, never below one second
    pub fn timeout_duration(&self, default: Duration) -> Duration {
        match self.timeout {
            Some(seconds) => {
                let millis = (seconds * 1000.0).floor() as u64;
                Duration::from_millis(millis).max(MIN_TIMEOUT)
            }
            None => default.max(MIN_TIMEOUT),
        }
    }

    /// Resolve the target year and month, falling back to `today`
    pub fn year_month(&self, today: (i32, u32)) -> (i32, u32) {
        (self.year.unwrap_or(today.0), self.month.unwrap_or(today.1))
    }
}

/// Immutable per-call query handed to the resolver
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalendarQuery {
    pub year: i32,
    pub month: u32,
    pub provider: Provider,
    pub timeout: Duration,
}

impl CalendarQuery {
    pub fn new(year: i32, month: u32, provider: &str, timeout: Duration) -> WorkdayServerResult<Self> {
        Ok(Self {
            year,
            month,
            provider: provider.parse()?,
            timeout,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_parsing() {
        assert_eq!("timor".parse::<Provider>().unwrap(), Provider::Timor);
        assert_eq!(" Nate ".parse::<Provider>().unwrap(), Provider::Nate);

        let err = "xyz".parse::<Provider>().unwrap_err();
        assert!(matches!(
            err,
            WorkdayServerError::UnsupportedProvider { ref provider } if provider == "xyz"
        ));
    }

    #[test]
    fn test_current_time_request_defaults() {
        let request: GetCurrentTimeRequest = serde_json::from_str("{}").unwrap();
        assert_eq!(request.tz(), "local");
        assert_eq!(request.fmt(), "%Y-%m-%d %H:%M:%S%z");
    }

    #[test]
    fn test_timezone_trimming() {
        let json = r#"{"tz": "   Asia/Shanghai   ", "fmt": "%H:%M"}"#;
        let request: GetCurrentTimeRequest = serde_json::from_str(json).unwrap();
        assert_eq!(request.tz(), "Asia/Shanghai");
        assert_eq!(request.fmt(), "%H:%M");
    }

    #[test]
    fn test_workdays_request_defaults() {
        let request: GetWorkdaysRequest = serde_json::from_str("{}").unwrap();
        assert_eq!(*request.year(), None);
        assert_eq!(*request.month(), None);
        assert_eq!(request.tz(), "local");
        assert_eq!(request.provider(), "timor");
        assert_eq!(*request.timeout(), None);
        assert_eq!(request.year_month((2025, 10)), (2025, 10));
    }

    #[test]
    fn test_timeout_duration() {
        let default = Duration::from_secs(8);

        let request = GetWorkdaysRequest::new(None, None, "local", "timor", None);
        assert_eq!(request.timeout_duration(default), Duration::from_secs(8));

        let request = GetWorkdaysRequest::new(None, None, "local", "timor", Some(2.5));
        assert_eq!(request.timeout_duration(default), Duration::from_millis(2500));

        // Sub-second values are raised to one second
        let request = GetWorkdaysRequest::new(None, None, "local", "timor", Some(0.2));
        assert_eq!(request.timeout_duration(default), Duration::from_secs(1));
    }

    #[test]
    fn test_calendar_query() {
        let query = CalendarQuery::new(2024, 2, "nate", Duration::from_secs(3)).unwrap();
        assert_eq!(query.provider, Provider::Nate);

        assert!(CalendarQuery::new(2024, 2, "xyz", Duration::from_secs(3)).is_err());
    }

    #[test]
    fn test_workday_result_serialization() {
        let result = WorkdayResult {
            provider: "timor".to_string(),
            year: 2024,
            month: 2,
            workdays: vec!["2024-02-01".to_string()],
            holidays: vec![],
            makeup_workdays: vec![],
            errors: 0,
        };

        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["provider"], "timor");
        assert_eq!(json["workdays"][0], "2024-02-01");
        assert_eq!(json["makeup_workdays"], serde_json::json!([]));
        assert_eq!(json["errors"], 0);
    }
}
