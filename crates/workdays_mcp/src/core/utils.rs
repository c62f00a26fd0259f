use std::time::Duration;

// Constants for defaults and provider markers
pub const LOCAL_TIMEZONE: &str = "local";
pub const DEFAULT_TIME_TEMPLATE: &str = "%Y-%m-%d %H:%M:%S%z";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(8);
pub const MIN_TIMEOUT: Duration = Duration::from_secs(1);

/// Name fragment timor uses to label compensatory weekend workdays
pub const MAKEUP_WORKDAY_MARKER: &str = "补班";

/// Available resource URIs for the Workdays MCP Server
pub const AVAILABLE_RESOURCES: &[&str] = &[
    "workdays://status",
    "workdays://help",
    "workdays://providers",
];

/// Format a UTC offset given in seconds as `±HH:MM`
///
/// # Arguments
///
/// * `offset_seconds` - Seconds east of UTC
///
/// # Returns
///
/// The signed offset, e.g. `+08:00` or `-03:30`
pub fn format_utc_offset(offset_seconds: i32) -> String {
    let sign = if offset_seconds < 0 { '-' } else { '+' };
    let minutes = offset_seconds.unsigned_abs() / 60;
    format!("{}{:02}:{:02}", sign, minutes / 60, minutes % 60)
}

/// Substitute the `{year}` placeholder of a provider URL template
pub fn year_url(template: &str, year: i32) -> String {
    template.replace("{year}", &year.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_utc_offset() {
        assert_eq!(format_utc_offset(0), "+00:00");
        assert_eq!(format_utc_offset(8 * 3600), "+08:00");
        assert_eq!(format_utc_offset(-5 * 3600), "-05:00");

        // India (UTC+5:30) and Newfoundland (UTC-3:30)
        assert_eq!(format_utc_offset(5 * 3600 + 30 * 60), "+05:30");
        assert_eq!(format_utc_offset(-(3 * 3600 + 30 * 60)), "-03:30");
    }

    #[test]
    fn test_year_url() {
        assert_eq!(
            year_url("https://timor.tech/api/holiday/year/{year}", 2024),
            "https://timor.tech/api/holiday/year/2024"
        );
        assert_eq!(year_url("https://example.test/static", 2024), "https://example.test/static");
    }
}
