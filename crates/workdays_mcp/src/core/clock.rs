use std::str::FromStr;

use chrono::{DateTime, Datelike, Offset, TimeZone, Timelike, Utc};
use chrono_tz::Tz;

use crate::core::{
    error::{WorkdayServerError, WorkdayServerResult},
    utils::{LOCAL_TIMEZONE, format_utc_offset},
};

/// Timezone-aware wall clock
#[derive(Clone)]
pub struct Clock {
    pub(crate) local_timezone: Tz,
}

impl Clock {
    pub fn new() -> Self {
        // Try to detect the system's local timezone
        let local_tz = match iana_time_zone::get_timezone() {
            Ok(tz_name) => match tz_name.parse::<Tz>() {
                Ok(tz) => tz,
                Err(_) => {
                    tracing::warn!("Could not parse timezone '{}', defaulting to UTC", tz_name);
                    chrono_tz::UTC
                }
            },
            Err(_) => {
                tracing::warn!("Could not detect system timezone, defaulting to UTC");
                chrono_tz::UTC
            }
        };

        Self {
            local_timezone: local_tz,
        }
    }

    pub fn local_timezone_name(&self) -> String {
        self.local_timezone.to_string()
    }

    /// Resolve `local` or an IANA name; unknown names are an error, never `local`
    pub fn resolve_timezone(&self, timezone_name: &str) -> WorkdayServerResult<Tz> {
        let name = timezone_name.trim();
        if name.is_empty() || name.eq_ignore_ascii_case(LOCAL_TIMEZONE) {
            return Ok(self.local_timezone);
        }

        Tz::from_str(name).map_err(|_| WorkdayServerError::UnsupportedTimezone {
            timezone: timezone_name.to_string(),
        })
    }

    pub fn now_in(&self, timezone: &Tz) -> DateTime<Tz> {
        Utc::now().with_timezone(timezone)
    }

    /// Current time in `timezone_name` rendered through `template`
    pub fn format_now(&self, timezone_name: &str, template: &str) -> WorkdayServerResult<String> {
        let timezone = self.resolve_timezone(timezone_name)?;
        Ok(render_template(&self.now_in(&timezone), template))
    }

    /// Current `(year, month)` in `timezone_name`
    pub fn current_year_month(&self, timezone_name: &str) -> WorkdayServerResult<(i32, u32)> {
        let timezone = self.resolve_timezone(timezone_name)?;
        let now = self.now_in(&timezone);
        Ok((now.year(), now.month()))
    }
}

impl Default for Clock {
    fn default() -> Self {
        Self::new()
    }
}

/// Replace the `%Y %m %d %H %M %S %z` tokens of `template` with values from `dt`
///
/// Text that is not one of these tokens is copied unchanged, so `%%` or `%A`
/// are not interpreted.
pub fn render_template<Z: TimeZone>(dt: &DateTime<Z>, template: &str) -> String {
    let offset = format_utc_offset(dt.offset().fix().local_minus_utc());

    template
        .replace("%Y", &format!("{:04}", dt.year()))
        .replace("%m", &format!("{:02}", dt.month()))
        .replace("%d", &format!("{:02}", dt.day()))
        .replace("%H", &format!("{:02}", dt.hour()))
        .replace("%M", &format!("{:02}", dt.minute()))
        .replace("%S", &format!("{:02}", dt.second()))
        .replace("%z", &offset)
}
