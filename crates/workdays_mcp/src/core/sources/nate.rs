use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;

use crate::core::{
    calendar,
    error::{WorkdayServerError, WorkdayServerResult},
    models::{Provider, YearHolidays},
    sources::{HolidaySource, JsonFetcher},
    utils::year_url,
};

/// Top-level holiday-cn document: `{"year": 2024, "days": [...]}`
#[derive(Debug, Deserialize)]
struct NateYear {
    days: Vec<Value>,
}

#[derive(Debug, Deserialize)]
struct NateDay {
    date: String,
    #[serde(default, rename = "isOffDay")]
    is_off_day: Option<bool>,
}

/// NateScarlet/holiday-cn yearly JSON, with a CDN mirror
#[derive(Clone)]
pub struct NateSource {
    fetcher: Arc<dyn JsonFetcher>,
    primary_template: String,
    mirror_template: String,
}

impl NateSource {
    pub fn new(
        fetcher: Arc<dyn JsonFetcher>,
        primary_template: impl Into<String>,
        mirror_template: impl Into<String>,
    ) -> Self {
        Self {
            fetcher,
            primary_template: primary_template.into(),
            mirror_template: mirror_template.into(),
        }
    }

    /// Validate a holiday-cn payload and split it into holidays and makeup workdays
    ///
    /// The provider does not label makeup days; a working day that falls on a
    /// Saturday or Sunday is one.
    pub fn normalize(payload: Value) -> WorkdayServerResult<YearHolidays> {
        let document: NateYear =
            serde_json::from_value(payload).map_err(|e| WorkdayServerError::InvalidResponseShape {
                provider: Provider::Nate.to_string(),
                reason: e.to_string(),
            })?;

        let mut year = YearHolidays::default();
        for value in document.days {
            let Ok(day) = serde_json::from_value::<NateDay>(value) else {
                continue;
            };
            let Some(date) = calendar::parse_iso_date(&day.date) else {
                tracing::debug!(date = %day.date, "skipping nate entry with invalid date");
                continue;
            };

            match day.is_off_day {
                Some(true) => {
                    year.holidays.insert(date);
                }
                Some(false) if calendar::is_weekend(date) => {
                    year.makeup_workdays.insert(date);
                }
                _ => {}
            }
        }

        Ok(year)
    }

    async fn fetch_payload(&self, year: i32, timeout: Duration) -> WorkdayServerResult<Value> {
        let primary = year_url(&self.primary_template, year);
        match self.fetcher.get_json(&primary, timeout).await {
            Ok(payload) => Ok(payload),
            Err(e) => {
                let mirror = year_url(&self.mirror_template, year);
                tracing::warn!(error = %e, %mirror, "primary nate source failed, trying mirror");
                self.fetcher.get_json(&mirror, timeout).await
            }
        }
    }
}

#[async_trait]
impl HolidaySource for NateSource {
    fn provider(&self) -> Provider {
        Provider::Nate
    }

    async fn fetch_year(&self, year: i32, timeout: Duration) -> WorkdayServerResult<YearHolidays> {
        let payload = self.fetch_payload(year, timeout).await?;
        Self::normalize(payload)
    }
}
