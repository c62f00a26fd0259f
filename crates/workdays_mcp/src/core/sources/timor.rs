use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{Map, Value};

use crate::core::{
    calendar,
    error::{WorkdayServerError, WorkdayServerResult},
    models::{Provider, YearHolidays},
    sources::{HolidaySource, JsonFetcher},
    utils::{MAKEUP_WORKDAY_MARKER, year_url},
};

/// Top-level timor document: `{"code": 0, "holiday": {"01-01": {...}, ...}}`
#[derive(Debug, Deserialize)]
struct TimorYear {
    code: i64,
    holiday: Map<String, Value>,
}

#[derive(Debug, Deserialize)]
struct TimorEntry {
    date: String,
    #[serde(default)]
    holiday: Option<bool>,
    #[serde(default)]
    name: Option<String>,
}

/// timor.tech yearly holiday API
#[derive(Clone)]
pub struct TimorSource {
    fetcher: Arc<dyn JsonFetcher>,
    url_template: String,
}

impl TimorSource {
    pub fn new(fetcher: Arc<dyn JsonFetcher>, url_template: impl Into<String>) -> Self {
        Self {
            fetcher,
            url_template: url_template.into(),
        }
    }

    /// Validate a timor payload and split it into holidays and makeup workdays
    pub fn normalize(payload: Value) -> WorkdayServerResult<YearHolidays> {
        let document: TimorYear =
            serde_json::from_value(payload).map_err(|e| invalid_shape(e.to_string()))?;

        if document.code != 0 {
            return Err(invalid_shape(format!("code {} reported", document.code)));
        }

        let mut year = YearHolidays::default();
        for (key, value) in document.holiday {
            let Ok(entry) = serde_json::from_value::<TimorEntry>(value) else {
                tracing::debug!(%key, "skipping malformed timor entry");
                continue;
            };
            let Some(date) = calendar::parse_iso_date(&entry.date) else {
                tracing::debug!(%key, date = %entry.date, "skipping timor entry with invalid date");
                continue;
            };

            match entry.holiday {
                Some(true) => {
                    year.holidays.insert(date);
                }
                Some(false)
                    if entry
                        .name
                        .as_deref()
                        .is_some_and(|name| name.contains(MAKEUP_WORKDAY_MARKER)) =>
                {
                    year.makeup_workdays.insert(date);
                }
                _ => {}
            }
        }

        Ok(year)
    }
}

fn invalid_shape(reason: String) -> WorkdayServerError {
    WorkdayServerError::InvalidResponseShape {
        provider: Provider::Timor.to_string(),
        reason,
    }
}

#[async_trait]
impl HolidaySource for TimorSource {
    fn provider(&self) -> Provider {
        Provider::Timor
    }

    async fn fetch_year(&self, year: i32, timeout: Duration) -> WorkdayServerResult<YearHolidays> {
        let url = year_url(&self.url_template, year);
        let payload = self.fetcher.get_json(&url, timeout).await?;
        Self::normalize(payload)
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use serde_json::json;

    use super::*;
    use crate::core::sources::testing::StaticFetcher;

    const TEMPLATE: &str = "https://timor.test/api/holiday/year/{year}";

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_normalize_splits_holidays_and_makeup_days() {
        let payload = json!({
            "code": 0,
            "holiday": {
                "02-10": {"holiday": true, "name": "初一", "wage": 3, "date": "2024-02-10"},
                "02-12": {"holiday": true, "name": "初三", "wage": 2, "date": "2024-02-12"},
                "02-04": {"holiday": false, "name": "春节前补班", "wage": 1, "after": false, "target": "春节", "date": "2024-02-04"},
                "02-18": {"holiday": false, "name": "春节后调休", "wage": 1, "date": "2024-02-18"}
            }
        });

        let year = TimorSource::normalize(payload).unwrap();

        assert_eq!(
            year.holidays.into_iter().collect::<Vec<_>>(),
            vec![date(2024, 2, 10), date(2024, 2, 12)]
        );
        // Only names carrying the makeup marker count
        assert_eq!(
            year.makeup_workdays.into_iter().collect::<Vec<_>>(),
            vec![date(2024, 2, 4)]
        );
    }

    #[test]
    fn test_normalize_skips_malformed_entries() {
        let payload = json!({
            "code": 0,
            "holiday": {
                "a": {"holiday": true},
                "b": {"holiday": true, "date": 20240101},
                "c": {"holiday": true, "date": "2024-02-30"},
                "d": {"name": "补班", "date": "2024-02-03"},
                "e": {"holiday": false, "date": "2024-02-24"},
                "f": "not an object",
                "g": {"holiday": true, "date": "2024-01-01"}
            }
        });

        let year = TimorSource::normalize(payload).unwrap();
        assert_eq!(year.holidays.len(), 1);
        assert!(year.holidays.contains(&date(2024, 1, 1)));
        assert!(year.makeup_workdays.is_empty());
    }

    #[test]
    fn test_normalize_rejects_invalid_shapes() {
        let cases = [
            json!({"code": 1, "holiday": {}}),
            json!({"code": 0}),
            json!({"code": 0, "holiday": []}),
            json!({"holiday": {}}),
            json!(null),
            json!([]),
        ];

        for payload in cases {
            let err = TimorSource::normalize(payload.clone()).unwrap_err();
            assert!(
                matches!(err, WorkdayServerError::InvalidResponseShape { ref provider, .. } if provider == "timor"),
                "payload {} should be rejected",
                payload
            );
        }
    }

    #[tokio::test]
    async fn test_fetch_year_uses_year_url() {
        let fetcher = Arc::new(StaticFetcher::new().with(
            "https://timor.test/api/holiday/year/2024",
            json!({"code": 0, "holiday": {}}),
        ));
        let source = TimorSource::new(fetcher.clone(), TEMPLATE);

        let year = source.fetch_year(2024, Duration::from_secs(1)).await.unwrap();
        assert_eq!(year, YearHolidays::default());
        assert_eq!(
            fetcher.requests(),
            vec!["https://timor.test/api/holiday/year/2024".to_string()]
        );
    }

    #[tokio::test]
    async fn test_fetch_year_has_no_mirror() {
        let fetcher = Arc::new(StaticFetcher::new());
        let source = TimorSource::new(fetcher.clone(), TEMPLATE);

        let err = source.fetch_year(2024, Duration::from_secs(1)).await.unwrap_err();
        assert!(matches!(err, WorkdayServerError::UpstreamUnavailable { .. }));
        assert_eq!(fetcher.requests().len(), 1);
    }
}
