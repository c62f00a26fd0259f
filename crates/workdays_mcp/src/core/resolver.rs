use std::collections::BTreeSet;
use std::sync::Arc;
use std::time::Duration;

use chrono::NaiveDate;

use crate::config::ProviderEndpoints;
use crate::core::{
    calendar,
    error::WorkdayServerResult,
    models::{CalendarQuery, Provider, WorkdayResult, YearHolidays},
    sources::{HolidaySource, JsonFetcher, NateSource, TimorSource},
};

/// Reconciles provider holiday data with weekday arithmetic
#[derive(Clone)]
pub struct WorkdayResolver {
    fetcher: Arc<dyn JsonFetcher>,
    endpoints: ProviderEndpoints,
}

impl WorkdayResolver {
    pub fn new(fetcher: Arc<dyn JsonFetcher>, endpoints: ProviderEndpoints) -> Self {
        Self { fetcher, endpoints }
    }

    fn source_for(&self, provider: Provider) -> Box<dyn HolidaySource> {
        match provider {
            Provider::Timor => Box::new(TimorSource::new(
                self.fetcher.clone(),
                self.endpoints.timor.clone(),
            )),
            Provider::Nate => Box::new(NateSource::new(
                self.fetcher.clone(),
                self.endpoints.nate.clone(),
                self.endpoints.nate_mirror.clone(),
            )),
        }
    }

    /// Workdays, holidays and makeup workdays of one month
    ///
    /// An unsupported provider fails before any request is made.
    pub async fn resolve(
        &self,
        year: i32,
        month: u32,
        provider: &str,
        timeout: Duration,
    ) -> WorkdayServerResult<WorkdayResult> {
        let query = CalendarQuery::new(year, month, provider, timeout)?;
        self.resolve_query(&query).await
    }

    pub async fn resolve_query(&self, query: &CalendarQuery) -> WorkdayServerResult<WorkdayResult> {
        let dates = calendar::month_dates(query.year, query.month)?;

        let source = self.source_for(query.provider);
        tracing::info!(
            provider = %source.provider(),
            year = query.year,
            month = query.month,
            timeout_ms = query.timeout.as_millis() as u64,
            "resolving workdays"
        );
        let year_data = source.fetch_year(query.year, query.timeout).await?;

        let result = reconcile_month(query, &dates, year_data);
        tracing::debug!(
            workdays = result.workdays.len(),
            holidays = result.holidays.len(),
            makeup_workdays = result.makeup_workdays.len(),
            "resolved workdays"
        );
        Ok(result)
    }
}

/// Combine a month's dates with normalized provider data
///
/// Makeup workdays are added after holidays are excluded, so a date the
/// provider lists both ways ends up in `workdays`.
pub(crate) fn reconcile_month(
    query: &CalendarQuery,
    dates: &[NaiveDate],
    year_data: YearHolidays,
) -> WorkdayResult {
    let in_month = |date: &NaiveDate| calendar::in_month(*date, query.year, query.month);

    let holidays: BTreeSet<NaiveDate> = year_data.holidays.into_iter().filter(in_month).collect();
    let makeup_workdays: BTreeSet<NaiveDate> = year_data
        .makeup_workdays
        .into_iter()
        .filter(in_month)
        .collect();

    let mut workdays: BTreeSet<NaiveDate> = dates
        .iter()
        .copied()
        .filter(|date| !calendar::is_weekend(*date) && !holidays.contains(date))
        .collect();
    workdays.extend(makeup_workdays.iter().copied());

    WorkdayResult {
        provider: query.provider.to_string(),
        year: query.year,
        month: query.month,
        workdays: format_dates(&workdays),
        holidays: format_dates(&holidays),
        makeup_workdays: format_dates(&makeup_workdays),
        errors: 0,
    }
}

fn format_dates(dates: &BTreeSet<NaiveDate>) -> Vec<String> {
    dates.iter().copied().map(calendar::format_iso_date).collect()
}
