use chrono::{Datelike, NaiveDate};

use crate::core::error::{WorkdayServerError, WorkdayServerResult};

pub const ISO_DATE_FORMAT: &str = "%Y-%m-%d";

/// Earliest year accepted for workday queries
pub const MIN_YEAR: i32 = 1970;

/// Number of days in `month` of `year` under proleptic Gregorian rules
pub fn days_in_month(year: i32, month: u32) -> WorkdayServerResult<u32> {
    let first = first_of_month(year, month)?;
    let next = if month == 12 {
        first_of_month(year + 1, 1)?
    } else {
        first_of_month(year, month + 1)?
    };

    Ok(next.signed_duration_since(first).num_days() as u32)
}

fn first_of_month(year: i32, month: u32) -> WorkdayServerResult<NaiveDate> {
    NaiveDate::from_ymd_opt(year, month, 1).ok_or_else(|| WorkdayServerError::InvalidParams {
        message: format!("no such month: {}-{:02}", year, month),
    })
}

/// Every date of the month in ascending order
pub fn month_dates(year: i32, month: u32) -> WorkdayServerResult<Vec<NaiveDate>> {
    let days = days_in_month(year, month)?;
    Ok((1..=days)
        .filter_map(|day| NaiveDate::from_ymd_opt(year, month, day))
        .collect())
}

/// Weekday index with Monday = 0 and Sunday = 6
pub fn iso_weekday(date: NaiveDate) -> u32 {
    date.weekday().num_days_from_monday()
}

pub fn is_weekend(date: NaiveDate) -> bool {
    iso_weekday(date) >= 5
}

pub fn in_month(date: NaiveDate, year: i32, month: u32) -> bool {
    date.year() == year && date.month() == month
}

/// Parse a provider `YYYY-MM-DD` date
///
/// Only the canonical zero-padded form is accepted: impossible days, unpadded
/// fields, signs and surrounding whitespace all yield `None`.
pub fn parse_iso_date(value: &str) -> Option<NaiveDate> {
    let date = NaiveDate::parse_from_str(value, ISO_DATE_FORMAT).ok()?;
    (format_iso_date(date) == value).then_some(date)
}

pub fn format_iso_date(date: NaiveDate) -> String {
    date.format(ISO_DATE_FORMAT).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_days_in_month() {
        assert_eq!(days_in_month(2024, 2).unwrap(), 29);
        assert_eq!(days_in_month(2023, 2).unwrap(), 28);
        assert_eq!(days_in_month(2021, 4).unwrap(), 30);
        assert_eq!(days_in_month(2024, 12).unwrap(), 31);
        assert_eq!(days_in_month(2024, 1).unwrap(), 31);

        // Century rules
        assert_eq!(days_in_month(1900, 2).unwrap(), 28);
        assert_eq!(days_in_month(2000, 2).unwrap(), 29);
    }

    #[test]
    fn test_days_in_month_invalid_month() {
        assert!(days_in_month(2024, 0).is_err());
        assert!(days_in_month(2024, 13).is_err());
    }

    #[test]
    fn test_month_dates() {
        let dates = month_dates(2024, 2).unwrap();
        assert_eq!(dates.len(), 29);
        assert_eq!(format_iso_date(dates[0]), "2024-02-01");
        assert_eq!(format_iso_date(dates[28]), "2024-02-29");
    }

    #[test]
    fn test_iso_weekday() {
        // 2024-02-05 is a Monday, 2024-02-04 a Sunday
        let monday = NaiveDate::from_ymd_opt(2024, 2, 5).unwrap();
        let saturday = NaiveDate::from_ymd_opt(2024, 2, 3).unwrap();
        let sunday = NaiveDate::from_ymd_opt(2024, 2, 4).unwrap();

        assert_eq!(iso_weekday(monday), 0);
        assert_eq!(iso_weekday(saturday), 5);
        assert_eq!(iso_weekday(sunday), 6);

        assert!(!is_weekend(monday));
        assert!(is_weekend(saturday));
        assert!(is_weekend(sunday));
    }

    #[test]
    fn test_parse_iso_date() {
        assert_eq!(
            parse_iso_date("2024-02-29"),
            NaiveDate::from_ymd_opt(2024, 2, 29)
        );
        assert!(parse_iso_date("2023-02-29").is_none());
        assert!(parse_iso_date("02-29").is_none());
        assert!(parse_iso_date("").is_none());
    }

    #[test]
    fn test_parse_iso_date_requires_canonical_form() {
        for value in ["2024-2-4", "2024-02-4", "+2024-02-04", "2024-02-04 ", " 2024-02-04"] {
            assert!(parse_iso_date(value).is_none(), "accepted {:?}", value);
        }
        assert_eq!(
            parse_iso_date("2024-02-04"),
            NaiveDate::from_ymd_opt(2024, 2, 4)
        );
    }

    #[test]
    fn test_in_month() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        assert!(in_month(date, 2024, 3));
        assert!(!in_month(date, 2024, 2));
        assert!(!in_month(date, 2023, 3));
    }
}
