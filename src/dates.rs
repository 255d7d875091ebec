use serde::Serializer;
use time::{format_description::well_known::Rfc3339, macros::format_description, Date, OffsetDateTime, UtcOffset};

use crate::error::AppError;

pub fn today_utc() -> Date {
    OffsetDateTime::now_utc().date()
}

/// Parses a calendar day. Accepts `YYYY-MM-DD` or an RFC 3339 timestamp,
/// which is moved to UTC before the time of day is dropped.
pub fn parse_day(input: &str) -> Result<Date, AppError> {
    let input = input.trim();
    if let Ok(d) = Date::parse(input, format_description!("[year]-[month]-[day]")) {
        return Ok(d);
    }
    OffsetDateTime::parse(input, &Rfc3339)
        .map(|ts| ts.to_offset(UtcOffset::UTC).date())
        .map_err(|_| AppError::validation(format!("invalid date: {input}")))
}

pub fn parse_day_or_today(input: Option<&str>) -> Result<Date, AppError> {
    match input {
        Some(s) if !s.trim().is_empty() => parse_day(s),
        _ => Ok(today_utc()),
    }
}

pub fn format_day(date: Date) -> String {
    date.format(format_description!("[year]-[month]-[day]"))
        .unwrap_or_else(|_| date.to_string())
}

/// `#[serde(serialize_with)]` helpers writing dates as `YYYY-MM-DD`.
pub mod iso_day {
    use super::*;

    pub fn serialize<S: Serializer>(date: &Date, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&format_day(*date))
    }

    pub fn serialize_opt<S: Serializer>(date: &Option<Date>, s: S) -> Result<S::Ok, S::Error> {
        match date {
            Some(d) => s.serialize_str(&format_day(*d)),
            None => s.serialize_none(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::date;

    #[test]
    fn parses_plain_dates() {
        assert_eq!(parse_day("2024-06-01").unwrap(), date!(2024 - 06 - 01));
        assert_eq!(parse_day(" 2024-12-31 ").unwrap(), date!(2024 - 12 - 31));
    }

    #[test]
    fn timestamps_are_normalized_to_utc_day() {
        assert_eq!(
            parse_day("2024-06-01T23:30:00-02:00").unwrap(),
            date!(2024 - 06 - 02)
        );
        assert_eq!(
            parse_day("2024-06-01T00:30:00+03:00").unwrap(),
            date!(2024 - 05 - 31)
        );
    }

    #[test]
    fn garbage_is_a_validation_error() {
        assert!(matches!(parse_day("next tuesday"), Err(AppError::Validation(_))));
        assert!(matches!(parse_day("2024-02-30"), Err(AppError::Validation(_))));
    }

    #[test]
    fn missing_input_defaults_to_today() {
        assert_eq!(parse_day_or_today(None).unwrap(), today_utc());
        assert_eq!(parse_day_or_today(Some("")).unwrap(), today_utc());
    }

    #[test]
    fn formats_as_iso_day() {
        assert_eq!(format_day(date!(2024 - 06 - 01)), "2024-06-01");
    }
}
