use crate::{CoreError, CoreResult};
use chrono::{Datelike, NaiveDate, Weekday};

/// The salon does not trade on this day.
pub const CLOSED_WEEKDAY: Weekday = Weekday::Mon;

const DATE_FORMAT: &str = "%Y-%m-%d";

pub fn parse_booking_date(raw: &str) -> CoreResult<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), DATE_FORMAT)
        .map_err(|_| CoreError::InvalidDate(raw.to_string()))
}

pub fn is_business_day(date: NaiveDate) -> bool {
    date.weekday() != CLOSED_WEEKDAY
}

/// Parses a `YYYY-MM-DD` form value and rejects closed days.
pub fn ensure_business_day(raw: &str) -> CoreResult<NaiveDate> {
    let date = parse_booking_date(raw)?;
    if !is_business_day(date) {
        return Err(CoreError::ClosedDay(date.weekday()));
    }
    Ok(date)
}
