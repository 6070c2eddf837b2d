use time::format_description::BorrowedFormatItem;
use time::macros::format_description;
use time::{Date, OffsetDateTime};

use crate::error::{BrainError, Result};

pub const DATE_FORMAT: &[BorrowedFormatItem<'static>] =
    format_description!("[year]-[month]-[day]");

/// Local calendar date, falling back to UTC when the offset is unknown.
pub fn today() -> Date {
    OffsetDateTime::now_local()
        .unwrap_or_else(|_| OffsetDateTime::now_utc())
        .date()
}

pub fn format_date(date: Date) -> String {
    date.format(DATE_FORMAT).unwrap_or_default()
}

/// Strict `YYYY-MM-DD` that names a real calendar day.
pub fn parse_date(s: &str) -> Result<Date> {
    let shaped = s.len() == 10
        && s.bytes().enumerate().all(|(i, b)| match i {
            4 | 7 => b == b'-',
            _ => b.is_ascii_digit(),
        });
    if !shaped {
        return Err(BrainError::InvalidInput(format!(
            "date {s:?} is not YYYY-MM-DD"
        )));
    }
    Date::parse(s, DATE_FORMAT)
        .map_err(|e| BrainError::InvalidInput(format!("date {s:?}: {e}")))
}
