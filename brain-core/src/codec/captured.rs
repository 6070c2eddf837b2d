use once_cell::sync::Lazy;
use regex::Regex;
use time::Date;

use crate::util::today::format_date;

static CAPTURED: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\s*#captured:(\d{4}-\d{2}-\d{2})\s*$").expect("valid regex")
});

/// Split a trailing `#captured:YYYY-MM-DD` off the text.
pub fn extract_captured(text: &str) -> (String, Option<String>) {
    match CAPTURED.captures(text) {
        Some(caps) => {
            let whole = caps.get(0).map_or(text.len(), |m| m.start());
            let date = caps.get(1).map(|m| m.as_str().to_string());
            (text[..whole].trim_end().to_string(), date)
        }
        None => (text.to_string(), None),
    }
}

/// Append the capture stamp unless the text already ends with one.
pub fn stamp_captured(text: &str, date: Date) -> String {
    if CAPTURED.is_match(text) {
        return text.to_string();
    }
    super::append_token(text, &format!("#captured:{}", format_date(date)))
}
