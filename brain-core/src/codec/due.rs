use once_cell::sync::Lazy;
use regex::Regex;

use super::{Token, append_token, cut_all, find_tokens, tidy};
use crate::error::Result;
use crate::util::today::parse_date;

static DUE: Lazy<Regex> = Lazy::new(|| Regex::new(r"#due:(\S+)").expect("valid regex"));

/// Setter input that removes the tag.
pub const CLEAR: &str = "clear";

fn tokens(text: &str) -> Vec<Token> {
    find_tokens(text, &DUE)
}

/// Shape-only: any non-whitespace run after `#due:` is returned as is.
pub fn extract_due(text: &str) -> (String, String) {
    let found = tokens(text);
    match found.first() {
        Some(t) => (
            tidy(&cut_all(text, std::slice::from_ref(t))),
            t.value.clone(),
        ),
        None => (text.to_string(), String::new()),
    }
}

/// `value` must be a real `YYYY-MM-DD` date, or [`CLEAR`].
pub fn set_due(text: &str, value: &str) -> Result<String> {
    let value = value.trim();
    if value == CLEAR {
        return Ok(cut_all(text, &tokens(text)));
    }
    parse_date(value)?;
    let stripped = cut_all(text, &tokens(text));
    Ok(append_token(&stripped, &format!("#due:{value}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::BrainError;

    #[test]
    fn extraction_does_not_validate() {
        assert_eq!(extract_due("Ship #due:someday"), ("Ship".into(), "someday".into()));
        assert_eq!(extract_due("Ship"), ("Ship".into(), String::new()));
    }

    #[test]
    fn set_then_clear() {
        let with = set_due("Ship #p:1", "2026-02-15").unwrap();
        assert_eq!(with, "Ship #p:1 #due:2026-02-15");
        assert_eq!(set_due(&with, "2026-03-01").unwrap(), "Ship #p:1 #due:2026-03-01");
        assert_eq!(set_due(&with, "clear").unwrap(), "Ship #p:1");
    }

    #[test]
    fn invalid_date_rejected() {
        assert!(matches!(set_due("Ship", "2026-13-40"), Err(BrainError::InvalidInput(_))));
        assert!(matches!(set_due("Ship", "friday"), Err(BrainError::InvalidInput(_))));
    }
}
