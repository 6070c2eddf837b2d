use once_cell::sync::Lazy;
use regex::Regex;

use super::{Token, append_token, cut_all, find_tokens, tidy};
use crate::error::{BrainError, Result};

static PRIORITY: Lazy<Regex> = Lazy::new(|| Regex::new(r"#p:([1-3])").expect("valid regex"));

fn tokens(text: &str) -> Vec<Token> {
    find_tokens(text, &PRIORITY)
}

/// First standalone `#p:1`..`#p:3`. Other values stay as plain text.
pub fn extract_priority(text: &str) -> (String, Option<u8>) {
    let found = tokens(text);
    match found.first() {
        Some(t) => (
            tidy(&cut_all(text, std::slice::from_ref(t))),
            t.value.parse().ok(),
        ),
        None => (text.to_string(), None),
    }
}

/// Drop every priority token, then append `#p:N` when `value` is set.
pub fn set_priority(text: &str, value: Option<u8>) -> Result<String> {
    if let Some(p) = value {
        if !(1..=3).contains(&p) {
            return Err(BrainError::InvalidInput(format!(
                "priority must be 1, 2 or 3 (got {p})"
            )));
        }
    }
    let stripped = cut_all(text, &tokens(text));
    Ok(match value {
        Some(p) => append_token(&stripped, &format!("#p:{p}")),
        None => stripped,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_bounded_tokens_only() {
        assert_eq!(extract_priority("Ship #p:2"), ("Ship".into(), Some(2)));
        assert_eq!(extract_priority("#p:3 Ship"), ("Ship".into(), Some(3)));
        assert_eq!(extract_priority("Ship #p:4"), ("Ship #p:4".into(), None));
        assert_eq!(extract_priority("Ship #p:12"), ("Ship #p:12".into(), None));
        assert_eq!(extract_priority("Ship x#p:1"), ("Ship x#p:1".into(), None));
    }

    #[test]
    fn set_replaces_existing_in_place() {
        assert_eq!(set_priority("Ship #p:1 #due:x", Some(2)).unwrap(), "Ship #due:x #p:2");
        assert_eq!(set_priority("Ship #p:1 #due:x", None).unwrap(), "Ship #due:x");
        assert_eq!(set_priority("Ship", Some(3)).unwrap(), "Ship #p:3");
    }

    #[test]
    fn set_rejects_out_of_range() {
        assert!(matches!(set_priority("Ship", Some(0)), Err(BrainError::InvalidInput(_))));
        assert!(matches!(set_priority("Ship", Some(4)), Err(BrainError::InvalidInput(_))));
    }
}
