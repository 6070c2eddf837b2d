//! Inline metadata carried at the end of a task line: `#p:N`, `#due:X`,
//! `#captured:YYYY-MM-DD` and bare `#tag` hashtags.
//!
//! Each field has a pure extractor (returns the text with the field removed
//! plus the decoded value) and a setter that touches only its own tokens.

use regex::Regex;

pub mod captured;
pub mod due;
pub mod priority;
pub mod tags;

/// One recognized token: byte range in the text plus its captured value.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct Token {
    pub start: usize,
    pub end: usize,
    pub value: String,
}

fn boundary_before(text: &str, start: usize) -> bool {
    text[..start]
        .chars()
        .next_back()
        .is_none_or(char::is_whitespace)
}

fn boundary_after(text: &str, end: usize) -> bool {
    text[end..].chars().next().is_none_or(char::is_whitespace)
}

/// Matches of `re` (value in group 1) that stand alone between whitespace.
pub(crate) fn find_tokens(text: &str, re: &Regex) -> Vec<Token> {
    re.captures_iter(text)
        .filter_map(|caps| {
            let whole = caps.get(0)?;
            let value = caps.get(1)?;
            if !boundary_before(text, whole.start()) || !boundary_after(text, whole.end()) {
                return None;
            }
            Some(Token {
                start: whole.start(),
                end: whole.end(),
                value: value.as_str().to_string(),
            })
        })
        .collect()
}

/// Remove `[start, end)` together with one adjoining whitespace character,
/// preferring the one before the token.
pub(crate) fn cut(text: &str, start: usize, end: usize) -> String {
    let before = text[..start].chars().next_back();
    let after = text[end..].chars().next();
    let (from, to) = match (before, after) {
        (Some(c), _) if c.is_whitespace() => (start - c.len_utf8(), end),
        (_, Some(c)) if c.is_whitespace() => (start, end + c.len_utf8()),
        _ => (start, end),
    };
    let mut out = String::with_capacity(text.len());
    out.push_str(&text[..from]);
    out.push_str(&text[to..]);
    out
}

/// Remove every token, last first so earlier offsets stay valid.
pub(crate) fn cut_all(text: &str, tokens: &[Token]) -> String {
    tokens
        .iter()
        .rev()
        .fold(text.to_string(), |acc, t| cut(&acc, t.start, t.end))
}

pub(crate) fn collapse_spaces(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut prev_space = false;
    for c in text.chars() {
        if c == ' ' && prev_space {
            continue;
        }
        prev_space = c == ' ';
        out.push(c);
    }
    out
}

pub(crate) fn append_token(text: &str, token: &str) -> String {
    let base = text.trim_end();
    if base.is_empty() {
        token.to_string()
    } else {
        format!("{base} {token}")
    }
}

/// Display form of a line body once its metadata is gone.
pub(crate) fn tidy(text: &str) -> String {
    collapse_spaces(text.trim())
}

/// The metadata a task line carries, with the remaining display text.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Decoded {
    pub content: String,
    pub priority: Option<u8>,
    pub due: String,
    pub tags: Vec<String>,
}

/// Priority, then due date, then tags; each step sees the previous output.
pub fn decode(body: &str) -> Decoded {
    let (rest, priority) = priority::extract_priority(body);
    let (rest, due) = due::extract_due(&rest);
    let (content, tags) = tags::extract_tags(&rest);
    Decoded {
        content,
        priority,
        due,
        tags,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_strips_all_three_fields() {
        let d = decode("Ship the thing #p:1 #due:2026-02-15 #release #api");
        assert_eq!(d.content, "Ship the thing");
        assert_eq!(d.priority, Some(1));
        assert_eq!(d.due, "2026-02-15");
        assert_eq!(d.tags, vec!["release", "api"]);
    }

    #[test]
    fn decode_keeps_capture_stamp_and_unknown_tokens() {
        let d = decode("Fix bug #p:9 #captured:2024-01-01");
        assert_eq!(d.content, "Fix bug #p:9 #captured:2024-01-01");
        assert_eq!(d.priority, None);
        assert!(d.tags.is_empty());
    }

    #[test]
    fn cut_prefers_leading_space() {
        assert_eq!(cut("a #x b", 2, 4), "a b");
        assert_eq!(cut("#x b", 0, 2), "b");
        assert_eq!(cut("#x", 0, 2), "");
    }
}
