use once_cell::sync::Lazy;
use regex::Regex;

use super::{Token, append_token, collapse_spaces, cut_all, tidy};
use crate::error::{BrainError, Result};

static TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"#(\w[\w-]*)").expect("valid regex"));
static TAG_NAME: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\w[\w-]*$").expect("valid regex"));

/// `#word` tokens not followed by `:`; `#word:` is metadata and left alone.
fn tokens(text: &str) -> Vec<Token> {
    TAG.captures_iter(text)
        .filter_map(|caps| {
            let whole = caps.get(0)?;
            let preceded = text[..whole.start()]
                .chars()
                .next_back()
                .is_none_or(char::is_whitespace);
            let colon = text[whole.end()..].starts_with(':');
            if !preceded || colon {
                return None;
            }
            Some(Token {
                start: whole.start(),
                end: whole.end(),
                value: caps.get(1)?.as_str().to_string(),
            })
        })
        .collect()
}

/// Strip a leading `#` and check the word grammar.
pub fn normalize_tag(name: &str) -> Result<String> {
    let bare = name.trim().trim_start_matches('#');
    if !TAG_NAME.is_match(bare) {
        return Err(BrainError::InvalidInput(format!("invalid tag {name:?}")));
    }
    Ok(bare.to_string())
}

/// Tags in line order, deduplicated case-sensitively.
pub fn extract_tags(text: &str) -> (String, Vec<String>) {
    let found = tokens(text);
    let mut tags: Vec<String> = Vec::with_capacity(found.len());
    for t in &found {
        if !tags.contains(&t.value) {
            tags.push(t.value.clone());
        }
    }
    (tidy(&cut_all(text, &found)), tags)
}

/// Append each tag not already on the line.
pub fn add_tags(text: &str, names: &[String]) -> Result<String> {
    let (_, mut present) = extract_tags(text);
    let mut out = text.to_string();
    for name in names {
        let tag = normalize_tag(name)?;
        if present.contains(&tag) {
            continue;
        }
        out = append_token(&out, &format!("#{tag}"));
        present.push(tag);
    }
    Ok(out)
}

/// Delete every occurrence of the named tags, then collapse doubled spaces.
pub fn remove_tags(text: &str, names: &[String]) -> Result<String> {
    let wanted = names
        .iter()
        .map(|n| normalize_tag(n))
        .collect::<Result<Vec<_>>>()?;
    let doomed: Vec<Token> = tokens(text)
        .into_iter()
        .filter(|t| wanted.contains(&t.value))
        .collect();
    Ok(collapse_spaces(&cut_all(text, &doomed)))
}
