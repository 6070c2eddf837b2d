use crate::domain::{DumpItem, TodoItem};
use crate::error::{BrainError, Result};

/// Anything that can be picked by identity or by a piece of its text.
pub trait Searchable {
    fn id(&self) -> &str;
    fn text(&self) -> &str;
}

impl Searchable for TodoItem {
    fn id(&self) -> &str {
        &self.id
    }
    fn text(&self) -> &str {
        &self.content
    }
}

impl Searchable for DumpItem {
    fn id(&self) -> &str {
        &self.id
    }
    fn text(&self) -> &str {
        &self.content
    }
}

#[derive(Debug, PartialEq, Eq)]
pub enum Lookup<'a, T> {
    One(&'a T),
    /// Several candidates; the caller shows them so the user can narrow down.
    Ambiguous(Vec<&'a T>),
}

/// Exact identity first, then case-insensitive substring of the text.
pub fn resolve<'a, T: Searchable>(items: &'a [T], query: &str) -> Result<Lookup<'a, T>> {
    let query = query.trim();
    if query.is_empty() {
        return Err(BrainError::InvalidInput("empty query".into()));
    }
    if let Some(hit) = items.iter().find(|i| i.id() == query) {
        return Ok(Lookup::One(hit));
    }
    let needle = query.to_lowercase();
    let mut hits: Vec<&T> = items
        .iter()
        .filter(|i| i.text().to_lowercase().contains(&needle))
        .collect();
    match hits.len() {
        0 => Err(BrainError::NotFound(format!("nothing matches {query:?}"))),
        1 => Ok(Lookup::One(hits.remove(0))),
        _ => Ok(Lookup::Ambiguous(hits)),
    }
}
