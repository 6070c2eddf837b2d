//! The capture inbox: a flat markdown file of open tasks and `[Note]` blocks
//! waiting to be refiled.

use std::path::Path;

use once_cell::sync::Lazy;
use regex::Regex;
use time::Date;
use tracing::debug;

use crate::codec::captured::stamp_captured;
use crate::domain::{DumpItem, ItemKind};
use crate::error::{BrainError, Result};
use crate::persist::append::append_lines;
use crate::persist::atomic::atomic_write;
use crate::persist::lock::{LockOptions, with_lock};
use crate::util::ident::{file_mtime, generate_id};
use crate::util::lines::read_lines;

static TASK: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\s*- \[ \] (.+)$").expect("valid regex"));
static NOTE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\[Note\] (.+)$").expect("valid regex"));

pub const BODY_INDENT: &str = "    ";

struct OpenNote {
    title: String,
    raw: String,
    start: usize,
    last: usize,
}

impl OpenNote {
    fn close(self, mtime: i64) -> DumpItem {
        DumpItem {
            id: generate_id(self.start, &self.raw, mtime),
            kind: ItemKind::Note,
            content: self.title,
            start_line: self.start,
            end_line: self.last,
            raw: self.raw,
        }
    }
}

/// Single forward scan. Task lines win over everything, including an open
/// note block, which they close.
pub fn parse_dump_str(text: &str, mtime: i64) -> Vec<DumpItem> {
    let mut items = Vec::new();
    let mut open: Option<OpenNote> = None;

    for (idx, line) in text.lines().enumerate() {
        let n = idx + 1;

        if let Some(caps) = TASK.captures(line) {
            if let Some(note) = open.take() {
                items.push(note.close(mtime));
            }
            items.push(DumpItem {
                id: generate_id(n, line, mtime),
                kind: ItemKind::Task,
                content: caps[1].to_string(),
                start_line: n,
                end_line: n,
                raw: line.to_string(),
            });
            continue;
        }

        if let Some(note) = open.as_mut() {
            if line.starts_with(BODY_INDENT) {
                note.last = n;
                continue;
            }
            if line.trim().is_empty() {
                continue;
            }
        }
        if let Some(note) = open.take() {
            items.push(note.close(mtime));
        }

        if let Some(caps) = NOTE.captures(line) {
            open = Some(OpenNote {
                title: caps[1].to_string(),
                raw: line.to_string(),
                start: n,
                last: n,
            });
        }
        // blank lines, headers and stray text are not items
    }

    if let Some(note) = open.take() {
        items.push(note.close(mtime));
    }
    items
}

/// Parse the dump file; a dump that does not exist yet is empty.
pub fn parse_dump(path: &Path) -> Result<Vec<DumpItem>> {
    if !path.exists() {
        return Ok(Vec::new());
    }
    let text = std::fs::read_to_string(path)?;
    let mtime = file_mtime(path)?;
    Ok(parse_dump_str(&text, mtime))
}

/// Body of a note item as written in the dump, indent removed.
pub fn note_body(path: &Path, item: &DumpItem) -> Result<Vec<String>> {
    let doc = read_lines(path)?;
    ensure_current(path, &doc.lines, item)?;
    Ok(doc.lines[item.start_line..item.end_line]
        .iter()
        .map(|l| l.strip_prefix(BODY_INDENT).unwrap_or("").to_string())
        .collect())
}

/// The item must still start with the line it was parsed from and cover the
/// same span; a note whose body grew since the scan is stale too.
pub(crate) fn ensure_current(path: &Path, lines: &[String], item: &DumpItem) -> Result<()> {
    let in_range = item.start_line >= 1
        && item.start_line <= item.end_line
        && item.end_line <= lines.len();
    let same_span = || {
        parse_dump_str(&lines.join("\n"), 0).iter().any(|i| {
            i.kind == item.kind && i.start_line == item.start_line && i.end_line == item.end_line
        })
    };
    if !in_range || lines[item.start_line - 1] != item.raw || !same_span() {
        return Err(BrainError::NotFound(format!(
            "item {} in {} changed since it was read",
            item.id,
            path.display()
        )));
    }
    Ok(())
}

/// Delete the item's line span from the dump under the dump lock.
pub fn remove_item(path: &Path, item: &DumpItem, opts: LockOptions) -> Result<()> {
    with_lock(path, opts, || {
        let mut doc = read_lines(path)?;
        ensure_current(path, &doc.lines, item)?;
        doc.lines.drain(item.start_line - 1..item.end_line);
        atomic_write(path, doc.render().as_bytes())?;
        debug!(dump = %path.display(), start = item.start_line, end = item.end_line, "removed dump span");
        Ok(())
    })
}

fn single_line(text: &str, what: &str) -> Result<String> {
    let text = text.trim();
    if text.is_empty() {
        return Err(BrainError::InvalidInput(format!("{what} is empty")));
    }
    if text.contains('\n') {
        return Err(BrainError::InvalidInput(format!("{what} spans several lines")));
    }
    Ok(text.to_string())
}

/// Append `- [ ] {text} #captured:{today}` to the dump.
pub fn capture_task(path: &Path, text: &str, today: Date, opts: LockOptions) -> Result<String> {
    let text = single_line(text, "task")?;
    let line = format!("- [ ] {}", stamp_captured(&text, today));
    append_lines(path, std::slice::from_ref(&line), "", opts)?;
    Ok(line)
}

/// Append a `[Note]` header and its four-space-indented body to the dump.
pub fn capture_note(
    path: &Path,
    title: &str,
    body: &[String],
    today: Date,
    opts: LockOptions,
) -> Result<()> {
    let title = single_line(title, "note title")?;
    let mut lines = vec![format!("[Note] {}", stamp_captured(&title, today))];
    for line in body.iter().flat_map(|b| b.lines()) {
        // an open checkbox would be read back as a dump task and split the note
        if TASK.is_match(line) {
            return Err(BrainError::InvalidInput(format!(
                "note body line {line:?} reads as an open task"
            )));
        }
        lines.push(format!("{BODY_INDENT}{line}").trim_end().to_string());
    }
    append_lines(path, &lines, "", opts)
}
