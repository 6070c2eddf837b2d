//! In-place edits of one task line. Every mutator re-reads the owning file,
//! checks the target line still carries a checkbox, changes exactly one
//! thing and writes the whole file back atomically under the file's lock.

use tracing::debug;

use crate::codec::{due, priority, tags};
use crate::domain::{Status, TodoItem};
use crate::error::{BrainError, Result};
use crate::persist::atomic::atomic_write;
use crate::persist::lock::{LockOptions, with_lock};
use crate::todo::store::{TaskLine, parse_task_line};
use crate::util::lines::read_lines;

enum Edit {
    Replace(String),
    Delete,
}

fn rewrite(
    item: &TodoItem,
    opts: LockOptions,
    edit: impl FnOnce(&TaskLine<'_>) -> Result<Edit>,
) -> Result<Option<String>> {
    with_lock(&item.file, opts, || {
        let mut doc = read_lines(&item.file)?;
        let idx = item
            .line
            .checked_sub(1)
            .filter(|i| *i < doc.lines.len())
            .ok_or_else(|| {
                BrainError::NotFound(format!(
                    "line {} is outside {} ({} lines)",
                    item.line,
                    item.file.display(),
                    doc.lines.len()
                ))
            })?;

        let corrupt = |text: &str| BrainError::Corruption {
            path: item.file.clone(),
            line: item.line,
            text: text.to_string(),
        };

        let current = doc.lines[idx].clone();
        let task = parse_task_line(&current).ok_or_else(|| corrupt(&current))?;
        let result = match edit(&task)? {
            Edit::Replace(next) => {
                if parse_task_line(&next).is_none() {
                    return Err(corrupt(&next));
                }
                doc.lines[idx] = next.clone();
                Some(next)
            }
            Edit::Delete => {
                doc.lines.remove(idx);
                None
            }
        };
        atomic_write(&item.file, doc.render().as_bytes())?;
        debug!(file = %item.file.display(), line = item.line, "task line rewritten");
        Ok(result)
    })
}

fn replace_body(
    item: &TodoItem,
    opts: LockOptions,
    f: impl FnOnce(&str) -> Result<String>,
) -> Result<String> {
    let out = rewrite(item, opts, |t| {
        let body = f(t.body)?;
        Ok(Edit::Replace(TaskLine::render(t.indent, t.status, &body)))
    })?;
    out.ok_or_else(|| BrainError::NotFound(format!("task {} vanished", item.id)))
}

/// Swap the checkbox glyph. Only `open`, `in-progress`, `blocked` and `done`
/// are accepted; anything else fails before the file is touched.
pub fn set_status(item: &TodoItem, status: &str, opts: LockOptions) -> Result<String> {
    let status: Status = status.parse()?;
    let out = rewrite(item, opts, |t| {
        Ok(Edit::Replace(TaskLine::render(t.indent, status, t.body)))
    })?;
    out.ok_or_else(|| BrainError::NotFound(format!("task {} vanished", item.id)))
}

pub fn set_priority(item: &TodoItem, value: Option<u8>, opts: LockOptions) -> Result<String> {
    // validate up front so a bad value never takes the lock
    priority::set_priority("", value)?;
    replace_body(item, opts, |body| priority::set_priority(body, value))
}

/// `value` is a `YYYY-MM-DD` date or `"clear"`.
pub fn set_due_date(item: &TodoItem, value: &str, opts: LockOptions) -> Result<String> {
    due::set_due("", value)?;
    replace_body(item, opts, |body| due::set_due(body, value))
}

pub fn add_tags(item: &TodoItem, names: &[String], opts: LockOptions) -> Result<String> {
    tags::add_tags("", names)?;
    replace_body(item, opts, |body| tags::add_tags(body, names))
}

pub fn remove_tags(item: &TodoItem, names: &[String], opts: LockOptions) -> Result<String> {
    tags::remove_tags("", names)?;
    replace_body(item, opts, |body| tags::remove_tags(body, names))
}

/// Splice the task's line out of its file.
pub fn delete_line(item: &TodoItem, opts: LockOptions) -> Result<()> {
    rewrite(item, opts, |_| Ok(Edit::Delete))?;
    Ok(())
}
