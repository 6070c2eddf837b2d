//! Capture → triage: move one dump item into a project.
//!
//! The destination is written before the item leaves the dump. A crash or
//! failure between the two steps leaves the item in both places, never in
//! neither: refile is at-least-once.

use std::path::PathBuf;

use time::Date;
use tracing::{info, warn};

use crate::brain::Brain;
use crate::codec::captured::extract_captured;
use crate::domain::{DumpItem, ItemKind};
use crate::dump::{ensure_current, note_body, remove_item};
use crate::error::{BrainError, Result};
use crate::notes::write_note;
use crate::persist::append::append_lines;
use crate::projects::task_file_template;
use crate::util::lines::read_lines;
use crate::util::today::{parse_date, today};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Refiled {
    Task { file: PathBuf, line: String },
    Note { path: PathBuf },
}

pub fn refile(brain: &Brain, item: &DumpItem, project: &str) -> Result<Refiled> {
    refile_on(brain, item, project, today())
}

/// Like [`refile`]; `today` dates notes that carry no capture stamp.
pub fn refile_on(brain: &Brain, item: &DumpItem, project: &str, today: Date) -> Result<Refiled> {
    let dir = brain.project_dir(project)?;
    if !dir.is_dir() {
        return Err(BrainError::NotFound(format!("project {project:?}")));
    }
    let dump = brain.dump_path();

    let outcome = match item.kind {
        ItemKind::Task => {
            ensure_current(&dump, &read_lines(&dump)?.lines, item)?;
            let file = brain.todo_path(project)?;
            let line = format!("- [ ] {}", item.content);
            append_lines(
                &file,
                std::slice::from_ref(&line),
                &task_file_template(project),
                brain.lock,
            )?;
            Refiled::Task { file, line }
        }
        ItemKind::Note => {
            let body = note_body(&dump, item)?;
            let (title, stamp) = extract_captured(&item.content);
            let created = match stamp {
                Some(s) => parse_date(&s).unwrap_or(today),
                None => today,
            };
            let path = write_note(&brain.notes_dir(project)?, &title, created, &body)?;
            Refiled::Note { path }
        }
    };
    info!(item = %item.id, project, "refile: destination written");

    if let Err(e) = remove_item(&dump, item, brain.lock) {
        warn!(item = %item.id, error = %e, "refile: item copied but still in dump");
        return Err(e);
    }
    Ok(outcome)
}
