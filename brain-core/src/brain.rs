use std::path::{Path, PathBuf};

use crate::domain::{DumpItem, NoteFile, ProjectInfo, TodoItem};
use crate::dump::{capture_note, capture_task, parse_dump};
use crate::error::Result;
use crate::notes::{NOTES_DIR, list_notes};
use crate::persist::atomic::atomic_write;
use crate::persist::lock::LockOptions;
use crate::projects::{create_project, list_projects, validate_project_name};
use crate::refile::{Refiled, refile};
use crate::todo::store::{TODO_FILE, parse_all};
use crate::util::today::today;

pub const DUMP_FILE: &str = "dump.md";

/// One workspace ("brain"): the root holding `dump.md` and one directory per
/// project. Passed explicitly into every operation; there is no global
/// active workspace.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Brain {
    pub root: PathBuf,
    pub focus: Option<String>,
    pub lock: LockOptions,
}

impl Brain {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            focus: None,
            lock: LockOptions::default(),
        }
    }

    pub fn with_focus(mut self, focus: Option<String>) -> Self {
        self.focus = focus;
        self
    }

    pub fn with_lock(mut self, lock: LockOptions) -> Self {
        self.lock = lock;
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn dump_path(&self) -> PathBuf {
        self.root.join(DUMP_FILE)
    }

    pub fn project_dir(&self, project: &str) -> Result<PathBuf> {
        validate_project_name(project)?;
        Ok(self.root.join(project))
    }

    pub fn todo_path(&self, project: &str) -> Result<PathBuf> {
        Ok(self.project_dir(project)?.join(TODO_FILE))
    }

    pub fn notes_dir(&self, project: &str) -> Result<PathBuf> {
        Ok(self.project_dir(project)?.join(NOTES_DIR))
    }

    /// Create the root and an empty dump if they are missing.
    pub fn init(&self) -> Result<()> {
        std::fs::create_dir_all(&self.root)?;
        let dump = self.dump_path();
        if !dump.exists() {
            atomic_write(&dump, b"")?;
        }
        Ok(())
    }

    pub fn dump(&self) -> Result<Vec<DumpItem>> {
        parse_dump(&self.dump_path())
    }

    pub fn tasks(&self, include_completed: bool) -> Result<Vec<TodoItem>> {
        parse_all(&self.root, include_completed)
    }

    pub fn capture_task(&self, text: &str) -> Result<String> {
        capture_task(&self.dump_path(), text, today(), self.lock)
    }

    pub fn capture_note(&self, title: &str, body: &[String]) -> Result<()> {
        capture_note(&self.dump_path(), title, body, today(), self.lock)
    }

    pub fn refile(&self, item: &DumpItem, project: &str) -> Result<Refiled> {
        refile(self, item, project)
    }

    pub fn projects(&self) -> Result<Vec<ProjectInfo>> {
        list_projects(&self.root, self.focus.as_deref())
    }

    pub fn create_project(&self, name: &str) -> Result<PathBuf> {
        create_project(&self.root, name)
    }

    pub fn notes(&self, project: &str) -> Result<Vec<NoteFile>> {
        list_notes(&self.notes_dir(project)?)
    }
}
