// brain_core/src/domain.rs
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use crate::error::BrainError;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ItemKind {
    Task,
    Note,
}

/// An entry of the capture inbox. Line numbers are 1-indexed and inclusive.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DumpItem {
    pub id: String,
    pub kind: ItemKind,
    /// Task text or note title, metadata still embedded.
    pub content: String,
    pub start_line: usize,
    pub end_line: usize,
    /// Full line for tasks, header line for notes.
    pub raw: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Status {
    Open,
    InProgress,
    Blocked,
    Done,
}

impl Status {
    pub const ALL: [Status; 4] = [
        Status::Open,
        Status::InProgress,
        Status::Blocked,
        Status::Done,
    ];

    pub fn glyph(self) -> char {
        match self {
            Status::Open => ' ',
            Status::InProgress => '>',
            Status::Blocked => '-',
            Status::Done => 'x',
        }
    }

    pub fn from_glyph(c: char) -> Option<Self> {
        match c {
            ' ' => Some(Status::Open),
            '>' => Some(Status::InProgress),
            '-' => Some(Status::Blocked),
            'x' | 'X' => Some(Status::Done),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Status::Open => "open",
            Status::InProgress => "in-progress",
            Status::Blocked => "blocked",
            Status::Done => "done",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Status {
    type Err = BrainError;

    /// Only the four literal names are accepted.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Status::ALL
            .into_iter()
            .find(|st| st.name() == s)
            .ok_or_else(|| {
                BrainError::InvalidInput(format!(
                    "unknown status {s:?} (expected open, in-progress, blocked or done)"
                ))
            })
    }
}

/// A task line inside a project's `todo.md`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TodoItem {
    pub id: String,
    pub project: String,
    pub file: PathBuf,
    pub line: usize,
    pub status: Status,
    /// Body with priority, due date and freeform tags stripped.
    pub content: String,
    pub priority: Option<u8>,
    /// Raw `#due:` value, empty when absent.
    pub due: String,
    pub tags: Vec<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoteFile {
    pub filename: String,
    pub path: PathBuf,
    pub title: String,
    pub created: Option<String>,
    pub mtime: i64,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectInfo {
    pub name: String,
    pub path: PathBuf,
    pub focused: bool,
    pub repos: usize,
    pub open_tasks: usize,
}
