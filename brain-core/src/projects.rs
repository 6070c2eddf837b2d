use std::fs;
use std::path::{Path, PathBuf};

use tracing::warn;
use walkdir::WalkDir;

use crate::domain::ProjectInfo;
use crate::error::{BrainError, Result};
use crate::notes::NOTES_DIR;
use crate::persist::atomic::atomic_write;
use crate::todo::store::{TODO_FILE, parse_file};

/// Subdirectory holding one checkout (or link) per repository.
pub const REPOS_DIR: &str = "repos";

pub fn validate_project_name(name: &str) -> Result<()> {
    let bad = name.trim().is_empty()
        || name != name.trim()
        || name.starts_with('.')
        || name.contains(['/', '\\']);
    if bad {
        return Err(BrainError::InvalidInput(format!(
            "invalid project name {name:?}"
        )));
    }
    Ok(())
}

pub fn task_file_template(name: &str) -> String {
    format!("# {name}\n\n")
}

/// Immediate, non-hidden subdirectories of the workspace root, by name.
pub fn project_dirs(root: &Path) -> Result<Vec<(String, PathBuf)>> {
    fs::metadata(root)?;
    let mut out = Vec::new();
    for entry in WalkDir::new(root)
        .min_depth(1)
        .max_depth(1)
        .follow_links(true)
        .sort_by_file_name()
    {
        let entry = match entry {
            Ok(e) => e,
            Err(e) => {
                warn!(root = %root.display(), error = %e, "skipping unreadable entry");
                continue;
            }
        };
        if !entry.file_type().is_dir() {
            continue;
        }
        let name = entry.file_name().to_string_lossy().into_owned();
        if name.starts_with('.') {
            continue;
        }
        out.push((name, entry.into_path()));
    }
    Ok(out)
}

fn count_subdirs(dir: &Path) -> usize {
    match fs::read_dir(dir) {
        Ok(rd) => rd
            .filter_map(|e| e.ok())
            .filter(|e| e.path().is_dir())
            .count(),
        Err(_) => 0,
    }
}

pub fn list_projects(root: &Path, focused: Option<&str>) -> Result<Vec<ProjectInfo>> {
    let mut out = Vec::new();
    for (name, path) in project_dirs(root)? {
        let todo = path.join(TODO_FILE);
        let open_tasks = if todo.is_file() {
            match parse_file(&todo, &name, false) {
                Ok(items) => items.len(),
                Err(e) => {
                    warn!(project = %name, error = %e, "cannot count tasks");
                    0
                }
            }
        } else {
            0
        };
        out.push(ProjectInfo {
            focused: focused == Some(name.as_str()),
            repos: count_subdirs(&path.join(REPOS_DIR)),
            open_tasks,
            name,
            path,
        });
    }
    Ok(out)
}

/// Create the project directory, its task file and notes directory. Existing
/// pieces are left alone.
pub fn create_project(root: &Path, name: &str) -> Result<PathBuf> {
    validate_project_name(name)?;
    let dir = root.join(name);
    fs::create_dir_all(dir.join(NOTES_DIR))?;
    let todo = dir.join(TODO_FILE);
    if !todo.exists() {
        atomic_write(&todo, task_file_template(name).as_bytes())?;
    }
    Ok(dir)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_must_be_plain() {
        assert!(validate_project_name("api").is_ok());
        assert!(validate_project_name("side-project 2").is_ok());
        for bad in ["", " ", ".hidden", "a/b", "a\\b", " api"] {
            assert!(validate_project_name(bad).is_err(), "{bad:?}");
        }
    }
}
