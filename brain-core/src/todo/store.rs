use std::path::Path;

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::warn;

use crate::codec::decode;
use crate::domain::{Status, TodoItem};
use crate::error::Result;
use crate::projects::project_dirs;
use crate::util::ident::{file_mtime, generate_id};

pub const TODO_FILE: &str = "todo.md";

static CHECKBOX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\s*)- \[([ >xX-])\] (.+)$").expect("valid regex"));

/// A line split at the checkbox: `{indent}- [{glyph}] {body}`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TaskLine<'a> {
    pub indent: &'a str,
    pub status: Status,
    pub body: &'a str,
}

impl TaskLine<'_> {
    pub fn render(indent: &str, status: Status, body: &str) -> String {
        format!("{indent}- [{}] {body}", status.glyph())
    }
}

pub fn parse_task_line(line: &str) -> Option<TaskLine<'_>> {
    let caps = CHECKBOX.captures(line)?;
    let glyph = caps.get(2)?.as_str().chars().next()?;
    Some(TaskLine {
        indent: caps.get(1)?.as_str(),
        status: Status::from_glyph(glyph)?,
        body: caps.get(3)?.as_str(),
    })
}

pub fn parse_str(
    text: &str,
    project: &str,
    file: &Path,
    mtime: i64,
    include_completed: bool,
) -> Vec<TodoItem> {
    text.lines()
        .enumerate()
        .filter_map(|(idx, raw)| {
            let task = parse_task_line(raw)?;
            if task.status == Status::Done && !include_completed {
                return None;
            }
            let line = idx + 1;
            let meta = decode(task.body);
            Some(TodoItem {
                id: generate_id(line, raw, mtime),
                project: project.to_string(),
                file: file.to_path_buf(),
                line,
                status: task.status,
                content: meta.content,
                priority: meta.priority,
                due: meta.due,
                tags: meta.tags,
            })
        })
        .collect()
}

/// Every task in one project's task file.
pub fn parse_file(path: &Path, project: &str, include_completed: bool) -> Result<Vec<TodoItem>> {
    let text = std::fs::read_to_string(path)?;
    let mtime = file_mtime(path)?;
    Ok(parse_str(&text, project, path, mtime, include_completed))
}

/// Tasks across every project under `root`, by project name then line.
///
/// Projects without a task file contribute nothing; a task file that cannot
/// be read is logged and skipped so the rest of the listing survives.
pub fn parse_all(root: &Path, include_completed: bool) -> Result<Vec<TodoItem>> {
    let mut items = Vec::new();
    for (name, dir) in project_dirs(root)? {
        let path = dir.join(TODO_FILE);
        if !path.is_file() {
            continue;
        }
        match parse_file(&path, &name, include_completed) {
            Ok(mut v) => items.append(&mut v),
            Err(e) => warn!(project = %name, path = %path.display(), error = %e, "skipping unreadable task file"),
        }
    }
    Ok(items)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recognizes_the_four_glyphs() {
        let cases = [
            ("- [ ] a", Status::Open),
            ("- [>] a", Status::InProgress),
            ("- [-] a", Status::Blocked),
            ("- [x] a", Status::Done),
            ("  - [X] a", Status::Done),
        ];
        for (line, want) in cases {
            assert_eq!(parse_task_line(line).map(|t| t.status), Some(want), "{line}");
        }
        assert!(parse_task_line("- [?] a").is_none());
        assert!(parse_task_line("- [ ] ").is_none());
        assert!(parse_task_line("* [ ] a").is_none());
    }

    #[test]
    fn done_items_only_when_asked() {
        let text = "# api\n- [ ] open #p:2\n- [x] shipped\n- [-] stuck #due:2026-01-01 #infra\n";
        let file = Path::new("api/todo.md");
        let open = parse_str(text, "api", file, 0, false);
        assert_eq!(open.len(), 2);
        assert_eq!(open[0].line, 2);
        assert_eq!(open[0].priority, Some(2));
        assert_eq!(open[0].content, "open");
        assert_eq!(open[1].status, Status::Blocked);
        assert_eq!(open[1].due, "2026-01-01");
        assert_eq!(open[1].tags, vec!["infra"]);

        let all = parse_str(text, "api", file, 0, true);
        assert_eq!(all.len(), 3);
        assert_eq!(all[1].status, Status::Done);
    }

    #[test]
    fn render_keeps_indent() {
        let t = parse_task_line("    - [ ] nested").unwrap();
        assert_eq!(TaskLine::render(t.indent, Status::Done, t.body), "    - [x] nested");
    }
}
