use std::io::{BufRead, Write};
use std::path::PathBuf;

use brain_core::config::Config;
use brain_core::error::{BrainError, Result};
use brain_core::refile::Refiled;
use brain_core::todo::lookup::Searchable;
use brain_core::todo::mutate;
use brain_core::{Brain, DumpItem, ItemKind, Lookup, TodoItem, resolve};

fn load_config() -> Result<(PathBuf, Config)> {
    let path = Config::default_path()?;
    let cfg = Config::load(&path)?;
    Ok((path, cfg))
}

fn brain_from_args(root: Option<PathBuf>) -> Result<Brain> {
    let brain = match root {
        Some(root) => Brain::new(root),
        None => load_config()?.1.active_brain()?,
    };
    tracing::debug!(root = %brain.root.display(), focus = ?brain.focus, "workspace");
    Ok(brain)
}

fn project_or_focus(brain: &Brain, project: Option<String>) -> Result<String> {
    project.or_else(|| brain.focus.clone()).ok_or_else(|| {
        BrainError::InvalidInput("no project given and no focused project".into())
    })
}

fn format_task(t: &TodoItem) -> String {
    let mut line = format!(
        "{}  [{}] {:<12} {}",
        t.id,
        t.status.glyph(),
        t.project,
        t.content
    );
    if let Some(p) = t.priority {
        line.push_str(&format!("  p{p}"));
    }
    if !t.due.is_empty() {
        line.push_str(&format!("  due:{}", t.due));
    }
    for tag in &t.tags {
        line.push_str(&format!(" #{tag}"));
    }
    line
}

fn format_dump_item(d: &DumpItem) -> String {
    let kind = match d.kind {
        ItemKind::Task => "task",
        ItemKind::Note => "note",
    };
    if d.start_line == d.end_line {
        format!("{}  {kind}  L{}  {}", d.id, d.start_line, d.content)
    } else {
        format!(
            "{}  {kind}  L{}-{}  {}",
            d.id, d.start_line, d.end_line, d.content
        )
    }
}

/// One match, or print every candidate and fail.
fn pick<'a, T: Searchable>(
    items: &'a [T],
    query: &str,
    describe: impl Fn(&T) -> String,
) -> Result<&'a T> {
    match resolve(items, query)? {
        Lookup::One(item) => Ok(item),
        Lookup::Ambiguous(candidates) => {
            eprintln!("{query:?} matches {} items:", candidates.len());
            for c in candidates {
                eprintln!("  {}", describe(c));
            }
            Err(BrainError::NotFound(format!(
                "{query:?} is ambiguous; retry with an id"
            )))
        }
    }
}

fn describe_task(t: &TodoItem) -> String {
    format!("{}  {}  {}  {}", t.id, t.status, t.project, t.content)
}

fn pick_task(brain: &Brain, query: &str) -> Result<TodoItem> {
    let items = brain.tasks(true)?;
    pick(&items, query, describe_task).cloned()
}

fn confirm(prompt: &str) -> Result<bool> {
    eprint!("{prompt} [y/N] ");
    std::io::stderr().flush()?;
    let mut answer = String::new();
    std::io::stdin().lock().read_line(&mut answer)?;
    Ok(matches!(answer.trim(), "y" | "Y" | "yes"))
}

pub fn handle_init(name: String, path: PathBuf) -> Result<()> {
    let (cfg_path, mut cfg) = load_config()?;
    let path = if path.is_absolute() {
        path
    } else {
        std::env::current_dir()?.join(path)
    };
    Brain::new(&path).init()?;
    cfg.add(&name, path.clone());
    cfg.save(&cfg_path)?;
    eprintln!("init: {} -> {}", name, path.display());
    Ok(())
}

pub fn handle_use(name: String) -> Result<()> {
    let (cfg_path, mut cfg) = load_config()?;
    cfg.activate(&name)?;
    cfg.save(&cfg_path)?;
    eprintln!("use: {name}");
    Ok(())
}

pub fn handle_focus(project: Option<String>, clear: bool) -> Result<()> {
    let (cfg_path, mut cfg) = load_config()?;
    if project.is_none() && !clear {
        match cfg.active_brain()?.focus {
            Some(p) => println!("{p}"),
            None => eprintln!("focus: none"),
        }
        return Ok(());
    }
    if let Some(p) = &project {
        let brain = cfg.active_brain()?;
        if !brain.project_dir(p)?.is_dir() {
            return Err(BrainError::NotFound(format!("project {p:?}")));
        }
    }
    cfg.set_focus(project.clone())?;
    cfg.save(&cfg_path)?;
    eprintln!("focus: {}", project.as_deref().unwrap_or("cleared"));
    Ok(())
}

pub fn handle_add(root: Option<PathBuf>, text: Vec<String>) -> Result<()> {
    let brain = brain_from_args(root)?;
    let line = brain.capture_task(&text.join(" "))?;
    eprintln!("add: {line}");
    Ok(())
}

pub fn handle_note(root: Option<PathBuf>, title: String, body: Vec<String>) -> Result<()> {
    let brain = brain_from_args(root)?;
    brain.capture_note(&title, &body)?;
    eprintln!("note: {title}");
    Ok(())
}

pub fn handle_dump(root: Option<PathBuf>) -> Result<()> {
    let brain = brain_from_args(root)?;
    for item in brain.dump()? {
        println!("{}", format_dump_item(&item));
    }
    Ok(())
}

pub fn handle_refile(root: Option<PathBuf>, query: String, project: Option<String>) -> Result<()> {
    let brain = brain_from_args(root)?;
    let project = project_or_focus(&brain, project)?;
    let items = brain.dump()?;
    let item = pick(&items, &query, format_dump_item)?;
    match brain.refile(item, &project)? {
        Refiled::Task { file, .. } => eprintln!("refile: task -> {}", file.display()),
        Refiled::Note { path } => eprintln!("refile: note -> {}", path.display()),
    }
    Ok(())
}

pub fn handle_todo(root: Option<PathBuf>, all: bool, project: Option<String>) -> Result<()> {
    let brain = brain_from_args(root)?;
    let items = brain.tasks(all)?;
    for t in items
        .iter()
        .filter(|t| project.as_deref().is_none_or(|p| t.project == p))
    {
        println!("{}", format_task(t));
    }
    Ok(())
}

pub fn handle_status(root: Option<PathBuf>, query: String, status: String) -> Result<()> {
    let brain = brain_from_args(root)?;
    let item = pick_task(&brain, &query)?;
    let line = mutate::set_status(&item, &status, brain.lock)?;
    eprintln!("status: {line}");
    Ok(())
}

pub fn handle_priority(root: Option<PathBuf>, query: String, value: String) -> Result<()> {
    let brain = brain_from_args(root)?;
    let value = match value.as_str() {
        "none" | "clear" => None,
        v => Some(v.parse::<u8>().map_err(|_| {
            BrainError::InvalidInput(format!("priority {v:?} is not 1, 2, 3 or none"))
        })?),
    };
    let item = pick_task(&brain, &query)?;
    let line = mutate::set_priority(&item, value, brain.lock)?;
    eprintln!("priority: {line}");
    Ok(())
}

pub fn handle_due(root: Option<PathBuf>, query: String, value: String) -> Result<()> {
    let brain = brain_from_args(root)?;
    let item = pick_task(&brain, &query)?;
    let line = mutate::set_due_date(&item, &value, brain.lock)?;
    eprintln!("due: {line}");
    Ok(())
}

pub fn handle_tag(root: Option<PathBuf>, query: String, tags: Vec<String>) -> Result<()> {
    let brain = brain_from_args(root)?;
    let item = pick_task(&brain, &query)?;
    let line = mutate::add_tags(&item, &tags, brain.lock)?;
    eprintln!("tag: {line}");
    Ok(())
}

pub fn handle_untag(root: Option<PathBuf>, query: String, tags: Vec<String>) -> Result<()> {
    let brain = brain_from_args(root)?;
    let item = pick_task(&brain, &query)?;
    let line = mutate::remove_tags(&item, &tags, brain.lock)?;
    eprintln!("untag: {line}");
    Ok(())
}

pub fn handle_rm(root: Option<PathBuf>, query: String, yes: bool) -> Result<()> {
    let brain = brain_from_args(root)?;
    let item = pick_task(&brain, &query)?;
    if !yes && !confirm(&format!("delete {}?", describe_task(&item)))? {
        eprintln!("rm: cancelled");
        return Ok(());
    }
    mutate::delete_line(&item, brain.lock)?;
    eprintln!("rm: {} {}", item.id, item.content);
    Ok(())
}

pub fn handle_projects(root: Option<PathBuf>) -> Result<()> {
    let brain = brain_from_args(root)?;
    for p in brain.projects()? {
        let mark = if p.focused { "*" } else { " " };
        println!(
            "{mark} {:<20} {:>3} open  {:>2} repos",
            p.name, p.open_tasks, p.repos
        );
    }
    Ok(())
}

pub fn handle_project(root: Option<PathBuf>, name: String) -> Result<()> {
    let brain = brain_from_args(root)?;
    let dir = brain.create_project(&name)?;
    eprintln!("project: {}", dir.display());
    Ok(())
}

pub fn handle_notes(root: Option<PathBuf>, project: Option<String>) -> Result<()> {
    let brain = brain_from_args(root)?;
    let project = project_or_focus(&brain, project)?;
    for n in brain.notes(&project)? {
        println!(
            "{:<10}  {:<40}  {}",
            n.created.as_deref().unwrap_or("-"),
            n.filename,
            n.title
        );
    }
    Ok(())
}
