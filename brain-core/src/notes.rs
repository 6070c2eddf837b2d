use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};

use once_cell::sync::Lazy;
use regex::Regex;
use time::Date;
use tracing::warn;
use walkdir::WalkDir;

use crate::domain::NoteFile;
use crate::error::Result;
use crate::persist::atomic::atomic_write;
use crate::util::ident::mtime_from;
use crate::util::today::format_date;

pub const NOTES_DIR: &str = "notes";

const SLUG_SOURCE_CHARS: usize = 40;
const FALLBACK_SLUG: &str = "note";

static CREATED: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^Created: (\d{4}-\d{2}-\d{2})").expect("valid regex"));

/// Filesystem-safe slug from the first 40 characters of a title.
pub fn slugify(title: &str) -> String {
    let mut slug = String::new();
    for c in title.chars().take(SLUG_SOURCE_CHARS).flat_map(char::to_lowercase) {
        let c = if c.is_whitespace() { '-' } else { c };
        if !(c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-') {
            continue;
        }
        if c == '-' && slug.ends_with('-') {
            continue;
        }
        slug.push(c);
    }
    let slug = slug.trim_matches('-');
    if slug.is_empty() {
        FALLBACK_SLUG.to_string()
    } else {
        slug.to_string()
    }
}

/// Claim `{date}-{slug}.md` in `dir`, or the first free `-1`, `-2`, ...
/// variant. The file is created empty so concurrent writers cannot pick the
/// same name.
fn claim_filename(dir: &Path, date: &str, slug: &str) -> Result<PathBuf> {
    let mut n = 0u32;
    loop {
        let name = if n == 0 {
            format!("{date}-{slug}.md")
        } else {
            format!("{date}-{slug}-{n}.md")
        };
        let path = dir.join(name);
        match OpenOptions::new().write(true).create_new(true).open(&path) {
            Ok(_) => return Ok(path),
            Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => n += 1,
            Err(e) => return Err(e.into()),
        }
    }
}

pub fn render_note(title: &str, created: &str, body: &[String]) -> String {
    let mut out = format!("# {title}\n\nCreated: {created}\n");
    if body.iter().any(|l| !l.trim().is_empty()) {
        out.push('\n');
        for line in body {
            out.push_str(line);
            out.push('\n');
        }
    }
    out
}

/// Write a new note file under `notes_dir`, returning its path.
pub fn write_note(notes_dir: &Path, title: &str, created: Date, body: &[String]) -> Result<PathBuf> {
    fs::create_dir_all(notes_dir)?;
    let date = format_date(created);
    let path = claim_filename(notes_dir, &date, &slugify(title))?;
    if let Err(e) = atomic_write(&path, render_note(title, &date, body).as_bytes()) {
        let _ = fs::remove_file(&path);
        return Err(e);
    }
    Ok(path)
}

/// Title from the first `# ` header, else the first non-empty line.
pub fn note_title(text: &str) -> Option<String> {
    let header = text
        .lines()
        .find_map(|l| l.strip_prefix("# ").map(|t| t.trim().to_string()));
    header.or_else(|| {
        text.lines()
            .map(str::trim)
            .find(|l| !l.is_empty())
            .map(|l| l.trim_start_matches('#').trim().to_string())
    })
}

pub fn note_created(text: &str) -> Option<String> {
    CREATED.captures(text).map(|c| c[1].to_string())
}

/// Markdown notes in `notes_dir`, newest modification first.
pub fn list_notes(notes_dir: &Path) -> Result<Vec<NoteFile>> {
    if !notes_dir.is_dir() {
        return Ok(Vec::new());
    }
    let mut notes = Vec::new();
    for entry in WalkDir::new(notes_dir).min_depth(1).max_depth(1) {
        let entry = entry.map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))?;
        let path = entry.path();
        if !entry.file_type().is_file() || path.extension().is_none_or(|e| e != "md") {
            continue;
        }
        let text = fs::read_to_string(path).unwrap_or_else(|e| {
            warn!(path = %path.display(), error = %e, "unreadable note, listing by file name");
            String::new()
        });
        let stem = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        notes.push(NoteFile {
            filename: entry.file_name().to_string_lossy().into_owned(),
            path: path.to_path_buf(),
            title: note_title(&text).unwrap_or(stem),
            created: note_created(&text),
            mtime: mtime_from(&entry.metadata().map_err(|e| {
                std::io::Error::new(std::io::ErrorKind::Other, e)
            })?),
        });
    }
    notes.sort_by(|a, b| b.mtime.cmp(&a.mtime).then_with(|| a.filename.cmp(&b.filename)));
    Ok(notes)
}
