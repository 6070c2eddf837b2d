use std::fs;
use std::io::Write;
use std::path::Path;

use tempfile::Builder;
use tracing::debug;

use crate::error::Result;

#[cfg(unix)]
const NEW_FILE_MODE: u32 = 0o644;

fn parent_dir(target: &Path) -> &Path {
    match target.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    }
}

/// Replace `target` with `data` so readers see either the old or the new
/// bytes, never a mix.
///
/// The bytes go to a hidden sibling temp file that is synced, given the
/// target's permissions and renamed over the target. Any failure before the
/// rename drops the temp file and leaves the target untouched.
pub fn atomic_write(target: &Path, data: &[u8]) -> Result<()> {
    let dir = parent_dir(target);
    let name = target
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let mut tmp = Builder::new()
        .prefix(&format!(".{name}."))
        .suffix(".tmp")
        .tempfile_in(dir)?;

    tmp.write_all(data)?;
    tmp.flush()?;
    tmp.as_file().sync_all()?;

    match fs::metadata(target) {
        Ok(md) => tmp.as_file().set_permissions(md.permissions())?,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            #[cfg(unix)]
            {
                use std::os::unix::fs::PermissionsExt;
                tmp.as_file()
                    .set_permissions(fs::Permissions::from_mode(NEW_FILE_MODE))?;
            }
        }
        Err(e) => return Err(e.into()),
    }

    tmp.persist(target).map_err(|e| e.error)?;
    debug!(path = %target.display(), bytes = data.len(), "atomic write");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entries(dir: &Path) -> Vec<String> {
        let mut v: Vec<String> = fs::read_dir(dir)
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        v.sort();
        v
    }

    #[test]
    fn leaves_only_the_target() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("todo.md");
        fs::write(&target, "old contents that are longer\n").unwrap();

        atomic_write(&target, b"- [ ] new\n").unwrap();

        assert_eq!(fs::read(&target).unwrap(), b"- [ ] new\n");
        assert_eq!(entries(dir.path()), vec!["todo.md"]);
    }

    #[test]
    fn creates_missing_target() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("dump.md");
        atomic_write(&target, b"").unwrap();
        assert!(target.exists());
        assert_eq!(entries(dir.path()), vec!["dump.md"]);
    }

    #[cfg(unix)]
    #[test]
    fn keeps_existing_permissions() {
        use std::os::unix::fs::PermissionsExt;
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("todo.md");
        fs::write(&target, "x").unwrap();
        fs::set_permissions(&target, fs::Permissions::from_mode(0o600)).unwrap();

        atomic_write(&target, b"y").unwrap();

        let mode = fs::metadata(&target).unwrap().permissions().mode() & 0o777;
        assert_eq!(mode, 0o600);
    }

    #[test]
    fn missing_directory_fails_cleanly() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("nope").join("todo.md");
        assert!(atomic_write(&target, b"x").is_err());
        assert!(!target.exists());
    }
}
