//! Advisory lock: a hidden `.{file}.lock` directory next to the target.
//! Creating a directory either succeeds or fails atomically, which makes it
//! a portable cross-process mutex. It is advisory only: anyone may remove it.

use std::fs;
use std::path::{Path, PathBuf};
use std::thread;
use std::time::Duration;

use tracing::{debug, warn};

use crate::error::{BrainError, Result};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LockOptions {
    pub attempts: u32,
    pub delay: Duration,
}

impl Default for LockOptions {
    fn default() -> Self {
        Self {
            attempts: 10,
            delay: Duration::from_millis(100),
        }
    }
}

pub fn lock_path(target: &Path) -> PathBuf {
    let name = target
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let lock = format!(".{name}.lock");
    match target.parent() {
        Some(p) => p.join(lock),
        None => PathBuf::from(lock),
    }
}

/// Remove a lock directory. A lock that is already gone is fine.
pub fn release_path(path: &Path) -> Result<()> {
    match fs::remove_dir(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e.into()),
    }
}

/// Held lock; released explicitly or on drop.
#[derive(Debug)]
pub struct DirLock {
    path: PathBuf,
    released: bool,
}

impl DirLock {
    /// Bounded wait: at most `attempts` tries, `delay` apart.
    pub fn acquire(target: &Path, opts: LockOptions) -> Result<Self> {
        let path = lock_path(target);
        let attempts = opts.attempts.max(1);
        for attempt in 1..=attempts {
            match fs::create_dir(&path) {
                Ok(()) => {
                    return Ok(Self {
                        path,
                        released: false,
                    });
                }
                Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => {
                    debug!(lock = %path.display(), attempt, "lock busy");
                    if attempt < attempts {
                        thread::sleep(opts.delay);
                    }
                }
                Err(e) => return Err(e.into()),
            }
        }
        warn!(lock = %path.display(), attempts, "lock contention");
        Err(BrainError::LockContention { path, attempts })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn release(mut self) -> Result<()> {
        self.released = true;
        release_path(&self.path)
    }
}

impl Drop for DirLock {
    fn drop(&mut self) {
        if !self.released {
            let _ = release_path(&self.path);
        }
    }
}

/// Run `f` while holding the lock for `target`; the lock is released
/// whether or not `f` fails. An error from `f` wins over a release error.
pub fn with_lock<T>(target: &Path, opts: LockOptions, f: impl FnOnce() -> Result<T>) -> Result<T> {
    let guard = DirLock::acquire(target, opts)?;
    let out = f();
    let released = guard.release();
    let value = out?;
    released?;
    Ok(value)
}
