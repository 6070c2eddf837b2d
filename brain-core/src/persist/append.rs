use std::path::Path;

use crate::error::Result;
use crate::persist::atomic::atomic_write;
use crate::persist::lock::{LockOptions, with_lock};
use crate::util::lines::{Lines, read_lines};

/// Append `lines` to `target` under its lock. A missing target starts from
/// `template`.
pub fn append_lines(
    target: &Path,
    lines: &[String],
    template: &str,
    opts: LockOptions,
) -> Result<()> {
    with_lock(target, opts, || {
        let mut doc = if target.exists() {
            read_lines(target)?
        } else {
            Lines::parse(template)
        };
        for line in lines {
            doc.push(line.clone());
        }
        atomic_write(target, doc.render().as_bytes())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn starts_from_template_then_appends() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("todo.md");
        let opts = LockOptions::default();

        append_lines(&target, &["- [ ] one".into()], "# api\n\n", opts).unwrap();
        append_lines(&target, &["- [ ] two".into()], "# ignored\n", opts).unwrap();

        assert_eq!(
            fs::read_to_string(&target).unwrap(),
            "# api\n\n- [ ] one\n- [ ] two\n"
        );
    }
}
