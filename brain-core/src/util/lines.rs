use std::path::Path;

use crate::error::Result;

/// A text file split into lines, remembering whether it ended with a newline.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Lines {
    pub lines: Vec<String>,
    pub trailing_newline: bool,
}

impl Lines {
    pub fn parse(text: &str) -> Self {
        Self {
            lines: text.lines().map(str::to_string).collect(),
            trailing_newline: text.is_empty() || text.ends_with('\n'),
        }
    }

    pub fn render(&self) -> String {
        let mut out = self.lines.join("\n");
        if self.trailing_newline && !self.lines.is_empty() {
            out.push('\n');
        }
        out
    }

    /// 1-indexed line lookup.
    pub fn get(&self, line: usize) -> Option<&str> {
        line.checked_sub(1)
            .and_then(|i| self.lines.get(i))
            .map(String::as_str)
    }

    pub fn push(&mut self, line: impl Into<String>) {
        self.lines.push(line.into());
        self.trailing_newline = true;
    }
}

/// Read a whole UTF-8 file into [`Lines`].
pub fn read_lines(path: &Path) -> Result<Lines> {
    Ok(Lines::parse(&std::fs::read_to_string(path)?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_missing_final_newline() {
        let l = Lines::parse("a\nb");
        assert_eq!(l.render(), "a\nb");
        let l = Lines::parse("a\r\nb\n");
        assert_eq!(l.lines, vec!["a", "b"]);
        assert_eq!(l.render(), "a\nb\n");
    }

    #[test]
    fn push_onto_unterminated_file() {
        let mut l = Lines::parse("# api");
        l.push("- [ ] x");
        assert_eq!(l.render(), "# api\n- [ ] x\n");
        assert_eq!(l.get(2), Some("- [ ] x"));
        assert_eq!(l.get(0), None);
    }
}
