//! Line source
//!
//!     Splits the template into physical lines (trailing whitespace removed) and hands them out
//!     one logical line at a time.
//!
//!     Outside filters, a run of lines ending in ` |` is folded into one logical line. The
//!     pieces are joined with `\n` so the driver can tell how many physical lines were folded;
//!     the trailing pipe is dropped and every piece after the first is left-trimmed. A line like
//!     `- foo.each do | bar |` is a block argument list, not a continuation.
//!
//!     Inside a filter the line is handed back raw, indentation and all.

use once_cell::sync::Lazy;
use regex::Regex;

const MULTILINE_SUFFIX: &str = " |";

static BLOCK_WITH_SPACES: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"do\s*\|\s*[^|]*\s+\|$").expect("valid block-argument regex"));

#[derive(Debug, Clone)]
pub struct LineSource<'a> {
    filename: Option<String>,
    lines: Vec<&'a str>,
    lineno: usize,
}

impl<'a> LineSource<'a> {
    pub fn new(filename: Option<String>, source: &'a str) -> Self {
        let lines = source.lines().map(str::trim_end).collect();
        Self {
            filename,
            lines,
            lineno: 0,
        }
    }

    pub fn has_next(&self) -> bool {
        self.lineno < self.lines.len()
    }

    /// Number of physical lines consumed so far (the one-based number of the last one)
    pub fn lineno(&self) -> usize {
        self.lineno
    }

    pub fn filename(&self) -> Option<&str> {
        self.filename.as_deref()
    }

    /// Next logical line, or `None` at end of input.
    ///
    /// In filter mode the raw physical line is returned without folding.
    pub fn next_line(&mut self, in_filter: bool) -> Option<String> {
        let line = self.move_next()?;
        if !in_filter && is_multiline(line) {
            Some(self.next_multiline(line))
        } else {
            Some(line.to_string())
        }
    }

    fn move_next(&mut self) -> Option<&'a str> {
        let line = self.lines.get(self.lineno).copied()?;
        self.lineno += 1;
        Some(line)
    }

    fn move_back(&mut self) {
        self.lineno -= 1;
    }

    fn next_multiline(&mut self, first: &str) -> String {
        let mut buf = vec![strip_pipe(first).to_string()];
        while let Some(line) = self.move_next() {
            if is_multiline(line) {
                buf.push(strip_pipe(line).trim_start().to_string());
            } else {
                self.move_back();
                break;
            }
        }
        buf.join("\n")
    }
}

fn is_multiline(line: &str) -> bool {
    line.ends_with(MULTILINE_SUFFIX) && !BLOCK_WITH_SPACES.is_match(line)
}

fn strip_pipe(line: &str) -> &str {
    line.strip_suffix('|').unwrap_or(line)
}
