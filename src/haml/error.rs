//! Error types for parsing
//!
//!     Parsing is fail-fast: the first problem aborts the parse and is returned to the caller.
//!     There is a single error type, [`SyntaxError`], carrying a message and the one-based line
//!     it was raised on. The driver attaches the source filename (when one was supplied) on the
//!     way out, so collaborators never need to know about it.

use std::fmt;

/// A syntax error raised while parsing a template
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntaxError {
    /// Human-readable description of the problem
    pub message: String,
    /// One-based line number the error was raised on
    pub lineno: usize,
    /// Source identifier, attached by the driver when known
    pub filename: Option<String>,
}

impl SyntaxError {
    pub fn new(message: impl Into<String>, lineno: usize) -> Self {
        Self {
            message: message.into(),
            lineno,
            filename: None,
        }
    }

    /// Attach the source filename, keeping one that is already set
    pub fn with_filename(mut self, filename: Option<&str>) -> Self {
        if self.filename.is_none() {
            self.filename = filename.map(str::to_string);
        }
        self
    }
}

impl fmt::Display for SyntaxError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.filename {
            Some(filename) => write!(f, "{}:{}: {}", filename, self.lineno, self.message),
            None => write!(f, "{} (line {})", self.message, self.lineno),
        }
    }
}

impl std::error::Error for SyntaxError {}

/// Result alias used across the parser
pub type ParseResult<T> = Result<T, SyntaxError>;

/// Format source code context around an error line
///
/// Shows 2 lines before the error, the error line with >> marker, and 2 lines after.
/// All lines are numbered for easy reference. `lineno` is one-based.
pub fn format_source_context(source: &str, lineno: usize) -> String {
    let lines: Vec<&str> = source.lines().collect();
    let error_line = lineno.saturating_sub(1);

    let start_line = error_line.saturating_sub(2);
    let end_line = (error_line + 3).min(lines.len());

    let mut context = String::new();

    for (line_num, line) in lines.iter().enumerate().take(end_line).skip(start_line) {
        let marker = if line_num == error_line { ">>" } else { "  " };
        context.push_str(&format!("{} {:3} | {}\n", marker, line_num + 1, line));
    }

    context
}
