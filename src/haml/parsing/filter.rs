//! Filter block accumulation
//!
//!     A `:name` line opens a filter whose body is every following line indented deeper than
//!     the filter line itself. Body lines are captured raw: the body's own indentation (that of
//!     its first line) is removed and anything beyond it is kept, so nested indentation inside
//!     embedded scripts or styles survives.
//!
//!     The accumulator is fed one raw line at a time and reports when the block has closed.
//!     The line that closes a block is not part of it; the driver goes on to parse that line
//!     normally. Blank lines at the end of a block are trimmed off the body and reported as a
//!     count, so the driver can still give each of them a placeholder.

use crate::haml::ast::{Filter, Node, NodeKind};
use crate::haml::lexing::indentation::split;
use tracing::debug;

/// A filter block that has just closed
#[derive(Debug, Clone, PartialEq)]
pub struct FilterOutcome {
    pub filter: Node,
    /// Blank lines trimmed from the end of the body
    pub trailing_blank_lines: usize,
}

#[derive(Debug, Clone, Default)]
pub struct FilterParser {
    node: Option<Node>,
    body_indent: Option<usize>,
}

impl FilterParser {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn enabled(&self) -> bool {
        self.node.is_some()
    }

    pub fn start(&mut self, name: &str, filename: Option<String>, lineno: usize) {
        debug!(name, lineno, "filter opened");
        let filter = Filter {
            name: name.to_string(),
            texts: Vec::new(),
        };
        self.node = Some(Node::new(filter, filename, lineno));
        self.body_indent = None;
    }

    /// Feed one raw line. `current_level` is the indentation of the filter line itself.
    pub fn append(&mut self, line: &str, current_level: usize) -> Option<FilterOutcome> {
        let (indent, text) = split(line);
        if text.is_empty() {
            self.push_text(String::new());
            return None;
        }
        let indent_level = indent.len();

        match self.body_indent {
            Some(body) if indent_level < body => self.close(),
            Some(body) => {
                self.push_text(line[body..].to_string());
                None
            }
            None if indent_level > current_level => {
                self.body_indent = Some(indent_level);
                self.push_text(text.to_string());
                None
            }
            // the line after the filter is not nested: empty filter
            None => self.close(),
        }
    }

    /// Flush an open filter at end of input
    pub fn finish(&mut self) -> Option<FilterOutcome> {
        if self.enabled() {
            self.close()
        } else {
            None
        }
    }

    fn push_text(&mut self, text: String) {
        if let Some(filter) = self.filter_mut() {
            filter.texts.push(text);
        }
    }

    fn filter_mut(&mut self) -> Option<&mut Filter> {
        match self.node.as_mut().map(|node| &mut node.kind) {
            Some(NodeKind::Filter(filter)) => Some(filter),
            _ => None,
        }
    }

    fn close(&mut self) -> Option<FilterOutcome> {
        let mut node = self.node.take()?;
        self.body_indent = None;

        let mut trailing_blank_lines = 0;
        if let NodeKind::Filter(filter) = &mut node.kind {
            while filter.texts.last().is_some_and(|t| t.is_empty()) {
                filter.texts.pop();
                trailing_blank_lines += 1;
            }
            debug!(name = %filter.name, lines = filter.texts.len(), "filter closed");
        }

        Some(FilterOutcome {
            filter: node,
            trailing_blank_lines,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(outcome: &FilterOutcome) -> Vec<String> {
        outcome
            .filter
            .kind
            .as_filter()
            .map(|f| f.texts.clone())
            .unwrap_or_default()
    }

    #[test]
    fn test_captures_body_with_relative_indent() {
        let mut parser = FilterParser::new();
        parser.start("javascript", None, 5);
        assert!(parser.append("    (function() {", 2).is_none());
        assert!(parser.append("      alert('hello');", 2).is_none());
        assert!(parser.append("    })();", 2).is_none());
        let outcome = parser.append("- if 1.even?", 2).expect("filter to close");

        assert_eq!(
            texts(&outcome),
            vec!["(function() {", "  alert('hello');", "})();"]
        );
        assert_eq!(outcome.filter.lineno, 5);
        assert_eq!(outcome.trailing_blank_lines, 0);
        assert!(!parser.enabled());
    }

    #[test]
    fn test_inner_blank_lines_kept_trailing_trimmed() {
        let mut parser = FilterParser::new();
        parser.start("plain", None, 1);
        parser.append("  a", 0);
        parser.append("", 0);
        parser.append("  b", 0);
        parser.append("", 0);
        parser.append("", 0);
        let outcome = parser.append("%p", 0).expect("filter to close");

        assert_eq!(texts(&outcome), vec!["a", "", "b"]);
        assert_eq!(outcome.trailing_blank_lines, 2);
    }

    #[test]
    fn test_empty_filter() {
        let mut parser = FilterParser::new();
        parser.start("css", None, 1);
        let outcome = parser.append("%p", 0).expect("filter to close");
        assert!(texts(&outcome).is_empty());
    }

    #[test]
    fn test_finish_flushes_open_filter() {
        let mut parser = FilterParser::new();
        assert!(parser.finish().is_none());
        parser.start("plain", None, 1);
        parser.append("  text", 0);
        parser.append("", 0);
        let outcome = parser.finish().expect("open filter");
        assert_eq!(texts(&outcome), vec!["text"]);
        assert_eq!(outcome.trailing_blank_lines, 1);
        assert!(!parser.enabled());
    }
}
