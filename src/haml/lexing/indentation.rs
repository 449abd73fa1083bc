//! Indentation tracking
//!
//!     Strips the leading indentation of each line and compares it with the stack of indent
//!     levels seen so far, turning depth changes into [`IndentEvent`]s:
//!
//!     - deeper than the top of the stack: the level is pushed and one `Enter` is emitted
//!     - shallower: one `Leave` per popped level; the line must land exactly on a level that is
//!       already on the stack
//!     - blank lines never change depth
//!
//!     Events are returned to the driver rather than fired as callbacks, and the driver applies
//!     them in order before classifying the line's content. The tracker's own state is already
//!     updated when the events are handed out, which is what [`IndentTracker::check_indent_level`]
//!     and [`IndentTracker::enter_comment`] rely on.
//!
//! Comments
//!
//!     Inside an author-only comment the content is free-form, so once the driver calls
//!     [`IndentTracker::enter_comment`] lines deeper than the comment itself neither push nor
//!     pop levels, however their indentation varies. Comment mode ends when a line comes back
//!     to the comment's own level or shallower.
//!
//! Legality
//!
//!     - indentation must be made of spaces; a hard tab is an error
//!     - each nesting step must have the same width as the step before it
//!       ([`IndentTracker::check_indent_level`], called by the driver on every enter)
//!     - dedenting to a level that was never opened is an error

use crate::haml::error::{ParseResult, SyntaxError};

/// A depth change detected while processing a line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndentEvent {
    /// The line opened a new, deeper level (its width in spaces)
    Enter { level: usize },
    /// A level was closed; `level` is the indentation of the line that closed it
    Leave { level: usize },
}

/// Result of processing one line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Processed<'a> {
    /// The line without its leading indentation
    pub text: &'a str,
    /// The stripped indentation itself
    pub indent: &'a str,
    pub events: Vec<IndentEvent>,
}

#[derive(Debug, Clone)]
pub struct IndentTracker {
    indent_levels: Vec<usize>,
    comment_level: Option<usize>,
}

impl IndentTracker {
    pub fn new() -> Self {
        Self {
            indent_levels: vec![0],
            comment_level: None,
        }
    }

    pub fn process<'a>(&mut self, line: &'a str, lineno: usize) -> ParseResult<Processed<'a>> {
        let (indent, text) = split(line);
        if indent.contains('\t') {
            return Err(SyntaxError::new(
                "Indenting with hard tabs is not allowed.",
                lineno,
            ));
        }

        let mut events = Vec::new();
        if !text.is_empty() {
            self.track(indent.len(), lineno, &mut events)?;
        }
        Ok(Processed {
            text,
            indent,
            events,
        })
    }

    /// Close every open level at end of input
    pub fn finish(&mut self) -> Vec<IndentEvent> {
        let mut events = Vec::new();
        self.comment_level = None;
        while self.indent_levels.len() > 1 {
            self.indent_levels.pop();
            events.push(IndentEvent::Leave { level: 0 });
        }
        events
    }

    /// Stop depth-checking until the comment that was just entered is closed
    pub fn enter_comment(&mut self) {
        let depth = self.indent_levels.len();
        self.comment_level = depth.checked_sub(2).map(|i| self.indent_levels[i]);
    }

    pub fn in_comment(&self) -> bool {
        self.comment_level.is_some()
    }

    /// Check that the step just entered is as wide as the one before it
    pub fn check_indent_level(&self, lineno: usize) -> ParseResult<()> {
        let levels = &self.indent_levels;
        if levels.len() >= 3 {
            let n = levels.len();
            let previous_size = levels[n - 2] - levels[n - 3];
            let current_size = levels[n - 1] - levels[n - 2];
            if previous_size != current_size {
                return Err(SyntaxError::new(
                    format!(
                        "Inconsistent indentation: {} spaces used for indentation, but the rest of the document was indented using {} spaces",
                        current_size, previous_size
                    ),
                    lineno,
                ));
            }
        }
        Ok(())
    }

    /// Indentation of the innermost open level
    pub fn current_level(&self) -> usize {
        self.indent_levels.last().copied().unwrap_or(0)
    }

    /// Number of open levels, not counting the document level
    pub fn depth(&self) -> usize {
        self.indent_levels.len() - 1
    }

    fn track(
        &mut self,
        indent_level: usize,
        lineno: usize,
        events: &mut Vec<IndentEvent>,
    ) -> ParseResult<()> {
        let current = self.current_level();
        if indent_level > current {
            if self.comment_level.is_none() {
                self.indent_levels.push(indent_level);
                events.push(IndentEvent::Enter {
                    level: indent_level,
                });
            }
        } else if indent_level < current {
            self.leave(indent_level, lineno, events)?;
        }
        Ok(())
    }

    fn leave(
        &mut self,
        indent_level: usize,
        lineno: usize,
        events: &mut Vec<IndentEvent>,
    ) -> ParseResult<()> {
        match self.comment_level {
            // still inside the comment body: free-form, never depth-checked
            Some(level) if indent_level > level => return Ok(()),
            Some(_) => self.comment_level = None,
            None => {}
        }

        while indent_level < self.current_level() {
            self.indent_levels.pop();
            events.push(IndentEvent::Leave {
                level: indent_level,
            });
        }

        if indent_level != self.current_level() {
            return Err(SyntaxError::new(
                format!(
                    "Unexpected indent level: {}: indent_level={:?}",
                    indent_level, self.indent_levels
                ),
                lineno,
            ));
        }
        Ok(())
    }
}

impl Default for IndentTracker {
    fn default() -> Self {
        Self::new()
    }
}

/// Split a line into its leading whitespace and the rest
pub fn split(line: &str) -> (&str, &str) {
    let text = line.trim_start_matches([' ', '\t']);
    let indent = &line[..line.len() - text.len()];
    (indent, text)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn events(tracker: &mut IndentTracker, line: &str) -> Vec<IndentEvent> {
        tracker.process(line, 1).expect("line to process").events
    }

    #[test]
    fn test_strips_indentation() {
        let mut tracker = IndentTracker::new();
        let processed = tracker.process("%p", 1).unwrap();
        assert_eq!(processed.text, "%p");
        let processed = tracker.process("  hello", 2).unwrap();
        assert_eq!(processed.text, "hello");
        assert_eq!(processed.indent, "  ");
    }

    #[test]
    fn test_enter_and_leave() {
        let mut tracker = IndentTracker::new();
        assert!(events(&mut tracker, "%div").is_empty());
        assert_eq!(
            events(&mut tracker, "  %p"),
            vec![IndentEvent::Enter { level: 2 }]
        );
        assert_eq!(
            events(&mut tracker, "    a"),
            vec![IndentEvent::Enter { level: 4 }]
        );
        assert_eq!(
            events(&mut tracker, "b"),
            vec![IndentEvent::Leave { level: 0 }, IndentEvent::Leave { level: 0 }]
        );
        assert_eq!(tracker.depth(), 0);
    }

    #[test]
    fn test_blank_lines_do_not_change_depth() {
        let mut tracker = IndentTracker::new();
        events(&mut tracker, "%div");
        events(&mut tracker, "  %p");
        assert!(events(&mut tracker, "").is_empty());
        assert!(events(&mut tracker, "      ").is_empty());
        assert_eq!(tracker.current_level(), 2);
    }

    #[test]
    fn test_hard_tabs_rejected() {
        let mut tracker = IndentTracker::new();
        let err = tracker.process("\t%p", 4).unwrap_err();
        assert_eq!(err.lineno, 4);
        assert!(err.message.contains("hard tabs"));
    }

    #[test]
    fn test_unknown_dedent_level_rejected() {
        let mut tracker = IndentTracker::new();
        events(&mut tracker, "%div");
        events(&mut tracker, "    %p");
        let err = tracker.process("  %p", 3).unwrap_err();
        assert!(err.message.starts_with("Unexpected indent level: 2"));
        assert_eq!(err.lineno, 3);
    }

    #[test]
    fn test_inconsistent_step_width() {
        let mut tracker = IndentTracker::new();
        events(&mut tracker, "%a");
        events(&mut tracker, "  %b");
        assert!(tracker.check_indent_level(2).is_ok());
        events(&mut tracker, "      %c");
        let err = tracker.check_indent_level(3).unwrap_err();
        assert!(err.message.starts_with("Inconsistent indentation: 4 spaces"));
    }

    #[test]
    fn test_comment_mode_suppresses_enters() {
        let mut tracker = IndentTracker::new();
        events(&mut tracker, "-#");
        assert_eq!(
            events(&mut tracker, "  a"),
            vec![IndentEvent::Enter { level: 2 }]
        );
        tracker.enter_comment();
        assert!(tracker.in_comment());
        assert!(events(&mut tracker, "        b").is_empty());
        assert!(events(&mut tracker, "  c").is_empty());
        assert_eq!(
            events(&mut tracker, "d"),
            vec![IndentEvent::Leave { level: 0 }]
        );
        assert!(!tracker.in_comment());
        assert_eq!(
            events(&mut tracker, "  e"),
            vec![IndentEvent::Enter { level: 2 }]
        );
    }

    #[test]
    fn test_comment_mode_ignores_shallower_body_lines() {
        let mut tracker = IndentTracker::new();
        events(&mut tracker, "%div");
        events(&mut tracker, "  -#");
        assert_eq!(
            events(&mut tracker, "      deep"),
            vec![IndentEvent::Enter { level: 6 }]
        );
        tracker.enter_comment();
        assert!(events(&mut tracker, "    less").is_empty());
        assert!(tracker.in_comment());
        assert_eq!(
            events(&mut tracker, "  %p"),
            vec![IndentEvent::Leave { level: 2 }]
        );
        assert!(!tracker.in_comment());
        assert_eq!(tracker.current_level(), 2);
    }

    #[test]
    fn test_finish_unwinds() {
        let mut tracker = IndentTracker::new();
        events(&mut tracker, "a");
        events(&mut tracker, "  b");
        events(&mut tracker, "    c");
        assert_eq!(tracker.finish().len(), 2);
        assert_eq!(tracker.depth(), 0);
        assert!(tracker.finish().is_empty());
    }
}
