//! Line-level collaborators of the parser
//!
//!     Haml is parsed a line at a time, so "lexing" here is about lines rather than tokens:
//!
//!     - [`line_source`] hands out logical lines, folding `|` continuations, or raw lines
//!       while a filter body is being captured.
//!     - [`indentation`] strips leading whitespace and turns depth changes into
//!       [`IndentEvent`](indentation::IndentEvent)s.
//!     - [`multiline`] pulls the continuation lines of embedded code ending in a comma.
//!     - [`balance`] scans for a matching closing bracket.

pub mod balance;
pub mod indentation;
pub mod line_source;
pub mod multiline;

pub use balance::{balance, Balanced};
pub use indentation::{IndentEvent, IndentTracker, Processed};
pub use line_source::LineSource;
