//! Bracket balancing
//!
//!     Scans for the closer that brings the nesting depth back to zero. Used for conditional
//!     comments (`/[if IE]`) and attribute groups (`{...}`, `(...)`). Quotes are not special.

/// Outcome of a [`balance`] scan
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Balanced<'a> {
    /// Text before the matching closer, or the whole input when unbalanced
    pub prefix: &'a str,
    /// Text after the matching closer, empty when unbalanced
    pub rest: &'a str,
    /// Zero when a match was found
    pub depth: usize,
}

impl Balanced<'_> {
    pub fn is_balanced(&self) -> bool {
        self.depth == 0
    }
}

/// Scan `text`, which starts just after an opener already counted in `depth`
pub fn balance(text: &str, open: char, close: char, depth: usize) -> Balanced<'_> {
    let mut depth = depth;
    for (i, c) in text.char_indices() {
        if c == open {
            depth += 1;
        } else if c == close {
            depth = depth.saturating_sub(1);
            if depth == 0 {
                return Balanced {
                    prefix: &text[..i],
                    rest: &text[i + c.len_utf8()..],
                    depth,
                };
            }
        }
    }
    Balanced {
        prefix: text,
        rest: "",
        depth,
    }
}
