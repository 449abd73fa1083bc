//! Block keyword detection
//!
//!     Scripts that open or continue a block are tagged with their keyword so downstream
//!     consumers can fold `if`/`else`/`end` chains. Matching is ordered: the mid-block keywords
//!     are tried first at the start of the code (after an optional `-`), and only if none
//!     matches are the start-block keywords tried. Output expressions may assign the result of a
//!     block (`= x = if cond`), so for them an `ident(, ident)* =` prefix is skipped before the
//!     start-block keywords. A keyword must end on a word boundary.

use crate::haml::ast::BlockKeyword;
use once_cell::sync::Lazy;
use regex::Regex;

static MID_BLOCK: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^-?\s*(else|elsif|rescue|ensure|end|when)\b").expect("valid mid-block regex")
});

static START_BLOCK: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^-?\s*(if|begin|case|unless)\b").expect("valid start-block regex")
});

static START_BLOCK_WITH_ASSIGNMENT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^-?\s*(?:\w+(?:,\s*\w+)*\s*=\s*)?(if|begin|case|unless)\b")
        .expect("valid start-block regex")
});

/// Detect the block keyword `code` starts with.
///
/// `allow_assignment` enables skipping an assignment prefix before start-block keywords.
pub fn detect(code: &str, allow_assignment: bool) -> Option<BlockKeyword> {
    let start = if allow_assignment {
        &*START_BLOCK_WITH_ASSIGNMENT
    } else {
        &*START_BLOCK
    };
    MID_BLOCK
        .captures(code)
        .or_else(|| start.captures(code))
        .and_then(|caps| caps.get(1))
        .and_then(|m| BlockKeyword::from_word(m.as_str()))
}
