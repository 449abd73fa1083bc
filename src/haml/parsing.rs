//! Parsing
//!
//!     The driver ([`parser`]) owns the line loop and the nesting stack. Grammars for the lines
//!     that need more than a prefix check live in their own modules:
//!
//!     - [`element`]: `%tag.class#id{attrs}(attrs)<>/ content`
//!     - [`script`]: output expressions and escaped / unescaped text
//!     - [`filter`]: raw capture of `:name` blocks
//!     - [`keywords`]: block keyword tagging for control-flow code

pub mod element;
pub mod filter;
pub mod keywords;
pub mod parser;
pub mod script;

pub use parser::{parse, parse_with_filename, Parser, ParserOptions};
