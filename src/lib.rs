//! # haml-parser
//!
//! A front-end parser for Haml templates.
//!
//! Haml is indentation significant and line oriented: every line is classified by its leading
//! marker (`%` for elements, `-` for control flow, `=` for output, `/` for comments, `:` for
//! filters, ...) and nesting is expressed purely through indentation. This crate turns such a
//! template into a typed AST. Rendering that AST is left to downstream consumers.
//!
//! File Layout
//!
//! src/haml
//!   ├── ast        The node model, the arena that stores it, and the structural snapshot
//!   ├── lexing     Line-level collaborators: line source, indentation tracking, bracket
//!   │              balancing and multi-line continuation
//!   ├── parsing    Line grammars (element, script, filter), keyword tagging and the driver
//!   ├── formats    Serializers for the snapshot (json, yaml, treeviz)
//!   ├── config     Layered configuration for the command line tool
//!   └── error      The syntax error type shared by every stage
//!
//! The entry points are [`parse`](haml::parsing::parse) and
//! [`Parser`](haml::parsing::Parser).

pub mod haml;

pub use haml::ast::{Ast, Node, NodeId, NodeKind};
pub use haml::error::{ParseResult, SyntaxError};
pub use haml::parsing::{parse, parse_with_filename, Parser, ParserOptions};
