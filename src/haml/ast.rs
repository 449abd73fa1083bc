//! AST definitions and utilities for haml templates
//!
//!     This module provides the Abstract Syntax Tree produced by the parser, the arena that
//!     stores it, and a structural snapshot used for serialization and equality-based testing.
//!
//! Node kinds
//!
//!     The node set is closed: root, doctype, element, script (output expression), silent
//!     script (control flow), html comment, haml comment (author only), text, filter and the
//!     empty placeholder for blank lines. Every node carries the source filename (optional) and
//!     the one-based line of its first token.
//!
//! Nesting
//!
//!     Nesting is expressed through indentation. Only some kinds can hold children: root,
//!     element, script, silent script and both comment kinds. Doctypes, text, filters and empty
//!     placeholders are leaves, and the parser refuses to nest anything under them.
//!
//!     There is no base type. Container kinds simply carry a `children` list of [`NodeId`]s, and
//!     [`NodeKind::children`] / [`NodeKind::children_mut`] are the one place that knows which
//!     kinds those are.
//!
//! Storage
//!
//!     Nodes live in a flat arena ([`Ast`]) and refer to each other by index. The parser keeps
//!     the index of the current context and a stack of indices, so moving blank-line placeholders
//!     between contexts is just moving indices between child lists.
//!
//! ## Modules
//!
//! - `elements` - Node kind definitions
//! - `tree` - The arena and its traversal helpers
//! - `snapshot` - Nested field-name to value export of a tree

pub mod elements;
pub mod snapshot;
pub mod tree;

pub use elements::{
    BlockKeyword, Doctype, Element, Empty, Filter, HamlComment, HtmlComment, Node, NodeKind, Root,
    Script, SilentScript, Text,
};
pub use snapshot::{snapshot, snapshot_node};
pub use tree::{Ast, NodeId};
