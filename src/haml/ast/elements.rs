//! Node kind definitions
//!
//!     Each node kind is a plain struct holding its own attributes. Nodes are built with
//!     defaults, adjusted through their public fields, and then handed to the arena; once
//!     appended to a parent they are not touched again, except for the child list of the node
//!     that is currently receiving lines.

use super::tree::NodeId;
use std::fmt;

/// A node of the tree: location plus the kind-specific payload
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub filename: Option<String>,
    /// One-based line of the node's first token
    pub lineno: usize,
    pub kind: NodeKind,
}

impl Node {
    pub fn new(kind: impl Into<NodeKind>, filename: Option<String>, lineno: usize) -> Self {
        Self {
            filename,
            lineno,
            kind: kind.into(),
        }
    }

    pub fn node_type(&self) -> &'static str {
        self.kind.node_type()
    }
}

/// The closed set of node kinds
#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    Root(Root),
    Doctype(Doctype),
    Element(Element),
    Script(Script),
    SilentScript(SilentScript),
    HtmlComment(HtmlComment),
    HamlComment(HamlComment),
    Text(Text),
    Filter(Filter),
    Empty(Empty),
}

impl NodeKind {
    /// The snake_case type tag used in snapshots
    pub fn node_type(&self) -> &'static str {
        match self {
            NodeKind::Root(_) => "root",
            NodeKind::Doctype(_) => "doctype",
            NodeKind::Element(_) => "element",
            NodeKind::Script(_) => "script",
            NodeKind::SilentScript(_) => "silent_script",
            NodeKind::HtmlComment(_) => "html_comment",
            NodeKind::HamlComment(_) => "haml_comment",
            NodeKind::Text(_) => "text",
            NodeKind::Filter(_) => "filter",
            NodeKind::Empty(_) => "empty",
        }
    }

    /// Child list of container kinds, `None` for leaves
    pub fn children(&self) -> Option<&[NodeId]> {
        match self {
            NodeKind::Root(n) => Some(&n.children),
            NodeKind::Element(n) => Some(&n.children),
            NodeKind::Script(n) => Some(&n.children),
            NodeKind::SilentScript(n) => Some(&n.children),
            NodeKind::HtmlComment(n) => Some(&n.children),
            NodeKind::HamlComment(n) => Some(&n.children),
            NodeKind::Doctype(_) | NodeKind::Text(_) | NodeKind::Filter(_) | NodeKind::Empty(_) => {
                None
            }
        }
    }

    pub fn children_mut(&mut self) -> Option<&mut Vec<NodeId>> {
        match self {
            NodeKind::Root(n) => Some(&mut n.children),
            NodeKind::Element(n) => Some(&mut n.children),
            NodeKind::Script(n) => Some(&mut n.children),
            NodeKind::SilentScript(n) => Some(&mut n.children),
            NodeKind::HtmlComment(n) => Some(&mut n.children),
            NodeKind::HamlComment(n) => Some(&mut n.children),
            NodeKind::Doctype(_) | NodeKind::Text(_) | NodeKind::Filter(_) | NodeKind::Empty(_) => {
                None
            }
        }
    }

    pub fn is_container(&self) -> bool {
        self.children().is_some()
    }

    pub fn as_element(&self) -> Option<&Element> {
        match self {
            NodeKind::Element(e) => Some(e),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&Text> {
        match self {
            NodeKind::Text(t) => Some(t),
            _ => None,
        }
    }

    pub fn as_script(&self) -> Option<&Script> {
        match self {
            NodeKind::Script(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_silent_script(&self) -> Option<&SilentScript> {
        match self {
            NodeKind::SilentScript(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_filter(&self) -> Option<&Filter> {
        match self {
            NodeKind::Filter(f) => Some(f),
            _ => None,
        }
    }

    pub fn is_empty_line(&self) -> bool {
        matches!(self, NodeKind::Empty(_))
    }
}

macro_rules! impl_from_kind {
    ($($variant:ident),* $(,)?) => {
        $(
            impl From<$variant> for NodeKind {
                fn from(node: $variant) -> Self {
                    NodeKind::$variant(node)
                }
            }
        )*
    };
}

impl_from_kind!(
    Root,
    Doctype,
    Element,
    Script,
    SilentScript,
    HtmlComment,
    HamlComment,
    Text,
    Filter,
    Empty,
);

/// The top-level container, created once per parse
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Root {
    pub children: Vec<NodeId>,
}

/// `!!!` header command
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Doctype {
    pub doctype: String,
}

/// A markup element (`%tag`, or the `.class` / `#id` div shorthand)
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Element {
    pub tag_name: String,
    pub static_class: String,
    pub static_id: String,
    /// Raw attribute text, delimiters stripped
    pub attributes: String,
    /// Content given on the same line as the tag
    pub oneline_child: Option<Box<Node>>,
    /// Never has children when set
    pub self_closing: bool,
    pub nuke_inner_whitespace: bool,
    pub nuke_outer_whitespace: bool,
    pub children: Vec<NodeId>,
}

/// Output expression (`= expr`)
#[derive(Debug, Clone, PartialEq)]
pub struct Script {
    pub script: String,
    pub escape_html: bool,
    pub preserve: bool,
    pub keyword: Option<BlockKeyword>,
    pub children: Vec<NodeId>,
}

impl Default for Script {
    fn default() -> Self {
        Self {
            script: String::new(),
            escape_html: true,
            preserve: false,
            keyword: None,
            children: Vec::new(),
        }
    }
}

/// Control-flow statement (`- stmt`)
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SilentScript {
    pub script: String,
    pub mid_block_keyword: bool,
    pub keyword: Option<BlockKeyword>,
    pub children: Vec<NodeId>,
}

/// Markup-visible comment (`/`)
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HtmlComment {
    /// Inline text; once non-empty nothing may be nested
    pub comment: String,
    pub conditional: String,
    pub children: Vec<NodeId>,
}

/// Author-only comment (`-#`). Its children are plain text, never dispatched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HamlComment {
    pub children: Vec<NodeId>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Text {
    pub text: String,
    pub escape_html: bool,
}

impl Text {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            escape_html: true,
        }
    }
}

impl Default for Text {
    fn default() -> Self {
        Self::new(String::new())
    }
}

/// `:name` block whose body lines are kept verbatim
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Filter {
    pub name: String,
    pub texts: Vec<String>,
}

/// Placeholder for a blank line
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Empty;

/// Keywords that open or continue a block of embedded code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BlockKeyword {
    // mid-block
    Else,
    Elsif,
    Rescue,
    Ensure,
    When,
    End,
    // start-block
    If,
    Unless,
    Begin,
    Case,
}

impl BlockKeyword {
    pub const MID_BLOCK: [BlockKeyword; 6] = [
        BlockKeyword::Else,
        BlockKeyword::Elsif,
        BlockKeyword::Rescue,
        BlockKeyword::Ensure,
        BlockKeyword::When,
        BlockKeyword::End,
    ];

    pub const START_BLOCK: [BlockKeyword; 4] = [
        BlockKeyword::If,
        BlockKeyword::Unless,
        BlockKeyword::Begin,
        BlockKeyword::Case,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            BlockKeyword::Else => "else",
            BlockKeyword::Elsif => "elsif",
            BlockKeyword::Rescue => "rescue",
            BlockKeyword::Ensure => "ensure",
            BlockKeyword::When => "when",
            BlockKeyword::End => "end",
            BlockKeyword::If => "if",
            BlockKeyword::Unless => "unless",
            BlockKeyword::Begin => "begin",
            BlockKeyword::Case => "case",
        }
    }

    pub fn is_mid_block(&self) -> bool {
        Self::MID_BLOCK.contains(self)
    }

    pub fn from_word(word: &str) -> Option<Self> {
        Self::MID_BLOCK
            .iter()
            .chain(Self::START_BLOCK.iter())
            .copied()
            .find(|keyword| keyword.as_str() == word)
    }
}

impl fmt::Display for BlockKeyword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
