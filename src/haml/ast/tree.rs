//! Arena storage for the AST
//!
//!     All nodes of a parse live in one `Vec`, addressed by [`NodeId`]. Index 0 is always the
//!     root. Child lists hold ids, so relocating a node is a matter of popping its id off one
//!     list and pushing it onto another.

use super::elements::{Node, NodeKind, Root};

/// Index of a node inside its [`Ast`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// A parsed template
#[derive(Debug, Clone, PartialEq)]
pub struct Ast {
    nodes: Vec<Node>,
}

impl Ast {
    /// A tree holding only an empty root
    pub fn new() -> Self {
        Self {
            nodes: vec![Node::new(Root::default(), None, 0)],
        }
    }

    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    /// Store a node without attaching it anywhere
    pub fn push(&mut self, node: Node) -> NodeId {
        self.nodes.push(node);
        NodeId(self.nodes.len() - 1)
    }

    pub fn get(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    pub fn get_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.0]
    }

    pub fn kind(&self, id: NodeId) -> &NodeKind {
        &self.nodes[id.0].kind
    }

    /// Children of `id`; leaves have none
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.kind(id).children().unwrap_or(&[])
    }

    /// Append `child` as the last child of `parent`.
    ///
    /// Returns false when `parent` is a leaf kind.
    pub fn append(&mut self, parent: NodeId, child: NodeId) -> bool {
        match self.nodes[parent.0].kind.children_mut() {
            Some(children) => {
                children.push(child);
                true
            }
            None => false,
        }
    }

    /// Store `node` and append it to `parent` in one step
    pub fn append_node(&mut self, parent: NodeId, node: Node) -> NodeId {
        let id = self.push(node);
        self.append(parent, id);
        id
    }

    pub fn last_child(&self, id: NodeId) -> Option<NodeId> {
        self.children(id).last().copied()
    }

    pub fn pop_child(&mut self, id: NodeId) -> Option<NodeId> {
        self.nodes[id.0].kind.children_mut()?.pop()
    }

    /// Pop every trailing `Empty` child of `id`, returned in document order
    pub fn take_trailing_empties(&mut self, id: NodeId) -> Vec<NodeId> {
        let mut empties = Vec::new();
        while let Some(last) = self.last_child(id) {
            if !self.kind(last).is_empty_line() {
                break;
            }
            self.pop_child(id);
            empties.push(last);
        }
        empties.reverse();
        empties
    }

    /// Insert `ids` in front of the existing children of `id`
    pub fn prepend_children(&mut self, id: NodeId, ids: Vec<NodeId>) -> bool {
        match self.nodes[id.0].kind.children_mut() {
            Some(children) => {
                children.splice(0..0, ids);
                true
            }
            None => false,
        }
    }

    /// Depth-first, document-order walk over every node reachable through child lists
    pub fn iter_all_nodes(&self) -> impl Iterator<Item = (NodeId, &Node)> + '_ {
        let mut stack = vec![self.root()];
        std::iter::from_fn(move || {
            let id = stack.pop()?;
            stack.extend(self.children(id).iter().rev().copied());
            Some((id, self.get(id)))
        })
    }

    /// Number of stored nodes, including the root
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.children(self.root()).is_empty()
    }
}

impl Default for Ast {
    fn default() -> Self {
        Self::new()
    }
}
