//! AST Snapshot - a nested field-name to value export of the tree
//!
//! The snapshot is the canonical, format-agnostic view of a parsed template: every node becomes
//! a mapping with a `type` tag, its location, its own fields and (for containers) a `children`
//! list, recursively expanded. Containers always export `children`, even when empty, and absent
//! optional values are exported as `null` rather than left out.
//!
//! All serializers in [`formats`](crate::haml::formats) consume this output instead of walking
//! the arena themselves. Exporting is read-only, so exporting twice yields equal values.

use super::elements::{Node, NodeKind};
use super::tree::{Ast, NodeId};
use serde_json::{json, Map, Value};

/// Snapshot of the whole tree, starting at the root
pub fn snapshot(ast: &Ast) -> Value {
    snapshot_node(ast, ast.root())
}

/// Snapshot of a single node and everything below it
pub fn snapshot_node(ast: &Ast, id: NodeId) -> Value {
    build(ast, ast.get(id))
}

fn build(ast: &Ast, node: &Node) -> Value {
    let mut map = Map::new();
    map.insert("type".to_string(), json!(node.node_type()));

    // The root has no location of its own
    if !matches!(node.kind, NodeKind::Root(_)) {
        map.insert("filename".to_string(), json!(node.filename));
        map.insert("lineno".to_string(), json!(node.lineno));
    }

    match &node.kind {
        NodeKind::Root(_) | NodeKind::HamlComment(_) | NodeKind::Empty(_) => {}
        NodeKind::Doctype(d) => {
            map.insert("doctype".to_string(), json!(d.doctype));
        }
        NodeKind::Element(e) => {
            map.insert("tag_name".to_string(), json!(e.tag_name));
            map.insert("static_class".to_string(), json!(e.static_class));
            map.insert("static_id".to_string(), json!(e.static_id));
            map.insert("attributes".to_string(), json!(e.attributes));
            let oneline = match &e.oneline_child {
                Some(child) => build(ast, child),
                None => Value::Null,
            };
            map.insert("oneline_child".to_string(), oneline);
            map.insert("self_closing".to_string(), json!(e.self_closing));
            map.insert(
                "nuke_inner_whitespace".to_string(),
                json!(e.nuke_inner_whitespace),
            );
            map.insert(
                "nuke_outer_whitespace".to_string(),
                json!(e.nuke_outer_whitespace),
            );
        }
        NodeKind::Script(s) => {
            map.insert("script".to_string(), json!(s.script));
            map.insert("keyword".to_string(), json!(s.keyword.map(|k| k.as_str())));
            map.insert("escape_html".to_string(), json!(s.escape_html));
            map.insert("preserve".to_string(), json!(s.preserve));
        }
        NodeKind::SilentScript(s) => {
            map.insert("script".to_string(), json!(s.script));
            map.insert("keyword".to_string(), json!(s.keyword.map(|k| k.as_str())));
            map.insert("mid_block_keyword".to_string(), json!(s.mid_block_keyword));
        }
        NodeKind::HtmlComment(c) => {
            map.insert("comment".to_string(), json!(c.comment));
            map.insert("conditional".to_string(), json!(c.conditional));
        }
        NodeKind::Text(t) => {
            map.insert("text".to_string(), json!(t.text));
            map.insert("escape_html".to_string(), json!(t.escape_html));
        }
        NodeKind::Filter(f) => {
            map.insert("name".to_string(), json!(f.name));
            map.insert("texts".to_string(), json!(f.texts));
        }
    }

    if let Some(children) = node.kind.children() {
        let children: Vec<Value> = children
            .iter()
            .map(|child| build(ast, ast.get(*child)))
            .collect();
        map.insert("children".to_string(), Value::Array(children));
    }

    Value::Object(map)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::haml::ast::elements::{Element, Empty, Text};

    #[test]
    fn test_empty_root_has_children_entry() {
        let ast = Ast::new();
        assert_eq!(snapshot(&ast), json!({ "type": "root", "children": [] }));
    }

    #[test]
    fn test_absent_optionals_are_null() {
        let mut ast = Ast::new();
        let root = ast.root();
        ast.append_node(root, Node::new(Element::default(), None, 1));

        let value = snapshot(&ast);
        let element = &value["children"][0];
        assert_eq!(element["filename"], Value::Null);
        assert_eq!(element["oneline_child"], Value::Null);
        assert_eq!(element["children"], json!([]));
    }

    #[test]
    fn test_leaves_have_no_children_entry() {
        let mut ast = Ast::new();
        let root = ast.root();
        ast.append_node(root, Node::new(Text::new("hi"), Some("a.haml".into()), 1));
        ast.append_node(root, Node::new(Empty, Some("a.haml".into()), 2));

        let value = snapshot(&ast);
        assert_eq!(
            value["children"],
            json!([
                { "type": "text", "filename": "a.haml", "lineno": 1, "text": "hi", "escape_html": true },
                { "type": "empty", "filename": "a.haml", "lineno": 2 },
            ])
        );
    }
}
