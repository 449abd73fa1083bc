//! Treeviz formatter for parsed templates
//!
//! One line per node, nesting drawn with box connectors, so the shape of a template can be
//! checked at a glance:
//!
//! <linenum?><prefix><connector> <icon> <label> (label truncated to 30 characters)
//!
//! Example:
//!
//!   ⧉ template
//!   ├─ ‼ !!! 5
//!   └─ ⊞ %html
//!     ├─ ⊞ %head
//!     └─ − if user
//!       └─ = user.name
//!
//! Icons
//!     Root: ⧉
//!     Doctype: ‼
//!     Element: ⊞
//!     Script: =
//!     SilentScript: −
//!     HtmlComment: ⁄
//!     HamlComment: ♯
//!     Text: ◦
//!     Filter: ƒ
//!     Empty: ∅

use crate::haml::ast::{snapshot, Ast};
use serde_json::Value;

const LABEL_WIDTH: usize = 30;

fn truncate(s: &str, max_chars: usize) -> String {
    if s.chars().count() > max_chars {
        let mut truncated = s.chars().take(max_chars).collect::<String>();
        truncated.push_str("...");
        truncated
    } else {
        s.to_string()
    }
}

fn get_icon(node_type: &str) -> &'static str {
    match node_type {
        "root" => "⧉",
        "doctype" => "‼",
        "element" => "⊞",
        "script" => "=",
        "silent_script" => "−",
        "html_comment" => "⁄",
        "haml_comment" => "♯",
        "text" => "◦",
        "filter" => "ƒ",
        "empty" => "∅",
        _ => "○",
    }
}

fn str_field<'v>(node: &'v Value, key: &str) -> &'v str {
    node.get(key).and_then(Value::as_str).unwrap_or("")
}

/// Short human label for a node, built from its snapshot fields
fn label(node: &Value) -> String {
    let label = match str_field(node, "type") {
        "root" => "template".to_string(),
        "doctype" => format!("!!! {}", str_field(node, "doctype")).trim_end().to_string(),
        "element" => {
            let mut label = format!("%{}", str_field(node, "tag_name"));
            for class in str_field(node, "static_class").split_whitespace() {
                label.push('.');
                label.push_str(class);
            }
            let id = str_field(node, "static_id");
            if !id.is_empty() {
                label.push('#');
                label.push_str(id);
            }
            let attributes = str_field(node, "attributes");
            if !attributes.is_empty() {
                label.push_str(&format!("{{{}}}", attributes));
            }
            if node.get("self_closing").and_then(Value::as_bool) == Some(true) {
                label.push('/');
            }
            if let Some(child) = node.get("oneline_child").filter(|c| !c.is_null()) {
                label.push(' ');
                label.push_str(&label_text(child));
            }
            label
        }
        "html_comment" => {
            let conditional = str_field(node, "conditional");
            if conditional.is_empty() {
                str_field(node, "comment").to_string()
            } else {
                format!("[{}] {}", conditional, str_field(node, "comment"))
            }
        }
        "filter" => format!(":{}", str_field(node, "name")),
        "script" | "silent_script" => str_field(node, "script").to_string(),
        "haml_comment" | "empty" => String::new(),
        _ => label_text(node),
    };
    label.replace('\n', " ")
}

/// Inline content of an element, marked the way it was written
fn label_text(node: &Value) -> String {
    match str_field(node, "type") {
        "script" => format!("= {}", str_field(node, "script")),
        "silent_script" => format!("- {}", str_field(node, "script")),
        _ => str_field(node, "text").to_string(),
    }
}

fn children(node: &Value) -> &[Value] {
    node.get("children")
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or(&[])
}

fn format_snapshot(
    node: &Value,
    prefix: &str,
    child_index: usize,
    child_count: usize,
    show_linum: bool,
) -> String {
    let mut output = String::new();

    let is_last = child_index == child_count - 1;
    let connector = if is_last { "└─" } else { "├─" };
    let icon = get_icon(str_field(node, "type"));
    let truncated_label = truncate(&label(node), LABEL_WIDTH);

    let linum_prefix = if show_linum {
        let lineno = node.get("lineno").and_then(Value::as_u64).unwrap_or(0);
        format!("{:02} ", lineno)
    } else {
        String::new()
    };

    output.push_str(
        format!(
            "{}{}{} {} {}",
            linum_prefix, prefix, connector, icon, truncated_label
        )
        .trim_end(),
    );
    output.push('\n');

    let children = children(node);
    if !children.is_empty() {
        let child_prefix = format!("{}{}", prefix, if is_last { "  " } else { "│ " });
        for (i, child) in children.iter().enumerate() {
            output.push_str(&format_snapshot(
                child,
                &child_prefix,
                i,
                children.len(),
                show_linum,
            ));
        }
    }

    output
}

fn format_root_snapshot(root: &Value, show_linum: bool) -> String {
    let mut output = format!("{} {}\n", get_icon(str_field(root, "type")), label(root));
    let children = children(root);
    for (i, child) in children.iter().enumerate() {
        output.push_str(&format_snapshot(child, "", i, children.len(), show_linum));
    }
    output
}

pub fn to_treeviz_str(ast: &Ast) -> String {
    format_root_snapshot(&snapshot(ast), false)
}

/// Same as [`to_treeviz_str`], every node line prefixed with its line number
pub fn to_treeviz_str_with_linum(ast: &Ast) -> String {
    format_root_snapshot(&snapshot(ast), true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::haml::parsing::parse;

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 30), "short");
        assert_eq!(truncate("abcdef", 3), "abc...");
    }

    #[test]
    fn test_nested_connectors() {
        let ast = parse("%div.a#b\n  - if x\n    = y\n%br/").unwrap();
        let output = to_treeviz_str(&ast);
        let expected = [
            "⧉ template",
            "├─ ⊞ %div.a#b",
            "│ └─ − if x",
            "│   └─ = y",
            "└─ ⊞ %br/",
        ];
        assert_eq!(output.lines().collect::<Vec<_>>(), expected);
    }

    #[test]
    fn test_line_numbers_and_empty_lines() {
        let ast = parse("%p\n\n/ note").unwrap();
        let output = to_treeviz_str_with_linum(&ast);
        let expected = ["⧉ template", "01 ├─ ⊞ %p", "02 ├─ ∅", "03 └─ ⁄ note"];
        assert_eq!(output.lines().collect::<Vec<_>>(), expected);
    }
}
