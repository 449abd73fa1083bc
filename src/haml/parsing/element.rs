//! Element grammar
//!
//!     `%tag.class#id{hash: attrs}(html=attrs)<>/ content`
//!
//!     Pieces are consumed left to right:
//!
//!     1. tag name (`[-:\w]+`)
//!     2. any run of `.class` / `#id`; classes accumulate, the last id wins
//!     3. attribute groups, at most one `{...}` and one `(...)`, in either order; a group left
//!        open at the end of the line continues on the following source lines
//!     4. whitespace removal markers: `<` (inner), `>` (outer), or both
//!     5. `/` for a self-closing tag, which must end the line
//!     6. whatever is left becomes the inline child, parsed as an output expression
//!
//!     Attributes are kept as raw text; group delimiters are dropped and both groups, when
//!     present, are joined with `", "` in source order.

use super::script::ScriptParser;
use crate::haml::ast::{Element, Node};
use crate::haml::error::{ParseResult, SyntaxError};
use crate::haml::lexing::{balance, LineSource};
use once_cell::sync::Lazy;
use regex::Regex;

static ELEMENT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^%([-:\w]+)([-:\w.#]*)(.+)?$").expect("valid element regex"));

static CLASS_OR_ID: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([#.])([-:\w]+)").expect("valid class/id regex"));

const HASH_ATTRIBUTES: (char, char) = ('{', '}');
const HTML_ATTRIBUTES: (char, char) = ('(', ')');

pub struct ElementParser<'p, 'a> {
    lines: &'p mut LineSource<'a>,
    lineno: usize,
}

impl<'p, 'a> ElementParser<'p, 'a> {
    pub fn new(lines: &'p mut LineSource<'a>, lineno: usize) -> Self {
        Self { lines, lineno }
    }

    pub fn parse(&mut self, text: &str) -> ParseResult<Node> {
        let caps = ELEMENT
            .captures(text)
            .ok_or_else(|| self.error("Invalid element declaration"))?;

        let mut element = Element {
            tag_name: caps[1].to_string(),
            ..Element::default()
        };
        let (static_class, static_id) =
            self.parse_class_and_id(caps.get(2).map_or("", |m| m.as_str()))?;
        element.static_class = static_class;
        element.static_id = static_id;

        let rest = caps.get(3).map_or("", |m| m.as_str());
        let (attributes, rest) = self.parse_attributes(rest)?;
        element.attributes = attributes;

        let (nuke_inner, nuke_outer, rest) = parse_nuke_whitespace(&rest);
        element.nuke_inner_whitespace = nuke_inner;
        element.nuke_outer_whitespace = nuke_outer;

        let (self_closing, rest) = self.parse_self_closing(rest)?;
        element.self_closing = self_closing;

        element.oneline_child = ScriptParser::new(&mut *self.lines, self.lineno)
            .parse(rest)?
            .map(Box::new);

        Ok(Node::new(
            element,
            self.lines.filename().map(str::to_string),
            self.lineno,
        ))
    }

    fn parse_class_and_id(&self, mut text: &str) -> ParseResult<(String, String)> {
        let mut classes = Vec::new();
        let mut id = String::new();
        while !text.is_empty() {
            let caps = CLASS_OR_ID.captures(text).ok_or_else(|| {
                self.error("Illegal element: classes and ids must have values.")
            })?;
            match &caps[1] {
                "." => classes.push(caps[2].to_string()),
                _ => id = caps[2].to_string(),
            }
            text = &text[caps[0].len()..];
        }
        Ok((classes.join(" "), id))
    }

    fn parse_attributes(&mut self, rest: &str) -> ParseResult<(String, String)> {
        let mut groups = Vec::new();
        let mut seen_hash = false;
        let mut seen_html = false;
        let mut rest = rest.to_string();

        loop {
            let (open, close) = match rest.chars().next() {
                Some('{') if !seen_hash => {
                    seen_hash = true;
                    HASH_ATTRIBUTES
                }
                Some('(') if !seen_html => {
                    seen_html = true;
                    HTML_ATTRIBUTES
                }
                _ => break,
            };
            let (group, after) = self.parse_group(&rest[open.len_utf8()..], open, close)?;
            groups.push(group);
            rest = after;
        }

        Ok((groups.join(", "), rest))
    }

    /// Read one attribute group, pulling more source lines while it stays open
    fn parse_group(&mut self, text: &str, open: char, close: char) -> ParseResult<(String, String)> {
        let mut buf = text.to_string();
        loop {
            let scan = balance(&buf, open, close, 1);
            if scan.is_balanced() {
                return Ok((scan.prefix.to_string(), scan.rest.trim_start().to_string()));
            }
            match self.lines.next_line(false) {
                Some(line) => {
                    buf.push('\n');
                    buf.push_str(&line);
                }
                None => {
                    let what = if open == HASH_ATTRIBUTES.0 {
                        "brace"
                    } else {
                        "paren"
                    };
                    return Err(self.error(format!("Unmatched {}", what)));
                }
            }
        }
    }

    fn parse_self_closing<'t>(&self, rest: &'t str) -> ParseResult<(bool, &'t str)> {
        match rest.strip_prefix('/') {
            Some(content) if !content.is_empty() => {
                Err(self.error("Self-closing tags can't have content."))
            }
            Some(_) => Ok((true, "")),
            None => Ok((false, rest)),
        }
    }

    fn error(&self, message: impl Into<String>) -> SyntaxError {
        SyntaxError::new(message, self.lineno)
    }
}

fn parse_nuke_whitespace(rest: &str) -> (bool, bool, &str) {
    for marker in ["><", "<>", ">", "<"] {
        if let Some(after) = rest.strip_prefix(marker) {
            return (marker.contains('<'), marker.contains('>'), after);
        }
    }
    (false, false, rest)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::haml::ast::NodeKind;

    fn parse(text: &str) -> ParseResult<Element> {
        let mut lines = LineSource::new(None, "");
        parse_with(&mut lines, text)
    }

    fn parse_with(lines: &mut LineSource<'_>, text: &str) -> ParseResult<Element> {
        let node = ElementParser::new(lines, 1).parse(text)?;
        match node.kind {
            NodeKind::Element(e) => Ok(e),
            other => panic!("expected element, got {:?}", other),
        }
    }

    #[test]
    fn test_tag_only() {
        let e = parse("%p").unwrap();
        assert_eq!(e.tag_name, "p");
        assert_eq!(e.static_class, "");
        assert_eq!(e.attributes, "");
        assert!(e.oneline_child.is_none());
    }

    #[test]
    fn test_classes_and_id() {
        let e = parse("%div.foo#bar.baz").unwrap();
        assert_eq!(e.static_class, "foo baz");
        assert_eq!(e.static_id, "bar");
    }

    #[test]
    fn test_hash_attributes_and_nuke() {
        let e = parse("%div{hello: 'world'}<").unwrap();
        assert_eq!(e.attributes, "hello: 'world'");
        assert!(e.nuke_inner_whitespace);
        assert!(!e.nuke_outer_whitespace);
    }

    #[test]
    fn test_both_attribute_groups() {
        let e = parse("%a(href='/'){class: c} home").unwrap();
        assert_eq!(e.attributes, "href='/', class: c");
        let child = e.oneline_child.expect("inline child");
        assert_eq!(child.kind.as_text().map(|t| t.text.as_str()), Some("home"));
    }

    #[test]
    fn test_attributes_continue_on_next_lines() {
        let mut lines = LineSource::new(None, "%a{href: '/',\n   title: 'x'} go");
        lines.next_line(false);
        let e = parse_with(&mut lines, "%a{href: '/',").unwrap();
        assert_eq!(e.attributes, "href: '/',\n   title: 'x'");
        assert!(e.oneline_child.is_some());
    }

    #[test]
    fn test_unmatched_brace() {
        let err = parse("%a{href: '/'").unwrap_err();
        assert_eq!(err.message, "Unmatched brace");
    }

    #[test]
    fn test_self_closing() {
        assert!(parse("%br/").unwrap().self_closing);
        let err = parse("%br/ text").unwrap_err();
        assert_eq!(err.message, "Self-closing tags can't have content.");
    }

    #[test]
    fn test_both_nuke_markers() {
        let e = parse("%p<> x").unwrap();
        assert!(e.nuke_inner_whitespace && e.nuke_outer_whitespace);
        let e = parse("%p>< x").unwrap();
        assert!(e.nuke_inner_whitespace && e.nuke_outer_whitespace);
    }

    #[test]
    fn test_inline_script() {
        let e = parse("%span= user.name").unwrap();
        let child = e.oneline_child.expect("inline child");
        assert_eq!(
            child.kind.as_script().map(|s| s.script.as_str()),
            Some("user.name")
        );
    }

    #[test]
    fn test_invalid_declarations() {
        assert_eq!(
            parse("%").unwrap_err().message,
            "Invalid element declaration"
        );
        assert_eq!(
            parse("%p.").unwrap_err().message,
            "Illegal element: classes and ids must have values."
        );
    }
}
