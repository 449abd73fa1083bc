//! Output expression grammar
//!
//!     Handles lines that are not claimed by any other marker, and the inline content of
//!     elements. The leading characters select the node:
//!
//!     | prefix          | node                                      |
//!     |-----------------|-------------------------------------------|
//!     | `=` `~`         | script (`~` preserves whitespace)         |
//!     | `==`            | interpolated text                         |
//!     | `&=` `&~`       | escaped script                            |
//!     | `&==` `&` `& `  | escaped text                              |
//!     | `!=` `!~`       | unescaped script                          |
//!     | `!==` `!` `! `  | unescaped text                            |
//!     | anything else   | plain text                                |
//!
//!     Script bodies may continue onto following lines when they end with a comma, and are
//!     tagged with their block keyword.

use super::keywords;
use crate::haml::ast::{Node, NodeKind, Script, Text};
use crate::haml::error::{ParseResult, SyntaxError};
use crate::haml::lexing::{multiline, LineSource};

pub struct ScriptParser<'p, 'a> {
    lines: &'p mut LineSource<'a>,
    lineno: usize,
}

impl<'p, 'a> ScriptParser<'p, 'a> {
    pub fn new(lines: &'p mut LineSource<'a>, lineno: usize) -> Self {
        Self { lines, lineno }
    }

    /// Parse `text` into a script or text node; blank plain text yields no node
    pub fn parse(&mut self, text: &str) -> ParseResult<Option<Node>> {
        let node = if let Some(rest) = text.strip_prefix('=') {
            self.parse_script(rest, false, true)?
        } else if let Some(rest) = text.strip_prefix('~') {
            self.parse_script(rest, true, true)?
        } else if let Some(rest) = text.strip_prefix('&') {
            self.parse_flagged(rest, true)?
        } else if let Some(rest) = text.strip_prefix('!') {
            self.parse_flagged(rest, false)?
        } else {
            let text = text.trim_start();
            if text.is_empty() {
                return Ok(None);
            }
            self.text(text, true)
        };
        Ok(Some(node))
    }

    /// `=` / `~` body; `==` is interpolated text
    fn parse_script(&mut self, rest: &str, preserve: bool, escape_html: bool) -> ParseResult<Node> {
        if let Some(interpolated) = rest.strip_prefix('=') {
            return Ok(self.text(interpolated.trim(), escape_html));
        }
        self.script(rest, preserve, escape_html)
    }

    /// Body after `&` or `!`
    fn parse_flagged(&mut self, rest: &str, escape_html: bool) -> ParseResult<Node> {
        if let Some(interpolated) = rest.strip_prefix("==") {
            Ok(self.text(interpolated.trim_start(), escape_html))
        } else if let Some(code) = rest.strip_prefix('=') {
            self.script(code, false, escape_html)
        } else if let Some(code) = rest.strip_prefix('~') {
            self.script(code, true, escape_html)
        } else if let Some(text) = rest.strip_prefix(' ') {
            Ok(self.text(text.trim(), escape_html))
        } else {
            Ok(self.text(rest.trim(), escape_html))
        }
    }

    fn script(&mut self, code: &str, preserve: bool, escape_html: bool) -> ParseResult<Node> {
        let code = code.trim_start();
        if code.is_empty() {
            return Err(SyntaxError::new("No code to evaluate", self.lineno));
        }
        let mut parts = vec![code.to_string()];
        parts.extend(multiline::read(&mut *self.lines, code));
        let script = parts.join("\n");
        let keyword = keywords::detect(&script, true);

        Ok(self.node(Script {
            script,
            escape_html,
            preserve,
            keyword,
            ..Script::default()
        }))
    }

    fn text(&self, text: &str, escape_html: bool) -> Node {
        self.node(Text {
            text: text.to_string(),
            escape_html,
        })
    }

    fn node(&self, kind: impl Into<NodeKind>) -> Node {
        Node::new(kind, self.lines.filename().map(str::to_string), self.lineno)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::haml::ast::BlockKeyword;

    fn parse(text: &str) -> ParseResult<Option<Node>> {
        let mut lines = LineSource::new(None, "");
        ScriptParser::new(&mut lines, 1).parse(text)
    }

    fn script(text: &str) -> Script {
        match parse(text).unwrap().unwrap().kind {
            NodeKind::Script(s) => s,
            other => panic!("expected script, got {:?}", other),
        }
    }

    fn text(text: &str) -> Text {
        match parse(text).unwrap().unwrap().kind {
            NodeKind::Text(t) => t,
            other => panic!("expected text, got {:?}", other),
        }
    }

    #[test]
    fn test_output_expression() {
        let s = script("= 'even'");
        assert_eq!(s.script, "'even'");
        assert!(s.escape_html);
        assert!(!s.preserve);
        assert_eq!(s.keyword, None);
    }

    #[test]
    fn test_preserve_and_unescape() {
        assert!(script("~ foo").preserve);
        let s = script("!= raw");
        assert!(!s.escape_html);
        assert_eq!(s.script, "raw");
        assert!(script("&~ foo").preserve);
        assert!(script("&= foo").escape_html);
    }

    #[test]
    fn test_interpolated_text() {
        assert_eq!(text("== Hello #{name}").text, "Hello #{name}");
        let t = text("!== <b>#{x}</b>");
        assert_eq!(t.text, "<b>#{x}</b>");
        assert!(!t.escape_html);
        assert_eq!(text("& a < b").text, "a < b");
        assert!(!text("! <br>").escape_html);
    }

    #[test]
    fn test_plain_text() {
        assert_eq!(text("   fuga").text, "fuga");
        assert_eq!(text("#{x}").text, "#{x}");
        assert!(parse("   ").unwrap().is_none());
    }

    #[test]
    fn test_keyword_with_assignment() {
        assert_eq!(script("= x = if foo").keyword, Some(BlockKeyword::If));
    }

    #[test]
    fn test_missing_code() {
        let err = parse("=   ").unwrap_err();
        assert_eq!(err.message, "No code to evaluate");
        assert_eq!(err.lineno, 1);
    }

    #[test]
    fn test_comma_continuation() {
        let mut lines = LineSource::new(None, "= link_to 'a',\n    href\n%p");
        lines.next_line(false);
        let node = ScriptParser::new(&mut lines, 1)
            .parse("= link_to 'a',")
            .unwrap()
            .unwrap();
        assert_eq!(
            node.kind.as_script().map(|s| s.script.as_str()),
            Some("link_to 'a',\n    href")
        );
        assert_eq!(lines.lineno(), 2);
    }
}
