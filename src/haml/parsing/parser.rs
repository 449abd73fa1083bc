//! Parser driver
//!
//!     The driver pulls one logical line at a time and turns the flat stream into a tree.
//!
//! State
//!
//!     - `current`: the container receiving new nodes (the context)
//!     - `stack`: the contexts that were active before each indent-enter
//!     - the filter accumulator, which when open puts the driver in capture mode
//!
//! Main loop
//!
//!     1. While a filter is open, the raw line goes to the accumulator. When the accumulator
//!        reports the block closed, the filter node is appended and the same line is parsed
//!        normally.
//!     2. Otherwise the logical line (pipe continuations folded) is stripped of indentation by
//!        the [`IndentTracker`], whose enter/leave events are applied first, and is then
//!        dispatched on its leading marker. Each folded physical line gets an `Empty` node.
//!
//! Indent-enter
//!
//!     Trailing `Empty` nodes of the context are blank lines that precede the nested block, so
//!     they are moved into it: they are popped, the last real child becomes the new context,
//!     and the popped nodes become its first children. The new context is then checked:
//!     nothing may nest under text, a doctype, a self-closing element, a comment with inline
//!     content, or a filter. Entering an author-only comment puts the tracker in comment mode;
//!     any other enter must keep the indentation step width.
//!
//! Indent-leave
//!
//!     Pops the stack. The tracker only hands out matched pairs, so at end of input the
//!     context is the root again.

use super::element::ElementParser;
use super::filter::{FilterOutcome, FilterParser};
use super::keywords;
use super::script::ScriptParser;
use crate::haml::ast::{
    Ast, Doctype, Empty, HamlComment, HtmlComment, Node, NodeId, NodeKind, SilentScript, Text,
};
use crate::haml::error::{ParseResult, SyntaxError};
use crate::haml::lexing::{balance, multiline, IndentEvent, IndentTracker, LineSource};
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{debug, trace};

const DOCTYPE_PREFIX: char = '!';
const ELEMENT_PREFIX: char = '%';
const COMMENT_PREFIX: char = '/';
const SILENT_SCRIPT_PREFIX: char = '-';
const DIV_ID_PREFIX: char = '#';
const DIV_CLASS_PREFIX: char = '.';
const FILTER_PREFIX: char = ':';
const ESCAPE_PREFIX: char = '\\';

const DOCTYPE_SENTINEL: &str = "!!!";
const HAML_COMMENT_SENTINEL: &str = "-#";
const INTERPOLATION_OPENER: &str = "#{";

static FILTER_NAME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^:(\w+)$").expect("valid filter name regex"));

/// Options for a parse
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParserOptions {
    /// Source identifier stamped on nodes and errors
    pub filename: Option<String>,
}

impl ParserOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_filename(mut self, filename: impl Into<String>) -> Self {
        self.filename = Some(filename.into());
        self
    }
}

/// Haml template parser.
///
/// Each call to [`Parser::parse`] works on fresh state, so one parser can be reused and shared.
#[derive(Debug, Clone, Default)]
pub struct Parser {
    options: ParserOptions,
}

impl Parser {
    pub fn new(options: ParserOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &ParserOptions {
        &self.options
    }

    pub fn parse(&self, source: &str) -> ParseResult<Ast> {
        let filename = self.options.filename.as_deref();
        ParseState::new(source, self.options.filename.clone())
            .run()
            .map_err(|err| {
                debug!(lineno = err.lineno, message = %err.message, "parse failed");
                err.with_filename(filename)
            })
    }
}

/// Parse a template with default options
pub fn parse(source: &str) -> ParseResult<Ast> {
    Parser::default().parse(source)
}

/// Parse a template, stamping `filename` on nodes and errors
pub fn parse_with_filename(source: &str, filename: &str) -> ParseResult<Ast> {
    Parser::new(ParserOptions::new().with_filename(filename)).parse(source)
}

struct ParseState<'a> {
    ast: Ast,
    current: NodeId,
    stack: Vec<NodeId>,
    lines: LineSource<'a>,
    indent: IndentTracker,
    filter: FilterParser,
    /// First physical line of the logical line being parsed
    lineno: usize,
}

impl<'a> ParseState<'a> {
    fn new(source: &'a str, filename: Option<String>) -> Self {
        let ast = Ast::new();
        let current = ast.root();
        Self {
            ast,
            current,
            stack: Vec::new(),
            lines: LineSource::new(filename, source),
            indent: IndentTracker::new(),
            filter: FilterParser::new(),
            lineno: 0,
        }
    }

    fn run(mut self) -> ParseResult<Ast> {
        while self.lines.has_next() {
            let in_filter = !self.in_haml_comment() && self.filter.enabled();
            let Some(line) = self.lines.next_line(in_filter) else {
                break;
            };

            if in_filter {
                self.lineno = self.lines.lineno();
                if let Some(outcome) = self.filter.append(&line, self.indent.current_level()) {
                    // blank lines trimmed from the filter sit right before this line
                    self.close_filter(outcome, self.lineno - 1);
                }
            }

            if !self.filter.enabled() {
                let folded = line.matches('\n').count();
                self.lineno = self.lines.lineno() - folded;
                self.parse_line(&line.replace('\n', ""))?;
                for offset in 1..=folded {
                    self.append(Empty, self.lineno + offset);
                }
            }
        }

        if let Some(outcome) = self.filter.finish() {
            let last = self.lines.lineno();
            self.close_filter(outcome, last);
        }
        for event in self.indent.finish() {
            self.apply(event)?;
        }
        debug_assert!(self.stack.is_empty(), "indent stack not unwound");
        debug_assert_eq!(self.current, self.ast.root());

        debug!(nodes = self.ast.len(), lines = self.lines.lineno(), "parse complete");
        Ok(self.ast)
    }

    fn parse_line(&mut self, line: &str) -> ParseResult<()> {
        let processed = self.indent.process(line, self.lineno)?;
        for event in processed.events {
            self.apply(event)?;
        }
        self.dispatch(processed.text)
    }

    fn dispatch(&mut self, text: &str) -> ParseResult<()> {
        trace!(lineno = self.lineno, text, "dispatch");
        if text.is_empty() {
            self.append(Empty, self.lineno);
            return Ok(());
        }

        if self.in_haml_comment() {
            self.append(Text::new(text), self.lineno);
            return Ok(());
        }

        let Some(marker) = text.chars().next() else {
            return Ok(());
        };
        match marker {
            ESCAPE_PREFIX => {
                self.append(Text::new(&text[ESCAPE_PREFIX.len_utf8()..]), self.lineno);
                Ok(())
            }
            ELEMENT_PREFIX => self.parse_element(text),
            DOCTYPE_PREFIX if text.starts_with(DOCTYPE_SENTINEL) => {
                self.parse_doctype(text);
                Ok(())
            }
            COMMENT_PREFIX => self.parse_comment(text),
            SILENT_SCRIPT_PREFIX => self.parse_silent_script(text),
            DIV_ID_PREFIX | DIV_CLASS_PREFIX if !text.starts_with(INTERPOLATION_OPENER) => {
                self.dispatch(&format!("{}div{}", ELEMENT_PREFIX, text))
            }
            FILTER_PREFIX => self.parse_filter(text),
            _ => self.parse_script(text),
        }
    }

    fn parse_doctype(&mut self, text: &str) {
        let doctype = text[DOCTYPE_SENTINEL.len()..].trim().to_string();
        self.append(Doctype { doctype }, self.lineno);
    }

    fn parse_comment(&mut self, text: &str) -> ParseResult<()> {
        let body = text[COMMENT_PREFIX.len_utf8()..].trim();
        let mut comment = HtmlComment::default();
        match body.strip_prefix('[') {
            Some(inner) => {
                let scan = balance(inner, '[', ']', 1);
                if !scan.is_balanced() {
                    return Err(self.error("Unmatched brackets in conditional comment"));
                }
                comment.conditional = scan.prefix.to_string();
                comment.comment = scan.rest.trim_start().to_string();
            }
            None => comment.comment = body.to_string(),
        }
        self.append(comment, self.lineno);
        Ok(())
    }

    fn parse_element(&mut self, text: &str) -> ParseResult<()> {
        let node = ElementParser::new(&mut self.lines, self.lineno).parse(text)?;
        self.ast.append_node(self.current, node);
        Ok(())
    }

    fn parse_script(&mut self, text: &str) -> ParseResult<()> {
        if let Some(node) = ScriptParser::new(&mut self.lines, self.lineno).parse(text)? {
            self.ast.append_node(self.current, node);
        }
        Ok(())
    }

    fn parse_silent_script(&mut self, text: &str) -> ParseResult<()> {
        if text.starts_with(HAML_COMMENT_SENTINEL) {
            self.append(HamlComment::default(), self.lineno);
            return Ok(());
        }

        let code = text[SILENT_SCRIPT_PREFIX.len_utf8()..].trim_start_matches(' ');
        let mut parts = vec![code.to_string()];
        parts.extend(multiline::read(&mut self.lines, code));
        let script = parts.join("\n");
        let keyword = keywords::detect(&script, false);

        self.append(
            SilentScript {
                script,
                mid_block_keyword: keyword.is_some_and(|k| k.is_mid_block()),
                keyword,
                children: Vec::new(),
            },
            self.lineno,
        );
        Ok(())
    }

    fn parse_filter(&mut self, text: &str) -> ParseResult<()> {
        let name = FILTER_NAME
            .captures(text)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str())
            .ok_or_else(|| self.error(format!("Invalid filter name: {}", text)))?;
        let filename = self.lines.filename().map(str::to_string);
        self.filter.start(name, filename, self.lineno);
        Ok(())
    }

    fn close_filter(&mut self, outcome: FilterOutcome, last_blank_lineno: usize) {
        let FilterOutcome {
            filter,
            trailing_blank_lines,
        } = outcome;
        self.ast.append_node(self.current, filter);
        let first_blank = last_blank_lineno + 1 - trailing_blank_lines;
        for lineno in first_blank..=last_blank_lineno {
            self.append(Empty, lineno);
        }
    }

    fn apply(&mut self, event: IndentEvent) -> ParseResult<()> {
        match event {
            IndentEvent::Enter { level } => self.indent_enter(level),
            IndentEvent::Leave { level } => {
                self.indent_leave(level);
                Ok(())
            }
        }
    }

    fn indent_enter(&mut self, level: usize) -> ParseResult<()> {
        let empties = self.ast.take_trailing_empties(self.current);
        let Some(target) = self.ast.last_child(self.current) else {
            return Err(self.error("Indenting at the beginning of the document is illegal."));
        };
        self.stack.push(self.current);
        self.current = target;
        debug!(level, lineno = self.lineno, depth = self.stack.len(), "indent enter");

        if let Some(message) = nesting_violation(self.ast.kind(target)) {
            return Err(self.error(message));
        }
        self.ast.prepend_children(target, empties);

        if matches!(self.ast.kind(target), NodeKind::HamlComment(_)) {
            self.indent.enter_comment();
        } else {
            self.indent.check_indent_level(self.lineno)?;
        }
        Ok(())
    }

    fn indent_leave(&mut self, level: usize) {
        match self.stack.pop() {
            Some(parent) => {
                self.current = parent;
                debug!(level, lineno = self.lineno, depth = self.stack.len(), "indent leave");
            }
            None => debug_assert!(false, "indent leave without a matching enter"),
        }
    }

    fn in_haml_comment(&self) -> bool {
        matches!(self.ast.kind(self.current), NodeKind::HamlComment(_))
    }

    fn append(&mut self, kind: impl Into<NodeKind>, lineno: usize) -> NodeId {
        let node = Node::new(kind, self.lines.filename().map(str::to_string), lineno);
        self.ast.append_node(self.current, node)
    }

    fn error(&self, message: impl Into<String>) -> SyntaxError {
        SyntaxError::new(message, self.lineno)
    }
}

/// Why nothing may be nested under `kind`, if that is the case
fn nesting_violation(kind: &NodeKind) -> Option<&'static str> {
    match kind {
        NodeKind::Text(_) => Some("Illegal nesting: nesting within plain text is illegal."),
        NodeKind::Doctype(_) => Some("Illegal nesting: nesting within a header command is illegal."),
        NodeKind::Element(e) if e.self_closing => {
            Some("Illegal nesting: nesting within a self-closing tag is illegal.")
        }
        NodeKind::HtmlComment(c) if !c.comment.is_empty() => Some(
            "Illegal nesting: nesting within a html comment that already has content is illegal.",
        ),
        NodeKind::Filter(_) | NodeKind::Empty(_) => {
            Some("Illegal nesting: nesting within a filter is illegal.")
        }
        _ => None,
    }
}
