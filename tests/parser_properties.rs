//! Property-based tests for the parser
//!
//! Inputs are drawn from an alphabet heavy in Haml markers so that most lines hit a real
//! grammar path rather than plain text.

use haml_parser::haml::ast::snapshot;
use haml_parser::parse;
use proptest::prelude::*;

fn template_line() -> impl Strategy<Value = String> {
    prop_oneof![
        Just(String::new()),
        "[ ]{0,6}[%.#=~&!/:a-z-][a-z{}()\\[\\] .#=|,'-]{0,16}",
        "[ ]{0,6}- (if|else|elsif|end|when|case) [a-z]{0,4}",
    ]
}

fn template() -> impl Strategy<Value = String> {
    prop::collection::vec(template_line(), 0..24).prop_map(|lines| lines.join("\n"))
}

proptest! {
    #[test]
    fn parse_never_panics(source in "[%.#=~&!/\\\\:a-z {}()\\[\\]|,\t\n-]{0,160}") {
        let _ = parse(&source);
    }

    #[test]
    fn every_node_is_attached_exactly_once(source in template()) {
        if let Ok(ast) = parse(&source) {
            // each stored node is reached once from the root, so no context was lost on the stack
            prop_assert_eq!(ast.iter_all_nodes().count(), ast.len());
        }
    }

    #[test]
    fn errors_point_into_the_source(source in template()) {
        if let Err(err) = parse(&source) {
            let line_count = source.lines().count().max(1);
            prop_assert!(err.lineno >= 1 && err.lineno <= line_count, "lineno {} of {}", err.lineno, line_count);
        }
    }

    #[test]
    fn escaped_text_is_literal(text in "[a-z][a-z ]{0,20}[a-z]") {
        let escaped = parse(&format!("\\{}", text)).expect("escaped line to parse");
        let literal = parse(&text).expect("plain text to parse");
        prop_assert_eq!(snapshot(&escaped), snapshot(&literal));
    }

    #[test]
    fn export_is_idempotent(source in template()) {
        if let Ok(ast) = parse(&source) {
            prop_assert_eq!(snapshot(&ast), snapshot(&ast));
        }
    }
}
