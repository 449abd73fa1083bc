use haml_parser::haml::formats::{serialize, to_treeviz_str, Format, RenderOptions};
use haml_parser::parse;
use std::fs;

fn sample() -> String {
    fs::read_to_string("tests/fixtures/sample.haml").expect("Failed to read sample template")
}

#[test]
fn test_sample_treeviz() {
    let ast = parse(&sample()).expect("sample to parse");
    insta::assert_snapshot!(to_treeviz_str(&ast), @r"
    ⧉ template
    ├─ ‼ !!! 5
    ├─ ⊞ %div{hello: 'world'}
    │ ├─ ◦ hoge
    │ ├─ ⊞ %div.foo#bar fuga
    │ └─ ƒ :javascript
    ├─ − if 1.even?
    │ ├─ ∅
    │ └─ = 'even'
    ├─ − else
    │ ├─ ♯
    │ └─ ◦ odd
    └─ ⁄
      └─ ⊞ %this
        └─ ◦ is comment
    ");
}

#[test]
fn test_long_labels_are_truncated() {
    let ast = parse("%p= some_really_long_helper_name(with, many, arguments)").unwrap();
    let output = serialize(&ast, Format::Treeviz, RenderOptions::default()).unwrap();
    assert_eq!(
        output.lines().nth(1),
        Some("└─ ⊞ %p = some_really_long_helper_n...")
    );
}
