use peridot::{parse, Yaml};

fn value(text: &str) -> Yaml {
    match parse(text) {
        Ok(doc) => doc,
        Err(e) => panic!("unexpected error for {text:?}: {e}"),
    }
}

fn string(text: &str) -> String {
    match value(text) {
        Yaml::String(s) => s,
        other => panic!("expected a string for {text:?}, got {other:?}"),
    }
}

#[test]
fn plain_scalar_document() {
    assert_eq!(string("hello"), "hello");
    assert_eq!(string("  hello  "), "hello");
    assert_eq!(string("hello\nworld"), "hello world");
}

#[test]
fn plain_scalar_blank_lines_fold_to_newlines() {
    assert_eq!(string("line 1\n\nline 2"), "line 1\nline 2");
    assert_eq!(string("line 1\n\n\nline 2"), "line 1\n\nline 2");
}

#[test]
fn empty_documents_are_null() {
    assert!(value("").is_null());
    assert!(value("   \n\t\n").is_null());
    assert!(value("# only a comment").is_null());
}

#[test]
fn single_quoted_scalars() {
    assert_eq!(string("'hello'"), "hello");
    assert_eq!(string("'Some''text'"), "Some'text");
    assert_eq!(string("'  spaces kept  '"), "  spaces kept  ");
    assert_eq!(string("'line 1\nline 2'"), "line 1 line 2");
    assert_eq!(string("'\nline 1\nline 2\n'"), " line 1 line 2 ");
}

#[test]
fn double_quoted_escapes() {
    assert_eq!(string("\"tab\\there\""), "tab\there");
    assert_eq!(string("\"\\x41\\u0042\\U00000043\""), "ABC");
    assert_eq!(string("\"\\U00010437\\u2192\""), "\u{10437}\u{2192}");
    assert_eq!(string("\"quote \\\" backslash \\\\\""), "quote \" backslash \\");
    assert_eq!(string("\"kept\\nbreak\nfolded\""), "kept\nbreak folded");
}

#[test]
fn literal_block_scalars() {
    let doc = value("log: |\n  line 1\n  line 2\n");
    assert_eq!(doc["log"].as_str(), Some("line 1\nline 2\n"));

    let doc = value("log: |-\n  line 1\n  line 2\n\n\n");
    assert_eq!(doc["log"].as_str(), Some("line 1\nline 2"));

    let doc = value("log: |+\n  line 1\n\n\n");
    assert_eq!(doc["log"].as_str(), Some("line 1\n\n\n"));
}

#[test]
fn literal_block_preserves_deeper_indentation() {
    let doc = value("code: |\n  fn main() {\n      body\n  }\n");
    assert_eq!(doc["code"].as_str(), Some("fn main() {\n    body\n}\n"));
}

#[test]
fn folded_block_scalars() {
    let doc = value("note: >\n  folded\n  text\n");
    assert_eq!(doc["note"].as_str(), Some("folded text\n"));

    let doc = value("note: >-\n  a\n  b\n");
    assert_eq!(doc["note"].as_str(), Some("a b"));
}

#[test]
fn empty_block_scalar_loads_as_null() {
    let doc = value("log: |-\n\n\n");
    assert!(doc["log"].is_null());
}

#[test]
fn quoted_continuation_lines_join() {
    let doc = value("a: 'one'\n   'two'");
    assert_eq!(doc["a"].as_str(), Some("one two"));
}

#[test]
fn trailing_comment_is_not_content() {
    let doc = value("a: 1 # trailing");
    assert_eq!(doc["a"].as_str(), Some("1"));
    assert_eq!(string("c#not-a-comment"), "c#not-a-comment");
}
