use peridot::{parse, Yaml};

fn value(text: &str) -> Yaml {
    match parse(text) {
        Ok(doc) => doc,
        Err(e) => panic!("unexpected error for {text:?}: {e}"),
    }
}

fn error(text: &str) -> String {
    match parse(text) {
        Ok(doc) => panic!("expected an error for {text:?}, got {doc:?}"),
        Err(e) => e.to_string(),
    }
}

#[test]
fn flat_mapping() {
    let doc = value("a: 1\nb: 2");
    assert_eq!(doc["a"].as_str(), Some("1"));
    assert_eq!(doc["b"].as_str(), Some("2"));
}

#[test]
fn nested_mappings() {
    let doc = value("a:\n  b: 1\n  c: 2");
    assert_eq!(doc["a"]["b"].as_str(), Some("1"));
    assert_eq!(doc["a"]["c"].as_str(), Some("2"));
}

#[test]
fn key_without_value_is_null() {
    let doc = value("a:\nb: 2");
    assert!(doc["a"].is_null());
    assert_eq!(doc["b"].as_str(), Some("2"));
}

#[test]
fn sequence_document() {
    let doc = value("- x\n- y");
    assert_eq!(doc[0].as_str(), Some("x"));
    assert_eq!(doc[1].as_str(), Some("y"));
    assert_eq!(doc.as_sequence().map(Vec::len), Some(2));
}

#[test]
fn nested_sequences() {
    let doc = value("- - a\n- b");
    assert_eq!(doc[0][0].as_str(), Some("a"));
    assert_eq!(doc[1].as_str(), Some("b"));
}

#[test]
fn sequence_of_mappings() {
    let doc = value("people:\n  - name: alice\n    role: admin\n  - name: bob\n");
    let people = doc["people"].as_sequence();
    assert_eq!(people.map(Vec::len), Some(2));
    assert_eq!(doc["people"][0]["name"].as_str(), Some("alice"));
    assert_eq!(doc["people"][0]["role"].as_str(), Some("admin"));
    assert_eq!(doc["people"][1]["name"].as_str(), Some("bob"));
    assert!(doc["people"][1]["role"].is_null());
}

#[test]
fn mapping_keys_keep_insertion_order() {
    let doc = value("0.0.3:\n  changes:\n    - third\n0.0.2:\n  changes:\n    - second\n0.0.1:\n  changes:\n    - first\n");
    let mapping = match doc.as_mapping() {
        Some(mapping) => mapping,
        None => panic!("expected a mapping"),
    };
    let keys: Vec<&str> = mapping.keys().map(String::as_str).collect();
    assert_eq!(keys, ["0.0.3", "0.0.2", "0.0.1"]);
    assert_eq!(doc["0.0.2"]["changes"][0].as_str(), Some("second"));
}

#[test]
fn quoted_keys() {
    let doc = value("'a key': x\n\"another\": y");
    assert_eq!(doc["a key"].as_str(), Some("x"));
    assert_eq!(doc["another"].as_str(), Some("y"));
}

#[test]
fn comments_are_ignored() {
    let doc = value("# header\na: 1 # trailing\n# footer\nb: 2");
    assert_eq!(doc["a"].as_str(), Some("1"));
    assert_eq!(doc["b"].as_str(), Some("2"));
}

#[test]
fn indexing_misses_are_null() {
    let doc = value("a: 1");
    assert!(doc["missing"].is_null());
    assert!(doc[7].is_null());
    assert!(doc["missing"]["deeper"].is_null());
    assert_eq!(doc.get("missing"), None);
}

#[test]
fn duplicate_keys_are_rejected() {
    assert_eq!(
        error("a: 1\na: 2"),
        "Duplicate mapping key at (Ln 2, Col 1)."
    );
}

#[test]
fn scalar_after_sequence_is_rejected() {
    assert_eq!(
        error("- a\nb"),
        "Scalar value is not expected at this position at (Ln 2, Col 1)."
    );
}

#[test]
fn mapping_at_unknown_indent_is_rejected() {
    assert_eq!(
        error("- x\na: b"),
        "Mapping should not start at this position at (Ln 2, Col 1)."
    );
}

#[test]
fn sequence_under_a_filled_key_is_rejected() {
    assert_eq!(
        error("a: 1\n- x"),
        "Sequence should not start at this position at (Ln 2, Col 1)."
    );
}

#[test]
fn deeper_entry_after_a_value_is_rejected() {
    assert_eq!(
        error("- 'x'\n  - y"),
        "Sequence entry is not expected at this position at (Ln 2, Col 3)."
    );
}

#[test]
fn deeper_lines_continue_a_plain_sequence_value() {
    let doc = value("- x\n  more");
    assert_eq!(doc[0].as_str(), Some("x more"));
}

#[test]
fn key_under_a_filled_key_is_rejected() {
    assert_eq!(
        error("a: 1\n  b: 2"),
        "Mapping key is not expected at this position at (Ln 2, Col 3)."
    );
}

#[test]
fn builder_is_reusable_through_default() {
    use peridot::{DocumentBuilder, Scanner};

    let mut builder = DocumentBuilder::default();
    for token in Scanner::new("a: 1") {
        builder.handle(token.unwrap()).unwrap();
    }
    let doc = builder.into_document();
    assert_eq!(doc["a"].as_str(), Some("1"));
}
