#[macro_use]
extern crate quickcheck;

use peridot::{parse, Yaml};

/// Reduce an arbitrary string to something that lexes as one plain word.
/// The `x` separator keeps distinct `(index, raw)` pairs distinct even when
/// the raw part starts with digits.
fn word(prefix: &str, index: usize, raw: &str) -> String {
    let tail: String = raw.chars().filter(char::is_ascii_alphanumeric).collect();
    format!("{prefix}{index}x{tail}")
}

quickcheck! {
    fn parsing_never_panics(text: String) -> bool {
        // Both outcomes are acceptable; reaching one is the property.
        match parse(&text) {
            Ok(_) | Err(_) => true,
        }
    }

    fn flat_mappings_load_in_order(pairs: Vec<(String, String)>) -> bool {
        let pairs: Vec<(String, String)> = pairs
            .iter()
            .enumerate()
            .map(|(i, (k, v))| (word("k", i, k), word("v", i, v)))
            .collect();
        let source: String = pairs
            .iter()
            .map(|(k, v)| format!("{k}: {v}\n"))
            .collect();

        let doc = match parse(&source) {
            Ok(doc) => doc,
            Err(_) => return false,
        };
        if pairs.is_empty() {
            return doc.is_null();
        }
        match doc.as_mapping() {
            Some(mapping) => mapping
                .iter()
                .zip(&pairs)
                .all(|((k, v), (key, value))| k == key && v.as_str() == Some(value.as_str()))
                && mapping.len() == pairs.len(),
            None => false,
        }
    }

    fn sequences_load_every_entry(items: Vec<String>) -> bool {
        let items: Vec<String> = items
            .iter()
            .enumerate()
            .map(|(i, item)| word("item", i, item))
            .collect();
        let source: String = items.iter().map(|item| format!("- {item}\n")).collect();

        let doc = match parse(&source) {
            Ok(doc) => doc,
            Err(_) => return false,
        };
        if items.is_empty() {
            return doc.is_null();
        }
        match doc.as_sequence() {
            Some(sequence) => sequence
                .iter()
                .zip(&items)
                .all(|(entry, item)| entry.as_str() == Some(item.as_str()))
                && sequence.len() == items.len(),
            None => false,
        }
    }

    fn duplicate_keys_always_error(key: String, first: String, second: String) -> bool {
        let key = word("k", 0, &key);
        let source = format!(
            "{key}: {}\n{key}: {}\n",
            word("v", 0, &first),
            word("v", 1, &second)
        );
        match parse(&source) {
            Ok(_) => false,
            Err(e) => e.info() == "Duplicate mapping key",
        }
    }
}

#[test]
fn quickcheck_word_helper_strips_structure() {
    assert_eq!(word("k", 0, "a: b\n- c"), "k0xabc");
    let doc = parse("k0xabc: v0\n").unwrap_or(Yaml::Null);
    assert_eq!(doc["k0xabc"].as_str(), Some("v0"));
}
