/*
 * Copyright (c) 2025 Raphael Amorim
 *
 * This file is part of envcraft, which is licensed
 * under GNU General Public License v3.0.
 */

use envcraft::editor::{self, Edit};
use envcraft::parser::parse_str;
use envcraft::{Error, Line, LineStore};
use pretty_assertions::assert_eq;

fn store(lines: &[&str]) -> LineStore {
    LineStore::parse(&lines.concat())
}

fn physical(store: &LineStore) -> Vec<String> {
    store.iter().map(|line| line.to_string()).collect()
}

fn add(key: &str, value: &str, line: usize) -> Edit {
    Edit::Add {
        key: key.to_string(),
        value: value.to_string(),
        line,
    }
}

#[test]
fn test_add_appends_at_line_zero() {
    let result = add("NEW", "value", 0)
        .apply(store(&["FOO=\"bar\"\n", "BAR=\"baz\""]))
        .unwrap();
    assert_eq!(
        physical(&result),
        vec!["FOO=\"bar\"\n", "BAR=\"baz\"\n", "NEW=\"value\""]
    );
}

#[test]
fn test_add_inserts_at_line() {
    let original = store(&["FOO=\"bar\"\n", "BAR=\"baz\""]);

    let first = add("NEW", "value", 1).apply(original.clone()).unwrap();
    assert_eq!(
        physical(&first),
        vec!["NEW=\"value\"\n", "FOO=\"bar\"\n", "BAR=\"baz\""]
    );

    let second = add("NEW", "value", 2).apply(original).unwrap();
    assert_eq!(
        physical(&second),
        vec!["FOO=\"bar\"\n", "NEW=\"value\"\n", "BAR=\"baz\""]
    );
}

#[test]
fn test_add_pads_past_end_of_file() {
    let result = add("NEW", "value", 4).apply(store(&["FOO=\"bar\""])).unwrap();
    assert_eq!(
        physical(&result),
        vec!["FOO=\"bar\"\n", "\n", "\n", "NEW=\"value\""]
    );
}

#[test]
fn test_add_past_end_after_trailing_newline() {
    let result = add("NEW", "value", 3).apply(store(&["FOO=\"bar\"\n"])).unwrap();
    assert_eq!(physical(&result), vec!["FOO=\"bar\"\n", "\n", "NEW=\"value\""]);
}

#[test]
fn test_add_to_empty_stores() {
    let cases = [(0, vec!["FOO=\"bar\""]), (1, vec!["FOO=\"bar\""]), (2, vec!["\n", "FOO=\"bar\""])];

    for (line, expected) in cases {
        let result = add("FOO", "bar", line).apply(LineStore::new()).unwrap();
        assert_eq!(physical(&result), expected, "line {line}");
    }
}

#[test]
fn test_add_duplicate_key() {
    let err = add("FOO", "x", 0)
        .apply(store(&["FOO=\"bar\"\n", "BAR=\"baz\""]))
        .unwrap_err();
    assert!(matches!(err, Error::DuplicateKey(ref key) if key == "FOO"));
    assert!(!err.is_soft());

    let result = add("FOO", "x", 0)
        .apply(store(&["#FOO=\"bar\"\n", "BAR=\"baz\""]))
        .unwrap();
    assert_eq!(
        physical(&result),
        vec!["#FOO=\"bar\"\n", "BAR=\"baz\"\n", "FOO=\"x\""]
    );
}

#[test]
fn test_update_rewrites_first_match() {
    let result = Edit::Update {
        key: "FOO".to_string(),
        value: "newval".to_string(),
    }
    .apply(store(&["FOO=\"bar\"\n", "BAR=\"baz\"\n"]))
    .unwrap();
    assert_eq!(physical(&result), vec!["FOO=\"newval\"\n", "BAR=\"baz\"\n"]);
}

#[test]
fn test_update_normalizes_quoting() {
    let result = editor::update(store(&["FOO='single' # note"]), "FOO", "it's").unwrap();
    assert_eq!(physical(&result), vec!["FOO=\"it's\""]);
}

#[test]
fn test_update_is_idempotent() {
    let original = store(&["A=1\n", "B=2"]);
    let once = editor::update(original, "B", "x").unwrap();
    let twice = editor::update(once.clone(), "B", "x").unwrap();
    assert_eq!(once.to_string(), twice.to_string());
}

#[test]
fn test_delete_strips_final_newline() {
    let result = Edit::Delete {
        key: "FIZZ".to_string(),
    }
    .apply(store(&["FOO=\"bar\"\n", "BAR=\"baz\"\n", "FIZZ=\"bazz\""]))
    .unwrap();
    assert_eq!(physical(&result), vec!["FOO=\"bar\"\n", "BAR=\"baz\""]);
}

#[test]
fn test_delete_missing_key_is_soft() {
    let err = Edit::Delete {
        key: "NOPE".to_string(),
    }
    .apply(store(&["FOO=\"bar\""]))
    .unwrap_err();
    assert!(err.is_soft());
}

#[test]
fn test_comment_at_first_line() {
    let result = Edit::Comment {
        text: "test".to_string(),
        line: 1,
    }
    .apply(store(&["FOO=\"bar\"\n", "BAR=\"baz\""]))
    .unwrap();
    assert_eq!(
        physical(&result),
        vec!["# test\n", "FOO=\"bar\"\n", "BAR=\"baz\""]
    );
}

#[test]
fn test_comment_into_empty_file() {
    let result = Edit::Comment {
        text: "only".to_string(),
        line: 1,
    }
    .apply(LineStore::parse(""))
    .unwrap();
    assert_eq!(result.lines(), &[Line::unterminated("# only")]);
}

#[test]
fn test_written_records_parse_back() {
    let mut current = store(&["# settings\n", "A=1\n"]);
    for (key, value) in [("B", "two words"), ("C", "has # hash"), ("D", "")] {
        current = add(key, value, 0).apply(current).unwrap();
    }

    let env = parse_str(&current.to_string()).unwrap();
    assert_eq!(env.get("A").map(String::as_str), Some("1"));
    assert_eq!(env.get("B").map(String::as_str), Some("two words"));
    assert_eq!(env.get("C").map(String::as_str), Some("has # hash"));
    assert_eq!(env.get("D").map(String::as_str), Some(""));
}

#[test]
fn test_delete_then_add_preserves_value() {
    let original = store(&["A=\"1\"\n", "B=\"2\"\n", "C=\"3\""]);
    let before = parse_str(&original.to_string()).unwrap();

    let removed = editor::delete(original, "B").unwrap();
    let restored = editor::add(removed, "B", "2", 0).unwrap();

    assert_eq!(parse_str(&restored.to_string()).unwrap(), before);
    assert!(restored.is_well_formed());
}

#[test]
fn test_escaped_values_read_back_literally() {
    // The writer escapes, the parser never expands escapes.
    let cases = [
        ("say \"hi\"", r#"say \"hi\"#),
        ("a\tb", r"a\tb"),
        ("C:\\path", r"C:\\path"),
        ("line1\nline2", r"line1\nline2"),
    ];

    for (value, read_back) in cases {
        let written = editor::add(LineStore::new(), "K", value, 0).unwrap();
        let env = parse_str(&written.to_string()).unwrap();
        assert_eq!(env.get("K").map(String::as_str), Some(read_back), "value {value:?}");
    }
}

#[test]
fn test_delete_matches_bare_key_line() {
    let result = editor::delete(store(&["FOO\n", "BAR=1"]), "FOO").unwrap();
    assert_eq!(physical(&result), vec!["BAR=1"]);

    let err = editor::update(store(&["FOO\n", "BAR=1"]), "FOO", "x").unwrap_err();
    assert!(err.is_soft());
}
