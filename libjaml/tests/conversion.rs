//! Integration tests for the Y ⇄ J conversion pipeline.
//!
//! Each test drives the public API end to end. Structural expectations go
//! through the J tree so formatting stays out of the assertions; ordering
//! and layout expectations check the emitted text directly.

use libjaml::{
    json_to_yaml, json_value_to_yaml, minify_json, try_parse_json, yaml_to_json,
    yaml_to_json_value, Options, ParseError,
};
use serde_json::{json, Value};

fn convert(input: &str) -> Value {
    yaml_to_json_value(input, &Options::default()).expect("conversion should succeed")
}

fn convert_err(input: &str) -> ParseError {
    yaml_to_json(input, &Options::default()).expect_err("conversion should fail")
}

// ----------------------------------------------------------------------
// Scalars
// ----------------------------------------------------------------------

#[test]
fn test_scalar_mapping() {
    assert_eq!(
        yaml_to_json("key: value", &Options::default()).unwrap(),
        "{\n  \"key\": \"value\"\n}"
    );
}

#[test]
fn test_scalar_classification() {
    let v = convert("n: 42\nf: 1.5e2\nq: \"42\"\nb: true\nz: null\ns: plain text");
    assert_eq!(
        v,
        json!({"n": 42, "f": 150.0, "q": "42", "b": true, "z": null, "s": "plain text"})
    );
}

#[test]
fn test_thousands_grouping_float() {
    assert_eq!(convert("f: 1,234.5"), json!({"f": 1234.5}));
}

#[test]
fn test_missing_value_is_null() {
    assert_eq!(convert("a:\nb: 1"), json!({"a": null, "b": 1}));
    assert_eq!(convert("a:"), json!({"a": null}));
}

#[test]
fn test_timestamps_normalize_to_utc() {
    let v = convert("d: 2024-01-01\nt: 2024-06-05T12:30:00+02:00");
    assert_eq!(
        v,
        json!({"d": "2024-01-01T00:00:00Z", "t": "2024-06-05T10:30:00Z"})
    );
}

#[test]
fn test_yes_no_option() {
    assert_eq!(convert("a: yes\nb: no"), json!({"a": "yes", "b": "no"}));
    let opts = Options {
        yes_no_bool: true,
        ..Options::default()
    };
    assert_eq!(
        yaml_to_json_value("a: yes\nb: no", &opts).unwrap(),
        json!({"a": true, "b": false})
    );
}

#[test]
fn test_trailing_comment() {
    assert_eq!(convert("a: 1 # the answer"), json!({"a": 1}));
}

#[test]
fn test_plain_multiline_scalar() {
    assert_eq!(
        convert("a: one\n  two\n  three"),
        json!({"a": "one two three"})
    );
    assert_eq!(convert("a:\n  one\n  two"), json!({"a": "one two"}));
}

#[test]
fn test_quoted_multiline_scalar() {
    assert_eq!(
        convert("a: \"one\n  two\""),
        json!({"a": "one\n  two"})
    );
}

#[test]
fn test_single_quote_escaping() {
    assert_eq!(convert("a: 'it''s'"), json!({"a": "it's"}));
}

// ----------------------------------------------------------------------
// Block scalars
// ----------------------------------------------------------------------

#[test]
fn test_folded_block() {
    let v = convert("t: >\n  one\n  two\n  three");
    assert_eq!(v, json!({"t": "one two three\n"}));
}

#[test]
fn test_folded_block_keeps_blank_lines() {
    let v = convert("t: >\n  one\n\n  two");
    assert_eq!(v, json!({"t": "one\ntwo\n"}));
}

#[test]
fn test_literal_block_clip() {
    let v = convert("t: |\n  a\n  b");
    assert_eq!(v, json!({"t": "a\nb\n"}));
}

#[test]
fn test_literal_block_keep_chomp() {
    let v = convert("t: |+\n  a\n\n  b\n\nnext: 1");
    assert_eq!(v["t"], json!("a\n\nb\n\n"));
}

#[test]
fn test_literal_block_strip_chomp() {
    let v = convert("t: |-\n  a\n  b\n");
    assert_eq!(v, json!({"t": "a\nb"}));
}

// ----------------------------------------------------------------------
// Sequences and inline arrays
// ----------------------------------------------------------------------

#[test]
fn test_root_sequence() {
    assert_eq!(convert("- 1\n- 2\n- three"), json!([1, 2, "three"]));
}

#[test]
fn test_sequence_under_key() {
    assert_eq!(convert("a:\n  - 1\n  - 2"), json!({"a": [1, 2]}));
    assert_eq!(convert("a:\n- 1\n- 2"), json!({"a": [1, 2]}));
}

#[test]
fn test_sequence_of_mappings() {
    let v = convert("- x: 1\n  y: 2\n- w: 3");
    assert_eq!(v, json!([{"x": 1, "y": 2}, {"w": 3}]));
}

#[test]
fn test_nested_block_sequences() {
    assert_eq!(convert("- - 1\n  - 2\n- 3"), json!([[1, 2], 3]));
}

#[test]
fn test_bare_dash_items() {
    assert_eq!(convert("a:\n  -\n  - 1"), json!({"a": [null, 1]}));
}

#[test]
fn test_inline_array() {
    assert_eq!(convert("a: [1, 2, three]"), json!({"a": [1, 2, "three"]}));
}

#[test]
fn test_inline_array_nested() {
    assert_eq!(
        convert("a: [1, [2, 3], 4]"),
        json!({"a": [1, [2, 3], 4]})
    );
}

#[test]
fn test_inline_array_with_nulls() {
    assert_eq!(convert("a: [1, , 3]"), json!({"a": [1, null, 3]}));
}

#[test]
fn test_inline_array_trailing_comma_inserts_null() {
    // A `]` preceded by a comma separator inserts a null.
    assert_eq!(convert("a: [1, 2, ]"), json!({"a": [1, 2, null]}));
    assert_eq!(convert("a: []"), json!({"a": []}));
}

#[test]
fn test_inline_tuple_becomes_object() {
    assert_eq!(
        convert("a: [x: 1, 2]"),
        json!({"a": [{"x": 1}, 2]})
    );
}

#[test]
fn test_inline_array_spanning_lines() {
    assert_eq!(
        convert("a: [1,\n    2,\n    3]"),
        json!({"a": [1, 2, 3]})
    );
}

// ----------------------------------------------------------------------
// Anchors, aliases, merges
// ----------------------------------------------------------------------

#[test]
fn test_alias_copies_subtree() {
    let v = convert("a: &base\n  x: 1\n  y: 2\nb: *base");
    assert_eq!(v["a"], v["b"]);
    assert_eq!(v["a"], json!({"x": 1, "y": 2}));
}

#[test]
fn test_alias_copies_scalar() {
    let v = convert("a: &n 5\nb: *n");
    assert_eq!(v, json!({"a": 5, "b": 5}));
}

#[test]
fn test_alias_in_sequence() {
    let v = convert("- &d\n  x: 1\n- *d");
    assert_eq!(v, json!([{"x": 1}, {"x": 1}]));
}

#[test]
fn test_anchor_on_inline_array() {
    let v = convert("base: &nums [1, 2]\ncopy: *nums");
    assert_eq!(v["base"], v["copy"]);
    assert_eq!(v["base"], json!([1, 2]));
}

#[test]
fn test_merge_with_override() {
    let v = convert("a: &base\n  x: 1\n  y: 2\nb:\n  <<: *base\n  y: 99\n  z: 3");
    assert_eq!(v["b"], json!({"x": 1, "y": 99, "z": 3}));
    assert_eq!(v["a"], json!({"x": 1, "y": 2}));
}

#[test]
fn test_merge_replaces_sequences_wholesale() {
    let v = convert("a: &base\n  tags: [1, 2]\n  x: 0\nb:\n  <<: *base\n  tags: [9]");
    assert_eq!(v["b"], json!({"tags": [9], "x": 0}));
}

#[test]
fn test_merge_chain() {
    let v = convert(
        "a: &one\n  x: 1\nb: &two\n  <<: *one\n  y: 2\nc:\n  <<: *two\n  z: 3",
    );
    assert_eq!(v["c"], json!({"x": 1, "y": 2, "z": 3}));
}

#[test]
fn test_anchor_not_found() {
    assert!(matches!(
        convert_err("a: *missing"),
        ParseError::AnchorNotFound(name, 1) if name == "missing"
    ));
}

#[test]
fn test_duplicate_anchor() {
    assert!(matches!(
        convert_err("a: &x 1\nb: &x 2"),
        ParseError::DuplicateAnchor(name, 2) if name == "x"
    ));
}

#[test]
fn test_recursive_alias() {
    assert!(matches!(
        convert_err("a: &x\n  b: *x"),
        ParseError::AliasRecursive(name, 2) if name == "x"
    ));
}

#[test]
fn test_merge_of_scalar_anchor() {
    assert!(matches!(
        convert_err("a: &s 5\nb:\n  <<: *s"),
        ParseError::MergeSingleValue(3)
    ));
}

#[test]
fn test_merge_without_alias() {
    assert!(matches!(
        convert_err("a:\n  <<: 5"),
        ParseError::MergeInvalid(2)
    ));
}

// ----------------------------------------------------------------------
// Tags
// ----------------------------------------------------------------------

#[test]
fn test_str_tag_forces_string() {
    assert_eq!(convert("n: !!str 42"), json!({"n": "42"}));
}

#[test]
fn test_int_tag_rejects_quoted() {
    assert!(matches!(
        convert_err("n: !!int \"12\""),
        ParseError::InvalidValueForTag(tag, 1) if tag == "!!int"
    ));
}

#[test]
fn test_int_tag_rejects_string() {
    assert!(matches!(
        convert_err("n: !!int twelve"),
        ParseError::InvalidValueForTag(_, 1)
    ));
}

#[test]
fn test_float_tag_accepts_integer() {
    assert_eq!(convert("f: !!float 2"), json!({"f": 2.0}));
}

#[test]
fn test_null_tag_overrides() {
    assert_eq!(
        convert("m: !!map null\ns: !!seq null"),
        json!({"m": {}, "s": []})
    );
}

#[test]
fn test_seq_tag_on_mapping_fails() {
    assert!(matches!(
        convert_err("a: !!seq\n  x: 1"),
        ParseError::InvalidValueForTag(tag, 1) if tag == "!!seq"
    ));
}

#[test]
fn test_local_tag_is_string() {
    assert_eq!(convert("a: !mine 42"), json!({"a": "42"}));
}

#[test]
fn test_binary_tag() {
    let v = convert("b: !!binary SGVsbG8=");
    assert_eq!(v, json!({"b": [72, 101, 108, 108, 111]}));
}

#[test]
fn test_binary_multiline_joins_without_separator() {
    let v = convert("b: !!binary SGVs\n  bG8=");
    assert_eq!(v, json!({"b": [72, 101, 108, 108, 111]}));
}

#[test]
fn test_unknown_tag() {
    assert!(matches!(convert_err("a: !!frob 1"), ParseError::InvalidTag(1)));
}

// ----------------------------------------------------------------------
// Error catalogue
// ----------------------------------------------------------------------

#[test]
fn test_duplicate_key_policy() {
    assert!(matches!(
        convert_err("a: 1\na: 2"),
        ParseError::DuplicatedKey(key, 2) if key == "a"
    ));
    let opts = Options {
        allow_duplicate_keys: true,
        ..Options::default()
    };
    assert!(yaml_to_json("a: 1\na: 2", &opts).is_ok());
}

#[test]
fn test_unclosed_quote_at_eof() {
    assert!(matches!(
        convert_err("a: \"never closed"),
        ParseError::UnclosedLiteral(1)
    ));
}

#[test]
fn test_unclosed_inline_array() {
    assert!(matches!(
        convert_err("a: [1, 2"),
        ParseError::UnclosedArray(1)
    ));
}

#[test]
fn test_collection_item_in_inline_array() {
    assert!(matches!(
        convert_err("a: [- 1]"),
        ParseError::CollectionInArray(1)
    ));
}

#[test]
fn test_merge_in_inline_array() {
    assert!(matches!(
        convert_err("a: [<<: *x]"),
        ParseError::MergeInArray(1)
    ));
}

#[test]
fn test_alias_with_value() {
    assert!(matches!(convert_err("a: *x 1"), ParseError::AliasValue(1)));
}

#[test]
fn test_empty_key() {
    assert!(matches!(convert_err(": 1"), ParseError::KeyNameEmpty(1)));
}

#[test]
fn test_key_with_invalid_char() {
    assert!(matches!(
        convert_err("a[b]: 1"),
        ParseError::KeyNameInvalidChar(1)
    ));
}

#[test]
fn test_anchor_on_key() {
    assert!(matches!(
        convert_err("&x a: 1"),
        ParseError::KeyNameAnchorAlias(1)
    ));
}

#[test]
fn test_block_modifier_on_item() {
    assert!(matches!(
        convert_err("- |\n  text"),
        ParseError::CollectionBlock(1)
    ));
}

#[test]
fn test_same_line_dash_value() {
    assert!(matches!(
        convert_err("a: - 1"),
        ParseError::CollectionItem(1)
    ));
}

#[test]
fn test_expected_key() {
    assert!(matches!(convert_err("a: 1\nstray"), ParseError::ExpectedKey(2)));
}

#[test]
fn test_stray_indent() {
    assert!(matches!(
        convert_err("a: 1\n  b: 2"),
        ParseError::InvalidIndent(2)
    ));
}

// ----------------------------------------------------------------------
// Universal properties
// ----------------------------------------------------------------------

#[test]
fn test_ordering_follows_source() {
    let text = yaml_to_json("zebra: 1\nalpha: 2\nmiddle: 3", &Options::default()).unwrap();
    let z = text.find("zebra").unwrap();
    let a = text.find("alpha").unwrap();
    let m = text.find("middle").unwrap();
    assert!(z < a && a < m);
}

#[test]
fn test_output_always_reparses() {
    let docs = [
        "key: value",
        "- 1\n- 2",
        "a: [1, , 3]",
        "a: &base\n  x: 1\nb: *base",
        "t: |\n  line one\n  line two",
        "a:\n  - x: 1\n    y: [true, false]",
    ];
    for doc in docs {
        let text = yaml_to_json(doc, &Options::default()).unwrap();
        assert!(try_parse_json(&text), "output must reparse: {}", text);
    }
}

#[test]
fn test_unformatted_output_still_parses() {
    let opts = Options {
        indent: 0,
        ..Options::default()
    };
    let text = yaml_to_json("a:\n  - 1\n  - x: 2", &opts).unwrap();
    assert!(try_parse_json(&text));
}

#[test]
fn test_json_roundtrip_through_yaml() {
    let tree = json!({
        "name": "widget",
        "count": 3,
        "ratio": 1.5,
        "whole": 150.0,
        "enabled": true,
        "missing": null,
        "tags": ["a", "b"],
        "nested": {"deep": {"x": 1}},
        "tricky": "42",
        "truthy": "true",
        "empty": "",
        "multiline": "line one\nline two\n",
        "empty_arr": [],
        "empty_obj": {}
    });
    let yaml = json_value_to_yaml(&tree, &Options::default());
    let back = yaml_to_json_value(&yaml, &Options::default()).unwrap();
    assert_eq!(tree, back);
}

#[test]
fn test_idempotence_after_one_round() {
    let source = "name: demo\nitems:\n  - id: 1\n    note: |\n      first\n      second\n  - id: 2\nlimits: [10, 20]";
    let opts = Options::default();
    let v1 = yaml_to_json_value(source, &opts).unwrap();
    let y2 = json_value_to_yaml(&v1, &opts);
    let v2 = yaml_to_json_value(&y2, &opts).unwrap();
    assert_eq!(v1, v2);
    let y3 = json_value_to_yaml(&v2, &opts);
    assert_eq!(y2, y3);
}

#[test]
fn test_alias_expansion_preserves_scalar_count() {
    let v = convert("a: &base\n  x: 1\n  y:\n    z: 2\nb: *base");
    fn count_scalars(v: &Value) -> usize {
        match v {
            Value::Array(items) => items.iter().map(count_scalars).sum(),
            Value::Object(map) => map.values().map(count_scalars).sum(),
            _ => 1,
        }
    }
    assert_eq!(count_scalars(&v["a"]), count_scalars(&v["b"]));
}

// ----------------------------------------------------------------------
// J side: parsing, minify, reverse emission
// ----------------------------------------------------------------------

#[test]
fn test_json_root_must_be_container() {
    assert!(try_parse_json("{\"a\": 1}"));
    assert!(try_parse_json("[1, 2]"));
    assert!(!try_parse_json("42"));
    assert!(!try_parse_json("\"text\""));
    assert!(!try_parse_json("not json"));
}

#[test]
fn test_minify() {
    let text = yaml_to_json("a: 1\nb:\n  - 2", &Options::default()).unwrap();
    let flat = minify_json(&text);
    assert!(!flat.contains('\n'));
    assert_eq!(flat, "{ \"a\": 1, \"b\": [ 2 ] }");
}

#[test]
fn test_json_to_yaml_basic() {
    let yaml = json_to_yaml("{\"a\": 1, \"b\": [1, 2]}", &Options::default()).unwrap();
    assert_eq!(yaml, "a: 1\nb:\n  - 1\n  - 2");
}

#[test]
fn test_json_to_yaml_quotes_ambiguous_strings() {
    let yaml = json_to_yaml(
        "{\"a\": \"42\", \"b\": \"null\", \"c\": \"x: y\"}",
        &Options::default(),
    )
    .unwrap();
    assert_eq!(yaml, "a: '42'\nb: 'null'\nc: 'x: y'");
}

#[test]
fn test_json_to_yaml_yes_no() {
    let opts = Options {
        yes_no_bool: true,
        ..Options::default()
    };
    assert_eq!(json_to_yaml("{\"a\": true}", &opts).unwrap(), "a: yes");
}

#[test]
fn test_json_to_yaml_multiline_string() {
    let yaml = json_to_yaml("{\"t\": \"a\\nb\\n\"}", &Options::default()).unwrap();
    assert_eq!(yaml, "t: |\n  a\n  b");
}

#[test]
fn test_empty_documents() {
    assert_eq!(convert(""), json!({}));
    assert_eq!(convert("# only a comment\n"), json!({}));
    assert_eq!(json_to_yaml("{}", &Options::default()).unwrap(), "{}");
    assert_eq!(convert("{}"), json!({}));
    assert_eq!(convert("[]"), json!([]));
}
