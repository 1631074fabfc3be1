//! Integration tests for template compilation.

use pathtpl::parser::{Part, Placeholder, parse_template};
use pathtpl::{CompileError, Template, Value, ValueKind};

fn lit(text: &str) -> Part {
    Part::Literal(text.to_string())
}

fn key(raw: &str, start: usize) -> Part {
    Part::Key(Placeholder::new(raw, start..start + raw.len()))
}

// =============================================================================
// Literals and placeholders
// =============================================================================

#[test]
fn test_empty_string() {
    assert_eq!(parse_template(""), Vec::<Part>::new());
}

#[test]
fn test_pure_literal() {
    assert_eq!(parse_template("renders/final"), vec![lit("renders/final")]);
}

#[test]
fn test_single_placeholder() {
    assert_eq!(parse_template("{root}"), vec![key("{root}", 0)]);
}

#[test]
fn test_placeholders_between_literals() {
    assert_eq!(
        parse_template("{root}/{project[name]}/work"),
        vec![
            key("{root}", 0),
            lit("/"),
            key("{project[name]}", 7),
            lit("/work"),
        ]
    );
}

#[test]
fn test_placeholder_with_format_spec_keeps_angle_bracket() {
    assert_eq!(
        parse_template("v{version:0>3}"),
        vec![lit("v"), key("{version:0>3}", 1)]
    );
}

#[test]
fn test_unclosed_brace_is_literal() {
    assert_eq!(parse_template("a{b"), vec![lit("a{b")]);
}

#[test]
fn test_stray_closing_brace_is_literal() {
    assert_eq!(parse_template("a}b"), vec![lit("a}b")]);
}

#[test]
fn test_unbalanced_nested_brace_ends_at_first_close() {
    assert_eq!(parse_template("{a{b}c"), vec![key("{a{b}", 0), lit("c")]);
}

#[test]
fn test_placeholder_accessors() {
    let placeholder = Placeholder::new("{item[a:b]:>4}", 0..14);
    assert_eq!(placeholder.key(), "item[a:b]:>4");
    assert_eq!(placeholder.lookup_key(), "item[a:b]");
    assert_eq!(placeholder.format_spec(), Some(">4"));
}

// =============================================================================
// Optional regions
// =============================================================================

#[test]
fn test_optional_region() {
    assert_eq!(
        parse_template("{a}<_{b}>"),
        vec![
            key("{a}", 0),
            Part::Optional(vec![lit("_"), key("{b}", 5)]),
        ]
    );
}

#[test]
fn test_optional_with_single_placeholder() {
    assert_eq!(
        parse_template("<{a}>"),
        vec![Part::Optional(vec![key("{a}", 1)])]
    );
}

#[test]
fn test_empty_optional_is_literal() {
    assert_eq!(parse_template("a<>b"), vec![lit("a"), lit("<>"), lit("b")]);
}

#[test]
fn test_single_literal_optional_keeps_delimiters() {
    assert_eq!(parse_template("<abc>"), vec![lit("<abc>")]);
}

#[test]
fn test_nested_optionals() {
    assert_eq!(
        parse_template("<{a}<.{b}>>"),
        vec![Part::Optional(vec![
            key("{a}", 1),
            Part::Optional(vec![lit("."), key("{b}", 6)]),
        ])]
    );
}

#[test]
fn test_degenerate_inner_group_inside_optional() {
    // The inner group collapses to literal text, so the outer group holds two
    // literals and stays optional.
    assert_eq!(
        parse_template("<<x>y>"),
        vec![Part::Optional(vec![lit("<x>"), lit("y")])]
    );
}

#[test]
fn test_unmatched_open_is_flushed_in_order() {
    assert_eq!(
        parse_template("a<b{c}"),
        vec![lit("a"), lit("<"), lit("b"), key("{c}", 3)]
    );
}

#[test]
fn test_unmatched_opens_keep_nested_order() {
    assert_eq!(
        parse_template("<a<{b}"),
        vec![lit("<"), lit("a"), lit("<"), key("{b}", 3)]
    );
}

#[test]
fn test_unmatched_close_is_literal() {
    assert_eq!(parse_template("a>b"), vec![lit("a"), lit(">"), lit("b")]);
}

// =============================================================================
// Template
// =============================================================================

#[test]
fn test_template_keeps_raw_text() {
    let template = Template::compile("{root}/<{task}>");
    assert_eq!(template.as_str(), "{root}/<{task}>");
    assert_eq!(template.to_string(), "{root}/<{task}>");
    assert!(template.contains("{task}"));
    assert!(!template.contains("{shot}"));
}

#[test]
fn test_template_placeholders_report_optional_depth() {
    let template = Template::compile("{a}<{b}<{c}>>{a}");
    let found: Vec<(usize, &str)> = template
        .placeholders()
        .into_iter()
        .map(|(depth, placeholder)| (depth, placeholder.raw.as_str()))
        .collect();
    assert_eq!(found, vec![(0, "{a}"), (1, "{b}"), (2, "{c}"), (0, "{a}")]);
}

#[test]
fn test_replace_recompiles() {
    let template = Template::compile("{root}/work");
    let replaced = template.replace("work", "<{task}>");
    assert_eq!(replaced.as_str(), "{root}/<{task}>");
    assert_eq!(replaced.placeholders().len(), 2);
    assert!(matches!(replaced.parts()[2], Part::Optional(_)));
    // The original is untouched.
    assert_eq!(template.as_str(), "{root}/work");
}

#[test]
fn test_parse_from_str() {
    let template: Template = "{a}".parse().unwrap();
    assert_eq!(template.placeholders().len(), 1);
}

#[test]
fn test_compile_from_bytes() {
    let template = Template::try_from("{a}/b".as_bytes()).unwrap();
    assert_eq!(template.as_str(), "{a}/b");
}

#[test]
fn test_compile_from_invalid_utf8_fails() {
    let err = Template::try_from(vec![0x7b_u8, 0xff, 0x7d]).unwrap_err();
    assert_eq!(err, CompileError::InvalidUtf8);
}

#[test]
fn test_compile_from_non_string_value_fails() {
    let err = Template::try_from(&Value::from(42)).unwrap_err();
    assert_eq!(
        err,
        CompileError::NotAString {
            kind: ValueKind::Number
        }
    );
    assert_eq!(err.to_string(), "template must be a string, not number");
}

#[test]
fn test_compile_from_string_value() {
    let template = Template::try_from(&Value::from("{a}")).unwrap();
    assert_eq!(template.as_str(), "{a}");
}
