//! Tests for error types and error message formatting.

use std::collections::BTreeMap;

use pathtpl::interpreter::FormatSpecError;
use pathtpl::{CompileError, Data, TemplateUnsolved, ValueKind, compute_suggestions, data};

#[test]
fn compute_suggestions_finds_similar_keys() {
    let available = vec![
        "root".to_string(),
        "task".to_string(),
        "asset".to_string(),
        "shot".to_string(),
    ];

    // "rot" is close to "root" (distance 1)
    let suggestions = compute_suggestions("rot", &available);
    assert_eq!(suggestions, vec!["root"]);

    // "shto" is 2 edits from "shot" and 3 from "root"
    let suggestions = compute_suggestions("shto", &available);
    assert_eq!(suggestions, vec!["shot"]);

    // "taks" is close to "task"; "asset" is too far
    let suggestions = compute_suggestions("taks", &available);
    assert_eq!(suggestions[0], "task");

    // "xyz" has no close matches
    let suggestions = compute_suggestions("xyz", &available);
    assert!(suggestions.is_empty());
}

#[test]
fn compute_suggestions_skips_exact_match() {
    let available = vec!["task".to_string(), "tasks".to_string()];
    assert_eq!(compute_suggestions("task", &available), vec!["tasks"]);
}

#[test]
fn compute_suggestions_closest_first() {
    let available = vec!["versions".to_string(), "version".to_string()];
    assert_eq!(
        compute_suggestions("versio", &available),
        vec!["version", "versions"]
    );
}

#[test]
fn compute_suggestions_limits_to_three() {
    let available: Vec<String> = (0..10).map(|i| format!("item{}", i)).collect();

    // "item" is close to all of them
    let suggestions = compute_suggestions("item", &available);
    assert_eq!(suggestions.len(), 3);
}

#[test]
fn short_keys_allow_one_edit() {
    let available = vec!["abc".to_string()];
    assert!(compute_suggestions("a", &available).is_empty());
    assert_eq!(compute_suggestions("ab", &available), vec!["abc"]);
}

#[test]
fn template_unsolved_displays_template_and_keys() {
    let err = TemplateUnsolved {
        template: "{root}/{task}".to_string(),
        missing_keys: vec!["root".to_string(), "task".to_string()],
        invalid_types: BTreeMap::new(),
        suggestions: BTreeMap::new(),
    };
    assert_eq!(
        err.to_string(),
        r#"Template "{root}/{task}" is unsolved. Missing keys: "root, task"."#
    );
}

#[test]
fn template_unsolved_lists_invalid_types() {
    let err = TemplateUnsolved {
        template: "{a}{b}".to_string(),
        missing_keys: Vec::new(),
        invalid_types: BTreeMap::from([
            ("a".to_string(), ValueKind::List),
            ("b".to_string(), ValueKind::Null),
        ]),
        suggestions: BTreeMap::new(),
    };
    assert_eq!(
        err.to_string(),
        r#"Template "{a}{b}" is unsolved. Keys with invalid data type: `"a" (list), "b" (null)`."#
    );
}

#[test]
fn template_unsolved_message_omits_suggestions() {
    let err = pathtpl::format_strict_template("{projct}", &data! { "project" => "x" }).unwrap_err();
    let msg = err.to_string();
    // Once in the template text, once in the missing keys.
    assert_eq!(msg.matches("projct").count(), 2);
    assert!(!msg.contains("project"));
    assert_eq!(err.suggestions["projct"], vec!["project"]);
}

#[test]
fn repeated_missing_key_reported_once() {
    let err = pathtpl::format_strict_template("{a}/{a}/{a:>3}", &Data::new()).unwrap_err();
    assert_eq!(err.missing_keys, vec!["a"]);
    assert_eq!(err.to_string().matches("\"a\"").count(), 1);
}

#[test]
fn compile_error_messages() {
    assert_eq!(
        CompileError::InvalidUtf8.to_string(),
        "template is not valid UTF-8"
    );
    assert_eq!(
        CompileError::NotAString {
            kind: ValueKind::Map
        }
        .to_string(),
        "template must be a string, not map"
    );
}

#[test]
fn format_spec_error_messages() {
    assert_eq!(
        FormatSpecError::Syntax {
            spec: "??".to_string()
        }
        .to_string(),
        "invalid format spec '??'"
    );
    assert_eq!(
        FormatSpecError::UnknownCode {
            code: 'd',
            kind: ValueKind::String
        }
        .to_string(),
        "unknown format code 'd' for string value"
    );
    assert_eq!(
        FormatSpecError::NotAllowed {
            option: "precision",
            kind: ValueKind::Number
        }
        .to_string(),
        "precision not allowed for number value"
    );
}
