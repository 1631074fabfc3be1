//! Miette diagnostic for templates that could not be fully resolved.
//!
//! Note: This module has an exception for `unused_assignments` because miette
//! derive macros read struct fields in generated code that rustc cannot track.
#![allow(unused_assignments)]

use miette::{Diagnostic, LabeledSpan, NamedSource};
use pathtpl::parser::{is_balanced, join_path, path_segments};
use pathtpl::{Data, Template, TemplateResult, TemplateUnsolved, Value};
use thiserror::Error;

/// A miette-compatible diagnostic for an unsolved fill.
///
/// The template is the source code; every required placeholder that failed
/// gets a label, and typo suggestions become the help text.
///
/// Note: Fields are read by miette derive macros, not directly by code.
#[derive(Debug, Error, Diagnostic)]
#[error("{message}")]
#[diagnostic(code(pathtpl::unsolved))]
pub struct UnsolvedDiagnostic {
    #[source_code]
    src: NamedSource<String>,

    #[label(collection)]
    labels: Vec<LabeledSpan>,

    message: String,

    #[help]
    help: Option<String>,
}

impl UnsolvedDiagnostic {
    /// Create a diagnostic for `template` from the fill that produced `err`.
    pub fn new(template: &Template, result: &TemplateResult, err: &TemplateUnsolved) -> Self {
        let labels = template
            .placeholders()
            .into_iter()
            .filter(|(depth, _)| *depth == 0)
            .filter_map(|(_, placeholder)| {
                let label =
                    failure_label(placeholder.key(), placeholder.lookup_key(), result, err)?;
                Some(LabeledSpan::new_with_span(Some(label), placeholder.span.clone()))
            })
            .collect();

        let help = if err.suggestions.is_empty() {
            None
        } else {
            let hints: Vec<String> = err
                .suggestions
                .iter()
                .map(|(key, candidates)| {
                    format!("for `{key}` did you mean `{}`?", candidates.join("`, `"))
                })
                .collect();
            Some(hints.join("\n"))
        };

        UnsolvedDiagnostic {
            src: NamedSource::new("template", template.as_str().to_string()),
            labels,
            message: err.to_string(),
            help,
        }
    }
}

/// Explain why a required placeholder failed, or `None` if it resolved.
fn failure_label(
    key: &str,
    lookup_key: &str,
    result: &TemplateResult,
    err: &TemplateUnsolved,
) -> Option<String> {
    if !is_balanced(key) {
        return Some("unbalanced brackets".to_string());
    }

    let path = path_segments(lookup_key);
    if path.is_empty() {
        return Some("empty key".to_string());
    }
    if is_used(result.used_values(), &path) {
        return None;
    }

    // The recorded key is the longest prefix of the path that was reached.
    (1..=path.len()).rev().find_map(|depth| {
        let prefix = join_path(&path[..depth]);
        if err.missing_keys.contains(&prefix) {
            Some(format!("`{prefix}` is missing"))
        } else {
            err.invalid_types
                .get(&prefix)
                .map(|kind| format!("`{prefix}` is {kind}"))
        }
    })
}

/// Whether `path` names a value consumed by the fill.
fn is_used(used: &Data, path: &[&str]) -> bool {
    let Some((first, rest)) = path.split_first() else {
        return false;
    };
    let Some(mut current) = used.get(*first) else {
        return false;
    };
    for segment in rest {
        let Some(next) = current.as_map().and_then(|map| map.get(*segment)) else {
            return false;
        };
        current = next;
    }
    !matches!(current, Value::Map(_))
}
