//! Error types for template filling.

use std::collections::BTreeMap;

use strsim::levenshtein;
use thiserror::Error;

use crate::types::ValueKind;

/// A template fill left required placeholders unresolved.
///
/// Raised only by the strict entry points; a plain fill reports the same
/// information on its [`TemplateResult`](crate::TemplateResult) instead.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{}", unsolved_message(.template, .missing_keys, .invalid_types))]
pub struct TemplateUnsolved {
    /// The template text that was filled.
    pub template: String,
    /// Keys that were not present in the data, sorted and deduplicated.
    pub missing_keys: Vec<String>,
    /// Keys whose values had a type that cannot fill a placeholder.
    pub invalid_types: BTreeMap<String, ValueKind>,
    /// Similar existing keys for each missing key, closest first.
    pub suggestions: BTreeMap<String, Vec<String>>,
}

fn unsolved_message(
    template: &str,
    missing_keys: &[String],
    invalid_types: &BTreeMap<String, ValueKind>,
) -> String {
    let mut message = format!("Template \"{template}\" is unsolved.");
    if !missing_keys.is_empty() {
        message.push_str(&format!(" Missing keys: \"{}\".", missing_keys.join(", ")));
    }
    if !invalid_types.is_empty() {
        let items: Vec<String> = invalid_types
            .iter()
            .map(|(key, kind)| format!("\"{key}\" ({kind})"))
            .collect();
        message.push_str(&format!(
            " Keys with invalid data type: `{}`.",
            items.join(", ")
        ));
    }
    message
}

/// Compute typo suggestions for a key that was not found.
///
/// - Keys of up to 3 characters allow an edit distance of 1, longer keys 2
/// - Exact matches are skipped
/// - At most 3 suggestions, closest first
pub fn compute_suggestions<'a>(
    name: &str,
    available: impl IntoIterator<Item = &'a String>,
) -> Vec<String> {
    let max_distance = if name.chars().count() <= 3 { 1 } else { 2 };
    let mut suggestions: Vec<(usize, String)> = available
        .into_iter()
        .filter_map(|candidate| {
            let dist = levenshtein(name, candidate);
            if dist <= max_distance && dist > 0 {
                Some((dist, candidate.clone()))
            } else {
                None
            }
        })
        .collect();

    suggestions.sort_by_key(|(dist, _)| *dist);
    suggestions.into_iter().take(3).map(|(_, s)| s).collect()
}
