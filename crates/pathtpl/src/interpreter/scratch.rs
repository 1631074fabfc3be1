//! Per-fill accumulator for output text and diagnostics.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use tracing::{debug, trace};

use crate::parser::insert_nested;
use crate::types::{Data, TemplateResult, Value, ValueKind};

/// State collected while filling one template, or one optional region of it.
///
/// A fresh scratch is created for every fill and for every optional region,
/// so the compiled template itself is never written to. The scratch tracks:
/// - The output text produced so far
/// - Formatted values by full placeholder key, so a repeated placeholder is
///   resolved once per fill
/// - Missing keys and invalid value types, split by whether they were met
///   inside an optional region
/// - The input values consumed, by lookup key
pub(crate) struct Scratch {
    /// Whether this scratch collects the contents of an optional region.
    optional: bool,
    output: String,
    /// Formatted text by full placeholder key (format spec included).
    resolved: HashMap<String, String>,
    missing_keys: BTreeSet<String>,
    missing_optional_keys: BTreeSet<String>,
    invalid_types: BTreeMap<String, ValueKind>,
    invalid_optional_types: BTreeMap<String, ValueKind>,
    /// Input values by lookup key (format spec stripped).
    used_values: BTreeMap<String, Value>,
    suggestions: BTreeMap<String, Vec<String>>,
}

impl Scratch {
    /// Scratch for a whole fill; failures here are required failures.
    pub(crate) fn new() -> Self {
        Self::with_optional(false)
    }

    /// Scratch for the contents of an optional region.
    pub(crate) fn optional() -> Self {
        Self::with_optional(true)
    }

    fn with_optional(optional: bool) -> Self {
        Self {
            optional,
            output: String::new(),
            resolved: HashMap::new(),
            missing_keys: BTreeSet::new(),
            missing_optional_keys: BTreeSet::new(),
            invalid_types: BTreeMap::new(),
            invalid_optional_types: BTreeMap::new(),
            used_values: BTreeMap::new(),
            suggestions: BTreeMap::new(),
        }
    }

    /// Append literal or passed-through text.
    pub(crate) fn push_str(&mut self, text: &str) {
        self.output.push_str(text);
    }

    /// Append the value already formatted for `key` in this fill, if any.
    pub(crate) fn push_cached(&mut self, key: &str) -> bool {
        match self.resolved.get(key) {
            Some(formatted) => {
                self.output.push_str(formatted);
                true
            }
            None => false,
        }
    }

    /// Record a resolved placeholder and append its formatted text.
    pub(crate) fn push_resolved(
        &mut self,
        key: &str,
        lookup_key: &str,
        value: Value,
        formatted: String,
    ) {
        self.output.push_str(&formatted);
        self.resolved.insert(key.to_string(), formatted);
        self.used_values.insert(lookup_key.to_string(), value);
    }

    /// Record a key that is absent from the data.
    pub(crate) fn add_missing_key(&mut self, key: String, suggestions: Vec<String>) {
        trace!(key = %key, optional = self.optional, "missing key");
        if self.optional {
            self.missing_optional_keys.insert(key);
        } else {
            if !suggestions.is_empty() {
                self.suggestions.insert(key.clone(), suggestions);
            }
            self.missing_keys.insert(key);
        }
    }

    /// Record a key whose value cannot fill a placeholder.
    pub(crate) fn add_invalid_type(&mut self, key: String, kind: ValueKind) {
        trace!(key = %key, %kind, optional = self.optional, "invalid value type");
        if self.optional {
            self.invalid_optional_types.insert(key, kind);
        } else {
            self.invalid_types.insert(key, kind);
        }
    }

    /// Whether nothing has failed in this scratch.
    pub(crate) fn solved(&self) -> bool {
        if self.optional
            && (!self.missing_optional_keys.is_empty() || !self.invalid_optional_types.is_empty())
        {
            return false;
        }
        self.missing_keys.is_empty() && self.invalid_types.is_empty()
    }

    /// Splice a solved child scratch into this one.
    pub(crate) fn merge(&mut self, child: Scratch) {
        self.output.push_str(&child.output);
        self.missing_keys.extend(child.missing_keys);
        self.missing_optional_keys.extend(child.missing_optional_keys);
        self.invalid_types.extend(child.invalid_types);
        self.invalid_optional_types
            .extend(child.invalid_optional_types);
        self.used_values.extend(child.used_values);
        self.resolved.extend(child.resolved);
        self.suggestions.extend(child.suggestions);
    }

    /// Build the final result for `template`.
    pub(crate) fn finish(self, template: &str) -> TemplateResult {
        let solved = self.missing_keys.is_empty() && self.invalid_types.is_empty();

        let mut missing_keys = self.missing_keys;
        missing_keys.extend(self.missing_optional_keys);
        let mut invalid_types = self.invalid_types;
        invalid_types.extend(self.invalid_optional_types);

        let mut used_values = Data::new();
        for (lookup_key, value) in self.used_values {
            insert_nested(&mut used_values, &lookup_key, value.into_plain());
        }

        if !solved {
            debug!(
                template,
                missing = missing_keys.len(),
                invalid = invalid_types.len(),
                "template unsolved"
            );
        }

        TemplateResult::builder()
            .text(self.output)
            .template(template.to_string())
            .solved(solved)
            .used_values(used_values)
            .missing_keys(missing_keys)
            .invalid_types(invalid_types)
            .suggestions(self.suggestions)
            .build()
    }
}
