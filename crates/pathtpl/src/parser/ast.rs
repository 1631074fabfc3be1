//! Public parse-tree types for compiled templates.
//!
//! These types are public to enable external tooling (linters, previews, etc.).

use std::ops::Range;

use super::key;

/// A node of a compiled template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Part {
    /// Literal text, copied to the output verbatim.
    Literal(String),
    /// A `{...}` placeholder.
    Key(Placeholder),
    /// The contents of a `<...>` region, dropped entirely if anything inside
    /// cannot be resolved.
    Optional(Vec<Part>),
}

/// A single `{...}` placeholder as written in the template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placeholder {
    /// Full placeholder text including braces, e.g. `{version:0>3}`.
    pub raw: String,
    /// Byte range of `raw` within the template string.
    pub span: Range<usize>,
}

impl Placeholder {
    /// Create a placeholder from its raw text and location.
    pub fn new(raw: impl Into<String>, span: Range<usize>) -> Self {
        Self {
            raw: raw.into(),
            span,
        }
    }

    /// The text between the outer braces, e.g. `version:0>3`.
    pub fn key(&self) -> &str {
        self.raw
            .strip_prefix('{')
            .and_then(|k| k.strip_suffix('}'))
            .unwrap_or(&self.raw)
    }

    /// The dictionary path portion of the key, without any format spec.
    pub fn lookup_key(&self) -> &str {
        key::split_format_spec(self.key()).0
    }

    /// The format spec after the first top-level `:`, if any.
    pub fn format_spec(&self) -> Option<&str> {
        key::split_format_spec(self.key()).1
    }
}
