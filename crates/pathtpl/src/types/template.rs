use std::convert::Infallible;
use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::{FromStr, from_utf8};

use tracing::debug;

use crate::interpreter::{TemplateUnsolved, eval_template};
use crate::parser::{CompileError, Part, Placeholder, parse_template};
use crate::types::{Data, TemplateResult, Value};

/// A compiled template: the raw text plus its immutable part tree.
///
/// Compile once and fill many times. Filling never mutates the template, so a
/// single `Template` can be shared across threads and filled concurrently.
///
/// # Example
///
/// ```
/// use pathtpl::{Template, data};
///
/// let template = Template::compile("{root}/{project[name]}<_{task}>/v{version:0>3}");
///
/// let result = template.format(&data! {
///     "root" => "/mnt/work",
///     "project" => data! { "name" => "demo" },
///     "version" => 7,
/// });
/// assert!(result.solved());
/// assert_eq!(result, "/mnt/work/demo/v007");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    raw: String,
    parts: Vec<Part>,
}

impl Template {
    /// Compile a template string.
    pub fn compile(raw: impl Into<String>) -> Template {
        let raw = raw.into();
        let parts = parse_template(&raw);
        debug!(template = %raw, parts = parts.len(), "compiled template");
        Template { raw, parts }
    }

    /// The original template text.
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// The top-level parts of the compiled tree.
    pub fn parts(&self) -> &[Part] {
        &self.parts
    }

    /// All placeholders in template order, paired with how many optional
    /// regions enclose each one (0 means required).
    pub fn placeholders(&self) -> Vec<(usize, &Placeholder)> {
        let mut found = Vec::new();
        collect_placeholders(&self.parts, 0, &mut found);
        found
    }

    /// Whether the template text contains `needle`.
    pub fn contains(&self, needle: &str) -> bool {
        self.raw.contains(needle)
    }

    /// Returns a new template compiled from this one's text with every `from`
    /// replaced by `to`.
    pub fn replace(&self, from: &str, to: &str) -> Template {
        Template::compile(self.raw.replace(from, to))
    }

    /// Fill the template with `data`.
    ///
    /// Never fails: unresolved placeholders are passed through as written and
    /// reported on the returned [`TemplateResult`].
    pub fn format(&self, data: &Data) -> TemplateResult {
        eval_template(self, data)
    }

    /// Fill the template with `data`, failing if any required placeholder
    /// could not be resolved.
    ///
    /// # Errors
    ///
    /// Returns [`TemplateUnsolved`] describing the missing keys and invalid
    /// value types when the result is not solved.
    pub fn format_strict(&self, data: &Data) -> Result<TemplateResult, TemplateUnsolved> {
        let result = self.format(data);
        result.validate()?;
        Ok(result)
    }
}

fn collect_placeholders<'a>(
    parts: &'a [Part],
    depth: usize,
    found: &mut Vec<(usize, &'a Placeholder)>,
) {
    for part in parts {
        match part {
            Part::Literal(_) => {}
            Part::Key(placeholder) => found.push((depth, placeholder)),
            Part::Optional(children) => collect_placeholders(children, depth + 1, found),
        }
    }
}

impl Display for Template {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(&self.raw)
    }
}

impl FromStr for Template {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Template::compile(s))
    }
}

impl From<&str> for Template {
    fn from(raw: &str) -> Self {
        Template::compile(raw)
    }
}

impl From<String> for Template {
    fn from(raw: String) -> Self {
        Template::compile(raw)
    }
}

impl TryFrom<&[u8]> for Template {
    type Error = CompileError;

    fn try_from(bytes: &[u8]) -> Result<Self, Self::Error> {
        let raw = from_utf8(bytes).map_err(|_| CompileError::InvalidUtf8)?;
        Ok(Template::compile(raw))
    }
}

impl TryFrom<Vec<u8>> for Template {
    type Error = CompileError;

    fn try_from(bytes: Vec<u8>) -> Result<Self, Self::Error> {
        let raw = String::from_utf8(bytes).map_err(|_| CompileError::InvalidUtf8)?;
        Ok(Template::compile(raw))
    }
}

impl TryFrom<&Value> for Template {
    type Error = CompileError;

    fn try_from(value: &Value) -> Result<Self, Self::Error> {
        match value {
            Value::String(raw) => Ok(Template::compile(raw.as_str())),
            other => Err(CompileError::NotAString { kind: other.kind() }),
        }
    }
}
