use std::collections::{BTreeMap, BTreeSet};
use std::fmt::{Display, Formatter, Result as FmtResult};
use std::ops::Deref;

use bon::Builder;
use serde::Serialize;

use super::{Data, ValueKind};
use crate::interpreter::TemplateUnsolved;

/// The outcome of filling a template: the best-effort output string plus a
/// diagnosis of everything that could not be resolved.
///
/// Derefs to `str`, so it can be used wherever the filled text is needed.
///
/// # Example
///
/// ```
/// use pathtpl::{compile, data};
///
/// let result = compile("{project[name]}/{task}").format(&data! {
///     "project" => data! { "name" => "demo" },
/// });
///
/// assert!(!result.solved());
/// assert_eq!(result, "demo/{task}");
/// assert!(result.missing_keys().contains("task"));
/// assert!(result.validate().is_err());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Builder, Serialize)]
pub struct TemplateResult {
    /// The filled (or partially filled) text.
    #[serde(rename = "output")]
    #[builder(default)]
    text: String,

    /// The template text this result was produced from.
    #[builder(default)]
    template: String,

    /// Whether every required placeholder was resolved.
    #[builder(default)]
    solved: bool,

    /// The input values actually consumed, nested as in the input data.
    #[builder(default)]
    used_values: Data,

    /// Keys that were not present in the data.
    #[builder(default)]
    missing_keys: BTreeSet<String>,

    /// Keys whose values had a type that cannot fill a placeholder.
    #[builder(default)]
    invalid_types: BTreeMap<String, ValueKind>,

    /// Similar existing keys for each missing required key.
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    #[builder(default)]
    suggestions: BTreeMap<String, Vec<String>>,
}

impl TemplateResult {
    /// The filled text.
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Consume the result, keeping only the filled text.
    pub fn into_string(self) -> String {
        self.text
    }

    /// The template text this result was produced from.
    pub fn template(&self) -> &str {
        &self.template
    }

    /// Whether every required placeholder was resolved.
    ///
    /// Failures inside optional regions never make a result unsolved.
    pub fn solved(&self) -> bool {
        self.solved
    }

    /// The input values actually consumed, nested as in the input data.
    ///
    /// For `{project[name]}` filled with `{"project": {"name": "foo", ...}}`
    /// this is `{"project": {"name": "foo"}}`.
    pub fn used_values(&self) -> &Data {
        &self.used_values
    }

    /// Keys that were not present in the data, e.g. `project[name]`.
    pub fn missing_keys(&self) -> &BTreeSet<String> {
        &self.missing_keys
    }

    /// Keys whose values could not be used, with the type that was found.
    pub fn invalid_types(&self) -> &BTreeMap<String, ValueKind> {
        &self.invalid_types
    }

    /// Typo suggestions for missing required keys, closest first.
    pub fn suggestions(&self) -> &BTreeMap<String, Vec<String>> {
        &self.suggestions
    }

    /// Fail if the result is not solved.
    ///
    /// # Errors
    ///
    /// Returns [`TemplateUnsolved`] carrying the template text, missing keys,
    /// and invalid types.
    pub fn validate(&self) -> Result<(), TemplateUnsolved> {
        if self.solved {
            return Ok(());
        }
        Err(TemplateUnsolved {
            template: self.template.clone(),
            missing_keys: self.missing_keys.iter().cloned().collect(),
            invalid_types: self.invalid_types.clone(),
            suggestions: self.suggestions.clone(),
        })
    }

    /// A copy with the text normalized as a filesystem path.
    ///
    /// Backslashes become `/`, and redundant separators, `.` segments and
    /// `dir/..` pairs are collapsed. Diagnostics are carried over unchanged.
    ///
    /// ```
    /// use pathtpl::{compile, data};
    ///
    /// let result = compile("{root}//shots/./{shot}/../{shot}\\work").format(&data! {
    ///     "root" => "C:\\projects",
    ///     "shot" => "sh010",
    /// });
    /// assert_eq!(result.normalized(), "C:/projects/shots/sh010/work");
    /// ```
    pub fn normalized(&self) -> TemplateResult {
        TemplateResult {
            text: normalize_path(&self.text),
            ..self.clone()
        }
    }
}

/// Normalize a path the way POSIX `normpath` does, after converting
/// backslashes to forward slashes.
fn normalize_path(path: &str) -> String {
    let path = path.replace('\\', "/");
    if path.is_empty() {
        return ".".to_string();
    }

    // POSIX keeps exactly two leading slashes; three or more collapse to one.
    let leading = if path.starts_with("//") && !path.starts_with("///") {
        2
    } else if path.starts_with('/') {
        1
    } else {
        0
    };

    let mut components: Vec<&str> = Vec::new();
    for component in path.split('/') {
        match component {
            "" | "." => {}
            ".." => {
                if leading == 0 && components.last().is_none_or(|last| *last == "..") {
                    components.push("..");
                } else {
                    components.pop();
                }
            }
            other => components.push(other),
        }
    }

    let mut normalized = "/".repeat(leading);
    normalized.push_str(&components.join("/"));
    if normalized.is_empty() {
        ".".to_string()
    } else {
        normalized
    }
}

impl Deref for TemplateResult {
    type Target = str;

    fn deref(&self) -> &str {
        &self.text
    }
}

impl AsRef<str> for TemplateResult {
    fn as_ref(&self) -> &str {
        &self.text
    }
}

impl Display for TemplateResult {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(&self.text)
    }
}

impl PartialEq<str> for TemplateResult {
    fn eq(&self, other: &str) -> bool {
        self.text == other
    }
}

impl PartialEq<&str> for TemplateResult {
    fn eq(&self, other: &&str) -> bool {
        self.text == *other
    }
}

impl PartialEq<String> for TemplateResult {
    fn eq(&self, other: &String) -> bool {
        &self.text == other
    }
}

impl From<TemplateResult> for String {
    fn from(result: TemplateResult) -> Self {
        result.text
    }
}

#[cfg(test)]
mod tests {
    use super::normalize_path;

    #[test]
    fn normalize_path_matches_posix_rules() {
        assert_eq!(normalize_path(""), ".");
        assert_eq!(normalize_path("a//b/"), "a/b");
        assert_eq!(normalize_path("./a/./b"), "a/b");
        assert_eq!(normalize_path("a/b/../c"), "a/c");
        assert_eq!(normalize_path("../a/../../b"), "../../b");
        assert_eq!(normalize_path("/../a"), "/a");
        assert_eq!(normalize_path("//server/share"), "//server/share");
        assert_eq!(normalize_path("///a"), "/a");
        assert_eq!(normalize_path("a\\b\\..\\c"), "a/c");
        assert_eq!(normalize_path("a/.."), ".");
    }
}
