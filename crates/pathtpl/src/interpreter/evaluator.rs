//! Template evaluation: walks a compiled part tree against input data.
//!
//! Evaluation never fails. A placeholder that cannot be resolved is copied to
//! the output as written and recorded on the scratch; an optional region that
//! fails contributes nothing at all.

use tracing::trace;

use crate::interpreter::error::compute_suggestions;
use crate::interpreter::format_spec::apply_format_spec;
use crate::interpreter::scratch::Scratch;
use crate::parser::{Part, Placeholder, is_balanced, join_path, path_segments, split_format_spec};
use crate::types::{Data, Template, TemplateResult, Value, ValueKind};

/// Fill a compiled template with `data`.
pub fn eval_template(template: &Template, data: &Data) -> TemplateResult {
    let mut scratch = Scratch::new();
    eval_parts(template.parts(), data, &mut scratch);
    scratch.finish(template.as_str())
}

fn eval_parts(parts: &[Part], data: &Data, scratch: &mut Scratch) {
    for part in parts {
        match part {
            Part::Literal(text) => scratch.push_str(text),
            Part::Key(placeholder) => resolve_placeholder(placeholder, data, scratch),
            Part::Optional(children) => {
                let mut child = Scratch::optional();
                eval_parts(children, data, &mut child);
                if child.solved() {
                    scratch.merge(child);
                } else {
                    trace!("optional region dropped");
                }
            }
        }
    }
}

/// Where a lookup path ended up in the data.
enum Lookup<'d> {
    /// The path names a value.
    Found(&'d Value),
    /// The first `depth` segments lead nowhere. `siblings` is the mapping the
    /// last segment was looked up in, if there was one.
    Missing {
        depth: usize,
        siblings: Option<&'d Data>,
    },
    /// The value at the first `depth` segments cannot be indexed further.
    NotIndexable { depth: usize, kind: ValueKind },
    /// The key names no path at all (e.g. `{}`).
    Empty,
}

/// Follow `path` through nested mappings.
fn lookup<'d>(data: &'d Data, path: &[&str]) -> Lookup<'d> {
    let Some((first, rest)) = path.split_first() else {
        return Lookup::Empty;
    };
    let Some(mut current) = data.get(*first) else {
        return Lookup::Missing {
            depth: 1,
            siblings: Some(data),
        };
    };

    for (i, segment) in rest.iter().enumerate() {
        current = match current {
            Value::Map(map) => match map.get(*segment) {
                Some(value) => value,
                None => {
                    return Lookup::Missing {
                        depth: i + 2,
                        siblings: Some(map),
                    };
                }
            },
            Value::Null => {
                return Lookup::Missing {
                    depth: i + 2,
                    siblings: None,
                };
            }
            other => {
                return Lookup::NotIndexable {
                    depth: i + 1,
                    kind: other.kind(),
                };
            }
        };
    }

    Lookup::Found(current)
}

/// Resolve one placeholder, appending either its formatted value or its raw
/// text to the scratch.
fn resolve_placeholder(placeholder: &Placeholder, data: &Data, scratch: &mut Scratch) {
    let key = placeholder.key();
    if scratch.push_cached(key) {
        return;
    }

    if !is_balanced(key) {
        scratch.add_missing_key(key.to_string(), Vec::new());
        scratch.push_str(&placeholder.raw);
        return;
    }

    let (lookup_key, spec) = split_format_spec(key);
    let path = path_segments(lookup_key);

    let value = match lookup(data, &path) {
        Lookup::Found(value) => value,
        Lookup::Missing { depth, siblings } => {
            let suggestions = siblings
                .map(|map| compute_suggestions(path[depth - 1], map.keys()))
                .unwrap_or_default();
            scratch.add_missing_key(join_path(&path[..depth]), suggestions);
            scratch.push_str(&placeholder.raw);
            return;
        }
        Lookup::NotIndexable { depth, kind } => {
            scratch.add_invalid_type(join_path(&path[..depth]), kind);
            scratch.push_str(&placeholder.raw);
            return;
        }
        Lookup::Empty => {
            scratch.add_invalid_type(key.to_string(), ValueKind::Map);
            scratch.push_str(&placeholder.raw);
            return;
        }
    };

    if !value.is_leaf() {
        scratch.add_invalid_type(lookup_key.to_string(), value.kind());
        scratch.push_str(&placeholder.raw);
        return;
    }

    match apply_format_spec(value, spec) {
        Ok(formatted) => scratch.push_resolved(key, lookup_key, value.clone(), formatted),
        Err(err) => {
            trace!(key, error = %err, "format spec does not apply");
            scratch.add_invalid_type(lookup_key.to_string(), value.kind());
            scratch.push_str(&placeholder.raw);
        }
    }
}
