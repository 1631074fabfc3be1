//! Placeholder key syntax: bracket balance, format specs and lookup paths.
//!
//! Path splitting lives here once and is shared by value lookup during a fill
//! and by the reconstruction of nested used values afterwards.

use crate::types::{Data, Value};

/// Check that every `(`, `[` and `{` in `key` closes in matching order.
///
/// ```
/// use pathtpl::parser::is_balanced;
///
/// assert!(is_balanced("[](){{{[]}}}"));
/// assert!(!is_balanced("[]()()(((([])))"));
/// ```
pub fn is_balanced(key: &str) -> bool {
    let mut expected = Vec::new();
    for c in key.chars() {
        match c {
            '(' => expected.push(')'),
            '[' => expected.push(']'),
            '{' => expected.push('}'),
            ')' | ']' | '}' => {
                if expected.pop() != Some(c) {
                    return false;
                }
            }
            _ => {}
        }
    }
    expected.is_empty()
}

/// Split a key into its lookup key and optional format spec.
///
/// The spec starts after the first `:` that is not inside an index bracket,
/// so `{item[a:b]:>4}` looks up `item[a:b]` and pads to 4.
pub fn split_format_spec(key: &str) -> (&str, Option<&str>) {
    let mut depth = 0usize;
    for (i, c) in key.char_indices() {
        match c {
            '[' => depth += 1,
            ']' => depth = depth.saturating_sub(1),
            ':' if depth == 0 => return (&key[..i], Some(&key[i + 1..])),
            _ => {}
        }
    }
    (key, None)
}

/// Split a lookup key into the dictionary path it names.
///
/// `project[name]` becomes `["project", "name"]`. Empty pieces are dropped.
pub fn path_segments(lookup_key: &str) -> Vec<&str> {
    lookup_key
        .split(['[', ']'])
        .filter(|segment| !segment.is_empty())
        .collect()
}

/// Join path segments back into `first[second][third]` form.
pub fn join_path(segments: &[&str]) -> String {
    let mut joined = String::new();
    for (i, segment) in segments.iter().enumerate() {
        if i == 0 {
            joined.push_str(segment);
        } else {
            joined.push('[');
            joined.push_str(segment);
            joined.push(']');
        }
    }
    joined
}

/// Insert `value` into `target` at the nested location named by `lookup_key`.
///
/// Intermediate entries are created as maps; a non-map value sitting on the
/// path is replaced by a map.
///
/// ```
/// use pathtpl::parser::insert_nested;
/// use pathtpl::{Data, Value};
///
/// let mut data = Data::new();
/// insert_nested(&mut data, "project[name]", Value::from("foo"));
/// let project = data["project"].as_map().unwrap();
/// assert_eq!(project["name"], Value::from("foo"));
/// ```
pub fn insert_nested(target: &mut Data, lookup_key: &str, value: Value) {
    let segments = path_segments(lookup_key);
    let Some((last, parents)) = segments.split_last() else {
        return;
    };
    let mut current = target;
    for segment in parents {
        let slot = current
            .entry((*segment).to_string())
            .or_insert_with(|| Value::Map(Data::new()));
        if !matches!(slot, Value::Map(_)) {
            *slot = Value::Map(Data::new());
        }
        let Value::Map(map) = slot else {
            return;
        };
        current = map;
    }
    current.insert((*last).to_string(), value);
}
