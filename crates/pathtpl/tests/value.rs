//! Tests for fill data values.

use pathtpl::{AsFormattable, Data, Value, ValueKind, compile, data};

#[derive(Debug)]
struct Code(&'static str);

impl AsFormattable for Code {
    fn to_template_string(&self) -> String {
        self.0.to_uppercase()
    }
}

#[test]
fn data_deserializes_from_json() {
    let data: Data = serde_json::from_str(
        r#"{
            "root": "/mnt",
            "version": 12,
            "fps": 23.976,
            "final": true,
            "tags": ["a", "b"],
            "project": {"name": "demo", "code": null}
        }"#,
    )
    .unwrap();

    assert_eq!(data["root"], Value::from("/mnt"));
    assert_eq!(data["version"], Value::Number(12));
    assert_eq!(data["fps"], Value::Float(23.976));
    assert_eq!(data["final"], Value::Bool(true));
    assert_eq!(data["tags"], Value::from(vec!["a", "b"]));
    assert_eq!(
        data["project"],
        Value::from(data! { "name" => "demo", "code" => Value::Null })
    );
}

#[test]
fn large_unsigned_numbers_become_floats() {
    let value: Value = serde_json::from_str("18446744073709551615").unwrap();
    assert_eq!(value.kind(), ValueKind::Float);
    let value: Value = serde_json::from_str("9223372036854775807").unwrap();
    assert_eq!(value, Value::Number(i64::MAX));
}

#[test]
fn values_serialize_as_plain_json() {
    let data = data! {
        "a" => 1,
        "b" => Value::formattable(Code("dm")),
        "c" => Option::<i32>::None,
        "d" => vec![1.5],
    };
    assert_eq!(
        serde_json::to_value(&data).unwrap(),
        serde_json::json!({ "a": 1, "b": "DM", "c": null, "d": [1.5] })
    );
}

#[test]
fn kinds_and_leaves() {
    assert_eq!(Value::Null.kind(), ValueKind::Null);
    assert_eq!(Value::from(1).kind(), ValueKind::Number);
    assert_eq!(Value::from(1.0).kind(), ValueKind::Float);
    assert_eq!(Value::from(Data::new()).kind(), ValueKind::Map);
    assert_eq!(
        Value::formattable(Code("x")).kind(),
        ValueKind::Formattable
    );

    assert!(Value::from("x").is_leaf());
    assert!(Value::from(false).is_leaf());
    assert!(Value::formattable(Code("x")).is_leaf());
    assert!(!Value::Null.is_leaf());
    assert!(!Value::from(vec![1]).is_leaf());
    assert!(!Value::from(Data::new()).is_leaf());
}

#[test]
fn kind_names_are_lowercase() {
    assert_eq!(ValueKind::Formattable.to_string(), "formattable");
    assert_eq!(ValueKind::List.name(), "list");
}

#[test]
fn accessors() {
    assert_eq!(Value::from(3).as_number(), Some(3));
    assert_eq!(Value::from(3).as_float(), Some(3.0));
    assert_eq!(Value::from("x").as_string(), Some("x"));
    assert_eq!(Value::from("x").as_number(), None);
    assert!(Value::from(Data::new()).as_map().is_some());
}

#[test]
fn formattable_values_compare_by_text() {
    assert_eq!(
        Value::formattable(Code("ab")),
        Value::formattable(Code("AB"))
    );
    assert_ne!(Value::formattable(Code("ab")), Value::from("AB"));
}

#[test]
fn option_values_map_to_null() {
    assert_eq!(Value::from(Some("x")), Value::from("x"));
    assert_eq!(Value::from(Option::<&str>::None), Value::Null);
}

#[test]
fn display_renders_nested_values() {
    let value = Value::from(data! { "a" => vec![1, 2], "b" => "x" });
    assert_eq!(value.to_string(), "{a: [1, 2], b: x}");
}

#[test]
fn formattable_fills_placeholders() {
    let result = compile("{code}_{code:.1}").format(&data! {
        "code" => Value::formattable(Code("dm")),
    });
    assert_eq!(result, "DM_D");
    assert_eq!(result.used_values(), &data! { "code" => "DM" });
}
