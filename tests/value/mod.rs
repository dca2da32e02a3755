// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

#![cfg(test)]

use anyhow::Result;
use labelexpr::*;
use std::collections::BTreeMap;

#[test]
fn json_and_yaml_agree() -> Result<()> {
    let json = Value::from_json_str(
        r#"{"metadata": {"name": "a", "labels": {"app": "web"}}, "spec": {"replicas": 3, "ratio": 0.5}}"#,
    )?;
    let yaml = Value::from_yaml_str(
        "
metadata:
  name: a
  labels:
    app: web
spec:
  replicas: 3
  ratio: 0.5
",
    )?;
    assert_eq!(json, yaml);
    assert_eq!(yaml["metadata"]["labels"]["app"], Value::from("web"));
    Ok(())
}

#[test]
fn yaml_scalar_keys_become_strings() -> Result<()> {
    let v = Value::from_yaml_str("1: one\ntrue: yes\nnull: nothing\n")?;
    let keys: Vec<&str> = v.as_object()?.keys().map(|k| k.as_ref()).collect();
    assert_eq!(keys, vec!["1", "null", "true"]);
    Ok(())
}

#[test]
fn serialize_round_trips_through_json() -> Result<()> {
    let mut fields = BTreeMap::new();
    fields.insert("rune".to_string(), Value::from('a'));
    fields.insert("float".to_string(), Value::from(1.5));
    fields.insert("nil".to_string(), Value::Null);
    fields.insert(
        "slice".to_string(),
        Value::from(vec![Value::from("a"), Value::from(2i64)]),
    );
    let v = Value::from(fields);

    let json = serde_json::to_string(&v)?;
    assert_eq!(json, r#"{"float":1.5,"nil":null,"rune":97,"slice":["a",2]}"#);

    // Code points serialize as numbers and come back as Int.
    let back = Value::from_json_str(&json)?;
    assert_eq!(back, v);
    assert!(matches!(back["rune"], Value::Int(97)));
    Ok(())
}

#[test]
fn accessors() -> Result<()> {
    let v = Value::from_json_str(r#"{"a": [true, 1, 1.5, "s"]}"#)?;
    assert_eq!(v["a"].as_array()?.len(), 4);

    assert!(v["a"][0].as_bool()?);
    assert_eq!(v["a"][1].as_i64()?, 1);
    assert_eq!(v["a"][2].as_f64()?, 1.5);
    assert_eq!(v["a"][3].as_str()?, "s");
    assert!(v["a"][3].as_i64().is_err());
    assert_eq!(v.get_field("missing"), None);
    assert_eq!(v["a"].get_index(9), None);
    assert_eq!(v["a"].kind(), "list");
    Ok(())
}

#[test]
fn values_are_shareable() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<Value>();
}
