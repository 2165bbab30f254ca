//! Typed access to loosely structured documents.
//!
//! Workflow and manifest bodies are held as `serde_json` trees. These helpers
//! walk a path of keys and fail with [`DocumentError::TypeMismatch`] when a
//! node has an unexpected type. A `null` node is treated as absent, matching
//! how YAML renders an empty key (`arguments:`).

use std::fmt;

use serde::de::{self, Deserialize, Deserializer, MapAccess, SeqAccess, Visitor};
use serde_json::{Map, Number, Value};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DocumentError {
  #[error("expected {expected} at '{path}', found {found}")]
  TypeMismatch {
    path: String,
    expected: &'static str,
    found: &'static str,
  },
}

impl DocumentError {
  fn mismatch(path: &[&str], expected: &'static str, found: &Value) -> Self {
    DocumentError::TypeMismatch {
      path: path.join("."),
      expected,
      found: type_name(found),
    }
  }
}

/// Short name of a value's type for error messages.
pub fn type_name(value: &Value) -> &'static str {
  match value {
    Value::Null => "null",
    Value::Bool(_) => "bool",
    Value::Number(_) => "number",
    Value::String(_) => "string",
    Value::Array(_) => "list",
    Value::Object(_) => "map",
  }
}

/// Parse one YAML document into a tree.
///
/// Integers outside the 64-bit range become floats instead of failing.
pub fn from_yaml(text: &str) -> Result<Value, serde_yaml::Error> {
  serde_yaml::from_str::<YamlValue>(text).map(|v| v.0)
}

/// A `serde_json::Value` that accepts 128-bit integers by widening them to
/// floats.
pub(crate) struct YamlValue(pub(crate) Value);

impl<'de> Deserialize<'de> for YamlValue {
  fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
    deserializer.deserialize_any(YamlValueVisitor).map(YamlValue)
  }
}

struct YamlValueVisitor;

fn float(value: f64) -> Value {
  Number::from_f64(value).map_or(Value::Null, Value::Number)
}

impl<'de> Visitor<'de> for YamlValueVisitor {
  type Value = Value;

  fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str("any YAML value")
  }

  fn visit_bool<E: de::Error>(self, v: bool) -> Result<Value, E> {
    Ok(Value::Bool(v))
  }

  fn visit_i64<E: de::Error>(self, v: i64) -> Result<Value, E> {
    Ok(Value::from(v))
  }

  fn visit_u64<E: de::Error>(self, v: u64) -> Result<Value, E> {
    Ok(Value::from(v))
  }

  fn visit_i128<E: de::Error>(self, v: i128) -> Result<Value, E> {
    Ok(match i64::try_from(v) {
      Ok(v) => Value::from(v),
      Err(_) => float(v as f64),
    })
  }

  fn visit_u128<E: de::Error>(self, v: u128) -> Result<Value, E> {
    Ok(match u64::try_from(v) {
      Ok(v) => Value::from(v),
      Err(_) => float(v as f64),
    })
  }

  fn visit_f64<E: de::Error>(self, v: f64) -> Result<Value, E> {
    Ok(float(v))
  }

  fn visit_str<E: de::Error>(self, v: &str) -> Result<Value, E> {
    Ok(Value::String(v.to_string()))
  }

  fn visit_string<E: de::Error>(self, v: String) -> Result<Value, E> {
    Ok(Value::String(v))
  }

  fn visit_unit<E: de::Error>(self) -> Result<Value, E> {
    Ok(Value::Null)
  }

  fn visit_none<E: de::Error>(self) -> Result<Value, E> {
    Ok(Value::Null)
  }

  fn visit_some<D: Deserializer<'de>>(self, deserializer: D) -> Result<Value, D::Error> {
    YamlValue::deserialize(deserializer).map(|v| v.0)
  }

  fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Value, A::Error> {
    let mut items = Vec::new();
    while let Some(YamlValue(item)) = seq.next_element()? {
      items.push(item);
    }
    Ok(Value::Array(items))
  }

  fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Value, A::Error> {
    let mut map = Map::new();
    while let Some((key, YamlValue(value))) = access.next_entry::<String, YamlValue>()? {
      map.insert(key, value);
    }
    Ok(Value::Object(map))
  }
}

/// Look up a nested field. Missing and `null` fields are `None`.
pub fn nested_field<'a>(root: &'a Map<String, Value>, path: &[&str]) -> Option<&'a Value> {
  let (last, parents) = path.split_last()?;
  let mut current = root;
  for key in parents {
    current = current.get(*key)?.as_object()?;
  }
  current.get(*last).filter(|v| !v.is_null())
}

/// Look up a nested string.
///
/// Returns `Ok(None)` when any segment is missing, and an error when the leaf
/// exists but is not a string.
pub fn nested_str<'a>(
  root: &'a Map<String, Value>,
  path: &[&str],
) -> Result<Option<&'a str>, DocumentError> {
  match nested_field(root, path) {
    None => Ok(None),
    Some(Value::String(s)) => Ok(Some(s)),
    Some(other) => Err(DocumentError::mismatch(path, "string", other)),
  }
}

/// Mutable lookup of a nested map, without creating anything.
pub fn nested_map_mut<'a>(
  root: &'a mut Map<String, Value>,
  path: &[&str],
) -> Result<Option<&'a mut Map<String, Value>>, DocumentError> {
  let mut current = root;
  for (depth, key) in path.iter().enumerate() {
    current = match current.get_mut(*key) {
      None | Some(Value::Null) => return Ok(None),
      Some(Value::Object(map)) => map,
      Some(other) => return Err(DocumentError::mismatch(&path[..=depth], "map", other)),
    };
  }
  Ok(Some(current))
}

/// Mutable lookup of a nested list, without creating anything.
pub fn nested_list_mut<'a>(
  root: &'a mut Map<String, Value>,
  path: &[&str],
) -> Result<Option<&'a mut Vec<Value>>, DocumentError> {
  let Some((last, parents)) = path.split_last() else {
    return Ok(None);
  };
  let Some(parent) = nested_map_mut(root, parents)? else {
    return Ok(None);
  };
  match parent.get_mut(*last) {
    None | Some(Value::Null) => Ok(None),
    Some(Value::Array(list)) => Ok(Some(list)),
    Some(other) => Err(DocumentError::mismatch(path, "list", other)),
  }
}

/// Walk to a nested map, creating empty maps for missing or `null` segments.
pub fn ensure_map_mut<'a>(
  root: &'a mut Map<String, Value>,
  path: &[&str],
) -> Result<&'a mut Map<String, Value>, DocumentError> {
  let mut current = root;
  for (depth, key) in path.iter().enumerate() {
    let entry = current
      .entry(key.to_string())
      .or_insert_with(|| Value::Object(Map::new()));
    if entry.is_null() {
      *entry = Value::Object(Map::new());
    }
    current = match entry {
      Value::Object(map) => map,
      other => return Err(DocumentError::mismatch(&path[..=depth], "map", other)),
    };
  }
  Ok(current)
}

/// Walk to a nested list, creating intermediate maps and an empty list as
/// needed.
pub fn ensure_list_mut<'a>(
  root: &'a mut Map<String, Value>,
  path: &[&str],
) -> Result<&'a mut Vec<Value>, DocumentError> {
  let Some((last, parents)) = path.split_last() else {
    return Err(DocumentError::TypeMismatch {
      path: String::new(),
      expected: "list",
      found: "map",
    });
  };
  let parent = ensure_map_mut(root, parents)?;
  let entry = parent
    .entry(last.to_string())
    .or_insert_with(|| Value::Array(Vec::new()));
  if entry.is_null() {
    *entry = Value::Array(Vec::new());
  }
  match entry {
    Value::Array(list) => Ok(list),
    other => Err(DocumentError::mismatch(path, "list", other)),
  }
}

/// View a value as a map, naming `path` in the error.
pub fn as_map_mut<'a>(
  value: &'a mut Value,
  path: &[&str],
) -> Result<&'a mut Map<String, Value>, DocumentError> {
  match value {
    Value::Object(map) => Ok(map),
    other => Err(DocumentError::mismatch(path, "map", other)),
  }
}

/// View a value as a list, naming `path` in the error.
pub fn as_list_mut<'a>(
  value: &'a mut Value,
  path: &[&str],
) -> Result<&'a mut Vec<Value>, DocumentError> {
  match value {
    Value::Array(list) => Ok(list),
    other => Err(DocumentError::mismatch(path, "list", other)),
  }
}
