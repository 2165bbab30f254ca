use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// A parameter value that is always a string once loaded.
///
/// Addon authors routinely write `replicas: 3` or `debug: true`; those are
/// accepted and kept in their textual form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct FlexString(String);

impl FlexString {
  pub fn as_str(&self) -> &str {
    &self.0
  }
}

impl From<&str> for FlexString {
  fn from(value: &str) -> Self {
    Self(value.to_string())
  }
}

impl From<String> for FlexString {
  fn from(value: String) -> Self {
    Self(value)
  }
}

impl fmt::Display for FlexString {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(&self.0)
  }
}

impl Serialize for FlexString {
  fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&self.0)
  }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Scalar {
  Str(String),
  Int(i64),
  UInt(u64),
  Float(f64),
  Bool(bool),
}

impl<'de> Deserialize<'de> for FlexString {
  fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
    let value = match Scalar::deserialize(deserializer)? {
      Scalar::Str(s) => s,
      Scalar::Int(i) => i.to_string(),
      Scalar::UInt(u) => u.to_string(),
      Scalar::Float(f) => f.to_string(),
      Scalar::Bool(b) => b.to_string(),
    };
    Ok(Self(value))
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_deserialize_scalars() {
    let values: Vec<FlexString> = serde_json::from_str(r#"["a", 3, -1, 1.5, false]"#).unwrap();
    let values: Vec<&str> = values.iter().map(FlexString::as_str).collect();
    assert_eq!(values, vec!["a", "3", "-1", "1.5", "false"]);
  }

  #[test]
  fn test_rejects_nested_values() {
    let result: Result<FlexString, _> = serde_json::from_str(r#"{"a": 1}"#);
    assert!(result.is_err());
  }

  #[test]
  fn test_serializes_as_string() {
    let json = serde_json::to_string(&FlexString::from("42")).unwrap();
    assert_eq!(json, r#""42""#);
  }
}
