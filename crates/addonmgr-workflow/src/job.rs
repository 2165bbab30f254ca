use serde_json::{Map, Value};

use crate::document::{self, DocumentError};

pub const WORKFLOW_KIND: &str = "Workflow";
pub const WORKFLOW_API_VERSION: &str = "argoproj.io/v1alpha1";

/// A workflow document rendered from a template, not yet submitted.
///
/// Identity (`apiVersion`, `kind`, `metadata.name`, `metadata.namespace`) is
/// fixed at construction; everything under `spec` is free-form.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedJob {
  name: String,
  namespace: String,
  content: Map<String, Value>,
}

impl RenderedJob {
  /// Build a job around an already validated `spec` map.
  pub(crate) fn new(name: &str, namespace: &str, spec: Map<String, Value>) -> Self {
    let mut metadata = Map::new();
    metadata.insert("name".to_string(), Value::String(name.to_string()));
    metadata.insert("namespace".to_string(), Value::String(namespace.to_string()));

    let mut content = Map::new();
    content.insert(
      "apiVersion".to_string(),
      Value::String(WORKFLOW_API_VERSION.to_string()),
    );
    content.insert("kind".to_string(), Value::String(WORKFLOW_KIND.to_string()));
    content.insert("metadata".to_string(), Value::Object(metadata));
    content.insert("spec".to_string(), Value::Object(spec));

    Self {
      name: name.to_string(),
      namespace: namespace.to_string(),
      content,
    }
  }

  pub fn name(&self) -> &str {
    &self.name
  }

  pub fn namespace(&self) -> &str {
    &self.namespace
  }

  /// The whole document, identity included.
  pub fn content(&self) -> &Map<String, Value> {
    &self.content
  }

  pub(crate) fn content_mut(&mut self) -> &mut Map<String, Value> {
    &mut self.content
  }

  /// The `spec` subtree.
  pub fn spec(&self) -> Option<&Map<String, Value>> {
    self.content.get("spec").and_then(Value::as_object)
  }

  /// Clone of the `spec` subtree, for building the persisted execution.
  pub fn spec_value(&self) -> Value {
    self
      .content
      .get("spec")
      .cloned()
      .unwrap_or_else(|| Value::Object(Map::new()))
  }

  /// `spec.arguments.parameters` as `(name, value)` pairs, in order.
  ///
  /// Entries without a string name are reported as an error; non-string values
  /// are skipped.
  pub fn parameters(&self) -> Result<Vec<(String, String)>, DocumentError> {
    let Some(Value::Array(params)) =
      document::nested_field(&self.content, &["spec", "arguments", "parameters"])
    else {
      return Ok(Vec::new());
    };

    let mut pairs = Vec::with_capacity(params.len());
    for param in params {
      let Value::Object(param) = param else {
        return Err(DocumentError::TypeMismatch {
          path: "spec.arguments.parameters[]".to_string(),
          expected: "map",
          found: document::type_name(param),
        });
      };
      let Some(name) = document::nested_str(param, &["name"])? else {
        continue;
      };
      if let Some(value) = document::nested_str(param, &["value"])? {
        pairs.push((name.to_string(), value.to_string()));
      }
    }
    Ok(pairs)
  }

  /// Consume the job, returning the full document.
  pub fn into_value(self) -> Value {
    Value::Object(self.content)
  }
}
