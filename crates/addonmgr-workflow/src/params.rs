//! Global workflow parameters.

use addonmgr_config::AddonParams;
use serde_json::{Map, Value};

use crate::document;
use crate::error::WorkflowError;
use crate::job::RenderedJob;

const PARAMETERS_PATH: [&str; 3] = ["spec", "arguments", "parameters"];

/// Append the addon's parameters to `spec.arguments.parameters`.
///
/// Entries are appended in this order: `namespace`, the cluster context's
/// string fields in declaration order, the context's additional configs, then
/// the addon's data map. The two maps are iterated in `HashMap` order, which is
/// unspecified; templates must reference parameters by name, never position.
pub fn inject_parameters(job: &mut RenderedJob, params: &AddonParams) -> Result<(), WorkflowError> {
  let list = document::ensure_list_mut(job.content_mut(), &PARAMETERS_PATH)
    .map_err(WorkflowError::ParameterInjection)?;

  list.push(parameter("namespace", &params.namespace));

  for (name, value) in params.context.string_fields() {
    list.push(parameter(name, value));
  }

  for (name, value) in &params.context.additional_configs {
    list.push(parameter(name, value.as_str()));
  }

  for (name, value) in &params.data {
    list.push(parameter(name, value.as_str()));
  }

  Ok(())
}

fn parameter(name: &str, value: &str) -> Value {
  let mut entry = Map::new();
  entry.insert("name".to_string(), Value::String(name.to_string()));
  entry.insert("value".to_string(), Value::String(value.to_string()));
  Value::Object(entry)
}
