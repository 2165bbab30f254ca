//! Template parsing.

use serde::Deserialize;
use serde_json::Value;

use crate::document::YamlValue;
use crate::error::WorkflowError;
use crate::job::RenderedJob;

/// Finished workflows are garbage-collected after three days unless the
/// template says otherwise.
pub const DEFAULT_TTL_SECONDS_AFTER_FINISHED: i64 = 259_200;

const TTL_KEY: &str = "ttlSecondsAfterFinished";

/// Parse a workflow template into a job named `name` in `namespace`.
///
/// Only the `spec` of the template is kept; identity fields embedded in the
/// template are overridden.
pub fn render(body: &str, name: &str, namespace: &str) -> Result<RenderedJob, WorkflowError> {
  let mut data = match first_document(body)? {
    Value::Null => return Err(WorkflowError::MissingSpec),
    Value::Object(map) => map,
    other => {
      return Err(WorkflowError::TemplateParse(format!(
        "expected a mapping at the top level, found {}",
        crate::document::type_name(&other)
      )));
    }
  };

  let mut spec = match data.remove("spec") {
    None | Some(Value::Null) => return Err(WorkflowError::MissingSpec),
    Some(Value::Object(spec)) => spec,
    Some(other) => {
      return Err(WorkflowError::TemplateParse(format!(
        "spec must be a mapping, found {}",
        crate::document::type_name(&other)
      )));
    }
  };

  if spec.get(TTL_KEY).is_none_or(Value::is_null) {
    spec.insert(
      TTL_KEY.to_string(),
      Value::from(DEFAULT_TTL_SECONDS_AFTER_FINISHED),
    );
  }

  Ok(RenderedJob::new(name, namespace, spec))
}

/// Deserialize the first non-empty YAML document of `body`.
fn first_document(body: &str) -> Result<Value, WorkflowError> {
  for document in serde_yaml::Deserializer::from_str(body) {
    let YamlValue(value) =
      YamlValue::deserialize(document).map_err(|e| WorkflowError::TemplateParse(e.to_string()))?;
    if !value.is_null() {
      return Ok(value);
    }
  }
  Ok(Value::Null)
}

#[cfg(test)]
mod tests {
  use serde_json::{Map, json};

  use super::*;

  fn spec_of(job: &RenderedJob) -> &Map<String, Value> {
    job.spec().unwrap()
  }

  const TEMPLATE: &str = r#"
apiVersion: argoproj.io/v1alpha1
kind: Workflow
metadata:
  name: ignored
  namespace: ignored
spec:
  entrypoint: entry
  templates:
    - name: entry
      container:
        image: alpine
"#;

  #[test]
  fn test_render_sets_identity() {
    let job = render(TEMPLATE, "addon-install-abc-wf", "addons").unwrap();
    assert_eq!(job.name(), "addon-install-abc-wf");
    assert_eq!(job.namespace(), "addons");

    let content = job.content();
    assert_eq!(content["apiVersion"], json!("argoproj.io/v1alpha1"));
    assert_eq!(content["kind"], json!("Workflow"));
    assert_eq!(
      content["metadata"],
      json!({"name": "addon-install-abc-wf", "namespace": "addons"})
    );
    assert_eq!(content["spec"]["entrypoint"], json!("entry"));
  }

  #[test]
  fn test_render_defaults_ttl() {
    let job = render(TEMPLATE, "wf", "ns").unwrap();
    assert_eq!(spec_of(&job)[TTL_KEY], json!(259200));
  }

  #[test]
  fn test_render_preserves_explicit_ttl() {
    let job = render("spec:\n  ttlSecondsAfterFinished: 0\n", "wf", "ns").unwrap();
    assert_eq!(spec_of(&job)[TTL_KEY], json!(0));

    let job = render("spec:\n  ttlSecondsAfterFinished: 60\n", "wf", "ns").unwrap();
    assert_eq!(spec_of(&job)[TTL_KEY], json!(60));
  }

  #[test]
  fn test_render_null_ttl_gets_default() {
    let job = render("spec:\n  ttlSecondsAfterFinished:\n", "wf", "ns").unwrap();
    assert_eq!(spec_of(&job)[TTL_KEY], json!(259200));
  }

  #[test]
  fn test_render_missing_spec() {
    assert!(matches!(
      render("kind: Workflow\n", "wf", "ns"),
      Err(WorkflowError::MissingSpec)
    ));
    assert!(matches!(render("", "wf", "ns"), Err(WorkflowError::MissingSpec)));
    assert!(matches!(
      render("spec:\n", "wf", "ns"),
      Err(WorkflowError::MissingSpec)
    ));
  }

  #[test]
  fn test_render_invalid_yaml() {
    assert!(matches!(
      render("spec: [unclosed\n", "wf", "ns"),
      Err(WorkflowError::TemplateParse(_))
    ));
    assert!(matches!(
      render("- a\n- b\n", "wf", "ns"),
      Err(WorkflowError::TemplateParse(_))
    ));
    assert!(matches!(
      render("spec: 3\n", "wf", "ns"),
      Err(WorkflowError::TemplateParse(_))
    ));
  }

  #[test]
  fn test_render_uses_first_document() {
    let body = "---\nspec:\n  entrypoint: first\n---\nspec:\n  entrypoint: second\n";
    let job = render(body, "wf", "ns").unwrap();
    assert_eq!(spec_of(&job)["entrypoint"], json!("first"));
  }
}
