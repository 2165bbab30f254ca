//! Post-processing of manifests embedded in workflow artifacts.
//!
//! Install workflows usually carry the addon's Kubernetes manifests inline as
//! raw artifacts (`arguments.artifacts[].raw.data`). Before submission every
//! workload in those manifests is stamped with the standard
//! `app.kubernetes.io/*` labels and, when the template names a role, with the
//! IAM role annotation on its pod template.

use addonmgr_config::{ADDON_GROUP, AddonRef};
use serde_json::{Map, Value};

use crate::document::{self, DocumentError};
use crate::error::WorkflowError;
use crate::job::RenderedJob;

pub const LABEL_NAME: &str = "app.kubernetes.io/name";
pub const LABEL_VERSION: &str = "app.kubernetes.io/version";
pub const LABEL_PART_OF: &str = "app.kubernetes.io/part-of";
pub const LABEL_MANAGED_BY: &str = "app.kubernetes.io/managed-by";
pub const ROLE_ANNOTATION: &str = "iam.amazonaws.com/role";

const DOCUMENT_SEPARATOR: &str = "---\n";

/// Manifest kinds that receive the default labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WorkloadKind {
  StatefulSet,
  Deployment,
  DaemonSet,
  ReplicaSet,
  Service,
}

impl WorkloadKind {
  /// Map a manifest `kind`. Anything else is not a workload.
  pub fn from_kind(kind: &str) -> Option<Self> {
    match kind {
      "StatefulSet" => Some(WorkloadKind::StatefulSet),
      "Deployment" => Some(WorkloadKind::Deployment),
      "DaemonSet" => Some(WorkloadKind::DaemonSet),
      "ReplicaSet" => Some(WorkloadKind::ReplicaSet),
      "Service" => Some(WorkloadKind::Service),
      _ => None,
    }
  }
}

/// Rewrites the raw manifests of a job's artifacts.
#[derive(Debug, Clone)]
pub struct ArtifactPostProcessor {
  labels: [(&'static str, String); 4],
  role: Option<String>,
}

impl ArtifactPostProcessor {
  /// An empty role is the same as no role.
  pub fn new(addon: &AddonRef, role: Option<&str>) -> Self {
    Self {
      labels: [
        (LABEL_NAME, addon.name.clone()),
        (LABEL_VERSION, addon.pkg_version.clone()),
        (LABEL_PART_OF, addon.name.clone()),
        (LABEL_MANAGED_BY, ADDON_GROUP.to_string()),
      ],
      role: role.filter(|r| !r.is_empty()).map(str::to_string),
    }
  }

  /// Process `spec.arguments.artifacts` and the artifacts of every step in
  /// `spec.templates[*].steps`.
  ///
  /// Applying this twice produces the same document as applying it once.
  pub fn apply(&self, job: &mut RenderedJob) -> Result<(), WorkflowError> {
    let content = job.content_mut();

    if let Some(artifacts) =
      document::nested_list_mut(content, &["spec", "arguments", "artifacts"])?
    {
      self.process_artifacts(artifacts)?;
    }

    let Some(templates) = document::nested_list_mut(content, &["spec", "templates"])? else {
      return Ok(());
    };

    for template in templates.iter_mut() {
      let template = document::as_map_mut(template, &["spec", "templates[]"])?;
      let Some(groups) = document::nested_list_mut(template, &["steps"])? else {
        continue;
      };
      for group in groups.iter_mut() {
        let group = document::as_list_mut(group, &["spec", "templates[]", "steps[]"])?;
        for step in group.iter_mut() {
          let step = document::as_map_mut(step, &["spec", "templates[]", "steps[][]"])?;
          if let Some(artifacts) = document::nested_list_mut(step, &["arguments", "artifacts"])? {
            self.process_artifacts(artifacts)?;
          }
        }
      }
    }

    Ok(())
  }

  fn process_artifacts(&self, artifacts: &mut [Value]) -> Result<(), WorkflowError> {
    for artifact in artifacts.iter_mut() {
      let artifact = document::as_map_mut(artifact, &["arguments", "artifacts[]"])?;
      let Some(data) = document::nested_str(artifact, &["raw", "data"])? else {
        continue;
      };

      let processed = self.process_manifests(data)?;
      document::ensure_map_mut(artifact, &["raw"])?
        .insert("data".to_string(), Value::String(processed));
    }
    Ok(())
  }

  /// Process every document of a multi-document manifest string.
  ///
  /// Decorated workloads are emitted as JSON documents; everything else is
  /// returned as written.
  pub fn process_manifests(&self, data: &str) -> Result<String, WorkflowError> {
    let documents = data
      .split(DOCUMENT_SEPARATOR)
      .map(|doc| self.process_manifest(doc))
      .collect::<Result<Vec<_>, _>>()?;
    Ok(documents.join(DOCUMENT_SEPARATOR))
  }

  fn process_manifest(&self, text: &str) -> Result<String, WorkflowError> {
    if is_blank(text) {
      return Ok(text.to_string());
    }

    let parse_error = |message: String| WorkflowError::ArtifactParse {
      document: text.to_string(),
      message,
    };

    let mut resource = match document::from_yaml(text) {
      Ok(Value::Object(resource)) => resource,
      Ok(Value::Null) => return Ok(text.to_string()),
      Ok(other) => {
        return Err(parse_error(format!(
          "expected a mapping, found {}",
          document::type_name(&other)
        )));
      }
      Err(e) => return Err(parse_error(e.to_string())),
    };

    let workload = resource
      .get("kind")
      .and_then(Value::as_str)
      .and_then(WorkloadKind::from_kind);
    if workload.is_none() {
      return Ok(text.to_string());
    }

    self
      .decorate(&mut resource)
      .map_err(|e| parse_error(e.to_string()))?;

    // JSON keeps every string quoted, so YAML 1.1 readers never see `on` or
    // `yes` as booleans.
    let mut out = serde_json::to_string_pretty(&Value::Object(resource))
      .map_err(|e| WorkflowError::ArtifactSerialize(e.to_string()))?;
    out.push('\n');
    Ok(out)
  }

  fn decorate(&self, resource: &mut Map<String, Value>) -> Result<(), DocumentError> {
    let labels = document::ensure_map_mut(resource, &["metadata", "labels"])?;
    for (key, value) in &self.labels {
      labels.insert(key.to_string(), Value::String(value.clone()));
    }

    if let Some(role) = &self.role {
      document::ensure_map_mut(resource, &["spec", "template", "metadata", "annotations"])?
        .insert(ROLE_ANNOTATION.to_string(), Value::String(role.clone()));
    }

    Ok(())
  }
}

/// Empty or comment-only documents.
fn is_blank(text: &str) -> bool {
  text
    .lines()
    .map(str::trim)
    .all(|line| line.is_empty() || line.starts_with('#'))
}
