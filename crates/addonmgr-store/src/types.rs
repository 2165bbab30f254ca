use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Reference from an execution back to the resource that requested it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OwnerReference {
  pub api_version: String,
  pub kind: String,
  pub name: String,
  pub uid: String,
  /// A controlling owner drives garbage collection of the execution.
  #[serde(default)]
  pub controller: bool,
  #[serde(default)]
  pub block_owner_deletion: bool,
}

/// Status reported by the workflow backend.
///
/// Every field is optional: a freshly created execution has no status, and the
/// backend fills fields in as the workflow runs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobStatus {
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub phase: Option<String>,
  /// RFC3339 timestamp.
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub started_at: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub finished_at: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub message: Option<String>,
}

impl JobStatus {
  /// A status in `phase` that started at `started_at`.
  pub fn started(phase: &str, started_at: DateTime<Utc>) -> Self {
    Self {
      phase: Some(phase.to_string()),
      started_at: Some(started_at.to_rfc3339()),
      finished_at: None,
      message: None,
    }
  }
}

/// A workflow execution as held by the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobExecution {
  pub api_version: String,
  pub kind: String,
  pub name: String,
  pub namespace: String,
  #[serde(default)]
  pub owner_references: Vec<OwnerReference>,
  pub spec: serde_json::Value,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub status: Option<JobStatus>,
}

impl JobExecution {
  /// `namespace/name`.
  pub fn key(&self) -> String {
    format!("{}/{}", self.namespace, self.name)
  }

  /// The backend phase string, if any.
  pub fn phase(&self) -> Option<&str> {
    self.status.as_ref().and_then(|s| s.phase.as_deref())
  }
}
