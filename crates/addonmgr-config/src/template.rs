use serde::{Deserialize, Serialize};

/// A workflow template attached to one addon lifecycle step.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WorkflowTemplate {
  /// Raw workflow body (YAML, possibly multi-document).
  pub template: String,
  /// IAM role annotated onto the pods of generated workloads.
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub role: Option<String>,
}

impl WorkflowTemplate {
  pub fn new(template: impl Into<String>) -> Self {
    Self {
      template: template.into(),
      role: None,
    }
  }

  pub fn with_role(mut self, role: impl Into<String>) -> Self {
    self.role = Some(role.into());
    self
  }

  /// The role, treating an empty string as unset.
  pub fn role(&self) -> Option<&str> {
    self.role.as_deref().filter(|r| !r.is_empty())
  }
}
