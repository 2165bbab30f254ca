use std::fmt;

use serde::{Deserialize, Serialize};

use crate::addon::AddonRef;

/// Lifecycle step a workflow implements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LifecycleStep {
  Prereqs,
  Install,
  Delete,
  Validate,
}

impl LifecycleStep {
  pub const ALL: [LifecycleStep; 4] = [
    LifecycleStep::Prereqs,
    LifecycleStep::Install,
    LifecycleStep::Delete,
    LifecycleStep::Validate,
  ];

  /// Look a step up by its lowercase name.
  pub fn from_name(name: &str) -> Option<Self> {
    Self::ALL.into_iter().find(|step| step.as_str() == name)
  }

  pub fn as_str(&self) -> &'static str {
    match self {
      LifecycleStep::Prereqs => "prereqs",
      LifecycleStep::Install => "install",
      LifecycleStep::Delete => "delete",
      LifecycleStep::Validate => "validate",
    }
  }
}

impl fmt::Display for LifecycleStep {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

/// Name of the workflow running `step` for the addon's current content.
///
/// Collision detection correlates executions by substring: the addon name and
/// the checksum must both appear in every workflow name.
pub fn workflow_name(addon: &AddonRef, step: LifecycleStep) -> String {
  format!("{}-{}-{}-wf", addon.name, step, addon.checksum)
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_workflow_name_embeds_name_and_checksum() {
    let addon = AddonRef {
      name: "event-router".to_string(),
      namespace: "addons".to_string(),
      uid: String::new(),
      checksum: "6b9f1d".to_string(),
      pkg_version: "v0.2".to_string(),
      params: Default::default(),
    };

    let name = workflow_name(&addon, LifecycleStep::Prereqs);
    assert_eq!(name, "event-router-prereqs-6b9f1d-wf");
    assert!(name.contains(&addon.name));
    assert!(name.contains(&addon.checksum));
  }

  #[test]
  fn test_from_name() {
    for step in LifecycleStep::ALL {
      assert_eq!(LifecycleStep::from_name(step.as_str()), Some(step));
    }
    assert_eq!(LifecycleStep::from_name("Install"), None);
  }
}
