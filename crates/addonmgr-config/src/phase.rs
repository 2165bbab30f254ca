use std::fmt;

use serde::{Deserialize, Serialize};

/// Addon-visible summary of a workflow execution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LifecyclePhase {
  Pending,
  Succeeded,
  Failed,
}

impl LifecyclePhase {
  pub fn as_str(&self) -> &'static str {
    match self {
      LifecyclePhase::Pending => "Pending",
      LifecyclePhase::Succeeded => "Succeeded",
      LifecyclePhase::Failed => "Failed",
    }
  }
}

impl fmt::Display for LifecyclePhase {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}
