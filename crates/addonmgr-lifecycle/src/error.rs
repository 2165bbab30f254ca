//! Lifecycle errors.

use std::fmt;
use std::time::Duration;

use addonmgr_config::LifecyclePhase;
use addonmgr_store::StoreError;
use addonmgr_workflow::WorkflowError;

/// Store call that failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreOperation {
  Get,
  Create,
  List,
  Delete,
}

impl fmt::Display for StoreOperation {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(match self {
      StoreOperation::Get => "get",
      StoreOperation::Create => "create",
      StoreOperation::List => "list",
      StoreOperation::Delete => "delete",
    })
  }
}

/// Errors talking to the execution store.
#[derive(Debug, thiserror::Error)]
pub enum SubmissionError {
  /// The store rejected or failed the call.
  #[error("failed to {operation} workflow {name}: {source}")]
  Store {
    operation: StoreOperation,
    name: String,
    #[source]
    source: StoreError,
  },

  /// The caller cancelled the operation while the call was pending.
  #[error("{operation} cancelled")]
  Cancelled { operation: StoreOperation },

  /// The call did not complete within the configured timeout.
  #[error("{operation} timed out after {timeout:?}")]
  TimedOut {
    operation: StoreOperation,
    timeout: Duration,
  },

  /// The backend reported a status that cannot be interpreted.
  #[error("invalid status on workflow {name}: {message}")]
  InvalidStatus { name: String, message: String },
}

impl SubmissionError {
  /// Whether the store reported the execution as missing.
  pub fn is_not_found(&self) -> bool {
    matches!(self, SubmissionError::Store { source, .. } if source.is_not_found())
  }

  pub fn is_already_exists(&self) -> bool {
    matches!(self, SubmissionError::Store { source, .. } if source.is_already_exists())
  }
}

/// Errors that abort a lifecycle operation.
#[derive(Debug, thiserror::Error)]
pub enum LifecycleError {
  #[error("invalid workflow: {0}")]
  Workflow(#[from] WorkflowError),

  #[error(transparent)]
  Submission(#[from] SubmissionError),
}

impl LifecycleError {
  /// Phase reported to the addon for this error. Always `Failed`.
  pub fn phase(&self) -> LifecyclePhase {
    LifecyclePhase::Failed
  }

  pub fn is_not_found(&self) -> bool {
    matches!(self, LifecycleError::Submission(e) if e.is_not_found())
  }
}
