//! Cleanup of executions left behind by earlier submissions.
//!
//! Executions of an addon are correlated by name: every execution name
//! contains the addon name and the checksum of the content it was rendered
//! from. When the addon is resubmitted with content whose execution already
//! exists, but a newer execution for different content has run since, the old
//! execution is stale and is removed so it can be recreated.

use addonmgr_store::JobExecution;
use chrono::{DateTime, FixedOffset};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::error::{LifecycleError, StoreOperation, SubmissionError};
use crate::events::{EventRecorder, LifecycleEvent};
use crate::lifecycle::WorkflowLifecycle;

impl<R: EventRecorder> WorkflowLifecycle<R> {
  /// Delete stale executions of the addon's current checksum.
  ///
  /// Returns whether anything was deleted. Nothing is done while any of the
  /// addon's executions has no start time yet, or when the most recently
  /// started execution already carries the current checksum. Executions still
  /// `Pending`, or with no phase at all, are never deleted.
  ///
  /// Deletion is best-effort: a failed delete is logged and skipped, and never
  /// fails the caller. Cancellation still aborts.
  pub async fn resolve_collisions(
    &self,
    existing: &JobExecution,
    cancel: &CancellationToken,
  ) -> Result<bool, LifecycleError> {
    let addon = &self.addon;
    let candidates = self
      .call(
        StoreOperation::List,
        &addon.name,
        cancel,
        self.store.list(&addon.namespace, &addon.name),
      )
      .await?;

    let Some(most_recent) = most_recent(&candidates)? else {
      debug!(workflow = %existing.name, "workflow status not available yet");
      return Ok(false);
    };

    if most_recent.name.contains(&addon.checksum) {
      return Ok(false);
    }

    info!(
      workflow = %existing.name,
      most_recent = %most_recent.name,
      "newer workflow found for a different checksum"
    );

    let mut deleted = false;
    for candidate in candidates.iter().filter(|c| c.name.contains(&addon.checksum)) {
      match candidate.phase() {
        None | Some("Pending") => continue,
        Some(_) => {}
      }
      if self.delete_stale(candidate, cancel).await? {
        deleted = true;
      }
    }

    Ok(deleted)
  }

  /// Delete one stale execution, swallowing store failures.
  async fn delete_stale(
    &self,
    execution: &JobExecution,
    cancel: &CancellationToken,
  ) -> Result<bool, SubmissionError> {
    let result = self
      .call(
        StoreOperation::Delete,
        &execution.name,
        cancel,
        self.store.delete(&execution.namespace, &execution.name),
      )
      .await;

    match result {
      Ok(()) => {
        info!(workflow = %execution.key(), phase = ?execution.phase(), "deleted stale workflow");
        self.record(LifecycleEvent::Deleted {
          addon: self.addon.key(),
          name: execution.name.clone(),
          namespace: execution.namespace.clone(),
        });
        Ok(true)
      }
      Err(e) if e.is_not_found() => Ok(true),
      Err(e @ SubmissionError::Cancelled { .. }) => Err(e),
      Err(e) => {
        warn!(workflow = %execution.key(), error = %e, "failed to delete stale workflow");
        Ok(false)
      }
    }
  }
}

/// The execution with the latest `startedAt`; later entries win ties.
///
/// `None` when the list is empty or any execution lacks a start time.
fn most_recent(candidates: &[JobExecution]) -> Result<Option<&JobExecution>, SubmissionError> {
  let mut latest: Option<(DateTime<FixedOffset>, &JobExecution)> = None;

  for candidate in candidates {
    let Some(started_at) = candidate
      .status
      .as_ref()
      .and_then(|s| s.started_at.as_deref())
    else {
      return Ok(None);
    };

    let started_at =
      DateTime::parse_from_rfc3339(started_at).map_err(|e| SubmissionError::InvalidStatus {
        name: candidate.name.clone(),
        message: format!("startedAt '{}': {}", started_at, e),
      })?;

    if latest
      .as_ref()
      .is_none_or(|(current, _)| started_at >= *current)
    {
      latest = Some((started_at, candidate));
    }
  }

  Ok(latest.map(|(_, execution)| execution))
}
