//! Idempotent submission of rendered jobs.

use addonmgr_config::{ADDON_API_VERSION, ADDON_KIND, LifecyclePhase};
use addonmgr_store::{JobExecution, OwnerReference};
use addonmgr_workflow::{RenderedJob, WORKFLOW_API_VERSION, WORKFLOW_KIND};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::error::{LifecycleError, StoreOperation};
use crate::events::{EventRecorder, LifecycleEvent};
use crate::lifecycle::WorkflowLifecycle;
use crate::status::phase_of;

impl<R: EventRecorder> WorkflowLifecycle<R> {
  /// Submit `job` unless an execution with the same name already exists, and
  /// report the execution's phase.
  ///
  /// A freshly created execution is `Pending`. When an existing execution
  /// turns out to be stale and is removed, the result is also `Pending`; the
  /// next reconcile recreates it.
  pub async fn submit(
    &self,
    job: RenderedJob,
    cancel: &CancellationToken,
  ) -> Result<LifecyclePhase, LifecycleError> {
    let lookup = self
      .call(
        StoreOperation::Get,
        job.name(),
        cancel,
        self.store.get(job.namespace(), job.name()),
      )
      .await;

    let existing = match lookup {
      Ok(existing) => existing,
      Err(e) if e.is_not_found() => return self.create(&job, cancel).await,
      Err(e) => return Err(e.into()),
    };

    if self.resolve_collisions(&existing, cancel).await? {
      info!(workflow = %existing.name, "removed stale workflows, waiting for resubmission");
      return Ok(LifecyclePhase::Pending);
    }

    self.refresh_phase(&existing.namespace, &existing.name, cancel).await
  }

  async fn create(
    &self,
    job: &RenderedJob,
    cancel: &CancellationToken,
  ) -> Result<LifecyclePhase, LifecycleError> {
    let execution = self.to_execution(job);
    let created = self
      .call(
        StoreOperation::Create,
        &execution.name,
        cancel,
        self.store.create(&execution),
      )
      .await;

    match created {
      Ok(()) => {
        info!(workflow = %execution.key(), "created workflow");
        self.record(LifecycleEvent::Created {
          addon: self.addon.key(),
          name: execution.name.clone(),
          namespace: execution.namespace.clone(),
        });
        Ok(LifecyclePhase::Pending)
      }
      // Another reconcile created it between our lookup and create.
      Err(e) if e.is_already_exists() => {
        debug!(workflow = %execution.key(), "workflow already exists, re-checking");
        self
          .refresh_phase(&execution.namespace, &execution.name, cancel)
          .await
      }
      Err(e) => Err(e.into()),
    }
  }

  /// Fetch the live execution and translate its status.
  async fn refresh_phase(
    &self,
    namespace: &str,
    name: &str,
    cancel: &CancellationToken,
  ) -> Result<LifecyclePhase, LifecycleError> {
    let live = self
      .call(
        StoreOperation::Get,
        name,
        cancel,
        self.store.get(namespace, name),
      )
      .await?;
    Ok(phase_of(&live))
  }

  /// Build the execution persisted for `job`.
  ///
  /// The addon is recorded as a non-controlling owner so that workflows do
  /// not take part in the addon's own garbage collection.
  pub(crate) fn to_execution(&self, job: &RenderedJob) -> JobExecution {
    JobExecution {
      api_version: WORKFLOW_API_VERSION.to_string(),
      kind: WORKFLOW_KIND.to_string(),
      name: job.name().to_string(),
      namespace: job.namespace().to_string(),
      owner_references: vec![OwnerReference {
        api_version: ADDON_API_VERSION.to_string(),
        kind: ADDON_KIND.to_string(),
        name: self.addon.name.clone(),
        uid: self.addon.uid.clone(),
        controller: false,
        block_owner_deletion: true,
      }],
      spec: job.spec_value(),
      status: None,
    }
  }
}
