use std::future::Future;
use std::sync::Arc;

use addonmgr_config::{AddonRef, LifecyclePhase, WorkflowTemplate};
use addonmgr_store::{JobStore, StoreError};
use addonmgr_workflow::{ArtifactPostProcessor, RenderedJob, WorkflowError, inject_parameters, render};
use async_trait::async_trait;
use tokio_util::sync::CancellationToken;
use tracing::{info, instrument, warn};

use crate::config::LifecycleConfig;
use crate::error::{LifecycleError, StoreOperation, SubmissionError};
use crate::events::{EventRecorder, LifecycleEvent, NoopRecorder};

/// The install/delete workflows of one addon.
#[async_trait]
pub trait AddonLifecycle: Send + Sync {
  /// Render `template` as workflow `name`, submit it, and report its phase.
  async fn install(
    &self,
    template: &WorkflowTemplate,
    name: &str,
    cancel: &CancellationToken,
  ) -> Result<LifecyclePhase, LifecycleError>;

  /// Delete workflow `name` from the addon's namespace.
  ///
  /// A missing workflow is reported as an error; check
  /// [`LifecycleError::is_not_found`] if that should count as success.
  async fn delete(&self, name: &str, cancel: &CancellationToken) -> Result<(), LifecycleError>;
}

/// Render the job document for `template`, ready for submission.
pub fn prepare_job(
  addon: &AddonRef,
  template: &WorkflowTemplate,
  name: &str,
) -> Result<RenderedJob, WorkflowError> {
  let mut job = render(&template.template, name, &addon.namespace)?;
  inject_parameters(&mut job, &addon.params)?;
  ArtifactPostProcessor::new(addon, template.role()).apply(&mut job)?;
  Ok(job)
}

/// Workflow-backed lifecycle of a single addon.
///
/// Generic over `R: EventRecorder` like the engine's notifiers. Use
/// `WorkflowLifecycle::new()` to discard events or
/// `WorkflowLifecycle::with_recorder()` to observe them.
pub struct WorkflowLifecycle<R: EventRecorder = NoopRecorder> {
  pub(crate) store: Arc<dyn JobStore>,
  pub(crate) addon: AddonRef,
  pub(crate) config: LifecycleConfig,
  pub(crate) recorder: R,
}

impl WorkflowLifecycle<NoopRecorder> {
  pub fn new(store: Arc<dyn JobStore>, addon: AddonRef, config: LifecycleConfig) -> Self {
    Self::with_recorder(store, addon, config, NoopRecorder)
  }
}

impl<R: EventRecorder> WorkflowLifecycle<R> {
  pub fn with_recorder(
    store: Arc<dyn JobStore>,
    addon: AddonRef,
    config: LifecycleConfig,
    recorder: R,
  ) -> Self {
    Self {
      store,
      addon,
      config,
      recorder,
    }
  }

  pub fn addon(&self) -> &AddonRef {
    &self.addon
  }

  /// Await a store call, bounded by the request timeout and `cancel`.
  pub(crate) async fn call<T, F>(
    &self,
    operation: StoreOperation,
    name: &str,
    cancel: &CancellationToken,
    call: F,
  ) -> Result<T, SubmissionError>
  where
    F: Future<Output = Result<T, StoreError>>,
  {
    let timeout = self.config.request_timeout;
    tokio::select! {
      biased;
      _ = cancel.cancelled() => Err(SubmissionError::Cancelled { operation }),
      result = tokio::time::timeout(timeout, call) => match result {
        Ok(Ok(value)) => Ok(value),
        Ok(Err(source)) => Err(SubmissionError::Store {
          operation,
          name: name.to_string(),
          source,
        }),
        Err(_) => Err(SubmissionError::TimedOut { operation, timeout }),
      },
    }
  }

  pub(crate) fn record(&self, event: LifecycleEvent) {
    self.recorder.record(event);
  }
}

impl<R: EventRecorder> WorkflowLifecycle<R> {
  /// Render, submit and report the phase of workflow `name`.
  #[instrument(
    name = "addon_install",
    skip(self, template, cancel),
    fields(addon = %self.addon.key(), workflow = %name)
  )]
  pub async fn install_workflow(
    &self,
    template: &WorkflowTemplate,
    name: &str,
    cancel: &CancellationToken,
  ) -> Result<LifecyclePhase, LifecycleError> {
    let job = prepare_job(&self.addon, template, name).inspect_err(|e| {
      warn!(error = %e, "invalid workflow");
    })?;

    let phase = self.submit(job, cancel).await?;
    info!(phase = %phase, "workflow submitted");
    Ok(phase)
  }

  /// Delete workflow `name` from the addon's namespace.
  #[instrument(
    name = "addon_delete",
    skip(self, cancel),
    fields(addon = %self.addon.key(), workflow = %name)
  )]
  pub async fn delete_workflow(
    &self,
    name: &str,
    cancel: &CancellationToken,
  ) -> Result<(), LifecycleError> {
    let namespace = self.addon.namespace.as_str();
    self
      .call(
        StoreOperation::Delete,
        name,
        cancel,
        self.store.delete(namespace, name),
      )
      .await?;

    info!("workflow deleted");
    self.record(LifecycleEvent::Deleted {
      addon: self.addon.key(),
      name: name.to_string(),
      namespace: namespace.to_string(),
    });
    Ok(())
  }
}

#[async_trait]
impl<R: EventRecorder> AddonLifecycle for WorkflowLifecycle<R> {
  async fn install(
    &self,
    template: &WorkflowTemplate,
    name: &str,
    cancel: &CancellationToken,
  ) -> Result<LifecyclePhase, LifecycleError> {
    self.install_workflow(template, name, cancel).await
  }

  async fn delete(&self, name: &str, cancel: &CancellationToken) -> Result<(), LifecycleError> {
    self.delete_workflow(name, cancel).await
  }
}
