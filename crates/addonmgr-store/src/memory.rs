use std::collections::BTreeMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::types::{JobExecution, JobStatus};
use crate::{JobStore, StoreError};

type Key = (String, String);

/// In-memory execution store.
///
/// Listing is ordered by `(namespace, name)`. Intended for tests, dry runs and
/// embedding; it plays the role of both the API server and, through
/// [`MemoryStore::set_status`], the workflow controller.
#[derive(Debug, Default)]
pub struct MemoryStore {
  executions: RwLock<BTreeMap<Key, JobExecution>>,
}

impl MemoryStore {
  pub fn new() -> Self {
    Self::default()
  }

  /// Replace the status of an execution, as the workflow backend would.
  pub async fn set_status(
    &self,
    namespace: &str,
    name: &str,
    status: Option<JobStatus>,
  ) -> Result<(), StoreError> {
    let mut executions = self.executions.write().await;
    let execution = executions
      .get_mut(&key(namespace, name))
      .ok_or_else(|| StoreError::NotFound(format!("{}/{}", namespace, name)))?;
    execution.status = status;
    Ok(())
  }

  /// Insert or replace an execution without the create-time uniqueness check.
  pub async fn put(&self, execution: JobExecution) {
    self
      .executions
      .write()
      .await
      .insert(key(&execution.namespace, &execution.name), execution);
  }

  /// Number of stored executions across all namespaces.
  pub async fn len(&self) -> usize {
    self.executions.read().await.len()
  }

  pub async fn is_empty(&self) -> bool {
    self.executions.read().await.is_empty()
  }
}

fn key(namespace: &str, name: &str) -> Key {
  (namespace.to_string(), name.to_string())
}

#[async_trait]
impl JobStore for MemoryStore {
  async fn get(&self, namespace: &str, name: &str) -> Result<JobExecution, StoreError> {
    self
      .executions
      .read()
      .await
      .get(&key(namespace, name))
      .cloned()
      .ok_or_else(|| StoreError::NotFound(format!("{}/{}", namespace, name)))
  }

  async fn create(&self, execution: &JobExecution) -> Result<(), StoreError> {
    let mut executions = self.executions.write().await;
    let key = key(&execution.namespace, &execution.name);
    if executions.contains_key(&key) {
      return Err(StoreError::AlreadyExists(execution.key()));
    }
    executions.insert(key, execution.clone());
    Ok(())
  }

  async fn list(
    &self,
    namespace: &str,
    name_contains: &str,
  ) -> Result<Vec<JobExecution>, StoreError> {
    Ok(
      self
        .executions
        .read()
        .await
        .values()
        .filter(|e| e.namespace == namespace && e.name.contains(name_contains))
        .cloned()
        .collect(),
    )
  }

  async fn delete(&self, namespace: &str, name: &str) -> Result<(), StoreError> {
    self
      .executions
      .write()
      .await
      .remove(&key(namespace, name))
      .map(|_| ())
      .ok_or_else(|| StoreError::NotFound(format!("{}/{}", namespace, name)))
  }
}
