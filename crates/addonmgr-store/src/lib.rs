//! Addonmgr Store
//!
//! This crate provides the storage trait for workflow executions and an
//! in-memory implementation. Executions are keyed by `(namespace, name)`.
//!
//! The [`JobStore`] trait defines operations for:
//! - Looking up, creating and deleting workflow executions
//! - Listing the executions of a namespace by name substring
//!
//! The store never changes an execution's status on its own; that belongs to
//! the workflow backend (see [`MemoryStore::set_status`] for the in-memory
//! stand-in).

mod memory;
mod types;

pub use memory::MemoryStore;
pub use types::{JobExecution, JobStatus, OwnerReference};

use async_trait::async_trait;

/// Error type for storage operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
  /// The requested execution was not found.
  #[error("not found: {0}")]
  NotFound(String),

  /// An execution with the same namespace and name already exists.
  #[error("already exists: {0}")]
  AlreadyExists(String),

  /// The backend could not serve the request.
  #[error("store unavailable: {0}")]
  Unavailable(String),
}

impl StoreError {
  pub fn is_not_found(&self) -> bool {
    matches!(self, StoreError::NotFound(_))
  }

  pub fn is_already_exists(&self) -> bool {
    matches!(self, StoreError::AlreadyExists(_))
  }
}

/// Storage trait for workflow executions.
#[async_trait]
pub trait JobStore: Send + Sync {
  /// Get an execution by namespace and name.
  async fn get(&self, namespace: &str, name: &str) -> Result<JobExecution, StoreError>;

  /// Create a new execution. Fails with `AlreadyExists` if the name is taken.
  async fn create(&self, execution: &JobExecution) -> Result<(), StoreError>;

  /// List executions in a namespace whose name contains `name_contains`.
  async fn list(&self, namespace: &str, name_contains: &str)
  -> Result<Vec<JobExecution>, StoreError>;

  /// Delete an execution by namespace and name.
  async fn delete(&self, namespace: &str, name: &str) -> Result<(), StoreError>;
}
