//! Lifecycle events for observability.
//!
//! Events are recorded against the addon when the lifecycle changes the set of
//! workflow executions, so consumers can surface them (Kubernetes events,
//! audit logs, UIs).

use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tracing::info;

/// Events recorded during a lifecycle operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum LifecycleEvent {
  /// A workflow execution was created for the addon.
  Created {
    addon: String,
    name: String,
    namespace: String,
  },

  /// A workflow execution of the addon was deleted.
  Deleted {
    addon: String,
    name: String,
    namespace: String,
  },
}

impl LifecycleEvent {
  /// Short reason string, as used for Kubernetes events.
  pub fn reason(&self) -> &'static str {
    match self {
      LifecycleEvent::Created { .. } => "Created",
      LifecycleEvent::Deleted { .. } => "Deleted",
    }
  }

  /// Human readable message.
  pub fn message(&self) -> String {
    match self {
      LifecycleEvent::Created {
        name, namespace, ..
      } => format!("Created Workflow {}/{}", namespace, name),
      LifecycleEvent::Deleted {
        name, namespace, ..
      } => format!("Deleted Workflow {}/{}", namespace, name),
    }
  }
}

/// Trait for receiving lifecycle events.
pub trait EventRecorder: Send + Sync {
  fn record(&self, event: LifecycleEvent);
}

/// A recorder that discards all events.
#[derive(Debug, Clone, Default)]
pub struct NoopRecorder;

impl EventRecorder for NoopRecorder {
  fn record(&self, _event: LifecycleEvent) {}
}

/// A recorder that logs every event through `tracing`.
#[derive(Debug, Clone, Default)]
pub struct TracingRecorder;

impl EventRecorder for TracingRecorder {
  fn record(&self, event: LifecycleEvent) {
    let addon = match &event {
      LifecycleEvent::Created { addon, .. } | LifecycleEvent::Deleted { addon, .. } => addon,
    };
    info!(addon = %addon, reason = event.reason(), "{}", event.message());
  }
}

/// A recorder that sends events to an unbounded channel.
#[derive(Debug, Clone)]
pub struct ChannelRecorder {
  // Unbounded: record() must never block a lifecycle operation.
  sender: mpsc::UnboundedSender<LifecycleEvent>,
}

impl ChannelRecorder {
  pub fn new(sender: mpsc::UnboundedSender<LifecycleEvent>) -> Self {
    Self { sender }
  }
}

impl EventRecorder for ChannelRecorder {
  fn record(&self, event: LifecycleEvent) {
    // Receiver may have been dropped
    let _ = self.sender.send(event);
  }
}
