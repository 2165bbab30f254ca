use std::time::Duration;

/// Configuration for a workflow lifecycle.
#[derive(Debug, Clone)]
pub struct LifecycleConfig {
  /// Upper bound for each call to the execution store.
  pub request_timeout: Duration,
}

impl Default for LifecycleConfig {
  fn default() -> Self {
    Self {
      request_timeout: Duration::from_secs(30),
    }
  }
}
