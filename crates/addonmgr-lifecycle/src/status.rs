//! Translation of backend workflow phases.

use addonmgr_config::LifecyclePhase;
use addonmgr_store::JobExecution;

/// Map a backend phase string to the addon lifecycle phase.
///
/// Only `Succeeded` and `Failed` are terminal; every other value, including a
/// missing phase, is still `Pending`.
pub fn translate_phase(phase: Option<&str>) -> LifecyclePhase {
  match phase {
    Some("Succeeded") => LifecyclePhase::Succeeded,
    Some("Failed") => LifecyclePhase::Failed,
    _ => LifecyclePhase::Pending,
  }
}

/// Lifecycle phase of an execution.
pub fn phase_of(execution: &JobExecution) -> LifecyclePhase {
  translate_phase(execution.phase())
}
