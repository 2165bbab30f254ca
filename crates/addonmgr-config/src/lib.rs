//! Addonmgr Config
//!
//! This crate contains the serializable addon types that drive a workflow
//! lifecycle: the addon identity and parameters, the workflow template handed
//! to the lifecycle, and the phase reported back to the addon.
//!
//! These types are read from the addon resource (or a file, via the CLI) and
//! are immutable while a lifecycle operation runs.

mod addon;
mod flex;
mod phase;
mod step;
mod template;

pub use addon::{AddonParams, AddonRef, ClusterContext};
pub use flex::FlexString;
pub use phase::LifecyclePhase;
pub use step::{LifecycleStep, workflow_name};
pub use template::WorkflowTemplate;

/// API group of the addon resource.
pub const ADDON_GROUP: &str = "addonmgr.keikoproj.io";

/// API version of the addon resource, used in owner references.
pub const ADDON_API_VERSION: &str = "addonmgr.keikoproj.io/v1alpha1";

/// Kind of the addon resource.
pub const ADDON_KIND: &str = "Addon";
