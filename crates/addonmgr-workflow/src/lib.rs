//! Addonmgr Workflow
//!
//! This crate turns an addon's workflow template into the job document that
//! is submitted to the workflow backend.
//!
//! # Pipeline
//!
//! ```text
//! WorkflowTemplate ──render──▶ RenderedJob
//!                                  │
//!                     inject_parameters(params)
//!                                  │
//!               ArtifactPostProcessor::apply(job)
//!                                  │
//!                                  ▼
//!                    RenderedJob (ready to submit)
//! ```
//!
//! The job is kept as a loosely typed document tree. All access goes through
//! the helpers in [`document`], which report shape mismatches as
//! [`DocumentError`] instead of assuming the template grammar was followed.

pub mod document;

mod artifacts;
mod error;
mod job;
mod params;
mod render;

pub use artifacts::{
  ArtifactPostProcessor, LABEL_MANAGED_BY, LABEL_NAME, LABEL_PART_OF, LABEL_VERSION,
  ROLE_ANNOTATION, WorkloadKind,
};
pub use document::DocumentError;
pub use error::WorkflowError;
pub use job::{RenderedJob, WORKFLOW_API_VERSION, WORKFLOW_KIND};
pub use params::inject_parameters;
pub use render::{DEFAULT_TTL_SECONDS_AFTER_FINISHED, render};
