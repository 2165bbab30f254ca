//! Addonmgr Lifecycle
//!
//! This crate drives the workflows that install and delete an addon. It
//! renders the addon's workflow template, submits it to the execution store
//! idempotently, cleans up executions left over from earlier content versions
//! of the same addon, and reports the workflow's status as a
//! [`LifecyclePhase`](addonmgr_config::LifecyclePhase).
//!
//! # Architecture
//!
//! ```text
//! WorkflowLifecycle::install(template, name)
//! ├── prepare_job       render → inject_parameters → ArtifactPostProcessor
//! └── submit(job)
//!     ├── get(namespace, name)         not found → create → Pending
//!     ├── resolve_collisions(existing) deleted any → Pending
//!     └── get(namespace, name)         → translate_phase
//! ```
//!
//! Every store call is bounded by [`LifecycleConfig::request_timeout`] and by
//! the caller's cancellation token. Nothing is retried here; the reconcile
//! loop calling `install` again is the retry.
//!
//! # Usage
//!
//! ```ignore
//! use addonmgr_lifecycle::{AddonLifecycle, LifecycleConfig, WorkflowLifecycle};
//! use tokio_util::sync::CancellationToken;
//!
//! let lifecycle = WorkflowLifecycle::new(store, addon, LifecycleConfig::default());
//! let name = workflow_name(lifecycle.addon(), LifecycleStep::Install);
//! let phase = lifecycle.install(&template, &name, &CancellationToken::new()).await?;
//! ```

mod collision;
mod config;
mod error;
mod events;
mod lifecycle;
mod status;
mod submit;

pub use config::LifecycleConfig;
pub use error::{LifecycleError, StoreOperation, SubmissionError};
pub use events::{ChannelRecorder, EventRecorder, LifecycleEvent, NoopRecorder, TracingRecorder};
pub use lifecycle::{AddonLifecycle, WorkflowLifecycle, prepare_job};
pub use status::{phase_of, translate_phase};
