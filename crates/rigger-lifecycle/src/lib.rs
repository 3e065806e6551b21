//! Rigger Lifecycle - deploy workflows for rigger
//!
//! This crate provides:
//! - **Lifecycle engine**: `init`, `update` and `watch` around a persisted state record
//! - **State storage**: JSON file store plus an in-memory store for tests
//! - **Helm templating**: deterministic `template` invocations through a pluggable tool
//! - **Overlays**: kustomize bases and overlays over rendered output
//! - **Step execution**: runs the ordered steps of a release plan

pub mod builder;
pub mod engine;
pub mod error;
pub mod executor;
pub mod helm;
pub mod kustomize;
pub mod process;
pub mod storage;
pub mod ui;

pub use builder::ReleaseBuilder;
pub use engine::{DEFAULT_WATCH_INTERVAL, InitSource, LifecycleEngine, WatchOutcome};
pub use error::{LifecycleError, Result};
pub use executor::StepExecutor;
pub use helm::{ForkHelm, HelmTemplater, HelmTool, TemplateInvocation, Templater, release_name};
pub use kustomize::{ForkKustomizer, Kustomizer};
pub use process::CapturedOutput;
pub use storage::{FileStateStore, LoadedState, MemoryStateStore, OperationCounts, StateStore};
pub use ui::{ConsoleUi, Ui};
