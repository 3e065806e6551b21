//! The release lifecycle
//!
//! Three entry points share one state record:
//! - **init**: first run, records the chart reference and its fingerprint
//! - **update**: re-resolves the recorded reference and re-renders
//! - **watch**: polls the recorded reference until its fingerprint changes
//!
//! ```text
//! NoState --init--> Present{chartURL, contentSHA} --update--> Present'
//!                           |
//!                           +--watch--> Changed | Cancelled | error
//! ```

use rigger_core::{ChartMetadata, State, WorkspaceLayout};
use rigger_repo::{ChartMetadataResolver, ChartReference};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

use crate::builder::ReleaseBuilder;
use crate::error::{LifecycleError, Result};
use crate::executor::StepExecutor;
use crate::storage::{LoadedState, StateStore};
use crate::ui::Ui;

/// Polling interval of `watch` when none is configured
pub const DEFAULT_WATCH_INTERVAL: Duration = Duration::from_secs(5 * 60);

/// What `init` starts from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InitSource {
    /// A chart reference to resolve and render
    Chart(String),
    /// Pre-rendered manifests; state is not touched
    Raw(PathBuf),
}

/// How a watch ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WatchOutcome {
    /// The upstream fingerprint differs from the recorded one
    Changed,
    /// The cancellation token fired
    Cancelled,
}

/// Drives init, update and watch
pub struct LifecycleEngine {
    store: Arc<dyn StateStore>,
    resolver: Arc<dyn ChartMetadataResolver>,
    builder: ReleaseBuilder,
    executor: StepExecutor,
    ui: Arc<dyn Ui>,
}

impl LifecycleEngine {
    pub fn new(
        layout: WorkspaceLayout,
        store: Arc<dyn StateStore>,
        resolver: Arc<dyn ChartMetadataResolver>,
        executor: StepExecutor,
        ui: Arc<dyn Ui>,
    ) -> Self {
        Self {
            store,
            resolver,
            builder: ReleaseBuilder::new(layout),
            executor,
            ui,
        }
    }

    /// First run of a workspace
    ///
    /// With existing state the operator is asked whether to start over;
    /// anything but `y` returns [`LifecycleError::ShouldUseUpdate`] and leaves
    /// the state untouched.
    pub async fn init(&self, source: &InitSource) -> Result<()> {
        let reference = match source {
            InitSource::Raw(path) => {
                tracing::info!(raw = %path.display(), "init from raw manifests");
                let release = self.builder.build_raw(path);
                return self.executor.execute(&release, &State::default()).await;
            }
            InitSource::Chart(reference) => reference,
        };

        match self.store.try_load().await {
            LoadedState::Empty => {}
            LoadedState::Unreadable(message) => {
                self.ui.warn(&format!(
                    "Ignoring unreadable state file at {}: {}",
                    self.store.location(),
                    message
                ));
                self.store.remove_state_file().await?;
            }
            LoadedState::Present(_) => {
                tracing::debug!(path = %self.store.location(), "state exists");
                let answer = self
                    .ui
                    .ask(&format!(
                        "State file found at {}, do you want to start from scratch? (y/N) ",
                        self.store.location()
                    ))
                    .await?;

                if !is_yes(&answer) {
                    return Err(LifecycleError::ShouldUseUpdate);
                }
                self.store.remove_state_file().await?;
            }
        }

        let metadata = self.resolve(reference).await?;
        let recorded = ChartReference::recorded_form(reference);
        self.store.serialize_chart_url(&recorded).await?;
        let release = self.builder.build(&metadata);
        self.store
            .serialize_content_sha(&metadata.content_sha)
            .await?;

        let mut state = State::default();
        state.set_chart_url(recorded);
        state.set_content_sha(metadata.content_sha.as_str());
        self.executor.execute(&release, &state).await
    }

    /// Re-render the recorded chart reference
    ///
    /// The new fingerprint is recorded once every step succeeded.
    pub async fn update(&self) -> Result<()> {
        let state = self.load_required().await?;
        let reference = self.required_chart_url(&state)?;

        let metadata = self.resolve(reference).await?;
        let release = self.builder.build(&metadata);
        self.executor.execute(&release, &state).await?;

        self.store
            .serialize_content_sha(&metadata.content_sha)
            .await
    }

    /// Poll the recorded chart reference until its fingerprint changes
    ///
    /// State is re-read on every iteration and never written.
    pub async fn watch(
        &self,
        interval: Duration,
        cancel: &CancellationToken,
    ) -> Result<WatchOutcome> {
        loop {
            if cancel.is_cancelled() {
                return Ok(WatchOutcome::Cancelled);
            }

            let state = self.load_required().await?;
            let reference = self.required_chart_url(&state)?;
            let last_sha = state
                .current_sha()
                .ok_or_else(|| LifecycleError::ContentShaMissing {
                    path: self.store.location(),
                })?;

            let metadata = tokio::select! {
                _ = cancel.cancelled() => return Ok(WatchOutcome::Cancelled),
                resolved = self.resolve(reference) => resolved?,
            };

            if metadata.content_sha != last_sha {
                tracing::info!(
                    chart_url = reference,
                    previous = last_sha,
                    current = %metadata.content_sha,
                    "new sha"
                );
                return Ok(WatchOutcome::Changed);
            }

            tracing::debug!(chart_url = reference, interval = ?interval, "no upstream change");
            tokio::select! {
                _ = cancel.cancelled() => return Ok(WatchOutcome::Cancelled),
                _ = tokio::time::sleep(interval) => {}
            }
        }
    }

    async fn resolve(&self, reference: &str) -> Result<ChartMetadata> {
        self.resolver
            .resolve_chart_metadata(reference)
            .await
            .map_err(|source| LifecycleError::Resolve {
                reference: reference.to_string(),
                source,
            })
    }

    async fn load_required(&self) -> Result<State> {
        match self.store.try_load().await {
            LoadedState::Present(state) => Ok(state),
            LoadedState::Empty => Err(LifecycleError::StateMissing {
                path: self.store.location(),
            }),
            LoadedState::Unreadable(message) => Err(LifecycleError::StateUnreadable {
                path: self.store.location(),
                message,
            }),
        }
    }

    fn required_chart_url<'a>(&self, state: &'a State) -> Result<&'a str> {
        state
            .current_chart_url()
            .ok_or_else(|| LifecycleError::ChartUrlMissing {
                path: self.store.location(),
            })
    }
}

/// Only an explicit `y` starts over
fn is_yes(answer: &str) -> bool {
    answer.trim_matches([' ', '\r', '\n']).eq_ignore_ascii_case("y")
}
