//! Step execution
//!
//! Steps run strictly in list order. The first failing step aborts the run;
//! nothing is retried or rolled back.

use rigger_core::{Release, State, Step, WorkspaceLayout};
use std::sync::Arc;

use crate::error::{LifecycleError, Result};
use crate::helm::Templater;
use crate::kustomize::Kustomizer;
use crate::ui::Ui;

/// Runs the steps of a release
pub struct StepExecutor {
    layout: WorkspaceLayout,
    templater: Arc<dyn Templater>,
    kustomizer: Arc<dyn Kustomizer>,
    ui: Arc<dyn Ui>,
}

impl StepExecutor {
    pub fn new(
        layout: WorkspaceLayout,
        templater: Arc<dyn Templater>,
        kustomizer: Arc<dyn Kustomizer>,
        ui: Arc<dyn Ui>,
    ) -> Self {
        Self {
            layout,
            templater,
            kustomizer,
            ui,
        }
    }

    /// Execute every step of `release` against the operator's `state`
    pub async fn execute(&self, release: &Release, state: &State) -> Result<()> {
        for (index, step) in release.spec.lifecycle.iter().enumerate() {
            tracing::debug!(step = step.kind(), index, "executing step");

            match step {
                Step::HelmIntro => self.helm_intro(release),
                Step::HelmValues => self.helm_values(state).await?,
                Step::Render => self.render(release, state).await?,
                Step::Kustomize(kustomize) => self.kustomizer.kustomize(kustomize).await?,
                Step::Message(message) => self.ui.info(message.contents.trim()),
            }
        }
        Ok(())
    }

    fn helm_intro(&self, release: &Release) {
        let chart = &release.metadata.chart;
        let mut intro = format!("Chart: {}", chart.name);
        if !chart.version.is_empty() {
            intro.push_str(&format!(" {}", chart.version));
        }
        if let Some(description) = chart.description.as_deref().filter(|d| !d.is_empty()) {
            intro.push_str(&format!("\n{}", description));
        }
        if let Some(summary) = chart.readme_summary() {
            intro.push_str(&format!("\n\n{}", summary));
        }
        self.ui.info(&intro);
    }

    /// Stage the values file passed to every render
    ///
    /// Operator edited values win, then the chart's own defaults, then an
    /// empty document.
    async fn helm_values(&self, state: &State) -> Result<()> {
        let values = match &state.helm_values {
            Some(values) => values.clone(),
            None => {
                let chart_values = self.layout.chart_path().join("values.yaml");
                match tokio::fs::read_to_string(&chart_values).await {
                    Ok(values) => values,
                    Err(e) if e.kind() == std::io::ErrorKind::NotFound => String::new(),
                    Err(e) => {
                        return Err(LifecycleError::io(
                            format!("read {}", chart_values.display()),
                            e,
                        ));
                    }
                }
            }
        };

        let dir = self.layout.helm_values_dir();
        tokio::fs::create_dir_all(&dir)
            .await
            .map_err(|e| LifecycleError::io(format!("create {}", dir.display()), e))?;

        let file = self.layout.helm_values_file();
        tokio::fs::write(&file, values)
            .await
            .map_err(|e| LifecycleError::io(format!("write {}", file.display()), e))
    }

    async fn render(&self, release: &Release, state: &State) -> Result<()> {
        for asset in release.spec.helm_assets() {
            self.templater
                .template(
                    &asset.chart_root,
                    asset,
                    &release.metadata,
                    &release.spec.config,
                    &state.config,
                )
                .await?;
        }
        Ok(())
    }
}
