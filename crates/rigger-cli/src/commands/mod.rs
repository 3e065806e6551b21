//! CLI commands

pub mod init;
pub mod update;
pub mod watch;

use rigger_core::WorkspaceLayout;
use rigger_lifecycle::{
    ConsoleUi, FileStateStore, ForkHelm, ForkKustomizer, HelmTemplater, LifecycleEngine,
    StepExecutor,
};
use rigger_repo::ChartResolver;
use std::sync::Arc;

use crate::config::Settings;
use crate::error::Result;

/// Wire the lifecycle engine for a workspace
pub fn engine(settings: &Settings) -> Result<LifecycleEngine> {
    let layout = WorkspaceLayout::new(&settings.workspace);
    let ui = Arc::new(ConsoleUi::new());

    let executor = StepExecutor::new(
        layout.clone(),
        Arc::new(HelmTemplater::new(ForkHelm::new(&settings.helm_binary))),
        Arc::new(ForkKustomizer::new(
            &settings.kustomize_binary,
            layout.output_file(),
        )),
        ui.clone(),
    );

    Ok(LifecycleEngine::new(
        layout.clone(),
        Arc::new(FileStateStore::new(layout.state_file())),
        Arc::new(ChartResolver::new(layout.chart_path())?),
        executor,
        ui,
    ))
}
