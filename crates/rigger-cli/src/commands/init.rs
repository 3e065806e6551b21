//! Init command - start a workspace from a chart or raw manifests

use console::style;
use rigger_lifecycle::InitSource;

use crate::config::Settings;
use crate::error::Result;

/// Run the init command
pub async fn run(settings: &Settings, source: InitSource) -> Result<()> {
    match &source {
        InitSource::Chart(reference) => println!(
            "{} Initializing {} from {}",
            style("→").blue().bold(),
            style(settings.workspace.display()).cyan(),
            style(reference).cyan()
        ),
        InitSource::Raw(path) => println!(
            "{} Initializing {} from raw manifests in {}",
            style("→").blue().bold(),
            style(settings.workspace.display()).cyan(),
            style(path.display()).cyan()
        ),
    }

    super::engine(settings)?.init(&source).await?;

    println!("{} Workspace initialized", style("✓").green().bold());
    Ok(())
}
