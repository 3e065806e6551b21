//! Update command - re-render the recorded chart

use console::style;

use crate::config::Settings;
use crate::error::Result;

/// Run the update command
pub async fn run(settings: &Settings) -> Result<()> {
    println!(
        "{} Updating {}",
        style("→").blue().bold(),
        style(settings.workspace.display()).cyan()
    );

    super::engine(settings)?.update().await?;

    println!("{} Workspace updated", style("✓").green().bold());
    Ok(())
}
