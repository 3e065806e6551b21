//! Watch command - wait for the upstream chart to change

use console::style;
use rigger_lifecycle::WatchOutcome;
use tokio_util::sync::CancellationToken;

use crate::config::Settings;
use crate::error::Result;

/// Run the watch command
///
/// Returns once the upstream chart changed or Ctrl-C was pressed.
pub async fn run(settings: &Settings) -> Result<()> {
    let engine = super::engine(settings)?;

    let cancel = CancellationToken::new();
    let on_signal = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            on_signal.cancel();
        }
    });

    println!(
        "{} Watching for upstream changes every {}",
        style("→").blue().bold(),
        style(humantime::format_duration(settings.watch_interval)).cyan()
    );

    match engine.watch(settings.watch_interval, &cancel).await? {
        WatchOutcome::Changed => println!(
            "{} Upstream chart changed. Run {} to apply it.",
            style("✓").green().bold(),
            style("rigger update").cyan()
        ),
        WatchOutcome::Cancelled => println!("{} Watch cancelled", style("⚠").yellow().bold()),
    }
    Ok(())
}
