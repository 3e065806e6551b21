//! Helm rendering
//!
//! The templater turns a chart asset into a single `template` invocation:
//! a deterministic release name, the asset's extra options and one
//! `--set key=value` pair per asset value, sorted by key. Before rendering it
//! runs the tool's client initialization and a dependency update; if either
//! fails the template invocation never runs.

mod tool;

pub use tool::{ForkHelm, HelmTool, TemplateInvocation};

use async_trait::async_trait;
use rigger_core::{ConfigGroup, HelmAsset, ReleaseMetadata};
use rigger_engine::{TemplateContext, ValueBuilder, literal_to_string};
use std::path::Path;

use crate::error::{LifecycleError, Result};

/// Renders a chart into an output directory
#[async_trait]
pub trait Templater: Send + Sync {
    async fn template(
        &self,
        chart_root: &Path,
        asset: &HelmAsset,
        metadata: &ReleaseMetadata,
        config_groups: &[ConfigGroup],
        template_context: &TemplateContext,
    ) -> Result<()>;
}

/// Templater backed by a helm-compatible tool
pub struct HelmTemplater<T> {
    tool: T,
}

impl<T: HelmTool> HelmTemplater<T> {
    pub fn new(tool: T) -> Self {
        Self { tool }
    }

    pub fn tool(&self) -> &T {
        &self.tool
    }
}

/// Release name derived from a channel name
///
/// Lower-cased, then every character outside `[a-zA-Z0-9-]` becomes `-`.
/// Runs are not collapsed.
pub fn release_name(channel_name: &str) -> String {
    channel_name
        .to_lowercase()
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' { c } else { '-' })
        .collect()
}

/// `--set` arguments for the values of an asset, sorted by key
///
/// String values are value expressions and are rendered first; any other
/// literal is passed through unchanged.
pub fn set_args(
    values: &std::collections::BTreeMap<String, serde_json::Value>,
    builder: &ValueBuilder,
) -> Result<Vec<String>> {
    let mut args = Vec::with_capacity(values.len() * 2);
    for (key, value) in values {
        let rendered = match value {
            serde_json::Value::String(expression) => builder.render_str(expression)?,
            literal => literal_to_string(literal),
        };
        args.push("--set".to_string());
        args.push(format!("{}={}", key, rendered));
    }
    Ok(args)
}

#[async_trait]
impl<T: HelmTool> Templater for HelmTemplater<T> {
    async fn template(
        &self,
        chart_root: &Path,
        asset: &HelmAsset,
        metadata: &ReleaseMetadata,
        config_groups: &[ConfigGroup],
        template_context: &TemplateContext,
    ) -> Result<()> {
        let builder = ValueBuilder::new(config_groups, template_context)?;
        let mut extra_args = asset.helm_opts.clone();
        extra_args.extend(set_args(&asset.values, &builder)?);

        reset_dest(&asset.dest).await?;

        let invocation = TemplateInvocation {
            chart_root: chart_root.to_path_buf(),
            output_dir: asset.dest.clone(),
            release_name: release_name(&metadata.channel_name),
            extra_args,
        };

        tracing::info!(
            chart_root = %chart_root.display(),
            dest = %asset.dest.display(),
            release = %invocation.release_name,
            "rendering chart"
        );

        self.tool.init_client().await?;
        self.tool.dependency_update(chart_root).await?;
        let output = self.tool.template(&invocation).await?;
        tracing::debug!(stdout = %output.stdout, "helm template output");

        Ok(())
    }
}

/// Empty `dest` so templates removed upstream do not linger
async fn reset_dest(dest: &Path) -> Result<()> {
    match tokio::fs::remove_dir_all(dest).await {
        Ok(()) => tracing::debug!(dest = %dest.display(), "cleared previous render"),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => return Err(LifecycleError::io(format!("clear {}", dest.display()), e)),
    }
    tokio::fs::create_dir_all(dest)
        .await
        .map_err(|e| LifecycleError::io(format!("create {}", dest.display()), e))
}
