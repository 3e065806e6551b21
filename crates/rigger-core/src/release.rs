//! Release plan types
//!
//! A `Release` is the fully assembled plan for one run: what to render and the
//! ordered lifecycle steps to execute. It is rebuilt on every run and never
//! persisted; only the state it was derived from is.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

use crate::chart::ChartMetadata;
use crate::config::ConfigGroup;

/// A deployment plan
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Release {
    pub metadata: ReleaseMetadata,
    pub spec: Spec,
}

/// Identity of what is being released
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ReleaseMetadata {
    /// Channel name, the source of the helm release name
    pub channel_name: String,

    /// Metadata of the chart this release was built from
    #[serde(default)]
    pub chart: ChartMetadata,
}

impl ReleaseMetadata {
    pub fn for_chart(chart: ChartMetadata) -> Self {
        Self {
            channel_name: chart.name.clone(),
            chart,
        }
    }
}

/// Assets, configuration and lifecycle of a release
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Spec {
    /// Render targets, in order
    #[serde(default)]
    pub assets: Vec<Asset>,

    /// Configuration groups available to value expressions
    #[serde(default)]
    pub config: Vec<ConfigGroup>,

    /// Steps, executed strictly in order
    #[serde(default)]
    pub lifecycle: Vec<Step>,
}

impl Spec {
    /// Iterate over the helm assets of this spec
    pub fn helm_assets(&self) -> impl Iterator<Item = &HelmAsset> {
        self.assets.iter().map(|asset| match asset {
            Asset::Helm(helm) => helm,
        })
    }
}

/// A render target
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub enum Asset {
    Helm(HelmAsset),
}

/// A helm chart to render into a directory
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct HelmAsset {
    /// Output directory
    pub dest: PathBuf,

    /// Human readable description, used in logs
    #[serde(default)]
    pub description: Option<String>,

    /// Local chart root
    pub chart_root: PathBuf,

    /// Extra options passed verbatim to the templating tool
    #[serde(default)]
    pub helm_opts: Vec<String>,

    /// Values passed as `--set key=value`; strings are template expressions
    #[serde(default)]
    pub values: BTreeMap<String, serde_json::Value>,
}

/// One unit of the lifecycle pipeline
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum Step {
    /// Introduce the chart to the operator
    HelmIntro,
    /// Stage the values file used by the render
    HelmValues,
    /// Render every asset
    Render,
    /// Apply an overlay over rendered output
    Kustomize(KustomizeStep),
    /// Show static text
    Message(MessageStep),
}

impl Step {
    /// Short name used in logs and progress output
    pub fn kind(&self) -> &'static str {
        match self {
            Step::HelmIntro => "helmIntro",
            Step::HelmValues => "helmValues",
            Step::Render => "render",
            Step::Kustomize(_) => "kustomize",
            Step::Message(_) => "message",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct KustomizeStep {
    /// Directory of the resources being overlaid
    pub base_path: PathBuf,
    /// Overlay directory
    pub dest: PathBuf,
    /// The base is render output, so its kustomization is rewritten on every run
    #[serde(default)]
    pub generated_base: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct MessageStep {
    pub contents: String,
}
