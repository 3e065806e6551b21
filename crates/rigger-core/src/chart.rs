//! Helm chart metadata

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{CoreError, Result};

/// The subset of a Helm `Chart.yaml` rigger cares about
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ChartFile {
    /// Chart API version (v1 or v2)
    #[serde(default)]
    pub api_version: Option<String>,

    /// Chart name
    pub name: String,

    /// Chart version (kept as a string, Helm allows loose versions)
    #[serde(default)]
    pub version: String,

    /// One-line description
    #[serde(default)]
    pub description: Option<String>,

    /// Version of the packaged application
    #[serde(default)]
    pub app_version: Option<String>,

    /// Icon URL
    #[serde(default)]
    pub icon: Option<String>,
}

impl ChartFile {
    /// Load `Chart.yaml` from a chart root directory
    pub fn load<P: AsRef<Path>>(chart_root: P) -> Result<Self> {
        let root = chart_root.as_ref();

        if !root.is_dir() {
            return Err(CoreError::ChartNotFound {
                path: root.display().to_string(),
            });
        }

        let chart_file = root.join("Chart.yaml");
        if !chart_file.exists() {
            return Err(CoreError::InvalidChart {
                message: format!("Chart.yaml not found in {}", root.display()),
            });
        }

        let content = std::fs::read_to_string(&chart_file)?;
        let chart: ChartFile = serde_yaml::from_str(&content)?;

        if chart.name.trim().is_empty() {
            return Err(CoreError::MissingField {
                field: "name".to_string(),
            });
        }

        Ok(chart)
    }
}

/// What a chart reference resolved to
///
/// Compared by value: two resolutions with the same `content_sha` refer to the
/// same chart content.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ChartMetadata {
    /// Chart name, used as the release channel name
    pub name: String,

    /// The reference this metadata was resolved from
    #[serde(rename = "chartURL")]
    pub chart_url: String,

    /// Chart version from Chart.yaml
    #[serde(default)]
    pub version: String,

    /// Chart description from Chart.yaml
    #[serde(default)]
    pub description: Option<String>,

    /// README contents, if the chart ships one
    #[serde(default)]
    pub readme: Option<String>,

    /// Fingerprint over the resolved chart content
    #[serde(rename = "contentSHA")]
    pub content_sha: String,
}

impl ChartMetadata {
    /// Build metadata from a parsed Chart.yaml
    pub fn from_chart_file(
        chart: &ChartFile,
        chart_url: impl Into<String>,
        content_sha: impl Into<String>,
    ) -> Self {
        Self {
            name: chart.name.clone(),
            chart_url: chart_url.into(),
            version: chart.version.clone(),
            description: chart.description.clone(),
            readme: None,
            content_sha: content_sha.into(),
        }
    }

    /// Attach README contents
    pub fn with_readme(mut self, readme: Option<String>) -> Self {
        self.readme = readme;
        self
    }

    /// First paragraph of the README, used for short intros
    pub fn readme_summary(&self) -> Option<&str> {
        let readme = self.readme.as_deref()?.trim();
        let summary = readme.split("\n\n").next().unwrap_or(readme).trim();
        if summary.is_empty() { None } else { Some(summary) }
    }
}
