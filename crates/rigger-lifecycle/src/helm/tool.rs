//! The templating tool behind the helm templater

use async_trait::async_trait;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::process::{CapturedOutput, run_captured};

/// One `template` invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateInvocation {
    pub chart_root: PathBuf,
    pub output_dir: PathBuf,
    pub release_name: String,
    /// Extra options followed by `--set key=value` pairs
    pub extra_args: Vec<String>,
}

impl TemplateInvocation {
    /// Full argument list, subcommand first
    pub fn args(&self) -> Vec<String> {
        let mut args = vec![
            "template".to_string(),
            self.chart_root.display().to_string(),
            "--output-dir".to_string(),
            self.output_dir.display().to_string(),
            "--name".to_string(),
            self.release_name.clone(),
        ];
        args.extend(self.extra_args.iter().cloned());
        args
    }
}

/// Capabilities the templater needs from a helm-compatible tool
#[async_trait]
pub trait HelmTool: Send + Sync {
    /// `init --client-only`
    async fn init_client(&self) -> Result<CapturedOutput>;

    /// `dependency update <chart_root>`
    async fn dependency_update(&self, chart_root: &Path) -> Result<CapturedOutput>;

    /// `template ...`
    async fn template(&self, invocation: &TemplateInvocation) -> Result<CapturedOutput>;
}

/// Forks a helm binary for every capability
#[derive(Debug, Clone)]
pub struct ForkHelm {
    binary: PathBuf,
}

impl ForkHelm {
    pub fn new(binary: impl Into<PathBuf>) -> Self {
        Self {
            binary: binary.into(),
        }
    }

    pub fn binary(&self) -> &Path {
        &self.binary
    }
}

impl Default for ForkHelm {
    fn default() -> Self {
        Self::new("helm")
    }
}

#[async_trait]
impl HelmTool for ForkHelm {
    async fn init_client(&self) -> Result<CapturedOutput> {
        run_captured(&self.binary, ["init", "--client-only"], "helm init --client-only").await
    }

    async fn dependency_update(&self, chart_root: &Path) -> Result<CapturedOutput> {
        run_captured(
            &self.binary,
            [
                OsStr::new("dependency"),
                OsStr::new("update"),
                chart_root.as_os_str(),
            ],
            "helm dependency update",
        )
        .await
    }

    async fn template(&self, invocation: &TemplateInvocation) -> Result<CapturedOutput> {
        run_captured(&self.binary, invocation.args(), "helm template").await
    }
}
