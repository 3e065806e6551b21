//! Chart metadata resolution
//!
//! Resolving a reference stages the chart under a fixed working directory,
//! replacing whatever was there, and fingerprints the staged content.

use async_trait::async_trait;
use rigger_core::{ChartFile, ChartMetadata, digest_dir};
use std::fs;
use std::path::{Path, PathBuf};

use crate::archive::{chart_root, copy_dir, extract_archive};
use crate::error::{RepoError, Result};
use crate::fetch::ChartFetcher;
use crate::reference::ChartReference;

/// Resolves a chart reference to its current metadata
#[async_trait]
pub trait ChartMetadataResolver: Send + Sync {
    /// Fetch the chart behind `reference` and describe it
    ///
    /// Two calls for unchanged content return the same `content_sha`.
    async fn resolve_chart_metadata(&self, reference: &str) -> Result<ChartMetadata>;
}

/// Resolver staging charts on local disk
pub struct ChartResolver {
    staging_dir: PathBuf,
    fetcher: ChartFetcher,
}

impl ChartResolver {
    /// Create a resolver staging charts at `staging_dir`
    pub fn new(staging_dir: impl Into<PathBuf>) -> Result<Self> {
        Ok(Self {
            staging_dir: staging_dir.into(),
            fetcher: ChartFetcher::new()?,
        })
    }

    /// Where resolved charts are staged
    pub fn staging_dir(&self) -> &Path {
        &self.staging_dir
    }

    /// Scratch directory next to the staging dir, so the final move is a rename
    fn incoming_dir(&self) -> PathBuf {
        let mut name = self
            .staging_dir
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| "chart".into());
        name.push(".incoming");
        self.staging_dir.with_file_name(name)
    }

    async fn stage(&self, reference: &ChartReference) -> Result<()> {
        let incoming = self.incoming_dir();
        remove_dir_if_exists(&incoming)?;
        if let Some(parent) = incoming.parent() {
            fs::create_dir_all(parent)?;
        }

        match reference {
            ChartReference::LocalDir(path) => {
                self.ensure_outside_source(reference, path)?;
                copy_dir(path, &incoming)?;
            }
            ChartReference::LocalArchive(path) => {
                let data = tokio::fs::read(path).await?;
                extract_archive(&data, &incoming)?;
            }
            ChartReference::Remote(url) => {
                let data = self.fetcher.get_bytes(url).await?;
                extract_archive(&data, &incoming)?;
            }
        }

        let root = chart_root(&incoming)?;
        remove_dir_if_exists(&self.staging_dir)?;
        fs::rename(&root, &self.staging_dir)?;
        remove_dir_if_exists(&incoming)?;

        tracing::debug!(
            reference = %reference,
            staging_dir = %self.staging_dir.display(),
            "staged chart"
        );
        Ok(())
    }

    /// Copying a directory into itself never terminates
    fn ensure_outside_source(&self, reference: &ChartReference, source: &Path) -> Result<()> {
        let source = source.canonicalize()?;
        let staging_parent = match self.incoming_dir().parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.canonicalize()?,
            _ => std::env::current_dir()?,
        };

        if staging_parent.starts_with(&source) {
            return Err(RepoError::InvalidReference {
                reference: reference.to_string(),
                reason: "the chart directory contains the rigger workspace".to_string(),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl ChartMetadataResolver for ChartResolver {
    async fn resolve_chart_metadata(&self, reference: &str) -> Result<ChartMetadata> {
        let parsed = ChartReference::parse(reference)?;
        self.stage(&parsed).await?;

        let chart = ChartFile::load(&self.staging_dir)?;
        let readme = read_readme(&self.staging_dir)?;
        let content_sha = digest_dir(&self.staging_dir)?;

        tracing::info!(
            chart = %chart.name,
            version = %chart.version,
            content_sha = %content_sha,
            "resolved chart"
        );

        Ok(ChartMetadata::from_chart_file(&chart, reference.trim(), content_sha).with_readme(readme))
    }
}

fn read_readme(chart_root: &Path) -> Result<Option<String>> {
    for entry in fs::read_dir(chart_root)? {
        let entry = entry?;
        if entry.file_name().to_string_lossy().eq_ignore_ascii_case("README.md") {
            return Ok(Some(fs::read_to_string(entry.path())?));
        }
    }
    Ok(None)
}

fn remove_dir_if_exists(path: &Path) -> Result<()> {
    match fs::remove_dir_all(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e.into()),
    }
}
