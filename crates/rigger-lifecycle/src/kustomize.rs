//! Overlay rendering with kustomize
//!
//! The rendered chart becomes a kustomize base, the overlay directory
//! references it, and `kustomize build` of the overlay produces the final
//! output. A rendered base gets a fresh `kustomization.yaml` on every run; the
//! overlay's and a raw base's are left alone so operator patches survive
//! re-renders.

use async_trait::async_trait;
use rigger_core::KustomizeStep;
use serde::{Deserialize, Serialize};
use std::ffi::OsStr;
use std::path::{Component, Path, PathBuf};
use walkdir::WalkDir;

use crate::error::{LifecycleError, Result};
use crate::process::run_captured;

const KUSTOMIZATION_FILE: &str = "kustomization.yaml";

/// Applies an overlay step
#[async_trait]
pub trait Kustomizer: Send + Sync {
    async fn kustomize(&self, step: &KustomizeStep) -> Result<()>;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Kustomization {
    api_version: String,
    kind: String,
    resources: Vec<String>,
}

impl Kustomization {
    fn new(resources: Vec<String>) -> Self {
        Self {
            api_version: "kustomize.config.k8s.io/v1beta1".to_string(),
            kind: "Kustomization".to_string(),
            resources,
        }
    }
}

/// Kustomizer forking a kustomize binary
#[derive(Debug, Clone)]
pub struct ForkKustomizer {
    binary: PathBuf,
    output_file: PathBuf,
}

impl ForkKustomizer {
    pub fn new(binary: impl Into<PathBuf>, output_file: impl Into<PathBuf>) -> Self {
        Self {
            binary: binary.into(),
            output_file: output_file.into(),
        }
    }
}

#[async_trait]
impl Kustomizer for ForkKustomizer {
    async fn kustomize(&self, step: &KustomizeStep) -> Result<()> {
        ensure_base_kustomization(&step.base_path, step.generated_base)?;
        ensure_overlay_kustomization(&step.base_path, &step.dest)?;

        let output = run_captured(
            &self.binary,
            [OsStr::new("build"), step.dest.as_os_str()],
            "kustomize build",
        )
        .await?;

        if let Some(parent) = self.output_file.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| LifecycleError::io(format!("create {}", parent.display()), e))?;
        }
        tokio::fs::write(&self.output_file, output.stdout)
            .await
            .map_err(|e| LifecycleError::io(format!("write {}", self.output_file.display()), e))?;

        tracing::info!(
            overlay = %step.dest.display(),
            output = %self.output_file.display(),
            "wrote overlaid assets"
        );
        Ok(())
    }
}

/// Write a base kustomization listing every YAML file under `base`
///
/// An existing one is kept unless `regenerate` is set.
fn ensure_base_kustomization(base: &Path, regenerate: bool) -> Result<()> {
    let file = base.join(KUSTOMIZATION_FILE);
    if file.exists() && !regenerate {
        return Ok(());
    }
    if !base.is_dir() {
        return Err(LifecycleError::io(
            format!("read kustomize base {}", base.display()),
            std::io::Error::new(std::io::ErrorKind::NotFound, "directory not found"),
        ));
    }

    let mut resources = Vec::new();
    for entry in WalkDir::new(base).sort_by_file_name() {
        let entry = entry.map_err(|e| {
            LifecycleError::io(
                format!("walk {}", base.display()),
                std::io::Error::other(e.to_string()),
            )
        })?;
        if !entry.file_type().is_file() || !is_yaml(entry.path()) || entry.path() == file {
            continue;
        }
        if let Ok(relative) = entry.path().strip_prefix(base) {
            resources.push(to_slash(relative));
        }
    }

    write_kustomization(&file, Kustomization::new(resources))
}

/// Write an overlay kustomization pointing at `base`
fn ensure_overlay_kustomization(base: &Path, dest: &Path) -> Result<()> {
    std::fs::create_dir_all(dest)
        .map_err(|e| LifecycleError::io(format!("create {}", dest.display()), e))?;

    let file = dest.join(KUSTOMIZATION_FILE);
    if file.exists() {
        return Ok(());
    }

    let base_ref = relative_path(dest, base)?;
    write_kustomization(&file, Kustomization::new(vec![base_ref]))
}

fn write_kustomization(path: &Path, kustomization: Kustomization) -> Result<()> {
    let yaml = serde_yaml::to_string(&kustomization)?;
    std::fs::write(path, yaml).map_err(|e| LifecycleError::io(format!("write {}", path.display()), e))
}

fn is_yaml(path: &Path) -> bool {
    matches!(
        path.extension().and_then(|e| e.to_str()),
        Some("yaml") | Some("yml")
    )
}

fn to_slash(path: &Path) -> String {
    path.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

/// Path of `target` relative to the directory `from`, `/` separated
fn relative_path(from: &Path, target: &Path) -> Result<String> {
    let canonical = |p: &Path| {
        p.canonicalize()
            .map_err(|e| LifecycleError::io(format!("resolve {}", p.display()), e))
    };
    let from = canonical(from)?;
    let target = canonical(target)?;

    let from_parts: Vec<Component<'_>> = from.components().collect();
    let target_parts: Vec<Component<'_>> = target.components().collect();
    let common = from_parts
        .iter()
        .zip(&target_parts)
        .take_while(|(a, b)| a == b)
        .count();

    let mut parts: Vec<String> = vec!["..".to_string(); from_parts.len() - common];
    parts.extend(
        target_parts[common..]
            .iter()
            .map(|c| c.as_os_str().to_string_lossy().into_owned()),
    );

    if parts.is_empty() {
        Ok(".".to_string())
    } else {
        Ok(parts.join("/"))
    }
}
