//! Settings
//!
//! Each setting comes from, in order: the command line (or its `RIGGER_*`
//! environment variable), the config file, the built-in default.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

use rigger_lifecycle::DEFAULT_WATCH_INTERVAL;

use crate::error::{CliError, Result};

/// Contents of `config.yaml`
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ConfigFile {
    #[serde(default)]
    pub workspace: Option<PathBuf>,

    #[serde(default)]
    pub helm_binary: Option<PathBuf>,

    #[serde(default)]
    pub kustomize_binary: Option<PathBuf>,

    /// Humantime duration, e.g. `5m`
    #[serde(default)]
    pub watch_interval: Option<String>,
}

impl ConfigFile {
    /// Load the config file
    ///
    /// An explicit path must exist; the default location is optional.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        match explicit {
            Some(path) => Self::load_from(path),
            None => match Self::default_path() {
                Some(path) if path.exists() => Self::load_from(&path),
                _ => Ok(Self::default()),
            },
        }
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| CliError::Io {
            message: format!("read {}: {}", path.display(), e),
        })?;
        serde_yaml::from_str(&content)
            .map_err(|e| CliError::usage(format!("Invalid config file {}: {}", path.display(), e)))
    }

    /// `<config_dir>/rigger/config.yaml`
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("rigger").join("config.yaml"))
    }
}

/// Command line values that override the config file
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub workspace: Option<PathBuf>,
    pub helm_binary: Option<PathBuf>,
    pub kustomize_binary: Option<PathBuf>,
    pub watch_interval: Option<Duration>,
}

/// Fully resolved settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub workspace: PathBuf,
    pub helm_binary: PathBuf,
    pub kustomize_binary: PathBuf,
    pub watch_interval: Duration,
}

impl Settings {
    pub fn resolve(overrides: Overrides, file: ConfigFile) -> Result<Self> {
        let watch_interval = match (overrides.watch_interval, file.watch_interval) {
            (Some(interval), _) => interval,
            (None, Some(text)) => humantime::parse_duration(&text).map_err(|e| {
                CliError::usage(format!("Invalid watchInterval `{}` in config file: {}", text, e))
            })?,
            (None, None) => DEFAULT_WATCH_INTERVAL,
        };

        if watch_interval.is_zero() {
            return Err(CliError::usage("The watch interval must be greater than zero"));
        }

        Ok(Self {
            workspace: overrides
                .workspace
                .or(file.workspace)
                .unwrap_or_else(|| PathBuf::from(".")),
            helm_binary: overrides
                .helm_binary
                .or(file.helm_binary)
                .unwrap_or_else(|| PathBuf::from("helm")),
            kustomize_binary: overrides
                .kustomize_binary
                .or(file.kustomize_binary)
                .unwrap_or_else(|| PathBuf::from("kustomize")),
            watch_interval,
        })
    }
}
