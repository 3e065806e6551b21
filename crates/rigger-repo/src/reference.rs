//! Chart references

use std::fmt;
use std::path::{Path, PathBuf};
use url::Url;

use crate::error::{RepoError, Result};

/// Where a chart comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChartReference {
    /// A gzipped tarball served over HTTP(S)
    Remote(Url),
    /// An unpacked chart directory
    LocalDir(PathBuf),
    /// A gzipped tarball on disk
    LocalArchive(PathBuf),
}

impl ChartReference {
    /// Classify a reference string
    ///
    /// Local references must exist: a path that is neither a directory nor a
    /// `.tgz`/`.tar.gz` file is rejected.
    pub fn parse(reference: &str) -> Result<Self> {
        let trimmed = reference.trim();
        if trimmed.is_empty() {
            return Err(invalid(reference, "reference is empty"));
        }

        match Url::parse(trimmed) {
            Ok(url) if matches!(url.scheme(), "http" | "https") => Ok(Self::Remote(url)),
            Ok(url) if url.scheme() == "file" => {
                let path = url
                    .to_file_path()
                    .map_err(|_| invalid(reference, "not a valid file URL"))?;
                Self::local(reference, path)
            }
            // Single letter schemes are Windows drive letters
            Ok(url) if url.scheme().len() > 1 => Err(invalid(
                reference,
                &format!("unsupported scheme `{}`", url.scheme()),
            )),
            _ => Self::local(reference, PathBuf::from(trimmed)),
        }
    }

    fn local(reference: &str, path: PathBuf) -> Result<Self> {
        if path.is_dir() {
            Ok(Self::LocalDir(path))
        } else if path.is_file() && is_archive_name(&path) {
            Ok(Self::LocalArchive(path))
        } else if path.exists() {
            Err(invalid(
                reference,
                "expected a chart directory or a .tgz/.tar.gz archive",
            ))
        } else {
            Err(invalid(reference, "no such file or directory"))
        }
    }

    pub fn is_remote(&self) -> bool {
        matches!(self, Self::Remote(_))
    }

    /// The form a reference is recorded in
    ///
    /// Local charts become absolute paths so later runs from another working
    /// directory find the same chart. Anything else is only trimmed.
    pub fn recorded_form(reference: &str) -> String {
        match Self::parse(reference) {
            Ok(Self::LocalDir(path) | Self::LocalArchive(path)) => path
                .canonicalize()
                .map(|absolute| absolute.display().to_string())
                .unwrap_or_else(|_| reference.trim().to_string()),
            _ => reference.trim().to_string(),
        }
    }
}

impl fmt::Display for ChartReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Remote(url) => write!(f, "{}", url),
            Self::LocalDir(path) | Self::LocalArchive(path) => write!(f, "{}", path.display()),
        }
    }
}

fn is_archive_name(path: &Path) -> bool {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_lowercase())
        .unwrap_or_default();
    name.ends_with(".tgz") || name.ends_with(".tar.gz")
}

fn invalid(reference: &str, reason: &str) -> RepoError {
    RepoError::InvalidReference {
        reference: reference.to_string(),
        reason: reason.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_parse_remote() {
        let reference = ChartReference::parse("https://charts.example.com/nginx-1.0.0.tgz").unwrap();
        assert!(reference.is_remote());
        assert_eq!(
            reference.to_string(),
            "https://charts.example.com/nginx-1.0.0.tgz"
        );
    }

    #[test]
    fn test_parse_local_dir_and_archive() {
        let tmp = TempDir::new().unwrap();
        let archive = tmp.path().join("nginx-1.0.0.tgz");
        std::fs::write(&archive, b"").unwrap();

        let dir = ChartReference::parse(tmp.path().to_str().unwrap()).unwrap();
        assert_eq!(dir, ChartReference::LocalDir(tmp.path().to_path_buf()));

        let file = ChartReference::parse(archive.to_str().unwrap()).unwrap();
        assert_eq!(file, ChartReference::LocalArchive(archive.clone()));

        let url = Url::from_file_path(&archive).unwrap();
        let file = ChartReference::parse(url.as_str()).unwrap();
        assert_eq!(file, ChartReference::LocalArchive(archive));
    }

    #[test]
    fn test_recorded_form() {
        let tmp = TempDir::new().unwrap();
        let chart = tmp.path().join("nginx");
        std::fs::create_dir_all(&chart).unwrap();
        let absolute = chart.canonicalize().unwrap().display().to_string();

        let dotted = format!("{}/../nginx", chart.display());
        assert_eq!(ChartReference::recorded_form(&dotted), absolute);
        assert_eq!(
            ChartReference::recorded_form(Url::from_file_path(&chart).unwrap().as_str()),
            absolute
        );
        assert_eq!(
            ChartReference::recorded_form(" https://charts.example.com/nginx.tgz "),
            "https://charts.example.com/nginx.tgz"
        );
        assert_eq!(ChartReference::recorded_form("./no/such/chart"), "./no/such/chart");
    }

    #[test]
    fn test_parse_rejects() {
        let tmp = TempDir::new().unwrap();
        let plain = tmp.path().join("values.yaml");
        std::fs::write(&plain, "a: 1\n").unwrap();
        let missing = tmp.path().join("missing");

        for reference in [
            "",
            "oci://registry.example.com/nginx",
            plain.to_str().unwrap(),
            missing.to_str().unwrap(),
        ] {
            assert!(
                matches!(
                    ChartReference::parse(reference),
                    Err(RepoError::InvalidReference { .. })
                ),
                "{reference} should be rejected"
            );
        }
    }
}
