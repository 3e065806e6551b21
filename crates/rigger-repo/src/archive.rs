//! Chart archive handling

use flate2::read::GzDecoder;
use std::fs;
use std::path::{Path, PathBuf};
use tar::Archive;
use walkdir::WalkDir;

use crate::error::{RepoError, Result};

/// Unpack a gzipped tarball into `dest`
pub fn extract_archive(data: &[u8], dest: &Path) -> Result<()> {
    let gz = GzDecoder::new(std::io::Cursor::new(data));
    let mut archive = Archive::new(gz);

    fs::create_dir_all(dest)?;
    archive.unpack(dest).map_err(|e| RepoError::Archive {
        message: format!("failed to unpack: {}", e),
    })?;

    Ok(())
}

/// Copy a directory tree; symlinks are skipped
pub fn copy_dir(src: &Path, dest: &Path) -> Result<()> {
    fs::create_dir_all(dest)?;

    for entry in WalkDir::new(src).min_depth(1) {
        let entry = entry?;
        let relative = entry
            .path()
            .strip_prefix(src)
            .map_err(|e| RepoError::Archive {
                message: e.to_string(),
            })?;
        let target = dest.join(relative);

        if entry.file_type().is_dir() {
            fs::create_dir_all(&target)?;
        } else if entry.file_type().is_file() {
            fs::copy(entry.path(), &target)?;
        }
    }

    Ok(())
}

/// The chart root inside an unpacked directory
///
/// Packaged charts carry a single top-level directory named after the chart.
/// When `dir` has no `Chart.yaml` and exactly one subdirectory, that
/// subdirectory is the root.
pub fn chart_root(dir: &Path) -> Result<PathBuf> {
    if dir.join("Chart.yaml").is_file() {
        return Ok(dir.to_path_buf());
    }

    let entries = fs::read_dir(dir)?.collect::<std::io::Result<Vec<_>>>()?;
    if let [only] = entries.as_slice() {
        if only.file_type()?.is_dir() {
            return Ok(only.path());
        }
    }

    Ok(dir.to_path_buf())
}
