//! Content fingerprints for resolved charts
//!
//! A chart's fingerprint is a SHA256 over the sorted list of
//! `relative/path:sha256(contents)` lines of every file under the chart root,
//! so it changes when any file is added, removed, renamed or edited.

use sha2::{Digest, Sha256};
use std::io::{BufReader, Read};
use std::path::Path;

use crate::error::{CoreError, Result};

/// Compute the content fingerprint of a directory tree
pub fn digest_dir(root: &Path) -> Result<String> {
    let mut entries = Vec::new();

    for entry in walkdir::WalkDir::new(root).sort_by_file_name() {
        let entry = entry.map_err(|e| CoreError::Walk {
            path: root.display().to_string(),
            message: e.to_string(),
        })?;
        if !entry.file_type().is_file() {
            continue;
        }

        let rel_path = entry
            .path()
            .strip_prefix(root)
            .unwrap_or(entry.path())
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/");
        entries.push((rel_path, hash_file(entry.path())?));
    }

    entries.sort();

    let mut hasher = Sha256::new();
    for (path, sha256) in &entries {
        hasher.update(path.as_bytes());
        hasher.update(b":");
        hasher.update(sha256.as_bytes());
        hasher.update(b"\n");
    }
    Ok(hex::encode(hasher.finalize()))
}

/// Calculate SHA256 hash of bytes
pub fn hash_bytes(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hex::encode(hasher.finalize())
}

fn hash_file(path: &Path) -> Result<String> {
    let file = std::fs::File::open(path)?;
    let mut reader = BufReader::new(file);
    let mut hasher = Sha256::new();
    let mut buffer = [0u8; 8192];

    loop {
        let bytes_read = reader.read(&mut buffer)?;
        if bytes_read == 0 {
            break;
        }
        hasher.update(&buffer[..bytes_read]);
    }

    Ok(hex::encode(hasher.finalize()))
}
