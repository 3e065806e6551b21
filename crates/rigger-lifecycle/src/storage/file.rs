//! File-based state store
//!
//! Stores the state record as JSON at a fixed path inside the workspace.

use async_trait::async_trait;
use rigger_core::{State, StateFile};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use super::{LoadedState, StateStore};
use crate::error::{LifecycleError, Result};

/// File-based state store
pub struct FileStateStore {
    path: PathBuf,
}

impl FileStateStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load, apply `update`, write back
    ///
    /// An unreadable record is replaced rather than merged.
    async fn modify(&self, update: impl FnOnce(&mut State)) -> Result<()> {
        let mut state = match self.try_load().await {
            LoadedState::Present(state) => state,
            LoadedState::Empty => State::default(),
            LoadedState::Unreadable(message) => {
                tracing::warn!(
                    path = %self.path.display(),
                    "Replacing unreadable state file: {}",
                    message
                );
                State::default()
            }
        };
        update(&mut state);

        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| LifecycleError::io(format!("create {}", parent.display()), e))?;
        }

        let json = serde_json::to_string_pretty(&StateFile { v1: state })?;
        tokio::fs::write(&self.path, json)
            .await
            .map_err(|e| LifecycleError::io(format!("write {}", self.path.display()), e))
    }
}

#[async_trait]
impl StateStore for FileStateStore {
    async fn try_load(&self) -> LoadedState {
        let content = match tokio::fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return LoadedState::Empty,
            Err(e) => return LoadedState::Unreadable(e.to_string()),
        };

        match serde_json::from_str::<StateFile>(&content) {
            Ok(file) => LoadedState::Present(file.v1),
            Err(e) => LoadedState::Unreadable(e.to_string()),
        }
    }

    async fn serialize_chart_url(&self, url: &str) -> Result<()> {
        tracing::debug!(path = %self.path.display(), chart_url = url, "serialize chart url");
        self.modify(|state| state.set_chart_url(url)).await
    }

    async fn serialize_content_sha(&self, sha: &str) -> Result<()> {
        tracing::debug!(path = %self.path.display(), content_sha = sha, "serialize content sha");
        self.modify(|state| state.set_content_sha(sha)).await
    }

    async fn remove_state_file(&self) -> Result<()> {
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(LifecycleError::io(
                format!("remove {}", self.path.display()),
                e,
            )),
        }
    }

    fn location(&self) -> String {
        self.path.display().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn store(dir: &TempDir) -> FileStateStore {
        FileStateStore::new(dir.path().join(".rigger/state.json"))
    }

    #[tokio::test]
    async fn test_missing_file_is_empty() {
        let dir = TempDir::new().unwrap();
        assert_eq!(store(&dir).try_load().await, LoadedState::Empty);
    }

    #[tokio::test]
    async fn test_serialize_creates_and_merges() {
        let dir = TempDir::new().unwrap();
        let store = store(&dir);

        store.serialize_chart_url("https://example.com/a.tgz").await.unwrap();
        store.serialize_content_sha("sha-a").await.unwrap();

        let state = store.try_load().await.into_state().unwrap();
        assert_eq!(state.current_chart_url(), Some("https://example.com/a.tgz"));
        assert_eq!(state.current_sha(), Some("sha-a"));
    }

    #[tokio::test]
    async fn test_serialize_keeps_operator_fields() {
        let dir = TempDir::new().unwrap();
        let store = store(&dir);
        std::fs::create_dir_all(dir.path().join(".rigger")).unwrap();
        std::fs::write(
            store.path(),
            r#"{"v1":{"chartURL":"./chart","contentSHA":"old","config":{"app_name":"demo"}}}"#,
        )
        .unwrap();

        store.serialize_content_sha("new").await.unwrap();

        let state = store.try_load().await.into_state().unwrap();
        assert_eq!(state.current_sha(), Some("new"));
        assert_eq!(state.config["app_name"], "demo");
    }

    #[tokio::test]
    async fn test_garbage_is_unreadable() {
        let dir = TempDir::new().unwrap();
        let store = store(&dir);
        std::fs::create_dir_all(dir.path().join(".rigger")).unwrap();
        std::fs::write(store.path(), "{not json").unwrap();

        assert!(matches!(store.try_load().await, LoadedState::Unreadable(_)));

        store.serialize_chart_url("./chart").await.unwrap();
        let state = store.try_load().await.into_state().unwrap();
        assert_eq!(state.current_chart_url(), Some("./chart"));
    }

    #[tokio::test]
    async fn test_remove_state_file() {
        let dir = TempDir::new().unwrap();
        let store = store(&dir);

        store.remove_state_file().await.unwrap();
        store.serialize_chart_url("./chart").await.unwrap();
        store.remove_state_file().await.unwrap();

        assert!(store.try_load().await.is_empty());
        assert!(store.location().ends_with("state.json"));
    }
}
