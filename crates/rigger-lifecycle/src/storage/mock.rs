//! In-memory state store for testing

use async_trait::async_trait;
use rigger_core::State;
use std::sync::{Arc, RwLock};

use super::{LoadedState, StateStore};
use crate::error::Result;

/// In-memory state store
#[derive(Clone)]
pub struct MemoryStateStore {
    state: Arc<RwLock<LoadedState>>,
    operations: Arc<RwLock<OperationCounts>>,
}

/// Counts of operations performed, for test assertions
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct OperationCounts {
    pub loads: usize,
    pub chart_url_writes: usize,
    pub sha_writes: usize,
    pub removals: usize,
}

impl MemoryStateStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::with_loaded(LoadedState::Empty)
    }

    /// Create with an existing record
    pub fn with_state(state: State) -> Self {
        Self::with_loaded(LoadedState::Present(state))
    }

    /// Create with a record that fails to load
    pub fn unreadable(message: impl Into<String>) -> Self {
        Self::with_loaded(LoadedState::Unreadable(message.into()))
    }

    fn with_loaded(loaded: LoadedState) -> Self {
        Self {
            state: Arc::new(RwLock::new(loaded)),
            operations: Arc::new(RwLock::new(OperationCounts::default())),
        }
    }

    /// Current record, if present
    pub fn state(&self) -> Option<State> {
        self.state.read().unwrap().clone().into_state()
    }

    /// Get operation counts for assertions
    pub fn operation_counts(&self) -> OperationCounts {
        self.operations.read().unwrap().clone()
    }

    fn modify(&self, update: impl FnOnce(&mut State)) {
        let mut loaded = self.state.write().unwrap();
        let mut state = loaded.clone().into_state().unwrap_or_default();
        update(&mut state);
        *loaded = LoadedState::Present(state);
    }
}

impl Default for MemoryStateStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl StateStore for MemoryStateStore {
    async fn try_load(&self) -> LoadedState {
        self.operations.write().unwrap().loads += 1;
        self.state.read().unwrap().clone()
    }

    async fn serialize_chart_url(&self, url: &str) -> Result<()> {
        self.operations.write().unwrap().chart_url_writes += 1;
        self.modify(|state| state.set_chart_url(url));
        Ok(())
    }

    async fn serialize_content_sha(&self, sha: &str) -> Result<()> {
        self.operations.write().unwrap().sha_writes += 1;
        self.modify(|state| state.set_content_sha(sha));
        Ok(())
    }

    async fn remove_state_file(&self) -> Result<()> {
        self.operations.write().unwrap().removals += 1;
        *self.state.write().unwrap() = LoadedState::Empty;
        Ok(())
    }

    fn location(&self) -> String {
        "memory://state".to_string()
    }
}
