//! State storage
//!
//! The workspace state is a single small record, so a store only needs to load
//! it, update one field at a time and remove it:
//! - **File**: JSON on local disk (the default)
//! - **Memory**: in-process, for tests
//!
//! Loading never fails outright. A missing record and an unreadable one are
//! distinct outcomes so callers decide how strict to be.

mod file;
mod mock;

pub use file::FileStateStore;
pub use mock::{MemoryStateStore, OperationCounts};

use async_trait::async_trait;
use rigger_core::State;

use crate::error::Result;

/// Outcome of loading the state record
#[derive(Debug, Clone, PartialEq)]
pub enum LoadedState {
    /// No record exists yet
    Empty,
    /// A record was loaded
    Present(State),
    /// A record exists but could not be read or parsed
    Unreadable(String),
}

impl LoadedState {
    pub fn is_empty(&self) -> bool {
        matches!(self, LoadedState::Empty)
    }

    /// The loaded record, if any
    pub fn into_state(self) -> Option<State> {
        match self {
            LoadedState::Present(state) => Some(state),
            _ => None,
        }
    }
}

/// Durable backing of the workspace state
///
/// Implementations must be Send + Sync for use across async tasks.
#[async_trait]
pub trait StateStore: Send + Sync {
    /// Load the current record
    async fn try_load(&self) -> LoadedState;

    /// Record the chart reference, creating the record if needed
    async fn serialize_chart_url(&self, url: &str) -> Result<()>;

    /// Record the content fingerprint, creating the record if needed
    async fn serialize_content_sha(&self, sha: &str) -> Result<()>;

    /// Remove the record; removing a missing record succeeds
    async fn remove_state_file(&self) -> Result<()>;

    /// Human readable location, used in messages
    fn location(&self) -> String;
}
