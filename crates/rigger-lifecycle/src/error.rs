//! Error types for rigger-lifecycle

use rigger_core::CoreError;
use rigger_engine::EngineError;
use rigger_repo::RepoError;
use thiserror::Error;

/// Result type for rigger-lifecycle operations
pub type Result<T> = std::result::Result<T, LifecycleError>;

/// Errors that can occur while running a release lifecycle
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum LifecycleError {
    /// No state file, the workspace was never initialized
    #[error("No state file found at {path}, please run \"rigger init\"")]
    StateMissing { path: String },

    /// State exists but records no chart reference
    #[error("No current chart url found at {path}, please run \"rigger init\"")]
    ChartUrlMissing { path: String },

    /// State exists but records no content fingerprint
    #[error("No current SHA found at {path}, please run \"rigger init\"")]
    ContentShaMissing { path: String },

    /// State file present but not loadable
    #[error("state file at {path} could not be read: {message}\nHint: fix or remove it, then run `rigger init`")]
    StateUnreadable { path: String, message: String },

    /// The operator declined to start over an existing workspace
    #[error("state file already exists, use `rigger update` to refresh the workspace")]
    ShouldUseUpdate,

    /// The chart reference could not be resolved
    #[error("resolve chart metadata for {reference}: {source}")]
    Resolve {
        reference: String,
        #[source]
        source: RepoError,
    },

    /// An external tool exited unsuccessfully
    #[error("execute {command}: {status}: stdout: {stdout:?}; stderr: {stderr:?};")]
    Process {
        command: String,
        status: String,
        stdout: String,
        stderr: String,
    },

    /// IO error with the operation that failed
    #[error("{context}: {source}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    /// A value expression failed to render
    #[error("value error: {0}")]
    Value(#[from] EngineError),

    /// Chart content error
    #[error("chart error: {0}")]
    Chart(#[from] CoreError),

    /// Serialization error
    #[error("serialization error: {0}")]
    Serialization(String),

    /// Reading the operator's answer failed
    #[error("prompt failed: {0}")]
    Prompt(String),
}

impl From<serde_json::Error> for LifecycleError {
    fn from(e: serde_json::Error) -> Self {
        LifecycleError::Serialization(e.to_string())
    }
}

impl From<serde_yaml::Error> for LifecycleError {
    fn from(e: serde_yaml::Error) -> Self {
        LifecycleError::Serialization(e.to_string())
    }
}

impl LifecycleError {
    /// Attach the failed operation to an IO error
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        LifecycleError::Io {
            context: context.into(),
            source,
        }
    }

    /// Whether this error means `rigger init` must run first
    pub fn is_missing_prerequisite(&self) -> bool {
        matches!(
            self,
            LifecycleError::StateMissing { .. }
                | LifecycleError::ChartUrlMissing { .. }
                | LifecycleError::ContentShaMissing { .. }
                | LifecycleError::StateUnreadable { .. }
        )
    }
}
