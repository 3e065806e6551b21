//! CLI error types with exit code handling
//!
//! Library errors are mapped onto a small set of diagnostics, each carrying
//! the exit code the process ends with.

use miette::Diagnostic;
use rigger_engine::{EngineError, TemplateError};
use rigger_lifecycle::LifecycleError;
use rigger_repo::RepoError;
use thiserror::Error;

use crate::exit_codes;

/// CLI-specific error type that includes exit code information
#[derive(Error, Debug, Diagnostic)]
pub enum CliError {
    /// The workspace already has state and the operator kept it
    #[error("State file already exists")]
    #[diagnostic(
        code(rigger::cli::should_use_update),
        help("Run `rigger update` to refresh the existing workspace")
    )]
    ShouldUseUpdate,

    /// `rigger init` has to run first
    #[error("{message}")]
    #[diagnostic(code(rigger::cli::not_initialized))]
    MissingPrerequisite {
        message: String,
        #[help]
        help: Option<String>,
    },

    /// The chart reference could not be resolved
    #[error("{message}")]
    #[diagnostic(code(rigger::cli::resolve))]
    Resolution {
        message: String,
        #[help]
        help: Option<String>,
    },

    /// A value expression failed to render
    #[error(transparent)]
    #[diagnostic(transparent)]
    Expression(TemplateError),

    /// Rendering or overlaying failed
    #[error("Render failed: {message}")]
    #[diagnostic(code(rigger::cli::render))]
    Render {
        message: String,
        #[help]
        help: Option<String>,
    },

    /// IO error (file not found, permissions, etc.)
    #[error("IO error: {message}")]
    #[diagnostic(code(rigger::cli::io))]
    Io { message: String },

    /// Invalid settings
    #[error("{message}")]
    #[diagnostic(code(rigger::cli::usage))]
    Usage { message: String },

    /// Wrapped error for passthrough (stores the formatted message)
    #[error("{message}")]
    #[diagnostic(code(rigger::cli::error))]
    Other { message: String },
}

impl CliError {
    /// Get the exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::ShouldUseUpdate => exit_codes::SHOULD_USE_UPDATE,
            CliError::MissingPrerequisite { .. } => exit_codes::MISSING_PREREQUISITE,
            CliError::Resolution { .. } => exit_codes::RESOLUTION_ERROR,
            CliError::Expression(_) | CliError::Render { .. } => exit_codes::RENDER_ERROR,
            CliError::Io { .. } => exit_codes::IO_ERROR,
            CliError::Usage { .. } => exit_codes::USAGE_ERROR,
            CliError::Other { .. } => exit_codes::ERROR,
        }
    }

    /// Create a usage error
    pub fn usage(message: impl Into<String>) -> Self {
        Self::Usage {
            message: message.into(),
        }
    }

    /// Create a render error
    pub fn render(message: impl Into<String>) -> Self {
        Self::Render {
            message: message.into(),
            help: None,
        }
    }
}

impl From<LifecycleError> for CliError {
    fn from(err: LifecycleError) -> Self {
        match err {
            LifecycleError::ShouldUseUpdate => CliError::ShouldUseUpdate,
            LifecycleError::StateUnreadable { .. } => CliError::MissingPrerequisite {
                message: err.to_string(),
                help: None,
            },
            ref e if e.is_missing_prerequisite() => CliError::MissingPrerequisite {
                message: err.to_string(),
                help: Some("Run `rigger init --chart <reference>` to initialize this workspace".to_string()),
            },
            LifecycleError::Resolve { ref source, .. } => CliError::Resolution {
                help: resolution_help(source),
                message: err.to_string(),
            },
            LifecycleError::Value(EngineError::Template(template)) => CliError::Expression(template),
            LifecycleError::Value(other) => CliError::render(other.to_string()),
            LifecycleError::Process { ref command, .. } => CliError::Render {
                help: Some(format!("Re-run with --debug to see how `{}` was invoked", command)),
                message: err.to_string(),
            },
            LifecycleError::Io { .. } => CliError::Io {
                message: err.to_string(),
            },
            other => CliError::Other {
                message: other.to_string(),
            },
        }
    }
}

impl From<RepoError> for CliError {
    fn from(err: RepoError) -> Self {
        CliError::Resolution {
            help: resolution_help(&err),
            message: err.to_string(),
        }
    }
}

impl From<std::io::Error> for CliError {
    fn from(err: std::io::Error) -> Self {
        CliError::Io {
            message: err.to_string(),
        }
    }
}

fn resolution_help(err: &RepoError) -> Option<String> {
    match err {
        RepoError::InvalidReference { .. } => Some(
            "A chart reference is an http(s) URL to a .tgz, a local .tgz/.tar.gz archive or a chart directory"
                .to_string(),
        ),
        RepoError::HttpError { status: 404, .. } => {
            Some("Check that the chart URL is correct".to_string())
        }
        RepoError::NetworkError { .. } | RepoError::Timeout { .. } => {
            Some("Check your network connection and retry".to_string())
        }
        RepoError::Chart(_) => Some("A chart needs a Chart.yaml with at least a name".to_string()),
        _ => None,
    }
}

/// Result type for CLI operations
pub type Result<T> = std::result::Result<T, CliError>;
