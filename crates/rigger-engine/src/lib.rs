//! Rigger Engine - value expressions for helm `--set` arguments
//!
//! This crate provides a MiniJinja-based value builder with:
//! - A static context of helper functions (`Now`, `Base64Encode`, `Sha256`, ...)
//! - A config context resolved from configuration groups and operator values
//! - Support for the `{{repl Function "arg" | Other}}` pipeline syntax
//! - Human-readable errors with suggestions for mistyped functions

pub mod builder;
pub mod error;
pub mod functions;
pub mod repl;
pub mod suggestions;

pub use builder::{ConfigContext, TemplateContext, ValueBuilder, literal_to_string};
pub use error::{EngineError, Result, TemplateError, TemplateErrorKind};
pub use suggestions::AVAILABLE_FUNCTIONS;
