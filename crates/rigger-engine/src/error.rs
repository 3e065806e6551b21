//! Engine error types

use miette::Diagnostic;
use thiserror::Error;

use crate::suggestions::suggest_unknown_function;

/// Main engine error type
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Template error")]
    Template(#[from] TemplateError),

    #[error("Invalid repl expression `{expression}`: {message}")]
    ReplSyntax { expression: String, message: String },

    #[error("Failed to resolve config option `{name}`: {message}")]
    ConfigOption { name: String, message: String },
}

pub type Result<T> = std::result::Result<T, EngineError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum TemplateErrorKind {
    UnknownFunction,
    UndefinedValue,
    Syntax,
    Other,
}

/// A value expression failed to render
#[derive(Error, Debug, Diagnostic, Clone)]
#[error("Failed to render `{expression}`: {message}")]
#[diagnostic(code(rigger::engine::render))]
pub struct TemplateError {
    pub message: String,
    pub kind: TemplateErrorKind,
    pub expression: String,
    #[help]
    pub suggestion: Option<String>,
}

impl TemplateError {
    pub fn from_minijinja(err: minijinja::Error, expression: &str) -> Self {
        let kind = match err.kind() {
            minijinja::ErrorKind::UnknownFunction => TemplateErrorKind::UnknownFunction,
            minijinja::ErrorKind::UndefinedError => TemplateErrorKind::UndefinedValue,
            minijinja::ErrorKind::SyntaxError => TemplateErrorKind::Syntax,
            _ => TemplateErrorKind::Other,
        };
        let message = err
            .detail()
            .map(str::to_string)
            .unwrap_or_else(|| err.kind().to_string());

        let suggestion = match kind {
            TemplateErrorKind::UnknownFunction => {
                unknown_function_name(&message).and_then(suggest_unknown_function)
            }
            TemplateErrorKind::UndefinedValue => Some(
                "Values are looked up with functions, e.g. `{{repl ConfigOption \"name\"}}`"
                    .to_string(),
            ),
            _ => None,
        };

        Self {
            message,
            kind,
            expression: expression.to_string(),
            suggestion,
        }
    }

    pub fn kind(&self) -> TemplateErrorKind {
        self.kind
    }
}

/// `Foo` out of "Foo is unknown"
fn unknown_function_name(detail: &str) -> Option<&str> {
    detail
        .split_whitespace()
        .next()
        .filter(|name| name.chars().all(|c| c.is_alphanumeric() || c == '_'))
}
