//! Value builder
//!
//! Turns configuration groups plus the operator's template context into a
//! MiniJinja environment, then renders value expressions against it.

use minijinja::value::ValueKind;
use minijinja::{Environment, Error, ErrorKind, UndefinedBehavior};
use rigger_core::ConfigGroup;
use std::collections::BTreeMap;
use std::fmt::Write as _;
use std::sync::Arc;

use crate::error::{EngineError, Result, TemplateError};
use crate::functions;
use crate::repl;

/// Free-form operator configuration, keyed by option name
pub type TemplateContext = BTreeMap<String, serde_json::Value>;

/// Resolved configuration option values
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigContext {
    options: BTreeMap<String, String>,
}

impl ConfigContext {
    /// Resolve every option of `groups`
    ///
    /// Precedence: operator supplied value, then the item's `value`, then its
    /// `default`. Item values and defaults are rendered against the static
    /// context. Operator keys with no matching item are kept as-is.
    pub fn new(groups: &[ConfigGroup], template_context: &TemplateContext) -> Result<Self> {
        let env = static_environment();
        let mut options: BTreeMap<String, String> = template_context
            .iter()
            .map(|(key, value)| (key.clone(), literal_to_string(value)))
            .collect();

        for item in groups.iter().flat_map(|group| &group.items) {
            if options.contains_key(&item.name) {
                continue;
            }

            let preset = item
                .value
                .as_deref()
                .filter(|v| !v.is_empty())
                .or(item.default.as_deref());

            let resolved = match preset {
                Some(expression) => render_with(&env, expression).map_err(|e| {
                    EngineError::ConfigOption {
                        name: item.name.clone(),
                        message: match e {
                            EngineError::Template(te) => te.message,
                            other => other.to_string(),
                        },
                    }
                })?,
                None => String::new(),
            };
            options.insert(item.name.clone(), resolved);
        }

        Ok(Self { options })
    }

    /// Value of an option, empty when unknown
    pub fn get(&self, name: &str) -> &str {
        self.options.get(name).map(String::as_str).unwrap_or_default()
    }
}

/// Renders value expressions against the static and config contexts
pub struct ValueBuilder {
    env: Environment<'static>,
}

impl ValueBuilder {
    /// Build from configuration groups and the operator's template context
    pub fn new(groups: &[ConfigGroup], template_context: &TemplateContext) -> Result<Self> {
        let config = ConfigContext::new(groups, template_context)?;
        Ok(Self::with_config(config))
    }

    /// Build from an already resolved config context
    pub fn with_config(config: ConfigContext) -> Self {
        let mut env = static_environment();
        let config = Arc::new(config);

        let ctx = Arc::clone(&config);
        env.add_function("ConfigOption", move |name: String| -> String {
            ctx.get(&name).to_string()
        });

        let ctx = Arc::clone(&config);
        env.add_function(
            "ConfigOptionEquals",
            move |name: String, expected: minijinja::Value| -> bool {
                ctx.get(&name) == value_to_plain_string(&expected)
            },
        );

        let ctx = Arc::clone(&config);
        env.add_function(
            "ConfigOptionNotEquals",
            move |name: String, expected: minijinja::Value| -> bool {
                ctx.get(&name) != value_to_plain_string(&expected)
            },
        );

        let ctx = Arc::clone(&config);
        env.add_function(
            "ConfigOptionData",
            move |name: String| -> std::result::Result<String, Error> {
                functions::base64_decode(ctx.get(&name).to_string()).map_err(|e| {
                    Error::new(
                        ErrorKind::InvalidOperation,
                        format!("config option {} is not base64 data: {}", name, e),
                    )
                })
            },
        );

        Self { env }
    }

    /// Render a single value expression
    pub fn render_str(&self, expression: &str) -> Result<String> {
        render_with(&self.env, expression)
    }
}

/// Render a JSON literal the way it is passed on a command line
///
/// Scalars print bare, arrays of scalars use the `{a,b}` list syntax, anything
/// else is JSON encoded.
pub fn literal_to_string(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.clone(),
        serde_json::Value::Null => "null".to_string(),
        serde_json::Value::Bool(b) => b.to_string(),
        serde_json::Value::Number(n) => n.to_string(),
        serde_json::Value::Array(items) if items.iter().all(is_scalar) => format!(
            "{{{}}}",
            items.iter().map(literal_to_string).collect::<Vec<_>>().join(",")
        ),
        other => other.to_string(),
    }
}

fn is_scalar(value: &serde_json::Value) -> bool {
    !matches!(
        value,
        serde_json::Value::Array(_) | serde_json::Value::Object(_)
    )
}

fn value_to_plain_string(value: &minijinja::Value) -> String {
    match value.as_str() {
        Some(s) => s.to_string(),
        None => value.to_string(),
    }
}

fn static_environment() -> Environment<'static> {
    let mut env = Environment::new();
    env.set_undefined_behavior(UndefinedBehavior::Strict);
    env.set_keep_trailing_newline(true);
    env.set_formatter(|out, state, value| {
        // helm only reads lowercase booleans
        if value.kind() == ValueKind::Bool {
            out.write_str(if value.is_true() { "true" } else { "false" })?;
            return Ok(());
        }
        minijinja::escape_formatter(out, state, value)
    });

    env.add_function("Now", functions::now);
    env.add_function("NowFmt", functions::now_fmt);
    env.add_function("TrimSpace", functions::trim_space);
    env.add_function("Trim", functions::trim);
    env.add_function("Lower", functions::lower);
    env.add_function("Upper", functions::upper);
    env.add_function("Base64Encode", functions::base64_encode);
    env.add_function("Base64Decode", functions::base64_decode);
    env.add_function("Sha256", functions::sha256);
    env.add_function("RandomString", functions::random_string);

    env
}

fn render_with(env: &Environment<'static>, expression: &str) -> Result<String> {
    if !expression.contains("{{") && !expression.contains("{%") {
        return Ok(expression.to_string());
    }

    let translated = repl::translate(expression)?;
    env.render_str(&translated, ())
        .map_err(|e| EngineError::Template(TemplateError::from_minijinja(e, expression)))
}
