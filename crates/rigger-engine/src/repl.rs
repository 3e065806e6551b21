//! `repl` expression syntax
//!
//! Value expressions may be written in the pipeline style operators already
//! know from Helm charts:
//!
//! ```text
//! {{repl ConfigOption "app_name" | Upper}}
//! ```
//!
//! Each `{{repl ...}}` block is rewritten into the equivalent MiniJinja call
//! (`{{ Upper(ConfigOption("app_name")) }}`) before rendering. A pipeline
//! passes the previous result as the last argument of the next call.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::{EngineError, Result};

static REPL_BLOCK: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\{\{repl\s+((?:[^}]|\}[^}])*)\}\}").expect("valid repl block regex")
});

/// Rewrite every `{{repl ...}}` block of `source` into MiniJinja syntax
pub fn translate(source: &str) -> Result<String> {
    let mut output = String::with_capacity(source.len());
    let mut last = 0;

    for captures in REPL_BLOCK.captures_iter(source) {
        let (Some(block), Some(body)) = (captures.get(0), captures.get(1)) else {
            continue;
        };
        output.push_str(&source[last..block.start()]);
        output.push_str("{{ ");
        output.push_str(&translate_pipeline(body.as_str())?);
        output.push_str(" }}");
        last = block.end();
    }

    output.push_str(&source[last..]);
    Ok(output)
}

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Ident(String),
    Str(String),
    Number(String),
    Pipe,
}

fn translate_pipeline(body: &str) -> Result<String> {
    let tokens = tokenize(body)?;
    let mut result: Option<String> = None;

    for segment in tokens.split(|t| *t == Token::Pipe) {
        let (function, args) = match segment.split_first() {
            Some((Token::Ident(name), args)) => (name, args),
            Some(_) => return Err(syntax(body, "expected a function name")),
            None => return Err(syntax(body, "empty pipeline segment")),
        };

        let mut rendered: Vec<String> = args.iter().map(render_arg).collect::<Result<_>>()?;
        if let Some(previous) = result.take() {
            rendered.push(previous);
        }
        result = Some(format!("{}({})", function, rendered.join(", ")));
    }

    result.ok_or_else(|| syntax(body, "empty expression"))
}

fn render_arg(token: &Token) -> Result<String> {
    match token {
        Token::Str(value) => serde_json::to_string(value).map_err(|e| EngineError::ReplSyntax {
            expression: value.clone(),
            message: e.to_string(),
        }),
        Token::Number(number) => Ok(number.clone()),
        Token::Ident(ident) if ident == "true" || ident == "false" => Ok(ident.clone()),
        Token::Ident(ident) => Ok(format!("{}()", ident)),
        Token::Pipe => Err(syntax("|", "unexpected pipe")),
    }
}

fn tokenize(body: &str) -> Result<Vec<Token>> {
    let mut tokens = Vec::new();
    let mut chars = body.chars().peekable();

    while let Some(&c) = chars.peek() {
        match c {
            c if c.is_whitespace() => {
                chars.next();
            }
            '|' => {
                chars.next();
                tokens.push(Token::Pipe);
            }
            '"' => {
                chars.next();
                let mut value = String::new();
                loop {
                    match chars.next() {
                        Some('"') => break,
                        Some('\\') => match chars.next() {
                            Some('n') => value.push('\n'),
                            Some('t') => value.push('\t'),
                            Some(escaped) => value.push(escaped),
                            None => return Err(syntax(body, "unterminated string")),
                        },
                        Some(other) => value.push(other),
                        None => return Err(syntax(body, "unterminated string")),
                    }
                }
                tokens.push(Token::Str(value));
            }
            '`' => {
                chars.next();
                let mut value = String::new();
                loop {
                    match chars.next() {
                        Some('`') => break,
                        Some(other) => value.push(other),
                        None => return Err(syntax(body, "unterminated raw string")),
                    }
                }
                tokens.push(Token::Str(value));
            }
            c if c.is_ascii_digit() || c == '-' => {
                let mut number = String::new();
                while let Some(&d) = chars.peek() {
                    if d.is_ascii_digit() || d == '.' || (d == '-' && number.is_empty()) {
                        number.push(d);
                        chars.next();
                    } else {
                        break;
                    }
                }
                if number == "-" {
                    return Err(syntax(body, "unexpected `-`"));
                }
                tokens.push(Token::Number(number));
            }
            c if c.is_alphabetic() || c == '_' => {
                let mut ident = String::new();
                while let Some(&d) = chars.peek() {
                    if d.is_alphanumeric() || d == '_' {
                        ident.push(d);
                        chars.next();
                    } else {
                        break;
                    }
                }
                tokens.push(Token::Ident(ident));
            }
            other => return Err(syntax(body, &format!("unexpected character `{}`", other))),
        }
    }

    Ok(tokens)
}

fn syntax(expression: &str, message: &str) -> EngineError {
    EngineError::ReplSyntax {
        expression: expression.trim().to_string(),
        message: message.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_translate_simple_call() {
        assert_eq!(
            translate(r#"{{repl ConfigOption "app_name"}}"#).unwrap(),
            r#"{{ ConfigOption("app_name") }}"#
        );
    }

    #[test]
    fn test_translate_keeps_surrounding_text() {
        assert_eq!(
            translate(r#"prefix-{{repl ConfigOption "a"}}-{{ plain }}"#).unwrap(),
            r#"prefix-{{ ConfigOption("a") }}-{{ plain }}"#
        );
    }

    #[test]
    fn test_translate_pipeline() {
        assert_eq!(
            translate(r#"{{repl ConfigOption "name" | Upper}}"#).unwrap(),
            r#"{{ Upper(ConfigOption("name")) }}"#
        );
        assert_eq!(
            translate(r#"{{repl Trim "--x--" "-" | Lower}}"#).unwrap(),
            r#"{{ Lower(Trim("--x--", "-")) }}"#
        );
    }

    #[test]
    fn test_translate_literals() {
        assert_eq!(
            translate("{{repl RandomString 32}}").unwrap(),
            "{{ RandomString(32) }}"
        );
        assert_eq!(
            translate("{{repl ConfigOptionEquals \"tls\" true}}").unwrap(),
            "{{ ConfigOptionEquals(\"tls\", true) }}"
        );
        assert_eq!(translate("{{repl Lower Now}}").unwrap(), "{{ Lower(Now()) }}");
    }

    #[test]
    fn test_translate_escapes_strings() {
        assert_eq!(
            translate(r#"{{repl Upper "say \"hi\""}}"#).unwrap(),
            r#"{{ Upper("say \"hi\"") }}"#
        );
        assert_eq!(
            translate("{{repl Upper `raw \\ text`}}").unwrap(),
            r#"{{ Upper("raw \\ text") }}"#
        );
    }

    #[test]
    fn test_translate_without_repl_is_identity() {
        let source = "plain {{ ConfigOption(\"x\") }} text";
        assert_eq!(translate(source).unwrap(), source);
    }

    #[test]
    fn test_translate_errors() {
        assert!(matches!(
            translate(r#"{{repl "no function"}}"#),
            Err(EngineError::ReplSyntax { .. })
        ));
        assert!(matches!(
            translate(r#"{{repl ConfigOption "open}}"#),
            Err(EngineError::ReplSyntax { .. })
        ));
        assert!(matches!(
            translate(r#"{{repl Upper | }}"#),
            Err(EngineError::ReplSyntax { .. })
        ));
    }
}
