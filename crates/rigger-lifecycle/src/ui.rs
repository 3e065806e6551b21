//! Operator interaction

use async_trait::async_trait;
use console::{Term, style};

use crate::error::{LifecycleError, Result};

/// How the lifecycle talks to the operator
#[async_trait]
pub trait Ui: Send + Sync {
    /// Show `prompt` and return the raw answer line
    async fn ask(&self, prompt: &str) -> Result<String>;

    /// Show informational output
    fn info(&self, message: &str);

    /// Show a warning
    fn warn(&self, message: &str);
}

/// Terminal UI on stdout/stdin
#[derive(Debug, Clone, Default)]
pub struct ConsoleUi;

impl ConsoleUi {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Ui for ConsoleUi {
    async fn ask(&self, prompt: &str) -> Result<String> {
        let prompt = prompt.to_string();
        tokio::task::spawn_blocking(move || {
            let term = Term::stdout();
            term.write_str(&prompt)?;
            if term.is_term() {
                return term.read_line();
            }
            // piped input
            let mut answer = String::new();
            std::io::stdin().read_line(&mut answer)?;
            Ok(answer)
        })
        .await
        .map_err(|e| LifecycleError::Prompt(e.to_string()))?
        .map_err(|e| LifecycleError::Prompt(e.to_string()))
    }

    fn info(&self, message: &str) {
        println!("{}", message);
    }

    fn warn(&self, message: &str) {
        eprintln!("{} {}", style("⚠").yellow().bold(), message);
    }
}
