//! Yes/no confirmation strategies.

use async_trait::async_trait;
use std::io::{self, BufRead, Write};

/// Asks the user to confirm an action.
#[async_trait]
pub trait Confirm: Send + Sync {
    async fn confirm(&self, message: &str) -> io::Result<bool>;
}

/// Prompts on the terminal; anything but `y`/`yes` is a refusal.
///
/// The blocking stdin read runs on tokio's blocking pool.
#[derive(Debug, Default, Clone, Copy)]
pub struct TerminalConfirm;

#[async_trait]
impl Confirm for TerminalConfirm {
    async fn confirm(&self, message: &str) -> io::Result<bool> {
        let message = message.to_string();
        tokio::task::spawn_blocking(move || {
            ask(&message, io::stdin().lock(), &mut io::stdout())
        })
        .await
        .map_err(io::Error::other)?
    }
}

/// Write the question to `output` and read one answer line from `input`.
pub fn ask(message: &str, mut input: impl BufRead, output: &mut impl Write) -> io::Result<bool> {
    write!(output, "{} (y/N): ", message)?;
    output.flush()?;

    let mut answer = String::new();
    input.read_line(&mut answer)?;
    Ok(is_yes(&answer))
}

/// Answers every prompt the same way (`--yes`, tests).
#[derive(Debug, Clone, Copy)]
pub struct AutoConfirm(pub bool);

impl AutoConfirm {
    pub fn yes() -> Self {
        Self(true)
    }

    pub fn no() -> Self {
        Self(false)
    }
}

#[async_trait]
impl Confirm for AutoConfirm {
    async fn confirm(&self, message: &str) -> io::Result<bool> {
        tracing::debug!(message, answer = self.0, "Auto-answered prompt");
        Ok(self.0)
    }
}

fn is_yes(input: &str) -> bool {
    matches!(input.trim().to_lowercase().as_str(), "y" | "yes")
}
