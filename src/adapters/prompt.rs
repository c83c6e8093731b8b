use crate::domain::ports::Confirmation;
use async_trait::async_trait;
use std::io::{BufRead, Write};

/// Answers every prompt the same way.
#[derive(Debug, Clone, Copy)]
pub struct AutoConfirm(pub bool);

#[async_trait]
impl Confirmation for AutoConfirm {
    async fn confirm(&self, prompt: &str) -> bool {
        tracing::debug!("Auto-answering '{}' with {}", prompt, self.0);
        self.0
    }
}

/// Asks on stderr and reads a `y/N` answer from stdin.
#[derive(Debug, Clone, Copy, Default)]
pub struct TerminalConfirm;

#[async_trait]
impl Confirmation for TerminalConfirm {
    async fn confirm(&self, prompt: &str) -> bool {
        let prompt = prompt.to_string();
        let answer = tokio::task::spawn_blocking(move || {
            let mut stderr = std::io::stderr();
            write!(stderr, "{} [y/N] ", prompt)?;
            stderr.flush()?;

            let mut line = String::new();
            std::io::stdin().lock().read_line(&mut line)?;
            Ok::<_, std::io::Error>(line)
        })
        .await;

        match answer {
            Ok(Ok(line)) => is_affirmative(&line),
            Ok(Err(e)) => {
                tracing::warn!("Could not read confirmation answer: {}", e);
                false
            }
            Err(e) => {
                tracing::warn!("Confirmation prompt task failed: {}", e);
                false
            }
        }
    }
}

fn is_affirmative(answer: &str) -> bool {
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auto_confirm() {
        assert!(tokio_test::block_on(AutoConfirm(true).confirm("Cancel?")));
        assert!(!tokio_test::block_on(AutoConfirm(false).confirm("Cancel?")));
    }

    #[test]
    fn test_affirmative_answers() {
        assert!(is_affirmative("y\n"));
        assert!(is_affirmative(" YES "));
        assert!(!is_affirmative("\n"));
        assert!(!is_affirmative("no"));
    }
}
