//! The human at the keyboard.

use std::future::Future;

use scribe_shared::Result;

/// Notice shown when a yes/no answer is not recognised.
pub const INVALID_ANSWER: &str = "Invalid answer. Type 'y' or 'n'.";

/// Interactive seam between the orchestrator and whoever answers its questions.
pub trait Operator: Send {
    /// Ask a free-text question and return the raw answer line.
    fn ask(&mut self, prompt: &str) -> impl Future<Output = Result<String>> + Send;

    /// One-line status message.
    fn notice(&mut self, message: &str);

    /// A titled block of read-only output (e.g. review suggestions).
    fn show(&mut self, heading: &str, body: &str);

    /// Ask a yes/no question until the answer is recognised.
    fn confirm(&mut self, prompt: &str) -> impl Future<Output = Result<bool>> + Send {
        async move {
            let question = format!("{prompt} (y/n): ");
            loop {
                let answer = self.ask(&question).await?;
                match parse_yes_no(&answer) {
                    Some(yes) => return Ok(yes),
                    None => self.notice(INVALID_ANSWER),
                }
            }
        }
    }
}

/// `y`/`s` → yes, `n` → no, case-insensitive after trimming; anything else is `None`.
pub fn parse_yes_no(answer: &str) -> Option<bool> {
    match answer.trim().to_lowercase().as_str() {
        "y" | "s" => Some(true),
        "n" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::ScriptedOperator;

    #[test]
    fn yes_no_tokens() {
        assert_eq!(parse_yes_no("s"), Some(true));
        assert_eq!(parse_yes_no(" Y \n"), Some(true));
        assert_eq!(parse_yes_no("N"), Some(false));
        assert_eq!(parse_yes_no("yes"), None);
        assert_eq!(parse_yes_no(""), None);
        assert_eq!(parse_yes_no("maybe"), None);
    }

    #[tokio::test]
    async fn confirm_reprompts_until_valid() {
        let mut operator = ScriptedOperator::new(["", "sure", "N"]);

        let answer = operator.confirm("Continue?").await.unwrap();

        assert!(!answer);
        assert_eq!(operator.questions.len(), 3);
        assert_eq!(operator.questions[0], "Continue? (y/n): ");
        assert_eq!(operator.notices, [INVALID_ANSWER, INVALID_ANSWER]);
    }

    #[tokio::test]
    async fn confirm_propagates_closed_input() {
        let mut operator = ScriptedOperator::new(["what"]);
        assert!(operator.confirm("Continue?").await.is_err());
    }
}
