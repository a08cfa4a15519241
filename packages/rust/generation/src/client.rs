//! Resilient generation calls.
//!
//! [`GenerationClient::generate`] never fails: quota errors are retried with
//! backoff, anything else (or an exhausted retry budget) becomes an inline
//! error marker that the caller appends to the document like any other text.

use std::time::Duration;

use scribe_shared::GenerationConfig;
use tracing::{debug, error, info, instrument, warn};

use crate::error::GenerateError;
use crate::persona::Persona;
use crate::TextGenerator;

/// Marker returned once every attempt failed on quota.
pub const QUOTA_EXHAUSTED_MARKER: &str =
    "[CRITICAL ERROR: every attempt to call the generation API failed due to quota errors.]";

/// Inline marker for a non-retryable failure.
pub fn failure_marker(detail: &str) -> String {
    format!("\n\n[ERROR: {detail}]\n\n")
}

// ---------------------------------------------------------------------------
// Retry policy
// ---------------------------------------------------------------------------

/// Retry and pacing constants for generation calls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Attempts per call (at least one is always made).
    pub max_retries: u32,
    /// Base of the exponential backoff.
    pub backoff_base: Duration,
    /// Pause after every successful call.
    pub rate_limit_pause: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::from(&GenerationConfig::default())
    }
}

impl From<&GenerationConfig> for RetryPolicy {
    fn from(config: &GenerationConfig) -> Self {
        Self {
            max_retries: config.max_retries,
            backoff_base: Duration::from_secs(config.backoff_base_secs),
            rate_limit_pause: Duration::from_secs(config.rate_limit_pause_secs),
        }
    }
}

impl RetryPolicy {
    /// Wait before the next attempt after a quota failure on `attempt` (0-indexed).
    ///
    /// A provider hint of `W` seconds waits `W + 1`; otherwise `base * 2^attempt`.
    pub fn quota_wait(&self, attempt: u32, retry_after: Option<u64>) -> Duration {
        match retry_after {
            Some(secs) => Duration::from_secs(secs.saturating_add(1)),
            None => {
                let factor = 1u32.checked_shl(attempt).unwrap_or(u32::MAX);
                self.backoff_base.saturating_mul(factor)
            }
        }
    }

    fn attempts(&self) -> u32 {
        self.max_retries.max(1)
    }
}

// ---------------------------------------------------------------------------
// Outcome
// ---------------------------------------------------------------------------

/// Result of one `generate` call. Both variants are valid document text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenerationOutcome {
    /// Generated text, trimmed.
    Success(String),
    /// An inline error marker standing in for the text.
    Degraded(String),
}

impl GenerationOutcome {
    pub fn text(&self) -> &str {
        match self {
            Self::Success(text) | Self::Degraded(text) => text,
        }
    }

    pub fn into_text(self) -> String {
        match self {
            Self::Success(text) | Self::Degraded(text) => text,
        }
    }

    pub fn is_degraded(&self) -> bool {
        matches!(self, Self::Degraded(_))
    }
}

// ---------------------------------------------------------------------------
// Client
// ---------------------------------------------------------------------------

/// Persona-aware, retrying front end over a [`TextGenerator`].
pub struct GenerationClient<G> {
    generator: G,
    policy: RetryPolicy,
}

impl<G: TextGenerator> GenerationClient<G> {
    pub fn new(generator: G, policy: RetryPolicy) -> Self {
        Self { generator, policy }
    }

    /// The wrapped backend.
    pub fn generator(&self) -> &G {
        &self.generator
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    /// Generate text for `body` under `persona`.
    ///
    /// Blocks the caller for every backoff and for the post-success pause.
    #[instrument(skip_all, fields(persona = %persona, body_chars = body.len()))]
    pub async fn generate(&self, body: &str, persona: Persona) -> GenerationOutcome {
        let prompt = persona.wrap(body);
        let attempts = self.policy.attempts();

        for attempt in 0..attempts {
            match self.generator.generate_text(&prompt).await {
                Ok(text) => {
                    info!(
                        attempt = attempt + 1,
                        pause_secs = self.policy.rate_limit_pause.as_secs(),
                        "response received"
                    );
                    tokio::time::sleep(self.policy.rate_limit_pause).await;
                    return GenerationOutcome::Success(text.trim().to_string());
                }
                Err(GenerateError::Quota {
                    message,
                    retry_after,
                }) => {
                    let wait = self.policy.quota_wait(attempt, retry_after);
                    warn!(
                        attempt = attempt + 1,
                        max_attempts = attempts,
                        suggested_secs = ?retry_after,
                        wait_secs = wait.as_secs(),
                        "quota error, backing off"
                    );
                    debug!(%message, "quota error detail");
                    tokio::time::sleep(wait).await;
                }
                Err(GenerateError::Other(detail)) => {
                    error!(%detail, "generation failed");
                    return GenerationOutcome::Degraded(failure_marker(&detail));
                }
            }
        }

        error!(attempts, "generation gave up after repeated quota errors");
        GenerationOutcome::Degraded(QUOTA_EXHAUSTED_MARKER.to_string())
    }
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;
    use std::sync::Mutex;

    use tokio::time::Instant;

    use super::*;

    /// Backend replaying a fixed script of responses.
    struct ScriptedGenerator {
        script: Mutex<VecDeque<std::result::Result<String, GenerateError>>>,
        prompts: Mutex<Vec<String>>,
    }

    impl ScriptedGenerator {
        fn new(script: Vec<std::result::Result<String, GenerateError>>) -> Self {
            Self {
                script: Mutex::new(script.into()),
                prompts: Mutex::new(Vec::new()),
            }
        }

        fn calls(&self) -> usize {
            self.prompts.lock().unwrap().len()
        }
    }

    impl TextGenerator for ScriptedGenerator {
        async fn generate_text(&self, prompt: &str) -> std::result::Result<String, GenerateError> {
            self.prompts.lock().unwrap().push(prompt.to_string());
            self.script
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Err(GenerateError::Other("script exhausted".into())))
        }
    }

    fn quota(hint: Option<u64>) -> std::result::Result<String, GenerateError> {
        Err(GenerateError::Quota {
            message: "429".into(),
            retry_after: hint,
        })
    }

    fn client(script: Vec<std::result::Result<String, GenerateError>>) -> GenerationClient<ScriptedGenerator> {
        GenerationClient::new(ScriptedGenerator::new(script), RetryPolicy::default())
    }

    #[test]
    fn quota_wait_rules() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.quota_wait(0, Some(37)), Duration::from_secs(38));
        assert_eq!(policy.quota_wait(2, Some(0)), Duration::from_secs(1));
        assert_eq!(policy.quota_wait(0, None), Duration::from_secs(5));
        assert_eq!(policy.quota_wait(1, None), Duration::from_secs(10));
        assert_eq!(policy.quota_wait(2, None), Duration::from_secs(20));
    }

    #[test]
    fn default_policy_matches_config_defaults() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.max_retries, 3);
        assert_eq!(policy.rate_limit_pause, Duration::from_secs(2));
    }

    #[tokio::test(start_paused = true)]
    async fn success_is_trimmed_and_paused() {
        let client = client(vec![Ok("  generated text \n".into())]);
        let start = Instant::now();

        let outcome = client.generate("Write it.", Persona::Copywriter).await;

        assert_eq!(outcome, GenerationOutcome::Success("generated text".into()));
        assert_eq!(start.elapsed(), Duration::from_secs(2));
        let prompts = client.generator().prompts.lock().unwrap();
        assert_eq!(prompts[0], Persona::Copywriter.wrap("Write it."));
    }

    #[tokio::test(start_paused = true)]
    async fn provider_hint_waits_hint_plus_one() {
        let client = client(vec![quota(Some(7)), Ok("ok".into())]);
        let start = Instant::now();

        let outcome = client.generate("x", Persona::Analyst).await;

        assert_eq!(outcome.text(), "ok");
        // 7 + 1 backoff, then the 2 s success pause.
        assert_eq!(start.elapsed(), Duration::from_secs(10));
        assert_eq!(client.generator().calls(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn two_quota_failures_then_success() {
        let client = client(vec![quota(None), quota(None), Ok("third time".into())]);
        let start = Instant::now();

        let outcome = client.generate("x", Persona::Analyst).await;

        assert_eq!(outcome, GenerationOutcome::Success("third time".into()));
        // 5 * 2^0 + 5 * 2^1 backoff, then the 2 s success pause.
        assert_eq!(start.elapsed(), Duration::from_secs(17));
        assert_eq!(client.generator().calls(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn exhausted_quota_returns_critical_marker() {
        let client = client(vec![quota(None), quota(None), quota(None), Ok("never".into())]);

        let outcome = client.generate("x", Persona::Analyst).await;

        assert_eq!(outcome, GenerationOutcome::Degraded(QUOTA_EXHAUSTED_MARKER.into()));
        assert!(outcome.is_degraded());
        assert_eq!(client.generator().calls(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn other_failure_is_not_retried() {
        let client = client(vec![Err(GenerateError::Other("HTTP 400: bad key".into()))]);
        let start = Instant::now();

        let outcome = client.generate("x", Persona::Editor).await;

        assert!(outcome.is_degraded());
        assert_eq!(outcome.text(), "\n\n[ERROR: HTTP 400: bad key]\n\n");
        assert_eq!(client.generator().calls(), 1);
        assert_eq!(start.elapsed(), Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn zero_retries_still_attempts_once() {
        let policy = RetryPolicy {
            max_retries: 0,
            ..RetryPolicy::default()
        };
        let client = GenerationClient::new(ScriptedGenerator::new(vec![Ok("once".into())]), policy);

        assert_eq!(client.generate("x", Persona::Analyst).await.text(), "once");
    }
}
