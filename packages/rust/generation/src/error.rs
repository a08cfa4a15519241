//! Failure classification for a single generation attempt.

use std::sync::LazyLock;

use regex::Regex;

/// Why one call to the generation backend failed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GenerateError {
    /// Rate-limited or out of quota. Retryable; may carry the provider's
    /// suggested wait in whole seconds.
    #[error("quota exhausted: {message}")]
    Quota {
        message: String,
        retry_after: Option<u64>,
    },

    /// Anything else. Not retried.
    #[error("{0}")]
    Other(String),
}

impl GenerateError {
    /// Build a quota error, parsing the suggested wait out of the message text.
    pub fn quota(message: impl Into<String>) -> Self {
        let message = message.into();
        let retry_after = parse_retry_hint(&message);
        Self::Quota {
            message,
            retry_after,
        }
    }
}

/// Extract a provider-suggested wait (seconds) from error text.
///
/// Accepts the gRPC rendering (`retry_delay { seconds: 37 }`) and the REST
/// rendering (`"retryDelay": "37s"`, fractional seconds truncated).
pub fn parse_retry_hint(text: &str) -> Option<u64> {
    static HINT_RE: LazyLock<Regex> = LazyLock::new(|| {
        Regex::new(r#"seconds:\s*(\d+)|"retryDelay"\s*:\s*"(\d+)(?:\.\d+)?s""#)
            .expect("valid regex")
    });

    let caps = HINT_RE.captures(text)?;
    caps.get(1)
        .or_else(|| caps.get(2))
        .and_then(|m| m.as_str().parse().ok())
}
