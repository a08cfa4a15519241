//! Text generation for Scribe.
//!
//! - [`TextGenerator`]: the backend seam (one prompt in, text or a classified failure out)
//! - [`GeminiClient`]: the Gemini REST backend
//! - [`GenerationClient`]: persona wrapping, quota retry with backoff, inter-call pacing,
//!   and the "errors become content" policy via [`GenerationOutcome`]

mod client;
mod error;
mod gemini;
mod persona;

use std::future::Future;

pub use client::{
    GenerationClient, GenerationOutcome, QUOTA_EXHAUSTED_MARKER, RetryPolicy, failure_marker,
};
pub use error::{GenerateError, parse_retry_hint};
pub use gemini::{GeminiClient, GeminiSettings, ModelInfo};
pub use persona::Persona;

/// A generation backend: one fully-wrapped prompt in, raw text out.
pub trait TextGenerator: Send + Sync {
    fn generate_text(
        &self,
        prompt: &str,
    ) -> impl Future<Output = std::result::Result<String, GenerateError>> + Send;
}
