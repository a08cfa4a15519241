//! Chunked translation of a finished document.
//!
//! Chunks are translated independently and concatenated in input order; a
//! chunk never sees its neighbours.

use scribe_generation::{GenerationClient, Persona, TextGenerator};
use scribe_shared::Language;
use tracing::{info, instrument, warn};

/// Group the lines of `text` into chunks of at most `limit` characters.
///
/// Lines are never split. A chunk exceeds `limit` only when it is a single
/// line that is longer than `limit` on its own. Whitespace-only chunks are
/// dropped.
pub fn chunk_paragraphs(text: &str, limit: usize) -> Vec<String> {
    let mut chunks = Vec::new();
    let mut current = String::new();
    let mut current_chars = 0usize;
    let mut started = false;

    for paragraph in text.split('\n') {
        let len = paragraph.chars().count();

        if !started {
            current.push_str(paragraph);
            current_chars = len;
            started = true;
        } else if current_chars + len + 1 <= limit {
            current.push('\n');
            current.push_str(paragraph);
            current_chars += len + 1;
        } else {
            flush(&mut chunks, std::mem::take(&mut current));
            current.push_str(paragraph);
            current_chars = len;
        }
    }
    flush(&mut chunks, current);

    chunks
}

fn flush(chunks: &mut Vec<String>, chunk: String) {
    if !chunk.trim().is_empty() {
        chunks.push(chunk);
    }
}

/// Translate `text` chunk by chunk; each chunk's output is followed by a newline.
#[instrument(skip_all, fields(language = %language, text_len = text.len()))]
pub async fn translate<G: TextGenerator>(
    client: &GenerationClient<G>,
    text: &str,
    language: Language,
    chunk_limit: usize,
) -> String {
    let chunks = chunk_paragraphs(text, chunk_limit);
    info!(chunks = chunks.len(), "starting translation");

    let mut translated = String::new();
    for (i, chunk) in chunks.iter().enumerate() {
        info!(chunk = i + 1, total = chunks.len(), chars = chunk.chars().count(), "translating chunk");
        let outcome = client.generate(chunk, Persona::Translator(language)).await;
        if outcome.is_degraded() {
            warn!(chunk = i + 1, "chunk translation degraded");
        }
        translated.push_str(outcome.text());
        translated.push('\n');
    }

    info!("translation finished");
    translated
}
