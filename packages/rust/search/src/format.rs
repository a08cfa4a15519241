//! Renders lookup results into a prompt-insertable context block.

use scribe_shared::Source;

/// Header opening a non-empty sources block.
const SOURCES_HEADER: &str = "--- RESEARCH SOURCES FOR THIS SECTION ---";

/// Sentinel used when a lookup produced nothing. Prompts always carry a
/// labeled context block, even a vacuous one.
pub const NO_SOURCES: &str = "No external sources found.";

/// Format sources for a prompt. `None` and an empty slice both yield [`NO_SOURCES`].
pub fn format_sources(sources: Option<&[Source]>) -> String {
    let sources = match sources {
        Some(s) if !s.is_empty() => s,
        _ => return NO_SOURCES.to_string(),
    };

    let mut out = format!("{SOURCES_HEADER}\n");
    for (i, source) in sources.iter().enumerate() {
        out.push_str(&format!(
            "Source {}: {}\nSnippet: {}\nURL: {}\n\n",
            i + 1,
            source.title,
            source.snippet,
            source.url
        ));
    }
    out
}
