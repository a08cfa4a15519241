//! Sources gathered across a run, deduplicated by URL.

use std::collections::HashSet;

use scribe_shared::Source;

/// Paragraph used in place of the references list when nothing was collected.
pub const NO_REFERENCES: &str = "No external sources were used to generate this document.";

/// Insertion-ordered set of sources; the first source seen for a URL wins.
#[derive(Debug, Clone, Default)]
pub struct ReferenceSet {
    entries: Vec<Source>,
    seen: HashSet<String>,
}

impl ReferenceSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add sources, skipping empty URLs and URLs already present.
    pub fn extend(&mut self, sources: &[Source]) {
        for source in sources {
            if source.url.is_empty() || self.seen.contains(&source.url) {
                continue;
            }
            self.seen.insert(source.url.clone());
            self.entries.push(source.clone());
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Source> {
        self.entries.iter()
    }

    /// Raw `Title:` / `URL:` listing handed to the references persona.
    pub fn render_raw(&self) -> String {
        self.entries
            .iter()
            .map(|s| format!("Title: {}\nURL: {}\n\n", s.title, s.url))
            .collect()
    }
}
