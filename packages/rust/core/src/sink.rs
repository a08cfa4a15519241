//! Where finished and partial documents go.

use scribe_export::{ExportedDocument, Exporter};
use scribe_shared::Result;

/// Persists a document under a base name and subject.
///
/// Each call rewrites the document in full.
pub trait DocumentSink: Send + Sync {
    fn save(&self, base_name: &str, subject: &str, content: &str) -> Result<ExportedDocument>;
}

impl DocumentSink for Exporter {
    fn save(&self, base_name: &str, subject: &str, content: &str) -> Result<ExportedDocument> {
        Exporter::save(self, base_name, subject, content)
    }
}

/// Checkpoint file base for a profile stem.
pub fn partial_name(stem: &str) -> String {
    format!("{stem}_partial")
}

/// Final file base; `multilingual` when translations were offered.
pub fn final_name(stem: &str, multilingual: bool) -> String {
    if multilingual {
        format!("{stem}_final_multilingual")
    } else {
        format!("{stem}_final")
    }
}
