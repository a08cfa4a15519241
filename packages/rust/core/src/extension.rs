//! Operator-requested sections outside the outline.

use scribe_generation::{GenerationOutcome, TextGenerator};
use scribe_search::{SourceLookup, format_sources};
use tracing::{info, instrument};

use crate::brief::Brief;
use crate::document::render_section;
use crate::orchestrator::Orchestrator;
use crate::profile::Profile;
use crate::sink::DocumentSink;

/// Sources requested for an instruction-driven section.
pub const COMPETITOR_RESULTS: u32 = 2;

/// What the operator asked for besides the title.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AdHocRequest {
    /// Free-text instruction; the lookup searches for competitors of the brief's brand.
    Instruction(String),
    /// Search term used verbatim as the lookup query.
    SearchTerm(String),
}

impl AdHocRequest {
    /// Lookup query and result count for this request.
    pub fn lookup(&self, brief: &Brief, max_results: u32) -> (String, u32) {
        match self {
            Self::Instruction(_) => (
                format!("competitors {} OR {}", brief.subject, brief.offering),
                COMPETITOR_RESULTS,
            ),
            Self::SearchTerm(term) => (term.clone(), max_results),
        }
    }

    /// Prompt body for this request.
    pub fn prompt(
        &self,
        profile: Profile,
        brief: &Brief,
        title: &str,
        sources: &str,
        context: &str,
    ) -> String {
        let brief_block = profile.brief_block(brief);
        match self {
            Self::Instruction(instruction) => format!(
                "{brief_block}\n\n{sources}\n\nSpecific instruction for this section: {instruction}\n\n\
                 ALREADY WRITTEN CONTEXT:\n{context}"
            ),
            Self::SearchTerm(_) => format!(
                "{brief_block}\n\nWrite an in-depth section on '{title}'. Critically analyse the topic, \
                 synthesise the sources and connect it to the wider document.\n\n{sources}\n\
                 ALREADY WRITTEN CONTEXT:\n{context}"
            ),
        }
    }
}

/// A generated ad-hoc section with its fixed number.
#[derive(Debug, Clone)]
pub struct RenderedSection {
    pub part: usize,
    pub section: usize,
    pub title: String,
    pub outcome: GenerationOutcome,
}

impl RenderedSection {
    pub fn render(&self) -> String {
        render_section(self.part, self.section, &self.title, self.outcome.text())
    }
}

impl<G, L, S> Orchestrator<G, L, S>
where
    G: TextGenerator,
    L: SourceLookup,
    S: DocumentSink,
{
    /// Run the lookup, format, prompt, generate pipeline for one ad-hoc section
    /// numbered `part.section`. Found sources join the reference set.
    #[instrument(skip_all, fields(part = part, section = section, title = %title))]
    pub async fn extend(
        &mut self,
        title: &str,
        request: &AdHocRequest,
        part: usize,
        section: usize,
    ) -> RenderedSection {
        info!("generating ad-hoc section");

        let (query, max_results) = request.lookup(&self.brief, self.settings.max_results);
        let sources = self.lookup.lookup(&query, max_results).await;
        if let Some(found) = &sources {
            self.references.extend(found);
        }
        let sources_block = format_sources(sources.as_deref());

        let context = self.context.tail(self.settings.context_window);
        let prompt = request.prompt(self.profile, &self.brief, title, &sources_block, context);
        let outcome = self
            .client
            .generate(&prompt, self.profile.writer_persona())
            .await;

        RenderedSection {
            part,
            section,
            title: title.to_string(),
            outcome,
        }
    }
}
