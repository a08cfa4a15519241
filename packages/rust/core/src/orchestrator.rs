//! The outline walker.
//!
//! Per part: heading, sections, checkpoint, review, extension loop. After the
//! last part: references, translation offer, final save.
//!
//! Everything runs strictly in sequence; every lookup and generation call
//! completes (including its backoff waits) before the next one starts.

use std::time::{Duration, Instant};

use scribe_export::ExportedDocument;
use scribe_generation::{GenerationClient, Persona, TextGenerator};
use scribe_search::{SourceLookup, format_sources};
use scribe_shared::{AppConfig, Language, Result, RunId};
use tracing::{info, instrument, warn};

use crate::brief::Brief;
use crate::context::ContextAccumulator;
use crate::document::Document;
use crate::extension::AdHocRequest;
use crate::operator::Operator;
use crate::outline::{Outline, PartSpec, SectionSpec};
use crate::profile::{AdHocMode, Profile};
use crate::references::{NO_REFERENCES, ReferenceSet};
use crate::review::review;
use crate::sink::{DocumentSink, final_name, partial_name};
use crate::translation::translate;

// ---------------------------------------------------------------------------
// Settings and results
// ---------------------------------------------------------------------------

/// Numeric knobs for one run, resolved from configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSettings {
    /// Characters of accumulated context exposed to each section prompt.
    pub context_window: usize,
    /// Characters of a finished part sent for review.
    pub review_window: usize,
    /// Maximum characters per translation chunk.
    pub translation_chunk: usize,
    /// Sources requested per outline section.
    pub max_results: u32,
    /// Languages offered after the base document is done, in order.
    pub languages: Vec<Language>,
}

impl RunSettings {
    /// Settings for `profile`; window sizes missing from the config fall back
    /// to the profile's defaults.
    pub fn new(config: &AppConfig, profile: Profile) -> Self {
        let (context_window, review_window) = profile.default_windows();
        Self {
            context_window: config.writing.context_window_chars.unwrap_or(context_window),
            review_window: config.writing.review_window_chars.unwrap_or(review_window),
            translation_chunk: config.writing.translation_chunk_chars,
            max_results: config.search.max_results,
            languages: Language::ALL.to_vec(),
        }
    }
}

impl Default for RunSettings {
    fn default() -> Self {
        Self::new(&AppConfig::default(), Profile::default())
    }
}

/// Outcome of a completed session.
#[derive(Debug)]
pub struct RunSummary {
    pub run_id: RunId,
    pub parts: usize,
    /// Outline and ad-hoc sections written.
    pub sections: usize,
    /// Sections whose text is an inline error marker.
    pub degraded_sections: usize,
    pub references: usize,
    /// Checkpoints that reached the sink.
    pub checkpoints: usize,
    /// `None` when the final save failed.
    pub final_document: Option<ExportedDocument>,
    pub elapsed: Duration,
}

// ---------------------------------------------------------------------------
// Progress
// ---------------------------------------------------------------------------

/// Progress callback for reporting run status.
pub trait ProgressReporter: Send + Sync {
    /// Called when entering a new phase.
    fn phase(&self, name: &str);
    /// Called before a section's lookup starts.
    fn section_started(&self, part: usize, section: usize, title: &str);
    /// Called once a section's text has been appended.
    fn section_finished(&self, part: usize, section: usize, degraded: bool);
    /// Called when the run completes.
    fn done(&self, summary: &RunSummary);
}

/// No-op progress reporter for headless/test usage.
pub struct SilentProgress;

impl ProgressReporter for SilentProgress {
    fn phase(&self, _name: &str) {}
    fn section_started(&self, _part: usize, _section: usize, _title: &str) {}
    fn section_finished(&self, _part: usize, _section: usize, _degraded: bool) {}
    fn done(&self, _summary: &RunSummary) {}
}

// ---------------------------------------------------------------------------
// Orchestrator
// ---------------------------------------------------------------------------

/// Owns the document, the context buffer and the reference set for one session.
pub struct Orchestrator<G, L, S> {
    pub(crate) run_id: RunId,
    pub(crate) profile: Profile,
    pub(crate) brief: Brief,
    pub(crate) outline: Outline,
    pub(crate) settings: RunSettings,
    pub(crate) client: GenerationClient<G>,
    pub(crate) lookup: L,
    pub(crate) sink: S,
    pub(crate) document: Document,
    pub(crate) context: ContextAccumulator,
    pub(crate) references: ReferenceSet,
    sections_written: usize,
    degraded_sections: usize,
    checkpoints: usize,
}

impl<G, L, S> Orchestrator<G, L, S>
where
    G: TextGenerator,
    L: SourceLookup,
    S: DocumentSink,
{
    pub fn new(
        profile: Profile,
        brief: Brief,
        client: GenerationClient<G>,
        lookup: L,
        sink: S,
        settings: RunSettings,
    ) -> Self {
        let outline = profile.outline(&brief);
        let document = Document::new(&profile.document_title(&brief));
        Self {
            run_id: RunId::new(),
            profile,
            brief,
            outline,
            settings,
            client,
            lookup,
            sink,
            document,
            context: ContextAccumulator::new(),
            references: ReferenceSet::new(),
            sections_written: 0,
            degraded_sections: 0,
            checkpoints: 0,
        }
    }

    /// Replace the profile's outline.
    pub fn with_outline(mut self, outline: Outline) -> Self {
        self.outline = outline;
        self
    }

    pub fn run_id(&self) -> &RunId {
        &self.run_id
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn context(&self) -> &ContextAccumulator {
        &self.context
    }

    pub fn references(&self) -> &ReferenceSet {
        &self.references
    }

    pub fn client(&self) -> &GenerationClient<G> {
        &self.client
    }

    pub fn lookup(&self) -> &L {
        &self.lookup
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Run the whole session.
    ///
    /// Errors only when the operator's input fails; generation, lookup and
    /// save failures are absorbed and logged.
    #[instrument(skip_all, fields(run_id = %self.run_id, profile = %self.profile, subject = %self.brief.subject))]
    pub async fn run<O: Operator>(
        &mut self,
        operator: &mut O,
        progress: &dyn ProgressReporter,
    ) -> Result<RunSummary> {
        let start = Instant::now();
        info!(
            parts = self.outline.parts.len(),
            sections = self.outline.section_count(),
            "starting run"
        );

        let outline = self.outline.clone();
        for (index, part) in outline.parts.iter().enumerate() {
            self.run_part(index + 1, part, operator, progress).await?;
        }

        progress.phase("Assembling references");
        self.assemble_references().await;
        info!("base document complete");

        let final_document = self.offer_translations(operator, progress).await?;

        let summary = RunSummary {
            run_id: self.run_id.clone(),
            parts: outline.parts.len(),
            sections: self.sections_written,
            degraded_sections: self.degraded_sections,
            references: self.references.len(),
            checkpoints: self.checkpoints,
            final_document,
            elapsed: start.elapsed(),
        };

        info!(
            sections = summary.sections,
            degraded = summary.degraded_sections,
            references = summary.references,
            elapsed_ms = summary.elapsed.as_millis() as u64,
            "run complete"
        );
        progress.done(&summary);

        Ok(summary)
    }

    async fn run_part<O: Operator>(
        &mut self,
        part_num: usize,
        part: &PartSpec,
        operator: &mut O,
        progress: &dyn ProgressReporter,
    ) -> Result<()> {
        progress.phase(&format!("Part {part_num}: {}", part.title));
        info!(part = part_num, title = %part.title, "starting part");

        let part_start = self.document.len();
        self.document.begin_part(part_num, &part.title);

        let mut section_num = 0;
        for spec in &part.sections {
            section_num += 1;
            self.write_section(part_num, section_num, spec, progress).await;
        }

        if self.checkpoint().is_some() {
            operator.notice(&format!("Part {part_num} saved. Review the partial document."));
        }

        progress.phase(&format!("Reviewing part {part_num}"));
        let part_content = self.document.since(part_start).to_string();
        let suggestions = review(
            &self.client,
            self.profile,
            &self.brief,
            &part_content,
            self.settings.review_window,
        )
        .await;
        operator.show(&format!("Suggestions for part {part_num}"), suggestions.text());

        while operator.confirm(self.profile.extension_question()).await? {
            section_num += 1;
            let title = operator.ask("Title of the new section: ").await?.trim().to_string();
            let request = match self.profile.adhoc_mode() {
                AdHocMode::Instruction => AdHocRequest::Instruction(
                    operator
                        .ask("Specific instruction for this section: ")
                        .await?
                        .trim()
                        .to_string(),
                ),
                AdHocMode::SearchTerm => AdHocRequest::SearchTerm(
                    operator
                        .ask("Search term for this section: ")
                        .await?
                        .trim()
                        .to_string(),
                ),
            };

            progress.section_started(part_num, section_num, &title);
            let rendered = self.extend(&title, &request, part_num, section_num).await;
            self.record_outcome(part_num, section_num, rendered.outcome.is_degraded());
            progress.section_finished(part_num, section_num, rendered.outcome.is_degraded());

            let text = rendered.render();
            self.document.push_raw(&text);
            self.context.append(&text);

            if self.checkpoint().is_some() {
                operator.notice("Additional section generated and saved to the partial document.");
            }
        }

        info!(part = part_num, sections = section_num, "part complete");
        Ok(())
    }

    /// Lookup, format, prompt, generate, append.
    #[instrument(skip_all, fields(part = part, section = section, title = %spec.title))]
    async fn write_section(
        &mut self,
        part: usize,
        section: usize,
        spec: &SectionSpec,
        progress: &dyn ProgressReporter,
    ) {
        progress.section_started(part, section, &spec.title);

        let sources = self.lookup.lookup(&spec.query, self.settings.max_results).await;
        if let Some(found) = &sources {
            self.references.extend(found);
        }
        let sources_block = format_sources(sources.as_deref());

        let tail = self.context.tail(self.settings.context_window);
        let instruction = spec.build_instruction(&sources_block, tail, &self.brief);
        let prompt = section_prompt(
            &self.profile.brief_block(&self.brief),
            &sources_block,
            &spec.title,
            &instruction,
            tail,
        );

        let outcome = self.client.generate(&prompt, self.profile.writer_persona()).await;
        self.record_outcome(part, section, outcome.is_degraded());

        self.document.push_section(part, section, &spec.title, outcome.text());
        self.context.append(&format!("{}\n\n", outcome.text()));

        progress.section_finished(part, section, outcome.is_degraded());
    }

    fn record_outcome(&mut self, part: usize, section: usize, degraded: bool) {
        self.sections_written += 1;
        if degraded {
            self.degraded_sections += 1;
            warn!(part, section, "section text is an error marker");
        }
    }

    async fn assemble_references(&mut self) {
        let body = if self.references.is_empty() {
            info!("no sources collected");
            NO_REFERENCES.to_string()
        } else {
            info!(count = self.references.len(), "formatting references");
            let raw = self.references.render_raw();
            self.client
                .generate(&raw, Persona::References)
                .await
                .into_text()
        };
        self.document.push_raw(&format!("# References\n\n{body}\n\n"));
    }

    async fn offer_translations<O: Operator>(
        &mut self,
        operator: &mut O,
        progress: &dyn ProgressReporter,
    ) -> Result<Option<ExportedDocument>> {
        let stem = self.profile.file_stem();
        let base = self.document.as_str().to_string();

        if !operator.confirm("The base document is ready. Add translations?").await? {
            operator.notice("Saving the final document in the base language only.");
            progress.phase("Saving final document");
            return Ok(self.save(&final_name(stem, false), &base));
        }

        let mut combined = base.clone();
        for &language in &self.settings.languages {
            let question = format!("Translate the document into {}?", language.name());
            if !operator.confirm(&question).await? {
                continue;
            }
            progress.phase(&format!("Translating into {language}"));
            let translated =
                translate(&self.client, &base, language, self.settings.translation_chunk).await;
            combined.push_str(&format!(
                "\n\n---\n\n# {}\n\n{translated}",
                self.profile.translation_heading(language)
            ));
        }

        progress.phase("Saving final document");
        Ok(self.save(&final_name(stem, true), &combined))
    }

    fn checkpoint(&mut self) -> Option<ExportedDocument> {
        let name = partial_name(self.profile.file_stem());
        let saved = self.save(&name, self.document.as_str());
        if saved.is_some() {
            self.checkpoints += 1;
        }
        saved
    }

    fn save(&self, base_name: &str, content: &str) -> Option<ExportedDocument> {
        match self.sink.save(base_name, &self.brief.subject, content) {
            Ok(doc) => {
                info!(base_name, path = %doc.markdown_path.display(), "document saved");
                Some(doc)
            }
            Err(e) => {
                warn!(base_name, error = %e, "failed to save document");
                None
            }
        }
    }
}

/// Full prompt body for an outline section.
pub fn section_prompt(
    brief_block: &str,
    sources: &str,
    title: &str,
    instruction: &str,
    context: &str,
) -> String {
    format!(
        "{brief_block}\n\n{sources}\n\nSpecific instruction for this section ({title}):\n{instruction}\n\n\
         ALREADY WRITTEN CONTEXT:\n{context}"
    )
}
