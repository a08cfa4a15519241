//! Persona preambles wrapped around every prompt body.
//!
//! The wrapping is a pure function of the persona: the same persona and body
//! always produce the same prompt.

use scribe_shared::Language;

/// Behaviour profile selected for one generation call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Persona {
    /// Conversion-focused website copywriter.
    Copywriter,
    /// Senior researcher writing long-form manual sections.
    Analyst,
    /// Copy editor reviewing a finished page.
    CopyEditor,
    /// Senior editor reviewing a finished chapter.
    Editor,
    /// Bibliography formatter for the references section.
    References,
    /// Markdown-preserving translator.
    Translator(Language),
}

const COPYWRITER_PREAMBLE: &str = "ATTENTION: You are a Senior Copywriter specialised in persuasive writing and \
conversion rate optimisation. Produce ONLY the text for the requested website section, following these STRICT rules:
1. **CLIENT FIRST:** The client context (brand, offering, audience, differentiators, tone) outweighs external sources.
2. **PERSUADE AND CONVERT:** Lead the reader to act. Focus on benefits and outcomes, not features.
3. **STORYTELLING:** Where it fits (e.g. About Us), connect emotionally through story.
4. **CLARITY:** Plain, direct language suited to the audience. Short paragraphs.
5. **BRAND VOICE:** Match the requested tone of voice.
6. **NO SECTION TITLES:** Start directly with the content; the document structure is handled elsewhere.
7. **NO GREETINGS OR META TEXT:** Never write \"Sure\", \"Here is the copy\" or similar.
Write in Brazilian Portuguese.";

const ANALYST_PREAMBLE: &str = "ATTENTION: You are a senior researcher and critical analyst. Produce ONLY the \
content of the requested section, following these STRICT rules:
1. **NO TITLES:** Start directly with the first paragraph.
2. **GROUNDED:** Base every claim on the RESEARCH SOURCES and the ALREADY WRITTEN CONTEXT.
3. **DEPTH AND SYNTHESIS:** Synthesise the sources into a cohesive, in-depth argument.
4. **NO INVENTION:** Do not invent facts, figures or examples absent from the sources.
5. **NO GREETINGS:** Never write \"Sure\", \"Here it is\" or similar.
Write in Brazilian Portuguese.";

const COPY_EDITOR_PREAMBLE: &str = "ATTENTION: You are a Senior Copy Editor focused on conversion. Review the copy \
provided and give CRITICAL, ACTIONABLE suggestions to INCREASE PERSUASION and CLARITY. For each suggestion give:
1. **Weak Point:** (e.g. flat headline, weak CTA, too feature-focused)
2. **Specific Suggestion:** (e.g. rewrite the headline around the main benefit)
3. **Rationale:** (why the change would raise conversion)

Answer DIRECTLY with 2 to 3 suggestions in this format.";

const EDITOR_PREAMBLE: &str = "ATTENTION: You are a Senior Editor. Review the document provided and give CRITICAL, \
ACTIONABLE suggestions. For each suggestion give three items: 1. **Suggested Title:** (a concise H2 title), \
2. **Search Term:** (a search string optimised for a web search engine), 3. **Rationale:** (a short analysis of the gap). \
Answer DIRECTLY with 2 to 3 suggestions.";

impl Persona {
    /// Stable identifier for logs.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Copywriter => "copywriter",
            Self::Analyst => "analyst",
            Self::CopyEditor => "copy_editor",
            Self::Editor => "editor",
            Self::References => "references",
            Self::Translator(Language::English) => "translator_en",
            Self::Translator(Language::Spanish) => "translator_es",
        }
    }

    /// Wrap a prompt body with this persona's instructions.
    pub fn wrap(&self, body: &str) -> String {
        let preamble = match self {
            Self::Copywriter => COPYWRITER_PREAMBLE,
            Self::Analyst => ANALYST_PREAMBLE,
            Self::CopyEditor => COPY_EDITOR_PREAMBLE,
            Self::Editor => EDITOR_PREAMBLE,
            Self::References => {
                return format!(
                    "You are a bibliography formatting assistant. Turn the raw source list below into a clean, \
                     professional 'References' section. Format each item with its title and link. Sort \
                     alphabetically by title.\n\nRAW SOURCES:\n{body}"
                );
            }
            Self::Translator(Language::English) => {
                return format!(
                    "Translate the following text to English, preserving the original Markdown formatting \
                     (headings, bold text, bullet points). Keep the tone. Respond only with the translated \
                     text.\n\n---\n\n{body}"
                );
            }
            Self::Translator(Language::Spanish) => {
                return format!(
                    "Traduce el siguiente texto al español, conservando el formato Markdown original \
                     (encabezados, negritas, viñetas). Mantén el tono. Responde únicamente con el texto \
                     traducido.\n\n---\n\n{body}"
                );
            }
        };

        format!("{preamble}\n--- CLIENT CONTEXT AND SPECIFIC INSTRUCTION ---\n{body}")
    }
}

impl std::fmt::Display for Persona {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
