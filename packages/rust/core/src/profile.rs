//! Built-in writing profiles.
//!
//! A profile fixes everything that varies between kinds of document: the
//! brief questions, the outline, the personas, the file names and the
//! headings used for translations.

use std::str::FromStr;

use scribe_generation::Persona;
use scribe_shared::{Language, ScribeError};

use crate::brief::{Brief, BriefField};
use crate::outline::{MANUAL, Outline, PartTemplate, WEBSITE_COPY};

/// One question asked while collecting the brief.
#[derive(Debug, Clone, Copy)]
pub struct BriefQuestion {
    pub field: BriefField,
    pub prompt: &'static str,
}

/// What the operator supplies for an ad-hoc section besides its title.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdHocMode {
    /// A free-text instruction; the lookup query is derived from the brief.
    Instruction,
    /// A search term used as the lookup query.
    SearchTerm,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Profile {
    /// Conversion-focused copy for a website: Home, About Us, Offer.
    #[default]
    WebsiteCopy,
    /// A five-chapter research manual on one topic.
    Manual,
}

const WEBSITE_COPY_QUESTIONS: &[BriefQuestion] = &[
    BriefQuestion {
        field: BriefField::Subject,
        prompt: "Brand / company name: ",
    },
    BriefQuestion {
        field: BriefField::Offering,
        prompt: "Short description of the main product or service: ",
    },
    BriefQuestion {
        field: BriefField::Audience,
        prompt: "Who is the target audience? (describe in detail): ",
    },
    BriefQuestion {
        field: BriefField::Differentiators,
        prompt: "What are the 2-3 main differentiators or unique benefits?: ",
    },
    BriefQuestion {
        field: BriefField::Tone,
        prompt: "Desired tone of voice? (e.g. Professional, Friendly, Technical, Inspiring): ",
    },
    BriefQuestion {
        field: BriefField::Goal,
        prompt: "Main goal of the site? (e.g. Generate leads, Sell a product, Inform): ",
    },
];

const MANUAL_QUESTIONS: &[BriefQuestion] = &[BriefQuestion {
    field: BriefField::Subject,
    prompt: "Main topic of the document: ",
}];

impl Profile {
    pub const ALL: [Profile; 2] = [Profile::WebsiteCopy, Profile::Manual];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::WebsiteCopy => "website-copy",
            Self::Manual => "manual",
        }
    }

    pub fn questions(&self) -> &'static [BriefQuestion] {
        match self {
            Self::WebsiteCopy => WEBSITE_COPY_QUESTIONS,
            Self::Manual => MANUAL_QUESTIONS,
        }
    }

    fn parts(&self) -> &'static [PartTemplate] {
        match self {
            Self::WebsiteCopy => WEBSITE_COPY,
            Self::Manual => MANUAL,
        }
    }

    /// The outline with every lookup query resolved against `brief`.
    pub fn outline(&self, brief: &Brief) -> Outline {
        Outline::from_templates(self.parts(), brief)
    }

    /// Persona writing every section.
    pub fn writer_persona(&self) -> Persona {
        match self {
            Self::WebsiteCopy => Persona::Copywriter,
            Self::Manual => Persona::Analyst,
        }
    }

    /// Persona critiquing each finished part.
    pub fn review_persona(&self) -> Persona {
        match self {
            Self::WebsiteCopy => Persona::CopyEditor,
            Self::Manual => Persona::Editor,
        }
    }

    /// Top-level document title.
    pub fn document_title(&self, brief: &Brief) -> String {
        match self {
            Self::WebsiteCopy => format!("Website Copy: {}", brief.subject),
            Self::Manual => brief.subject.clone(),
        }
    }

    /// Default `(context, review)` windows in characters, used when the
    /// config file leaves them unset.
    pub fn default_windows(&self) -> (usize, usize) {
        match self {
            Self::WebsiteCopy => (6_000, 6_000),
            Self::Manual => (8_000, 10_000),
        }
    }

    /// Base of every exported file name (`<stem>_partial`, `<stem>_final`, ...).
    pub fn file_stem(&self) -> &'static str {
        match self {
            Self::WebsiteCopy => "website_copy",
            Self::Manual => "document",
        }
    }

    /// Heading placed above an appended translation.
    pub fn translation_heading(&self, language: Language) -> &'static str {
        match (self, language) {
            (Self::WebsiteCopy, Language::English) => "English Website Copy",
            (Self::WebsiteCopy, Language::Spanish) => "Copy para Sitio Web en Español",
            (Self::Manual, Language::English) => "English Translation",
            (Self::Manual, Language::Spanish) => "Traducción al Español",
        }
    }

    pub fn adhoc_mode(&self) -> AdHocMode {
        match self {
            Self::WebsiteCopy => AdHocMode::Instruction,
            Self::Manual => AdHocMode::SearchTerm,
        }
    }

    /// Yes/no question opening the extension loop after each part.
    pub fn extension_question(&self) -> &'static str {
        match self {
            Self::WebsiteCopy => "Add another section or copy block to this page?",
            Self::Manual => "Add another section to this part?",
        }
    }

    /// Brief fields rendered at the top of every section prompt.
    pub fn brief_block(&self, brief: &Brief) -> String {
        match self {
            Self::WebsiteCopy => format!(
                "Client context:\nBrand: {}\nAudience: {}\nProduct/Service: {}\nDifferentiators: {}\n\
                 Tone of voice: {}\nPrimary site goal: {}",
                brief.subject,
                brief.audience,
                brief.offering,
                brief.differentiators,
                brief.tone,
                brief.goal
            ),
            Self::Manual => format!("Document topic: {}", brief.subject),
        }
    }
}

impl FromStr for Profile {
    type Err = ScribeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "website-copy" | "website" | "copy" => Ok(Self::WebsiteCopy),
            "manual" | "document" => Ok(Self::Manual),
            other => Err(ScribeError::validation(format!(
                "unknown profile '{other}' (expected 'website-copy' or 'manual')"
            ))),
        }
    }
}

impl std::fmt::Display for Profile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_profiles() {
        assert_eq!("website-copy".parse::<Profile>().unwrap(), Profile::WebsiteCopy);
        assert_eq!(" Manual ".parse::<Profile>().unwrap(), Profile::Manual);
        assert!("novel".parse::<Profile>().is_err());
        for profile in Profile::ALL {
            assert_eq!(profile.to_string().parse::<Profile>().unwrap(), profile);
        }
    }

    #[test]
    fn subject_is_asked_first() {
        for profile in Profile::ALL {
            assert_eq!(profile.questions()[0].field, BriefField::Subject);
        }
    }

    #[test]
    fn document_titles() {
        let brief = Brief::topic("Acme");
        assert_eq!(Profile::WebsiteCopy.document_title(&brief), "Website Copy: Acme");
        assert_eq!(Profile::Manual.document_title(&brief), "Acme");
    }

    #[test]
    fn outline_sizes() {
        let brief = Brief::topic("Acme");

        let website = Profile::WebsiteCopy.outline(&brief);
        let sizes: Vec<_> = website.parts.iter().map(|p| p.sections.len()).collect();
        assert_eq!(sizes, [4, 2, 4]);

        let manual = Profile::Manual.outline(&brief);
        let sizes: Vec<_> = manual.parts.iter().map(|p| p.sections.len()).collect();
        assert_eq!(sizes, [2, 2, 2, 2, 2]);
    }

    #[test]
    fn windows_differ_per_profile() {
        assert_eq!(Profile::WebsiteCopy.default_windows(), (6_000, 6_000));
        assert_eq!(Profile::Manual.default_windows(), (8_000, 10_000));
    }

    #[test]
    fn brief_block_mentions_every_website_field() {
        let brief = Brief {
            subject: "Acme".into(),
            offering: "Backups".into(),
            audience: "Clinics".into(),
            differentiators: "Local".into(),
            tone: "Warm".into(),
            goal: "Leads".into(),
        };
        let block = Profile::WebsiteCopy.brief_block(&brief);
        for value in ["Acme", "Backups", "Clinics", "Local", "Warm", "Leads"] {
            assert!(block.contains(value), "missing {value}");
        }
    }
}
