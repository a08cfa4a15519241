//! Declarative outlines: parts of sections, each with a lookup query and an
//! instruction template.
//!
//! Templates use `{name}` placeholders. Brief fields (`{subject}`,
//! `{offering}`, `{audience}`, `{differentiators}`, `{tone}`, `{goal}`) are
//! available everywhere; `{sources}` and `{context}` only in instructions.
//! Unknown placeholders are left untouched.

use std::sync::LazyLock;

use regex::{Captures, Regex};

use crate::brief::{Brief, BriefField};

// ---------------------------------------------------------------------------
// Static tables
// ---------------------------------------------------------------------------

/// One section of a built-in outline, before resolution.
#[derive(Debug, Clone, Copy)]
pub struct SectionTemplate {
    pub title: &'static str,
    pub query: &'static str,
    pub instruction: &'static str,
}

#[derive(Debug, Clone, Copy)]
pub struct PartTemplate {
    pub title: &'static str,
    pub sections: &'static [SectionTemplate],
}

pub const WEBSITE_COPY: &[PartTemplate] = &[
    PartTemplate {
        title: "Home Page",
        sections: &[
            SectionTemplate {
                title: "Main Headline",
                query: "persuasive headlines for {offering}",
                instruction: "Write 3 magnetic, benefit-driven headline options for the home page, \
                              serving the goal '{goal}'.",
            },
            SectionTemplate {
                title: "Sub-headline and Introduction",
                query: "engaging website introduction {subject}",
                instruction: "Write a sub-headline that complements the main headline and a 2-3 line \
                              introduction that grabs the attention of '{audience}' and presents the \
                              problem '{offering}' solves.",
            },
            SectionTemplate {
                title: "Key Benefits",
                query: "how to present benefits of {offering}",
                instruction: "Write a short section highlighting the 2-3 main benefits of '{offering}', \
                              focused on results for '{audience}'. Use bullet points where they help.",
            },
            SectionTemplate {
                title: "Main Call to Action",
                query: "effective CTA examples {goal}",
                instruction: "Write 2 clear, direct call-to-action options for the home page, aligned \
                              with the goal '{goal}'.",
            },
        ],
    },
    PartTemplate {
        title: "About Us",
        sections: &[
            SectionTemplate {
                title: "Our Story / Mission",
                query: "storytelling for about us page {subject}",
                instruction: "Write the 'About Us' text. Tell the story or mission of '{subject}' \
                              engagingly, connecting with the values of '{audience}'. Use the tone \
                              '{tone}'.",
            },
            SectionTemplate {
                title: "Differentiators and Values",
                query: "presenting company differentiators {subject}",
                instruction: "Write a short text reinforcing the differentiators '{differentiators}' and \
                              the values of '{subject}'.",
            },
        ],
    },
    PartTemplate {
        title: "Product / Service Offer",
        sections: &[
            SectionTemplate {
                title: "Offer Headline",
                query: "persuasive offer headline {offering}",
                instruction: "Write 2 headline options for the main offer of '{offering}', highlighting \
                              its biggest benefit or differentiator.",
            },
            SectionTemplate {
                title: "Persuasive Description",
                query: "sales copy for {offering}",
                instruction: "Write the main sales copy for '{offering}'. Explain how it works but focus \
                              on the **results and transformations** it delivers to '{audience}'. Use \
                              storytelling where it fits and reinforce '{differentiators}'. The goal is \
                              conversion ('{goal}').",
            },
            SectionTemplate {
                title: "Social Proof (e.g. Testimonials)",
                query: "website social proof examples",
                instruction: "Write 2-3 short, realistic sample testimonials from '{audience}' customers \
                              happy with '{offering}'.",
            },
            SectionTemplate {
                title: "Offer Call to Action",
                query: "sales page CTA {goal}",
                instruction: "Write 2 strong, clear call-to-action options for the offer page, driving \
                              the action '{goal}'.",
            },
        ],
    },
];

pub const MANUAL: &[PartTemplate] = &[
    PartTemplate {
        title: "Introduction and Fundamentals",
        sections: &[
            SectionTemplate {
                title: "Comprehensive Introduction",
                query: "what is {subject} complete guide",
                instruction: "Write an in-depth 3-4 paragraph introduction to a manual on '{subject}'. \
                              Define the concept, state the central thesis, justify why the topic \
                              matters and present the structure of the manual.",
            },
            SectionTemplate {
                title: "Historical Context and Evolution",
                query: "history and evolution of {subject}",
                instruction: "Critically analyse the evolution of '{subject}', comparing traditional \
                              approaches with the most recent innovations.",
            },
        ],
    },
    PartTemplate {
        title: "Core Components",
        sections: &[
            SectionTemplate {
                title: "Key Concepts and Mechanisms",
                query: "main concepts and mechanisms of {subject}",
                instruction: "Critically analyse the main concepts or components of '{subject}'. Explain \
                              the strategic role of each.",
            },
            SectionTemplate {
                title: "Enabling Technologies",
                query: "enabling technologies of {subject}",
                instruction: "Describe the main technologies behind '{subject}' and how they interact.",
            },
        ],
    },
    PartTemplate {
        title: "Practical Applications and Case Studies",
        sections: &[
            SectionTemplate {
                title: "Applications by Sector",
                query: "practical applications of {subject}",
                instruction: "Explore practical applications of '{subject}' across different industries \
                              or areas of society.",
            },
            SectionTemplate {
                title: "In-depth Case Study",
                query: "detailed case study {subject}",
                instruction: "Analyse a case study of '{subject}' in practice. Describe the challenge and \
                              the solution, then critically assess the results.",
            },
        ],
    },
    PartTemplate {
        title: "Challenges, Ethics and Implementation",
        sections: &[
            SectionTemplate {
                title: "Challenges and Barriers to Adoption",
                query: "challenges and barriers of {subject}",
                instruction: "Analyse the main technical, cultural and financial challenges to \
                              implementing or adopting '{subject}'.",
            },
            SectionTemplate {
                title: "Ethical and Security Considerations",
                query: "ethics and security in {subject}",
                instruction: "Critically analyse the risks (privacy, bias, security) of working with \
                              '{subject}' and recommend ways to mitigate them.",
            },
        ],
    },
    PartTemplate {
        title: "Conclusion and Outlook",
        sections: &[
            SectionTemplate {
                title: "Trends and Future Innovations",
                query: "future trends and innovations of {subject}",
                instruction: "Analyse the trends expected for '{subject}' over the next 5 to 10 years.",
            },
            SectionTemplate {
                title: "Conclusion and Final Recommendations",
                query: "conclusion and recommendations on {subject}",
                instruction: "Synthesise the whole document, recapping its main arguments. Finish with a \
                              list of actionable recommendations for different audiences.",
            },
        ],
    },
];

// ---------------------------------------------------------------------------
// Resolved outline
// ---------------------------------------------------------------------------

/// A section ready to run: its lookup query is already resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionSpec {
    pub title: String,
    pub query: String,
    template: String,
}

impl SectionSpec {
    pub fn new(title: impl Into<String>, query: impl Into<String>, template: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            query: query.into(),
            template: template.into(),
        }
    }

    /// The section-specific instruction for this call.
    pub fn build_instruction(&self, sources: &str, context: &str, brief: &Brief) -> String {
        render_template(&self.template, brief, Some((sources, context)))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartSpec {
    pub title: String,
    pub sections: Vec<SectionSpec>,
}

impl PartSpec {
    pub fn new(title: impl Into<String>, sections: Vec<SectionSpec>) -> Self {
        Self {
            title: title.into(),
            sections,
        }
    }
}

/// Ordered parts; immutable configuration for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outline {
    pub parts: Vec<PartSpec>,
}

impl Outline {
    pub fn new(parts: Vec<PartSpec>) -> Self {
        Self { parts }
    }

    /// Resolve static tables against a brief.
    pub fn from_templates(parts: &[PartTemplate], brief: &Brief) -> Self {
        let parts = parts
            .iter()
            .map(|part| PartSpec {
                title: part.title.to_string(),
                sections: part
                    .sections
                    .iter()
                    .map(|s| SectionSpec {
                        title: s.title.to_string(),
                        query: render_template(s.query, brief, None),
                        template: s.instruction.to_string(),
                    })
                    .collect(),
            })
            .collect();
        Self { parts }
    }

    pub fn section_count(&self) -> usize {
        self.parts.iter().map(|p| p.sections.len()).sum()
    }
}

/// Substitute placeholders in one pass, so substituted text is never rescanned.
fn render_template(template: &str, brief: &Brief, prompt: Option<(&str, &str)>) -> String {
    static PLACEHOLDER_RE: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r"\{([a-z_]+)\}").expect("valid regex"));

    PLACEHOLDER_RE
        .replace_all(template, |caps: &Captures| {
            let name = &caps[1];
            if let Some(field) = BriefField::from_placeholder(name) {
                return brief.get(field).to_string();
            }
            match (name, prompt) {
                ("sources", Some((sources, _))) => sources.to_string(),
                ("context", Some((_, context))) => context.to_string(),
                _ => caps[0].to_string(),
            }
        })
        .into_owned()
}
