//! In-process fakes for the orchestrator's seams.

use std::collections::{HashMap, VecDeque};
use std::path::PathBuf;
use std::sync::Mutex;
use std::time::Duration;

use scribe_export::ExportedDocument;
use scribe_generation::{GenerateError, GenerationClient, RetryPolicy, TextGenerator};
use scribe_search::SourceLookup;
use scribe_shared::{Result, ScribeError, Source};

use crate::operator::Operator;
use crate::sink::DocumentSink;

/// Client with no pauses and no backoff.
pub fn quick_client<G: TextGenerator>(generator: G) -> GenerationClient<G> {
    GenerationClient::new(
        generator,
        RetryPolicy {
            max_retries: 3,
            backoff_base: Duration::ZERO,
            rate_limit_pause: Duration::ZERO,
        },
    )
}

pub fn source(title: &str, url: &str) -> Source {
    Source {
        title: title.into(),
        url: url.into(),
        snippet: format!("about {title}"),
    }
}

/// Answers every prompt with `generated N`, recording prompts.
#[derive(Default)]
pub struct EchoGenerator {
    prompts: Mutex<Vec<String>>,
    fail_with: Option<String>,
}

impl EchoGenerator {
    pub fn failing(detail: &str) -> Self {
        Self {
            prompts: Mutex::new(Vec::new()),
            fail_with: Some(detail.into()),
        }
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

impl TextGenerator for EchoGenerator {
    async fn generate_text(&self, prompt: &str) -> std::result::Result<String, GenerateError> {
        let mut prompts = self.prompts.lock().unwrap();
        prompts.push(prompt.to_string());
        match &self.fail_with {
            Some(detail) => Err(GenerateError::Other(detail.clone())),
            None => Ok(format!("generated {}", prompts.len())),
        }
    }
}

/// Lookup returning canned results per query; unknown queries find nothing.
#[derive(Default)]
pub struct FakeLookup {
    results: HashMap<String, Vec<Source>>,
    calls: Mutex<Vec<(String, u32)>>,
}

impl FakeLookup {
    pub fn with(mut self, query: &str, sources: Vec<Source>) -> Self {
        self.results.insert(query.to_string(), sources);
        self
    }

    pub fn calls(&self) -> Vec<(String, u32)> {
        self.calls.lock().unwrap().clone()
    }
}

impl SourceLookup for FakeLookup {
    async fn lookup(&self, query: &str, max_results: u32) -> Option<Vec<Source>> {
        self.calls
            .lock()
            .unwrap()
            .push((query.to_string(), max_results));
        self.results.get(query).cloned()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavedDocument {
    pub base_name: String,
    pub subject: String,
    pub content: String,
}

/// Sink recording every save instead of touching the filesystem.
#[derive(Default)]
pub struct RecordingSink {
    saves: Mutex<Vec<SavedDocument>>,
    fail: bool,
}

impl RecordingSink {
    pub fn failing() -> Self {
        Self {
            saves: Mutex::new(Vec::new()),
            fail: true,
        }
    }

    pub fn saves(&self) -> Vec<SavedDocument> {
        self.saves.lock().unwrap().clone()
    }
}

impl DocumentSink for RecordingSink {
    fn save(&self, base_name: &str, subject: &str, content: &str) -> Result<ExportedDocument> {
        self.saves.lock().unwrap().push(SavedDocument {
            base_name: base_name.into(),
            subject: subject.into(),
            content: content.into(),
        });
        if self.fail {
            return Err(ScribeError::Export("disk full".into()));
        }
        Ok(ExportedDocument {
            markdown_path: PathBuf::from(format!("{base_name}.md")),
            rich_path: None,
            size_bytes: content.len(),
            sha256: String::new(),
        })
    }
}

/// Operator replaying scripted answers and recording everything shown.
#[derive(Default)]
pub struct ScriptedOperator {
    answers: VecDeque<String>,
    pub questions: Vec<String>,
    pub notices: Vec<String>,
    pub shown: Vec<(String, String)>,
}

impl ScriptedOperator {
    pub fn new<'a>(answers: impl IntoIterator<Item = &'a str>) -> Self {
        Self {
            answers: answers.into_iter().map(String::from).collect(),
            ..Self::default()
        }
    }
}

impl Operator for ScriptedOperator {
    async fn ask(&mut self, prompt: &str) -> Result<String> {
        self.questions.push(prompt.to_string());
        self.answers
            .pop_front()
            .ok_or_else(|| ScribeError::Input("input closed".into()))
    }

    fn notice(&mut self, message: &str) {
        self.notices.push(message.to_string());
    }

    fn show(&mut self, heading: &str, body: &str) {
        self.shown.push((heading.to_string(), body.to_string()));
    }
}
