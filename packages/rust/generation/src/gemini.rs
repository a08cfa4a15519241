//! Gemini REST backend.
//!
//! `POST {base_url}/{model}:generateContent` with the key in the
//! `x-goog-api-key` header. HTTP 429 and `RESOURCE_EXHAUSTED` bodies are
//! classified as quota failures; everything else is non-retryable.

use reqwest::{Client, StatusCode};
use scribe_shared::{Credentials, GenerationConfig, Result, ScribeError};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::error::GenerateError;
use crate::TextGenerator;

/// User-Agent string for generation requests.
const USER_AGENT: &str = concat!("Scribe/", env!("CARGO_PKG_VERSION"));

/// Header carrying the API key.
const API_KEY_HEADER: &str = "x-goog-api-key";

/// Generation method a model must support to be listed.
const GENERATE_METHOD: &str = "generateContent";

/// Connection settings for [`GeminiClient`].
#[derive(Clone)]
pub struct GeminiSettings {
    /// API root, e.g. `https://generativelanguage.googleapis.com/v1beta`.
    pub base_url: String,
    /// Model resource name, e.g. `models/gemini-2.5-pro`.
    pub model: String,
    pub api_key: String,
}

impl GeminiSettings {
    /// Build settings from the `[generation]` config section and resolved credentials.
    pub fn new(config: &GenerationConfig, credentials: &Credentials) -> Self {
        Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model: normalize_model(&config.model),
            api_key: credentials.generation_api_key.clone(),
        }
    }
}

/// Accept both `gemini-2.5-pro` and `models/gemini-2.5-pro`.
fn normalize_model(model: &str) -> String {
    if model.starts_with("models/") {
        model.to_string()
    } else {
        format!("models/{model}")
    }
}

// ---------------------------------------------------------------------------
// Wire types
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    contents: Vec<Content<'a>>,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    role: &'static str,
    parts: Vec<Part<'a>>,
}

#[derive(Debug, Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    #[serde(default)]
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    #[serde(default)]
    content: Option<CandidateContent>,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    #[serde(default)]
    block_reason: Option<String>,
}

/// One entry of the model catalogue.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelInfo {
    pub name: String,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub supported_generation_methods: Vec<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ModelPage {
    #[serde(default)]
    models: Vec<ModelInfo>,
    #[serde(default)]
    next_page_token: Option<String>,
}

// ---------------------------------------------------------------------------
// Client
// ---------------------------------------------------------------------------

/// HTTP client for the Gemini API.
pub struct GeminiClient {
    client: Client,
    settings: GeminiSettings,
}

impl GeminiClient {
    /// Build a client. No request timeout is configured at this layer.
    pub fn new(settings: GeminiSettings) -> Result<Self> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| ScribeError::Network(format!("failed to build HTTP client: {e}")))?;

        Ok(Self { client, settings })
    }

    /// Model resource name used for generation.
    pub fn model(&self) -> &str {
        &self.settings.model
    }

    /// List the models this key can use for `generateContent`.
    #[instrument(skip_all)]
    pub async fn list_models(&self) -> Result<Vec<ModelInfo>> {
        let url = format!("{}/models", self.settings.base_url);
        let mut models = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let mut request = self
                .client
                .get(&url)
                .header(API_KEY_HEADER, &self.settings.api_key)
                .query(&[("pageSize", "1000")]);
            if let Some(token) = &page_token {
                request = request.query(&[("pageToken", token.as_str())]);
            }

            let response = request
                .send()
                .await
                .map_err(|e| ScribeError::Network(format!("{url}: {e}")))?;

            let status = response.status();
            if !status.is_success() {
                let body = response.text().await.unwrap_or_default();
                return Err(ScribeError::Network(format!("{url}: HTTP {status}: {body}")));
            }

            let page: ModelPage = response
                .json()
                .await
                .map_err(|e| ScribeError::validation(format!("invalid model list: {e}")))?;

            models.extend(page.models.into_iter().filter(|m| {
                m.supported_generation_methods
                    .iter()
                    .any(|method| method == GENERATE_METHOD)
            }));

            match page.next_page_token {
                Some(token) if !token.is_empty() => page_token = Some(token),
                _ => break,
            }
        }

        debug!(count = models.len(), "listed generation models");
        Ok(models)
    }
}

impl TextGenerator for GeminiClient {
    #[instrument(skip_all, fields(model = %self.settings.model, prompt_chars = prompt.len()))]
    async fn generate_text(&self, prompt: &str) -> std::result::Result<String, GenerateError> {
        let url = format!("{}/{}:generateContent", self.settings.base_url, self.settings.model);
        let request = GenerateRequest {
            contents: vec![Content {
                role: "user",
                parts: vec![Part { text: prompt }],
            }],
        };

        let response = self
            .client
            .post(&url)
            .header(API_KEY_HEADER, &self.settings.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| GenerateError::Other(format!("request failed: {e}")))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| GenerateError::Other(format!("failed to read response body: {e}")))?;

        if !status.is_success() {
            return Err(classify_failure(status, &body));
        }

        let parsed: GenerateResponse = serde_json::from_str(&body)
            .map_err(|e| GenerateError::Other(format!("invalid generation response: {e}")))?;

        extract_text(parsed)
    }
}

/// Map a non-success response to a retryable or terminal failure.
fn classify_failure(status: StatusCode, body: &str) -> GenerateError {
    let message = format!("HTTP {status}: {body}");
    if status == StatusCode::TOO_MANY_REQUESTS || body.contains("RESOURCE_EXHAUSTED") {
        GenerateError::quota(message)
    } else {
        GenerateError::Other(message)
    }
}

/// Concatenate the text parts of the first candidate.
fn extract_text(response: GenerateResponse) -> std::result::Result<String, GenerateError> {
    if let Some(reason) = response.prompt_feedback.and_then(|f| f.block_reason) {
        return Err(GenerateError::Other(format!("prompt blocked: {reason}")));
    }

    let Some(candidate) = response.candidates.into_iter().next() else {
        return Err(GenerateError::Other("response contained no candidates".into()));
    };

    let text: String = candidate
        .content
        .map(|c| c.parts.into_iter().filter_map(|p| p.text).collect())
        .unwrap_or_default();

    if text.trim().is_empty() {
        let reason = candidate.finish_reason.unwrap_or_else(|| "unknown".into());
        return Err(GenerateError::Other(format!(
            "response contained no text (finish reason: {reason})"
        )));
    }

    Ok(text)
}

#[cfg(test)]
mod tests {
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    fn client_for(server: &MockServer) -> GeminiClient {
        GeminiClient::new(GeminiSettings {
            base_url: server.uri(),
            model: "models/test-model".into(),
            api_key: "test-key".into(),
        })
        .unwrap()
    }

    #[test]
    fn model_names_are_normalized() {
        assert_eq!(normalize_model("gemini-2.5-pro"), "models/gemini-2.5-pro");
        assert_eq!(normalize_model("models/gemini-2.5-pro"), "models/gemini-2.5-pro");
    }

    #[tokio::test]
    async fn generate_joins_candidate_parts() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/models/test-model:generateContent"))
            .and(header("x-goog-api-key", "test-key"))
            .respond_with(ResponseTemplate::new(200).set_body_string(
                r#"{"candidates":[{"content":{"parts":[{"text":"Hello, "},{"text":"world"}]},"finishReason":"STOP"}]}"#,
            ))
            .expect(1)
            .mount(&server)
            .await;

        let text = client_for(&server).generate_text("say hi").await.unwrap();
        assert_eq!(text, "Hello, world");
    }

    #[tokio::test]
    async fn rate_limit_is_quota_with_hint() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(429).set_body_string(
                r#"{"error":{"code":429,"status":"RESOURCE_EXHAUSTED","details":[{"@type":"type.googleapis.com/google.rpc.RetryInfo","retryDelay": "37s"}]}}"#,
            ))
            .mount(&server)
            .await;

        match client_for(&server).generate_text("x").await {
            Err(GenerateError::Quota { retry_after, .. }) => assert_eq!(retry_after, Some(37)),
            other => panic!("expected Quota, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn rate_limit_without_hint() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(429).set_body_string("Too Many Requests"))
            .mount(&server)
            .await;

        match client_for(&server).generate_text("x").await {
            Err(GenerateError::Quota { retry_after, .. }) => assert_eq!(retry_after, None),
            other => panic!("expected Quota, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn bad_request_is_terminal() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(400).set_body_string("API key not valid"))
            .mount(&server)
            .await;

        match client_for(&server).generate_text("x").await {
            Err(GenerateError::Other(message)) => assert!(message.contains("API key not valid")),
            other => panic!("expected Other, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn empty_candidates_are_terminal() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_string(
                r#"{"candidates":[],"promptFeedback":{"blockReason":"SAFETY"}}"#,
            ))
            .mount(&server)
            .await;

        match client_for(&server).generate_text("x").await {
            Err(GenerateError::Other(message)) => assert!(message.contains("SAFETY")),
            other => panic!("expected Other, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn list_models_filters_by_method() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/models"))
            .respond_with(ResponseTemplate::new(200).set_body_string(
                r#"{"models":[
                    {"name":"models/gemini-2.5-pro","displayName":"Gemini 2.5 Pro","supportedGenerationMethods":["generateContent","countTokens"]},
                    {"name":"models/text-embedding-004","supportedGenerationMethods":["embedContent"]}
                ]}"#,
            ))
            .mount(&server)
            .await;

        let models = client_for(&server).list_models().await.unwrap();
        assert_eq!(models.len(), 1);
        assert_eq!(models[0].name, "models/gemini-2.5-pro");
        assert_eq!(models[0].display_name.as_deref(), Some("Gemini 2.5 Pro"));
    }
}
