//! Web source lookup for section prompts.
//!
//! Every outline section is enriched with a handful of search hits. A failed
//! or empty lookup is never fatal: callers get `None` and substitute the
//! [`NO_SOURCES`] sentinel, so one bad search cannot abort a document.

mod format;

use std::future::Future;
use std::time::Duration;

use reqwest::Client;
use scribe_shared::{Credentials, Result, ScribeError, SearchConfig, Source};
use tracing::{debug, info, instrument, warn};
use url::Url;

pub use format::{NO_SOURCES, format_sources};

/// Provider limit on results per call.
pub const MAX_RESULTS_PER_CALL: u32 = 10;

/// User-Agent string for search requests.
const USER_AGENT: &str = concat!("Scribe/", env!("CARGO_PKG_VERSION"));

// ---------------------------------------------------------------------------
// Lookup seam
// ---------------------------------------------------------------------------

/// Anything that can turn a query into a bounded list of sources.
///
/// Implementations swallow their own errors: `None` means "nothing usable".
pub trait SourceLookup: Send + Sync {
    fn lookup(
        &self,
        query: &str,
        max_results: u32,
    ) -> impl Future<Output = Option<Vec<Source>>> + Send;
}

// ---------------------------------------------------------------------------
// Google Custom Search client
// ---------------------------------------------------------------------------

/// Resolved settings for [`GoogleSearchClient`].
#[derive(Debug, Clone)]
pub struct SearchSettings {
    pub base_url: Url,
    pub api_key: String,
    pub engine_id: String,
    /// Interface language (`hl`).
    pub language: String,
    /// Pause after a failed request.
    pub error_pause: Duration,
}

impl SearchSettings {
    /// Build settings from the `[search]` config section and resolved credentials.
    pub fn new(config: &SearchConfig, credentials: &Credentials) -> Result<Self> {
        let base_url = Url::parse(&config.base_url).map_err(|e| {
            ScribeError::config(format!("invalid search base_url '{}': {e}", config.base_url))
        })?;

        Ok(Self {
            base_url,
            api_key: credentials.search_api_key.clone(),
            engine_id: credentials.search_engine_id.clone(),
            language: config.language.clone(),
            error_pause: Duration::from_secs(config.error_pause_secs),
        })
    }
}

/// Client for the Google Custom Search JSON API.
pub struct GoogleSearchClient {
    client: Client,
    settings: SearchSettings,
}

#[derive(Debug, serde::Deserialize)]
struct SearchResponse {
    #[serde(default)]
    items: Vec<SearchItem>,
}

#[derive(Debug, serde::Deserialize)]
struct SearchItem {
    #[serde(default)]
    title: String,
    #[serde(default)]
    link: String,
    #[serde(default)]
    snippet: String,
}

impl GoogleSearchClient {
    /// Build a client. No request timeout is configured at this layer.
    pub fn new(settings: SearchSettings) -> Result<Self> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| ScribeError::Network(format!("failed to build HTTP client: {e}")))?;

        Ok(Self { client, settings })
    }

    /// Run one search request and map its items to sources.
    async fn search(&self, query: &str, num: u32) -> Result<Vec<Source>> {
        let num = num.to_string();
        let response = self
            .client
            .get(self.settings.base_url.clone())
            .query(&[
                ("key", self.settings.api_key.as_str()),
                ("cx", self.settings.engine_id.as_str()),
                ("q", query),
                ("num", num.as_str()),
                ("hl", self.settings.language.as_str()),
            ])
            .send()
            .await
            .map_err(|e| ScribeError::Network(format!("search request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ScribeError::Network(format!("search HTTP {status}: {body}")));
        }

        let parsed: SearchResponse = response
            .json()
            .await
            .map_err(|e| ScribeError::validation(format!("invalid search response: {e}")))?;

        Ok(parsed
            .items
            .into_iter()
            .map(|item| Source {
                title: item.title,
                url: item.link,
                snippet: item.snippet,
            })
            .collect())
    }
}

impl SourceLookup for GoogleSearchClient {
    #[instrument(skip_all, fields(query = %query, max_results = max_results))]
    async fn lookup(&self, query: &str, max_results: u32) -> Option<Vec<Source>> {
        let query = query.trim();
        if query.is_empty() {
            warn!("empty lookup query, skipping search");
            return None;
        }

        let num = max_results.clamp(1, MAX_RESULTS_PER_CALL);
        info!(num, "searching for sources");

        match self.search(query, num).await {
            Ok(sources) if sources.is_empty() => {
                warn!("no sources found");
                None
            }
            Ok(sources) => {
                info!(count = sources.len(), "sources found");
                Some(sources)
            }
            Err(e) => {
                warn!(error = %e, "search failed, continuing without sources");
                debug!(pause_secs = self.settings.error_pause.as_secs(), "pausing after search error");
                tokio::time::sleep(self.settings.error_pause).await;
                None
            }
        }
    }
}
