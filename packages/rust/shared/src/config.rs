//! Application configuration for Scribe.
//!
//! User config lives at `~/.scribe/scribe.toml`.
//! CLI flags override config file values, which override defaults.
//! Secrets never live in the file: it only names the environment variables
//! that hold them.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Result, ScribeError};

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "scribe.toml";

/// Default config directory name under the user's home.
const CONFIG_DIR_NAME: &str = ".scribe";

// ---------------------------------------------------------------------------
// Config structs (matching scribe.toml schema)
// ---------------------------------------------------------------------------

/// Top-level application config, deserialized from TOML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Generation service settings.
    #[serde(default)]
    pub generation: GenerationConfig,

    /// Search service settings.
    #[serde(default)]
    pub search: SearchConfig,

    /// Document assembly and export settings.
    #[serde(default)]
    pub writing: WritingConfig,
}

/// `[generation]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationConfig {
    /// Name of the env var holding the generation API key.
    #[serde(default = "default_generation_key_env")]
    pub api_key_env: String,

    /// Model resource name.
    #[serde(default = "default_model")]
    pub model: String,

    /// Base URL of the generation REST API.
    #[serde(default = "default_generation_base_url")]
    pub base_url: String,

    /// Pause after every successful call, in seconds.
    /// Use 2 with billing enabled, ~35 on the free tier.
    #[serde(default = "default_rate_limit_pause")]
    pub rate_limit_pause_secs: u64,

    /// Attempts per call before giving up on quota errors.
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// Base of the exponential backoff (`base * 2^attempt`), in seconds.
    #[serde(default = "default_backoff_base")]
    pub backoff_base_secs: u64,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            api_key_env: default_generation_key_env(),
            model: default_model(),
            base_url: default_generation_base_url(),
            rate_limit_pause_secs: default_rate_limit_pause(),
            max_retries: default_max_retries(),
            backoff_base_secs: default_backoff_base(),
        }
    }
}

fn default_generation_key_env() -> String {
    "GEMINI_API_KEY".into()
}
fn default_model() -> String {
    "models/gemini-2.5-pro".into()
}
fn default_generation_base_url() -> String {
    "https://generativelanguage.googleapis.com/v1beta".into()
}
fn default_rate_limit_pause() -> u64 {
    2
}
fn default_max_retries() -> u32 {
    3
}
fn default_backoff_base() -> u64 {
    5
}

/// `[search]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Name of the env var holding the search API key.
    /// Falls back to the generation key when unset.
    #[serde(default = "default_search_key_env")]
    pub api_key_env: String,

    /// Name of the env var holding the search engine identifier.
    #[serde(default = "default_engine_id_env")]
    pub engine_id_env: String,

    /// Search endpoint.
    #[serde(default = "default_search_base_url")]
    pub base_url: String,

    /// Interface language passed to the provider.
    #[serde(default = "default_language")]
    pub language: String,

    /// Results requested per outline section.
    #[serde(default = "default_max_results")]
    pub max_results: u32,

    /// Pause after a failed lookup, in seconds.
    #[serde(default = "default_error_pause")]
    pub error_pause_secs: u64,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            api_key_env: default_search_key_env(),
            engine_id_env: default_engine_id_env(),
            base_url: default_search_base_url(),
            language: default_language(),
            max_results: default_max_results(),
            error_pause_secs: default_error_pause(),
        }
    }
}

fn default_search_key_env() -> String {
    "GOOGLE_SEARCH_API_KEY".into()
}
fn default_engine_id_env() -> String {
    "SEARCH_ENGINE_ID".into()
}
fn default_search_base_url() -> String {
    "https://www.googleapis.com/customsearch/v1".into()
}
fn default_language() -> String {
    "pt-BR".into()
}
fn default_max_results() -> u32 {
    6
}
fn default_error_pause() -> u64 {
    2
}

/// `[writing]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WritingConfig {
    /// Trailing context exposed to section prompts, in characters.
    /// Unset means the writing profile's default.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context_window_chars: Option<usize>,

    /// Trailing slice of a finished part shown to the reviewer, in characters.
    /// Unset means the writing profile's default.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub review_window_chars: Option<usize>,

    /// Upper bound of one translation chunk, in characters.
    #[serde(default = "default_chunk_chars")]
    pub translation_chunk_chars: usize,

    /// Directory receiving checkpoints and final documents.
    #[serde(default = "default_output_dir")]
    pub output_dir: String,

    /// External converter program for the rich document.
    #[serde(default = "default_converter")]
    pub converter: String,

    /// Extension (and converter target format) of the rich document.
    #[serde(default = "default_rich_format")]
    pub rich_format: String,
}

impl Default for WritingConfig {
    fn default() -> Self {
        Self {
            context_window_chars: None,
            review_window_chars: None,
            translation_chunk_chars: default_chunk_chars(),
            output_dir: default_output_dir(),
            converter: default_converter(),
            rich_format: default_rich_format(),
        }
    }
}

fn default_chunk_chars() -> usize {
    4_000
}
fn default_output_dir() -> String {
    ".".into()
}
fn default_converter() -> String {
    "pandoc".into()
}
fn default_rich_format() -> String {
    "docx".into()
}

// ---------------------------------------------------------------------------
// Credentials (resolved once at startup)
// ---------------------------------------------------------------------------

/// Secrets resolved from the environment at process start.
#[derive(Clone)]
pub struct Credentials {
    /// Generation service API key.
    pub generation_api_key: String,
    /// Search service API key.
    pub search_api_key: String,
    /// Search engine identifier.
    pub search_engine_id: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("generation_api_key", &"<redacted>")
            .field("search_api_key", &"<redacted>")
            .field("search_engine_id", &self.search_engine_id)
            .finish()
    }
}

impl Credentials {
    /// Read credentials from the process environment.
    pub fn from_env(config: &AppConfig) -> Result<Self> {
        Self::resolve(config, |name| std::env::var(name).ok())
    }

    /// Resolve credentials through an arbitrary variable lookup.
    pub fn resolve(config: &AppConfig, lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let read = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let generation_var = &config.generation.api_key_env;
        let engine_var = &config.search.engine_id_env;

        let (Some(generation_api_key), Some(search_engine_id)) =
            (read(generation_var), read(engine_var))
        else {
            return Err(ScribeError::config(format!(
                "API key or search engine ID not found. \
                 Set {generation_var} and {engine_var} (a .env file in the working directory works too)."
            )));
        };

        let search_api_key =
            read(&config.search.api_key_env).unwrap_or_else(|| generation_api_key.clone());

        Ok(Self {
            generation_api_key,
            search_api_key,
            search_engine_id,
        })
    }
}

/// Load `.env` from the working directory into the process environment, if present.
pub fn load_dotenv() {
    match dotenvy::dotenv() {
        Ok(path) => tracing::debug!(?path, "loaded .env"),
        Err(e) if e.not_found() => tracing::debug!(".env not found, using process environment"),
        Err(e) => tracing::warn!(error = %e, "failed to parse .env"),
    }
}

// ---------------------------------------------------------------------------
// Config loading
// ---------------------------------------------------------------------------

/// Get the path to the config directory (`~/.scribe/`).
pub fn config_dir() -> Result<PathBuf> {
    let home =
        dirs::home_dir().ok_or_else(|| ScribeError::config("could not determine home directory"))?;
    Ok(home.join(CONFIG_DIR_NAME))
}

/// Get the path to the config file (`~/.scribe/scribe.toml`).
pub fn config_file_path() -> Result<PathBuf> {
    Ok(config_dir()?.join(CONFIG_FILE_NAME))
}

/// Load the application config from disk. Returns defaults if the file does not exist.
pub fn load_config() -> Result<AppConfig> {
    let path = config_file_path()?;

    if !path.exists() {
        tracing::debug!(?path, "config file not found, using defaults");
        return Ok(AppConfig::default());
    }

    load_config_from(&path)
}

/// Load the application config from a specific file path.
pub fn load_config_from(path: &Path) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path).map_err(|e| ScribeError::io(path, e))?;

    toml::from_str(&content)
        .map_err(|e| ScribeError::config(format!("failed to parse {}: {e}", path.display())))
}

/// Create the config directory and write a default config file.
/// Returns the path to the created file.
pub fn init_config() -> Result<PathBuf> {
    let dir = config_dir()?;
    std::fs::create_dir_all(&dir).map_err(|e| ScribeError::io(&dir, e))?;

    let path = dir.join(CONFIG_FILE_NAME);
    let content = toml::to_string_pretty(&AppConfig::default())
        .map_err(|e| ScribeError::config(e.to_string()))?;

    std::fs::write(&path, content).map_err(|e| ScribeError::io(&path, e))?;
    tracing::info!(?path, "created default config file");

    Ok(path)
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn env(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect()
    }

    #[test]
    fn default_config_serializes() {
        let toml_str = toml::to_string_pretty(&AppConfig::default()).expect("serialize");
        assert!(toml_str.contains("GEMINI_API_KEY"));
        assert!(toml_str.contains("SEARCH_ENGINE_ID"));
        assert!(toml_str.contains("translation_chunk_chars"));
    }

    #[test]
    fn window_sizes_are_optional() {
        let unset: AppConfig = toml::from_str("[writing]\noutput_dir = \"out\"\n").expect("parse");
        assert_eq!(unset.writing.context_window_chars, None);
        assert_eq!(unset.writing.review_window_chars, None);

        let set: AppConfig =
            toml::from_str("[writing]\ncontext_window_chars = 1200\n").expect("parse");
        assert_eq!(set.writing.context_window_chars, Some(1_200));
        assert_eq!(set.writing.review_window_chars, None);
    }

    #[test]
    fn config_roundtrip_keeps_defaults() {
        let toml_str = toml::to_string_pretty(&AppConfig::default()).expect("serialize");
        let parsed: AppConfig = toml::from_str(&toml_str).expect("deserialize");
        assert_eq!(parsed.generation.max_retries, 3);
        assert_eq!(parsed.generation.rate_limit_pause_secs, 2);
        assert_eq!(parsed.search.language, "pt-BR");
        assert_eq!(parsed.writing.translation_chunk_chars, 4_000);
    }

    #[test]
    fn partial_config_fills_defaults() {
        let toml_str = r#"
[generation]
model = "models/gemini-2.5-flash"
rate_limit_pause_secs = 35

[writing]
output_dir = "/tmp/scribe"
"#;
        let config: AppConfig = toml::from_str(toml_str).expect("parse");
        assert_eq!(config.generation.model, "models/gemini-2.5-flash");
        assert_eq!(config.generation.rate_limit_pause_secs, 35);
        assert_eq!(config.generation.backoff_base_secs, 5);
        assert_eq!(config.search.max_results, 6);
        assert_eq!(config.writing.output_dir, "/tmp/scribe");
        assert_eq!(config.writing.converter, "pandoc");
    }

    #[test]
    fn credentials_require_generation_key_and_engine_id() {
        let config = AppConfig::default();

        let vars = env(&[("SEARCH_ENGINE_ID", "cx-1")]);
        let err = Credentials::resolve(&config, |k| vars.get(k).cloned()).unwrap_err();
        assert!(err.to_string().contains("GEMINI_API_KEY"));

        let vars = env(&[("GEMINI_API_KEY", "key-1"), ("SEARCH_ENGINE_ID", "  ")]);
        assert!(Credentials::resolve(&config, |k| vars.get(k).cloned()).is_err());
    }

    #[test]
    fn search_key_falls_back_to_generation_key() {
        let config = AppConfig::default();
        let vars = env(&[("GEMINI_API_KEY", "key-1"), ("SEARCH_ENGINE_ID", "cx-1")]);
        let creds = Credentials::resolve(&config, |k| vars.get(k).cloned()).expect("resolve");
        assert_eq!(creds.search_api_key, "key-1");
        assert_eq!(creds.search_engine_id, "cx-1");

        let vars = env(&[
            ("GEMINI_API_KEY", "key-1"),
            ("SEARCH_ENGINE_ID", "cx-1"),
            ("GOOGLE_SEARCH_API_KEY", "search-key"),
        ]);
        let creds = Credentials::resolve(&config, |k| vars.get(k).cloned()).expect("resolve");
        assert_eq!(creds.search_api_key, "search-key");
    }

    #[test]
    fn credentials_debug_redacts_keys() {
        let creds = Credentials {
            generation_api_key: "secret-gen".into(),
            search_api_key: "secret-search".into(),
            search_engine_id: "cx-1".into(),
        };
        let debug = format!("{creds:?}");
        assert!(!debug.contains("secret"));
        assert!(debug.contains("cx-1"));
    }
}
