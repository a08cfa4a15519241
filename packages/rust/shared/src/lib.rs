//! Shared types, error model, and configuration for Scribe.
//!
//! This crate is the foundation depended on by all other Scribe crates.
//! It provides:
//! - [`ScribeError`]: the unified error type
//! - Domain types ([`Source`], [`Language`], [`RunId`])
//! - Configuration ([`AppConfig`], [`Credentials`], config loading)

pub mod config;
pub mod error;
pub mod types;

// Re-export public API at crate root for ergonomic imports.
pub use config::{
    AppConfig, Credentials, GenerationConfig, SearchConfig, WritingConfig, config_dir,
    config_file_path, init_config, load_config, load_config_from, load_dotenv,
};
pub use error::{Result, ScribeError};
pub use types::{Language, RunId, Source};
