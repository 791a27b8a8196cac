//! Configuration for the reader and its model endpoint

use crate::error::{ReaderError, Result};
use janet_ai_chunks::MAX_CHUNK_DISTANCE;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Environment variables consulted, in order, when no API key is configured.
pub const API_KEY_ENV_VARS: &[&str] = &["JANET_AI_API_KEY", "OPENAI_API_KEY"];

/// Default config file name looked up in the project root.
pub const CONFIG_FILE_NAME: &str = ".janet-ai-reader.toml";

/// Reader settings, usually loaded from a TOML file.
///
/// Every field has a default, so an empty file is a valid configuration:
///
/// ```toml
/// api_base = "http://localhost:8080/v1"
/// model = "qwen2.5-coder"
/// max_chunk_distance = 3
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ReaderConfig {
    /// Base URL of an OpenAI-compatible API (without `/chat/completions`)
    pub api_base: String,
    /// Bearer token; falls back to [`API_KEY_ENV_VARS`]
    pub api_key: Option<String>,
    /// Model identifier sent with each request
    pub model: String,
    /// Token budget (cl100k_base) for file content placed in the prompt
    pub max_prompt_tokens: usize,
    /// Omitted-line gap below which neighbouring chunks are merged
    pub max_chunk_distance: usize,
    /// Per-request timeout
    pub request_timeout_secs: u64,
}

impl Default for ReaderConfig {
    fn default() -> Self {
        Self {
            api_base: "https://api.openai.com/v1".to_string(),
            api_key: None,
            model: "gpt-4o-mini".to_string(),
            max_prompt_tokens: 40_000,
            max_chunk_distance: MAX_CHUNK_DISTANCE,
            request_timeout_secs: 60,
        }
    }
}

impl ReaderConfig {
    /// Load and validate a configuration file.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        let config = Self::from_toml_str(&text).map_err(|err| match err {
            ReaderError::ConfigParse { source, .. } => ReaderError::ConfigParse {
                path: path.to_path_buf(),
                source,
            },
            other => other,
        })?;
        tracing::debug!("Loaded reader config from {}", path.display());
        Ok(config)
    }

    /// Load `<root>/.janet-ai-reader.toml` when present, defaults otherwise.
    pub fn load_or_default(root: &Path) -> Result<Self> {
        let path = root.join(CONFIG_FILE_NAME);
        if path.is_file() {
            Self::load(&path)
        } else {
            tracing::debug!("No {} in {}, using defaults", CONFIG_FILE_NAME, root.display());
            Ok(Self::default())
        }
    }

    /// Parse and validate TOML text.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: Self = toml::from_str(text).map_err(|source| ReaderError::ConfigParse {
            path: "<inline>".into(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Reject settings that can't produce a working reader.
    pub fn validate(&self) -> Result<()> {
        if self.api_base.trim().is_empty() {
            return Err(ReaderError::invalid_config("api_base must not be empty"));
        }
        if !(self.api_base.starts_with("http://") || self.api_base.starts_with("https://")) {
            return Err(ReaderError::invalid_config(format!(
                "api_base must be an http(s) URL, got '{}'",
                self.api_base
            )));
        }
        if self.model.trim().is_empty() {
            return Err(ReaderError::invalid_config("model must not be empty"));
        }
        if self.max_prompt_tokens == 0 {
            return Err(ReaderError::invalid_config(
                "max_prompt_tokens must be greater than zero",
            ));
        }
        if self.request_timeout_secs == 0 {
            return Err(ReaderError::invalid_config(
                "request_timeout_secs must be greater than zero",
            ));
        }
        Ok(())
    }

    /// The configured API key, or the first one found in the environment.
    pub fn resolve_api_key(&self) -> Option<String> {
        self.api_key.clone().or_else(|| {
            API_KEY_ENV_VARS
                .iter()
                .find_map(|var| std::env::var(var).ok().filter(|v| !v.is_empty()))
        })
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Full URL of the chat completions endpoint.
    pub fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.api_base.trim_end_matches('/'))
    }

    /// Set the API base URL (builder style)
    pub fn with_api_base<S: Into<String>>(self, api_base: S) -> Self {
        Self {
            api_base: api_base.into(),
            ..self
        }
    }

    /// Set the API key (builder style)
    pub fn with_api_key<S: Into<String>>(self, api_key: S) -> Self {
        Self {
            api_key: Some(api_key.into()),
            ..self
        }
    }

    /// Set the model (builder style)
    pub fn with_model<S: Into<String>>(self, model: S) -> Self {
        Self {
            model: model.into(),
            ..self
        }
    }

    /// Set the prompt token budget (builder style)
    pub fn with_max_prompt_tokens(self, max_prompt_tokens: usize) -> Self {
        Self {
            max_prompt_tokens,
            ..self
        }
    }

    /// Set the merge distance (builder style)
    pub fn with_max_chunk_distance(self, max_chunk_distance: usize) -> Self {
        Self {
            max_chunk_distance,
            ..self
        }
    }
}
