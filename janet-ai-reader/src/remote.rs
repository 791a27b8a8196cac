//! Line-range finder backed by an OpenAI-compatible chat completions API.

use crate::config::ReaderConfig;
use crate::error::{ReaderError, Result};
use crate::finder::{LineRangeFinder, build_prompt, parse_line_ranges};
use async_trait::async_trait;
use janet_ai_chunks::{FileRef, LineRange};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

/// Asks a hosted model which lines of a file answer a query.
///
/// One request per call, with a strict JSON schema response format. HTTP and
/// parsing failures are returned as-is; there is no retry or backoff here.
#[derive(Clone)]
pub struct RemoteRangeFinder {
    client: Client,
    config: ReaderConfig,
    api_key: Option<String>,
}

impl std::fmt::Debug for RemoteRangeFinder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RemoteRangeFinder")
            .field("endpoint", &self.config.completions_url())
            .field("model", &self.config.model)
            .field("api_key", &self.api_key.is_some())
            .finish()
    }
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ChatResponseMessage {
    content: Option<String>,
}

impl RemoteRangeFinder {
    pub fn new(config: ReaderConfig) -> Result<Self> {
        config.validate()?;
        let client = Client::builder()
            .timeout(config.request_timeout())
            .build()?;
        let api_key = config.resolve_api_key();
        if api_key.is_none() {
            tracing::warn!(
                "No API key configured for {}; sending unauthenticated requests",
                config.api_base
            );
        }
        Ok(Self {
            client,
            config,
            api_key,
        })
    }

    pub fn config(&self) -> &ReaderConfig {
        &self.config
    }

    /// JSON body sent to the completions endpoint.
    pub fn request_body(&self, file: &FileRef, query: &str) -> Value {
        let system = build_prompt(file, self.config.max_prompt_tokens);
        let messages = [
            ChatMessage {
                role: "system",
                content: &system,
            },
            ChatMessage {
                role: "user",
                content: query,
            },
        ];
        json!({
            "model": self.config.model,
            "messages": messages,
            "response_format": {
                "type": "json_schema",
                "json_schema": {
                    "name": "find_code_response",
                    "strict": true,
                    "schema": response_schema(),
                },
            },
        })
    }
}

/// Schema of the expected answer: `{"line_ranges": [{"start": n, "end": n}, ...]}`.
pub fn response_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "line_ranges": {
                "type": "array",
                "description": "List of line ranges that contain the relevant code.",
                "items": {
                    "type": "object",
                    "properties": {
                        "start": {
                            "type": "integer",
                            "description": "Starting line number (inclusive).",
                        },
                        "end": {
                            "type": "integer",
                            "description": "Ending line number (inclusive).",
                        },
                    },
                    "required": ["start", "end"],
                    "additionalProperties": false,
                },
            },
        },
        "required": ["line_ranges"],
        "additionalProperties": false,
    })
}

/// Extract the assistant message from a completions response and parse it.
pub fn parse_completion(body: &str) -> Result<Vec<LineRange>> {
    let response: ChatResponse = serde_json::from_str(body)
        .map_err(|e| ReaderError::malformed(format!("unexpected completion payload: {e}")))?;
    let content = response
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .ok_or_else(|| ReaderError::malformed("completion has no message content"))?;
    parse_line_ranges(&content)
}

#[async_trait]
impl LineRangeFinder for RemoteRangeFinder {
    async fn find_line_ranges(&self, file: &FileRef, query: &str) -> Result<Vec<LineRange>> {
        let url = self.config.completions_url();
        tracing::debug!(
            "Requesting line ranges for {} from {} ({})",
            file.relative_path,
            url,
            self.config.model
        );

        let mut request = self.client.post(&url).json(&self.request_body(file, query));
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request.send().await?;
        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            tracing::warn!("Model request to {} failed: {}", url, status);
            return Err(ReaderError::ModelRequest {
                status: status.as_u16(),
                body,
            });
        }

        let ranges = parse_completion(&body)?;
        tracing::debug!(
            "Model returned {} line ranges for {}",
            ranges.len(),
            file.relative_path
        );
        Ok(ranges)
    }
}
