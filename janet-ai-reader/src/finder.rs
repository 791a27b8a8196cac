//! Line-range finders: whatever decides which lines of a file answer a query.
//!
//! The real implementation asks a language model (see [`crate::remote`]). This
//! module holds the trait, the prompt, and the parsing of model output, which
//! is forgiving about formatting but strict about structure.

use crate::error::{ReaderError, Result};
use crate::tokens::truncate_file_content;
use async_trait::async_trait;
use janet_ai_chunks::{FileRef, LineRange};
use regex::Regex;
use serde::Deserialize;
use serde_json::Value;
use std::sync::{Arc, Mutex, OnceLock};

/// Finds the line ranges of a file that are relevant to a query.
///
/// Ranges are inclusive and 1-based. An empty list is a valid answer meaning
/// nothing relevant was found. Implementations should not retry; callers decide.
#[async_trait]
pub trait LineRangeFinder: Send + Sync {
    async fn find_line_ranges(&self, file: &FileRef, query: &str) -> Result<Vec<LineRange>>;
}

const PROMPT_TEMPLATE: &str = r#"You are given the code file {path}. Each line is prefixed with its line number.

<code>
{content}
</code>

Find every part of this file that is relevant to the user's query.

<rules>
- Answer with a list of line ranges that contain the relevant code.
- Only use line numbers that appear in the file above.
- Ranges are inclusive: {"start": 12, "end": 15} covers lines 12, 13, 14 and 15.
- If nothing is relevant, answer with an empty list.
</rules>

<examples>
Q: Where is the database connection set up?
A: {"line_ranges": [{"start": 12, "end": 15}]}

Q: Cache eviction logic
A: {"line_ranges": [{"start": 486, "end": 501}, {"start": 520, "end": 560}]}

Q: Training loop implementation
A: {"line_ranges": []}
</examples>
"#;

/// Build the system prompt for `file`, keeping its content within `max_tokens`.
pub fn build_prompt(file: &FileRef, max_tokens: usize) -> String {
    let content = truncate_file_content(&file.content, max_tokens);
    PROMPT_TEMPLATE
        .replacen("{path}", &file.relative_path, 1)
        .replacen("{content}", &number_lines(content), 1)
}

/// Prefix every line with its 1-based number, right-aligned.
pub fn number_lines(content: &str) -> String {
    let total = content.lines().count();
    let width = total.max(1).to_string().len();
    content
        .lines()
        .enumerate()
        .map(|(idx, line)| format!("{:>width$} | {}", idx + 1, line))
        .collect::<Vec<_>>()
        .join("\n")
}

#[derive(Deserialize)]
struct RawLineRange {
    start: i64,
    end: i64,
}

/// Parse a model answer into line ranges.
///
/// Accepts `{"line_ranges": [...]}` or a bare `[...]`, optionally inside a
/// Markdown code fence. Single-quoted keys and trailing commas are repaired.
/// Inverted ranges are kept here; the chunk pipeline discards them. Anything
/// that still isn't a list of `{start, end}` integer pairs is
/// [`ReaderError::MalformedResponse`].
pub fn parse_line_ranges(raw: &str) -> Result<Vec<LineRange>> {
    let body = strip_code_fence(raw.trim());
    if body.is_empty() {
        return Err(ReaderError::malformed("empty response"));
    }

    let value: Value = match serde_json::from_str(body) {
        Ok(value) => value,
        Err(first_err) => serde_json::from_str(&repair_json(body)).map_err(|_| {
            ReaderError::malformed(format!("not valid JSON ({first_err}): {}", preview(body)))
        })?,
    };

    let items = match value {
        Value::Object(mut map) => match map.remove("line_ranges") {
            Some(Value::Array(items)) => items,
            Some(other) => {
                return Err(ReaderError::malformed(format!(
                    "line_ranges is not an array: {other}"
                )));
            }
            None => return Err(ReaderError::malformed("missing line_ranges field")),
        },
        Value::Array(items) => items,
        other => {
            return Err(ReaderError::malformed(format!(
                "expected an object or array, got {}",
                preview(&other.to_string())
            )));
        }
    };

    items
        .into_iter()
        .map(|item| {
            serde_json::from_value::<RawLineRange>(item.clone())
                .map(|r| LineRange::new(r.start, r.end))
                .map_err(|e| ReaderError::malformed(format!("bad line range {item}: {e}")))
        })
        .collect()
}

fn strip_code_fence(text: &str) -> &str {
    static FENCE: OnceLock<Regex> = OnceLock::new();
    let fence = FENCE.get_or_init(|| {
        Regex::new(r"(?s)^```[A-Za-z0-9_-]*\s*\n(.*?)\n?```\s*$").expect("valid fence regex")
    });
    match fence.captures(text).and_then(|c| c.get(1)) {
        Some(inner) => inner.as_str().trim(),
        None => text,
    }
}

// Only single-quoted keys and single-quoted values without inner quotes are
// rewritten, so apostrophes inside double-quoted strings survive.
fn repair_json(text: &str) -> String {
    static QUOTED_KEY: OnceLock<Regex> = OnceLock::new();
    static QUOTED_VALUE: OnceLock<Regex> = OnceLock::new();
    static TRAILING_COMMA: OnceLock<Regex> = OnceLock::new();
    let quoted_key =
        QUOTED_KEY.get_or_init(|| Regex::new(r"'(\w+)'(\s*):").expect("valid key regex"));
    let quoted_value = QUOTED_VALUE.get_or_init(|| {
        Regex::new(r#":(\s*)'([^'"\n]*)'(\s*[,}\]])"#).expect("valid value regex")
    });
    let trailing_comma =
        TRAILING_COMMA.get_or_init(|| Regex::new(r",\s*([\]}])").expect("valid comma regex"));

    let text = quoted_key.replace_all(text, "\"${1}\"${2}:");
    let text = quoted_value.replace_all(&text, ":${1}\"${2}\"${3}");
    trailing_comma.replace_all(&text, "${1}").into_owned()
}

fn preview(text: &str) -> String {
    const LIMIT: usize = 120;
    if text.chars().count() <= LIMIT {
        text.to_string()
    } else {
        format!("{}...", text.chars().take(LIMIT).collect::<String>())
    }
}

/// Finder that always answers with the same ranges, recording each query.
///
/// Useful for tests and for replaying a known model answer.
#[derive(Default)]
pub struct StaticRangeFinder {
    ranges: Vec<LineRange>,
    pub calls: Arc<Mutex<Vec<(String, String)>>>,
}

impl StaticRangeFinder {
    pub fn new(ranges: Vec<LineRange>) -> Self {
        Self {
            ranges,
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Build from `(start, end)` pairs.
    pub fn from_pairs(pairs: &[(i64, i64)]) -> Self {
        Self::new(pairs.iter().map(|&(s, e)| LineRange::new(s, e)).collect())
    }
}

#[async_trait]
impl LineRangeFinder for StaticRangeFinder {
    async fn find_line_ranges(&self, file: &FileRef, query: &str) -> Result<Vec<LineRange>> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push((file.relative_path.clone(), query.to_string()));
        }
        Ok(self.ranges.clone())
    }
}
