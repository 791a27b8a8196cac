//! The `read_file` tool: an agent names a file it has seen and a query, and
//! gets back only the relevant chunks of that file.

use crate::error::{ReaderError, Result};
use crate::files::FileSource;
use crate::reader::Reader;
use crate::tools::known_files::{KnownFiles, TrajectoryItem};
use crate::tools::progress::ProgressReporter;
use janet_ai_chunks::{Chunk, format_chunks};
use serde::Deserialize;
use serde_json::{Value, json};
use std::sync::Arc;

pub const TOOL_NAME: &str = "read_file";

const TOOL_DESCRIPTION: &str = "Reads a file in the codebase and extracts code snippets that are \
relevant to the query. Use when you need additional context on a specific file in the codebase.";

/// Arguments an agent passes to `read_file`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ReadFileArgs {
    /// One-sentence description of what the agent is trying to do
    pub intent: String,
    /// Relative path of the file to read
    pub file: String,
    /// What to look for in the file
    pub query: String,
}

/// Agent tool that reads one file and returns only the relevant chunks.
///
/// The tool only offers files the agent has already come across, so it stays
/// inactive until something has been observed. The file the agent is
/// investigating from (`target_file`) is never offered.
pub struct ReadFileTool {
    reader: Reader,
    files: Arc<dyn FileSource>,
    target_file: String,
    known_files: KnownFiles,
    progress: Arc<dyn ProgressReporter>,
}

impl ReadFileTool {
    pub fn new(
        reader: Reader,
        files: Arc<dyn FileSource>,
        target_file: impl Into<String>,
        progress: Arc<dyn ProgressReporter>,
    ) -> Self {
        Self {
            reader,
            files,
            target_file: target_file.into(),
            known_files: KnownFiles::new(),
            progress,
        }
    }

    pub fn name(&self) -> &'static str {
        TOOL_NAME
    }

    pub fn description(&self) -> &'static str {
        TOOL_DESCRIPTION
    }

    pub fn known_files(&self) -> &KnownFiles {
        &self.known_files
    }

    /// Record that the agent has seen `path`.
    pub fn on_file_observed(&mut self, path: impl Into<String>) {
        self.known_files.observe(path);
    }

    /// Record the paths behind a batch of tool results.
    pub fn on_items_observed<'a>(&mut self, items: impl IntoIterator<Item = &'a TrajectoryItem>) {
        self.known_files.observe_all(items);
    }

    /// Whether the tool should be offered to the agent yet.
    pub fn is_active(&self) -> bool {
        !self.known_files.is_empty()
    }

    /// JSON schema of the tool's parameters; `file` is restricted to known files.
    pub fn parameters(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "intent": {
                    "type": "string",
                    "description": "Concise, one-sentence description of your goal in using this tool.",
                },
                "file": {
                    "type": "string",
                    "enum": self.known_files.paths_except(&self.target_file),
                    "description": "The path to the file that you want to read.",
                },
                "query": {
                    "type": "string",
                    "description": "A semantic search query that captures what you're looking for in the file.",
                },
            },
            "required": ["intent", "file", "query"],
            "additionalProperties": false,
        })
    }

    /// Full tool definition in the function-calling format.
    pub fn definition(&self) -> Value {
        json!({
            "type": "function",
            "function": {
                "name": self.name(),
                "description": self.description(),
                "parameters": self.parameters(),
            },
        })
    }

    /// Report the intent, load the file and return its relevant chunks.
    pub async fn run(&self, args: ReadFileArgs) -> Result<Vec<Chunk>> {
        self.progress.report(&args.intent);
        self.reader
            .read(self.files.as_ref(), &args.file, &args.query)
            .await
    }

    /// Like [`run`](Self::run), taking the raw JSON arguments from a tool call.
    pub async fn call(&self, arguments: &str) -> Result<Vec<Chunk>> {
        let args: ReadFileArgs = serde_json::from_str(arguments)
            .map_err(|e| ReaderError::invalid_arguments(TOOL_NAME, e.to_string()))?;
        self.run(args).await
    }

    /// Text handed back to the agent.
    pub fn format_output(&self, chunks: &[Chunk]) -> String {
        format_chunks(chunks, false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::files::MemoryFileSource;
    use crate::finder::StaticRangeFinder;
    use crate::tools::progress::NoProgress;
    use janet_ai_chunks::FileRef;
    use std::sync::Mutex;

    fn tool_with(finder: StaticRangeFinder, progress: Arc<dyn ProgressReporter>) -> ReadFileTool {
        let files = MemoryFileSource::new()
            .with_file(
                "src/db.rs",
                &(1..=30).map(|n| format!("db {n}\n")).collect::<String>(),
            )
            .with_file("src/main.rs", "fn main() {}\n");
        ReadFileTool::new(
            Reader::new(Arc::new(finder)),
            Arc::new(files),
            "src/main.rs",
            progress,
        )
    }

    #[test]
    fn test_inactive_until_files_observed() {
        let mut tool = tool_with(StaticRangeFinder::default(), Arc::new(NoProgress));
        assert!(!tool.is_active());
        assert_eq!(tool.parameters()["properties"]["file"]["enum"], json!([]));

        tool.on_file_observed("src/main.rs");
        assert!(tool.is_active());
        // The target file is never offered.
        assert_eq!(tool.parameters()["properties"]["file"]["enum"], json!([]));

        let db = Arc::new(FileRef::new("src/db.rs", "x\n"));
        let items = vec![TrajectoryItem::Chunk(Chunk::new(db, vec![1]))];
        tool.on_items_observed(&items);
        assert_eq!(
            tool.parameters()["properties"]["file"]["enum"],
            json!(["src/db.rs"])
        );
    }

    #[test]
    fn test_definition() {
        let tool = tool_with(StaticRangeFinder::default(), Arc::new(NoProgress));
        let definition = tool.definition();
        assert_eq!(definition["function"]["name"], "read_file");
        assert_eq!(
            definition["function"]["parameters"]["required"],
            json!(["intent", "file", "query"])
        );
        assert_eq!(
            definition["function"]["parameters"]["additionalProperties"],
            json!(false)
        );
    }

    #[tokio::test]
    async fn test_run_reports_intent_and_formats() {
        let intents = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&intents);
        let progress = move |intent: &str| sink.lock().unwrap().push(intent.to_string());
        let tool = tool_with(
            StaticRangeFinder::from_pairs(&[(2, 3), (5, 6), (40, 50)]),
            Arc::new(progress),
        );

        let chunks = tool
            .call(r#"{"intent": "Check the pool size", "file": "src/db.rs", "query": "pool"}"#)
            .await
            .unwrap();

        assert_eq!(intents.lock().unwrap().as_slice(), &["Check the pool size".to_string()]);
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].line_nums, vec![2, 3, 4, 5, 6]);
        assert_eq!(
            tool.format_output(&chunks),
            "<src/db.rs>\ndb 2\ndb 3\ndb 4\ndb 5\ndb 6\n</src/db.rs>"
        );
    }

    #[tokio::test]
    async fn test_run_unknown_file() {
        let tool = tool_with(StaticRangeFinder::default(), Arc::new(NoProgress));
        let err = tool
            .run(ReadFileArgs {
                intent: "look".into(),
                file: "src/missing.rs".into(),
                query: "q".into(),
            })
            .await
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_call_rejects_bad_arguments() {
        let tool = tool_with(StaticRangeFinder::default(), Arc::new(NoProgress));
        let err = tool.call(r#"{"file": "src/db.rs"}"#).await.unwrap_err();
        assert!(matches!(
            err,
            ReaderError::InvalidArguments { tool: ref name, .. } if name.as_str() == TOOL_NAME
        ));

        let err = tool.call("not json").await.unwrap_err();
        assert!(matches!(err, ReaderError::InvalidArguments { .. }));
    }
}
