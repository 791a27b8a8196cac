//! Retrieval orchestration: ask the finder, then clamp and merge its answer.

use crate::config::ReaderConfig;
use crate::error::Result;
use crate::files::FileSource;
use crate::finder::LineRangeFinder;
use janet_ai_chunks::{
    Chunk, FileRef, MAX_CHUNK_DISTANCE, chunks_from_ranges, clamp_chunks, merge_chunks_within,
};
use std::sync::Arc;

/// A single `(path, query)` request for [`Reader::read_many`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadRequest {
    pub path: String,
    pub query: String,
}

impl ReadRequest {
    pub fn new(path: impl Into<String>, query: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            query: query.into(),
        }
    }
}

/// Turns a file and a natural-language query into relevant chunks.
///
/// Each call works on its own chunk list, so a `Reader` can serve any number of
/// concurrent requests. Dropping the returned future cancels the model call.
#[derive(Clone)]
pub struct Reader {
    finder: Arc<dyn LineRangeFinder>,
    max_chunk_distance: usize,
}

impl Reader {
    pub fn new(finder: Arc<dyn LineRangeFinder>) -> Self {
        Self {
            finder,
            max_chunk_distance: MAX_CHUNK_DISTANCE,
        }
    }

    /// Build a reader using the merge distance from `config`.
    pub fn from_config(finder: Arc<dyn LineRangeFinder>, config: &ReaderConfig) -> Self {
        Self::new(finder).with_max_chunk_distance(config.max_chunk_distance)
    }

    /// Set the merge distance (builder style)
    pub fn with_max_chunk_distance(self, max_chunk_distance: usize) -> Self {
        Self {
            max_chunk_distance,
            ..self
        }
    }

    pub fn max_chunk_distance(&self) -> usize {
        self.max_chunk_distance
    }

    /// Find the chunks of `file` relevant to `query`.
    ///
    /// Finder errors (including malformed responses) are returned unchanged.
    /// Ranges outside the file are trimmed or dropped; if none survive the
    /// result is an empty list rather than an error.
    pub async fn retrieve(&self, file: Arc<FileRef>, query: &str) -> Result<Vec<Chunk>> {
        let ranges = self.finder.find_line_ranges(&file, query).await?;
        let candidates = chunks_from_ranges(&file, &ranges);
        let clamped = clamp_chunks(candidates);
        let clamped_count = clamped.len();
        let merged = merge_chunks_within(clamped, self.max_chunk_distance);

        tracing::debug!(
            "{}: {} ranges -> {} in bounds -> {} chunks",
            file.relative_path,
            ranges.len(),
            clamped_count,
            merged.len()
        );
        Ok(merged)
    }

    /// Resolve `path` through `files`, then [`retrieve`](Self::retrieve).
    pub async fn read(
        &self,
        files: &dyn FileSource,
        path: &str,
        query: &str,
    ) -> Result<Vec<Chunk>> {
        let file = files.get_file(path).await?;
        self.retrieve(file, query).await
    }

    /// Run several reads concurrently; results come back in request order.
    pub async fn read_many(
        &self,
        files: &dyn FileSource,
        requests: &[ReadRequest],
    ) -> Vec<Result<Vec<Chunk>>> {
        futures::future::join_all(
            requests
                .iter()
                .map(|request| self.read(files, &request.path, &request.query)),
        )
        .await
    }
}
