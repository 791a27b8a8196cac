//! Turning raw model answers into chunks that only reference real lines.

use crate::chunk::{Chunk, LineRange};
use crate::file::FileRef;
use std::sync::Arc;

/// Convert candidate line ranges for `file` into chunks.
///
/// Inverted pairs (`start > end`) are discarded. The chunks are not yet
/// guaranteed to be non-empty; run them through [`clamp_chunks`].
pub fn chunks_from_ranges(file: &Arc<FileRef>, ranges: &[LineRange]) -> Vec<Chunk> {
    ranges
        .iter()
        .filter_map(|range| Chunk::from_range(Arc::clone(file), *range))
        .collect()
}

/// Restrict every chunk to lines that exist in its file.
///
/// Line numbers outside `[1, last_lineno]` are dropped and chunks left with no
/// lines are discarded. Never fails; input order is kept.
///
/// ```
/// use std::sync::Arc;
/// use janet_ai_chunks::{Chunk, FileRef, clamp_chunks};
///
/// let file = Arc::new(FileRef::new("a.txt", "1\n2\n3\n"));
/// let chunks = vec![
///     Chunk::new(file.clone(), vec![2, 3, 4, 5]),
///     Chunk::new(file.clone(), vec![7, 8]),
/// ];
/// let clamped = clamp_chunks(chunks);
/// assert_eq!(clamped.len(), 1);
/// assert_eq!(clamped[0].line_nums, vec![2, 3]);
/// ```
pub fn clamp_chunks(chunks: Vec<Chunk>) -> Vec<Chunk> {
    chunks
        .into_iter()
        .filter_map(|mut chunk| {
            let file = Arc::clone(&chunk.file);
            chunk.line_nums.retain(|&lineno| file.contains_line(lineno));
            (!chunk.line_nums.is_empty()).then_some(chunk)
        })
        .collect()
}
