//! # janet-ai-chunks
//!
//! Line-numbered chunks of source files, and the pipeline that turns a language
//! model's answer ("lines 12-15 and 37-50 are relevant") into a clean set of
//! non-overlapping chunks.
//!
//! The pipeline has three steps:
//!
//! 1. [`chunks_from_ranges`] expands inclusive [`LineRange`]s into [`Chunk`]s,
//!    discarding inverted ranges.
//! 2. [`clamp_chunks`] removes line numbers the file doesn't have and drops
//!    chunks left empty.
//! 3. [`merge_chunks`] sorts by first line, fuses overlapping or nearby chunks
//!    and removes duplicates.
//!
//! [`format_chunks`] renders the result for the calling agent.
//!
//! ```
//! use std::sync::Arc;
//! use janet_ai_chunks::{FileRef, LineRange, chunks_from_ranges, clamp_chunks, merge_chunks};
//!
//! let content: String = (1..=100).map(|n| format!("line {n}\n")).collect();
//! let file = Arc::new(FileRef::new("src/lib.rs", content));
//! let ranges = [
//!     LineRange::new(5, 8),
//!     LineRange::new(7, 12),
//!     LineRange::new(50, 200),
//! ];
//!
//! let chunks = merge_chunks(clamp_chunks(chunks_from_ranges(&file, &ranges)));
//! let spans: Vec<_> = chunks.iter().filter_map(|c| c.span()).collect();
//! assert_eq!(spans, vec![5..=12, 50..=100]);
//! ```

pub mod chunk;
pub mod file;
pub mod format;
pub mod merge;
pub mod normalize;

pub use chunk::{Chunk, ChunkSummary, ELLIPSIS, LineRange};
pub use file::{FileHash, FileRef};
pub use format::format_chunks;
pub use merge::{MAX_CHUNK_DISTANCE, merge_chunks, merge_chunks_within};
pub use normalize::{chunks_from_ranges, clamp_chunks};
