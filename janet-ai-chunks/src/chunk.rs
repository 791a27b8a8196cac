//! Line-numbered chunks of a [`FileRef`].
//!
//! A [`Chunk`] is a back-reference to its file plus the 1-based line numbers it
//! covers. Language models answer with inclusive [`LineRange`]s, which are
//! expanded into chunks before being clamped and merged.

use crate::file::FileRef;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::ops::RangeInclusive;
use std::sync::Arc;

/// Marker placed between non-adjacent runs of lines when rendering with dots.
pub const ELLIPSIS: &str = "...";

/// Inclusive `[start, end]` pair of 1-based line numbers, as returned by a model.
///
/// The bounds are signed so that nonsense such as negative or inverted ranges
/// can be parsed and then discarded instead of failing the whole response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineRange {
    pub start: i64,
    pub end: i64,
}

impl LineRange {
    pub fn new(start: i64, end: i64) -> Self {
        Self { start, end }
    }

    /// A range is usable only when `start <= end`.
    pub fn is_valid(&self) -> bool {
        self.start <= self.end
    }
}

/// A set of lines from one file.
///
/// Equality and hashing use the file's identity (path and content hash) and the
/// exact line-number sequence, so identical chunks collapse when deduplicated.
#[derive(Clone)]
pub struct Chunk {
    pub file: Arc<FileRef>,
    /// Strictly increasing 1-based line numbers
    pub line_nums: Vec<usize>,
}

impl Chunk {
    pub fn new(file: Arc<FileRef>, line_nums: Vec<usize>) -> Self {
        Self { file, line_nums }
    }

    /// Expand an inclusive range into a chunk.
    ///
    /// Returns `None` for an inverted range. A start below 1 is raised to 1 and
    /// lines past the end of the file are never materialized, so the result may
    /// be empty; [`clamp_chunks`](crate::normalize::clamp_chunks) drops those.
    pub fn from_range(file: Arc<FileRef>, range: LineRange) -> Option<Self> {
        if !range.is_valid() {
            return None;
        }
        let start = range.start.max(1);
        let end = range.end.min(file.last_lineno as i64);
        let line_nums = if start <= end {
            (start as usize..=end as usize).collect()
        } else {
            Vec::new()
        };
        Some(Self { file, line_nums })
    }

    /// Contiguous chunk covering `lines`.
    pub fn contiguous(file: Arc<FileRef>, lines: RangeInclusive<usize>) -> Self {
        Self {
            file,
            line_nums: lines.collect(),
        }
    }

    pub fn first_line(&self) -> Option<usize> {
        self.line_nums.first().copied()
    }

    pub fn last_line(&self) -> Option<usize> {
        self.line_nums.last().copied()
    }

    /// `[first, last]` span of the chunk, which is what merging works on.
    pub fn span(&self) -> Option<RangeInclusive<usize>> {
        Some(self.first_line()?..=self.last_line()?)
    }

    pub fn len(&self) -> usize {
        self.line_nums.len()
    }

    pub fn is_empty(&self) -> bool {
        self.line_nums.is_empty()
    }

    pub fn relative_path(&self) -> &str {
        &self.file.relative_path
    }

    /// Reproduce the chunk's text from its file.
    ///
    /// Lines are joined with `\n`. With `dots` set, an [`ELLIPSIS`] line is
    /// inserted wherever consecutive line numbers are not adjacent, signalling
    /// that lines were omitted. Line numbers the file doesn't have are skipped.
    pub fn render(&self, dots: bool) -> String {
        let mut out: Vec<&str> = Vec::with_capacity(self.line_nums.len());
        let mut prev: Option<usize> = None;
        for &lineno in &self.line_nums {
            if dots && prev.is_some_and(|p| lineno > p + 1) {
                out.push(ELLIPSIS);
            }
            if let Some(line) = self.file.line(lineno) {
                out.push(line);
            }
            prev = Some(lineno);
        }
        out.join("\n")
    }

    /// Serializable view used for JSON output.
    pub fn summary(&self) -> ChunkSummary {
        ChunkSummary {
            path: self.file.relative_path.clone(),
            line_start: self.first_line().unwrap_or(0),
            line_end: self.last_line().unwrap_or(0),
            text: self.render(false),
        }
    }
}

impl PartialEq for Chunk {
    fn eq(&self, other: &Self) -> bool {
        self.file.same_identity(&other.file) && self.line_nums == other.line_nums
    }
}

impl Eq for Chunk {}

impl Hash for Chunk {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.file.relative_path.hash(state);
        self.file.hash.hash(state);
        self.line_nums.hash(state);
    }
}

impl fmt::Debug for Chunk {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.span() {
            Some(span) => write!(
                f,
                "Chunk({}:{}-{}, {} lines)",
                self.file.relative_path,
                span.start(),
                span.end(),
                self.line_nums.len()
            ),
            None => write!(f, "Chunk({}:<empty>)", self.file.relative_path),
        }
    }
}

impl fmt::Display for Chunk {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render(false))
    }
}

/// Flat, owned description of a chunk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChunkSummary {
    pub path: String,
    pub line_start: usize,
    pub line_end: usize,
    pub text: String,
}
