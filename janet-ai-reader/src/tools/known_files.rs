//! Files the agent has already seen, and the items that reveal them.

use janet_ai_chunks::{Chunk, FileRef};
use std::collections::BTreeSet;
use std::sync::Arc;

/// Something a previous tool call handed back to the agent.
#[derive(Debug, Clone)]
pub enum TrajectoryItem {
    /// A whole file, e.g. from a file search
    File(Arc<FileRef>),
    /// A chunk of a file, e.g. from a code search or an earlier read
    Chunk(Chunk),
}

impl TrajectoryItem {
    pub fn relative_path(&self) -> &str {
        match self {
            TrajectoryItem::File(file) => &file.relative_path,
            TrajectoryItem::Chunk(chunk) => chunk.relative_path(),
        }
    }
}

impl From<Arc<FileRef>> for TrajectoryItem {
    fn from(file: Arc<FileRef>) -> Self {
        TrajectoryItem::File(file)
    }
}

impl From<Chunk> for TrajectoryItem {
    fn from(chunk: Chunk) -> Self {
        TrajectoryItem::Chunk(chunk)
    }
}

/// Paths the agent knows about, updated as tool results come in.
///
/// Kept sorted so the tool schema built from it is stable between calls.
#[derive(Debug, Clone, Default)]
pub struct KnownFiles {
    paths: BTreeSet<String>,
}

impl KnownFiles {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a path; returns `true` if it wasn't known yet.
    pub fn observe(&mut self, path: impl Into<String>) -> bool {
        self.paths.insert(path.into())
    }

    pub fn observe_item(&mut self, item: &TrajectoryItem) -> bool {
        self.observe(item.relative_path())
    }

    pub fn observe_all<'a>(&mut self, items: impl IntoIterator<Item = &'a TrajectoryItem>) {
        for item in items {
            self.observe_item(item);
        }
    }

    pub fn contains(&self, path: &str) -> bool {
        self.paths.contains(path)
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.paths.iter().map(String::as_str)
    }

    /// Known paths other than `excluded`, in sorted order.
    pub fn paths_except(&self, excluded: &str) -> Vec<String> {
        self.paths
            .iter()
            .filter(|path| path.as_str() != excluded)
            .cloned()
            .collect()
    }
}
