//! File index collaborators: resolve a relative path to a loaded [`FileRef`].

use crate::error::{ReaderError, Result};
use async_trait::async_trait;
use janet_ai_chunks::FileRef;
use std::collections::HashMap;
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;
use tokio::sync::RwLock;

/// Files larger than this are refused rather than sent to a model.
pub const MAX_FILE_BYTES: u64 = 1 << 22;

/// Resolves relative paths to file contents.
#[async_trait]
pub trait FileSource: Send + Sync {
    /// Load a file, failing with [`ReaderError::FileNotFound`] for unknown paths.
    async fn get_file(&self, relative_path: &str) -> Result<Arc<FileRef>>;
}

/// Reads files below a root directory, caching each one after first load.
///
/// Paths are interpreted relative to the root and may not climb out of it.
/// Content is decoded as UTF-8, replacing invalid sequences.
pub struct DirectoryFileSource {
    root: PathBuf,
    cache: RwLock<HashMap<String, Arc<FileRef>>>,
}

impl DirectoryFileSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            cache: RwLock::new(HashMap::new()),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Drop a cached entry so the next read goes to disk again.
    pub async fn invalidate(&self, relative_path: &str) {
        self.cache.write().await.remove(&normalize_key(relative_path));
    }

    fn resolve(&self, relative_path: &str) -> Result<PathBuf> {
        let relative = Path::new(relative_path);
        let escapes = relative.components().any(|c| {
            matches!(
                c,
                Component::ParentDir | Component::RootDir | Component::Prefix(_)
            )
        });
        if escapes || relative_path.is_empty() {
            return Err(ReaderError::file_not_found(relative_path));
        }
        Ok(self.root.join(relative))
    }
}

#[async_trait]
impl FileSource for DirectoryFileSource {
    async fn get_file(&self, relative_path: &str) -> Result<Arc<FileRef>> {
        let key = normalize_key(relative_path);
        if let Some(file) = self.cache.read().await.get(&key) {
            return Ok(Arc::clone(file));
        }

        let absolute = self.resolve(&key)?;
        let metadata = match tokio::fs::metadata(&absolute).await {
            Ok(metadata) if metadata.is_file() => metadata,
            Ok(_) => return Err(ReaderError::file_not_found(relative_path)),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                return Err(ReaderError::file_not_found(relative_path));
            }
            Err(err) => return Err(err.into()),
        };
        if metadata.len() > MAX_FILE_BYTES {
            return Err(ReaderError::Io {
                source: std::io::Error::new(
                    std::io::ErrorKind::InvalidData,
                    format!("{} is too large ({} bytes)", key, metadata.len()),
                ),
            });
        }

        let bytes = tokio::fs::read(&absolute).await?;
        let content = String::from_utf8_lossy(&bytes).into_owned();
        let file = Arc::new(FileRef::new(key.clone(), content));
        tracing::debug!(
            "Loaded {} ({} lines) from {}",
            key,
            file.last_lineno,
            self.root.display()
        );

        let mut cache = self.cache.write().await;
        Ok(Arc::clone(cache.entry(key).or_insert(file)))
    }
}

/// In-memory file index, mostly for tests and embedding callers.
#[derive(Default)]
pub struct MemoryFileSource {
    files: HashMap<String, Arc<FileRef>>,
}

impl MemoryFileSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a file (builder style)
    pub fn with_file(mut self, relative_path: &str, content: &str) -> Self {
        self.insert(FileRef::new(relative_path, content));
        self
    }

    pub fn insert(&mut self, file: FileRef) -> Arc<FileRef> {
        let file = Arc::new(file);
        self.files.insert(file.relative_path.clone(), Arc::clone(&file));
        file
    }
}

#[async_trait]
impl FileSource for MemoryFileSource {
    async fn get_file(&self, relative_path: &str) -> Result<Arc<FileRef>> {
        self.files
            .get(&normalize_key(relative_path))
            .cloned()
            .ok_or_else(|| ReaderError::file_not_found(relative_path))
    }
}

// "./src/lib.rs" and "src\\lib.rs" both name "src/lib.rs".
fn normalize_key(relative_path: &str) -> String {
    let unified = relative_path.replace('\\', "/");
    let mut key = unified.as_str();
    while let Some(rest) = key.strip_prefix("./") {
        key = rest;
    }
    key.to_string()
}
