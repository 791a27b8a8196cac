//! Source files as seen by the chunk pipeline.

use std::fmt;

/// Blake3 hash identifying the exact content of a file (32 bytes).
pub type FileHash = [u8; 32];

/// A loaded source file.
///
/// `FileRef` is owned by whatever index produced it and is shared with chunks
/// through an `Arc`. It never changes after construction, so the line count and
/// the content hash are computed once up front.
///
/// # Example
///
/// ```
/// use janet_ai_chunks::FileRef;
///
/// let file = FileRef::new("src/lib.rs", "fn a() {}\nfn b() {}\n");
/// assert_eq!(file.last_lineno, 2);
/// assert_eq!(file.line(2), Some("fn b() {}"));
/// assert_eq!(file.line(3), None);
/// ```
#[derive(Clone)]
pub struct FileRef {
    /// The path to the file, relative to the root of the project
    pub relative_path: String,
    /// Full text of the file
    pub content: String,
    /// The blake3 hash of the content
    pub hash: FileHash,
    /// Number of the last line (1-based), `0` for an empty file
    pub last_lineno: usize,
    // Byte ranges of each line, without the line terminator
    line_spans: Vec<(usize, usize)>,
}

impl FileRef {
    /// Build a file from its relative path and full content.
    pub fn new(relative_path: impl Into<String>, content: impl Into<String>) -> Self {
        let content = content.into();
        let hash = *blake3::hash(content.as_bytes()).as_bytes();
        let line_spans = line_spans(&content);

        Self {
            relative_path: relative_path.into(),
            last_lineno: line_spans.len(),
            hash,
            content,
            line_spans,
        }
    }

    /// Text of 1-based line `lineno`, without its terminator.
    pub fn line(&self, lineno: usize) -> Option<&str> {
        let (start, end) = *self.line_spans.get(lineno.checked_sub(1)?)?;
        Some(&self.content[start..end])
    }

    /// Whether `lineno` names a real line of this file.
    pub fn contains_line(&self, lineno: usize) -> bool {
        (1..=self.last_lineno).contains(&lineno)
    }

    /// Hex form of the content hash, for display.
    pub fn hash_hex(&self) -> String {
        blake3::Hash::from(self.hash).to_hex().to_string()
    }

    /// True when both refer to the same path with the same content.
    pub fn same_identity(&self, other: &FileRef) -> bool {
        self.relative_path == other.relative_path && self.hash == other.hash
    }
}

impl fmt::Debug for FileRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FileRef")
            .field("relative_path", &self.relative_path)
            .field("last_lineno", &self.last_lineno)
            .field("hash", &self.hash_hex())
            .finish()
    }
}

// Same line semantics as `str::lines`: `\n` or `\r\n` terminated, and a final
// terminator does not open an extra empty line.
fn line_spans(content: &str) -> Vec<(usize, usize)> {
    let mut spans = Vec::new();
    let mut start = 0;
    for (idx, _) in content.match_indices('\n') {
        let end = if idx > start && content.as_bytes()[idx - 1] == b'\r' {
            idx - 1
        } else {
            idx
        };
        spans.push((start, end));
        start = idx + 1;
    }
    if start < content.len() {
        spans.push((start, content.len()));
    }
    spans
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_count_matches_str_lines() {
        for content in ["", "a", "a\n", "a\nb", "a\nb\n", "\n\n", "a\r\nb\r\n", "x\n\ny"] {
            let file = FileRef::new("f.txt", content);
            assert_eq!(file.last_lineno, content.lines().count(), "{content:?}");
            for (idx, expected) in content.lines().enumerate() {
                assert_eq!(file.line(idx + 1), Some(expected));
            }
        }
    }

    #[test]
    fn test_line_out_of_bounds() {
        let file = FileRef::new("f.txt", "one\ntwo\n");
        assert_eq!(file.line(0), None);
        assert_eq!(file.line(3), None);
        assert!(file.contains_line(1));
        assert!(file.contains_line(2));
        assert!(!file.contains_line(0));
        assert!(!file.contains_line(3));
    }

    #[test]
    fn test_identity() {
        let a = FileRef::new("src/a.rs", "fn a() {}");
        let same = FileRef::new("src/a.rs", "fn a() {}");
        let edited = FileRef::new("src/a.rs", "fn a() { todo!() }");
        let moved = FileRef::new("src/b.rs", "fn a() {}");

        assert!(a.same_identity(&same));
        assert!(!a.same_identity(&edited));
        assert!(!a.same_identity(&moved));
        assert_eq!(a.hash_hex().len(), 64);
    }
}
