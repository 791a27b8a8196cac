//! Text output handed back to the calling agent.

use crate::chunk::Chunk;
use crate::file::FileRef;
use std::sync::Arc;

/// Render chunks grouped by file.
///
/// Groups appear in the order their file is first seen. Each group is wrapped in
/// a tag named after the file's relative path and holds the rendered text of its
/// chunks, separated by blank lines:
///
/// ```text
/// <src/db.rs>
/// fn connect() {}
/// </src/db.rs>
///
/// <src/auth.rs>
/// fn login() {}
/// </src/auth.rs>
/// ```
pub fn format_chunks(chunks: &[Chunk], dots: bool) -> String {
    let mut groups: Vec<(&Arc<FileRef>, Vec<&Chunk>)> = Vec::new();
    for chunk in chunks {
        match groups
            .iter_mut()
            .find(|(file, _)| file.same_identity(&chunk.file))
        {
            Some((_, members)) => members.push(chunk),
            None => groups.push((&chunk.file, vec![chunk])),
        }
    }

    groups
        .into_iter()
        .map(|(file, members)| {
            let body = members
                .iter()
                .map(|chunk| chunk.render(dots))
                .collect::<Vec<_>>()
                .join("\n\n");
            format!("<{path}>\n{body}\n</{path}>", path = file.relative_path)
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}
