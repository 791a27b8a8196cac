//! Collapsing overlapping or nearby chunks into contiguous ones.

use crate::chunk::Chunk;
use itertools::Itertools;

/// Chunks separated by fewer than this many omitted lines are fused.
pub const MAX_CHUNK_DISTANCE: usize = 5;

/// Merge chunks using [`MAX_CHUNK_DISTANCE`].
pub fn merge_chunks(chunks: Vec<Chunk>) -> Vec<Chunk> {
    merge_chunks_within(chunks, MAX_CHUNK_DISTANCE)
}

/// Sort chunks by first line and fuse overlapping or close ones.
///
/// Two neighbours are fused when they overlap or when the number of lines
/// between them (`next_start - current_end - 1`) is below `max_distance`, so
/// `[10, 20]` and `[25, 30]` (gap of 4) fuse while `[10, 20]` and `[26, 30]`
/// (gap of 5) stay apart. The fused chunk covers every line
/// from the first chunk's start to the farther of the two ends, including lines
/// in the gap that neither chunk selected. The sort is stable, so chunks sharing
/// a first line keep their input order. Identical results are removed while
/// keeping the sorted order.
///
/// The input is expected to come from a single file. Chunks from different
/// files are not kept apart; batch per file if that matters.
///
/// ```
/// use std::sync::Arc;
/// use janet_ai_chunks::{Chunk, FileRef, merge_chunks};
///
/// let content: String = (1..=40).map(|n| format!("{n}\n")).collect();
/// let file = Arc::new(FileRef::new("a.txt", content));
/// let merged = merge_chunks(vec![
///     Chunk::contiguous(file.clone(), 23..=30),
///     Chunk::contiguous(file.clone(), 10..=20),
/// ]);
/// assert_eq!(merged.len(), 1);
/// assert_eq!(merged[0].span(), Some(10..=30));
/// ```
pub fn merge_chunks_within(mut chunks: Vec<Chunk>, max_distance: usize) -> Vec<Chunk> {
    chunks.retain(|chunk| !chunk.is_empty());
    chunks.sort_by_key(|chunk| chunk.first_line());

    let mut chunks = chunks.into_iter();
    let Some(mut current) = chunks.next() else {
        return Vec::new();
    };

    let mut merged = Vec::new();
    for next in chunks {
        let (curr_start, curr_end) = bounds(&current);
        let (next_start, next_end) = bounds(&next);

        let overlapping = next_start <= curr_end;
        if overlapping || next_start - curr_end - 1 < max_distance {
            current.line_nums = (curr_start..=curr_end.max(next_end)).collect();
        } else {
            merged.push(std::mem::replace(&mut current, next));
        }
    }
    merged.push(current);

    merged.into_iter().unique().collect()
}

// Only called on non-empty chunks.
fn bounds(chunk: &Chunk) -> (usize, usize) {
    (chunk.line_nums[0], chunk.line_nums[chunk.line_nums.len() - 1])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::file::FileRef;
    use std::sync::Arc;

    fn file() -> Arc<FileRef> {
        let content: String = (1..=200).map(|n| format!("line {n}\n")).collect();
        Arc::new(FileRef::new("src/main.rs", content))
    }

    fn spans(chunks: &[Chunk]) -> Vec<(usize, usize)> {
        chunks.iter().map(bounds).collect()
    }

    fn contiguous(file: &Arc<FileRef>, start: usize, end: usize) -> Chunk {
        Chunk::contiguous(Arc::clone(file), start..=end)
    }

    #[test]
    fn test_empty_input() {
        assert!(merge_chunks(Vec::new()).is_empty());
    }

    #[test]
    fn test_single_chunk_unchanged() {
        let file = file();
        let chunk = Chunk::new(file, vec![3, 4, 9]);
        let merged = merge_chunks(vec![chunk.clone()]);
        assert_eq!(merged, vec![chunk]);
    }

    #[test]
    fn test_merge_overlap() {
        let file = file();
        let merged = merge_chunks(vec![contiguous(&file, 10, 20), contiguous(&file, 15, 25)]);
        assert_eq!(spans(&merged), vec![(10, 25)]);
        assert_eq!(merged[0].line_nums, (10..=25).collect::<Vec<_>>());
    }

    #[test]
    fn test_merge_adjacency_fills_gap() {
        let file = file();
        let merged = merge_chunks(vec![contiguous(&file, 10, 20), contiguous(&file, 23, 30)]);
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].line_nums, (10..=30).collect::<Vec<_>>());
    }

    #[test]
    fn test_merge_boundary() {
        let file = file();

        let gap_four = merge_chunks(vec![contiguous(&file, 10, 20), contiguous(&file, 25, 30)]);
        assert_eq!(spans(&gap_four), vec![(10, 30)]);

        let gap_five = merge_chunks(vec![contiguous(&file, 10, 20), contiguous(&file, 26, 30)]);
        assert_eq!(spans(&gap_five), vec![(10, 20), (26, 30)]);
    }

    #[test]
    fn test_touching_chunks_merge() {
        let file = file();
        let merged = merge_chunks(vec![contiguous(&file, 1, 5), contiguous(&file, 6, 8)]);
        assert_eq!(spans(&merged), vec![(1, 8)]);
    }

    #[test]
    fn test_contained_chunk_keeps_outer_end() {
        let file = file();
        let merged = merge_chunks(vec![contiguous(&file, 10, 40), contiguous(&file, 12, 15)]);
        assert_eq!(spans(&merged), vec![(10, 40)]);
        assert_eq!(merged[0].len(), 31);
    }

    #[test]
    fn test_chain_merges_transitively() {
        let file = file();
        let merged = merge_chunks(vec![
            contiguous(&file, 1, 3),
            contiguous(&file, 6, 8),
            contiguous(&file, 11, 12),
            contiguous(&file, 50, 55),
        ]);
        assert_eq!(spans(&merged), vec![(1, 12), (50, 55)]);
    }

    #[test]
    fn test_idempotent() {
        let file = file();
        let once = merge_chunks(vec![
            contiguous(&file, 40, 45),
            contiguous(&file, 10, 20),
            contiguous(&file, 18, 22),
            contiguous(&file, 100, 120),
            contiguous(&file, 26, 30),
        ]);
        let twice = merge_chunks(once.clone());
        assert_eq!(once, twice);
        assert_eq!(spans(&once), vec![(10, 30), (40, 45), (100, 120)]);
    }

    #[test]
    fn test_deduplicates_identical() {
        let file = file();
        let merged = merge_chunks(vec![contiguous(&file, 5, 8), contiguous(&file, 5, 8)]);
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].line_nums, vec![5, 6, 7, 8]);
    }

    #[test]
    fn test_order_independent() {
        let file = file();
        let forward = merge_chunks(vec![contiguous(&file, 10, 20), contiguous(&file, 23, 30)]);
        let backward = merge_chunks(vec![contiguous(&file, 23, 30), contiguous(&file, 10, 20)]);
        assert_eq!(forward, backward);
        assert_eq!(spans(&forward), vec![(10, 30)]);
    }

    #[test]
    fn test_output_sorted_by_first_line() {
        let file = file();
        let merged = merge_chunks(vec![
            contiguous(&file, 150, 160),
            contiguous(&file, 1, 2),
            contiguous(&file, 70, 80),
        ]);
        assert_eq!(spans(&merged), vec![(1, 2), (70, 80), (150, 160)]);
    }

    #[test]
    fn test_stable_tie_break_on_same_first_line() {
        let file = file();
        // Both start at 10; the first in input order becomes `current`.
        let merged = merge_chunks(vec![contiguous(&file, 10, 12), contiguous(&file, 10, 30)]);
        assert_eq!(spans(&merged), vec![(10, 30)]);

        let merged = merge_chunks(vec![contiguous(&file, 10, 30), contiguous(&file, 10, 12)]);
        assert_eq!(spans(&merged), vec![(10, 30)]);
    }

    #[test]
    fn test_custom_distance() {
        let file = file();
        let input = vec![contiguous(&file, 10, 20), contiguous(&file, 30, 40)];

        // Nine lines (21..=29) lie between the two chunks.
        assert_eq!(spans(&merge_chunks_within(input.clone(), 9)), vec![(10, 20), (30, 40)]);
        assert_eq!(spans(&merge_chunks_within(input.clone(), 10)), vec![(10, 40)]);

        // Zero distance only merges overlaps.
        let overlapping = vec![contiguous(&file, 10, 20), contiguous(&file, 20, 25)];
        assert_eq!(spans(&merge_chunks_within(overlapping, 0)), vec![(10, 25)]);
        let touching = vec![contiguous(&file, 10, 20), contiguous(&file, 21, 25)];
        assert_eq!(spans(&merge_chunks_within(touching, 0)), vec![(10, 20), (21, 25)]);
        assert_eq!(spans(&merge_chunks_within(input, 0)), vec![(10, 20), (30, 40)]);
    }

    #[test]
    fn test_empty_chunks_are_ignored() {
        let file = file();
        let merged = merge_chunks(vec![
            Chunk::new(file.clone(), Vec::new()),
            contiguous(&file, 3, 4),
        ]);
        assert_eq!(spans(&merged), vec![(3, 4)]);
    }
}
