//! Token counting for prompt budgets.
//!
//! Uses the cl100k_base encoding. If the encoding can't be loaded, counts fall
//! back to an estimate of 4 bytes per token.

use std::sync::OnceLock;
use tiktoken_rs::{CoreBPE, cl100k_base};

fn tokenizer() -> Option<&'static CoreBPE> {
    static BPE: OnceLock<Option<CoreBPE>> = OnceLock::new();
    BPE.get_or_init(|| match cl100k_base() {
        Ok(bpe) => Some(bpe),
        Err(err) => {
            tracing::warn!("cl100k_base unavailable, estimating token counts: {}", err);
            None
        }
    })
    .as_ref()
}

/// Count tokens in `text`.
pub fn count_tokens(text: &str) -> usize {
    if text.is_empty() {
        return 0;
    }
    match tokenizer() {
        Some(bpe) => bpe.encode_ordinary(text).len(),
        None => estimate_tokens(text),
    }
}

/// Quick estimate: ~4 bytes per token.
pub fn estimate_tokens(text: &str) -> usize {
    text.len().div_ceil(4)
}

/// Cut `content` to at most `max_tokens` tokens, ending on a whole line.
///
/// Lines are counted one at a time, terminator included, and kept while the
/// running total fits. If the first line alone is over budget, the longest
/// prefix of it that decodes to whole characters is returned instead.
pub fn truncate_file_content(content: &str, max_tokens: usize) -> &str {
    // A token covers at least one byte.
    if content.len() <= max_tokens {
        return content;
    }

    let mut used = 0;
    let mut end = 0;
    for line in content.split_inclusive('\n') {
        let cost = count_tokens(line);
        if used + cost > max_tokens {
            if end == 0 {
                return head_of_line(line, max_tokens);
            }
            tracing::debug!(
                "Truncated prompt content to {} of {} bytes ({} tokens)",
                end,
                content.len(),
                used
            );
            return &content[..end];
        }
        used += cost;
        end += line.len();
    }
    content
}

fn head_of_line(line: &str, max_tokens: usize) -> &str {
    let Some(bpe) = tokenizer() else {
        let mut cut = max_tokens.saturating_mul(4).min(line.len());
        while !line.is_char_boundary(cut) {
            cut -= 1;
        }
        return &line[..cut];
    };

    let tokens = bpe.encode_ordinary(line);
    let mut take = max_tokens.min(tokens.len());
    while take > 0 {
        // Decoding fails when the cut splits a multi-byte character.
        if let Ok(text) = bpe.decode(tokens[..take].to_vec()) {
            if line.is_char_boundary(text.len()) {
                return &line[..text.len()];
            }
        }
        take -= 1;
    }
    ""
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_count_tokens() {
        assert_eq!(count_tokens(""), 0);
        assert_eq!(count_tokens("hello"), 1);
        assert_eq!(count_tokens("hello\n"), 2);
        assert_eq!(estimate_tokens("abcdefgh"), 2);
        assert_eq!(estimate_tokens("abcdefghi"), 3);
    }

    #[test]
    fn test_fits_untouched() {
        let content = "fn main() {\n    println!(\"hi\");\n}\n";
        assert_eq!(truncate_file_content(content, 10_000), content);
        assert_eq!(truncate_file_content(content, count_tokens(content)), content);
    }

    #[test]
    fn test_cut_on_token_budget_at_line_boundary() {
        // Each "hello\n" line is two tokens.
        let content = "hello\n".repeat(100);
        assert_eq!(truncate_file_content(&content, 11), "hello\n".repeat(5));
        assert_eq!(truncate_file_content(&content, 12), "hello\n".repeat(6));
        assert!(count_tokens(truncate_file_content(&content, 11)) <= 11);
    }

    #[test]
    fn test_oversized_first_line() {
        let content = "é".repeat(50) + "\nnext\n";
        let cut = truncate_file_content(&content, 3);
        assert!(content.starts_with(cut));
        assert!(!cut.contains('\n'));
        assert!(count_tokens(cut) <= 3);
    }
}
