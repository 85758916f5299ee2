use serde::{Deserialize, Serialize};

/// Collapse all whitespace runs to single spaces.
pub fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// One window of normalized text bound for the external indexer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chunk {
    pub text: String,
    /// Position in the emitted sequence, starting at 0.
    pub index: usize,
}

/// Splits normalized text into overlapping windows, preferring sentence
/// boundaries over raw cuts. Windows are character-counted so multi-byte
/// text never splits inside a code point.
pub struct ReferralChunker {
    chunk_size: usize,
    overlap: usize,
}

impl ReferralChunker {
    /// `overlap` is clamped to `chunk_size - 1`; the caller contract is
    /// `chunk_size > overlap >= 0`.
    pub fn new(chunk_size: usize, overlap: usize) -> Self {
        let overlap = overlap.min(chunk_size.saturating_sub(1));
        Self {
            chunk_size,
            overlap,
        }
    }

    pub fn chunk(&self, text: &str) -> Vec<Chunk> {
        if self.chunk_size == 0 {
            return Vec::new();
        }

        let chars: Vec<char> = normalize_whitespace(text).chars().collect();
        let n = chars.len();
        let mut chunks = Vec::new();
        let mut start = 0;

        while start < n {
            let end = (start + self.chunk_size).min(n);
            let reached_end = end == n;

            // Non-final windows cut at the last sentence end when it falls
            // in the trailing 30%, so sentences survive chunking intact.
            let mut cut = end;
            if !reached_end {
                if let Some(boundary) = last_sentence_break(&chars[start..end]) {
                    if boundary > (end - start) * 7 / 10 {
                        cut = start + boundary + 1;
                    }
                }
            }

            let slice: String = chars[start..cut].iter().collect();
            let trimmed = slice.trim();
            if !trimmed.is_empty() {
                chunks.push(Chunk {
                    text: trimmed.to_string(),
                    index: chunks.len(),
                });
            }

            if reached_end {
                break;
            }
            // The start+1 floor keeps the offset strictly increasing even
            // when a sentence cut lands inside the overlap region.
            start = cut.saturating_sub(self.overlap).max(start + 1);
        }

        chunks
    }
}

impl Default for ReferralChunker {
    fn default() -> Self {
        Self::new(
            crate::config::DEFAULT_CHUNK_SIZE,
            crate::config::DEFAULT_CHUNK_OVERLAP,
        )
    }
}

/// Index of the last `.`, `?` or `!` followed by a space within the window.
fn last_sentence_break(window: &[char]) -> Option<usize> {
    (0..window.len().saturating_sub(1))
        .rev()
        .find(|&i| matches!(window[i], '.' | '?' | '!') && window[i + 1] == ' ')
}
