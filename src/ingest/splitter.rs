//! Recursive separator-preference text splitting.
//!
//! Splits document text into overlapping chunks, preferring the coarsest
//! separator that keeps chunks within the target size: paragraph breaks
//! first, then line breaks, sentence-ending punctuation, spaces, and
//! finally individual characters. Sizes are measured in characters, which
//! keeps the splitter safe on Vietnamese text.

/// Separator preference order, coarsest first. The empty string means
/// "split at character level".
const SEPARATORS: &[&str] = &["\n\n", "\n", ". ", " ", ""];

/// Recursive character splitter with overlap.
#[derive(Debug, Clone)]
pub struct RecursiveSplitter {
    chunk_size: usize,
    chunk_overlap: usize,
}

impl RecursiveSplitter {
    /// Create a new splitter.
    ///
    /// `chunk_size` is the maximum characters per chunk, `chunk_overlap`
    /// the number of characters carried over between consecutive chunks.
    pub fn new(chunk_size: usize, chunk_overlap: usize) -> Self {
        Self {
            chunk_size,
            chunk_overlap,
        }
    }

    /// Split `text` into chunks. Returns an empty vec for blank input.
    pub fn split(&self, text: &str) -> Vec<String> {
        if text.trim().is_empty() {
            return Vec::new();
        }

        split_and_merge(text, self.chunk_size, self.chunk_overlap, SEPARATORS)
            .into_iter()
            .filter(|chunk| !chunk.trim().is_empty())
            .collect()
    }
}

fn char_len(s: &str) -> usize {
    s.chars().count()
}

/// Split text by the first separator, then merge segments back into chunks
/// that respect `chunk_size`. Segments that still exceed the size are split
/// again with the next, finer separator.
fn split_and_merge(
    text: &str,
    chunk_size: usize,
    chunk_overlap: usize,
    separators: &[&str],
) -> Vec<String> {
    if char_len(text) <= chunk_size {
        return vec![text.to_string()];
    }

    let separator = match separators.first() {
        Some(sep) if !sep.is_empty() => *sep,
        _ => return split_by_size(text, chunk_size, chunk_overlap),
    };
    let remaining = &separators[1..];

    let segments = split_keeping_separator(text, separator);

    let mut chunks = Vec::new();
    let mut current = String::new();

    let flush = |current: &mut String, chunks: &mut Vec<String>| {
        if current.is_empty() {
            return;
        }
        if char_len(current) > chunk_size {
            chunks.extend(split_and_merge(current, chunk_size, chunk_overlap, remaining));
        } else {
            chunks.push(current.clone());
        }
        current.clear();
    };

    for segment in segments {
        if current.is_empty() {
            current.push_str(segment);
        } else if char_len(&current) + char_len(segment) <= chunk_size {
            current.push_str(segment);
        } else {
            let tail = overlap_tail(&current, chunk_overlap);
            flush(&mut current, &mut chunks);
            current.push_str(&tail);
            current.push_str(segment);
        }
    }
    flush(&mut current, &mut chunks);

    chunks
}

/// Split text at a separator while keeping the separator attached to the
/// preceding segment.
fn split_keeping_separator<'a>(text: &'a str, separator: &str) -> Vec<&'a str> {
    let mut result = Vec::new();
    let mut start = 0;

    while let Some(pos) = text[start..].find(separator) {
        let end = start + pos + separator.len();
        result.push(&text[start..end]);
        start = end;
    }

    if start < text.len() {
        result.push(&text[start..]);
    }

    result
}

/// Character-level splitting with overlap, the finest fallback.
fn split_by_size(text: &str, chunk_size: usize, chunk_overlap: usize) -> Vec<String> {
    let chars: Vec<char> = text.chars().collect();
    if chars.is_empty() {
        return Vec::new();
    }

    let step = chunk_size.saturating_sub(chunk_overlap).max(1);
    let mut chunks = Vec::new();
    let mut start = 0;

    while start < chars.len() {
        let end = (start + chunk_size).min(chars.len());
        chunks.push(chars[start..end].iter().collect());
        if end == chars.len() {
            break;
        }
        start += step;
    }

    chunks
}

/// Last `overlap` characters of a chunk, carried into the next one.
fn overlap_tail(s: &str, overlap: usize) -> String {
    if overlap == 0 {
        return String::new();
    }
    let chars: Vec<char> = s.chars().collect();
    let start = chars.len().saturating_sub(overlap);
    chars[start..].iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_text_single_chunk() {
        let splitter = RecursiveSplitter::new(500, 100);
        let chunks = splitter.split("FCAJ là một cộng đồng học AWS.");
        assert_eq!(chunks.len(), 1);
    }

    #[test]
    fn test_blank_text_no_chunks() {
        let splitter = RecursiveSplitter::new(500, 100);
        assert!(splitter.split("").is_empty());
        assert!(splitter.split("   \n\n  ").is_empty());
    }

    #[test]
    fn test_chunks_respect_size_bound() {
        let splitter = RecursiveSplitter::new(100, 20);
        let paragraph = "Thành viên tích cực sẽ được cộng điểm. ".repeat(30);
        for chunk in splitter.split(&paragraph) {
            assert!(
                chunk.chars().count() <= 100,
                "chunk exceeds size: {} chars",
                chunk.chars().count()
            );
        }
    }

    #[test]
    fn test_prefers_paragraph_breaks() {
        let splitter = RecursiveSplitter::new(60, 10);
        let text = "Đoạn một nói về quy định điểm danh hàng tuần.\n\nĐoạn hai nói về cách tính điểm thi đua của thành viên.";
        let chunks = splitter.split(text);
        assert!(chunks.len() >= 2);
        assert!(chunks[0].contains("Đoạn một"));
    }

    #[test]
    fn test_unbroken_text_overlaps() {
        let splitter = RecursiveSplitter::new(500, 100);
        let text = "a".repeat(1200);
        let chunks = splitter.split(&text);
        assert_eq!(chunks.len(), 3);
        assert_eq!(chunks[0].chars().count(), 500);
        assert_eq!(chunks[1].chars().count(), 500);
        // step = 400, so consecutive chunks share 100 characters
        assert_eq!(chunks[2].chars().count(), 400);
    }

    #[test]
    fn test_deterministic_chunk_count() {
        let splitter = RecursiveSplitter::new(120, 30);
        let text = "Nội quy FCAJ. Điểm danh mỗi tuần. Vi phạm sẽ bị trừ điểm.\n\n".repeat(20);
        let first = splitter.split(&text);
        let second = splitter.split(&text);
        assert_eq!(first.len(), second.len());
        assert_eq!(first, second);
    }

    #[test]
    fn test_multibyte_text_never_panics() {
        let splitter = RecursiveSplitter::new(50, 10);
        let text = "ữđạộềể".repeat(100);
        let chunks = splitter.split(&text);
        assert!(!chunks.is_empty());
        for chunk in chunks {
            assert!(chunk.chars().count() <= 50);
        }
    }
}
