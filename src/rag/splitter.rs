/// Character-window splitter with overlap, preferring to cut at whitespace.
/// Sizes are in characters, not bytes, so multi-byte Vietnamese text never
/// splits inside a code point.
pub struct TextSplitter {
    chunk_size: usize,
    chunk_overlap: usize,
}

impl TextSplitter {
    pub fn new(chunk_size: usize, chunk_overlap: usize) -> Self {
        assert!(chunk_overlap < chunk_size);
        Self {
            chunk_size,
            chunk_overlap,
        }
    }

    pub fn split(&self, text: &str) -> Vec<String> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Vec::new();
        }

        let chars: Vec<char> = trimmed.chars().collect();
        if chars.len() <= self.chunk_size {
            return vec![trimmed.to_string()];
        }

        let mut chunks = Vec::new();
        let mut start = 0;

        while start < chars.len() {
            let end = (start + self.chunk_size).min(chars.len());

            // Prefer to break on the last whitespace inside the window so
            // words stay intact.
            let mut cut = end;
            if end < chars.len() {
                if let Some(ws) = (start + 1..end).rev().find(|&i| chars[i].is_whitespace()) {
                    cut = ws;
                }
            }

            let chunk: String = chars[start..cut].iter().collect();
            let chunk = chunk.trim().to_string();
            if !chunk.is_empty() {
                chunks.push(chunk);
            }

            if cut >= chars.len() {
                break;
            }
            start = cut.saturating_sub(self.chunk_overlap).max(start + 1);
        }

        chunks
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_text_is_a_single_chunk() {
        let splitter = TextSplitter::new(100, 20);
        let chunks = splitter.split("Áo thun cotton, giá 199000 VND.");
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0], "Áo thun cotton, giá 199000 VND.");
    }

    #[test]
    fn empty_text_yields_no_chunks() {
        let splitter = TextSplitter::new(100, 20);
        assert!(splitter.split("   \n  ").is_empty());
    }

    #[test]
    fn chunks_never_exceed_chunk_size() {
        let splitter = TextSplitter::new(50, 10);
        let text = "quần áo thời trang ".repeat(40);
        for chunk in splitter.split(&text) {
            assert!(chunk.chars().count() <= 50, "oversized chunk: {chunk}");
        }
    }

    #[test]
    fn consecutive_chunks_overlap() {
        let splitter = TextSplitter::new(40, 15);
        let text = "một hai ba bốn năm sáu bảy tám chín mười ".repeat(10);
        let chunks = splitter.split(&text);
        assert!(chunks.len() > 1);

        // the head of each following chunk repeats text from the previous one
        for pair in chunks.windows(2) {
            let head: String = pair[1].chars().take(5).collect();
            assert!(pair[0].contains(head.trim()), "no overlap between chunks");
        }
    }

    #[test]
    fn splitting_preserves_all_words() {
        let splitter = TextSplitter::new(30, 10);
        let text = "alpha beta gamma delta epsilon zeta eta theta iota kappa";
        let joined = splitter.split(text).join(" ");
        for word in text.split_whitespace() {
            assert!(joined.contains(word), "missing word: {word}");
        }
    }
}
