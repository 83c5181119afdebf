use super::types::{Document, Split};

#[derive(Debug, Clone)]
pub struct SplitterConfig {
    pub chunk_size: usize,
    pub chunk_overlap: usize,
}

impl Default for SplitterConfig {
    fn default() -> Self {
        Self {
            chunk_size: 1000,
            chunk_overlap: 150,
        }
    }
}

/// Splits document content into overlapping chunks, preferring line breaks
/// as boundaries and falling back to hard character splits for oversized
/// lines.
pub struct TextSplitter {
    config: SplitterConfig,
}

impl TextSplitter {
    #[must_use]
    pub fn new(config: SplitterConfig) -> Self {
        Self { config }
    }

    #[must_use]
    pub fn split(&self, document: &Document) -> Vec<Split> {
        let text = &document.content;
        if text.is_empty() {
            return Vec::new();
        }

        let pieces = split_lines(text, self.config.chunk_size);
        let merged = merge_pieces(&pieces, self.config.chunk_size, self.config.chunk_overlap);

        merged
            .into_iter()
            .enumerate()
            .map(|(i, content)| Split {
                content,
                metadata: document.metadata.clone(),
                index: i,
            })
            .collect()
    }
}

/// Cut text into line pieces, each keeping its trailing newline. Lines
/// longer than `chunk_size` are hard-split by characters.
fn split_lines(text: &str, chunk_size: usize) -> Vec<String> {
    let mut pieces = Vec::new();
    for line in text.split_inclusive('\n') {
        if line.chars().count() > chunk_size {
            pieces.extend(split_chars(line, chunk_size, 0));
        } else {
            pieces.push(line.to_owned());
        }
    }
    pieces
}

/// Merge pieces into chunks, respecting size and overlap.
fn merge_pieces(pieces: &[String], chunk_size: usize, chunk_overlap: usize) -> Vec<String> {
    let mut chunks = Vec::new();
    let mut current = String::new();
    // Sliding window: track only the piece indices contributing to the
    // current chunk.
    let mut window_start = 0;

    for (idx, piece) in pieces.iter().enumerate() {
        if !current.is_empty() && current.len() + piece.len() > chunk_size {
            chunks.push(current.clone());

            // Build overlap from recent pieces (walk backwards from current window)
            current.clear();
            let mut overlap_len = 0;
            let mut overlap_start = idx;
            for i in (window_start..idx).rev() {
                if overlap_len + pieces[i].len() > chunk_overlap {
                    break;
                }
                overlap_len += pieces[i].len();
                overlap_start = i;
            }
            for p in &pieces[overlap_start..idx] {
                current.push_str(p);
            }
            window_start = overlap_start;
        }

        current.push_str(piece);
    }

    if !current.is_empty() {
        chunks.push(current);
    }

    chunks
}

fn split_chars(text: &str, chunk_size: usize, overlap: usize) -> Vec<String> {
    let mut chunks = Vec::new();
    let chars: Vec<char> = text.chars().collect();
    let step = chunk_size.saturating_sub(overlap).max(1);
    let mut start = 0;

    while start < chars.len() {
        let end = (start + chunk_size).min(chars.len());
        chunks.push(chars[start..end].iter().collect());
        start += step;
    }

    chunks
}
