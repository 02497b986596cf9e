/// Paragraph delimiter used for splitting
const PARAGRAPH_SEPARATOR: &str = "\n\n";

/// Character length of the separator counted between joined paragraphs
const SEPARATOR_LEN: usize = 2;

/// Text chunk
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextChunk {
    /// Chunk text
    pub text: String,

    /// Position in the chunk sequence
    pub index: usize,

    /// Byte offset of the first paragraph in the original text
    pub start: usize,

    /// Byte offset just past the last paragraph in the original text
    pub end: usize,
}

impl TextChunk {
    /// Length in characters
    pub fn char_len(&self) -> usize {
        self.text.chars().count()
    }
}

/// Split text into chunks of at most `max_chars` characters on paragraph
/// boundaries.
///
/// Text that already fits is returned unchanged as a single chunk. Otherwise
/// paragraphs are packed greedily, counting a two-character separator between
/// them. A paragraph longer than `max_chars` is emitted alone, unsplit.
/// Blank input yields no chunks.
pub fn chunk_text(text: &str, max_chars: usize) -> Vec<TextChunk> {
    let max_chars = max_chars.max(1);

    // Whitespace-only input yields no chunk even when it would fit in one
    if text.trim().is_empty() {
        return Vec::new();
    }

    if char_len(text) <= max_chars {
        // Text is short enough, return as single chunk
        return vec![TextChunk {
            text: text.to_string(),
            index: 0,
            start: 0,
            end: text.len(),
        }];
    }

    let mut chunks = Vec::new();
    let mut current = String::new();
    let mut current_len = 0;
    let mut current_start = 0;
    let mut current_end = 0;

    for (offset, paragraph) in paragraph_spans(text) {
        let paragraph_len = char_len(paragraph);
        let needed = if current.is_empty() {
            paragraph_len
        } else {
            current_len + SEPARATOR_LEN + paragraph_len
        };

        if needed <= max_chars {
            if current.is_empty() {
                current_start = offset;
            } else {
                current.push_str(PARAGRAPH_SEPARATOR);
            }
            current.push_str(paragraph);
            current_len = needed;
        } else {
            if !current.is_empty() {
                push_chunk(&mut chunks, &current, current_start, current_end);
            }
            current = paragraph.to_string();
            current_len = paragraph_len;
            current_start = offset;
        }
        current_end = offset + paragraph.len();
    }

    if !current.is_empty() {
        push_chunk(&mut chunks, &current, current_start, current_end);
    }

    chunks
}

fn push_chunk(chunks: &mut Vec<TextChunk>, text: &str, start: usize, end: usize) {
    chunks.push(TextChunk {
        text: text.trim_end().to_string(),
        index: chunks.len(),
        start,
        end,
    });
}

/// Trimmed, non-empty paragraphs with their byte offsets
fn paragraph_spans(text: &str) -> Vec<(usize, &str)> {
    let mut spans = Vec::new();
    let mut offset = 0;

    for raw in text.split(PARAGRAPH_SEPARATOR) {
        let leading = raw.len() - raw.trim_start().len();
        let paragraph = raw.trim();
        if !paragraph.is_empty() {
            spans.push((offset + leading, paragraph));
        }
        offset += raw.len() + PARAGRAPH_SEPARATOR.len();
    }

    spans
}

/// Split text by paragraphs
pub fn split_paragraphs(text: &str) -> Vec<String> {
    text.split(PARAGRAPH_SEPARATOR)
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .map(|s| s.to_string())
        .collect()
}

/// Length in characters
pub fn char_len(text: &str) -> usize {
    text.chars().count()
}

/// Prefix of at most `max_chars` characters
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}
