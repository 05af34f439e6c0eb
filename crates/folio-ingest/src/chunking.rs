//! Page-aware chunking
//!
//! Pages are appended to a buffer as tagged blocks (`[PAGE n]`) so page
//! boundaries stay visible inside every chunk. The buffer is flushed into a
//! chunk whenever the next block would overflow it or it reaches
//! `max_chars`. After each chunk the last `overlap_chars` characters are
//! carried into the next buffer, attributed to the last page of the chunk
//! just emitted.

use crate::config::ChunkConfig;
use crate::text::normalize_spaces;
use folio_domain::{chunk_id, ChunkRecord, PageRecord};
use tracing::debug;

/// Format one page as a delimited, tagged block
pub fn page_block(page: u32, text: &str) -> String {
    format!("\n[PAGE {page}]\n{text}\n")
}

/// Packs the pages of one document into chunks
pub struct Chunker {
    config: ChunkConfig,
}

impl Chunker {
    /// Create a new chunker
    pub fn new(config: ChunkConfig) -> Self {
        Self { config }
    }

    /// Chunk limits in use
    pub fn config(&self) -> &ChunkConfig {
        &self.config
    }

    /// Chunk the pages of a single document
    ///
    /// Pages may arrive in any order; they are sorted by page number first.
    /// Pages whose cleaned text is blank are skipped. Chunk ids, doc id and
    /// pdf name come from the lowest-numbered page.
    ///
    /// A chunk seeded by carried-over text starts at the page that text came
    /// from and only widens as new pages are appended, so a trailing chunk
    /// made purely of carry-over reports that single page.
    pub fn chunk_pages(&self, pages: &[PageRecord]) -> Vec<ChunkRecord> {
        let mut ordered: Vec<&PageRecord> = pages.iter().collect();
        ordered.sort_by_key(|p| p.page);

        let Some(first) = ordered.first() else {
            return Vec::new();
        };
        let mut buffer = ChunkBuffer::new(&first.doc_id, &first.pdf_name, &self.config);

        for page in &ordered {
            let text = page.text_clean.trim();
            if text.is_empty() {
                continue;
            }

            let block = page_block(page.page, text);
            let block_chars = block.chars().count();

            if !buffer.is_empty() && buffer.chars + block_chars > self.config.max_chars {
                buffer.flush(true);
            }
            buffer.append(page.page, &block, block_chars);
            if buffer.chars >= self.config.max_chars {
                buffer.flush(true);
            }
        }
        buffer.flush(true);

        debug!(
            "Chunked {} pages of {} into {} chunks",
            ordered.len(),
            first.doc_id,
            buffer.chunks.len()
        );
        buffer.chunks
    }
}

/// Accumulation state for one document
struct ChunkBuffer<'a> {
    doc_id: &'a str,
    pdf_name: &'a str,
    config: &'a ChunkConfig,
    text: String,
    /// Length of `text` in characters
    chars: usize,
    /// Pages the buffered text is attributed to
    range: Option<(u32, u32)>,
    chunks: Vec<ChunkRecord>,
}

impl<'a> ChunkBuffer<'a> {
    fn new(doc_id: &'a str, pdf_name: &'a str, config: &'a ChunkConfig) -> Self {
        Self {
            doc_id,
            pdf_name,
            config,
            text: String::new(),
            chars: 0,
            range: None,
            chunks: Vec::new(),
        }
    }

    fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    fn append(&mut self, page: u32, block: &str, block_chars: usize) {
        let start = self.range.map_or(page, |(start, _)| start);
        self.range = Some((start, page));
        self.text.push_str(block);
        self.chars += block_chars;
    }

    fn flush(&mut self, force: bool) {
        let text = normalize_spaces(&self.text);
        if text.is_empty() {
            self.reset();
            return;
        }
        if !force && text.chars().count() < self.config.min_chars {
            return;
        }
        let Some((page_start, page_end)) = self.range else {
            self.reset();
            return;
        };

        self.chunks.push(ChunkRecord {
            chunk_id: chunk_id(self.doc_id, page_start, page_end, self.chunks.len()),
            doc_id: self.doc_id.to_string(),
            pdf_name: self.pdf_name.to_string(),
            page_start,
            page_end,
            text,
        });

        let overlap = self.config.overlap_chars;
        if overlap > 0 && self.chars > overlap {
            self.text = tail_chars(&self.text, overlap).to_string();
            self.chars = overlap;
            self.range = Some((page_end, page_end));
        } else {
            self.reset();
        }
    }

    fn reset(&mut self) {
        self.text.clear();
        self.chars = 0;
        self.range = None;
    }
}

/// The last `n` characters of `s`
fn tail_chars(s: &str, n: usize) -> &str {
    if n == 0 {
        return "";
    }
    match s.char_indices().rev().nth(n - 1) {
        Some((idx, _)) => &s[idx..],
        None => s,
    }
}
