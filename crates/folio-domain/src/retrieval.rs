//! Query-time records: retrieval hits and expanded contexts

use crate::chunk::ChunkRecord;
use serde::{Deserialize, Serialize};

/// A chunk returned by nearest-neighbour search
///
/// Serializes as the chunk's fields plus `score`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetrievalHit {
    /// The matched chunk
    #[serde(flatten)]
    pub chunk: ChunkRecord,

    /// Similarity to the query (higher is more relevant)
    pub score: f32,
}

impl RetrievalHit {
    /// Pair a chunk with its score
    pub fn new(chunk: ChunkRecord, score: f32) -> Self {
        Self { chunk, score }
    }

    /// `pdf:start-end`, the short form used in reports
    pub fn source_label(&self) -> String {
        format!(
            "{}:{}-{}",
            self.chunk.pdf_name, self.chunk.page_start, self.chunk.page_end
        )
    }
}

/// A retrieval hit widened to its neighbouring pages
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpandedContext {
    /// Source PDF file name
    pub pdf_name: String,

    /// First page of the widened window
    pub page_start: u32,

    /// Last page of the widened window
    pub page_end: u32,

    /// Score inherited from the seed hit
    pub score: f32,

    /// Distinct pages of the window joined by blank lines
    pub text: String,

    /// Page range of the chunk the window was grown from
    pub seed_chunk_pages: (u32, u32),
}
