//! Chunk records - the unit of retrieval

use crate::error::DomainError;
use serde::{Deserialize, Serialize};

/// Build the deterministic identifier of a chunk
///
/// Page numbers and the sequence index are zero-padded to four digits so
/// that ids of one document sort in emission order.
///
/// # Examples
///
/// ```
/// use folio_domain::chunk_id;
///
/// assert_eq!(chunk_id("slp3", 12, 14, 7), "slp3::p0012-p0014::c0007");
/// ```
pub fn chunk_id(doc_id: &str, page_start: u32, page_end: u32, seq: usize) -> String {
    format!("{doc_id}::p{page_start:04}-p{page_end:04}::c{seq:04}")
}

/// A bounded span of document text with its page provenance
///
/// Chunks are created in one pass by the chunker, persisted to a flat
/// record file and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChunkRecord {
    /// Unique id within the document, see [`chunk_id`]
    pub chunk_id: String,

    /// Document identifier
    pub doc_id: String,

    /// File name of the source PDF
    pub pdf_name: String,

    /// First page contributing to this chunk
    pub page_start: u32,

    /// Last page contributing to this chunk
    pub page_end: u32,

    /// Whitespace-normalized chunk text
    pub text: String,
}

impl ChunkRecord {
    /// Create a validated chunk record
    pub fn new(
        chunk_id: impl Into<String>,
        doc_id: impl Into<String>,
        pdf_name: impl Into<String>,
        page_start: u32,
        page_end: u32,
        text: impl Into<String>,
    ) -> Result<Self, DomainError> {
        let record = Self {
            chunk_id: chunk_id.into(),
            doc_id: doc_id.into(),
            pdf_name: pdf_name.into(),
            page_start,
            page_end,
            text: text.into(),
        };
        record.validate()?;
        Ok(record)
    }

    /// Check required fields and the page range
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.chunk_id.is_empty() {
            return Err(DomainError::MissingField("chunk_id"));
        }
        if self.pdf_name.is_empty() {
            return Err(DomainError::MissingField("pdf_name"));
        }
        if self.page_start == 0 {
            return Err(DomainError::InvalidPage(self.page_start));
        }
        if self.page_start > self.page_end {
            return Err(DomainError::InvalidPageRange {
                start: self.page_start,
                end: self.page_end,
            });
        }
        Ok(())
    }

    /// Number of pages spanned by the chunk
    pub fn page_span(&self) -> u32 {
        self.page_end - self.page_start + 1
    }
}
