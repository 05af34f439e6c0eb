//! Folio Ingestion
//!
//! Turns a single PDF into page records and page records into chunks.
//!
//! # Architecture
//!
//! ```text
//! PDF → PageTextExtractor → clean_pdf_pages → PageRecord* → Chunker → ChunkRecord*
//! ```
//!
//! - [`LopdfExtractor`] reads per-page text with `lopdf`
//! - [`clean_pdf_pages`] strips page numbers and running headers/footers
//! - [`Chunker`] packs pages into size-bounded, page-tagged chunks with a
//!   character-level overlap
//!
//! # Example Usage
//!
//! ```
//! use folio_domain::PageRecord;
//! use folio_ingest::{ChunkConfig, Chunker};
//!
//! let pages = vec![
//!     PageRecord::new("doc", "doc.pdf", 1, "", "A".repeat(200)).unwrap(),
//!     PageRecord::new("doc", "doc.pdf", 2, "", "B".repeat(200)).unwrap(),
//! ];
//! let chunker = Chunker::new(ChunkConfig { max_chars: 250, overlap_chars: 0, min_chars: 50 });
//! let chunks = chunker.chunk_pages(&pages);
//!
//! assert_eq!(chunks.len(), 2);
//! assert_eq!((chunks[0].page_start, chunks[0].page_end), (1, 1));
//! assert_eq!((chunks[1].page_start, chunks[1].page_end), (2, 2));
//! ```

#![warn(missing_docs)]

mod chunking;
mod clean;
mod config;
mod error;
mod extract;
mod ingest;
pub mod text;

pub use chunking::{page_block, Chunker};
pub use clean::{clean_pdf_pages, CleaningParams, CleaningReport, CleaningStats};
pub use config::ChunkConfig;
pub use error::IngestError;
pub use extract::{LopdfExtractor, PageTextExtractor};
pub use ingest::{find_single_pdf, ingest_single_pdf, IngestReport};
