//! Folio Storage Layer
//!
//! Flat-file persistence and in-memory lookups for the pipeline.
//!
//! # Architecture
//!
//! - [`jsonl`]: page and chunk record files, one JSON object per line
//! - [`PageStore`]: read-only `(pdf_name, page) → text` lookup used for
//!   small-to-big expansion
//! - [`VectorIndex`]: HNSW nearest-neighbour search over fixed-dimension vectors
//! - [`VectorStore`]: vector index plus chunk metadata, persisted as
//!   `vectors.bin` + `meta.jsonl` in one directory
//! - [`HashingEmbedder`]: deterministic offline embedding model
//!
//! # Examples
//!
//! ```
//! use folio_domain::ChunkRecord;
//! use folio_domain::traits::EmbeddingModel;
//! use folio_store::{HashingEmbedder, VectorStore};
//!
//! let embedder = HashingEmbedder::new(64);
//! let chunk = ChunkRecord::new("d::p0001-p0001::c0000", "d", "d.pdf", 1, 1, "tf idf weighting").unwrap();
//!
//! let mut store = VectorStore::new(embedder.dimension(), 1);
//! store.add(embedder.embed(&chunk.text).unwrap(), chunk).unwrap();
//!
//! let hits = store.search(&embedder.embed("idf").unwrap(), 5).unwrap();
//! assert_eq!(hits[0].chunk.page_start, 1);
//! ```

#![warn(missing_docs)]

pub mod embedding;
mod error;
pub mod jsonl;
mod page_store;
pub mod vector_index;
mod vector_store;

pub use embedding::{cosine_similarity, l2_normalize, HashingEmbedder};
pub use error::StoreError;
pub use jsonl::{read_chunks, read_jsonl, read_pages, write_jsonl};
pub use page_store::{PageStore, PageText};
pub use vector_index::VectorIndex;
pub use vector_store::{VectorStore, META_FILE, VECTORS_FILE};
