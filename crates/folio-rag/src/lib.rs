//! Folio Retrieval and Answering
//!
//! Query-time half of the pipeline: index building, chunk retrieval,
//! small-to-big context expansion and grounded answer generation.
//!
//! # Architecture
//!
//! ```text
//! chunks.jsonl → build_index → index dir
//! question → Retriever → hits ─┬──────────────→ prompt → LlmProvider → Answer
//!                              └→ expand_hits ─┘
//!                                  (PageStore)
//! ```
//!
//! # Examples
//!
//! ```
//! use folio_domain::traits::EmbeddingModel;
//! use folio_domain::ChunkRecord;
//! use folio_llm::MockProvider;
//! use folio_rag::{RagConfig, RagTutor, Retriever, RetrieverConfig};
//! use folio_store::{HashingEmbedder, VectorStore};
//!
//! let embedder = HashingEmbedder::new(64);
//! let chunk = ChunkRecord::new("d::p0002-p0002::c0000", "d", "d.pdf", 2, 2, "bag of words").unwrap();
//! let mut store = VectorStore::new(64, 1);
//! store.add(embedder.embed(&chunk.text).unwrap(), chunk).unwrap();
//!
//! let retriever = Retriever::new(store, embedder, RetrieverConfig::default()).unwrap();
//! let tutor = RagTutor::new(retriever, MockProvider::new("A multiset of words."), RagConfig::default());
//!
//! let answer = tutor.answer("What is a bag of words?").unwrap();
//! assert_eq!(answer.answer, "A multiset of words.");
//! assert_eq!(answer.sources[0].page_start, 2);
//! ```

#![warn(missing_docs)]

mod error;
mod expansion;
mod indexer;
pub mod prompt;
mod retriever;
mod tutor;

pub use error::RagError;
pub use expansion::{expand_hits, retrieve_small2big, Small2BigConfig};
pub use indexer::{build_index, IndexSummary, DEFAULT_BATCH_SIZE};
pub use prompt::{format_sources, tutor_messages, tutor_messages_in, PromptLanguage, PromptSource};
pub use retriever::{Retriever, RetrieverConfig};
pub use tutor::{Answer, RagConfig, RagTutor, SourceCitation};
