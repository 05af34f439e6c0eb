//! Folio Domain Layer
//!
//! This crate contains the record types and collaborator interfaces shared by
//! every stage of the Folio pipeline. It depends only on `serde` (records are
//! persisted as line-delimited JSON) and `thiserror`.
//!
//! ## Key Concepts
//!
//! - **Page**: one page of a PDF, with raw and cleaned text
//! - **Chunk**: a bounded span of text tagged with the page range it came from
//! - **Retrieval hit**: a chunk plus its similarity to a query
//! - **Expanded context**: a hit widened to its neighbouring pages
//!
//! ## Architecture
//!
//! ```text
//! PDF → pages → chunks → vectors ─┐
//!                                 ├→ hits → expanded contexts → answer
//!                  question ──────┘
//! ```
//!
//! Implementations of [`traits::EmbeddingModel`] and [`traits::LlmProvider`]
//! live in `folio-store` and `folio-llm`.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod chat;
pub mod chunk;
pub mod error;
pub mod page;
pub mod retrieval;
pub mod traits;

// Re-exports for convenience
pub use chat::{ChatMessage, Completion, Role, TokenUsage};
pub use chunk::{chunk_id, ChunkRecord};
pub use error::{DomainError, EmbeddingError};
pub use page::PageRecord;
pub use retrieval::{ExpandedContext, RetrievalHit};
