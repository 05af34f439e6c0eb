//! Small-to-big context expansion
//!
//! Retrieval runs on small chunks for precision; generation gets the
//! neighbouring pages of every hit. Each hit's page range is widened by
//! `expand_pages` on both sides, identical windows are kept once, and the
//! window text is rebuilt from the [`PageStore`] rather than from chunk text,
//! so overlap carried between chunks never shows up twice.
//!
//! # Examples
//!
//! ```
//! use folio_domain::{ChunkRecord, PageRecord, RetrievalHit};
//! use folio_rag::expand_hits;
//! use folio_store::{PageStore, PageText};
//!
//! let pages = (4..=6).map(|n| PageRecord::new("x", "x.pdf", n, format!("page {n}"), "").unwrap());
//! let store = PageStore::from_pages(pages, PageText::Raw);
//! let seed = ChunkRecord::new("x::p0005-p0005::c0000", "x", "x.pdf", 5, 5, "page 5").unwrap();
//!
//! let expanded = expand_hits(&[RetrievalHit::new(seed, 0.9)], 1, &store);
//! assert_eq!((expanded[0].page_start, expanded[0].page_end), (4, 6));
//! assert_eq!(expanded[0].text, "page 4\n\npage 5\n\npage 6");
//! ```

use crate::error::RagError;
use crate::retriever::Retriever;
use folio_domain::{ExpandedContext, RetrievalHit};
use folio_store::PageStore;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::debug;

/// Separator placed between the pages of a window
const PAGE_SEPARATOR: &str = "\n\n";

/// Settings for [`retrieve_small2big`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Small2BigConfig {
    /// Pages added on each side of a hit
    pub expand_pages: u32,
    /// Hits kept from the small-chunk search
    pub top_k_small: usize,
}

impl Default for Small2BigConfig {
    fn default() -> Self {
        Self {
            expand_pages: 1,
            top_k_small: 8,
        }
    }
}

/// Widen ranked hits into page windows
///
/// For a hit covering pages `ps..=pe` the window is
/// `max(1, ps - expand_pages)..=pe + expand_pages`. Of several hits with the
/// same `(pdf_name, start, end)` window only the first in input order is
/// kept. Pages missing from `pages` or empty are left out of the window
/// text; a window with no text at all is dropped. The result is sorted by
/// score, highest first, ties keeping input order.
pub fn expand_hits(
    hits: &[RetrievalHit],
    expand_pages: u32,
    pages: &PageStore,
) -> Vec<ExpandedContext> {
    let mut seen = HashSet::new();
    let mut expanded = Vec::with_capacity(hits.len());

    for hit in hits {
        let seed = (hit.chunk.page_start, hit.chunk.page_end);
        let start = seed.0.saturating_sub(expand_pages).max(1);
        let end = seed.1.saturating_add(expand_pages);

        if !seen.insert((hit.chunk.pdf_name.as_str(), start, end)) {
            continue;
        }

        let parts: Vec<&str> = (start..=end)
            .filter_map(|page| pages.get(&hit.chunk.pdf_name, page))
            .filter(|text| !text.is_empty())
            .collect();
        let text = parts.join(PAGE_SEPARATOR).trim().to_string();
        if text.is_empty() {
            debug!(
                "No page text for {} pages {}-{}, dropping window",
                hit.chunk.pdf_name, start, end
            );
            continue;
        }

        expanded.push(ExpandedContext {
            pdf_name: hit.chunk.pdf_name.clone(),
            page_start: start,
            page_end: end,
            score: hit.score,
            text,
            seed_chunk_pages: seed,
        });
    }

    expanded.sort_by(|a, b| b.score.total_cmp(&a.score));
    expanded
}

/// Retrieve small chunks, then widen them with [`expand_hits`]
///
/// Returns the hits (at most `top_k_small` of the retriever's results) and
/// their expanded windows.
pub fn retrieve_small2big(
    question: &str,
    retriever: &Retriever,
    pages: &PageStore,
    config: Small2BigConfig,
) -> Result<(Vec<RetrievalHit>, Vec<ExpandedContext>), RagError> {
    let mut hits = retriever.retrieve(question)?;
    hits.truncate(config.top_k_small);
    let expanded = expand_hits(&hits, config.expand_pages, pages);
    debug!("{} hits expanded into {} windows", hits.len(), expanded.len());
    Ok((hits, expanded))
}
