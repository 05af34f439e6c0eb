//! Read-only page text lookup for context expansion

use crate::error::StoreError;
use crate::jsonl::read_pages;
use folio_domain::PageRecord;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use tracing::debug;

/// Which page text the lookup serves
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PageText {
    /// Extractor output, falling back to cleaned text when empty
    #[default]
    Raw,
    /// Text with page numbers and running headers/footers removed
    Clean,
}

/// Page text keyed by `(pdf file name, page number)`
///
/// Built once from the page record file and never mutated; hand it to the
/// context expander by reference.
///
/// # Examples
///
/// ```
/// use folio_domain::PageRecord;
/// use folio_store::{PageStore, PageText};
///
/// let pages = vec![PageRecord::new("x", "x.pdf", 4, "four", "4").unwrap()];
/// let store = PageStore::from_pages(pages, PageText::Raw);
///
/// assert_eq!(store.get("x.pdf", 4), Some("four"));
/// assert_eq!(store.get("data/raw/x.pdf", 4), Some("four"));
/// assert_eq!(store.get("x.pdf", 5), None);
/// ```
#[derive(Debug, Clone, Default)]
pub struct PageStore {
    pages: HashMap<(String, u32), String>,
}

impl PageStore {
    /// Build the lookup from page records; later duplicates win
    pub fn from_pages(pages: impl IntoIterator<Item = PageRecord>, text: PageText) -> Self {
        let mut lookup = HashMap::new();
        for page in pages {
            let body = match text {
                PageText::Raw if !page.text_raw.is_empty() => page.text_raw,
                PageText::Raw | PageText::Clean => page.text_clean,
            };
            lookup.insert((file_name(&page.pdf_name).to_string(), page.page), body);
        }
        Self { pages: lookup }
    }

    /// Build the lookup from a page record file
    pub fn load(path: &Path, text: PageText) -> Result<Self, StoreError> {
        let store = Self::from_pages(read_pages(path)?, text);
        debug!("Loaded {} pages from {}", store.len(), path.display());
        Ok(store)
    }

    /// Text of one page, if present
    pub fn get(&self, pdf_name: &str, page: u32) -> Option<&str> {
        self.pages
            .get(&(file_name(pdf_name).to_string(), page))
            .map(String::as_str)
    }

    /// Number of pages held
    pub fn len(&self) -> usize {
        self.pages.len()
    }

    /// True when no page is held
    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }
}

/// Final path component of a pdf name
fn file_name(pdf_name: &str) -> &str {
    Path::new(pdf_name)
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or(pdf_name)
}
