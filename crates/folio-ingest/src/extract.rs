//! Per-page PDF text extraction

use crate::error::IngestError;
use lopdf::Document;
use std::path::Path;
use tracing::{debug, warn};

/// Source of raw per-page text
///
/// Returns one string per page, in page order.
pub trait PageTextExtractor {
    /// Extract the text of every page of `path`
    fn extract_pages(&self, path: &Path) -> Result<Vec<String>, IngestError>;
}

/// Pure-Rust extractor backed by `lopdf`
#[derive(Debug, Clone, Copy, Default)]
pub struct LopdfExtractor;

impl PageTextExtractor for LopdfExtractor {
    fn extract_pages(&self, path: &Path) -> Result<Vec<String>, IngestError> {
        let doc = Document::load(path).map_err(|e| IngestError::Pdf {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        let pages = doc.get_pages();
        debug!("PDF {} has {} pages", path.display(), pages.len());

        let mut out = Vec::with_capacity(pages.len());
        for page_num in pages.keys() {
            match doc.extract_text(&[*page_num]) {
                Ok(text) => out.push(text),
                Err(e) => {
                    warn!("No text extracted from page {} of {}: {}", page_num, path.display(), e);
                    out.push(String::new());
                }
            }
        }
        Ok(out)
    }
}
