//! Page records produced by ingestion

use crate::error::DomainError;
use serde::{Deserialize, Serialize};

/// One page of a source PDF
///
/// Created once per page during ingestion and never mutated afterwards.
/// `text_raw` is the extractor output, `text_clean` the same text with
/// page numbers and running headers/footers removed.
///
/// # Examples
///
/// ```
/// use folio_domain::PageRecord;
///
/// let page = PageRecord::new("slp3", "slp3.pdf", 1, "raw", "clean").unwrap();
/// assert_eq!(page.page, 1);
/// assert!(PageRecord::new("slp3", "slp3.pdf", 0, "", "").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRecord {
    /// Document identifier (file stem of the PDF)
    pub doc_id: String,

    /// File name of the PDF
    pub pdf_name: String,

    /// 1-based page number
    pub page: u32,

    /// Text as extracted
    #[serde(default)]
    pub text_raw: String,

    /// Text after header/footer stripping
    #[serde(default)]
    pub text_clean: String,
}

impl PageRecord {
    /// Create a validated page record
    pub fn new(
        doc_id: impl Into<String>,
        pdf_name: impl Into<String>,
        page: u32,
        text_raw: impl Into<String>,
        text_clean: impl Into<String>,
    ) -> Result<Self, DomainError> {
        let record = Self {
            doc_id: doc_id.into(),
            pdf_name: pdf_name.into(),
            page,
            text_raw: text_raw.into(),
            text_clean: text_clean.into(),
        };
        record.validate()?;
        Ok(record)
    }

    /// Check the invariants a deserialized record cannot enforce by itself
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.doc_id.is_empty() {
            return Err(DomainError::MissingField("doc_id"));
        }
        if self.pdf_name.is_empty() {
            return Err(DomainError::MissingField("pdf_name"));
        }
        if self.page == 0 {
            return Err(DomainError::InvalidPage(self.page));
        }
        Ok(())
    }
}
