//! Single-PDF ingestion into a page record file

use crate::clean::{clean_pdf_pages, CleaningParams, CleaningReport};
use crate::error::IngestError;
use crate::extract::PageTextExtractor;
use folio_domain::PageRecord;
use folio_store::write_jsonl;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

/// Summary of one ingestion run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngestReport {
    /// File name of the ingested PDF
    pub pdf_name: String,
    /// Number of pages written
    pub n_pages: usize,
    /// What header/footer cleaning removed
    #[serde(flatten)]
    pub cleaning: CleaningReport,
}

/// Locate the only `*.pdf` file in `dir`
///
/// Zero or several PDFs is a configuration error.
pub fn find_single_pdf(dir: &Path) -> Result<PathBuf, IngestError> {
    let mut pdfs = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        let is_pdf = path.extension().is_some_and(|ext| ext == "pdf");
        if is_pdf && path.is_file() {
            pdfs.push(path);
        }
    }
    pdfs.sort();

    if pdfs.len() != 1 {
        return Err(IngestError::PdfCount {
            dir: dir.to_path_buf(),
            found: pdfs.len(),
        });
    }
    Ok(pdfs.remove(0))
}

/// Extract, clean and write the pages of `pdf_path` to `out_pages`
///
/// Pages are numbered from 1; `doc_id` is the file stem and `pdf_name`
/// the file name.
pub fn ingest_single_pdf<E: PageTextExtractor>(
    pdf_path: &Path,
    out_pages: &Path,
    extractor: &E,
) -> Result<IngestReport, IngestError> {
    let raw_pages = extractor.extract_pages(pdf_path)?;
    let (cleaned_pages, cleaning) = clean_pdf_pages(&raw_pages, &CleaningParams::default());

    let doc_id = file_part(pdf_path.file_stem());
    let pdf_name = file_part(pdf_path.file_name());

    let mut records = Vec::with_capacity(raw_pages.len());
    for (page, (raw, clean)) in (1u32..).zip(raw_pages.into_iter().zip(cleaned_pages)) {
        records.push(PageRecord::new(&doc_id, &pdf_name, page, raw, clean)?);
    }

    write_jsonl(out_pages, &records)?;
    info!(
        "Ingested {} pages from {} -> {}",
        records.len(),
        pdf_name,
        out_pages.display()
    );

    Ok(IngestReport {
        pdf_name,
        n_pages: records.len(),
        cleaning,
    })
}

fn file_part(part: Option<&std::ffi::OsStr>) -> String {
    part.map(|p| p.to_string_lossy().into_owned()).unwrap_or_default()
}
