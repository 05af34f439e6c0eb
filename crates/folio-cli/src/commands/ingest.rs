//! Ingest command implementation.

use crate::cli::IngestArgs;
use crate::config::{Config, OutputFormat};
use crate::error::Result;
use crate::output::Formatter;
use folio_ingest::{find_single_pdf, ingest_single_pdf, LopdfExtractor};

/// Execute the ingest command.
pub fn execute_ingest(args: IngestArgs, config: &Config, formatter: &Formatter) -> Result<()> {
    let pdf_dir = args.pdf_dir.unwrap_or_else(|| config.paths.pdf_dir.clone());
    let out = args.out.unwrap_or_else(|| config.paths.pages.clone());

    let pdf_path = find_single_pdf(&pdf_dir)?;
    let report = ingest_single_pdf(&pdf_path, &out, &LopdfExtractor)?;

    match formatter.format() {
        OutputFormat::Json => println!("{}", formatter.json(&report)?),
        OutputFormat::Quiet => println!("{}", out.display()),
        OutputFormat::Table => {
            println!(
                "{}",
                formatter.success(&format!("pages={} -> {}", report.n_pages, out.display()))
            );
            println!("{}", formatter.json(&report)?);
        }
    }
    Ok(())
}
