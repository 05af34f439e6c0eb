//! Index command implementation.

use crate::backends;
use crate::cli::IndexArgs;
use crate::config::{Config, OutputFormat};
use crate::error::Result;
use crate::output::Formatter;
use folio_rag::build_index;

/// Execute the index command.
pub fn execute_index(args: IndexArgs, config: &Config, formatter: &Formatter) -> Result<()> {
    let chunks = args.chunks.unwrap_or_else(|| config.paths.chunks.clone());
    let index_dir = args.index_dir.unwrap_or_else(|| config.paths.index_dir.clone());

    let embedder = backends::embedder(&config.embedding)?;
    let summary = build_index(&chunks, &index_dir, &embedder, args.batch_size)?;

    match formatter.format() {
        OutputFormat::Json => println!("{}", formatter.json(&summary)?),
        OutputFormat::Quiet => println!("{}", index_dir.display()),
        OutputFormat::Table => println!(
            "{}",
            formatter.success(&format!(
                "indexed chunks={} dim={} -> {}",
                summary.chunks,
                summary.dim,
                index_dir.display()
            ))
        ),
    }
    Ok(())
}
