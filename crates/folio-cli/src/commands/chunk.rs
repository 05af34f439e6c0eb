//! Chunk command implementation.

use crate::cli::ChunkArgs;
use crate::config::{Config, OutputFormat};
use crate::error::{CliError, Result};
use crate::output::Formatter;
use folio_ingest::{ChunkConfig, Chunker};
use folio_store::{read_pages, write_jsonl};

/// Execute the chunk command.
pub fn execute_chunk(args: ChunkArgs, config: &Config, formatter: &Formatter) -> Result<()> {
    let pages_path = args.pages.unwrap_or_else(|| config.paths.pages.clone());
    let out = args.out.unwrap_or_else(|| config.paths.chunks.clone());
    let chunk_config = ChunkConfig {
        max_chars: args.max_chars.unwrap_or(config.chunking.max_chars),
        overlap_chars: args.overlap_chars.unwrap_or(config.chunking.overlap_chars),
        min_chars: args.min_chars.unwrap_or(config.chunking.min_chars),
    };
    chunk_config.validate().map_err(CliError::InvalidInput)?;

    let pages = read_pages(&pages_path)?;
    let chunks = Chunker::new(chunk_config).chunk_pages(&pages);
    write_jsonl(&out, &chunks)?;

    match formatter.format() {
        OutputFormat::Json => println!(
            "{}",
            formatter.json(&serde_json::json!({
                "chunks": chunks.len(),
                "out": out,
                "config": chunk_config,
            }))?
        ),
        OutputFormat::Quiet => println!("{}", out.display()),
        OutputFormat::Table => println!(
            "{}",
            formatter.success(&format!("chunks={} -> {}", chunks.len(), out.display()))
        ),
    }
    Ok(())
}
