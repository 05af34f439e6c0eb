//! Search command implementation.

use crate::backends;
use crate::cli::SearchArgs;
use crate::config::{Config, OutputFormat};
use crate::error::{CliError, Result};
use crate::output::Formatter;
use folio_rag::{expand_hits, Retriever, RetrieverConfig};
use folio_store::{PageStore, PageText};

/// Execute the search command.
pub fn execute_search(args: SearchArgs, config: &Config, formatter: &Formatter) -> Result<()> {
    let top_k = args.top_k.unwrap_or(config.retrieval.top_k);
    if top_k == 0 {
        return Err(CliError::InvalidInput("top_k must be greater than 0".to_string()));
    }
    let index_dir = args.index_dir.unwrap_or_else(|| config.paths.index_dir.clone());

    let embedder = backends::embedder(&config.embedding)?;
    let retriever = Retriever::open(&index_dir, embedder, RetrieverConfig { top_k })?;
    let hits = retriever.retrieve(&args.query)?;
    println!("{}", formatter.format_hits(&hits)?);

    if let Some(expand_pages) = args.expand_pages {
        let pages_path = args.pages.unwrap_or_else(|| config.paths.pages.clone());
        let pages = PageStore::load(&pages_path, PageText::Raw)?;
        let expanded = expand_hits(&hits, expand_pages, &pages);
        if formatter.format() == OutputFormat::Table {
            println!(
                "{}",
                formatter.info(&format!("Page windows (±{} pages)", expand_pages))
            );
        }
        println!("{}", formatter.format_expanded(&expanded)?);
    }
    Ok(())
}
