//! Ask command implementation.

use crate::backends;
use crate::cli::AskArgs;
use crate::config::Config;
use crate::error::{CliError, Result};
use crate::output::Formatter;
use folio_rag::{RagConfig, RagTutor, Retriever, RetrieverConfig};
use folio_store::{PageStore, PageText};
use tracing::info;

/// Execute the ask command.
pub fn execute_ask(args: AskArgs, config: &Config, formatter: &Formatter) -> Result<()> {
    if args.question.trim().is_empty() {
        return Err(CliError::InvalidInput("question must not be empty".to_string()));
    }
    let top_k = args.top_k.unwrap_or(config.retrieval.top_k);
    let index_dir = args.index_dir.unwrap_or_else(|| config.paths.index_dir.clone());
    let expand_pages = args.expand_pages.or(config.retrieval.expand_pages);

    let llm = backends::provider(
        &config.llm,
        args.model.unwrap_or_else(|| config.llm.model.clone()),
        args.temperature.unwrap_or(config.llm.temperature),
        args.max_tokens,
    )?;
    let embedder = backends::embedder(&config.embedding)?;
    let retriever = Retriever::open(&index_dir, embedder, RetrieverConfig { top_k })?;

    let rag_config = RagConfig {
        expand_pages,
        language: config.llm.prompt_language,
    };
    let mut tutor = RagTutor::new(retriever, llm, rag_config);
    if expand_pages.is_some() {
        let pages_path = args.pages.unwrap_or_else(|| config.paths.pages.clone());
        tutor = tutor.with_pages(PageStore::load(&pages_path, PageText::Raw)?);
    }

    let answer = tutor.answer(&args.question)?;
    info!("Answer has {} sources", answer.sources.len());
    println!("{}", formatter.format_answer(&answer)?);
    Ok(())
}
