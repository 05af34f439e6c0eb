//! Chunk → index → search → evaluate through the command handlers

use anyhow::Result;
use folio_cli::cli::{AskArgs, ChunkArgs, EvaluateArgs, IndexArgs, SearchArgs};
use folio_cli::commands::{execute_ask, execute_chunk, execute_evaluate, execute_index, execute_search};
use folio_cli::config::{Config, EmbeddingBackend, OutputFormat};
use folio_cli::{CliError, Formatter};
use folio_domain::PageRecord;
use folio_llm::LlmError;
use folio_store::{read_chunks, write_jsonl, META_FILE, VECTORS_FILE};
use std::fs;
use tempfile::TempDir;

const TOPICS: [&str; 4] = [
    "tokenization splits raw text into word pieces",
    "term frequency counts how often a term occurs",
    "cosine similarity compares document vectors by angle",
    "word embeddings place similar words close together",
];

fn workspace() -> Result<(TempDir, Config)> {
    let dir = TempDir::new()?;
    let mut config = Config::default();
    config.paths.pages = dir.path().join("interim").join("pages.jsonl");
    config.paths.chunks = dir.path().join("interim").join("chunks.jsonl");
    config.paths.index_dir = dir.path().join("index");
    config.embedding.provider = EmbeddingBackend::Hashing;
    config.embedding.dimension = 64;
    config.llm.api_key_env = "FOLIO_TEST_KEY_THAT_IS_NEVER_SET".to_string();

    let pages: Vec<PageRecord> = TOPICS
        .iter()
        .enumerate()
        .map(|(i, topic)| {
            let body = format!("{topic}. ").repeat(4);
            PageRecord::new("notes", "notes.pdf", i as u32 + 1, body.clone(), body).unwrap()
        })
        .collect();
    write_jsonl(&config.paths.pages, &pages)?;
    Ok((dir, config))
}

fn chunk_and_index(config: &Config, formatter: &Formatter) -> Result<()> {
    execute_chunk(
        ChunkArgs {
            pages: None,
            out: None,
            max_chars: Some(250),
            overlap_chars: Some(0),
            min_chars: Some(10),
        },
        config,
        formatter,
    )?;
    execute_index(
        IndexArgs {
            chunks: None,
            index_dir: None,
            batch_size: 3,
        },
        config,
        formatter,
    )?;
    Ok(())
}

#[test]
fn chunk_then_index_writes_artifacts() -> Result<()> {
    let (_dir, config) = workspace()?;
    let formatter = Formatter::new(OutputFormat::Quiet, false);
    chunk_and_index(&config, &formatter)?;

    let chunks = read_chunks(&config.paths.chunks)?;
    assert_eq!(chunks.len(), TOPICS.len());
    assert!(config.paths.index_dir.join(VECTORS_FILE).exists());
    assert!(config.paths.index_dir.join(META_FILE).exists());
    Ok(())
}

#[test]
fn search_with_expansion_reads_the_page_file() -> Result<()> {
    let (_dir, config) = workspace()?;
    let formatter = Formatter::new(OutputFormat::Json, false);
    chunk_and_index(&config, &formatter)?;

    execute_search(
        SearchArgs {
            query: "cosine similarity".to_string(),
            index_dir: None,
            top_k: Some(2),
            expand_pages: Some(1),
            pages: None,
        },
        &config,
        &formatter,
    )?;
    Ok(())
}

#[test]
fn chunk_rejects_overlap_not_below_max() -> Result<()> {
    let (_dir, config) = workspace()?;
    let formatter = Formatter::new(OutputFormat::Quiet, false);

    let err = execute_chunk(
        ChunkArgs {
            pages: None,
            out: None,
            max_chars: Some(100),
            overlap_chars: Some(100),
            min_chars: None,
        },
        &config,
        &formatter,
    )
    .unwrap_err();
    assert!(matches!(err, CliError::InvalidInput(_)));
    assert!(!config.paths.chunks.exists());
    Ok(())
}

#[test]
fn ask_without_api_key_fails_before_retrieval() -> Result<()> {
    let (_dir, config) = workspace()?;
    let formatter = Formatter::new(OutputFormat::Quiet, false);

    let err = execute_ask(
        AskArgs {
            question: "What is cosine similarity?".to_string(),
            index_dir: None,
            top_k: None,
            model: None,
            temperature: None,
            max_tokens: 700,
            expand_pages: None,
            pages: None,
        },
        &config,
        &formatter,
    )
    .unwrap_err();
    assert!(matches!(err, CliError::Llm(LlmError::MissingCredential(_))));
    Ok(())
}

#[test]
fn retrieval_only_evaluation_writes_metrics() -> Result<()> {
    let (dir, config) = workspace()?;
    let formatter = Formatter::new(OutputFormat::Quiet, false);
    chunk_and_index(&config, &formatter)?;

    let questions_csv = dir.path().join("questions.csv");
    fs::write(
        &questions_csv,
        "question,gold_keyword,gold_answer\nHow does cosine similarity compare vectors?,cosine similarity,\n",
    )?;
    let out_dir = dir.path().join("run_001");

    execute_evaluate(
        EvaluateArgs {
            questions_csv,
            out_dir: out_dir.clone(),
            index_dir: None,
            top_k: Some(2),
            use_llm: false,
            model: None,
            temperature: None,
            max_tokens: 600,
        },
        &config,
        &formatter,
    )?;

    let metrics = fs::read_to_string(out_dir.join(folio_eval::METRICS_FILE))?;
    assert!(metrics.contains("n_questions: 1"));
    assert!(metrics.contains("recall@2: 1.0"));
    Ok(())
}
