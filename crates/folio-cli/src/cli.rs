//! CLI command definitions and argument parsing.
//!
//! Path and model flags left unset fall back to the configuration file.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Folio - Ask questions about one PDF, with page citations.
#[derive(Debug, Parser)]
#[command(name = "folio")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Output format
    #[arg(short, long, value_enum, global = true)]
    pub format: Option<CliFormat>,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Configuration file path
    #[arg(short, long, global = true, env = "FOLIO_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

/// Output format options.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum CliFormat {
    /// Table format (default)
    Table,
    /// JSON format
    Json,
    /// Quiet format (IDs only)
    Quiet,
}

/// CLI commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Extract and clean the pages of the single PDF in a directory
    Ingest(IngestArgs),

    /// Split a page file into overlapping chunks
    Chunk(ChunkArgs),

    /// Embed a chunk file into a vector index
    Index(IndexArgs),

    /// Show the chunks closest to a query
    Search(SearchArgs),

    /// Answer a question from the document
    Ask(AskArgs),

    /// Score retrieval (recall@k, MRR) and optionally answers
    Evaluate(EvaluateArgs),
}

/// Arguments for the ingest command.
#[derive(Debug, Parser)]
pub struct IngestArgs {
    /// Directory containing exactly one PDF
    #[arg(long, alias = "pdf_dir")]
    pub pdf_dir: Option<PathBuf>,

    /// Page record file to write
    #[arg(short, long)]
    pub out: Option<PathBuf>,
}

/// Arguments for the chunk command.
#[derive(Debug, Parser)]
pub struct ChunkArgs {
    /// Page record file to read
    #[arg(long)]
    pub pages: Option<PathBuf>,

    /// Chunk record file to write
    #[arg(short, long)]
    pub out: Option<PathBuf>,

    /// Flush once a chunk reaches this many characters
    #[arg(long, alias = "max_chars")]
    pub max_chars: Option<usize>,

    /// Characters carried over between consecutive chunks
    #[arg(long, alias = "overlap_chars")]
    pub overlap_chars: Option<usize>,

    /// Shortest chunk an unforced flush may emit
    #[arg(long, alias = "min_chars")]
    pub min_chars: Option<usize>,
}

/// Arguments for the index command.
#[derive(Debug, Parser)]
pub struct IndexArgs {
    /// Chunk record file to read
    #[arg(long)]
    pub chunks: Option<PathBuf>,

    /// Index directory to write
    #[arg(long, alias = "index_dir")]
    pub index_dir: Option<PathBuf>,

    /// Chunks embedded per backend call
    #[arg(long, default_value_t = folio_rag::DEFAULT_BATCH_SIZE)]
    pub batch_size: usize,
}

/// Arguments for the search command.
#[derive(Debug, Parser)]
pub struct SearchArgs {
    /// Search query text
    pub query: String,

    /// Index directory
    #[arg(long, alias = "index_dir")]
    pub index_dir: Option<PathBuf>,

    /// Maximum number of results
    #[arg(short = 'k', long, alias = "top_k")]
    pub top_k: Option<usize>,

    /// Also show hits widened by this many pages
    #[arg(long)]
    pub expand_pages: Option<u32>,

    /// Page record file used for expansion
    #[arg(long)]
    pub pages: Option<PathBuf>,
}

/// Arguments for the ask command.
#[derive(Debug, Parser)]
pub struct AskArgs {
    /// Question to answer
    pub question: String,

    /// Index directory
    #[arg(long, alias = "index_dir")]
    pub index_dir: Option<PathBuf>,

    /// Chunks retrieved as sources
    #[arg(short = 'k', long, alias = "top_k")]
    pub top_k: Option<usize>,

    /// Generation model
    #[arg(long, alias = "llm_model")]
    pub model: Option<String>,

    /// Sampling temperature
    #[arg(long)]
    pub temperature: Option<f32>,

    /// Upper bound on generated tokens
    #[arg(long, alias = "max_tokens", default_value_t = 700)]
    pub max_tokens: u32,

    /// Quote page windows widened by this many pages instead of chunks
    #[arg(long)]
    pub expand_pages: Option<u32>,

    /// Page record file used for expansion
    #[arg(long)]
    pub pages: Option<PathBuf>,
}

/// Arguments for the evaluate command.
#[derive(Debug, Parser)]
pub struct EvaluateArgs {
    /// Labelled question file
    #[arg(long, alias = "questions_csv", default_value = "data/eval/questions.csv")]
    pub questions_csv: PathBuf,

    /// Directory receiving the reports
    #[arg(long, alias = "out_dir", default_value = "data/eval/run_001")]
    pub out_dir: PathBuf,

    /// Index directory
    #[arg(long, alias = "index_dir")]
    pub index_dir: Option<PathBuf>,

    /// Hits scored per question
    #[arg(short = 'k', long, alias = "top_k")]
    pub top_k: Option<usize>,

    /// Also generate and score answers
    #[arg(long, alias = "use_llm")]
    pub use_llm: bool,

    /// Generation model
    #[arg(long, alias = "llm_model")]
    pub model: Option<String>,

    /// Sampling temperature
    #[arg(long)]
    pub temperature: Option<f32>,

    /// Upper bound on generated tokens
    #[arg(long, alias = "max_tokens", default_value_t = 600)]
    pub max_tokens: u32,
}

impl From<CliFormat> for crate::config::OutputFormat {
    fn from(format: CliFormat) -> Self {
        match format {
            CliFormat::Table => crate::config::OutputFormat::Table,
            CliFormat::Json => crate::config::OutputFormat::Json,
            CliFormat::Quiet => crate::config::OutputFormat::Quiet,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ingest_defaults() {
        let cli = Cli::parse_from(["folio", "ingest"]);
        match cli.command {
            Command::Ingest(args) => {
                assert!(args.pdf_dir.is_none());
                assert!(args.out.is_none());
            }
            _ => panic!("Expected Ingest command"),
        }
    }

    #[test]
    fn test_chunk_accepts_underscore_flags() {
        let cli = Cli::parse_from(["folio", "chunk", "--max_chars", "1200", "--overlap-chars", "100"]);
        match cli.command {
            Command::Chunk(args) => {
                assert_eq!(args.max_chars, Some(1200));
                assert_eq!(args.overlap_chars, Some(100));
                assert!(args.min_chars.is_none());
            }
            _ => panic!("Expected Chunk command"),
        }
    }

    #[test]
    fn test_ask_defaults() {
        let cli = Cli::parse_from(["folio", "ask", "What is TF-IDF?"]);
        match cli.command {
            Command::Ask(args) => {
                assert_eq!(args.question, "What is TF-IDF?");
                assert_eq!(args.max_tokens, 700);
                assert!(args.expand_pages.is_none());
            }
            _ => panic!("Expected Ask command"),
        }
    }

    #[test]
    fn test_evaluate_defaults() {
        let cli = Cli::parse_from(["folio", "evaluate", "--use-llm"]);
        match cli.command {
            Command::Evaluate(args) => {
                assert!(args.use_llm);
                assert_eq!(args.max_tokens, 600);
                assert_eq!(args.questions_csv, PathBuf::from("data/eval/questions.csv"));
                assert_eq!(args.out_dir, PathBuf::from("data/eval/run_001"));
            }
            _ => panic!("Expected Evaluate command"),
        }
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::parse_from(["folio", "search", "bm25", "-k", "3", "--format", "json", "--no-color"]);
        assert!(matches!(cli.format, Some(CliFormat::Json)));
        assert!(cli.no_color);
        match cli.command {
            Command::Search(args) => assert_eq!(args.top_k, Some(3)),
            _ => panic!("Expected Search command"),
        }
    }

    #[test]
    fn test_missing_subcommand_is_an_error() {
        assert!(Cli::try_parse_from(["folio"]).is_err());
    }
}
