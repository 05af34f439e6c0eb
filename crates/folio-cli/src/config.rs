//! Configuration management for the CLI.
//!
//! Settings come from a TOML file whose sections all default, so an empty
//! or partial file is valid:
//!
//! ```toml
//! [paths]
//! index_dir = "data/index/hnsw"
//!
//! [chunking]
//! max_chars = 2000
//!
//! [embedding]
//! provider = "ollama"
//! model = "nomic-embed-text"
//! dimension = 768
//!
//! [llm]
//! provider = "groq"
//! api_key_env = "GROQ_API_KEY"
//! prompt_language = "french"
//!
//! [retrieval]
//! top_k = 5
//! expand_pages = 1
//! ```

use crate::error::{CliError, Result};
use folio_ingest::ChunkConfig;
use folio_rag::PromptLanguage;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Config file looked up in the working directory.
pub const LOCAL_CONFIG_FILE: &str = "folio.toml";

/// Environment file looked up in the working directory.
pub const ENV_FILE: &str = ".env";

/// Load `dir/.env` into the process environment if it exists.
///
/// Variables already set in the environment keep their values, so an
/// exported `GROQ_API_KEY` wins over the file. Returns whether a file was
/// loaded.
pub fn load_env_file(dir: &Path) -> Result<bool> {
    let path = dir.join(ENV_FILE);
    if !path.is_file() {
        return Ok(false);
    }
    dotenvy::from_path(&path)
        .map_err(|e| CliError::Config(format!("Invalid {}: {}", path.display(), e)))?;
    debug!("Loaded environment from {}", path.display());
    Ok(true)
}

/// CLI configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Data file locations
    #[serde(default)]
    pub paths: PathsConfig,

    /// Chunk size limits
    #[serde(default)]
    pub chunking: ChunkConfig,

    /// Embedding backend
    #[serde(default)]
    pub embedding: EmbeddingConfig,

    /// Text-generation backend
    #[serde(default)]
    pub llm: LlmConfig,

    /// Retrieval settings
    #[serde(default)]
    pub retrieval: RetrievalConfig,

    /// Output settings
    #[serde(default)]
    pub settings: Settings,
}

/// Default locations of the pipeline's files.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathsConfig {
    /// Directory holding the single input PDF
    #[serde(default = "default_pdf_dir")]
    pub pdf_dir: PathBuf,

    /// Page record file
    #[serde(default = "default_pages")]
    pub pages: PathBuf,

    /// Chunk record file
    #[serde(default = "default_chunks")]
    pub chunks: PathBuf,

    /// Vector index directory
    #[serde(default = "default_index_dir")]
    pub index_dir: PathBuf,
}

/// Embedding backends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmbeddingBackend {
    /// Offline feature hashing
    Hashing,
    /// Local Ollama embeddings API
    Ollama,
}

/// Embedding settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmbeddingConfig {
    /// Backend
    #[serde(default = "default_embedding_backend")]
    pub provider: EmbeddingBackend,

    /// Model name (Ollama only)
    #[serde(default = "default_embedding_model")]
    pub model: String,

    /// Vector dimension
    #[serde(default = "default_dimension")]
    pub dimension: usize,

    /// API endpoint (Ollama only)
    #[serde(default = "default_ollama_endpoint")]
    pub endpoint: String,
}

/// Text-generation backends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LlmBackend {
    /// Hosted OpenAI-compatible API
    Groq,
    /// Local Ollama chat API
    Ollama,
}

/// Text-generation settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LlmConfig {
    /// Backend
    #[serde(default = "default_llm_backend")]
    pub provider: LlmBackend,

    /// Model name
    #[serde(default = "default_llm_model")]
    pub model: String,

    /// API endpoint; the backend's default when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,

    /// Environment variable holding the API key (Groq only)
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Sampling temperature
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Language of the tutor prompt
    #[serde(default)]
    pub prompt_language: PromptLanguage,
}

/// Retrieval settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetrievalConfig {
    /// Hits per query
    #[serde(default = "default_top_k")]
    pub top_k: usize,

    /// Small-to-big expansion radius for `ask`; off when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expand_pages: Option<u32>,
}

/// Global CLI settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Enable colored output
    #[serde(default = "default_true")]
    pub color: bool,

    /// Default output format
    #[serde(default = "default_format")]
    pub format: OutputFormat,
}

/// Output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Table format
    Table,
    /// JSON format
    Json,
    /// Quiet (minimal) format
    Quiet,
}

impl Config {
    /// User-level configuration file path.
    pub fn user_path() -> Option<PathBuf> {
        dirs::home_dir().map(|home| home.join(".folio").join("config.toml"))
    }

    /// Load configuration.
    ///
    /// An explicit path must exist. Otherwise `./folio.toml`, then
    /// `~/.folio/config.toml` are tried, falling back to defaults.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            if !path.exists() {
                return Err(CliError::Config(format!(
                    "Config file not found: {}",
                    path.display()
                )));
            }
            return Self::from_file(path);
        }

        let candidates = [Some(PathBuf::from(LOCAL_CONFIG_FILE)), Self::user_path()];
        for path in candidates.into_iter().flatten() {
            if path.exists() {
                return Self::from_file(&path);
            }
        }
        debug!("No config file found, using defaults");
        Ok(Self::default())
    }

    /// Read and validate one configuration file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        let config = Self::from_toml(&contents)?;
        debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Parse and validate configuration text.
    pub fn from_toml(contents: &str) -> Result<Self> {
        let config: Config = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Check value ranges.
    pub fn validate(&self) -> Result<()> {
        self.chunking
            .validate()
            .map_err(|e| CliError::Config(format!("[chunking] {}", e)))?;
        if self.embedding.dimension == 0 {
            return Err(CliError::Config(
                "[embedding] dimension must be greater than 0".into(),
            ));
        }
        if self.retrieval.top_k == 0 {
            return Err(CliError::Config(
                "[retrieval] top_k must be greater than 0".into(),
            ));
        }
        if self.llm.timeout_secs == 0 {
            return Err(CliError::Config(
                "[llm] timeout_secs must be greater than 0".into(),
            ));
        }
        Ok(())
    }
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            pdf_dir: default_pdf_dir(),
            pages: default_pages(),
            chunks: default_chunks(),
            index_dir: default_index_dir(),
        }
    }
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            provider: default_embedding_backend(),
            model: default_embedding_model(),
            dimension: default_dimension(),
            endpoint: default_ollama_endpoint(),
        }
    }
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: default_llm_backend(),
            model: default_llm_model(),
            endpoint: None,
            api_key_env: default_api_key_env(),
            timeout_secs: default_timeout_secs(),
            temperature: default_temperature(),
            prompt_language: PromptLanguage::default(),
        }
    }
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            top_k: default_top_k(),
            expand_pages: None,
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            color: true,
            format: OutputFormat::Table,
        }
    }
}

fn default_pdf_dir() -> PathBuf {
    PathBuf::from("data/raw/pdfs")
}

fn default_pages() -> PathBuf {
    PathBuf::from("data/interim/pages.jsonl")
}

fn default_chunks() -> PathBuf {
    PathBuf::from("data/interim/chunks.jsonl")
}

fn default_index_dir() -> PathBuf {
    PathBuf::from("data/index/hnsw")
}

fn default_embedding_backend() -> EmbeddingBackend {
    EmbeddingBackend::Hashing
}

fn default_embedding_model() -> String {
    "nomic-embed-text".to_string()
}

fn default_dimension() -> usize {
    384
}

fn default_ollama_endpoint() -> String {
    folio_llm::ollama::DEFAULT_ENDPOINT.to_string()
}

fn default_llm_backend() -> LlmBackend {
    LlmBackend::Groq
}

fn default_llm_model() -> String {
    folio_llm::groq::DEFAULT_MODEL.to_string()
}

fn default_api_key_env() -> String {
    folio_llm::groq::DEFAULT_API_KEY_ENV.to_string()
}

fn default_timeout_secs() -> u64 {
    folio_llm::groq::DEFAULT_TIMEOUT_SECS
}

fn default_temperature() -> f32 {
    0.2
}

fn default_top_k() -> usize {
    8
}

fn default_true() -> bool {
    true
}

fn default_format() -> OutputFormat {
    OutputFormat::Table
}
