//! Retrieval-augmented answering with source citations

use crate::error::RagError;
use crate::expansion::expand_hits;
use crate::prompt::{tutor_messages_in, PromptLanguage};
use crate::retriever::Retriever;
use folio_domain::traits::LlmProvider;
use folio_domain::{ExpandedContext, RetrievalHit, TokenUsage};
use folio_store::PageStore;
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use tracing::{debug, info};

/// Answering settings
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RagConfig {
    /// When set, the prompt quotes page windows widened by this many pages
    /// instead of the retrieved chunks
    pub expand_pages: Option<u32>,
    /// Language of the tutor prompt
    pub language: PromptLanguage,
}

/// One source quoted in the prompt
///
/// Citations are numbered like the prompt's `[SOURCE k]` blocks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceCitation {
    /// Source PDF file name
    pub pdf_name: String,
    /// First page
    pub page_start: u32,
    /// Last page
    pub page_end: u32,
    /// Retrieval score
    pub score: f32,
    /// Chunk id; absent for expanded page windows
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chunk_id: Option<String>,
}

impl From<&RetrievalHit> for SourceCitation {
    fn from(hit: &RetrievalHit) -> Self {
        Self {
            pdf_name: hit.chunk.pdf_name.clone(),
            page_start: hit.chunk.page_start,
            page_end: hit.chunk.page_end,
            score: hit.score,
            chunk_id: Some(hit.chunk.chunk_id.clone()),
        }
    }
}

impl From<&ExpandedContext> for SourceCitation {
    fn from(ctx: &ExpandedContext) -> Self {
        Self {
            pdf_name: ctx.pdf_name.clone(),
            page_start: ctx.page_start,
            page_end: ctx.page_end,
            score: ctx.score,
            chunk_id: None,
        }
    }
}

/// A generated answer and what it was grounded on
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Answer {
    /// The question asked
    pub question: String,
    /// Generated reply
    pub answer: String,
    /// Quoted sources, in prompt order
    pub sources: Vec<SourceCitation>,
    /// Token usage, when the backend reports it
    pub usage: Option<TokenUsage>,
}

/// Answers questions from the indexed document
///
/// # Examples
///
/// ```no_run
/// use folio_llm::MockProvider;
/// use folio_rag::{RagConfig, RagTutor, Retriever, RetrieverConfig};
/// use folio_store::HashingEmbedder;
/// use std::path::Path;
///
/// # fn main() -> Result<(), folio_rag::RagError> {
/// let retriever = Retriever::open(Path::new("data/index/hnsw"), HashingEmbedder::new(384), RetrieverConfig::default())?;
/// let tutor = RagTutor::new(retriever, MockProvider::new("IDF is ..."), RagConfig::default());
///
/// let answer = tutor.answer("What is IDF?")?;
/// println!("{}", answer.answer);
/// # Ok(())
/// # }
/// ```
pub struct RagTutor<L> {
    retriever: Retriever,
    llm: L,
    pages: Option<PageStore>,
    config: RagConfig,
}

impl<L> RagTutor<L>
where
    L: LlmProvider,
    L::Error: Display,
{
    /// Create a tutor
    pub fn new(retriever: Retriever, llm: L, config: RagConfig) -> Self {
        Self {
            retriever,
            llm,
            pages: None,
            config,
        }
    }

    /// Page lookup used when [`RagConfig::expand_pages`] is set
    pub fn with_pages(mut self, pages: PageStore) -> Self {
        self.pages = Some(pages);
        self
    }

    /// The retriever answers are grounded on
    pub fn retriever(&self) -> &Retriever {
        &self.retriever
    }

    /// Retrieve for `question` and answer from the hits
    pub fn answer(&self, question: &str) -> Result<Answer, RagError> {
        let hits = self.retriever.retrieve(question)?;
        self.answer_with_hits(question, &hits)
    }

    /// Answer from hits already retrieved for `question`
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - Expansion is configured without a page lookup
    /// - The provider call fails ([`RagError::Generation`])
    pub fn answer_with_hits(&self, question: &str, hits: &[RetrievalHit]) -> Result<Answer, RagError> {
        let (messages, sources) = match self.config.expand_pages {
            Some(expand_pages) => {
                let pages = self.pages.as_ref().ok_or_else(|| {
                    RagError::Config("page expansion requested without a page store".to_string())
                })?;
                let contexts = expand_hits(hits, expand_pages, pages);
                debug!("Prompting with {} expanded windows", contexts.len());
                (
                    tutor_messages_in(self.config.language, question, &contexts),
                    contexts.iter().map(SourceCitation::from).collect(),
                )
            }
            None => (
                tutor_messages_in(self.config.language, question, hits),
                hits.iter().map(SourceCitation::from).collect::<Vec<_>>(),
            ),
        };

        let completion = self
            .llm
            .chat(&messages)
            .map_err(|e| RagError::Generation(e.to_string()))?;
        info!("Answered with {} sources", sources.len());

        Ok(Answer {
            question: question.to_string(),
            answer: completion.text,
            sources,
            usage: completion.usage,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::retriever::RetrieverConfig;
    use folio_domain::traits::EmbeddingModel;
    use folio_domain::{chunk_id, ChunkRecord, PageRecord};
    use folio_llm::MockProvider;
    use folio_store::{HashingEmbedder, PageText, VectorStore};

    fn retriever() -> Retriever {
        let embedder = HashingEmbedder::new(64);
        let mut store = VectorStore::new(64, 2);
        for (i, text) in ["term frequency counts words", "inverse document frequency"].iter().enumerate() {
            let page = i as u32 + 3;
            let chunk = ChunkRecord::new(chunk_id("n", page, page, i), "n", "n.pdf", page, page, *text).unwrap();
            store.add(embedder.embed(text).unwrap(), chunk).unwrap();
        }
        Retriever::new(store, embedder, RetrieverConfig { top_k: 1 }).unwrap()
    }

    #[test]
    fn test_answer_cites_hits() {
        let llm = MockProvider::new("IDF down-weights common terms").with_usage(TokenUsage {
            prompt_tokens: Some(10),
            completion_tokens: Some(5),
            total_tokens: Some(15),
        });
        let tutor = RagTutor::new(retriever(), llm, RagConfig::default());

        let answer = tutor.answer("inverse document frequency").unwrap();
        assert_eq!(answer.answer, "IDF down-weights common terms");
        assert_eq!(answer.sources.len(), 1);
        assert_eq!(answer.sources[0].page_start, 4);
        assert_eq!(answer.sources[0].chunk_id.as_deref(), Some("n::p0004-p0004::c0001"));
        assert_eq!(answer.usage.and_then(|u| u.total_tokens), Some(15));
    }

    #[test]
    fn test_expansion_switches_prompt_to_windows() {
        let pages = PageStore::from_pages(
            (3..=5).map(|n| PageRecord::new("n", "n.pdf", n, format!("full page {n}"), "").unwrap()),
            PageText::Raw,
        );
        let llm = MockProvider::new("ok");
        let tutor = RagTutor::new(retriever(), llm.clone(), RagConfig { expand_pages: Some(1), ..Default::default() }).with_pages(pages);

        let answer = tutor.answer("inverse document frequency").unwrap();
        assert_eq!(answer.sources.len(), 1);
        assert_eq!((answer.sources[0].page_start, answer.sources[0].page_end), (3, 5));
        assert!(answer.sources[0].chunk_id.is_none());

        let prompt = llm.last_request().unwrap();
        assert!(prompt[1].content.contains("pages=3-5"));
        assert!(prompt[1].content.contains("full page 3\n\nfull page 4\n\nfull page 5"));
    }

    #[test]
    fn test_french_prompt_when_configured() {
        let llm = MockProvider::new("ok");
        let config = RagConfig {
            language: PromptLanguage::French,
            ..Default::default()
        };
        RagTutor::new(retriever(), llm.clone(), config)
            .answer("inverse document frequency")
            .unwrap();

        let prompt = llm.last_request().unwrap();
        assert!(prompt[0].content.starts_with("Tu es un tuteur NLP."));
        assert!(prompt[1].content.ends_with("Réponds."));
    }

    #[test]
    fn test_expansion_without_pages_is_rejected() {
        let tutor = RagTutor::new(retriever(), MockProvider::new("ok"), RagConfig { expand_pages: Some(1), ..Default::default() });
        assert!(matches!(tutor.answer("frequency"), Err(RagError::Config(_))));
    }

    #[test]
    fn test_provider_failure_propagates() {
        let mut llm = MockProvider::new("unused");
        llm.add_error("inverse document frequency");
        let tutor = RagTutor::new(retriever(), llm.clone(), RagConfig::default());

        assert!(matches!(tutor.answer("inverse document frequency"), Err(RagError::Generation(_))));
        assert_eq!(llm.call_count(), 1);
    }
}
