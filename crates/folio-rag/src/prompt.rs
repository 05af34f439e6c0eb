//! Tutor prompt assembly

use folio_domain::{ChatMessage, ExpandedContext, RetrievalHit};
use serde::{Deserialize, Serialize};

/// Characters of each source excerpt shown to the model
pub const MAX_EXCERPT_CHARS: usize = 1600;

const TUTOR_INSTRUCTIONS: &str = "You are an NLP tutor.\n\
You must answer ONLY from the provided sources.\n\
STRICT rules:\n\
1) Never invent definitions, formulas or notations.\n\
2) If you give a formula (e.g. TF, IDF, TF-IDF), you MUST copy it verbatim from the sources.\n\
3) If the exact formula is not visible in the extracted sources, say: \
\"The exact formula does not appear in the provided excerpts\" and only explain the intuition.\n\
4) Cite your sources after each important part as (SOURCE k, pdf, pages).\n\
Mandatory structure: Definition / Intuition / Formula (if available) / Example / Key takeaways.\n\
Do not hallucinate.\n";

const TUTOR_INSTRUCTIONS_FR: &str = "Tu es un tuteur NLP.\n\
Tu dois répondre UNIQUEMENT à partir des sources fournies.\n\
Règles STRICTES:\n\
1) Interdiction d'inventer des définitions, formules ou notations.\n\
2) Si tu donnes une formule (ex: TF, IDF, TF-IDF), tu DOIS la recopier mot pour mot depuis les sources.\n\
3) Si la formule exacte n'est pas visible dans les sources extraites, dis: \
\"La formule exacte n'apparaît pas dans les extraits fournis\" et contente-toi d'expliquer l'intuition.\n\
4) Cite tes sources après chaque partie importante sous la forme (SOURCE k, pdf, pages).\n\
Structure obligatoire: Définition / Intuition / Formule (si disponible) / Exemple / À retenir.\n\
Ne pas halluciner.\n";

/// Language the tutor is instructed and asked in
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PromptLanguage {
    /// English instructions, closing with `Answer.`
    #[default]
    English,
    /// French instructions, closing with `Réponds.`
    French,
}

impl PromptLanguage {
    fn instructions(self) -> &'static str {
        match self {
            Self::English => TUTOR_INSTRUCTIONS,
            Self::French => TUTOR_INSTRUCTIONS_FR,
        }
    }

    fn closing(self) -> &'static str {
        match self {
            Self::English => "Answer.",
            Self::French => "Réponds.",
        }
    }
}

/// Anything that can be quoted as a numbered source
pub trait PromptSource {
    /// Source PDF file name
    fn pdf_name(&self) -> &str;
    /// First and last page
    fn pages(&self) -> (u32, u32);
    /// Retrieval score
    fn score(&self) -> f32;
    /// Text to excerpt
    fn text(&self) -> &str;
}

impl PromptSource for RetrievalHit {
    fn pdf_name(&self) -> &str {
        &self.chunk.pdf_name
    }

    fn pages(&self) -> (u32, u32) {
        (self.chunk.page_start, self.chunk.page_end)
    }

    fn score(&self) -> f32 {
        self.score
    }

    fn text(&self) -> &str {
        &self.chunk.text
    }
}

impl PromptSource for ExpandedContext {
    fn pdf_name(&self) -> &str {
        &self.pdf_name
    }

    fn pages(&self) -> (u32, u32) {
        (self.page_start, self.page_end)
    }

    fn score(&self) -> f32 {
        self.score
    }

    fn text(&self) -> &str {
        &self.text
    }
}

/// Render sources as numbered `[SOURCE i]` blocks
pub fn format_sources<S: PromptSource>(sources: &[S]) -> String {
    sources
        .iter()
        .enumerate()
        .map(|(i, source)| {
            let (start, end) = source.pages();
            let excerpt: String = source.text().chars().take(MAX_EXCERPT_CHARS).collect();
            format!(
                "[SOURCE {}] pdf={} pages={}-{} score={:.4}\n{}\n",
                i + 1,
                source.pdf_name(),
                start,
                end,
                source.score(),
                excerpt
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
        .trim()
        .to_string()
}

/// System and user messages for one tutoring question, in English
pub fn tutor_messages<S: PromptSource>(question: &str, sources: &[S]) -> Vec<ChatMessage> {
    tutor_messages_in(PromptLanguage::English, question, sources)
}

/// System and user messages for one tutoring question in `language`
pub fn tutor_messages_in<S: PromptSource>(
    language: PromptLanguage,
    question: &str,
    sources: &[S],
) -> Vec<ChatMessage> {
    let user = format!(
        "Question:\n{}\n\nSOURCES:\n{}\n\n{}",
        question,
        format_sources(sources),
        language.closing()
    );
    vec![ChatMessage::system(language.instructions()), ChatMessage::user(user)]
}

#[cfg(test)]
mod tests {
    use super::*;
    use folio_domain::{ChunkRecord, Role};

    fn hit(ps: u32, pe: u32, score: f32, text: &str) -> RetrievalHit {
        RetrievalHit::new(ChunkRecord::new("c", "d", "notes.pdf", ps, pe, text).unwrap(), score)
    }

    #[test]
    fn test_source_blocks() {
        let text = format_sources(&[hit(1, 2, 0.5, "first"), hit(3, 3, 0.123456, "second")]);
        assert_eq!(
            text,
            "[SOURCE 1] pdf=notes.pdf pages=1-2 score=0.5000\nfirst\n\n\
             [SOURCE 2] pdf=notes.pdf pages=3-3 score=0.1235\nsecond"
        );
    }

    #[test]
    fn test_excerpt_cut_on_characters() {
        let long = "é".repeat(MAX_EXCERPT_CHARS + 50);
        let text = format_sources(&[hit(1, 1, 1.0, &long)]);
        let body = text.lines().nth(1).unwrap();
        assert_eq!(body.chars().count(), MAX_EXCERPT_CHARS);
    }

    #[test]
    fn test_expanded_contexts_use_window_pages() {
        let ctx = ExpandedContext {
            pdf_name: "notes.pdf".to_string(),
            page_start: 4,
            page_end: 6,
            score: 0.9,
            text: "window".to_string(),
            seed_chunk_pages: (5, 5),
        };
        assert!(format_sources(&[ctx]).starts_with("[SOURCE 1] pdf=notes.pdf pages=4-6 score=0.9000"));
    }

    #[test]
    fn test_tutor_messages() {
        let messages = tutor_messages("What is IDF?", &[hit(2, 2, 0.8, "idf = log N/df")]);
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].role, Role::System);
        assert!(messages[0].content.contains("(SOURCE k, pdf, pages)"));
        assert!(messages[0].content.contains("Definition / Intuition / Formula"));
        assert_eq!(messages[1].role, Role::User);
        assert!(messages[1].content.starts_with("Question:\nWhat is IDF?\n\nSOURCES:\n[SOURCE 1]"));
        assert!(messages[1].content.ends_with("idf = log N/df\n\nAnswer."));
    }

    #[test]
    fn test_french_messages_keep_fallback_sentence() {
        let messages = tutor_messages_in(PromptLanguage::French, "Qu'est-ce que l'IDF ?", &[hit(2, 2, 0.8, "idf")]);
        assert!(messages[0].content.starts_with("Tu es un tuteur NLP.\n"));
        assert!(messages[0]
            .content
            .contains("\"La formule exacte n'apparaît pas dans les extraits fournis\""));
        assert!(messages[0].content.contains("Définition / Intuition / Formule (si disponible) / Exemple / À retenir."));
        assert!(messages[1].content.starts_with("Question:\nQu'est-ce que l'IDF ?\n\nSOURCES:\n[SOURCE 1]"));
        assert!(messages[1].content.ends_with("idf\n\nRéponds."));
    }

    #[test]
    fn test_no_sources() {
        let messages = tutor_messages::<RetrievalHit>("q", &[]);
        assert_eq!(messages[1].content, "Question:\nq\n\nSOURCES:\n\n\nAnswer.");
    }
}
