//! Output formatting for the CLI.

use crate::config::OutputFormat;
use crate::error::Result;
use colored::*;
use folio_domain::{ExpandedContext, RetrievalHit};
use folio_eval::EvalMetrics;
use folio_rag::Answer;
use serde::Serialize;
use tabled::{
    builder::Builder,
    settings::{object::Columns, object::Rows, Alignment, Modify, Style, Width},
};

/// Characters of chunk text shown per search hit.
pub const EXCERPT_CHARS: usize = 450;

/// Column width of wrapped text in tables.
const TEXT_WIDTH: usize = 80;

/// Output formatter.
pub struct Formatter {
    format: OutputFormat,
    color_enabled: bool,
}

impl Formatter {
    /// Create a new formatter.
    pub fn new(format: OutputFormat, color_enabled: bool) -> Self {
        Self {
            format,
            color_enabled,
        }
    }

    /// Selected output format.
    pub fn format(&self) -> OutputFormat {
        self.format
    }

    /// Pretty JSON for any serializable value.
    pub fn json<T: Serialize + ?Sized>(&self, value: &T) -> Result<String> {
        Ok(serde_json::to_string_pretty(value)?)
    }

    /// Format search hits.
    pub fn format_hits(&self, hits: &[RetrievalHit]) -> Result<String> {
        match self.format {
            OutputFormat::Json => self.json(hits),
            OutputFormat::Table => Ok(self.format_hits_table(hits)),
            OutputFormat::Quiet => Ok(hits
                .iter()
                .map(|h| h.chunk.chunk_id.as_str())
                .collect::<Vec<_>>()
                .join("\n")),
        }
    }

    /// Format hits as a table.
    fn format_hits_table(&self, hits: &[RetrievalHit]) -> String {
        if hits.is_empty() {
            return self.colorize("No hits found.", "yellow");
        }

        let mut builder = Builder::default();
        builder.push_record(["#", "Score", "Pages", "Chunk", "Text"]);
        for (i, hit) in hits.iter().enumerate() {
            builder.push_record([
                (i + 1).to_string(),
                format!("{:.4}", hit.score),
                format!("{}-{}", hit.chunk.page_start, hit.chunk.page_end),
                hit.chunk.chunk_id.clone(),
                excerpt(&hit.chunk.text, EXCERPT_CHARS),
            ]);
        }
        render(builder, 4)
    }

    /// Format small-to-big page windows.
    pub fn format_expanded(&self, contexts: &[ExpandedContext]) -> Result<String> {
        match self.format {
            OutputFormat::Json => self.json(contexts),
            OutputFormat::Quiet => Ok(contexts
                .iter()
                .map(|c| format!("{}:{}-{}", c.pdf_name, c.page_start, c.page_end))
                .collect::<Vec<_>>()
                .join("\n")),
            OutputFormat::Table => {
                if contexts.is_empty() {
                    return Ok(self.colorize("No page windows found.", "yellow"));
                }
                let mut builder = Builder::default();
                builder.push_record(["Score", "Window", "Seed", "Text"]);
                for ctx in contexts {
                    builder.push_record([
                        format!("{:.4}", ctx.score),
                        format!("{}-{}", ctx.page_start, ctx.page_end),
                        format!("{}-{}", ctx.seed_chunk_pages.0, ctx.seed_chunk_pages.1),
                        excerpt(&ctx.text, EXCERPT_CHARS),
                    ]);
                }
                Ok(render(builder, 3))
            }
        }
    }

    /// Format a generated answer with its sources.
    pub fn format_answer(&self, answer: &Answer) -> Result<String> {
        match self.format {
            OutputFormat::Json => self.json(answer),
            OutputFormat::Quiet => Ok(answer.answer.clone()),
            OutputFormat::Table => {
                let mut out = format!(
                    "\n{}\n\n{}\n\n{}\n",
                    self.colorize("=== ANSWER ===", "cyan"),
                    answer.answer,
                    self.colorize("=== SOURCES ===", "cyan")
                );
                for (i, source) in answer.sources.iter().enumerate() {
                    out.push_str(&format!(
                        "{}. {} pages {}-{} score={:.4}\n",
                        i + 1,
                        source.pdf_name,
                        source.page_start,
                        source.page_end,
                        source.score
                    ));
                }
                if let Some(usage) = &answer.usage {
                    out.push_str(&format!(
                        "\n{}\n{}\n",
                        self.colorize("=== USAGE ===", "cyan"),
                        serde_json::to_string(usage)?
                    ));
                }
                Ok(out)
            }
        }
    }

    /// Format evaluation metrics.
    pub fn format_metrics(&self, metrics: &EvalMetrics) -> Result<String> {
        match self.format {
            OutputFormat::Json => self.json(metrics),
            OutputFormat::Table | OutputFormat::Quiet => Ok(metrics.lines().join("\n")),
        }
    }

    /// Format a success message.
    pub fn success(&self, message: &str) -> String {
        self.colorize(&format!("✓ {}", message), "green")
    }

    /// Format an error message.
    pub fn error(&self, message: &str) -> String {
        self.colorize(&format!("✗ {}", message), "red")
    }

    /// Format an info message.
    pub fn info(&self, message: &str) -> String {
        self.colorize(&format!("ℹ {}", message), "blue")
    }

    /// Format a warning message.
    pub fn warning(&self, message: &str) -> String {
        self.colorize(&format!("⚠ {}", message), "yellow")
    }

    /// Colorize text if color is enabled.
    fn colorize(&self, text: &str, color: &str) -> String {
        if !self.color_enabled {
            return text.to_string();
        }

        match color {
            "red" => text.red().to_string(),
            "green" => text.green().to_string(),
            "blue" => text.blue().to_string(),
            "yellow" => text.yellow().to_string(),
            "cyan" => text.cyan().to_string(),
            _ => text.to_string(),
        }
    }
}

/// Rounded table with a centered header and a wrapped text column.
fn render(builder: Builder, text_column: usize) -> String {
    let mut table = builder.build();
    table
        .with(Style::rounded())
        .with(Modify::new(Rows::first()).with(Alignment::center()))
        .with(Modify::new(Columns::single(text_column)).with(Width::wrap(TEXT_WIDTH)));
    table.to_string()
}

/// Single-line excerpt: newlines become spaces, cut to `max` characters
/// with a trailing `...` when longer.
pub fn excerpt(text: &str, max: usize) -> String {
    let flat = text.replace('\n', " ");
    if flat.chars().count() > max {
        let mut cut: String = flat.chars().take(max).collect();
        cut.push_str("...");
        cut
    } else {
        flat
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use folio_domain::{ChunkRecord, TokenUsage};
    use folio_rag::SourceCitation;

    fn hit() -> RetrievalHit {
        let chunk = ChunkRecord::new("nlp::p0003-p0004::c0002", "nlp", "nlp.pdf", 3, 4, "line one\nline two").unwrap();
        RetrievalHit::new(chunk, 0.8123)
    }

    fn answer(usage: Option<TokenUsage>) -> Answer {
        Answer {
            question: "q".to_string(),
            answer: "IDF is log N/df (SOURCE 1, nlp.pdf, 3-4)".to_string(),
            sources: vec![SourceCitation::from(&hit())],
            usage,
        }
    }

    #[test]
    fn test_excerpt() {
        assert_eq!(excerpt("a\nb", 10), "a b");
        assert_eq!(excerpt("abcdef", 3), "abc...");
        assert_eq!(excerpt("abc", 3), "abc");
    }

    #[test]
    fn test_table_format() {
        let formatter = Formatter::new(OutputFormat::Table, false);
        let output = formatter.format_hits(&[hit()]).unwrap();
        assert!(output.contains("Score"));
        assert!(output.contains("0.8123"));
        assert!(output.contains("3-4"));
        assert!(output.contains("line one line two"));
    }

    #[test]
    fn test_quiet_format() {
        let formatter = Formatter::new(OutputFormat::Quiet, false);
        assert_eq!(formatter.format_hits(&[hit()]).unwrap(), "nlp::p0003-p0004::c0002");
    }

    #[test]
    fn test_json_format() {
        let formatter = Formatter::new(OutputFormat::Json, false);
        let output = formatter.format_hits(&[hit()]).unwrap();
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(value[0]["page_start"], 3);
        assert_eq!(value[0]["chunk_id"], "nlp::p0003-p0004::c0002");
    }

    #[test]
    fn test_empty_hits() {
        let formatter = Formatter::new(OutputFormat::Table, false);
        assert!(formatter.format_hits(&[]).unwrap().contains("No hits found"));
    }

    #[test]
    fn test_answer_sections() {
        let formatter = Formatter::new(OutputFormat::Table, false);
        let usage = TokenUsage {
            prompt_tokens: Some(100),
            completion_tokens: Some(20),
            total_tokens: Some(120),
        };
        let output = formatter.format_answer(&answer(Some(usage))).unwrap();
        assert!(output.contains("=== ANSWER ===\n\nIDF is log N/df"));
        assert!(output.contains("1. nlp.pdf pages 3-4 score=0.8123"));
        assert!(output.contains("=== USAGE ===\n{\"prompt_tokens\":100"));

        let without_usage = formatter.format_answer(&answer(None)).unwrap();
        assert!(!without_usage.contains("USAGE"));
    }

    #[test]
    fn test_colorize_disabled() {
        let formatter = Formatter::new(OutputFormat::Table, false);
        assert_eq!(formatter.success("test"), "✓ test");
        assert_eq!(formatter.warning("careful"), "⚠ careful");
    }
}
