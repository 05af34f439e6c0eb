//! Question-set evaluation runs

use crate::error::EvalError;
use crate::metrics::{
    answer_contains, eval_retrieval_by_keyword, exact_match, mrr_from_ranks, recall_at_k,
};
use folio_domain::traits::LlmProvider;
use folio_rag::{RagTutor, Retriever};
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Per-question report file name
pub const PER_QUESTION_FILE: &str = "per_question.csv";
/// Aggregate metrics file name
pub const METRICS_FILE: &str = "metrics.txt";

/// Hits listed in the `top_sources` column
const TOP_SOURCES: usize = 5;

/// Where to read questions and write reports
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EvalConfig {
    /// CSV with `question`, `gold_keyword` and `gold_answer` columns
    pub questions_csv: PathBuf,
    /// Directory receiving the report files
    pub out_dir: PathBuf,
}

impl Default for EvalConfig {
    fn default() -> Self {
        Self {
            questions_csv: PathBuf::from("data/eval/questions.csv"),
            out_dir: PathBuf::from("data/eval/run_001"),
        }
    }
}

/// One labelled question
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Question {
    /// Question text
    pub question: String,
    /// Keyword a relevant hit must contain
    pub gold_keyword: String,
    /// Reference answer, possibly blank
    pub gold_answer: String,
}

/// Aggregate scores of a run
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EvalMetrics {
    /// Questions evaluated
    pub n_questions: usize,
    /// Hits retrieved per question
    pub top_k: usize,
    /// Fraction of questions whose keyword appears in a hit
    pub recall_at_k: f64,
    /// Mean reciprocal rank of the first keyword hit
    pub mrr: f64,
    /// Exact-match rate over questions with a gold answer
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exact_match_rate: Option<f64>,
    /// Containment rate over questions with a gold answer
    #[serde(skip_serializing_if = "Option::is_none")]
    pub answer_contains_rate: Option<f64>,
}

impl EvalMetrics {
    /// `key: value` lines as written to `metrics.txt`
    pub fn lines(&self) -> Vec<String> {
        let mut lines = vec![
            format!("n_questions: {}", self.n_questions),
            format!("recall@{}: {:?}", self.top_k, self.recall_at_k),
            format!("mrr: {:?}", self.mrr),
        ];
        if let Some(rate) = self.exact_match_rate {
            lines.push(format!("exact_match_rate: {:?}", rate));
        }
        if let Some(rate) = self.answer_contains_rate {
            lines.push(format!("answer_contains_rate: {:?}", rate));
        }
        lines
    }
}

/// Read the labelled questions of `path`
///
/// Columns are matched by header name; a missing column reads as empty.
/// Values are trimmed and rows with a blank question are skipped.
pub fn read_questions(path: &Path) -> Result<Vec<Question>, EvalError> {
    if !path.exists() {
        return Err(EvalError::NotFound(path.to_path_buf()));
    }
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(path)?;

    let headers = reader.headers()?.clone();
    let column = |name: &str| headers.iter().position(|h| h.trim() == name);
    let (q_col, kw_col, ans_col) = (column("question"), column("gold_keyword"), column("gold_answer"));

    let mut questions = Vec::new();
    for record in reader.records() {
        let record = record?;
        let field = |col: Option<usize>| {
            col.and_then(|i| record.get(i))
                .map(|v| v.trim().to_string())
                .unwrap_or_default()
        };
        let question = Question {
            question: field(q_col),
            gold_keyword: field(kw_col),
            gold_answer: field(ans_col),
        };
        if !question.question.is_empty() {
            questions.push(question);
        }
    }
    Ok(questions)
}

/// Score retrieval, and generation when a tutor is given, over a question set
///
/// Writes `per_question.csv` and `metrics.txt` into
/// [`EvalConfig::out_dir`]. Generation reuses the hits retrieved for
/// scoring.
///
/// # Errors
///
/// Returns error if:
/// - The question file is missing, malformed or has no usable question
///   ([`EvalError::NoQuestions`])
/// - Retrieval or generation fails for any question
/// - The report files cannot be written
pub fn run_evaluation<L>(
    retriever: &Retriever,
    tutor: Option<&RagTutor<L>>,
    config: &EvalConfig,
) -> Result<EvalMetrics, EvalError>
where
    L: LlmProvider,
    L::Error: Display,
{
    let questions = read_questions(&config.questions_csv)?;
    if questions.is_empty() {
        return Err(EvalError::NoQuestions);
    }
    fs::create_dir_all(&config.out_dir)?;
    info!("Evaluating {} questions", questions.len());

    let mut header = vec!["question", "gold_keyword", "hit@k", "rank_first_hit", "top_sources"];
    if tutor.is_some() {
        header.extend(["pred_answer", "gold_answer", "exact_match", "answer_contains"]);
    }
    let mut writer = csv::Writer::from_path(config.out_dir.join(PER_QUESTION_FILE))?;
    writer.write_record(&header)?;

    let mut hits_list = Vec::with_capacity(questions.len());
    let mut ranks_list = Vec::with_capacity(questions.len());
    let mut em_list = Vec::new();
    let mut contains_list = Vec::new();

    for q in &questions {
        let hits = retriever.retrieve(&q.question)?;
        let texts: Vec<&str> = hits.iter().map(|h| h.chunk.text.as_str()).collect();
        let row_result = eval_retrieval_by_keyword(&texts, &q.gold_keyword);
        hits_list.push(row_result.hit);
        ranks_list.push(row_result.rank);

        let top_sources = hits
            .iter()
            .take(TOP_SOURCES)
            .map(|h| h.source_label())
            .collect::<Vec<_>>()
            .join(" | ");
        let mut row = vec![
            q.question.clone(),
            q.gold_keyword.clone(),
            row_result.hit.to_string(),
            row_result.rank.map(|r| r.to_string()).unwrap_or_default(),
            top_sources,
        ];

        if let Some(tutor) = tutor {
            let answer = tutor.answer_with_hits(&q.question, &hits)?;
            let (em, contains) = if q.gold_answer.is_empty() {
                (String::new(), String::new())
            } else {
                let em = exact_match(&answer.answer, &q.gold_answer);
                let contains = answer_contains(&answer.answer, &q.gold_answer);
                em_list.push(em);
                contains_list.push(contains);
                (em.to_string(), contains.to_string())
            };
            row.extend([answer.answer, q.gold_answer.clone(), em, contains]);
        }

        debug!("{:?}: hit={} rank={:?}", q.question, row_result.hit, row_result.rank);
        writer.write_record(&row)?;
    }
    writer.flush()?;

    let rate = |flags: &[bool]| (!flags.is_empty()).then(|| recall_at_k(flags));
    let metrics = EvalMetrics {
        n_questions: questions.len(),
        top_k: retriever.config().top_k,
        recall_at_k: recall_at_k(&hits_list),
        mrr: mrr_from_ranks(&ranks_list),
        exact_match_rate: rate(&em_list),
        answer_contains_rate: rate(&contains_list),
    };

    let mut text = metrics.lines().join("\n");
    text.push('\n');
    fs::write(config.out_dir.join(METRICS_FILE), text)?;

    info!(
        "recall@{}={:.4} mrr={:.4} -> {}",
        metrics.top_k,
        metrics.recall_at_k,
        metrics.mrr,
        config.out_dir.display()
    );
    Ok(metrics)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write(dir: &TempDir, content: &str) -> PathBuf {
        let path = dir.path().join("questions.csv");
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_read_questions_by_header() {
        let dir = TempDir::new().unwrap();
        let path = write(
            &dir,
            "gold_answer,question,gold_keyword\n\
             log N/df, What is IDF? ,idf\n\
             ,   ,ignored\n\
             ,\"What is a token, exactly?\",token\n",
        );
        let questions = read_questions(&path).unwrap();
        assert_eq!(questions.len(), 2);
        assert_eq!(
            questions[0],
            Question {
                question: "What is IDF?".to_string(),
                gold_keyword: "idf".to_string(),
                gold_answer: "log N/df".to_string(),
            }
        );
        assert_eq!(questions[1].question, "What is a token, exactly?");
        assert_eq!(questions[1].gold_answer, "");
    }

    #[test]
    fn test_missing_columns_read_as_empty() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "question\nWhat is BM25?\n");
        let questions = read_questions(&path).unwrap();
        assert_eq!(questions[0].gold_keyword, "");
        assert_eq!(questions[0].gold_answer, "");
    }

    #[test]
    fn test_short_rows_tolerated() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "question,gold_keyword,gold_answer\nWhat is a stem?\n");
        assert_eq!(read_questions(&path).unwrap()[0].gold_keyword, "");
    }

    #[test]
    fn test_missing_file() {
        let dir = TempDir::new().unwrap();
        assert!(matches!(
            read_questions(&dir.path().join("absent.csv")),
            Err(EvalError::NotFound(_))
        ));
    }

    #[test]
    fn test_metric_lines() {
        let metrics = EvalMetrics {
            n_questions: 4,
            top_k: 8,
            recall_at_k: 0.75,
            mrr: 1.0,
            exact_match_rate: None,
            answer_contains_rate: Some(0.5),
        };
        assert_eq!(
            metrics.lines(),
            vec!["n_questions: 4", "recall@8: 0.75", "mrr: 1.0", "answer_contains_rate: 0.5"]
        );
    }
}
