//! Folio Evaluation
//!
//! Scores retrieval (keyword recall@K and MRR) and, optionally, generated
//! answers (exact match and containment) against a labelled question set.
//!
//! # Examples
//!
//! ```
//! use folio_eval::metrics::{eval_retrieval_by_keyword, mrr_from_ranks, recall_at_k};
//!
//! let row = eval_retrieval_by_keyword(&["unrelated", "The IDF term"], "idf");
//! assert_eq!(row.rank, Some(2));
//!
//! assert_eq!(recall_at_k(&[row.hit, false]), 0.5);
//! assert_eq!(mrr_from_ranks(&[row.rank, None]), 0.25);
//! ```

#![warn(missing_docs)]

mod error;
mod evaluate;
pub mod metrics;

pub use error::EvalError;
pub use evaluate::{
    read_questions, run_evaluation, EvalConfig, EvalMetrics, Question, METRICS_FILE,
    PER_QUESTION_FILE,
};
