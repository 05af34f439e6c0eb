//! Keyword retrieval scores and answer matching

/// Trim, lowercase and collapse whitespace runs to one space
pub fn normalize(text: &str) -> String {
    text.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// True when the normalized keyword occurs in the normalized text
pub fn keyword_in_text(keyword: &str, text: &str) -> bool {
    normalize(text).contains(&normalize(keyword))
}

/// Outcome of matching one question's keyword against its hits
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetrievalRowResult {
    /// Some hit contains the keyword
    pub hit: bool,
    /// 1-based rank of the first such hit
    pub rank: Option<usize>,
}

/// Find the first hit text containing `gold_keyword`
///
/// A blank keyword never matches.
pub fn eval_retrieval_by_keyword<S: AsRef<str>>(hit_texts: &[S], gold_keyword: &str) -> RetrievalRowResult {
    if gold_keyword.trim().is_empty() {
        return RetrievalRowResult { hit: false, rank: None };
    }
    let rank = hit_texts
        .iter()
        .position(|text| keyword_in_text(gold_keyword, text.as_ref()))
        .map(|i| i + 1);
    RetrievalRowResult {
        hit: rank.is_some(),
        rank,
    }
}

/// Fraction of questions with a hit; 0.0 for no questions
pub fn recall_at_k(hits: &[bool]) -> f64 {
    hits.iter().filter(|h| **h).count() as f64 / hits.len().max(1) as f64
}

/// Mean reciprocal rank, a missing rank counting as 0; 0.0 for no questions
pub fn mrr_from_ranks(ranks: &[Option<usize>]) -> f64 {
    let total: f64 = ranks
        .iter()
        .map(|rank| rank.map_or(0.0, |r| 1.0 / r as f64))
        .sum();
    total / ranks.len().max(1) as f64
}

/// Normalized equality
pub fn exact_match(pred: &str, gold: &str) -> bool {
    normalize(pred) == normalize(gold)
}

/// Normalized gold answer occurs in the prediction
pub fn answer_contains(pred: &str, gold: &str) -> bool {
    normalize(pred).contains(&normalize(gold))
}
