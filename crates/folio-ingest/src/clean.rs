//! Page-number and running header/footer removal
//!
//! Books repeat the chapter title at the top and the page number or
//! running footer at the bottom of most pages. A line counts as a running
//! header (footer) when it appears among the first (last) few lines of
//! enough pages and is short.

use crate::text::{fix_hyphenation_across_lines, is_page_number_line, join_lines, split_and_clean_lines};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};

/// Number of frequent header/footer lines kept in the report
const REPORTED_LINES_LIMIT: usize = 30;

/// Thresholds for header/footer detection
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CleaningParams {
    /// Lines at the top of a page considered header candidates
    pub header_n: usize,
    /// Lines at the bottom of a page considered footer candidates
    pub footer_n: usize,
    /// Fraction of pages a candidate must appear on (floored, at least 3)
    pub min_ratio: f64,
    /// Longest line, in characters, that may be treated as a header/footer
    pub max_len: usize,
}

impl Default for CleaningParams {
    fn default() -> Self {
        Self {
            header_n: 2,
            footer_n: 2,
            min_ratio: 0.6,
            max_len: 90,
        }
    }
}

/// Line counters accumulated while cleaning
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CleaningStats {
    /// Page-number-only lines dropped
    pub removed_num_lines: usize,
    /// Running header lines dropped
    pub removed_header_lines: usize,
    /// Running footer lines dropped
    pub removed_footer_lines: usize,
    /// Lines kept after hyphenation repair
    pub kept_lines: usize,
}

/// What the cleaner removed, for the ingest report
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CleaningReport {
    /// Line counters
    pub stats: CleaningStats,
    /// Detected running headers, sorted, at most 30
    pub frequent_headers: Vec<String>,
    /// Detected running footers, sorted, at most 30
    pub frequent_footers: Vec<String>,
}

/// Clean every page of a document
///
/// Returns one cleaned text per input page (empty pages stay empty) plus a
/// report of what was removed.
pub fn clean_pdf_pages(raw_pages: &[String], params: &CleaningParams) -> (Vec<String>, CleaningReport) {
    let pages_lines: Vec<Vec<String>> = raw_pages.iter().map(|t| split_and_clean_lines(t)).collect();
    let n_pages = pages_lines.len();

    let (header_counts, footer_counts) = collect_candidates(&pages_lines, params);
    let frequent_headers = frequent(&header_counts, n_pages, params);
    let frequent_footers = frequent(&footer_counts, n_pages, params);

    let mut stats = CleaningStats::default();
    let mut cleaned = Vec::with_capacity(n_pages);

    for lines in pages_lines {
        if lines.is_empty() {
            cleaned.push(String::new());
            continue;
        }

        let mut kept = Vec::with_capacity(lines.len());
        for line in lines {
            if is_page_number_line(&line) {
                stats.removed_num_lines += 1;
            } else if frequent_headers.contains(&line) {
                stats.removed_header_lines += 1;
            } else if frequent_footers.contains(&line) {
                stats.removed_footer_lines += 1;
            } else {
                kept.push(line);
            }
        }

        let kept = fix_hyphenation_across_lines(kept);
        stats.kept_lines += kept.len();
        cleaned.push(join_lines(&kept));
    }

    let report = CleaningReport {
        stats,
        frequent_headers: frequent_headers.into_iter().take(REPORTED_LINES_LIMIT).collect(),
        frequent_footers: frequent_footers.into_iter().take(REPORTED_LINES_LIMIT).collect(),
    };
    (cleaned, report)
}

fn collect_candidates<'a>(
    pages_lines: &'a [Vec<String>],
    params: &CleaningParams,
) -> (HashMap<&'a str, usize>, HashMap<&'a str, usize>) {
    let mut headers = HashMap::new();
    let mut footers = HashMap::new();
    for lines in pages_lines.iter().filter(|lines| !lines.is_empty()) {
        for line in lines.iter().take(params.header_n) {
            *headers.entry(line.as_str()).or_insert(0) += 1;
        }
        let footer_from = lines.len().saturating_sub(params.footer_n);
        for line in &lines[footer_from..] {
            *footers.entry(line.as_str()).or_insert(0) += 1;
        }
    }
    (headers, footers)
}

fn frequent(counts: &HashMap<&str, usize>, n_pages: usize, params: &CleaningParams) -> BTreeSet<String> {
    if n_pages == 0 {
        return BTreeSet::new();
    }
    let threshold = ((n_pages as f64 * params.min_ratio) as usize).max(3);
    counts
        .iter()
        .filter(|(line, count)| **count >= threshold && line.chars().count() <= params.max_len)
        .map(|(line, _)| line.to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn book(n: usize) -> Vec<String> {
        (1..=n)
            .map(|i| format!("Chapter 3 Vector Semantics\nBody line {i} about embeddings.\nSpeech and Language Processing\n{i}"))
            .collect()
    }

    #[test]
    fn test_running_headers_and_numbers_removed() {
        let (cleaned, report) = clean_pdf_pages(&book(5), &CleaningParams::default());

        assert_eq!(cleaned.len(), 5);
        assert_eq!(cleaned[0], "Body line 1 about embeddings.");
        assert_eq!(report.stats.removed_num_lines, 5);
        assert_eq!(report.stats.removed_header_lines, 5);
        assert_eq!(report.stats.removed_footer_lines, 5);
        assert_eq!(report.stats.kept_lines, 5);
        assert_eq!(report.frequent_headers, vec!["Chapter 3 Vector Semantics"]);
        assert!(report.frequent_footers.contains(&"Speech and Language Processing".to_string()));
    }

    #[test]
    fn test_short_documents_keep_repeated_lines() {
        // Threshold never drops below three pages.
        let (cleaned, report) = clean_pdf_pages(&book(2), &CleaningParams::default());
        assert!(cleaned[0].starts_with("Chapter 3 Vector Semantics"));
        assert!(report.frequent_headers.is_empty());
        assert_eq!(report.stats.removed_num_lines, 2);
    }

    #[test]
    fn test_long_lines_are_never_headers() {
        let long = "x".repeat(91);
        let pages: Vec<String> = (0..4).map(|i| format!("{long}\nbody {i}")).collect();
        let (cleaned, report) = clean_pdf_pages(&pages, &CleaningParams::default());
        assert!(report.frequent_headers.is_empty());
        assert!(cleaned[0].starts_with(&long));
    }

    #[test]
    fn test_empty_pages_stay_empty() {
        let pages = vec![String::new(), "  \n ".to_string(), "text".to_string()];
        let (cleaned, _) = clean_pdf_pages(&pages, &CleaningParams::default());
        assert_eq!(cleaned, vec!["", "", "text"]);
    }

    #[test]
    fn test_hyphenation_repaired_after_removal() {
        let pages = vec!["the classifi-\ncation step".to_string()];
        let (cleaned, _) = clean_pdf_pages(&pages, &CleaningParams::default());
        assert_eq!(cleaned[0], "the classification step");
    }
}
