//! Line-level text utilities for PDF output

/// Replace non-breaking spaces, collapse runs of spaces and tabs, trim
///
/// Newlines are kept, so page tags and line structure survive.
///
/// # Examples
///
/// ```
/// use folio_ingest::text::normalize_spaces;
///
/// assert_eq!(normalize_spaces("  a\u{a0}\u{a0}b \t c\n d "), "a b c\n d");
/// ```
pub fn normalize_spaces(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut in_run = false;
    for c in s.chars() {
        let c = if c == '\u{a0}' { ' ' } else { c };
        if c == ' ' || c == '\t' {
            if !in_run {
                out.push(' ');
                in_run = true;
            }
        } else {
            out.push(c);
            in_run = false;
        }
    }
    out.trim().to_string()
}

/// True for lines holding only a page number (1 to 5 digits)
pub fn is_page_number_line(line: &str) -> bool {
    let digits = line.trim();
    (1..=5).contains(&digits.len()) && digits.bytes().all(|b| b.is_ascii_digit())
}

/// Undo typographic ligatures and drop zero-width spaces
pub fn fix_common_pdf_artifacts(s: &str) -> String {
    s.replace('\u{fb01}', "fi")
        .replace('\u{fb02}', "fl")
        .replace('\u{200b}', "")
}

fn is_line_break(c: char) -> bool {
    matches!(
        c,
        '\n' | '\r' | '\u{0b}' | '\u{0c}' | '\u{1c}' | '\u{1d}' | '\u{1e}' | '\u{85}' | '\u{2028}' | '\u{2029}'
    )
}

/// Split on any line break and keep the non-blank, space-normalized lines
pub fn split_and_clean_lines(text: &str) -> Vec<String> {
    fix_common_pdf_artifacts(text)
        .split(is_line_break)
        .map(normalize_spaces)
        .filter(|line| !line.is_empty())
        .collect()
}

/// Merge words hyphenated across a line break (`classifi-` + `cation`)
///
/// A line ending in an ASCII letter followed by `-` is joined with the next
/// line when that one starts with a lowercase ASCII letter.
pub fn fix_hyphenation_across_lines(lines: Vec<String>) -> Vec<String> {
    let mut out = Vec::with_capacity(lines.len());
    let mut iter = lines.into_iter().peekable();
    while let Some(current) = iter.next() {
        let continues = iter
            .peek()
            .is_some_and(|next| ends_with_hyphenated_word(&current) && starts_lowercase(next));
        match iter.next_if(|_| continues) {
            Some(next) => {
                let mut merged = current;
                merged.pop();
                merged.push_str(&next);
                out.push(merged);
            }
            None => out.push(current),
        }
    }
    out
}

fn ends_with_hyphenated_word(line: &str) -> bool {
    let mut tail = line.chars().rev();
    tail.next() == Some('-') && tail.next().is_some_and(|c| c.is_ascii_alphabetic())
}

fn starts_lowercase(line: &str) -> bool {
    line.chars().next().is_some_and(|c| c.is_ascii_lowercase())
}

/// Join lines with newlines and trim the result
pub fn join_lines(lines: &[String]) -> String {
    lines.join("\n").trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_keeps_newlines() {
        assert_eq!(normalize_spaces("\n[PAGE 1]\n  x  y \n"), "[PAGE 1]\n x y");
        assert_eq!(normalize_spaces(" \t \u{a0} "), "");
    }

    #[test]
    fn test_page_number_lines() {
        assert!(is_page_number_line("12"));
        assert!(is_page_number_line("  12345 "));
        assert!(!is_page_number_line("123456"));
        assert!(!is_page_number_line("p. 12"));
        assert!(!is_page_number_line(""));
    }

    #[test]
    fn test_ligatures_and_zero_width() {
        assert_eq!(fix_common_pdf_artifacts("\u{fb01}le \u{fb02}ow\u{200b}"), "file flow");
    }

    #[test]
    fn test_split_and_clean_lines() {
        let lines = split_and_clean_lines("  first  line \r\n\n\u{0c}second\u{a0}line\n   \n");
        assert_eq!(lines, vec!["first line", "second line"]);
    }

    #[test]
    fn test_hyphenation_merges_lowercase_continuation() {
        let lines = vec!["a classifi-".to_string(), "cation task".to_string()];
        assert_eq!(fix_hyphenation_across_lines(lines), vec!["a classification task"]);
    }

    #[test]
    fn test_hyphenation_leaves_other_lines() {
        let lines = vec![
            "range 1-".to_string(),
            "next".to_string(),
            "Word-".to_string(),
            "Capital".to_string(),
            "last-".to_string(),
        ];
        assert_eq!(fix_hyphenation_across_lines(lines.clone()), lines);
    }

    #[test]
    fn test_hyphenation_merges_once_per_pair() {
        let lines = vec!["ab-".to_string(), "cd-".to_string(), "ef".to_string()];
        assert_eq!(fix_hyphenation_across_lines(lines), vec!["abcd-", "ef"]);
    }

    #[test]
    fn test_join_lines() {
        assert_eq!(join_lines(&["a".to_string(), "b".to_string()]), "a\nb");
        assert_eq!(join_lines(&[]), "");
    }
}
