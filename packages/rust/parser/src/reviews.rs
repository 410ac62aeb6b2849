//! Review block parser: the reviews section's raw text → attributed
//! [`ReviewRecord`]s.
//!
//! The input is an unstructured blob. Bold markers double as soft line
//! breaks, a trailing parenthetical closes a review, and a sentence
//! boundary inside the closing line separates quote from attribution.
//! Malformed spans produce no record; that is the contract, not an error.

use std::sync::LazyLock;

use regex::Regex;
use tracing::{debug, instrument};

use docpress_shared::ReviewRecord;

static HEADING_LINE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^#.*").expect("valid regex"));
static MD_LINK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[([^\]]+)\]\(.*?\)").expect("valid regex"));
/// Trailing parenthesized category, closing the line.
static CATEGORY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)^(.*?)\s*\(([^)]+)\)$").expect("valid regex"));
/// Quote/attribution split: everything up to the last terminal
/// punctuation followed by whitespace, then the remainder.
static ATTRIBUTION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?s)^(.*[.!?"])\s+(.*)$"#).expect("valid regex"));
static LEADING_DASH_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[\s\-]+").expect("valid regex"));

/// An attribution shorter than this many words is a source name, not
/// quote text.
const SOURCE_WORD_LIMIT: usize = 5;

/// Parse the reviews section.
#[instrument(skip_all)]
pub fn parse_reviews(raw_text: &str) -> Vec<ReviewRecord> {
    let without_headings = HEADING_LINE_RE.replace_all(raw_text, "");
    let normalized = without_headings.replace("**", "\n");

    let mut records = Vec::new();
    let mut buffer: Vec<String> = Vec::new();

    for line in normalized.split('\n') {
        let stripped = line.trim();
        if stripped.is_empty() {
            continue;
        }
        let clean_line = MD_LINK_RE.replace_all(stripped, "$1").trim().to_string();

        let Some(caps) = CATEGORY_RE.captures(&clean_line) else {
            buffer.push(clean_line);
            continue;
        };
        let pre_paren = caps[1].trim().to_string();
        let service = caps[2].trim().replace("**", "");

        let (text, source) = if let Some(split) = ATTRIBUTION_RE.captures(&pre_paren) {
            let quote = split[1].trim().to_string();
            let source = split[2].trim().to_string();
            (join_with(&buffer, Some(quote)), source)
        } else if pre_paren.split_whitespace().count() < SOURCE_WORD_LIMIT {
            (join_with(&buffer, None), pre_paren)
        } else {
            (join_with(&buffer, Some(pre_paren)), String::new())
        };

        let text = text
            .trim()
            .trim_matches('"')
            .trim_matches('\'')
            .replace("**", "");
        if !text.is_empty() {
            records.push(ReviewRecord {
                service_type: None,
                text,
                source: LEADING_DASH_RE.replace(&source, "").replace("**", ""),
                service: format!("({service})"),
            });
        }
        buffer.clear();
    }

    debug!(reviews = records.len(), "reviews parsed");
    records
}

fn join_with(buffer: &[String], tail: Option<String>) -> String {
    let mut parts: Vec<&str> = buffer.iter().map(String::as_str).collect();
    if let Some(ref t) = tail {
        parts.push(t);
    }
    parts.join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_line_bold_review_splits_fully() {
        let records = parse_reviews(r#"**"Great service!" - Jane D. (Plumbing)**"#);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].text, "Great service!");
        assert_eq!(records[0].source, "Jane D.");
        assert_eq!(records[0].service, "(Plumbing)");
        assert!(records[0].service_type.is_none());
    }

    #[test]
    fn short_closing_line_is_source_and_buffer_is_text() {
        let raw = "The crew arrived on time and fixed everything.\nMark T. (Heating)";
        let records = parse_reviews(raw);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].text, "The crew arrived on time and fixed everything.");
        assert_eq!(records[0].source, "Mark T.");
        assert_eq!(records[0].service, "(Heating)");
    }

    #[test]
    fn long_closing_line_joins_buffer_without_source() {
        let raw = "They were friendly\nand the work held up through a very cold winter season (Heating)";
        let records = parse_reviews(raw);
        assert_eq!(records.len(), 1);
        assert_eq!(
            records[0].text,
            "They were friendly and the work held up through a very cold winter season"
        );
        assert_eq!(records[0].source, "");
    }

    #[test]
    fn heading_lines_are_stripped() {
        let raw = "# Customer Reviews\n\"Very happy.\" Ana R. (Cooling)";
        let records = parse_reviews(raw);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].text, "Very happy.");
        assert_eq!(records[0].source, "Ana R.");
    }

    #[test]
    fn markdown_links_reduce_to_their_text() {
        let raw = "\"Found them on [Google](https://g.example).\" Sam W. (Plumbing)";
        let records = parse_reviews(raw);
        assert_eq!(records[0].text, "Found them on Google.");
    }

    #[test]
    fn lines_without_category_never_emit() {
        let records = parse_reviews("Just some floating text\nwith no attribution at all");
        assert!(records.is_empty());
    }

    #[test]
    fn multiple_reviews_reset_the_buffer() {
        let raw = "\"First one.\" Al B. (Plumbing)\n\"Second one.\" Cy D. (Heating)";
        let records = parse_reviews(raw);
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].text, "First one.");
        assert_eq!(records[1].text, "Second one.");
        assert_eq!(records[1].source, "Cy D.");
    }
}
