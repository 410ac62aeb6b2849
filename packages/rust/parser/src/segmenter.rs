//! Section segmenter: partitions the normalized line stream into the
//! navigation block and named page sections.
//!
//! Two passes over the same stream. Pass 1 captures the navigation block
//! (at most once). Pass 2 discards everything before the first
//! footer/start marker, then splits the remainder at page-boundary
//! lines. Content accumulated while no real page is open is dropped —
//! that is the "00_Ignore" bucket of the source template.

use std::collections::HashSet;

use tracing::{debug, instrument};

use docpress_markdown::clean_list_text;
use docpress_shared::{ParsingConfig, Sections};

use crate::nav::extract_nav_items;

// ---------------------------------------------------------------------------
// Boundary predicates
// ---------------------------------------------------------------------------

/// Why a line was judged to start a new page. The predicates are checked
/// in this order; the first hit wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoundaryKind {
    /// Line is a top-level `# ` heading.
    TopLevelHeading,
    /// Cleaned text ends with "page".
    EndsWithPage,
    /// Cleaned text matches a label collected from the navigation block.
    KnownNavLabel,
    /// Cleaned text mentions "customer reviews".
    CustomerReviews,
}

/// Decide whether a line opens a new page section.
///
/// A candidate must hit one of the named predicates, stay under 80
/// cleaned characters, and contain no bracket character. Excluded
/// keywords veto the match — except for customer-reviews lines, which
/// bypass the keyword filter as a named special case.
pub fn match_boundary(
    stripped: &str,
    clean: &str,
    nav_labels: &HashSet<String>,
    config: &ParsingConfig,
) -> Option<BoundaryKind> {
    let lower = clean.to_lowercase();

    let kind = if stripped.starts_with("# ") {
        BoundaryKind::TopLevelHeading
    } else if lower.ends_with("page") {
        BoundaryKind::EndsWithPage
    } else if nav_labels.contains(&lower) {
        BoundaryKind::KnownNavLabel
    } else if lower.contains("customer reviews") {
        BoundaryKind::CustomerReviews
    } else {
        return None;
    };

    if clean.chars().count() >= 80 || stripped.contains('[') {
        return None;
    }

    let excluded = !lower.contains("customer reviews")
        && config
            .excluded_keywords
            .iter()
            .any(|kw| lower.contains(kw.as_str()));

    (!excluded).then_some(kind)
}

// ---------------------------------------------------------------------------
// Segmentation
// ---------------------------------------------------------------------------

/// Partition the normalized line stream into sections.
#[instrument(skip_all, fields(lines = lines.len()))]
pub fn segment(lines: &[String], config: &ParsingConfig) -> Sections {
    let mut sections = Sections {
        navigation: capture_navigation(lines, config),
        pages: Vec::new(),
    };

    let nav_labels: HashSet<String> = sections
        .navigation
        .as_deref()
        .map(|nav| {
            extract_nav_items(nav)
                .into_iter()
                .map(|item| item.to_lowercase())
                .collect()
        })
        .unwrap_or_default();

    let mut passed_marker = false;
    let mut current_page: Option<String> = None;
    let mut current_content: Vec<String> = Vec::new();

    for line in lines {
        let stripped = line.trim();
        let clean = clean_list_text(stripped);

        // Repeated boilerplate marker: discard anything collected since
        // the previous marker and start over in the ignore bucket.
        if stripped.contains(config.start_marker.as_str()) {
            passed_marker = true;
            current_page = None;
            current_content.clear();
            continue;
        }
        if !passed_marker {
            continue;
        }

        if match_boundary(stripped, &clean, &nav_labels, config).is_some() {
            if !current_content.is_empty() {
                if let Some(name) = current_page.take() {
                    sections.commit(name, current_content.join("\n"));
                }
            }
            current_page = Some(clean);
            current_content.clear();
            continue;
        }

        if current_page.is_some() {
            current_content.push(line.clone());
        }
    }

    if !current_content.is_empty() {
        if let Some(name) = current_page {
            sections.commit(name, current_content.join("\n"));
        }
    }

    debug!(pages = sections.pages.len(), has_nav = sections.navigation.is_some(), "segmentation complete");
    sections
}

/// Pass 1: capture the navigation block, at most once per document.
fn capture_navigation(lines: &[String], config: &ParsingConfig) -> Option<Vec<String>> {
    let mut nav_lines: Vec<String> = Vec::new();
    let mut capturing = false;
    let mut captured: Option<Vec<String>> = None;

    for line in lines {
        let stripped = line.trim();
        let clean = clean_list_text(stripped);

        if captured.is_none() && clean.contains(config.nav_marker.as_str()) {
            capturing = true;
            continue;
        }
        if capturing {
            let terminator = stripped.starts_with("# ")
                || (stripped.starts_with("## ") && !clean.contains("Navigation"));
            if terminator {
                capturing = false;
                captured = Some(std::mem::take(&mut nav_lines));
            } else {
                nav_lines.push(stripped.to_string());
            }
        }
    }

    captured
}
