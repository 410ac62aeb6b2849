//! Text-cleaning primitives shared by the segmenter, page parser, and
//! navigation builder.
//!
//! These are deliberately forgiving string transforms, not a grammar:
//! the source documents are human-authored and inconsistent.

use std::sync::LazyLock;

use regex::Regex;

/// Matches `[label](url)` markdown links; replaced by the label alone.
static MD_LINK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[([^\]]+)\]\(.*?\)").expect("valid regex"));

/// Leading list-marker / decoration characters.
static LEADING_DECOR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[\s*_+.\-]+").expect("valid regex"));

/// Trailing list-marker / decoration characters.
static TRAILING_DECOR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[\s*_+.\-]+$").expect("valid regex"));

/// Characters outside word chars / whitespace / hyphen.
static NON_SLUG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^\w\s-]").expect("valid regex"));

/// Whitespace runs, collapsed to a single hyphen in slugs.
static WS_RUN_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").expect("valid regex"));

/// Replace every `[label](url)` with just `label`, drop stray backslashes
/// and angle brackets, and trim.
pub fn strip_markdown_link(text: &str) -> String {
    let text = MD_LINK_RE.replace_all(text, "$1");
    text.replace(['\\', '<', '>'], "").trim().to_string()
}

/// Clean a display line: strip links, braces, surrounding list-marker or
/// decoration characters, and emphasis markers.
pub fn clean_list_text(text: &str) -> String {
    let text = MD_LINK_RE.replace_all(text, "$1");
    let text = text.replace(['{', '}'], "");
    let text = LEADING_DECOR_RE.replace(&text, "");
    let text = TRAILING_DECOR_RE.replace(&text, "");
    let text = text.replace('#', "").replace("**", "");
    text.trim().to_string()
}

/// Derive a lowercase, hyphen-separated slug from display text.
///
/// Idempotent: slugging a slug yields the same slug.
pub fn to_kebab_slug(text: &str) -> String {
    let text = clean_list_text(text);
    let text = text.replace(" - ", " ").replace('|', "");
    let text = NON_SLUG_RE.replace_all(&text, "");
    let text = text.trim().to_lowercase();
    WS_RUN_RE.replace_all(&text, "-").to_string()
}

/// Decide whether a segmented section becomes an output page.
///
/// True when the lowercased title contains any excluded keyword, or the
/// content is trivially short.
pub fn should_skip_page(title: &str, content: &str, excluded_keywords: &[String]) -> bool {
    let clean_title = title.to_lowercase();
    let clean_title = clean_title.trim();
    if excluded_keywords.iter().any(|kw| clean_title.contains(kw.as_str())) {
        return true;
    }
    content.trim().len() < 10
}

/// Unescape literal backslash sequences the normalizer leaves in body text.
pub fn clean_body_line(text: &str) -> String {
    text.trim()
        .replace("\\_", "_")
        .replace("\\[", "[")
        .replace("\\]", "]")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keywords() -> Vec<String> {
        vec!["header".into(), "footer".into(), "00_ignore".into()]
    }

    #[test]
    fn strip_markdown_link_keeps_label() {
        assert_eq!(
            strip_markdown_link("See [Our Services](https://example.com/services) today"),
            "See Our Services today"
        );
        assert_eq!(strip_markdown_link(r"a\<b\>c"), "abc");
    }

    #[test]
    fn clean_list_text_strips_decoration() {
        assert_eq!(clean_list_text("* **Drain Cleaning**"), "Drain Cleaning");
        assert_eq!(clean_list_text("- [AC Repair](https://x.com/ac)"), "AC Repair");
        assert_eq!(clean_list_text("## About Us"), "About Us");
        assert_eq!(clean_list_text("{Water Heaters}"), "Water Heaters");
    }

    #[test]
    fn kebab_slug_basic() {
        assert_eq!(to_kebab_slug("Drain Cleaning"), "drain-cleaning");
        assert_eq!(to_kebab_slug("Heating & Cooling"), "heating-cooling");
        assert_eq!(to_kebab_slug("AC - Repair | Install"), "ac-repair-install");
    }

    #[test]
    fn kebab_slug_is_idempotent() {
        for input in [
            "Drain Cleaning",
            "  ** Water Heater Install ** ",
            "Heating & Cooling",
            "[Sump Pumps](https://example.com)",
            "A - B | C # D",
            "",
        ] {
            let once = to_kebab_slug(input);
            let twice = to_kebab_slug(&once);
            assert_eq!(once, twice, "not idempotent for {input:?}");
        }
    }

    #[test]
    fn should_skip_page_matches_keywords_case_insensitively() {
        assert!(should_skip_page("Header Section", "some long enough content", &keywords()));
        assert!(should_skip_page("00_Ignore", "some long enough content", &keywords()));
        assert!(!should_skip_page("Drain Cleaning", "some long enough content", &keywords()));
    }

    #[test]
    fn should_skip_page_rejects_short_content() {
        assert!(should_skip_page("Drain Cleaning", "  tiny  ", &keywords()));
    }

    #[test]
    fn clean_body_line_unescapes() {
        assert_eq!(clean_body_line(r"  \[hero image\] foo\_bar  "), "[hero image] foo_bar");
    }
}
