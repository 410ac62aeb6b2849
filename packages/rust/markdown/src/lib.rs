//! Markup normalizer: HTML intermediate → markdown-ish flat lines.
//!
//! The docx reader renders the document to a small HTML tree; this crate
//! converts it to line-oriented Markdown via `htmd` and exposes the
//! text-cleaning primitives used throughout the pipeline.

pub mod text;

use tracing::debug;

use docpress_shared::{DocpressError, Result};

pub use text::{
    clean_body_line, clean_list_text, should_skip_page, strip_markdown_link, to_kebab_slug,
};

/// Convert the HTML intermediate to normalized Markdown text.
pub fn to_markdown(html: &str) -> Result<String> {
    let converter = htmd::HtmlToMarkdown::builder()
        .skip_tags(vec!["script", "style", "iframe", "noscript", "svg"])
        .build();

    let markdown = converter
        .convert(html)
        .map_err(|e| DocpressError::Conversion(format!("htmd conversion failed: {e}")))?;

    debug!(html_len = html.len(), md_len = markdown.len(), "normalized markup");
    Ok(markdown)
}

/// Convert the HTML intermediate to the flat line stream the segmenter
/// consumes. Line order matches document order; the stream is immutable
/// once produced.
pub fn to_markdown_lines(html: &str) -> Result<Vec<String>> {
    let markdown = to_markdown(html)?;
    Ok(markdown.lines().map(str::to_string).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn converts_headings_and_paragraphs() {
        let html = "<h1>Home Page</h1><p>Welcome to our site.</p><h2>Our Work</h2>";
        let md = to_markdown(html).unwrap();
        assert!(md.contains("# Home Page"));
        assert!(md.contains("Welcome to our site."));
        assert!(md.contains("## Our Work"));
    }

    #[test]
    fn converts_links_and_emphasis() {
        let html = r#"<p><strong>Call now</strong> or <a href="https://example.com/x">book online</a></p>"#;
        let md = to_markdown(html).unwrap();
        assert!(md.contains("**Call now**"));
        assert!(md.contains("[book online](https://example.com/x)"));
    }

    #[test]
    fn list_items_come_out_one_per_line() {
        let html = "<ul><li>Drain Cleaning</li><li>Water Heaters</li></ul>";
        let lines = to_markdown_lines(html).unwrap();
        let items: Vec<&String> = lines.iter().filter(|l| l.contains("Drain Cleaning") || l.contains("Water Heaters")).collect();
        assert_eq!(items.len(), 2);
        // list markers survive so the nav builder can tell children apart
        assert!(items.iter().all(|l| {
            let t = l.trim_start();
            t.starts_with('-') || t.starts_with('*')
        }));
    }

    #[test]
    fn skips_script_content() {
        let html = "<p>Body</p><script>alert('x')</script>";
        let md = to_markdown(html).unwrap();
        assert!(md.contains("Body"));
        assert!(!md.contains("alert"));
    }
}
