//! Hyperlink table extraction.
//!
//! Walks the document's linked runs and builds a visible-text → URL
//! lookup table. The page parser later uses it to resolve image/CTA
//! references that appear as bracket-tagged placeholders rather than
//! literal URLs.

use std::collections::HashMap;
use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use crate::reader::DocxDocument;

/// Bracketed directive tags, stripped before registering a paragraph key.
static BRACKET_TAG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[.*?\]").expect("valid regex"));

/// Placeholder tags whose paragraphs contribute an extra lookup key.
const PLACEHOLDER_TAGS: [&str; 3] = ["[hero image]", "[image]", "[promo"];

/// Build the text → URL lookup table for one document.
///
/// Every hyperlink run registers its visible text (and a space-stripped
/// duplicate) against the resolved relationship target. Paragraphs
/// carrying an image/promo placeholder additionally register their
/// tag-stripped text against the paragraph's first hyperlink URL.
/// Keys are not unique — last write wins. Missing relationship ids are
/// skipped, never fatal.
pub fn build_hyperlink_table(doc: &DocxDocument) -> HashMap<String, String> {
    let mut table = HashMap::new();

    for paragraph in &doc.paragraphs {
        let para_text = paragraph.text().trim().to_string();
        let mut found_url: Option<String> = None;

        for (rel_id, text) in paragraph.hyperlinks() {
            let Some(url) = rel_id.as_deref().and_then(|id| doc.relationships.get(id)) else {
                continue;
            };
            let text = text.trim();
            if !text.is_empty() {
                table.insert(text.to_string(), url.clone());
                table.insert(text.replace(' ', ""), url.clone());
            }
            if found_url.is_none() {
                found_url = Some(url.clone());
            }
        }

        if let Some(url) = found_url {
            let lower = para_text.to_lowercase();
            if PLACEHOLDER_TAGS.iter().any(|tag| lower.contains(tag)) {
                let clean_val = BRACKET_TAG_RE
                    .replace_all(&para_text, "")
                    .trim()
                    .to_string();
                if !clean_val.is_empty() {
                    table.insert(clean_val.replace(' ', ""), url.clone());
                    table.insert(clean_val, url);
                }
            }
        }
    }

    debug!(keys = table.len(), "hyperlink table built");
    table
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::build_docx;

    #[test]
    fn registers_link_text_and_spaceless_variant() {
        let bytes = build_docx(
            r#"<w:p><w:hyperlink r:id="rId1"><w:r><w:t>front porch</w:t></w:r></w:hyperlink></w:p>"#,
            &[("rId1", "https://img.example.com/porch.jpg")],
        );
        let doc = DocxDocument::from_bytes(&bytes).unwrap();
        let table = build_hyperlink_table(&doc);

        assert_eq!(table["front porch"], "https://img.example.com/porch.jpg");
        assert_eq!(table["frontporch"], "https://img.example.com/porch.jpg");
    }

    #[test]
    fn placeholder_paragraph_registers_tag_stripped_key() {
        let bytes = build_docx(
            r#"<w:p><w:r><w:t>[hero image] </w:t></w:r><w:hyperlink r:id="rId2"><w:r><w:t>kitchen remodel</w:t></w:r></w:hyperlink></w:p>"#,
            &[("rId2", "https://img.example.com/kitchen.jpg")],
        );
        let doc = DocxDocument::from_bytes(&bytes).unwrap();
        let table = build_hyperlink_table(&doc);

        // the full tag-stripped paragraph text becomes a key too
        assert_eq!(table["kitchen remodel"], "https://img.example.com/kitchen.jpg");
    }

    #[test]
    fn missing_relationship_is_skipped() {
        let bytes = build_docx(
            r#"<w:p><w:hyperlink r:id="rId9"><w:r><w:t>dangling</w:t></w:r></w:hyperlink></w:p>"#,
            &[],
        );
        let doc = DocxDocument::from_bytes(&bytes).unwrap();
        let table = build_hyperlink_table(&doc);
        assert!(table.is_empty());
    }
}
