//! Document → HTML intermediate rendering.
//!
//! Produces the small HTML tree the markup normalizer consumes: heading
//! styles become `<h1>..<h6>`, numbered paragraphs become `<ul>/<li>`
//! items, bold runs become `<strong>`, hyperlink runs become `<a href>`.
//! List nesting is flattened to one level; the navigation builder only
//! distinguishes list items from plain lines.

use html_escape::{encode_double_quoted_attribute, encode_text};

use crate::reader::{DocxDocument, Paragraph, Span};

/// Render the whole document to the HTML intermediate.
pub fn render_html(doc: &DocxDocument) -> String {
    let mut html = String::new();
    let mut in_list = false;

    for paragraph in &doc.paragraphs {
        let inner = render_spans(paragraph, doc);
        if inner.trim().is_empty() {
            continue;
        }

        if paragraph.list_level.is_some() {
            if !in_list {
                html.push_str("<ul>");
                in_list = true;
            }
            html.push_str("<li>");
            html.push_str(&inner);
            html.push_str("</li>");
            continue;
        }

        if in_list {
            html.push_str("</ul>");
            in_list = false;
        }

        match heading_level(paragraph) {
            Some(level) => {
                html.push_str(&format!("<h{level}>{inner}</h{level}>"));
            }
            None => {
                html.push_str("<p>");
                html.push_str(&inner);
                html.push_str("</p>");
            }
        }
    }

    if in_list {
        html.push_str("</ul>");
    }

    html
}

fn heading_level(paragraph: &Paragraph) -> Option<u8> {
    match paragraph.style.as_deref() {
        Some("Title") => Some(1),
        Some(style) => {
            let level = style.strip_prefix("Heading")?.parse::<u8>().ok()?;
            (1..=6).contains(&level).then_some(level)
        }
        None => None,
    }
}

fn render_spans(paragraph: &Paragraph, doc: &DocxDocument) -> String {
    let mut out = String::new();
    for span in &paragraph.spans {
        match span {
            Span::Text { text, bold } => {
                let escaped = encode_text(text);
                if *bold {
                    out.push_str(&format!("<strong>{escaped}</strong>"));
                } else {
                    out.push_str(&escaped);
                }
            }
            Span::Hyperlink { rel_id, text } => {
                let escaped = encode_text(text);
                let target = rel_id.as_deref().and_then(|id| doc.relationships.get(id));
                match target {
                    Some(url) => {
                        let href = encode_double_quoted_attribute(url);
                        out.push_str(&format!(r#"<a href="{href}">{escaped}</a>"#));
                    }
                    None => out.push_str(&escaped),
                }
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reader::DocxDocument;
    use crate::test_support::build_docx;

    #[test]
    fn renders_headings_lists_and_links() {
        let bytes = build_docx(
            r#"<w:p><w:pPr><w:pStyle w:val="Heading1"/></w:pPr><w:r><w:t>Home Page</w:t></w:r></w:p>
               <w:p><w:pPr><w:numPr><w:ilvl w:val="0"/><w:numId w:val="1"/></w:numPr></w:pPr><w:r><w:t>Drain Cleaning</w:t></w:r></w:p>
               <w:p><w:pPr><w:numPr><w:ilvl w:val="0"/><w:numId w:val="1"/></w:numPr></w:pPr><w:r><w:t>Water Heaters</w:t></w:r></w:p>
               <w:p><w:r><w:rPr><w:b/></w:rPr><w:t>Call us</w:t></w:r><w:hyperlink r:id="rId1"><w:r><w:t>here</w:t></w:r></w:hyperlink></w:p>"#,
            &[("rId1", "https://example.com/contact")],
        );
        let doc = DocxDocument::from_bytes(&bytes).unwrap();
        let html = render_html(&doc);

        assert!(html.contains("<h1>Home Page</h1>"));
        assert!(html.contains("<ul><li>Drain Cleaning</li><li>Water Heaters</li></ul>"));
        assert!(html.contains("<strong>Call us</strong>"));
        assert!(html.contains(r#"<a href="https://example.com/contact">here</a>"#));
    }

    #[test]
    fn escapes_markup_in_text() {
        let bytes = build_docx(r#"<w:p><w:r><w:t>Fish &amp; Chips &lt;fresh&gt;</w:t></w:r></w:p>"#, &[]);
        let doc = DocxDocument::from_bytes(&bytes).unwrap();
        let html = render_html(&doc);
        assert!(html.contains("Fish &amp; Chips &lt;fresh&gt;"));
    }
}
