//! .docx container reader.
//!
//! Opens the OOXML zip container, parses `word/document.xml` into a flat
//! paragraph model, and loads the relationship table from
//! `word/_rels/document.xml.rels`. Only the features the pipeline needs
//! survive: text runs, bold flags, heading styles, list membership, and
//! hyperlink runs with their relationship ids.

use std::collections::HashMap;
use std::io::{Cursor, Read, Seek};
use std::path::Path;

use tracing::debug;

use docpress_shared::{DocpressError, Result};

/// WordprocessingML main namespace.
const W_NS: &str = "http://schemas.openxmlformats.org/wordprocessingml/2006/main";

/// OOXML relationships namespace (the `r:id` attribute on hyperlinks).
const R_NS: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";

// ---------------------------------------------------------------------------
// Document model
// ---------------------------------------------------------------------------

/// An in-memory .docx: ordered paragraphs plus the relationship table.
#[derive(Debug, Clone)]
pub struct DocxDocument {
    /// Paragraphs in document order.
    pub paragraphs: Vec<Paragraph>,
    /// Relationship id → target URL/path.
    pub relationships: HashMap<String, String>,
}

/// One paragraph: its style, list membership, and ordered spans.
#[derive(Debug, Clone, Default)]
pub struct Paragraph {
    /// Paragraph style id (e.g. `Heading1`), if any.
    pub style: Option<String>,
    /// List nesting level when the paragraph carries numbering.
    pub list_level: Option<u32>,
    /// Text and hyperlink spans in run order.
    pub spans: Vec<Span>,
}

/// A run of text or a linked run within a paragraph.
#[derive(Debug, Clone)]
pub enum Span {
    /// Plain text run.
    Text { text: String, bold: bool },
    /// Hyperlink run; `rel_id` resolves through the relationship table.
    Hyperlink { rel_id: Option<String>, text: String },
}

impl Paragraph {
    /// Concatenated visible text of all spans.
    pub fn text(&self) -> String {
        self.spans
            .iter()
            .map(|span| match span {
                Span::Text { text, .. } => text.as_str(),
                Span::Hyperlink { text, .. } => text.as_str(),
            })
            .collect()
    }

    /// All hyperlink spans in run order.
    pub fn hyperlinks(&self) -> impl Iterator<Item = (&Option<String>, &str)> {
        self.spans.iter().filter_map(|span| match span {
            Span::Hyperlink { rel_id, text } => Some((rel_id, text.as_str())),
            Span::Text { .. } => None,
        })
    }
}

// ---------------------------------------------------------------------------
// Loading
// ---------------------------------------------------------------------------

impl DocxDocument {
    /// Open a .docx file from disk.
    pub fn open(path: &Path) -> Result<Self> {
        let file = std::fs::File::open(path).map_err(|e| DocpressError::io(path, e))?;
        Self::from_archive(file)
    }

    /// Parse a .docx from an in-memory byte buffer.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        Self::from_archive(Cursor::new(bytes))
    }

    fn from_archive<R: Read + Seek>(reader: R) -> Result<Self> {
        let mut archive = zip::ZipArchive::new(reader)
            .map_err(|e| DocpressError::document(format!("not a .docx container: {e}")))?;

        let document_xml = read_entry(&mut archive, "word/document.xml")?
            .ok_or_else(|| DocpressError::document("word/document.xml not found"))?;

        // The rels part may legitimately be absent in a link-free document.
        let rels_xml = read_entry(&mut archive, "word/_rels/document.xml.rels")?;

        let paragraphs = parse_document_xml(&document_xml)?;
        let relationships = match rels_xml {
            Some(xml) => parse_relationships(&xml)?,
            None => HashMap::new(),
        };

        debug!(
            paragraphs = paragraphs.len(),
            relationships = relationships.len(),
            "docx loaded"
        );

        Ok(Self {
            paragraphs,
            relationships,
        })
    }
}

fn read_entry<R: Read + Seek>(
    archive: &mut zip::ZipArchive<R>,
    name: &str,
) -> Result<Option<String>> {
    match archive.by_name(name) {
        Ok(mut entry) => {
            let mut content = String::new();
            entry
                .read_to_string(&mut content)
                .map_err(|e| DocpressError::document(format!("failed to read {name}: {e}")))?;
            Ok(Some(content))
        }
        Err(zip::result::ZipError::FileNotFound) => Ok(None),
        Err(e) => Err(DocpressError::document(format!("failed to open {name}: {e}"))),
    }
}

// ---------------------------------------------------------------------------
// XML parsing
// ---------------------------------------------------------------------------

fn parse_document_xml(xml: &str) -> Result<Vec<Paragraph>> {
    let doc = roxmltree::Document::parse(xml)
        .map_err(|e| DocpressError::document(format!("invalid document.xml: {e}")))?;

    let mut paragraphs = Vec::new();

    for node in doc
        .descendants()
        .filter(|n| n.has_tag_name((W_NS, "p")))
    {
        paragraphs.push(parse_paragraph(node));
    }

    Ok(paragraphs)
}

fn parse_paragraph(p: roxmltree::Node<'_, '_>) -> Paragraph {
    let mut para = Paragraph::default();

    for child in p.children() {
        if child.has_tag_name((W_NS, "pPr")) {
            for prop in child.children() {
                if prop.has_tag_name((W_NS, "pStyle")) {
                    para.style = prop.attribute((W_NS, "val")).map(str::to_string);
                } else if prop.has_tag_name((W_NS, "numPr")) {
                    let level = prop
                        .children()
                        .find(|n| n.has_tag_name((W_NS, "ilvl")))
                        .and_then(|n| n.attribute((W_NS, "val")))
                        .and_then(|v| v.parse().ok())
                        .unwrap_or(0);
                    para.list_level = Some(level);
                }
            }
        } else if child.has_tag_name((W_NS, "r")) {
            let text = run_text(child);
            if !text.is_empty() {
                para.spans.push(Span::Text {
                    text,
                    bold: run_is_bold(child),
                });
            }
        } else if child.has_tag_name((W_NS, "hyperlink")) {
            let text: String = child
                .descendants()
                .filter(|n| n.has_tag_name((W_NS, "t")))
                .filter_map(|n| n.text())
                .collect();
            para.spans.push(Span::Hyperlink {
                rel_id: child.attribute((R_NS, "id")).map(str::to_string),
                text,
            });
        }
    }

    para
}

fn run_text(r: roxmltree::Node<'_, '_>) -> String {
    r.children()
        .filter(|n| n.has_tag_name((W_NS, "t")))
        .filter_map(|n| n.text())
        .collect()
}

fn run_is_bold(r: roxmltree::Node<'_, '_>) -> bool {
    r.children()
        .find(|n| n.has_tag_name((W_NS, "rPr")))
        .and_then(|rpr| rpr.children().find(|n| n.has_tag_name((W_NS, "b"))))
        .map(|b| !matches!(b.attribute((W_NS, "val")), Some("false") | Some("0")))
        .unwrap_or(false)
}

fn parse_relationships(xml: &str) -> Result<HashMap<String, String>> {
    let doc = roxmltree::Document::parse(xml)
        .map_err(|e| DocpressError::document(format!("invalid document.xml.rels: {e}")))?;

    let mut rels = HashMap::new();
    for node in doc
        .descendants()
        .filter(|n| n.tag_name().name() == "Relationship")
    {
        if let (Some(id), Some(target)) = (node.attribute("Id"), node.attribute("Target")) {
            rels.insert(id.to_string(), target.to_string());
        }
    }
    Ok(rels)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::build_docx;

    #[test]
    fn reads_paragraphs_styles_and_text() {
        let bytes = build_docx(
            r#"<w:p><w:pPr><w:pStyle w:val="Heading1"/></w:pPr><w:r><w:t>Home Page</w:t></w:r></w:p>
               <w:p><w:r><w:t>Welcome </w:t></w:r><w:r><w:rPr><w:b/></w:rPr><w:t>home</w:t></w:r></w:p>"#,
            &[],
        );

        let doc = DocxDocument::from_bytes(&bytes).unwrap();
        assert_eq!(doc.paragraphs.len(), 2);
        assert_eq!(doc.paragraphs[0].style.as_deref(), Some("Heading1"));
        assert_eq!(doc.paragraphs[0].text(), "Home Page");
        assert_eq!(doc.paragraphs[1].text(), "Welcome home");

        match &doc.paragraphs[1].spans[1] {
            Span::Text { bold, .. } => assert!(bold),
            other => panic!("expected bold text run, got {other:?}"),
        }
    }

    #[test]
    fn reads_list_levels() {
        let bytes = build_docx(
            r#"<w:p><w:pPr><w:numPr><w:ilvl w:val="0"/><w:numId w:val="1"/></w:numPr></w:pPr><w:r><w:t>Drain Cleaning</w:t></w:r></w:p>"#,
            &[],
        );

        let doc = DocxDocument::from_bytes(&bytes).unwrap();
        assert_eq!(doc.paragraphs[0].list_level, Some(0));
    }

    #[test]
    fn reads_hyperlinks_and_relationships() {
        let bytes = build_docx(
            r#"<w:p><w:hyperlink r:id="rId5"><w:r><w:t>hero pic</w:t></w:r></w:hyperlink></w:p>"#,
            &[("rId5", "https://example.com/hero.jpg")],
        );

        let doc = DocxDocument::from_bytes(&bytes).unwrap();
        let links: Vec<_> = doc.paragraphs[0].hyperlinks().collect();
        assert_eq!(links.len(), 1);
        assert_eq!(links[0].0.as_deref(), Some("rId5"));
        assert_eq!(links[0].1, "hero pic");
        assert_eq!(
            doc.relationships.get("rId5").map(String::as_str),
            Some("https://example.com/hero.jpg")
        );
    }

    #[test]
    fn rejects_garbage_bytes() {
        let result = DocxDocument::from_bytes(b"definitely not a zip");
        assert!(matches!(result, Err(DocpressError::Document { .. })));
    }
}
