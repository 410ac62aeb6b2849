//! In-memory .docx builder for tests.
//!
//! Produces a minimal OOXML container: `word/document.xml` with the given
//! body XML, plus a relationships part for external hyperlink targets.

use std::io::{Cursor, Write};

use zip::write::FileOptions;

/// Build a .docx byte buffer whose body contains `body_xml`
/// (`<w:p>...</w:p>` fragments) and whose relationship table maps each
/// `(id, target)` pair to an external hyperlink.
pub fn build_docx(body_xml: &str, rels: &[(&str, &str)]) -> Vec<u8> {
    let document = format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships">
<w:body>{body_xml}</w:body>
</w:document>"#
    );

    let mut rel_entries = String::new();
    for (id, target) in rels {
        rel_entries.push_str(&format!(
            r#"<Relationship Id="{id}" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/hyperlink" Target="{target}" TargetMode="External"/>"#
        ));
    }
    let rels_xml = format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">{rel_entries}</Relationships>"#
    );

    let mut buf = Cursor::new(Vec::new());
    {
        let mut writer = zip::ZipWriter::new(&mut buf);
        let options = FileOptions::default();

        writer
            .start_file("word/document.xml", options)
            .expect("start document.xml");
        writer
            .write_all(document.as_bytes())
            .expect("write document.xml");

        writer
            .start_file("word/_rels/document.xml.rels", options)
            .expect("start rels");
        writer.write_all(rels_xml.as_bytes()).expect("write rels");

        writer.finish().expect("finish zip");
    }
    buf.into_inner()
}
