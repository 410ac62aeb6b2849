//! .docx reading, hyperlink-table extraction, and rendering to the HTML
//! intermediate consumed by the markup normalizer.

pub mod html;
pub mod hyperlinks;
pub mod reader;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_support;

pub use html::render_html;
pub use hyperlinks::build_hyperlink_table;
pub use reader::{DocxDocument, Paragraph, Span};
