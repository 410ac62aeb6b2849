//! Heuristic content parsers: section segmentation, page parsing,
//! navigation tree building, and review extraction.
//!
//! Everything here is pure over its inputs. State that crosses module
//! boundaries (the hyperlink table, the image queue) is passed in
//! explicitly by the pipeline.

pub mod nav;
pub mod page;
pub mod reviews;
pub mod segmenter;

pub use nav::{build_nav_tree, extract_nav_items, render_nav_yaml};
pub use page::{classify_cta, classify_line, parse_page, render_markdown, LineTag, ParsedPage};
pub use reviews::parse_reviews;
pub use segmenter::{match_boundary, segment, BoundaryKind};
