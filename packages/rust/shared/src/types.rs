//! Core domain types for the document → site-bundle pipeline.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Sections
// ---------------------------------------------------------------------------

/// One segmented page section: a name derived from its boundary heading
/// plus the raw text accumulated until the next boundary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageSection {
    /// Cleaned boundary-line text, case preserved.
    pub name: String,
    /// Raw section body, newline-joined source lines.
    pub content: String,
}

/// Output of the section segmenter.
///
/// Page names are unique: committing a section under an existing name
/// replaces the earlier entry (never merges). Insertion order is kept.
#[derive(Debug, Clone, Default)]
pub struct Sections {
    /// Captured navigation block lines, if the marker was found.
    pub navigation: Option<Vec<String>>,
    /// Page sections in first-seen order.
    pub pages: Vec<PageSection>,
}

impl Sections {
    /// Commit a page section, replacing any earlier section with the same name.
    pub fn commit(&mut self, name: String, content: String) {
        if let Some(existing) = self.pages.iter_mut().find(|p| p.name == name) {
            existing.content = content;
        } else {
            self.pages.push(PageSection { name, content });
        }
    }
}

// ---------------------------------------------------------------------------
// Page records
// ---------------------------------------------------------------------------

/// A call-to-action derived from a single `[cta...]` tag line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cta {
    /// Display text (or the phone placeholder for phone CTAs).
    pub text: String,
    /// Link target: `tel:` placeholder or the contact-page placeholder.
    pub link: String,
    /// Icon identifier consumed by the site generator.
    pub icon: String,
    /// Color scheme name.
    pub scheme: String,
    /// Whether the button renders reversed.
    pub reverse: bool,
}

/// Structured record for one output page, assembled by the page parser.
#[derive(Debug, Clone, Default)]
pub struct PageRecord {
    /// Page title with heading markers and the " Page" suffix removed.
    pub title: String,
    /// Hero image slug; always equals the page slug.
    pub hero_image: String,
    /// Subheader paragraph from a `[para_subheader]` tag.
    pub subheader: String,
    /// CTAs in source order.
    pub ctas: Vec<Cta>,
    /// Promo headings in source order.
    pub promos: Vec<String>,
    /// Normalized Markdown body lines.
    pub body_lines: Vec<String>,
}

/// A single clickable card inside a service box.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceCard {
    pub title: String,
    pub slug: String,
}

/// The "how can we help" sub-block of a page.
#[derive(Debug, Clone, Default)]
pub struct ServiceBox {
    pub heading: String,
    pub sub_heading: String,
    pub cards: Vec<ServiceCard>,
}

// ---------------------------------------------------------------------------
// Navigation
// ---------------------------------------------------------------------------

/// One top-level navigation entry with its child labels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavNode {
    pub label: String,
    pub children: Vec<String>,
}

// ---------------------------------------------------------------------------
// Reviews
// ---------------------------------------------------------------------------

/// One parsed customer review. Field order matches `_data/reviews.yml`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewRecord {
    /// Reserved; always unset.
    pub service_type: Option<String>,
    /// Review body text.
    pub text: String,
    /// Attribution (reviewer name).
    pub source: String,
    /// Parenthesized service category, e.g. `(Plumbing)`.
    pub service: String,
}

/// Root structure for `_data/reviews.yml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReviewsFile {
    pub reviews: Vec<ReviewRecord>,
}

// ---------------------------------------------------------------------------
// Services data file
// ---------------------------------------------------------------------------

/// One card entry in `_data/services.yml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceCardData {
    pub title: String,
    pub permalink: String,
    pub image_position: String,
}

/// The `services:` mapping in `_data/services.yml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServicesData {
    pub heading: String,
    pub sub_heading: String,
    pub variant: String,
    pub cards_data: Vec<ServiceCardData>,
}

/// Root structure for `_data/services.yml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServicesFile {
    pub services: ServicesData,
}

impl ServicesFile {
    /// Build the data-file representation of a service box.
    pub fn from_box(service_box: &ServiceBox) -> Self {
        Self {
            services: ServicesData {
                heading: service_box.heading.clone(),
                sub_heading: service_box.sub_heading.clone(),
                variant: "image".into(),
                cards_data: service_box
                    .cards
                    .iter()
                    .map(|card| ServiceCardData {
                        title: card.title.clone(),
                        permalink: format!("/services/{}/", card.slug),
                        image_position: "[center_10%]".into(),
                    })
                    .collect(),
            },
        }
    }
}

// ---------------------------------------------------------------------------
// Images
// ---------------------------------------------------------------------------

/// A queued image fetch: resolved URL plus target file stem (no extension).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageTask {
    pub url: String,
    pub filename: String,
}
