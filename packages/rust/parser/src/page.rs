//! Page content parser: one page's raw text → a structured [`PageRecord`],
//! an optional [`ServiceBox`], queued image tasks, and the rendered
//! front-matter + body Markdown.
//!
//! Processing is strictly sequential over lines. Each line is classified
//! once into a [`LineTag`] and dispatched; tag lines consume the line
//! entirely, everything else flows into body assembly.

use std::collections::HashMap;
use std::sync::LazyLock;

use regex::Regex;
use tracing::{debug, instrument};

use docpress_markdown::{clean_body_line, clean_list_text, strip_markdown_link, to_kebab_slug};
use docpress_shared::{Cta, ImageTask, PageRecord, ParsingConfig, ServiceBox, ServiceCard};

// ---------------------------------------------------------------------------
// Line classification
// ---------------------------------------------------------------------------

/// Bracketed directive recognized on a line, classified once per line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineTag {
    HeroImage,
    ParaSubheader,
    Promo,
    Cta,
    Plain,
}

/// Classify a lowercased, backslash-stripped line.
pub fn classify_line(line_lower: &str) -> LineTag {
    if line_lower.contains("[hero image]") {
        LineTag::HeroImage
    } else if line_lower.contains("[para_subheader]") {
        LineTag::ParaSubheader
    } else if line_lower.contains("[promo") || line_lower.contains("[hero_promo]") {
        LineTag::Promo
    } else if line_lower.contains("[cta") {
        LineTag::Cta
    } else {
        LineTag::Plain
    }
}

// ---------------------------------------------------------------------------
// Tag value extraction
// ---------------------------------------------------------------------------

static HERO_TAG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\[hero image\].*?(\S.*)").expect("valid regex"));
static SUBHEADER_TAG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\[para_subheader\].*?(\S.*)").expect("valid regex"));
static CTA_TAG_RES: LazyLock<[Regex; 3]> = LazyLock::new(|| {
    [
        Regex::new(r"(?i)\[cta\].*?(\S.*)").expect("valid regex"),
        Regex::new(r"(?i)\[cta_1\].*?(\S.*)").expect("valid regex"),
        Regex::new(r"(?i)\[cta_2\].*?(\S.*)").expect("valid regex"),
    ]
});
static PROMO_TAG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\[.*?promo.*?\]").expect("valid regex"));
static P_TAG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\[p\]").expect("valid regex"));

/// Markdown link whose target is an absolute URL.
static LINKED_URL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[.*?\]\((http[^)]+)\)").expect("valid regex"));
/// Bare absolute URL.
static BARE_URL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(https?://[^\s<>")\]]+)"#).expect("valid regex"));

/// Whatever follows a phone CTA's area/prefix digits.
static PHONE_SHAPE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d{3}[-.\s]?\d{3}").expect("valid regex"));

static HEADING_NO_SPACE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(#+)([^#\s])").expect("valid regex"));
static LIST_LINE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([-*]\s+|\d+\.\s+)").expect("valid regex"));

/// Extract the value following a bracket tag.
///
/// With `extract_url` set, an embedded markdown-link URL wins, then a
/// bare URL, then the link-stripped plain text.
fn extract_tag_value(line: &str, tag_re: &Regex, extract_url: bool) -> Option<String> {
    let unescaped = line.replace('\\', "");
    let caps = tag_re.captures(&unescaped)?;
    let raw_val = caps[1].trim();

    if extract_url {
        if let Some(link) = LINKED_URL_RE.captures(raw_val) {
            return Some(link[1].to_string());
        }
        if let Some(url) = BARE_URL_RE.captures(raw_val) {
            return Some(url[1].to_string());
        }
    }
    Some(strip_markdown_link(raw_val))
}

// ---------------------------------------------------------------------------
// CTA classification
// ---------------------------------------------------------------------------

/// Classify a CTA line's cleaned text into a phone or contact CTA.
pub fn classify_cta(cta_text: &str, phone_number: &str) -> Cta {
    if cta_text.contains(phone_number) {
        return Cta {
            text: "{{ site.phone }}".into(),
            link: "tel:{{ site.phone }}".into(),
            icon: "phone".into(),
            scheme: "accent".into(),
            reverse: false,
        };
    }

    let mut cta = Cta {
        text: cta_text.to_string(),
        link: "{{ site.contact_page }}".into(),
        icon: "mark_email_unread".into(),
        scheme: "primary1".into(),
        reverse: true,
    };
    // A phone-shaped digit run still dials out even when the number
    // differs from the configured default; the display text is kept.
    if PHONE_SHAPE_RE.is_match(cta_text) {
        cta.link = "tel:{{ site.phone }}".into();
        cta.icon = "phone".into();
        cta.scheme = "accent".into();
        cta.reverse = false;
    }
    cta
}

// ---------------------------------------------------------------------------
// Page parsing
// ---------------------------------------------------------------------------

/// Result of parsing one page section.
#[derive(Debug, Clone)]
pub struct ParsedPage {
    /// The structured page record.
    pub record: PageRecord,
    /// The "how can we help" sub-block, if the page had one.
    pub service_box: Option<ServiceBox>,
    /// Rendered front matter + body, ready for `_posts/`.
    pub markdown: String,
}

/// Parse one page's raw text.
///
/// `image_queue` collects hero-image fetch tasks as a side effect; the
/// hyperlink table is read-only and fully built before any page parses.
#[instrument(skip_all, fields(page = page_title))]
pub fn parse_page(
    raw_text: &str,
    page_title: &str,
    config: &ParsingConfig,
    hyperlinks: &HashMap<String, String>,
    image_queue: &mut Vec<ImageTask>,
) -> ParsedPage {
    let clean_title = page_title
        .replace('#', "")
        .replace(" Page", "")
        .trim()
        .to_string();
    let page_slug = to_kebab_slug(&clean_title);

    let mut record = PageRecord {
        title: clean_title,
        hero_image: page_slug.clone(),
        ..Default::default()
    };
    let mut service_box: Option<ServiceBox> = None;
    let mut body_started = false;
    let mut in_service_box = false;

    for line in raw_text.split('\n') {
        let stripped = line.trim();
        if stripped.is_empty() {
            if body_started
                && !in_service_box
                && record.body_lines.last().is_some_and(|l| !l.is_empty())
            {
                record.body_lines.push(String::new());
            }
            continue;
        }
        let line_lower = stripped.to_lowercase().replace('\\', "");

        // Service-box entry: a sub-heading mentioning the marker phrase.
        if line_lower.contains("how can we help") && stripped.contains("##") {
            in_service_box = true;
            service_box = Some(ServiceBox {
                heading: clean_body_line(&stripped.replace("##", "")),
                ..Default::default()
            });
            continue;
        }

        if in_service_box {
            let exits = (stripped.starts_with("# ") || stripped.starts_with("## "))
                && !line_lower.contains("how can we help");
            if exits {
                in_service_box = false;
                // the exiting heading continues through normal handling
            } else {
                if line_lower.contains("[p]") {
                    // normalizer may escape brackets, match against the unescaped text
                    let unescaped = stripped.replace('\\', "");
                    if let Some(sb) = service_box.as_mut() {
                        sb.sub_heading = P_TAG_RE.replace_all(&unescaped, "").trim().to_string();
                    }
                    continue;
                }
                if !stripped.contains('[') {
                    let title = clean_body_line(stripped);
                    let slug = to_kebab_slug(&title);
                    if let Some(sb) = service_box.as_mut() {
                        sb.cards.push(ServiceCard { title, slug });
                    }
                }
                continue;
            }
        }

        if !body_started {
            if stripped.starts_with("##") {
                body_started = true;
            } else {
                let is_h1 = stripped.starts_with("# ");
                let restates_title =
                    clean_list_text(stripped).to_lowercase() == record.title.to_lowercase();
                if is_h1 || restates_title {
                    continue;
                }
            }
        }

        match classify_line(&line_lower) {
            LineTag::HeroImage => {
                if let Some(value) = extract_tag_value(stripped, &HERO_TAG_RE, true) {
                    let url = resolve_image_url(value.trim(), hyperlinks);
                    image_queue.push(ImageTask {
                        url,
                        filename: page_slug.clone(),
                    });
                }
                continue;
            }
            LineTag::ParaSubheader => {
                if let Some(value) = extract_tag_value(stripped, &SUBHEADER_TAG_RE, false) {
                    record.subheader = value.replace("**", "");
                }
                continue;
            }
            LineTag::Promo => {
                let unescaped = stripped.replace('\\', "");
                let promo = PROMO_TAG_RE.replace_all(&unescaped, "");
                record.promos.push(clean_list_text(&promo));
                continue;
            }
            LineTag::Cta => {
                let value = CTA_TAG_RES
                    .iter()
                    .find_map(|re| extract_tag_value(stripped, re, false));
                if let Some(value) = value {
                    let cta_text = value.replace(['{', '}'], "").trim().replace("**", "");
                    record.ctas.push(classify_cta(&cta_text, &config.phone_number));
                }
                continue;
            }
            LineTag::Plain => {}
        }

        if stripped.contains("##") {
            body_started = true;
        }

        push_body_line(&mut record.body_lines, stripped);
    }

    let markdown = render_markdown(&record);
    debug!(
        ctas = record.ctas.len(),
        promos = record.promos.len(),
        body_lines = record.body_lines.len(),
        has_service_box = service_box.is_some(),
        "page parsed"
    );

    ParsedPage {
        record,
        service_box,
        markdown,
    }
}

/// Resolve a hero-image value to a URL via the hyperlink table.
///
/// Exact key match first, then substring match in either direction over
/// sorted keys (sorted for determinism; ambiguous short labels are a
/// documented heuristic). Unresolved values pass through unchanged.
fn resolve_image_url(value: &str, hyperlinks: &HashMap<String, String>) -> String {
    if value.starts_with("http") {
        return value.to_string();
    }
    if let Some(url) = hyperlinks.get(value) {
        return url.clone();
    }
    let mut keys: Vec<&String> = hyperlinks.keys().collect();
    keys.sort();
    for key in keys {
        if key.contains(value) || value.contains(key.as_str()) {
            return hyperlinks[key].clone();
        }
    }
    value.to_string()
}

/// Append one body line with markdown spacing normalization: headings get
/// a space after their markers and a preceding blank line; list runs stay
/// tight; everything else is paragraph-separated. Blank lines never double.
fn push_body_line(body_lines: &mut Vec<String>, stripped: &str) {
    let mut cleaned = clean_body_line(stripped);
    if HEADING_NO_SPACE_RE.is_match(&cleaned) {
        cleaned = HEADING_NO_SPACE_RE.replace(&cleaned, "$1 $2").to_string();
    }

    if cleaned.starts_with('#') && body_lines.last().is_some_and(|l| !l.is_empty()) {
        body_lines.push(String::new());
    }

    let is_list = LIST_LINE_RE.is_match(&cleaned);
    if let Some(prev) = body_lines.last() {
        if !prev.is_empty() {
            let prev_is_list = LIST_LINE_RE.is_match(prev);
            if !(is_list && prev_is_list) && !cleaned.starts_with('#') {
                body_lines.push(String::new());
            }
        }
    }

    body_lines.push(cleaned);
}

// ---------------------------------------------------------------------------
// Rendering
// ---------------------------------------------------------------------------

/// Render the page record into the front-matter template plus body.
///
/// The field set and literal formatting are a compatibility contract
/// with the downstream site generator; do not normalize the whitespace.
pub fn render_markdown(record: &PageRecord) -> String {
    let mut buttons = String::new();
    for cta in &record.ctas {
        buttons.push_str(&format!(
            "        - cta-link: '{}'\n          cta-text: '{}'\n          cta-icon: {}\n          cta-type: button-1\n          cta-color-scheme: {}",
            cta.link, cta.text, cta.icon, cta.scheme
        ));
        if cta.reverse {
            buttons.push_str("\n          cta-reverse: true");
        }
        buttons.push('\n');
    }

    let promos = if record.promos.is_empty() {
        "    # - heading:\n    #   disclaimer: \n    #   link:".to_string()
    } else {
        record
            .promos
            .iter()
            .map(|p| format!("    - heading: {p}\n"))
            .collect()
    };

    let front_matter = format!(
        "---
layout: post-sidebar
title: {title}
title_override:
category: services
body_class:
show_steps_banner:
# top_review_slider:
#     show_slider: true
#     custom_class: \"block lg:hidden\"
# bottom_review_slider:
#     hide_slider: 
#     custom_class: \"hidden lg:block\"

hero:
  variant: split
  image: {hero}
  image_position:
  content:
    - type: 'heading'
    # - type: 'lists'
    #   lists: 
    #     - item: Lorem ipsum
    - type: 'paragraph'
      paragraph: {subheader}
    - type: 'cta'
      buttons:
{buttons}
  promos:
{promos}

hide_promo_carousel:
hide_sidebar_promo: true
hide_sidebar_review: true
hide_sidebar_financing: true
---

",
        title = record.title,
        hero = record.hero_image,
        subheader = record.subheader,
        buttons = buttons.trim_end(),
        promos = promos,
    );

    front_matter + &record.body_lines.join("\n")
}
