//! Navigation tree builder: captured navigation lines → a parent/child
//! tree and the rendered `_data/navigation.yml` payload.

use std::sync::LazyLock;

use regex::Regex;
use tracing::{debug, instrument};

use docpress_markdown::{clean_list_text, to_kebab_slug};
use docpress_shared::NavNode;

static CHILD_LINE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*[-*]\s+").expect("valid regex"));

/// Flatten the captured navigation block into cleaned labels, parents and
/// children alike. The marker line itself and editor notes are dropped.
pub fn extract_nav_items(lines: &[String]) -> Vec<String> {
    lines
        .iter()
        .map(|line| clean_list_text(line))
        .filter(|clean| {
            !clean.is_empty() && !clean.contains("Navigation (") && !clean.contains("Dev Note")
        })
        .collect()
}

/// Build the navigation tree from the captured block.
///
/// A list-marked line is a child of the most recent unmarked line; child
/// lines before any parent are discarded. Duplicate parent labels fold
/// into the first occurrence.
pub fn build_nav_tree(lines: &[String]) -> Vec<NavNode> {
    let mut nodes: Vec<NavNode> = Vec::new();
    let mut current: Option<usize> = None;

    for line in lines {
        let stripped = line.trim();
        if stripped.is_empty() || stripped.contains("Dev Note") {
            continue;
        }
        let is_child = CHILD_LINE_RE.is_match(stripped);
        let clean = clean_list_text(stripped);
        if clean.is_empty() {
            continue;
        }

        if is_child {
            if let Some(idx) = current {
                nodes[idx].children.push(clean);
            }
        } else if let Some(idx) = nodes.iter().position(|n| n.label == clean) {
            current = Some(idx);
        } else {
            nodes.push(NavNode {
                label: clean,
                children: Vec::new(),
            });
            current = Some(nodes.len() - 1);
        }
    }

    nodes
}

/// Render the tree as the `_data/navigation.yml` payload.
///
/// Link targets are derived from the parent: "Promotions" children go to
/// `/promotions/`, "About Us" children to `/{slug}/`, everything else to
/// `/services/{slug}/`. Parents containing "contact" link to
/// `/contact-us/`, all other parents to `#`. Children are split into
/// dropdown columns of `chunk_size`.
#[instrument(skip_all, fields(parents = nodes.len()))]
pub fn render_nav_yaml(nodes: &[NavNode], chunk_size: usize) -> String {
    let mut out = String::new();

    for node in nodes {
        let parent_slug = to_kebab_slug(&node.label);
        let parent_href = if parent_slug.contains("contact") {
            "/contact-us/"
        } else {
            "#"
        };
        out.push_str(&format!("- text: {}\n  href: \"{}\"\n", node.label, parent_href));

        if node.children.is_empty() {
            out.push('\n');
            continue;
        }

        out.push_str("  dropdown:\n");
        for chunk in node.children.chunks(chunk_size.max(1)) {
            out.push_str("    - title:\n      links:\n");
            for child in chunk {
                let slug = to_kebab_slug(child);
                let href = if node.label == "Promotions" {
                    "/promotions/".to_string()
                } else if node.label == "About Us" {
                    format!("/{slug}/")
                } else {
                    format!("/services/{slug}/")
                };
                out.push_str(&format!("        - text: {child}\n          href: {href}\n"));
            }
        }
        out.push('\n');
    }

    debug!(bytes = out.len(), "navigation yaml rendered");
    out
}
