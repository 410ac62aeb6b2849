//! End-to-end `convert` pipeline: .docx → segment → parse → fetch images
//! → write bundle.

use std::path::PathBuf;
use std::time::Instant;

use tracing::{info, instrument, warn};

use docpress_docx::{build_hyperlink_table, render_html, DocxDocument};
use docpress_images::{ImageFetcher, ImageOutcome};
use docpress_markdown::{should_skip_page, to_kebab_slug, to_markdown_lines};
use docpress_parser::{build_nav_tree, parse_page, parse_reviews, render_nav_yaml, segment};
use docpress_shared::{AppConfig, DocpressError, ImageTask, Result, ReviewsFile, ServicesFile};

use crate::assembler::Bundle;

/// Configuration for one document conversion.
#[derive(Debug, Clone)]
pub struct ConvertConfig {
    /// Source .docx path.
    pub input: PathBuf,
    /// Directory the bundle is written into.
    pub output_dir: PathBuf,
    /// Application settings (parsing heuristics, output, image fetch).
    pub app: AppConfig,
}

/// Per-image fetch record for the conversion report.
#[derive(Debug, Clone)]
pub struct ImageLogEntry {
    /// Target file stem, without extension.
    pub filename: String,
    /// Whether a `.webp` was written.
    pub written: bool,
    /// Skip/failure reason when nothing was written.
    pub detail: Option<String>,
}

/// Result of a completed conversion.
#[derive(Debug)]
pub struct ConvertResult {
    /// Bundle root directory.
    pub bundle_path: PathBuf,
    /// Number of page markdown files written.
    pub pages_written: usize,
    /// Number of page sections dropped by the skip filter.
    pub pages_skipped: usize,
    /// Number of parsed reviews, if a reviews section was found.
    pub reviews: usize,
    /// Whether a navigation export was written.
    pub has_navigation: bool,
    /// Whether a services data file was written.
    pub has_services: bool,
    /// Per-image outcomes, in queue order.
    pub image_log: Vec<ImageLogEntry>,
    /// Total elapsed time.
    pub elapsed: std::time::Duration,
}

/// Progress callback for reporting pipeline status.
pub trait ProgressReporter: Send + Sync {
    /// Called when entering a new phase.
    fn phase(&self, name: &str);
    /// Called after a page section is parsed and added to the bundle.
    fn page_parsed(&self, name: &str, current: usize, total: usize);
    /// Called after each queued image resolves.
    fn image_processed(&self, filename: &str, current: usize, total: usize);
    /// Called when the pipeline completes.
    fn done(&self, result: &ConvertResult);
}

/// No-op progress reporter for headless/test usage.
pub struct SilentProgress;

impl ProgressReporter for SilentProgress {
    fn phase(&self, _name: &str) {}
    fn page_parsed(&self, _name: &str, _current: usize, _total: usize) {}
    fn image_processed(&self, _filename: &str, _current: usize, _total: usize) {}
    fn done(&self, _result: &ConvertResult) {}
}

/// Run the full conversion.
///
/// 1. Open the document and build the hyperlink table
/// 2. Render to the HTML intermediate, normalize to Markdown lines
/// 3. Segment into navigation + page sections
/// 4. Parse pages, reviews, services; render data files
/// 5. Fetch and transcode queued hero images, one at a time
/// 6. Write the bundle directory
///
/// Only an unreadable document or a filesystem error fails the run;
/// malformed content degrades to partial output.
#[instrument(skip_all, fields(input = %config.input.display()))]
pub async fn convert_document(
    config: &ConvertConfig,
    progress: &dyn ProgressReporter,
) -> Result<ConvertResult> {
    let start = Instant::now();

    progress.phase("Reading document");
    let doc = DocxDocument::open(&config.input)?;
    let hyperlinks = build_hyperlink_table(&doc);

    progress.phase("Normalizing markup");
    let html = render_html(&doc);
    let lines = to_markdown_lines(&html)?;

    progress.phase("Segmenting sections");
    let sections = segment(&lines, &config.app.parsing);
    info!(
        pages = sections.pages.len(),
        has_nav = sections.navigation.is_some(),
        "document segmented"
    );

    progress.phase("Parsing pages");
    let mut bundle = Bundle::new();
    let mut image_queue: Vec<ImageTask> = Vec::new();
    let mut pages_written = 0;
    let mut pages_skipped = 0;
    let mut reviews = 0;
    let mut has_services = false;

    if let Some(nav_lines) = &sections.navigation {
        let tree = build_nav_tree(nav_lines);
        let yaml = render_nav_yaml(&tree, config.app.output.dropdown_chunk_size);
        bundle.add_text("_data/navigation.yml", yaml);
    }

    let total = sections.pages.len();
    for (i, section) in sections.pages.iter().enumerate() {
        if should_skip_page(&section.name, &section.content, &config.app.parsing.excluded_keywords)
        {
            pages_skipped += 1;
            continue;
        }

        if section.name.to_lowercase().contains("customer reviews") {
            let records = parse_reviews(&section.content);
            reviews = records.len();
            let yaml = serde_yaml::to_string(&ReviewsFile { reviews: records })
                .map_err(|e| DocpressError::Serialize(e.to_string()))?;
            bundle.add_text("_data/reviews.yml", yaml);
            continue;
        }

        let parsed = parse_page(
            &section.content,
            &section.name,
            &config.app.parsing,
            &hyperlinks,
            &mut image_queue,
        );

        if let Some(service_box) = &parsed.service_box {
            let yaml = serde_yaml::to_string(&ServicesFile::from_box(service_box))
                .map_err(|e| DocpressError::Serialize(e.to_string()))?;
            bundle.add_text("_data/services.yml", yaml);
            has_services = true;
        }

        let slug = to_kebab_slug(&section.name.to_lowercase().replace(" page", ""));
        let post_path = format!("_posts/{}-{}.md", config.app.output.publish_date, slug);
        bundle.add_text(post_path, parsed.markdown);
        pages_written += 1;
        progress.page_parsed(&section.name, i + 1, total);
    }

    progress.phase("Fetching images");
    let image_log = fetch_images(config, &image_queue, &mut bundle, progress).await?;

    progress.phase("Writing bundle");
    let bundle_path = bundle.write_to(&config.output_dir)?;

    let result = ConvertResult {
        bundle_path,
        pages_written,
        pages_skipped,
        reviews,
        has_navigation: sections.navigation.is_some(),
        has_services,
        image_log,
        elapsed: start.elapsed(),
    };

    info!(
        pages_written = result.pages_written,
        pages_skipped = result.pages_skipped,
        reviews = result.reviews,
        images = result.image_log.len(),
        elapsed_ms = result.elapsed.as_millis(),
        "conversion complete"
    );
    progress.done(&result);

    Ok(result)
}

/// Fetch queued images strictly in order, adding written files to the
/// bundle. Skips and failures are logged, never fatal.
async fn fetch_images(
    config: &ConvertConfig,
    queue: &[ImageTask],
    bundle: &mut Bundle,
    progress: &dyn ProgressReporter,
) -> Result<Vec<ImageLogEntry>> {
    let mut log = Vec::with_capacity(queue.len());
    if queue.is_empty() {
        return Ok(log);
    }

    let fetcher = ImageFetcher::new(config.app.images.clone())?;
    let total = queue.len();

    for (i, task) in queue.iter().enumerate() {
        let outcome = fetcher.fetch(&task.url).await;
        match outcome {
            ImageOutcome::Converted(bytes) => {
                bundle.add_binary(format!("img/{}.webp", task.filename), bytes);
                log.push(ImageLogEntry {
                    filename: task.filename.clone(),
                    written: true,
                    detail: None,
                });
            }
            ImageOutcome::Skipped(reason) | ImageOutcome::Failed(reason) => {
                warn!(filename = %task.filename, %reason, "image not written");
                log.push(ImageLogEntry {
                    filename: task.filename.clone(),
                    written: false,
                    detail: Some(reason),
                });
            }
        }
        progress.image_processed(&task.filename, i + 1, total);
    }

    Ok(log)
}
