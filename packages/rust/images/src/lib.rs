//! Hero-image fetcher: download queued image URLs and transcode them to
//! WebP.
//!
//! Failures here never fail a conversion. Every outcome other than a
//! converted image carries a human-readable reason that ends up in the
//! per-image log.

use std::sync::LazyLock;
use std::time::Duration;

use image::DynamicImage;
use regex::Regex;
use reqwest::Client;
use tracing::{debug, instrument, warn};

use docpress_shared::{DocpressError, ImageFetchConfig, Result};

/// First absolute URL embedded anywhere in the raw value.
static URL_IN_TEXT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(https?://[^\s<>")\]]+)"#).expect("valid regex"));
/// Google Drive file id inside a viewer link.
static DRIVE_FILE_ID_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"/d/([a-zA-Z0-9-_]+)").expect("valid regex"));

// ---------------------------------------------------------------------------
// URL preparation
// ---------------------------------------------------------------------------

/// Pull the first absolute URL out of a raw hero-image value.
pub fn clean_image_url(raw: &str) -> Option<String> {
    URL_IN_TEXT_RE
        .captures(raw)
        .map(|caps| caps[1].to_string())
}

/// Video links are never fetched.
pub fn is_video_link(url: &str) -> bool {
    url.contains("youtube.com") || url.contains("youtu.be")
}

/// Rewrite a Google Drive viewer link to its direct-download form.
pub fn rewrite_drive_url(url: &str) -> String {
    if url.contains("drive.google.com") && url.contains("/view") {
        if let Some(caps) = DRIVE_FILE_ID_RE.captures(url) {
            return format!(
                "https://drive.google.com/uc?export=download&id={}",
                &caps[1]
            );
        }
    }
    url.to_string()
}

// ---------------------------------------------------------------------------
// Fetching
// ---------------------------------------------------------------------------

/// Outcome of fetching one queued image.
#[derive(Debug, Clone)]
pub enum ImageOutcome {
    /// WebP-encoded image bytes, ready for `img/`.
    Converted(Vec<u8>),
    /// The URL was intentionally not fetched (reason).
    Skipped(String),
    /// The fetch or transcode did not produce an image (reason).
    Failed(String),
}

impl ImageOutcome {
    /// Short label for the per-image log.
    pub fn label(&self) -> &str {
        match self {
            ImageOutcome::Converted(_) => "converted",
            ImageOutcome::Skipped(_) => "skipped",
            ImageOutcome::Failed(_) => "failed",
        }
    }
}

/// HTTP image fetcher with a fixed User-Agent fallback chain.
pub struct ImageFetcher {
    client: Client,
    config: ImageFetchConfig,
}

impl ImageFetcher {
    /// Build the fetcher. The User-Agent is set per attempt, not on the
    /// client, so the fallback chain can vary it.
    pub fn new(config: ImageFetchConfig) -> Result<Self> {
        let client = Client::builder()
            .redirect(reqwest::redirect::Policy::limited(5))
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| DocpressError::Network(format!("failed to build HTTP client: {e}")))?;

        Ok(Self { client, config })
    }

    /// Fetch one image URL and transcode it to WebP.
    ///
    /// Attempts run through the configured User-Agent list in order. A
    /// 403 moves to the next agent; any other non-200 fails immediately.
    /// HTML responses are skipped, the target is a webpage behind a
    /// share link rather than an image file.
    #[instrument(skip_all, fields(url = raw_url))]
    pub async fn fetch(&self, raw_url: &str) -> ImageOutcome {
        let Some(url) = clean_image_url(raw_url) else {
            return ImageOutcome::Skipped(format!("invalid URL format: {raw_url}"));
        };
        if is_video_link(&url) {
            return ImageOutcome::Skipped("video link".to_string());
        }
        let url = rewrite_drive_url(&url);

        let last = self.config.user_agents.len().saturating_sub(1);
        for (i, agent) in self.config.user_agents.iter().enumerate() {
            let response = match self
                .client
                .get(&url)
                .header(reqwest::header::USER_AGENT, agent)
                .send()
                .await
            {
                Ok(response) => response,
                Err(e) => {
                    warn!(attempt = i, error = %e, "image request failed");
                    if i == last {
                        return ImageOutcome::Failed(e.to_string());
                    }
                    continue;
                }
            };

            let status = response.status();
            if status == reqwest::StatusCode::FORBIDDEN && i < last {
                debug!(attempt = i, "403, retrying with next user agent");
                continue;
            }
            if status != reqwest::StatusCode::OK {
                return ImageOutcome::Failed(format!("HTTP {}", status.as_u16()));
            }

            let content_type = response
                .headers()
                .get(reqwest::header::CONTENT_TYPE)
                .and_then(|v| v.to_str().ok())
                .unwrap_or("")
                .to_lowercase();
            if content_type.contains("text/html") {
                return ImageOutcome::Skipped("target is a webpage, not an image".to_string());
            }

            let bytes = match response.bytes().await {
                Ok(bytes) => bytes,
                Err(e) => {
                    if i == last {
                        return ImageOutcome::Failed(e.to_string());
                    }
                    continue;
                }
            };

            return self.transcode(&bytes);
        }

        ImageOutcome::Failed("no user agents configured".to_string())
    }

    fn transcode(&self, bytes: &[u8]) -> ImageOutcome {
        let img = match image::load_from_memory(bytes) {
            Ok(img) => img,
            Err(_) => return ImageOutcome::Failed("not an image file".to_string()),
        };
        // the webp encoder only takes 8-bit RGB(A) buffers
        let img = match img {
            DynamicImage::ImageRgb8(_) | DynamicImage::ImageRgba8(_) => img,
            other => DynamicImage::ImageRgba8(other.to_rgba8()),
        };
        match webp::Encoder::from_image(&img) {
            Ok(encoder) => {
                let encoded = encoder.encode(self.config.webp_quality);
                ImageOutcome::Converted(encoded.to_vec())
            }
            Err(e) => ImageOutcome::Failed(format!("webp encode failed: {e}")),
        }
    }
}
