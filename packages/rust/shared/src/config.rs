//! Application configuration for docpress.
//!
//! User config lives at `~/.docpress/docpress.toml`.
//! CLI flags override config file values, which override defaults.
//!
//! Every heuristic constant of the parsing pipeline is adjustable here:
//! the excluded-keyword list, the section markers, the fixed publish
//! date, the default phone number, the dropdown chunk size, and the
//! user-agent fallback list for image fetches.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{DocpressError, Result};

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "docpress.toml";

/// Default config directory name under the user's home.
const CONFIG_DIR_NAME: &str = ".docpress";

// ---------------------------------------------------------------------------
// Config structs (matching docpress.toml schema)
// ---------------------------------------------------------------------------

/// Top-level application config, deserialized from TOML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Parsing heuristics.
    #[serde(default)]
    pub parsing: ParsingConfig,

    /// Output/bundle settings.
    #[serde(default)]
    pub output: OutputConfig,

    /// Image fetch settings.
    #[serde(default)]
    pub images: ImageFetchConfig,
}

/// `[parsing]` section — segmentation and page-parsing heuristics.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParsingConfig {
    /// Case-insensitive substrings that exclude a section title from output.
    #[serde(default = "default_excluded_keywords")]
    pub excluded_keywords: Vec<String>,

    /// Heading phrase that opens the navigation block.
    #[serde(default = "default_nav_marker")]
    pub nav_marker: String,

    /// Boilerplate marker; lines before its first occurrence are discarded
    /// and each later occurrence resets segmentation.
    #[serde(default = "default_start_marker")]
    pub start_marker: String,

    /// Phone number that classifies a CTA line as a phone CTA.
    #[serde(default = "default_phone_number")]
    pub phone_number: String,
}

impl Default for ParsingConfig {
    fn default() -> Self {
        Self {
            excluded_keywords: default_excluded_keywords(),
            nav_marker: default_nav_marker(),
            start_marker: default_start_marker(),
            phone_number: default_phone_number(),
        }
    }
}

fn default_excluded_keywords() -> Vec<String> {
    [
        "00_ignore",
        "mockup pages required",
        "global sections",
        "inside page components",
        "optional specialty pages",
        "header",
        "footer",
        "badges",
        "navigation",
        "inside form",
        "financing box",
        "contact info",
        "variables",
        "meta description",
        "contact us today",
        "homepage",
        "promotions",
        "contact",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}

fn default_nav_marker() -> String {
    "Navigation (All Pages)".into()
}

fn default_start_marker() -> String {
    "Footer (All Pages)".into()
}

fn default_phone_number() -> String {
    "555-555-5555".into()
}

/// `[output]` section — bundle emission settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Fixed publish date used in `_posts/` file names (YYYY-MM-DD).
    #[serde(default = "default_publish_date")]
    pub publish_date: String,

    /// Maximum children per navigation dropdown column.
    #[serde(default = "default_dropdown_chunk_size")]
    pub dropdown_chunk_size: usize,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            publish_date: default_publish_date(),
            dropdown_chunk_size: default_dropdown_chunk_size(),
        }
    }
}

fn default_publish_date() -> String {
    "2001-01-01".into()
}

fn default_dropdown_chunk_size() -> usize {
    8
}

/// `[images]` section — image fetch/transcode settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageFetchConfig {
    /// Ordered user-agent fallback list; a 403 moves to the next entry.
    #[serde(default = "default_user_agents")]
    pub user_agents: Vec<String>,

    /// Per-request timeout in seconds.
    #[serde(default = "default_fetch_timeout")]
    pub timeout_secs: u64,

    /// WEBP encoding quality (0-100).
    #[serde(default = "default_webp_quality")]
    pub webp_quality: f32,
}

impl Default for ImageFetchConfig {
    fn default() -> Self {
        Self {
            user_agents: default_user_agents(),
            timeout_secs: default_fetch_timeout(),
            webp_quality: default_webp_quality(),
        }
    }
}

fn default_user_agents() -> Vec<String> {
    vec![
        "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) \
         Chrome/91.0.4472.124 Safari/537.36"
            .into(),
        "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) \
         Chrome/92.0.4515.107 Safari/537.36"
            .into(),
    ]
}

fn default_fetch_timeout() -> u64 {
    20
}

fn default_webp_quality() -> f32 {
    80.0
}

// ---------------------------------------------------------------------------
// Config loading
// ---------------------------------------------------------------------------

/// Get the path to the config directory (`~/.docpress/`).
pub fn config_dir() -> Result<PathBuf> {
    let home = dirs::home_dir()
        .ok_or_else(|| DocpressError::config("could not determine home directory"))?;
    Ok(home.join(CONFIG_DIR_NAME))
}

/// Get the path to the config file (`~/.docpress/docpress.toml`).
pub fn config_file_path() -> Result<PathBuf> {
    Ok(config_dir()?.join(CONFIG_FILE_NAME))
}

/// Load the application config from disk. Returns defaults if the file does not exist.
pub fn load_config() -> Result<AppConfig> {
    let path = config_file_path()?;

    if !path.exists() {
        tracing::debug!(?path, "config file not found, using defaults");
        return Ok(AppConfig::default());
    }

    load_config_from(&path)
}

/// Load the application config from a specific file path.
pub fn load_config_from(path: &Path) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path).map_err(|e| DocpressError::io(path, e))?;

    let config: AppConfig = toml::from_str(&content)
        .map_err(|e| DocpressError::config(format!("failed to parse {}: {e}", path.display())))?;

    validate_config(&config)?;
    Ok(config)
}

/// Create the config directory and write a default config file.
/// Returns the path to the created file.
pub fn init_config() -> Result<PathBuf> {
    let dir = config_dir()?;
    std::fs::create_dir_all(&dir).map_err(|e| DocpressError::io(&dir, e))?;

    let path = dir.join(CONFIG_FILE_NAME);
    let config = AppConfig::default();
    let content =
        toml::to_string_pretty(&config).map_err(|e| DocpressError::config(e.to_string()))?;

    std::fs::write(&path, content).map_err(|e| DocpressError::io(&path, e))?;
    tracing::info!(?path, "created default config file");

    Ok(path)
}

/// Check invariants the pipeline relies on.
pub fn validate_config(config: &AppConfig) -> Result<()> {
    if config.output.publish_date.parse::<chrono::NaiveDate>().is_err() {
        return Err(DocpressError::config(format!(
            "publish_date '{}' is not a valid YYYY-MM-DD date",
            config.output.publish_date
        )));
    }
    if config.output.dropdown_chunk_size == 0 {
        return Err(DocpressError::config("dropdown_chunk_size must be >= 1"));
    }
    if config.images.user_agents.is_empty() {
        return Err(DocpressError::config("user_agents must not be empty"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_serializes() {
        let config = AppConfig::default();
        let toml_str = toml::to_string_pretty(&config).expect("serialize default config");
        assert!(toml_str.contains("excluded_keywords"));
        assert!(toml_str.contains("555-555-5555"));
    }

    #[test]
    fn config_roundtrip() {
        let config = AppConfig::default();
        let toml_str = toml::to_string_pretty(&config).expect("serialize");
        let parsed: AppConfig = toml::from_str(&toml_str).expect("deserialize");
        assert_eq!(parsed.output.publish_date, "2001-01-01");
        assert_eq!(parsed.output.dropdown_chunk_size, 8);
        assert_eq!(parsed.images.user_agents.len(), 2);
    }

    #[test]
    fn partial_config_falls_back_to_defaults() {
        let toml_str = r#"
[parsing]
phone_number = "999-999-9999"
"#;
        let config: AppConfig = toml::from_str(toml_str).expect("parse");
        assert_eq!(config.parsing.phone_number, "999-999-9999");
        assert_eq!(config.parsing.start_marker, "Footer (All Pages)");
        assert!(config.parsing.excluded_keywords.contains(&"header".to_string()));
    }

    #[test]
    fn validate_rejects_bad_date() {
        let mut config = AppConfig::default();
        config.output.publish_date = "not-a-date".into();
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn validate_rejects_empty_user_agents() {
        let mut config = AppConfig::default();
        config.images.user_agents.clear();
        assert!(validate_config(&config).is_err());
    }
}
