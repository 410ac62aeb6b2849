//! Shared types, error model, and configuration for docpress.
//!
//! This crate is the foundation depended on by all other docpress crates.
//! It provides:
//! - [`DocpressError`] — the unified error type
//! - Domain types ([`PageRecord`], [`NavNode`], [`ReviewRecord`], [`ImageTask`])
//! - Configuration ([`AppConfig`], config loading)

pub mod config;
pub mod error;
pub mod types;

// Re-export public API at crate root for ergonomic imports.
pub use config::{
    AppConfig, ImageFetchConfig, OutputConfig, ParsingConfig, config_dir, config_file_path,
    init_config, load_config, load_config_from, validate_config,
};
pub use error::{DocpressError, Result};
pub use types::{
    Cta, ImageTask, NavNode, PageRecord, PageSection, ReviewRecord, ReviewsFile, Sections,
    ServiceBox, ServiceCard, ServiceCardData, ServicesData, ServicesFile,
};
