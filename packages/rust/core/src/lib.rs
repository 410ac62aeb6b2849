//! Core pipeline orchestration for docpress.
//!
//! Ties together document reading, markup normalization, section
//! parsing, image fetching, and bundle assembly into the end-to-end
//! `convert` workflow.

pub mod assembler;
pub mod pipeline;

pub use assembler::{Bundle, BundleFile};
pub use pipeline::{
    convert_document, ConvertConfig, ConvertResult, ImageLogEntry, ProgressReporter,
    SilentProgress,
};
