//! Content-bundle assembler.
//!
//! Collects the pipeline's outputs as relative-path entries and writes
//! them under the output directory in one pass:
//!
//! ```text
//! <output_dir>/
//! ├── _posts/2001-01-01-home.md
//! ├── _data/
//! │   ├── navigation.yml
//! │   ├── reviews.yml
//! │   └── services.yml
//! └── img/home.webp
//! ```

use std::path::{Path, PathBuf};

use tracing::{debug, info, instrument};

use docpress_shared::{DocpressError, Result};

/// One file of the bundle, keyed by its bundle-relative path.
#[derive(Debug, Clone)]
pub struct BundleFile {
    /// Relative path inside the bundle, `/`-separated.
    pub path: String,
    /// File content.
    pub content: Vec<u8>,
}

/// An in-memory content bundle.
///
/// Adding a path that already exists replaces the earlier entry, so
/// repeated data-file emissions resolve to the last writer.
#[derive(Debug, Default)]
pub struct Bundle {
    files: Vec<BundleFile>,
}

impl Bundle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add (or replace) a text file.
    pub fn add_text(&mut self, path: impl Into<String>, content: impl Into<String>) {
        self.add_binary(path, content.into().into_bytes());
    }

    /// Add (or replace) a binary file.
    pub fn add_binary(&mut self, path: impl Into<String>, content: Vec<u8>) {
        let path = path.into();
        if let Some(existing) = self.files.iter_mut().find(|f| f.path == path) {
            existing.content = content;
        } else {
            self.files.push(BundleFile { path, content });
        }
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn files(&self) -> &[BundleFile] {
        &self.files
    }

    /// Look up a file's content by its relative path.
    pub fn get(&self, path: &str) -> Option<&[u8]> {
        self.files
            .iter()
            .find(|f| f.path == path)
            .map(|f| f.content.as_slice())
    }

    /// Write every file under `output_dir`, creating directories as
    /// needed. Returns the bundle root.
    #[instrument(skip_all, fields(files = self.files.len(), dir = %output_dir.display()))]
    pub fn write_to(&self, output_dir: &Path) -> Result<PathBuf> {
        for file in &self.files {
            let target = output_dir.join(&file.path);
            if let Some(parent) = target.parent() {
                std::fs::create_dir_all(parent).map_err(|e| DocpressError::io(parent, e))?;
            }
            std::fs::write(&target, &file.content)
                .map_err(|e| DocpressError::io(&target, e))?;
            debug!(path = %file.path, bytes = file.content.len(), "wrote bundle file");
        }

        info!(files = self.files.len(), "bundle written");
        Ok(output_dir.to_path_buf())
    }
}
