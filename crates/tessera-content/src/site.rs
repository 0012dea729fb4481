//! Site collection and the site content artifact.
//!
//! Every immediate subdirectory of the content root is a page; its name is
//! the page key. The collected [`SiteContent`] is written as one JSON file
//! (`{ "<page key>": [<section>, ...] }`) that the run-time renderer loads.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::error::{CollectionError, ParseError};
use crate::page::{Page, PageReport, collect_page};

/// Mapping from page key to page.
///
/// Immutable once built. Keys are kept sorted so the serialized artifact
/// is deterministic.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SiteContent {
    pages: BTreeMap<String, Page>,
}

impl SiteContent {
    /// Look up a page by key.
    #[must_use]
    pub fn page(&self, key: &str) -> Option<&Page> {
        self.pages.get(key)
    }

    /// Page keys in sorted order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.pages.keys().map(String::as_str)
    }

    /// Number of pages.
    #[must_use]
    pub fn len(&self) -> usize {
        self.pages.len()
    }

    /// True if there are no pages.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    /// Serialize to pretty-printed JSON.
    pub fn to_json(&self) -> Result<String, CollectionError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Deserialize from JSON.
    pub fn from_json(json: &str) -> Result<Self, CollectionError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Write the artifact, creating parent directories as needed.
    pub fn write_to(&self, path: &Path) -> Result<(), CollectionError> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).map_err(|e| CollectionError::io(parent, e))?;
        }
        let json = self.to_json()?;
        fs::write(path, json).map_err(|e| CollectionError::io(path, e))
    }

    /// Read an artifact written by [`write_to`](Self::write_to).
    pub fn read_from(path: &Path) -> Result<Self, CollectionError> {
        let json = fs::read_to_string(path).map_err(|e| CollectionError::io(path, e))?;
        Self::from_json(&json)
    }
}

impl FromIterator<(String, Page)> for SiteContent {
    fn from_iter<I: IntoIterator<Item = (String, Page)>>(iter: I) -> Self {
        Self {
            pages: iter.into_iter().collect(),
        }
    }
}

/// Result of a site collection run.
#[derive(Debug, Default)]
pub struct SiteReport {
    /// Collected content.
    pub content: SiteContent,
    /// Content files that were skipped, across all pages.
    pub skipped_files: Vec<ParseError>,
    /// Pages whose directory could not be read (kept as empty pages).
    pub failed_pages: Vec<String>,
}

/// Collects every page under a content root.
pub struct SiteCollector {
    root: PathBuf,
}

impl SiteCollector {
    /// Create a collector for the given content root.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Content root directory.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Collect all pages.
    ///
    /// Pages are collected in parallel. A page that fails to collect is
    /// logged and kept as an empty page; a skipped file only degrades its
    /// own page.
    ///
    /// # Errors
    ///
    /// Returns [`CollectionError`] if the content root is missing, is not a
    /// directory, or cannot be listed.
    pub fn collect(&self) -> Result<SiteReport, CollectionError> {
        if !self.root.exists() {
            return Err(CollectionError::RootNotFound(self.root.clone()));
        }
        if !self.root.is_dir() {
            return Err(CollectionError::NotADirectory(self.root.clone()));
        }

        let mut page_dirs = self.page_dirs()?;
        page_dirs.sort_by(|a, b| a.0.cmp(&b.0));

        let results: Vec<(String, Result<PageReport, CollectionError>)> = page_dirs
            .into_par_iter()
            .map(|(key, path)| {
                let result = collect_page(&path);
                (key, result)
            })
            .collect();

        let mut report = SiteReport::default();
        let mut pages = BTreeMap::new();
        for (key, result) in results {
            match result {
                Ok(page_report) => {
                    tracing::info!(
                        page = %key,
                        sections = page_report.page.len(),
                        skipped = page_report.errors.len(),
                        "Processed page"
                    );
                    report.skipped_files.extend(page_report.errors);
                    pages.insert(key, page_report.page);
                }
                Err(error) => {
                    tracing::warn!(page = %key, error = %error, "Failed to collect page");
                    report.failed_pages.push(key.clone());
                    pages.insert(key, Page::default());
                }
            }
        }

        report.content = SiteContent { pages };
        Ok(report)
    }

    /// List non-hidden immediate subdirectories as `(page key, path)`.
    fn page_dirs(&self) -> Result<Vec<(String, PathBuf)>, CollectionError> {
        let entries = fs::read_dir(&self.root).map_err(|e| CollectionError::io(&self.root, e))?;

        let mut dirs = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| CollectionError::io(&self.root, e))?;
            let path = entry.path();
            if !path.is_dir() {
                continue;
            }
            let Some(name) = entry.file_name().to_str().map(str::to_owned) else {
                tracing::warn!(path = %path.display(), "Skipping page directory with non UTF-8 name");
                continue;
            };
            if name.starts_with('.') {
                continue;
            }
            dirs.push((name, path));
        }
        Ok(dirs)
    }
}
