//! Page collection.
//!
//! A page is a directory of content files. Each file is parsed on its
//! own, so one broken file never keeps the rest of the page from being
//! built.

use std::fs;
use std::path::{Path, PathBuf};

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::error::{CollectionError, ParseError};
use crate::parser::parse_section;
use crate::section::Section;

/// Ordered sequence of sections making up one page.
///
/// Serializes as a plain JSON array.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Page {
    sections: Vec<Section>,
}

impl Page {
    /// Build a page, sorting sections by their numeric id.
    ///
    /// Sections are ordered by `(major, minor)`. Equal ids keep their
    /// input order, and sections whose id does not parse go last (also in
    /// input order).
    #[must_use]
    pub fn from_sections(mut sections: Vec<Section>) -> Self {
        sections.sort_by_key(|section| {
            let id = section.section_id();
            (id.is_none(), id)
        });
        Self { sections }
    }

    /// Sections in render order.
    #[must_use]
    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    /// Number of sections.
    #[must_use]
    pub fn len(&self) -> usize {
        self.sections.len()
    }

    /// True if the page has no sections.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }
}

/// Result of collecting one page: the page plus per-file errors.
#[derive(Debug, Default)]
pub struct PageReport {
    /// Sections that parsed, in order.
    pub page: Page,
    /// Files that were skipped.
    pub errors: Vec<ParseError>,
}

/// Collect all `.md` files of a page directory into a [`Page`].
///
/// Hidden files and subdirectories are ignored. Files are discovered in
/// file name order and parsed in parallel on the rayon pool.
///
/// # Errors
///
/// Returns [`CollectionError::Io`] if the directory cannot be listed.
/// Errors in individual files are reported in [`PageReport::errors`].
pub fn collect_page(dir: &Path) -> Result<PageReport, CollectionError> {
    let entries = fs::read_dir(dir).map_err(|e| CollectionError::io(dir, e))?;

    let mut files: Vec<(String, PathBuf)> = entries
        .filter_map(Result::ok)
        .filter_map(|entry| {
            let name = entry.file_name().to_str()?.to_owned();
            let path = entry.path();
            let is_content =
                !name.starts_with('.') && name.ends_with(".md") && path.is_file();
            is_content.then_some((name, path))
        })
        .collect();
    files.sort_by(|a, b| a.0.cmp(&b.0));

    let results: Vec<Result<Section, ParseError>> = files
        .par_iter()
        .map(|(name, path)| read_section(name, path))
        .collect();

    let mut sections = Vec::with_capacity(results.len());
    let mut errors = Vec::new();
    for result in results {
        match result {
            Ok(section) => sections.push(section),
            Err(error) => {
                tracing::warn!(page = %dir.display(), error = %error, "Skipping content file");
                errors.push(error);
            }
        }
    }

    for section in &sections {
        if section.section_id().is_none() {
            tracing::warn!(
                page = %dir.display(),
                id = %section.id,
                component = %section.component,
                "Section id is not numeric, sorting it last"
            );
        }
    }

    Ok(PageReport {
        page: Page::from_sections(sections),
        errors,
    })
}

fn read_section(name: &str, path: &Path) -> Result<Section, ParseError> {
    let source = fs::read_to_string(path).map_err(|source| ParseError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    parse_section(name, &source)
}
