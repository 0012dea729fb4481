//! YAML front matter handling.
//!
//! Content files may start with a metadata block:
//!
//! ```text
//! ---
//! component: Hero
//! props:
//!   title: Welcome
//! ---
//! Body markdown...
//! ```

use serde::Deserialize;

use crate::section::Props;

/// Fields read from a content file's front matter.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct FrontMatter {
    pub component: Option<String>,
    #[serde(default)]
    pub props: Option<Props>,
}

/// Split a source into its front matter block (if any) and body.
///
/// The block must open on the first line with `---` and close with a
/// `---` (or `...`) line. A leading BOM and CRLF line endings are
/// accepted. A source without an opening delimiter is all body.
///
/// # Errors
///
/// Returns a message if the block is opened but never closed.
pub(crate) fn split_front_matter(source: &str) -> Result<(Option<&str>, &str), String> {
    let source = source.strip_prefix('\u{feff}').unwrap_or(source);

    let mut lines = source.split_inclusive('\n');
    let Some(first) = lines.next() else {
        return Ok((None, source));
    };
    if first.trim_end() != "---" {
        return Ok((None, source));
    }

    let mut offset = first.len();
    for line in lines {
        let trimmed = line.trim_end();
        if trimmed == "---" || trimmed == "..." {
            let yaml = &source[first.len()..offset];
            let body = &source[offset + line.len()..];
            return Ok((Some(yaml), body));
        }
        offset += line.len();
    }

    Err("unterminated front matter block".to_owned())
}

/// Parse front matter YAML.
///
/// Empty content yields a default (empty) instance.
///
/// # Errors
///
/// Returns the YAML error message if the content is malformed or has the
/// wrong shape (e.g., `props` is not a mapping).
pub(crate) fn parse_front_matter(yaml: &str) -> Result<FrontMatter, String> {
    let trimmed = yaml.trim();
    if trimmed.is_empty() {
        return Ok(FrontMatter::default());
    }

    serde_yaml::from_str(trimmed).map_err(|e| format!("Invalid YAML: {e}"))
}
