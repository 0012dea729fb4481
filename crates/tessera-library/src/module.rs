//! Module sources and export normalization.
//!
//! A [`ModuleSource`] is the only seam to the outside world: it produces the
//! raw module value and knows nothing about components.

use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use serde_json::{Map, Value};
use ureq::Agent;

use crate::error::LibraryLoadError;

/// Produces the raw component module.
///
/// `fetch` is blocking; the loader runs it off the async runtime.
pub trait ModuleSource: Send + Sync {
    /// Fetch and decode the module.
    fn fetch(&self) -> Result<Value, LibraryLoadError>;

    /// Human-readable location for logs.
    fn location(&self) -> String;
}

/// Module served over HTTP as JSON.
pub struct HttpModuleSource {
    url: String,
    agent: Agent,
}

impl HttpModuleSource {
    /// Create a source for `url` with a global request timeout.
    #[must_use]
    pub fn new(url: impl Into<String>, timeout: Duration) -> Self {
        let agent = Agent::config_builder()
            .timeout_global(Some(timeout))
            .http_status_as_error(false)
            .build()
            .into();
        Self {
            url: url.into(),
            agent,
        }
    }

    fn network_error(&self, message: impl Into<String>) -> LibraryLoadError {
        LibraryLoadError::Network {
            location: self.url.clone(),
            message: message.into(),
        }
    }
}

impl ModuleSource for HttpModuleSource {
    fn fetch(&self) -> Result<Value, LibraryLoadError> {
        tracing::debug!(url = %self.url, "Fetching component library");

        let response = self
            .agent
            .get(&self.url)
            .header("Accept", "application/json")
            .call()
            .map_err(|e| self.network_error(e.to_string()))?;

        let status = response.status().as_u16();
        let mut body = response.into_body();

        if status >= 400 {
            let error_body = body
                .read_to_string()
                .unwrap_or_else(|_| String::from("(unable to read error body)"));
            return Err(self.network_error(format!("HTTP {status}: {error_body}")));
        }

        body.read_json::<Value>()
            .map_err(|e| LibraryLoadError::Malformed(e.to_string()))
    }

    fn location(&self) -> String {
        self.url.clone()
    }
}

/// Module stored as a local JSON file.
pub struct FileModuleSource {
    path: PathBuf,
}

impl FileModuleSource {
    /// Create a source reading `path`.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl ModuleSource for FileModuleSource {
    fn fetch(&self) -> Result<Value, LibraryLoadError> {
        let json = fs::read_to_string(&self.path).map_err(|e| LibraryLoadError::Network {
            location: self.location(),
            message: e.to_string(),
        })?;
        serde_json::from_str(&json).map_err(|e| LibraryLoadError::Malformed(e.to_string()))
    }

    fn location(&self) -> String {
        self.path.display().to_string()
    }
}

/// Locate the component map inside a module.
///
/// Bundlers wrap exports differently, so the candidates are tried in order
/// and the first non-empty object wins:
///
/// 1. `raw.default.default`
/// 2. `raw.default`
/// 3. `raw`
///
/// # Errors
///
/// Returns [`LibraryLoadError::Malformed`] if `raw` is not an object and
/// [`LibraryLoadError::Empty`] if no candidate is a non-empty object.
pub fn normalize_exports(raw: &Value) -> Result<&Map<String, Value>, LibraryLoadError> {
    let Value::Object(root) = raw else {
        return Err(LibraryLoadError::Malformed(format!(
            "expected a JSON object, found {}",
            kind_of(raw)
        )));
    };

    let default = root.get("default");
    let nested = default.and_then(|d| d.get("default"));

    [nested, default, Some(raw)]
        .into_iter()
        .flatten()
        .filter_map(Value::as_object)
        .find(|exports| !exports.is_empty())
        .ok_or(LibraryLoadError::Empty)
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    fn names(exports: &Map<String, Value>) -> Vec<&str> {
        exports.keys().map(String::as_str).collect()
    }

    #[test]
    fn test_normalize_double_default() {
        let raw = json!({ "default": { "default": { "Hero": "h" }, "Other": "o" } });
        assert_eq!(names(normalize_exports(&raw).unwrap()), vec!["Hero"]);
    }

    #[test]
    fn test_normalize_single_default() {
        let raw = json!({ "default": { "Hero": "h", "List": "l" } });
        assert_eq!(names(normalize_exports(&raw).unwrap()), vec!["Hero", "List"]);
    }

    #[test]
    fn test_normalize_flat() {
        let raw = json!({ "Hero": "h" });
        assert_eq!(names(normalize_exports(&raw).unwrap()), vec!["Hero"]);
    }

    #[test]
    fn test_normalize_skips_empty_candidates() {
        let raw = json!({ "default": { "default": {} , "Hero": "h" } });
        assert_eq!(names(normalize_exports(&raw).unwrap()), vec!["Hero", "default"]);
    }

    #[test]
    fn test_normalize_non_object_default_falls_through() {
        let raw = json!({ "default": "Hero", "List": "l" });
        assert_eq!(names(normalize_exports(&raw).unwrap()), vec!["List", "default"]);
    }

    #[test]
    fn test_normalize_empty_module() {
        assert_eq!(normalize_exports(&json!({})).unwrap_err(), LibraryLoadError::Empty);
    }

    #[test]
    fn test_normalize_rejects_array() {
        assert_eq!(
            normalize_exports(&json!([1])).unwrap_err(),
            LibraryLoadError::Malformed("expected a JSON object, found an array".to_owned())
        );
    }

    #[test]
    fn test_file_source_reads_json() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("components.json");
        fs::write(&path, r#"{"default": {"Hero": "<h1>{{ title }}</h1>"}}"#).unwrap();

        let raw = FileModuleSource::new(&path).fetch().unwrap();
        assert_eq!(raw["default"]["Hero"], "<h1>{{ title }}</h1>");
    }

    #[test]
    fn test_file_source_missing_file() {
        let source = FileModuleSource::new("/nonexistent/components.json");
        assert!(matches!(source.fetch(), Err(LibraryLoadError::Network { .. })));
    }

    #[test]
    fn test_file_source_invalid_json() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("components.json");
        fs::write(&path, "export default {}").unwrap();

        let result = FileModuleSource::new(&path).fetch();
        assert!(matches!(result, Err(LibraryLoadError::Malformed(_))));
    }
}
