//! Configuration management for tessera.
//!
//! Parses `tessera.toml` configuration files with serde and provides
//! auto-discovery of config files in parent directories.
//!
//! CLI settings can be applied during load via [`CliSettings`].
//!
//! ## Environment Variable Expansion
//!
//! String configuration values support environment variable expansion:
//!
//! - `${VAR}` - expands to the value of VAR, errors if unset
//! - `${VAR:-default}` - expands to VAR if set, otherwise uses default
//!
//! Expanded fields:
//! - `server.host`
//! - `content.source_dir`
//! - `content.output`
//! - `library.url`
//! - `library.path`
//! - `library.fallback_component`

mod expand;

use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// CLI settings that override configuration file values.
///
/// All fields are optional. Only non-None values override the loaded config.
#[derive(Debug, Default)]
pub struct CliSettings {
    /// Override content source directory.
    pub source_dir: Option<PathBuf>,
    /// Override artifact output path.
    pub output: Option<PathBuf>,
    /// Load the component library from this URL.
    pub library_url: Option<String>,
    /// Load the component library from this local file.
    pub library_path: Option<PathBuf>,
    /// Override server host.
    pub host: Option<String>,
    /// Override server port.
    pub port: Option<u16>,
}

/// Configuration filename to search for.
const CONFIG_FILENAME: &str = "tessera.toml";

/// Component library used when none is configured.
pub const DEFAULT_LIBRARY_URL: &str = "http://localhost:3001/components.json";

/// Application configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Server configuration.
    pub server: ServerConfig,
    /// Content configuration (paths are relative strings from TOML).
    content: ContentConfigRaw,
    /// Component library configuration as written.
    library: LibraryConfigRaw,

    /// Resolved content configuration (set after loading).
    #[serde(skip)]
    pub content_resolved: ContentConfig,
    /// Resolved library configuration (set after loading).
    #[serde(skip)]
    pub library_resolved: LibraryConfig,
    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self::default_with_base(Path::new("."))
    }
}

/// Server configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Server host address.
    pub host: String,
    /// Server port.
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_owned(),
            port: 7878,
        }
    }
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct ContentConfigRaw {
    source_dir: Option<String>,
    output: Option<String>,
}

/// Resolved content configuration with absolute paths.
#[derive(Debug, Default)]
pub struct ContentConfig {
    /// Root directory; each subdirectory is a page.
    pub source_dir: PathBuf,
    /// Site content artifact path.
    pub output: PathBuf,
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct LibraryConfigRaw {
    url: Option<String>,
    path: Option<String>,
    fallback_component: Option<String>,
    timeout_secs: Option<u64>,
}

/// Where the component library module comes from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LibraryLocation {
    /// JSON module fetched over HTTP.
    Url(String),
    /// JSON module read from disk.
    Path(PathBuf),
}

/// Resolved component library configuration.
#[derive(Debug)]
pub struct LibraryConfig {
    /// Module location.
    pub location: LibraryLocation,
    /// Component rendered for sections whose component is missing.
    pub fallback_component: String,
    /// HTTP timeout for fetching the module.
    pub timeout: Duration,
}

impl Default for LibraryConfig {
    fn default() -> Self {
        Self {
            location: LibraryLocation::Url(DEFAULT_LIBRARY_URL.to_owned()),
            fallback_component: "List".to_owned(),
            timeout: Duration::from_secs(30),
        }
    }
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File not found.
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error.
    #[error("Configuration error: {0}")]
    Validation(String),
    /// Environment variable error during expansion.
    #[error("Environment variable error in {field}: {message}")]
    EnvVar {
        /// Config field path (e.g., "`library.url`").
        field: String,
        /// Error message (e.g., "${`LIBRARY_URL`} not set").
        message: String,
    },
}

/// Require a string field to be non-empty.
fn require_non_empty(value: &str, field: &str) -> Result<(), ConfigError> {
    if value.is_empty() {
        return Err(ConfigError::Validation(format!("{field} cannot be empty")));
    }
    Ok(())
}

/// Require a URL field to use http:// or https:// scheme.
fn require_http_url(url: &str, field: &str) -> Result<(), ConfigError> {
    if !url.starts_with("http://") && !url.starts_with("https://") {
        return Err(ConfigError::Validation(format!(
            "{field} must start with http:// or https://"
        )));
    }
    Ok(())
}

impl Config {
    /// Load configuration from file with optional CLI settings.
    ///
    /// If `config_path` is provided, loads from that file.
    /// Otherwise, searches for `tessera.toml` in current directory and parents.
    ///
    /// CLI settings are applied after loading and path resolution, allowing CLI
    /// arguments to take precedence over config file values. The result is
    /// validated last.
    ///
    /// # Errors
    ///
    /// Returns error if explicit `config_path` doesn't exist, parsing fails,
    /// or the final configuration is invalid.
    pub fn load(
        config_path: Option<&Path>,
        cli_settings: Option<&CliSettings>,
    ) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = config_path {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            Self::load_from_file(path)?
        } else if let Some(discovered) = Self::discover_config() {
            Self::load_from_file(&discovered)?
        } else {
            Self::default_with_cwd()
        };

        if let Some(settings) = cli_settings {
            config.apply_cli_settings(settings);
        }

        config.validate()?;
        Ok(config)
    }

    /// Apply CLI settings to the configuration.
    fn apply_cli_settings(&mut self, settings: &CliSettings) {
        if let Some(source_dir) = &settings.source_dir {
            self.content_resolved.source_dir.clone_from(source_dir);
        }
        if let Some(output) = &settings.output {
            self.content_resolved.output.clone_from(output);
        }
        if let Some(url) = &settings.library_url {
            self.library_resolved.location = LibraryLocation::Url(url.clone());
        }
        if let Some(path) = &settings.library_path {
            self.library_resolved.location = LibraryLocation::Path(path.clone());
        }
        if let Some(host) = &settings.host {
            self.server.host.clone_from(host);
        }
        if let Some(port) = settings.port {
            self.server.port = port;
        }
    }

    /// Search for config file in current directory and parents.
    fn discover_config() -> Option<PathBuf> {
        let mut current = std::env::current_dir().ok()?;
        loop {
            let candidate = current.join(CONFIG_FILENAME);
            if candidate.exists() {
                return Some(candidate);
            }
            if !current.pop() {
                return None;
            }
        }
    }

    /// Create default config with paths relative to current working directory.
    fn default_with_cwd() -> Self {
        let cwd = std::env::current_dir().unwrap_or_default();
        Self::default_with_base(&cwd)
    }

    /// Create default config with paths relative to given base directory.
    fn default_with_base(base: &Path) -> Self {
        Self {
            server: ServerConfig::default(),
            content: ContentConfigRaw::default(),
            library: LibraryConfigRaw::default(),
            content_resolved: ContentConfig {
                source_dir: base.join("content/pages"),
                output: base.join("dist/content.json"),
            },
            library_resolved: LibraryConfig::default(),
            config_path: None,
        }
    }

    /// Load configuration from a specific file.
    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&content)?;

        // Expand environment variables before path resolution
        config.expand_env_vars()?;

        let config_dir = path.parent().unwrap_or(Path::new("."));
        config.resolve_paths(config_dir)?;
        config.config_path = Some(path.to_path_buf());

        Ok(config)
    }

    /// Validate configuration values.
    ///
    /// Called automatically by [`Config::load`].
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if any validation fails.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.validate_server()?;
        self.validate_library()?;
        Ok(())
    }

    fn validate_server(&self) -> Result<(), ConfigError> {
        require_non_empty(&self.server.host, "server.host")?;

        // Port 0 is technically valid (OS assigns a random port), but it's
        // unlikely to be intentional in a config file
        if self.server.port == 0 {
            return Err(ConfigError::Validation(
                "server.port cannot be 0".to_owned(),
            ));
        }

        Ok(())
    }

    fn validate_library(&self) -> Result<(), ConfigError> {
        let library = &self.library_resolved;

        match &library.location {
            LibraryLocation::Url(url) => {
                require_non_empty(url, "library.url")?;
                require_http_url(url, "library.url")?;
            }
            LibraryLocation::Path(path) => {
                if path.as_os_str().is_empty() {
                    return Err(ConfigError::Validation(
                        "library.path cannot be empty".to_owned(),
                    ));
                }
            }
        }

        require_non_empty(&library.fallback_component, "library.fallback_component")?;

        if library.timeout.is_zero() {
            return Err(ConfigError::Validation(
                "library.timeout_secs must be greater than 0".to_owned(),
            ));
        }

        Ok(())
    }

    /// Expand environment variable references in configuration strings.
    fn expand_env_vars(&mut self) -> Result<(), ConfigError> {
        fn expand_opt(value: &mut Option<String>, field: &str) -> Result<(), ConfigError> {
            if let Some(v) = value {
                *v = expand::expand_env(v, field)?;
            }
            Ok(())
        }

        self.server.host = expand::expand_env(&self.server.host, "server.host")?;

        expand_opt(&mut self.content.source_dir, "content.source_dir")?;
        expand_opt(&mut self.content.output, "content.output")?;

        expand_opt(&mut self.library.url, "library.url")?;
        expand_opt(&mut self.library.path, "library.path")?;
        expand_opt(&mut self.library.fallback_component, "library.fallback_component")?;

        Ok(())
    }

    /// Resolve relative paths to absolute paths based on config directory.
    ///
    /// Rejects a `[library]` section that sets both `url` and `path`.
    fn resolve_paths(&mut self, config_dir: &Path) -> Result<(), ConfigError> {
        let resolve = |path: Option<&str>, default: &str| config_dir.join(path.unwrap_or(default));

        self.content_resolved = ContentConfig {
            source_dir: resolve(self.content.source_dir.as_deref(), "content/pages"),
            output: resolve(self.content.output.as_deref(), "dist/content.json"),
        };

        let defaults = LibraryConfig::default();
        let location = match (&self.library.url, &self.library.path) {
            (Some(_), Some(_)) => {
                return Err(ConfigError::Validation(
                    "library.url and library.path are mutually exclusive".to_owned(),
                ));
            }
            (Some(url), None) => LibraryLocation::Url(url.clone()),
            (None, Some(path)) => LibraryLocation::Path(config_dir.join(path)),
            (None, None) => defaults.location,
        };
        self.library_resolved = LibraryConfig {
            location,
            fallback_component: self
                .library
                .fallback_component
                .clone()
                .unwrap_or(defaults.fallback_component),
            timeout: self
                .library
                .timeout_secs
                .map_or(defaults.timeout, Duration::from_secs),
        };

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn parse(toml: &str, base: &Path) -> Result<Config, ConfigError> {
        let mut config: Config = toml::from_str(toml)?;
        config.expand_env_vars()?;
        config.resolve_paths(base)?;
        Ok(config)
    }

    #[test]
    fn test_default_config() {
        let config = Config::default_with_base(Path::new("/test"));
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 7878);
        assert_eq!(config.content_resolved.source_dir, PathBuf::from("/test/content/pages"));
        assert_eq!(config.content_resolved.output, PathBuf::from("/test/dist/content.json"));
        assert_eq!(
            config.library_resolved.location,
            LibraryLocation::Url(DEFAULT_LIBRARY_URL.to_owned())
        );
        assert_eq!(config.library_resolved.fallback_component, "List");
        assert_eq!(config.library_resolved.timeout, Duration::from_secs(30));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_minimal_config() {
        let config = parse("", Path::new("/project")).unwrap();
        assert_eq!(config.server.port, 7878);
        assert_eq!(config.content_resolved.source_dir, PathBuf::from("/project/content/pages"));
    }

    #[test]
    fn test_parse_full_config() {
        let toml = r#"
[content]
source_dir = "site"
output = "public/site.json"

[library]
url = "https://cdn.example.com/components.json"
fallback_component = "Section"
timeout_secs = 5

[server]
host = "0.0.0.0"
port = 9000
"#;
        let config = parse(toml, Path::new("/project")).unwrap();

        assert_eq!(config.content_resolved.source_dir, PathBuf::from("/project/site"));
        assert_eq!(config.content_resolved.output, PathBuf::from("/project/public/site.json"));
        assert_eq!(
            config.library_resolved.location,
            LibraryLocation::Url("https://cdn.example.com/components.json".to_owned())
        );
        assert_eq!(config.library_resolved.fallback_component, "Section");
        assert_eq!(config.library_resolved.timeout, Duration::from_secs(5));
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 9000);
    }

    #[test]
    fn test_library_path_resolves_against_config_dir() {
        let toml = r#"
[library]
path = "components.json"
"#;
        let config = parse(toml, Path::new("/project")).unwrap();
        assert_eq!(
            config.library_resolved.location,
            LibraryLocation::Path(PathBuf::from("/project/components.json"))
        );
    }

    #[test]
    fn test_library_url_and_path_are_exclusive() {
        let toml = r#"
[library]
url = "http://localhost:3001/components.json"
path = "components.json"
"#;
        let err = parse(toml, Path::new("/project")).unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));
        assert!(err.to_string().contains("mutually exclusive"));
    }

    #[test]
    fn test_apply_cli_settings() {
        let mut config = Config::default_with_base(Path::new("/test"));

        config.apply_cli_settings(&CliSettings {
            source_dir: Some(PathBuf::from("/custom/pages")),
            output: Some(PathBuf::from("/custom/out.json")),
            library_path: Some(PathBuf::from("/custom/lib.json")),
            host: Some("0.0.0.0".to_owned()),
            port: Some(8000),
            ..CliSettings::default()
        });

        assert_eq!(config.content_resolved.source_dir, PathBuf::from("/custom/pages"));
        assert_eq!(config.content_resolved.output, PathBuf::from("/custom/out.json"));
        assert_eq!(
            config.library_resolved.location,
            LibraryLocation::Path(PathBuf::from("/custom/lib.json"))
        );
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 8000);
    }

    #[test]
    fn test_apply_cli_settings_library_url() {
        let toml = r#"
[library]
path = "components.json"
"#;
        let mut config = parse(toml, Path::new("/project")).unwrap();
        config.apply_cli_settings(&CliSettings {
            library_url: Some("http://127.0.0.1:3001/lib.json".to_owned()),
            ..CliSettings::default()
        });
        assert_eq!(
            config.library_resolved.location,
            LibraryLocation::Url("http://127.0.0.1:3001/lib.json".to_owned())
        );
    }

    #[test]
    fn test_apply_cli_settings_empty() {
        let mut config = Config::default_with_base(Path::new("/test"));
        config.apply_cli_settings(&CliSettings::default());
        assert_eq!(config.server.port, 7878);
        assert_eq!(config.content_resolved.source_dir, PathBuf::from("/test/content/pages"));
    }

    #[test]
    fn test_expand_env_vars_library_url() {
        // SAFETY: test runs single-threaded per test function
        unsafe {
            std::env::set_var("TESSERA_TEST_LIBRARY_HOST", "lib.example.com");
        }

        let toml = r#"
[library]
url = "https://${TESSERA_TEST_LIBRARY_HOST}/components.json"
"#;
        let config = parse(toml, Path::new("/project")).unwrap();
        assert_eq!(
            config.library_resolved.location,
            LibraryLocation::Url("https://lib.example.com/components.json".to_owned())
        );

        unsafe {
            std::env::remove_var("TESSERA_TEST_LIBRARY_HOST");
        }
    }

    #[test]
    fn test_expand_env_vars_default_source_dir() {
        // SAFETY: test runs single-threaded per test function
        unsafe {
            std::env::remove_var("TESSERA_TEST_PAGES");
        }

        let toml = r#"
[content]
source_dir = "${TESSERA_TEST_PAGES:-pages}"
"#;
        let config = parse(toml, Path::new("/project")).unwrap();
        assert_eq!(config.content_resolved.source_dir, PathBuf::from("/project/pages"));
    }

    #[test]
    fn test_expand_env_vars_missing_required_var() {
        // SAFETY: test runs single-threaded per test function
        unsafe {
            std::env::remove_var("TESSERA_TEST_MISSING");
        }

        let toml = r#"
[server]
host = "${TESSERA_TEST_MISSING}"
"#;
        let err = parse(toml, Path::new("/project")).unwrap_err();
        assert!(matches!(err, ConfigError::EnvVar { .. }));
        assert!(err.to_string().contains("TESSERA_TEST_MISSING"));
        assert!(err.to_string().contains("server.host"));
    }

    /// Assert that validation fails with expected substrings in the error message.
    fn assert_validation_error(config: &Config, expected_substrings: &[&str]) {
        let result = config.validate();
        assert!(result.is_err(), "Expected validation to fail");
        let err = result.unwrap_err();
        assert!(
            matches!(err, ConfigError::Validation(_)),
            "Expected ConfigError::Validation, got {err:?}"
        );
        let msg = err.to_string();
        for s in expected_substrings {
            assert!(
                msg.contains(s),
                "Expected error to contain '{s}', got: {msg}"
            );
        }
    }

    #[test]
    fn test_validate_server_host_empty() {
        let mut config = Config::default_with_base(Path::new("/test"));
        config.server.host = String::new();
        assert_validation_error(&config, &["server.host", "cannot be empty"]);
    }

    #[test]
    fn test_validate_server_port_zero() {
        let mut config = Config::default_with_base(Path::new("/test"));
        config.server.port = 0;
        assert_validation_error(&config, &["server.port", "cannot be 0"]);
    }

    #[test]
    fn test_validate_library_url_scheme() {
        let mut config = Config::default_with_base(Path::new("/test"));
        config.library_resolved.location = LibraryLocation::Url("ftp://example.com/lib.json".to_owned());
        assert_validation_error(&config, &["library.url", "http://"]);
    }

    #[test]
    fn test_validate_library_url_https() {
        let mut config = Config::default_with_base(Path::new("/test"));
        config.library_resolved.location = LibraryLocation::Url("https://example.com/lib.json".to_owned());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_fallback_component_empty() {
        let mut config = Config::default_with_base(Path::new("/test"));
        config.library_resolved.fallback_component = String::new();
        assert_validation_error(&config, &["library.fallback_component"]);
    }

    #[test]
    fn test_validate_timeout_zero() {
        let config = parse("[library]\ntimeout_secs = 0\n", Path::new("/test")).unwrap();
        assert_validation_error(&config, &["library.timeout_secs"]);
    }

    #[test]
    fn test_load_from_explicit_file() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("tessera.toml");
        std::fs::write(&path, "[content]\nsource_dir = \"pages\"\n").unwrap();

        let config = Config::load(Some(&path), None).unwrap();

        assert_eq!(config.content_resolved.source_dir, temp_dir.path().join("pages"));
        assert_eq!(config.config_path, Some(path));
    }

    #[test]
    fn test_load_missing_file() {
        let err = Config::load(Some(Path::new("/nonexistent/tessera.toml")), None).unwrap_err();
        assert!(matches!(err, ConfigError::NotFound(_)));
    }

    #[test]
    fn test_load_validates_cli_overrides() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("tessera.toml");
        std::fs::write(&path, "").unwrap();

        let settings = CliSettings {
            library_url: Some("localhost:3001".to_owned()),
            ..CliSettings::default()
        };
        let err = Config::load(Some(&path), Some(&settings)).unwrap_err();
        assert!(err.to_string().contains("library.url"));
    }

    #[test]
    fn test_load_invalid_toml() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("tessera.toml");
        std::fs::write(&path, "[server\nport = 1").unwrap();

        let err = Config::load(Some(&path), None).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }
}
