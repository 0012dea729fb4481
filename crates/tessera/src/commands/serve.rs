//! `tessera serve` command implementation.

use std::path::PathBuf;

use clap::Args;
use tessera_config::{CliSettings, Config, LibraryLocation};
use tessera_server::{run_server, server_config_from_config};

use crate::error::CliError;
use crate::output::Output;

/// Arguments for the serve command.
#[derive(Args)]
pub(crate) struct ServeArgs {
    /// Path to configuration file (default: auto-discover tessera.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Site content artifact to serve (overrides config).
    #[arg(long)]
    content: Option<PathBuf>,

    /// Component library URL (overrides config).
    #[arg(long, env = "TESSERA_LIBRARY_URL", conflicts_with = "library_path")]
    library_url: Option<String>,

    /// Component library JSON file (overrides config).
    #[arg(long)]
    library_path: Option<PathBuf>,

    /// Host to bind to (overrides config).
    #[arg(long)]
    host: Option<String>,

    /// Port to bind to (overrides config).
    #[arg(short, long)]
    port: Option<u16>,

    /// Enable verbose output.
    #[arg(short, long)]
    pub verbose: bool,
}

impl ServeArgs {
    /// Execute the serve command.
    pub(crate) async fn execute(self) -> Result<(), CliError> {
        let output = Output::new();

        let cli_settings = CliSettings {
            output: self.content,
            library_url: self.library_url,
            library_path: self.library_path,
            host: self.host,
            port: self.port,
            ..CliSettings::default()
        };
        let config = Config::load(self.config.as_deref(), Some(&cli_settings))?;

        output.info(&format!(
            "Starting server on http://{}:{}",
            config.server.host, config.server.port
        ));
        output.path("Site content", &config.content_resolved.output);
        match &config.library_resolved.location {
            LibraryLocation::Url(url) => output.info(&format!("Component library: {url}")),
            LibraryLocation::Path(path) => output.path("Component library", path),
        }
        output.info(&format!(
            "Fallback component: {}",
            config.library_resolved.fallback_component
        ));

        run_server(server_config_from_config(&config))
            .await
            .map_err(|e| CliError::Server(e.to_string()))?;

        Ok(())
    }
}
