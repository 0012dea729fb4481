//! `tessera build` command implementation.

use std::path::{Path, PathBuf};

use clap::Args;
use tessera_config::{CliSettings, Config};
use tessera_content::{Page, SiteCollector, SiteReport};

use crate::error::CliError;
use crate::output::Output;

/// Arguments for the build command.
#[derive(Args)]
pub(crate) struct BuildArgs {
    /// Path to configuration file (default: auto-discover tessera.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Content root; each subdirectory is a page (overrides config).
    #[arg(short, long)]
    source_dir: Option<PathBuf>,

    /// Site content artifact path (overrides config).
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Enable verbose output.
    #[arg(short, long)]
    pub verbose: bool,
}

impl BuildArgs {
    /// Execute the build command.
    ///
    /// Problems in individual content files are reported as warnings; only
    /// a structural failure (missing content root, unwritable artifact)
    /// fails the build.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();

        let cli_settings = CliSettings {
            source_dir: self.source_dir,
            output: self.output,
            ..CliSettings::default()
        };
        let config = Config::load(self.config.as_deref(), Some(&cli_settings))?;
        let source_dir = &config.content_resolved.source_dir;
        let artifact = &config.content_resolved.output;

        output.path("Content root", source_dir);
        let report = build_site(source_dir, artifact)?;

        for key in report.content.keys() {
            let sections = report.content.page(key).map_or(0, Page::len);
            output.page(key, sections);
        }
        for error in &report.skipped_files {
            output.warning(&format!("Skipped: {error}"));
        }
        for key in &report.failed_pages {
            output.warning(&format!("Page {key} could not be read, written as empty"));
        }

        output.success(&format!(
            "Content built successfully! {} pages, {} skipped files",
            report.content.len(),
            report.skipped_files.len()
        ));
        output.path("Artifact", artifact);

        Ok(())
    }
}

/// Collect the content root and write the artifact.
pub(crate) fn build_site(source_dir: &Path, artifact: &Path) -> Result<SiteReport, CliError> {
    let report = SiteCollector::new(source_dir).collect()?;
    report.content.write_to(artifact)?;
    tracing::info!(
        pages = report.content.len(),
        skipped = report.skipped_files.len(),
        artifact = %artifact.display(),
        "Site content written"
    );
    Ok(report)
}
