pub mod asset;
pub mod cli;
pub mod config;
pub mod error;
pub mod extractor;
pub mod handler;
pub mod naming;
pub mod ui;

// Public API re-exports
pub use cli::{Cli, OutputFormat};
pub use config::{CliOverrides, Config, FilterConfig, NamingConfig, OutputConfig};
pub use error::{AssetDumpError, Result, UserFriendlyError};

// Core functionality re-exports
pub use asset::{AssetFormat, AssetObject, AssetObjectPath, FieldValue, Manifest, ManifestEntry};
pub use extractor::{
    ConfigSnapshot, ExtractionProgress, ExtractionReport, ExtractionSession, OutputManager,
};
pub use handler::{
    AssetSink, CategoryWriter, ExtractHandler, HandlerRegistry, ObjectOutcome, WriteOutcome,
};
pub use naming::{sanitize_name, NamingResolver, ResolvedFile};
pub use ui::{GracefulShutdown, OutputFormatter, OutputMode, ProgressManager};

use std::path::Path;
use tracing::{debug, info};

/// Main library interface for AssetDump functionality
pub struct AssetDump {
    config: Config,
    output_formatter: OutputFormatter,
    progress_manager: ProgressManager,
    shutdown: GracefulShutdown,
}

impl AssetDump {
    pub fn new(config: Config, output_mode: OutputMode, verbose: u8, quiet: bool) -> Result<Self> {
        let output_formatter = OutputFormatter::new(output_mode, verbose, quiet);
        let progress_manager = ProgressManager::new(!quiet && output_mode == OutputMode::Human);
        let shutdown = GracefulShutdown::new()?;

        Ok(Self {
            config,
            output_formatter,
            progress_manager,
            shutdown,
        })
    }

    /// Create an instance for testing (no signal handler conflicts)
    #[cfg(test)]
    pub fn new_for_test(config: Config, output_mode: OutputMode, verbose: u8, quiet: bool) -> Self {
        Self {
            config,
            output_formatter: OutputFormatter::new(output_mode, verbose, quiet),
            progress_manager: ProgressManager::new(false),
            shutdown: GracefulShutdown::new_for_test(),
        }
    }

    pub fn from_cli(cli_args: &Cli) -> Result<Self> {
        let config = cli_args.load_config()?;
        let output_mode = match cli_args.output_format {
            OutputFormat::Human => OutputMode::Human,
            OutputFormat::Json => OutputMode::Json,
            OutputFormat::Plain => OutputMode::Plain,
        };

        Self::new(config, output_mode, cli_args.verbose, cli_args.quiet)
    }

    /// Extract every object of a manifest into the configured output directory.
    ///
    /// Per-object failures end up in the report's `errors`; the call itself
    /// only fails when the manifest or the output directory is unusable, or
    /// on cancellation.
    pub fn extract_manifest(&self, manifest_path: &Path) -> Result<ExtractionReport> {
        self.shutdown.check_shutdown()?;

        self.output_formatter.start_operation("Loading manifest");
        let manifest = Manifest::load(manifest_path)?;
        info!(
            "Loaded {} objects from {}",
            manifest.len(),
            manifest_path.display()
        );
        if let Some(format) = &manifest.format {
            debug!("Asset format version {} ({})", format.version, format.revision);
        }

        let output_manager = OutputManager::new(self.config.output.base_directory.clone())?;
        self.output_formatter.info(&format!(
            "Output directory: {}",
            output_manager.get_output_directory().display()
        ));

        let progress = self.extract_objects(&manifest)?;

        let report = output_manager.create_extraction_report(
            manifest_path,
            manifest.format.as_ref(),
            &progress,
            &ConfigSnapshot::from(&self.config),
        );

        if self.config.output.generate_report {
            let report_path = output_manager.save_report_json(&report)?;
            debug!("Saved extraction report to {}", report_path.display());
        }

        self.output_formatter.print_extraction_summary(&progress);

        Ok(report)
    }

    fn extract_objects(&self, manifest: &Manifest) -> Result<ExtractionProgress> {
        self.output_formatter.start_operation("Extracting objects");

        let mut session = ExtractionSession::from_config(&self.config)?;

        let object_progress = self.progress_manager.create_object_progress(manifest.len() as u64);
        let progress_callback = {
            let pb = object_progress.clone();
            move |progress: &ExtractionProgress| {
                ui::progress::update_object_progress(&pb, progress);
            }
        };

        let result = session.run(manifest, Some(&progress_callback), Some(&self.shutdown));

        match &result {
            Ok(progress) => ui::progress::finish_progress_with_summary(
                &object_progress,
                &format!("Wrote {} files", progress.files_written),
                progress.elapsed(),
            ),
            Err(_) => object_progress.abandon(),
        }

        result
    }

    pub fn generate_sample_config<P: AsRef<Path>>(output_path: P) -> Result<()> {
        let sample_config = Config::create_sample_config();
        std::fs::write(output_path.as_ref(), sample_config).map_err(AssetDumpError::Io)?;
        Ok(())
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn output_formatter(&self) -> &OutputFormatter {
        &self.output_formatter
    }

    pub fn progress_manager(&self) -> &ProgressManager {
        &self.progress_manager
    }

    pub fn is_running(&self) -> bool {
        self.shutdown.is_running()
    }

    pub fn request_shutdown(&self) {
        self.shutdown.request_shutdown();
    }

    pub fn handle_error(&self, error: &AssetDumpError) {
        self.output_formatter.print_user_friendly_error(error);
    }
}

pub fn version_info() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

pub fn build_info() -> BuildInfo {
    BuildInfo {
        version: env!("CARGO_PKG_VERSION"),
        git_hash: option_env!("GIT_HASH").unwrap_or("unknown"),
        build_date: option_env!("BUILD_DATE").unwrap_or("unknown"),
        target: std::env::consts::ARCH.to_string(),
    }
}

#[derive(Debug, Clone)]
pub struct BuildInfo {
    pub version: &'static str,
    pub git_hash: &'static str,
    pub build_date: &'static str,
    pub target: String,
}

impl std::fmt::Display for BuildInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "AssetDump {} ({}) built on {} for {}",
            self.version, self.git_hash, self.build_date, self.target
        )
    }
}
