use crate::config::{CliOverrides, Config};
use crate::error::Result;
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "assetdump")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Write decoded game asset objects to disk")]
#[command(
    long_about = "AssetDump takes a manifest of already-decoded asset objects and writes each \
                  one into a per-class directory, with sanitized and collision-free file names."
)]
#[command(after_help = "EXAMPLES:\n  \
    assetdump objects.json\n  \
    assetdump objects.json --output dump --prefix\n  \
    assetdump objects.json --classes 'TextAsset,Audio.*' --extract-unknown\n  \
    assetdump --generate-config --config assetdump.toml")]
#[command(arg_required_else_help = true)]
pub struct Cli {
    /// Manifest of decoded objects (JSON)
    #[arg(required_unless_present = "generate_config")]
    pub manifest: Option<PathBuf>,

    /// Output directory (defaults to ./extracted)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Prefix file names with the zero-padded object id
    #[arg(long)]
    pub prefix: bool,

    /// Dump byte fields of classes without a dedicated handler
    #[arg(long)]
    pub extract_unknown: bool,

    /// Class name patterns to extract (comma-separated regular expressions)
    #[arg(long)]
    pub classes: Option<String>,

    /// Skip writing .assetdump/extraction_report.json
    #[arg(long)]
    pub no_report: bool,

    /// Configuration file path
    #[arg(short, long, help = "Path to TOML configuration file")]
    pub config: Option<PathBuf>,

    /// Output format for results
    #[arg(long, value_enum, default_value_t = OutputFormat::Human)]
    pub output_format: OutputFormat,

    /// Verbose output level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Quiet mode (suppress non-essential output)
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Dry run (show what would be done without executing)
    #[arg(long, help = "Show what would be extracted without writing anything")]
    pub dry_run: bool,

    /// Generate sample configuration file
    #[arg(long, help = "Generate a sample configuration file")]
    pub generate_config: bool,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable colored output
    Human,
    /// JSON formatted output
    Json,
    /// Plain text output
    Plain,
}

impl Cli {
    pub fn load_config(&self) -> Result<Config> {
        let mut config = Config::load_with_defaults(self.config.as_ref())?;

        let overrides = self.create_cli_overrides();
        config.merge_with_cli_args(&overrides);
        config.validate()?;

        Ok(config)
    }

    /// Flags only override the config file when they are set.
    pub fn create_cli_overrides(&self) -> CliOverrides {
        let output_dir = self.output.as_ref().map(|o| {
            if o.is_absolute() {
                o.clone()
            } else {
                std::env::current_dir().unwrap_or_default().join(o)
            }
        });

        CliOverrides::new()
            .with_output_dir(output_dir)
            .with_use_prefix(self.prefix.then_some(true))
            .with_extract_unknown(self.extract_unknown.then_some(true))
            .with_generate_report(self.no_report.then_some(false))
            .with_classes(self.classes.clone())
    }

    pub fn is_verbose(&self) -> bool {
        self.verbose > 0 && !self.quiet
    }

    pub fn verbosity_level(&self) -> u8 {
        if self.quiet {
            0
        } else {
            self.verbose
        }
    }

    /// Default `tracing` filter directive for the chosen verbosity.
    pub fn log_filter(&self) -> &'static str {
        match self.verbosity_level() {
            _ if self.quiet => "error",
            0 => "warn",
            1 => "assetdump=info",
            _ => "assetdump=debug",
        }
    }
}
