use assetdump::{
    AssetDump, AssetDumpError, Cli, ExtractionSession, Manifest, OutputFormatter, OutputMode,
    UserFriendlyError,
};
use clap::Parser;
use std::io::IsTerminal;
use std::path::Path;
use std::process;
use tracing_subscriber::EnvFilter;

fn main() {
    let exit_code = run();
    process::exit(exit_code);
}

fn run() -> i32 {
    let cli = Cli::parse();

    setup_logging(&cli);

    if cli.generate_config {
        return handle_generate_config(&cli);
    }

    let assetdump = match AssetDump::from_cli(&cli) {
        Ok(assetdump) => assetdump,
        Err(e) => {
            print_startup_error(&e);
            return exit_code_for(&e);
        }
    };

    // `required_unless_present` guarantees a manifest past this point
    let Some(manifest_path) = cli.manifest.as_deref() else {
        assetdump.output_formatter().error("No manifest given");
        return 1;
    };

    if cli.dry_run {
        return handle_dry_run(manifest_path, &assetdump);
    }

    match assetdump.extract_manifest(manifest_path) {
        Ok(report) => {
            assetdump.output_formatter().print_extraction_report(&report);

            if report.errors.is_empty() {
                0
            } else {
                2 // Finished, but some objects or files failed
            }
        }
        Err(e) => {
            assetdump.handle_error(&e);
            exit_code_for(&e)
        }
    }
}

fn exit_code_for(error: &AssetDumpError) -> i32 {
    match error {
        AssetDumpError::Cancelled => 130,
        AssetDumpError::Manifest { .. } => 3,
        AssetDumpError::Config { .. } => 4,
        AssetDumpError::Permission { .. } => 7,
        _ => 1,
    }
}

fn setup_logging(cli: &Cli) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(cli.log_filter()));

    // Logs go to stderr so JSON output on stdout stays parseable
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_ansi(std::io::stderr().is_terminal())
        .with_writer(std::io::stderr)
        .try_init();
}

fn handle_generate_config(cli: &Cli) -> i32 {
    let config_path = cli
        .config
        .as_ref()
        .map(|p| p.to_string_lossy().to_string())
        .unwrap_or_else(|| "assetdump.toml".to_string());

    match AssetDump::generate_sample_config(&config_path) {
        Ok(()) => {
            println!("Generated sample configuration file: {}", config_path);
            println!("\nTo use this configuration:");
            println!("  assetdump <manifest> --config {}", config_path);
            0
        }
        Err(e) => {
            eprintln!("Failed to generate configuration file: {}", e.user_message());
            if let Some(suggestion) = e.suggestion() {
                eprintln!("Suggestion: {}", suggestion);
            }
            1
        }
    }
}

fn handle_dry_run(manifest_path: &Path, assetdump: &AssetDump) -> i32 {
    let formatter = assetdump.output_formatter();

    formatter.info("DRY RUN MODE - No files will be written");
    formatter.print_separator();

    let manifest = match Manifest::load(manifest_path) {
        Ok(manifest) => manifest,
        Err(e) => {
            formatter.print_user_friendly_error(&e);
            return exit_code_for(&e);
        }
    };

    let session = match ExtractionSession::from_config(assetdump.config()) {
        Ok(session) => session,
        Err(e) => {
            formatter.print_user_friendly_error(&e);
            return exit_code_for(&e);
        }
    };

    let config = assetdump.config();
    println!("Manifest: {} ({} objects)", manifest_path.display(), manifest.len());
    if let Some(format) = &manifest.format {
        println!("Asset format: {} ({})", format.version, format.revision);
    }
    println!("Output directory: {}", config.output.base_directory.display());
    println!("Prefix ids: {}", config.output.use_prefix);

    formatter.print_separator();
    println!("Classes:");
    for (class_name, count) in manifest.class_counts() {
        let action = if session.would_extract(&class_name) {
            "extract"
        } else {
            "skip"
        };
        println!("  {:<24} {:>6}  {}", class_name, count, action);
    }

    formatter.print_separator();
    formatter.success("Dry run completed successfully");
    0
}

fn print_startup_error(error: &AssetDumpError) {
    let formatter = OutputFormatter::new(OutputMode::Human, 0, false);
    formatter.print_user_friendly_error(error);
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_generate_config_command() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("test.toml");

        let cli = Cli::parse_from([
            "assetdump",
            "--generate-config",
            "--config",
            config_path.to_str().unwrap(),
        ]);

        assert_eq!(handle_generate_config(&cli), 0);
        let content = fs::read_to_string(&config_path).unwrap();
        assert!(content.contains("[output]"));
    }

    #[test]
    fn test_exit_codes() {
        assert_eq!(exit_code_for(&AssetDumpError::Cancelled), 130);
        assert_eq!(
            exit_code_for(&AssetDumpError::Manifest {
                path: "m.json".to_string(),
                message: "bad".to_string(),
            }),
            3
        );
        assert_eq!(
            exit_code_for(&AssetDumpError::Permission {
                path: "/out".to_string()
            }),
            7
        );
        assert_eq!(
            exit_code_for(&AssetDumpError::InvalidPath {
                path: "x".to_string()
            }),
            1
        );
    }
}
