use crate::asset::AssetFormat;
use crate::config::Config;
use crate::error::{AssetDumpError, Result};
use crate::extractor::ExtractionProgress;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

const METADATA_DIR: &str = ".assetdump";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractionReport {
    pub manifest: String,
    pub output_directory: String,
    pub asset_format: Option<AssetFormat>,
    pub extraction_summary: ExtractionSummary,
    pub files: Vec<FileInfo>,
    pub extraction_time: DateTime<Utc>,
    pub errors: Vec<String>,
    pub config_used: ConfigSnapshot,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractionSummary {
    pub objects_processed: usize,
    pub objects_skipped: usize,
    pub files_written: usize,
    pub failed_writes: usize,
    pub bytes_written: u64,
    pub extraction_duration: Duration,
    pub files_by_category: BTreeMap<String, usize>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileInfo {
    pub category: String,
    pub filename: String,
    pub relative_path: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigSnapshot {
    pub use_prefix: bool,
    pub extract_unknown: bool,
    pub case_insensitive: bool,
    pub max_probes: u32,
    pub class_patterns: Vec<String>,
}

impl From<&Config> for ConfigSnapshot {
    fn from(config: &Config) -> Self {
        Self {
            use_prefix: config.output.use_prefix,
            extract_unknown: config.output.extract_unknown,
            case_insensitive: config.naming.case_insensitive,
            max_probes: config.naming.max_probes,
            class_patterns: config.filters.class_patterns.clone(),
        }
    }
}

/// Prepares the output root and writes the run report next to the
/// extracted categories.
pub struct OutputManager {
    output_directory: PathBuf,
}

impl OutputManager {
    pub fn new(output_directory: PathBuf) -> Result<Self> {
        let manager = Self { output_directory };
        manager.validate_paths()?;
        Ok(manager)
    }

    pub fn get_output_directory(&self) -> &Path {
        &self.output_directory
    }

    pub fn get_metadata_dir(&self) -> PathBuf {
        self.output_directory.join(METADATA_DIR)
    }

    pub fn create_extraction_report(
        &self,
        manifest_path: &Path,
        asset_format: Option<&AssetFormat>,
        progress: &ExtractionProgress,
        config: &ConfigSnapshot,
    ) -> ExtractionReport {
        let files = progress
            .written_files
            .iter()
            .map(|path| self.file_info(path))
            .collect();

        ExtractionReport {
            manifest: manifest_path.display().to_string(),
            output_directory: self.output_directory.display().to_string(),
            asset_format: asset_format.cloned(),
            extraction_summary: ExtractionSummary {
                objects_processed: progress.objects_processed,
                objects_skipped: progress.objects_skipped,
                files_written: progress.files_written,
                failed_writes: progress.failed_writes,
                bytes_written: progress.bytes_written,
                extraction_duration: progress.elapsed(),
                files_by_category: progress.files_by_category.clone(),
            },
            files,
            extraction_time: Utc::now(),
            errors: progress.errors.clone(),
            config_used: config.clone(),
        }
    }

    pub fn save_report_json(&self, report: &ExtractionReport) -> Result<PathBuf> {
        let metadata_dir = self.get_metadata_dir();
        fs::create_dir_all(&metadata_dir).map_err(AssetDumpError::Io)?;

        let report_path = metadata_dir.join("extraction_report.json");
        let json_content =
            serde_json::to_string_pretty(report).map_err(|e| AssetDumpError::Config {
                message: format!("Failed to serialize report to JSON: {}", e),
            })?;

        fs::write(&report_path, json_content).map_err(AssetDumpError::Io)?;

        Ok(report_path)
    }

    fn file_info(&self, path: &Path) -> FileInfo {
        let relative = path.strip_prefix(&self.output_directory).unwrap_or(path);

        let category = relative
            .parent()
            .and_then(|p| p.file_name())
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_default();
        let filename = relative
            .file_name()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_default();

        FileInfo {
            category,
            filename,
            relative_path: relative.to_string_lossy().replace('\\', "/"),
        }
    }

    fn validate_paths(&self) -> Result<()> {
        if !self.output_directory.exists() {
            fs::create_dir_all(&self.output_directory).map_err(|e| {
                AssetDumpError::Permission {
                    path: format!(
                        "Cannot create output directory {}: {}",
                        self.output_directory.display(),
                        e
                    ),
                }
            })?;
        }

        if !self.output_directory.is_dir() {
            return Err(AssetDumpError::InvalidPath {
                path: format!("Not a directory: {}", self.output_directory.display()),
            });
        }

        // Test write permissions
        let test_file = self.output_directory.join(".assetdump_write_test");
        match fs::File::create(&test_file) {
            Ok(_) => {
                let _ = fs::remove_file(&test_file);
            }
            Err(e) => {
                return Err(AssetDumpError::Permission {
                    path: format!(
                        "No write permission for directory {}: {}",
                        self.output_directory.display(),
                        e
                    ),
                });
            }
        }

        Ok(())
    }
}
