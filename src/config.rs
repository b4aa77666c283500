use crate::error::{AssetDumpError, Result};
use crate::naming::DEFAULT_MAX_PROBES;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub naming: NamingConfig,
    #[serde(default)]
    pub filters: FilterConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct OutputConfig {
    pub base_directory: PathBuf,
    /// Prefix named files with the zero-padded object id.
    pub use_prefix: bool,
    pub generate_report: bool,
    /// Dump byte fields of classes without a dedicated handler.
    pub extract_unknown: bool,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct NamingConfig {
    pub max_probes: u32,
    pub case_insensitive: bool,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct FilterConfig {
    /// Regular expressions over class names; empty means every class.
    pub class_patterns: Vec<String>,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            base_directory: std::env::current_dir()
                .unwrap_or_else(|_| PathBuf::from("."))
                .join("extracted"),
            use_prefix: false,
            generate_report: true,
            extract_unknown: false,
        }
    }
}

impl Default for NamingConfig {
    fn default() -> Self {
        Self {
            max_probes: DEFAULT_MAX_PROBES,
            case_insensitive: false,
        }
    }
}

impl FilterConfig {
    pub fn compile(&self) -> Result<Vec<Regex>> {
        self.class_patterns
            .iter()
            .map(|pattern| {
                Regex::new(pattern).map_err(|e| AssetDumpError::Config {
                    message: format!("Invalid class pattern '{}': {}", pattern, e),
                })
            })
            .collect()
    }
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(AssetDumpError::Config {
                message: format!("Configuration file not found: {}", path.display()),
            });
        }

        let content = std::fs::read_to_string(path).map_err(|e| AssetDumpError::Config {
            message: format!("Failed to read config file {}: {}", path.display(), e),
        })?;

        let config: Config = toml::from_str(&content).map_err(|e| AssetDumpError::Config {
            message: format!("Failed to parse config file {}: {}", path.display(), e),
        })?;

        Ok(config)
    }

    pub fn load_with_defaults<P: AsRef<Path>>(config_path: Option<P>) -> Result<Self> {
        match config_path {
            Some(path) => Self::load_from_file(path),
            None => {
                let default_paths = ["assetdump.toml", ".assetdump.toml"];

                for default_path in &default_paths {
                    if Path::new(default_path).exists() {
                        return Self::load_from_file(default_path);
                    }
                }

                Ok(Self::default())
            }
        }
    }

    pub fn merge_with_cli_args(&mut self, cli_args: &CliOverrides) {
        if let Some(ref output_dir) = cli_args.output_dir {
            self.output.base_directory = output_dir.clone();
        }

        if let Some(use_prefix) = cli_args.use_prefix {
            self.output.use_prefix = use_prefix;
        }

        if let Some(extract_unknown) = cli_args.extract_unknown {
            self.output.extract_unknown = extract_unknown;
        }

        if let Some(generate_report) = cli_args.generate_report {
            self.output.generate_report = generate_report;
        }

        if let Some(ref classes) = cli_args.classes {
            self.filters.class_patterns = classes
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect();
        }
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let content = toml::to_string_pretty(self).map_err(|e| AssetDumpError::Config {
            message: format!("Failed to serialize config: {}", e),
        })?;

        std::fs::write(path, content).map_err(|e| AssetDumpError::Config {
            message: format!("Failed to write config file {}: {}", path.display(), e),
        })?;

        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if self.naming.max_probes == 0 {
            return Err(AssetDumpError::Config {
                message: "Maximum name probes must be greater than 0".to_string(),
            });
        }

        if self.output.base_directory.as_os_str().is_empty() {
            return Err(AssetDumpError::Config {
                message: "Output directory must not be empty".to_string(),
            });
        }

        if let Some(parent) = self.output.base_directory.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                return Err(AssetDumpError::Config {
                    message: format!("Parent directory does not exist: {}", parent.display()),
                });
            }
        }

        self.filters.compile()?;

        Ok(())
    }

    pub fn create_sample_config() -> String {
        let sample_config = Self::default();
        toml::to_string_pretty(&sample_config).unwrap_or_else(|_| String::new())
    }
}

#[derive(Debug, Default)]
pub struct CliOverrides {
    pub output_dir: Option<PathBuf>,
    pub use_prefix: Option<bool>,
    pub extract_unknown: Option<bool>,
    pub generate_report: Option<bool>,
    pub classes: Option<String>,
}

impl CliOverrides {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_output_dir(mut self, output_dir: Option<PathBuf>) -> Self {
        self.output_dir = output_dir;
        self
    }

    pub fn with_use_prefix(mut self, use_prefix: Option<bool>) -> Self {
        self.use_prefix = use_prefix;
        self
    }

    pub fn with_extract_unknown(mut self, extract_unknown: Option<bool>) -> Self {
        self.extract_unknown = extract_unknown;
        self
    }

    pub fn with_generate_report(mut self, generate_report: Option<bool>) -> Self {
        self.generate_report = generate_report;
        self
    }

    pub fn with_classes(mut self, classes: Option<String>) -> Self {
        self.classes = classes;
        self
    }
}
