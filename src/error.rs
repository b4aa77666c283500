use thiserror::Error;

#[derive(Error, Debug)]
pub enum AssetDumpError {
    #[error("IO operation failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Invalid manifest {path}: {message}")]
    Manifest { path: String, message: String },

    #[error("Object {path_id} ({class_name}) has no usable field {field}")]
    MissingField {
        path_id: u64,
        class_name: String,
        field: String,
    },

    #[error("No free file name for {base}.{ext} after {probes} attempts")]
    NamingExhausted {
        base: String,
        ext: String,
        probes: u32,
    },

    #[error("Path validation failed: {path}")]
    InvalidPath { path: String },

    #[error("Permission denied: {path}")]
    Permission { path: String },

    #[error("Operation was cancelled by user")]
    Cancelled,
}

pub trait UserFriendlyError {
    fn user_message(&self) -> String;
    fn suggestion(&self) -> Option<String>;
}

impl UserFriendlyError for AssetDumpError {
    fn user_message(&self) -> String {
        match self {
            AssetDumpError::Config { message } => {
                format!("Configuration error: {}", message)
            }
            AssetDumpError::Manifest { path, message } => {
                format!("Could not read manifest {}: {}", path, message)
            }
            AssetDumpError::MissingField {
                path_id,
                class_name,
                field,
            } => {
                format!(
                    "{} object {} is missing field '{}'",
                    class_name, path_id, field
                )
            }
            AssetDumpError::NamingExhausted { base, ext, probes } => {
                format!(
                    "Gave up finding a unique name for {}.{} after {} attempts",
                    base, ext, probes
                )
            }
            AssetDumpError::InvalidPath { path } => {
                format!("Invalid file path: {}", path)
            }
            AssetDumpError::Permission { path } => {
                format!("Permission denied accessing: {}", path)
            }
            AssetDumpError::Cancelled => "Operation was cancelled by user".to_string(),
            _ => self.to_string(),
        }
    }

    fn suggestion(&self) -> Option<String> {
        match self {
            AssetDumpError::Config { .. } => Some(
                "Check your configuration file syntax and ensure all values are in range.".to_string()
            ),
            AssetDumpError::Manifest { .. } => Some(
                "Make sure the manifest is valid JSON and every referenced blob exists next to it.".to_string()
            ),
            AssetDumpError::NamingExhausted { .. } => Some(
                "Raise [naming] max_probes in the configuration or enable --prefix to spread names by id.".to_string()
            ),
            AssetDumpError::Permission { .. } => Some(
                "Ensure you have write permission for the output directory.".to_string()
            ),
            _ => None,
        }
    }
}

impl From<toml::de::Error> for AssetDumpError {
    fn from(error: toml::de::Error) -> Self {
        AssetDumpError::Config {
            message: error.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, AssetDumpError>;
