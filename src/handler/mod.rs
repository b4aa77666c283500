pub mod audio_clip;
pub mod font;
pub mod movie_texture;
pub mod raw;
pub mod registry;
pub mod shader;
pub mod sink;
pub mod text_asset;

pub use audio_clip::AudioClipHandler;
pub use font::FontHandler;
pub use movie_texture::MovieTextureHandler;
pub use raw::RawHandler;
pub use registry::HandlerRegistry;
pub use shader::ShaderHandler;
pub use sink::AssetSink;
pub use text_asset::TextAssetHandler;

use crate::asset::{AssetFormat, AssetObject, AssetObjectPath};
use crate::error::{AssetDumpError, Result};
use std::path::{Path, PathBuf};

/// Extension used when neither the handler nor the call names one.
pub const DEFAULT_EXTENSION: &str = "bin";

/// One object category the extractor knows how to write out.
///
/// Implementations turn a decoded object into byte payloads and hand them to
/// the [`CategoryWriter`]; naming, directory layout and collision handling
/// are done by the shared [`AssetSink`] behind it.
pub trait ExtractHandler {
    /// Category label, also used as the output subdirectory name.
    fn class_name(&self) -> &str;

    fn file_extension(&self) -> &str {
        DEFAULT_EXTENSION
    }

    fn extract(
        &self,
        path: &AssetObjectPath,
        object: &AssetObject,
        out: &mut CategoryWriter<'_>,
    ) -> Result<()>;
}

/// Result of a single write request.
#[derive(Debug)]
pub enum WriteOutcome {
    Written {
        path: PathBuf,
        bytes: u64,
    },
    /// The object could not be written. `path` is the reserved destination
    /// when naming succeeded; it stays reserved for the rest of the session.
    Failed {
        path: Option<PathBuf>,
        error: AssetDumpError,
    },
}

impl WriteOutcome {
    pub fn is_written(&self) -> bool {
        matches!(self, WriteOutcome::Written { .. })
    }

    pub fn path(&self) -> Option<&Path> {
        match self {
            WriteOutcome::Written { path, .. } => Some(path),
            WriteOutcome::Failed { path, .. } => path.as_deref(),
        }
    }

    pub fn bytes(&self) -> u64 {
        match self {
            WriteOutcome::Written { bytes, .. } => *bytes,
            WriteOutcome::Failed { .. } => 0,
        }
    }
}

/// Everything that happened while extracting one object.
#[derive(Debug, Default)]
pub struct ObjectOutcome {
    pub writes: Vec<WriteOutcome>,
    /// Set when the handler gave up on the object.
    pub error: Option<AssetDumpError>,
}

impl ObjectOutcome {
    pub fn written(&self) -> impl Iterator<Item = &WriteOutcome> {
        self.writes.iter().filter(|w| w.is_written())
    }

    pub fn failures(&self) -> impl Iterator<Item = &WriteOutcome> {
        self.writes.iter().filter(|w| !w.is_written())
    }
}

/// Write access to the sink bound to one handler's category and default
/// extension.
pub struct CategoryWriter<'a> {
    sink: &'a mut AssetSink,
    class_name: &'a str,
    default_ext: &'a str,
    outcomes: Vec<WriteOutcome>,
}

impl<'a> CategoryWriter<'a> {
    pub fn new(sink: &'a mut AssetSink, handler: &'a dyn ExtractHandler) -> Self {
        Self {
            sink,
            class_name: handler.class_name(),
            default_ext: handler.file_extension(),
            outcomes: Vec::new(),
        }
    }

    pub fn class_name(&self) -> &str {
        self.class_name
    }

    pub fn asset_format(&self) -> Option<&AssetFormat> {
        self.sink.asset_format()
    }

    pub fn write_file(&mut self, data: &[u8], id: u64, name: Option<&str>) -> &WriteOutcome {
        self.write_file_ext(data, id, name, None)
    }

    pub fn write_file_ext(
        &mut self,
        data: &[u8],
        id: u64,
        name: Option<&str>,
        ext: Option<&str>,
    ) -> &WriteOutcome {
        let outcome = self
            .sink
            .write_file(self.class_name, self.default_ext, data, id, name, ext);
        self.outcomes.push(outcome);
        &self.outcomes[self.outcomes.len() - 1]
    }

    pub fn into_outcomes(self) -> Vec<WriteOutcome> {
        self.outcomes
    }
}
