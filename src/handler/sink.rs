use crate::asset::{AssetFormat, AssetObject, AssetObjectPath};
use crate::error::AssetDumpError;
use crate::handler::{CategoryWriter, ExtractHandler, ObjectOutcome, WriteOutcome};
use crate::naming::{sanitize_name, NamingResolver};
use std::collections::HashSet;
use std::fs;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Naming and write service shared by every handler of one extraction session.
///
/// Owns the set of paths written so far. It is mutated through `&mut self`
/// only, so a sink cannot be driven by two extractions at once; a parallel
/// extractor would have to put the whole sink behind one lock to keep the
/// check-then-insert in the resolver atomic.
pub struct AssetSink {
    extract_dir: PathBuf,
    asset_format: Option<AssetFormat>,
    resolver: NamingResolver,
    known_dirs: HashSet<PathBuf>,
    buffer_size: usize,
}

impl AssetSink {
    pub fn new<P: Into<PathBuf>>(extract_dir: P) -> Self {
        Self {
            extract_dir: extract_dir.into(),
            asset_format: None,
            resolver: NamingResolver::new(),
            known_dirs: HashSet::new(),
            buffer_size: 64 * 1024, // 64KB buffer
        }
    }

    pub fn with_prefix(mut self, use_prefix: bool) -> Self {
        self.resolver.set_use_prefix(use_prefix);
        self
    }

    pub fn with_resolver(mut self, resolver: NamingResolver) -> Self {
        self.resolver = resolver;
        self
    }

    pub fn with_buffer_size(mut self, size: usize) -> Self {
        self.buffer_size = size.max(4096); // Minimum 4KB buffer
        self
    }

    /// Starts a new session: forgets written paths and known directories.
    pub fn reset(&mut self) {
        self.resolver.reset();
        self.known_dirs.clear();
    }

    pub fn extract_dir(&self) -> &Path {
        &self.extract_dir
    }

    pub fn set_extract_dir<P: Into<PathBuf>>(&mut self, extract_dir: P) {
        self.extract_dir = extract_dir.into();
    }

    pub fn asset_format(&self) -> Option<&AssetFormat> {
        self.asset_format.as_ref()
    }

    pub fn set_asset_format(&mut self, format: Option<AssetFormat>) {
        self.asset_format = format;
    }

    pub fn use_prefix(&self) -> bool {
        self.resolver.use_prefix()
    }

    pub fn set_use_prefix(&mut self, use_prefix: bool) {
        self.resolver.set_use_prefix(use_prefix);
    }

    pub fn written_count(&self) -> usize {
        self.resolver.len()
    }

    pub fn is_written(&self, path: &Path) -> bool {
        self.resolver.is_written(path)
    }

    /// Runs `handler` on one object and collects every write it made.
    pub fn extract(
        &mut self,
        handler: &dyn ExtractHandler,
        path: &AssetObjectPath,
        object: &AssetObject,
    ) -> ObjectOutcome {
        let mut writer = CategoryWriter::new(self, handler);
        let result = handler.extract(path, object, &mut writer);

        ObjectOutcome {
            writes: writer.into_outcomes(),
            error: result.err(),
        }
    }

    /// Directory for a category, created on first use in this session.
    pub fn category_dir(&mut self, class_name: &str) -> io::Result<PathBuf> {
        let dir = self.extract_dir.join(category_dir_name(class_name));

        if self.known_dirs.contains(&dir) {
            return Ok(dir);
        }

        match fs::create_dir(&dir) {
            Ok(()) => debug!("Created category directory {}", dir.display()),
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists && dir.is_dir() => {}
            Err(e) => return Err(e),
        }

        self.known_dirs.insert(dir.clone());
        Ok(dir)
    }

    /// Writes one payload under the category directory.
    ///
    /// Never fails: errors are logged and returned as [`WriteOutcome::Failed`].
    /// A path reserved for a failed write is not handed out again.
    pub fn write_file(
        &mut self,
        class_name: &str,
        default_ext: &str,
        data: &[u8],
        id: u64,
        name: Option<&str>,
        ext: Option<&str>,
    ) -> WriteOutcome {
        let dir = match self.category_dir(class_name) {
            Ok(dir) => dir,
            Err(e) => {
                let dir = self.extract_dir.join(category_dir_name(class_name));
                warn!("Failed creating directory {}: {}", dir.display(), e);
                dir
            }
        };

        let ext = ext.filter(|e| !e.is_empty()).unwrap_or(default_ext);

        let resolved = match self.resolver.resolve(&dir, id, name, ext) {
            Ok(resolved) => resolved,
            Err(error) => {
                warn!("Failed naming {} object {}: {}", class_name, id, error);
                return WriteOutcome::Failed { path: None, error };
            }
        };

        info!("Writing {} {}", class_name, resolved.file_name);

        match self.write_bytes(&resolved.path, data) {
            Ok(()) => WriteOutcome::Written {
                path: resolved.path,
                bytes: data.len() as u64,
            },
            Err(e) => {
                warn!("Failed writing {}: {}", resolved.path.display(), e);
                WriteOutcome::Failed {
                    path: Some(resolved.path),
                    error: AssetDumpError::Io(e),
                }
            }
        }
    }

    fn write_bytes(&self, path: &Path, data: &[u8]) -> io::Result<()> {
        let file = fs::File::create(path)?;
        let mut writer = BufWriter::with_capacity(self.buffer_size, file);
        writer.write_all(data)?;
        writer.flush()
    }
}

/// Category labels come from object data, so they go through the same
/// sanitizer as file names. Leading dots are escaped to keep `.`/`..` and
/// hidden directories out of the output root.
fn category_dir_name(class_name: &str) -> String {
    let name = sanitize_name(class_name);
    if name.is_empty() || name.starts_with('.') {
        format!("_{}", name)
    } else {
        name
    }
}
