use crate::asset::{AssetObject, AssetObjectPath, Manifest};
use crate::config::Config;
use crate::error::Result;
use crate::handler::{
    AssetSink, ExtractHandler, HandlerRegistry, ObjectOutcome, RawHandler, WriteOutcome,
};
use crate::naming::NamingResolver;
use crate::ui::GracefulShutdown;
use regex::Regex;
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::time::{Duration, Instant};
use tracing::{debug, warn};

#[derive(Debug, Clone)]
pub struct ExtractionProgress {
    pub objects_processed: usize,
    pub total_objects: usize,
    pub objects_skipped: usize,
    pub files_written: usize,
    pub failed_writes: usize,
    pub bytes_written: u64,
    pub current_object: Option<String>,
    pub start_time: Instant,
    pub errors: Vec<String>,
    pub files_by_category: BTreeMap<String, usize>,
    pub written_files: Vec<PathBuf>,
}

impl ExtractionProgress {
    pub fn new(total_objects: usize) -> Self {
        Self {
            objects_processed: 0,
            total_objects,
            objects_skipped: 0,
            files_written: 0,
            failed_writes: 0,
            bytes_written: 0,
            current_object: None,
            start_time: Instant::now(),
            errors: Vec::new(),
            files_by_category: BTreeMap::new(),
            written_files: Vec::new(),
        }
    }

    pub fn record(&mut self, path: &AssetObjectPath, outcome: ObjectOutcome) {
        self.objects_processed += 1;

        for write in outcome.writes {
            match write {
                WriteOutcome::Written { path: file, bytes } => {
                    self.files_written += 1;
                    self.bytes_written += bytes;
                    *self
                        .files_by_category
                        .entry(path.class_name.clone())
                        .or_insert(0) += 1;
                    self.written_files.push(file);
                }
                WriteOutcome::Failed { path: file, error } => {
                    self.failed_writes += 1;
                    let target = match file {
                        Some(file) => file.display().to_string(),
                        None => format!("{} object {}", path.class_name, path.path_id),
                    };
                    self.add_error(format!("Failed writing {}: {}", target, error));
                }
            }
        }

        if let Some(error) = outcome.error {
            self.add_error(format!(
                "Failed extracting {} object {}: {}",
                path.class_name, path.path_id, error
            ));
        }
    }

    pub fn skip(&mut self) {
        self.objects_processed += 1;
        self.objects_skipped += 1;
    }

    pub fn add_error<S: Into<String>>(&mut self, error: S) {
        self.errors.push(error.into());
    }

    pub fn has_failures(&self) -> bool {
        !self.errors.is_empty()
    }

    pub fn percentage(&self) -> f64 {
        if self.total_objects == 0 {
            0.0
        } else {
            (self.objects_processed as f64 / self.total_objects as f64) * 100.0
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.start_time.elapsed()
    }

    pub fn estimated_remaining(&self) -> Duration {
        if self.objects_processed == 0 {
            return Duration::from_secs(0);
        }

        let rate = self.objects_processed as f64 / self.elapsed().as_secs_f64();
        let remaining = self.total_objects.saturating_sub(self.objects_processed);

        if rate > 0.0 && rate.is_finite() {
            Duration::from_secs_f64(remaining as f64 / rate)
        } else {
            Duration::from_secs(0)
        }
    }
}

/// Drives a batch of decoded objects through their handlers into one sink.
pub struct ExtractionSession {
    registry: HandlerRegistry,
    sink: AssetSink,
    class_filter: Vec<Regex>,
    extract_unknown: bool,
}

impl ExtractionSession {
    pub fn new(sink: AssetSink) -> Self {
        Self {
            registry: HandlerRegistry::with_defaults(),
            sink,
            class_filter: Vec::new(),
            extract_unknown: false,
        }
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        let resolver = NamingResolver::new()
            .with_prefix(config.output.use_prefix)
            .with_case_insensitive(config.naming.case_insensitive)
            .with_max_probes(config.naming.max_probes);
        let sink = AssetSink::new(&config.output.base_directory).with_resolver(resolver);

        Ok(Self::new(sink)
            .with_class_filter(config.filters.compile()?)
            .with_extract_unknown(config.output.extract_unknown))
    }

    pub fn with_registry(mut self, registry: HandlerRegistry) -> Self {
        self.registry = registry;
        self
    }

    pub fn with_class_filter(mut self, patterns: Vec<Regex>) -> Self {
        self.class_filter = patterns;
        self
    }

    pub fn with_extract_unknown(mut self, extract_unknown: bool) -> Self {
        self.extract_unknown = extract_unknown;
        self
    }

    pub fn sink(&self) -> &AssetSink {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut AssetSink {
        &mut self.sink
    }

    pub fn registry(&self) -> &HandlerRegistry {
        &self.registry
    }

    pub fn accepts(&self, class_name: &str) -> bool {
        self.class_filter.is_empty() || self.class_filter.iter().any(|p| p.is_match(class_name))
    }

    /// Whether an object of `class_name` would be handed to a handler.
    pub fn would_extract(&self, class_name: &str) -> bool {
        self.accepts(class_name) && (self.extract_unknown || self.registry.contains(class_name))
    }

    /// Extracts every manifest entry as one session.
    ///
    /// The sink is reset first. Individual object or write failures are
    /// recorded in the returned progress; only cancellation aborts the run.
    pub fn run(
        &mut self,
        manifest: &Manifest,
        progress_callback: Option<&dyn Fn(&ExtractionProgress)>,
        shutdown: Option<&GracefulShutdown>,
    ) -> Result<ExtractionProgress> {
        self.sink.reset();
        self.sink.set_asset_format(manifest.format.clone());

        let mut progress = ExtractionProgress::new(manifest.len());

        for entry in &manifest.entries {
            if let Some(shutdown) = shutdown {
                shutdown.check_shutdown()?;
            }

            progress.current_object = Some(format!(
                "{} {}",
                entry.path.class_name, entry.path.path_id
            ));

            match self.extract_object(&entry.path, &entry.object) {
                Some(outcome) => progress.record(&entry.path, outcome),
                None => progress.skip(),
            }

            if let Some(callback) = progress_callback {
                callback(&progress);
            }
        }

        Ok(progress)
    }

    /// Extracts one object. Returns `None` when the object was skipped.
    pub fn extract_object(
        &mut self,
        path: &AssetObjectPath,
        object: &AssetObject,
    ) -> Option<ObjectOutcome> {
        if !self.accepts(&path.class_name) {
            debug!("Skipping filtered {} object {}", path.class_name, path.path_id);
            return None;
        }

        let fallback;
        let handler: &dyn ExtractHandler = match self.registry.get(&path.class_name) {
            Some(handler) => handler,
            None if self.extract_unknown => {
                fallback = RawHandler::new(path.class_name.clone());
                &fallback
            }
            None => {
                debug!("No handler for {} object {}", path.class_name, path.path_id);
                return None;
            }
        };

        let outcome = self.sink.extract(handler, path, object);

        if let Some(ref error) = outcome.error {
            warn!(
                "Failed extracting {} object {}: {}",
                path.class_name, path.path_id, error
            );
        }

        Some(outcome)
    }
}
