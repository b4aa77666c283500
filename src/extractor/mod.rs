pub mod output_manager;
pub mod session;

pub use output_manager::{ConfigSnapshot, ExtractionReport, OutputManager};
pub use session::{ExtractionProgress, ExtractionSession};
