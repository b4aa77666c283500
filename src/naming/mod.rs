pub mod resolver;
pub mod sanitizer;

pub use resolver::{NamingResolver, ResolvedFile, DEFAULT_MAX_PROBES, ID_WIDTH};
pub use sanitizer::{is_safe_name, sanitize_name};
