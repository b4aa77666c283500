pub mod manifest;
pub mod object;

pub use manifest::{Manifest, ManifestEntry};
pub use object::{AssetFormat, AssetObject, AssetObjectPath, FieldValue};
