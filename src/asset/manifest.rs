use crate::asset::{AssetFormat, AssetObject, AssetObjectPath, FieldValue};
use crate::error::{AssetDumpError, Result};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Objects already decoded by an upstream tool, listed in a JSON file.
///
/// ```json
/// { "format": { "version": 5, "revision": "5.3.4f1" },
///   "objects": [ { "path_id": 5, "class_name": "TextAsset",
///                  "fields": { "m_Name": "readme", "m_Script": { "blob": "readme.bin" } } } ] }
/// ```
///
/// Field values are integers, strings, `{ "blob": <path> }` (read relative to
/// the manifest) or `{ "hex": <digits> }`.
#[derive(Debug, Clone, Default)]
pub struct Manifest {
    pub format: Option<AssetFormat>,
    pub entries: Vec<ManifestEntry>,
}

#[derive(Debug, Clone)]
pub struct ManifestEntry {
    pub path: AssetObjectPath,
    pub object: AssetObject,
}

#[derive(Debug, Deserialize)]
struct RawManifest {
    #[serde(default)]
    format: Option<AssetFormat>,
    #[serde(default)]
    objects: Vec<RawEntry>,
}

#[derive(Debug, Deserialize)]
struct RawEntry {
    path_id: u64,
    #[serde(default)]
    class_id: i32,
    class_name: String,
    #[serde(default)]
    fields: BTreeMap<String, RawValue>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawValue {
    Int(i64),
    Text(String),
    Blob { blob: PathBuf },
    Hex { hex: String },
}

impl Manifest {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        let content = fs::read_to_string(path).map_err(|e| manifest_error(path, e))?;
        let base_dir = path.parent().unwrap_or_else(|| Path::new("."));

        Self::parse(&content, base_dir).map_err(|e| match e {
            AssetDumpError::Manifest { message, .. } => manifest_error(path, message),
            other => other,
        })
    }

    /// Parses manifest text, reading blobs relative to `base_dir`.
    pub fn parse(content: &str, base_dir: &Path) -> Result<Self> {
        let raw: RawManifest =
            serde_json::from_str(content).map_err(|e| manifest_error(base_dir, e))?;

        let mut entries = Vec::with_capacity(raw.objects.len());
        for raw_entry in raw.objects {
            let path = AssetObjectPath::new(raw_entry.path_id, raw_entry.class_name)
                .with_class_id(raw_entry.class_id);
            let mut object = AssetObject::new(&path);

            for (name, value) in raw_entry.fields {
                let value = resolve_value(value, base_dir).map_err(|message| {
                    manifest_error(
                        base_dir,
                        format!("object {} field {}: {}", path.path_id, name, message),
                    )
                })?;
                object.insert(name, value);
            }

            entries.push(ManifestEntry { path, object });
        }

        Ok(Self {
            format: raw.format,
            entries,
        })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Object counts per class name, sorted by name.
    pub fn class_counts(&self) -> BTreeMap<String, usize> {
        let mut counts = BTreeMap::new();
        for entry in &self.entries {
            *counts.entry(entry.path.class_name.clone()).or_insert(0) += 1;
        }
        counts
    }
}

fn resolve_value(value: RawValue, base_dir: &Path) -> std::result::Result<FieldValue, String> {
    match value {
        RawValue::Int(value) => Ok(FieldValue::Int(value)),
        RawValue::Text(value) => Ok(FieldValue::Text(value)),
        RawValue::Hex { hex } => hex::decode(hex.trim())
            .map(FieldValue::Bytes)
            .map_err(|e| format!("invalid hex: {}", e)),
        RawValue::Blob { blob } => {
            let blob_path = base_dir.join(&blob);
            fs::read(&blob_path)
                .map(FieldValue::Bytes)
                .map_err(|e| format!("cannot read blob {}: {}", blob_path.display(), e))
        }
    }
}

fn manifest_error<M: ToString>(path: &Path, message: M) -> AssetDumpError {
    AssetDumpError::Manifest {
        path: path.display().to_string(),
        message: message.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_parse_inline_values() {
        let content = r#"{
            "format": { "version": 4, "revision": "4.7.2f1" },
            "objects": [
                { "path_id": 1, "class_id": 49, "class_name": "TextAsset",
                  "fields": { "m_Name": "readme", "m_Script": "hello" } },
                { "path_id": 2, "class_name": "AudioClip",
                  "fields": { "m_Type": 14, "m_AudioData": { "hex": "4f676753" } } }
            ]
        }"#;

        let manifest = Manifest::parse(content, Path::new(".")).unwrap();
        assert_eq!(manifest.len(), 2);
        assert_eq!(manifest.format, Some(AssetFormat::new(4, "4.7.2f1")));

        let text = &manifest.entries[0];
        assert_eq!(text.path.class_id, 49);
        assert_eq!(text.object.name(), Some("readme"));

        let audio = &manifest.entries[1];
        assert_eq!(audio.object.int("m_Type").unwrap(), 14);
        assert_eq!(audio.object.bytes("m_AudioData").unwrap(), b"OggS");
    }

    #[test]
    fn test_blob_relative_to_manifest() {
        let temp_dir = TempDir::new().unwrap();
        fs::create_dir(temp_dir.path().join("blobs")).unwrap();
        fs::write(temp_dir.path().join("blobs/font.bin"), [0u8, 1, 0, 0]).unwrap();

        let manifest_path = temp_dir.path().join("objects.json");
        fs::write(
            &manifest_path,
            r#"{ "objects": [ { "path_id": 9, "class_name": "Font",
                 "fields": { "m_FontData": { "blob": "blobs/font.bin" } } } ] }"#,
        )
        .unwrap();

        let manifest = Manifest::load(&manifest_path).unwrap();
        assert!(manifest.format.is_none());
        assert_eq!(
            manifest.entries[0].object.bytes("m_FontData").unwrap(),
            &[0, 1, 0, 0]
        );
    }

    #[test]
    fn test_missing_blob_is_manifest_error() {
        let temp_dir = TempDir::new().unwrap();
        let manifest_path = temp_dir.path().join("objects.json");
        fs::write(
            &manifest_path,
            r#"{ "objects": [ { "path_id": 1, "class_name": "Font",
                 "fields": { "m_FontData": { "blob": "nope.bin" } } } ] }"#,
        )
        .unwrap();

        match Manifest::load(&manifest_path) {
            Err(AssetDumpError::Manifest { path, message }) => {
                assert!(path.ends_with("objects.json"));
                assert!(message.contains("m_FontData"));
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_invalid_json() {
        let result = Manifest::parse("{ not json", Path::new("."));
        assert!(matches!(result, Err(AssetDumpError::Manifest { .. })));
    }

    #[test]
    fn test_invalid_hex() {
        let content = r#"{ "objects": [ { "path_id": 1, "class_name": "Shader",
            "fields": { "m_Script": { "hex": "zz" } } } ] }"#;
        assert!(Manifest::parse(content, Path::new(".")).is_err());
    }

    #[test]
    fn test_class_counts() {
        let content = r#"{ "objects": [
            { "path_id": 1, "class_name": "Shader" },
            { "path_id": 2, "class_name": "Font" },
            { "path_id": 3, "class_name": "Shader" } ] }"#;
        let manifest = Manifest::parse(content, Path::new(".")).unwrap();

        let counts = manifest.class_counts();
        assert_eq!(counts.get("Shader"), Some(&2));
        assert_eq!(counts.get("Font"), Some(&1));
    }
}
