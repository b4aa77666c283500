use crate::asset::{AssetObject, AssetObjectPath};
use crate::error::Result;
use crate::handler::{CategoryWriter, ExtractHandler};

/// Text and binary blobs stored as `TextAsset` (`m_Script`).
pub struct TextAssetHandler;

impl ExtractHandler for TextAssetHandler {
    fn class_name(&self) -> &str {
        "TextAsset"
    }

    fn file_extension(&self) -> &str {
        "txt"
    }

    fn extract(
        &self,
        path: &AssetObjectPath,
        object: &AssetObject,
        out: &mut CategoryWriter<'_>,
    ) -> Result<()> {
        let script = object.bytes("m_Script")?;
        out.write_file(script, path.path_id, object.name());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::asset::FieldValue;
    use crate::handler::AssetSink;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_writes_script_as_text() {
        let temp_dir = TempDir::new().unwrap();
        let mut sink = AssetSink::new(temp_dir.path());

        let path = AssetObjectPath::new(3, "TextAsset");
        let object = AssetObject::new(&path)
            .with_field("m_Name", FieldValue::Text("credits".to_string()))
            .with_field("m_Script", FieldValue::Text("thanks".to_string()));

        let outcome = sink.extract(&TextAssetHandler, &path, &object);
        assert!(outcome.error.is_none());

        let written = temp_dir.path().join("TextAsset").join("credits.txt");
        assert_eq!(fs::read_to_string(written).unwrap(), "thanks");
    }

    #[test]
    fn test_missing_script_is_an_error() {
        let temp_dir = TempDir::new().unwrap();
        let mut sink = AssetSink::new(temp_dir.path());

        let path = AssetObjectPath::new(4, "TextAsset");
        let object = AssetObject::new(&path);

        let outcome = sink.extract(&TextAssetHandler, &path, &object);
        assert!(outcome.writes.is_empty());
        assert!(outcome.error.is_some());
    }
}
