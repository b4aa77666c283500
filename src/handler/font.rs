use crate::asset::{AssetObject, AssetObjectPath};
use crate::error::Result;
use crate::handler::{CategoryWriter, ExtractHandler};

/// Embedded TrueType data of dynamic fonts.
///
/// Bitmap-only fonts have an empty `m_FontData`; those are reported as
/// missing instead of producing empty files.
pub struct FontHandler;

impl ExtractHandler for FontHandler {
    fn class_name(&self) -> &str {
        "Font"
    }

    fn file_extension(&self) -> &str {
        "ttf"
    }

    fn extract(
        &self,
        path: &AssetObjectPath,
        object: &AssetObject,
        out: &mut CategoryWriter<'_>,
    ) -> Result<()> {
        let font_data = object.bytes("m_FontData")?;
        if font_data.is_empty() {
            return Err(object.missing("m_FontData"));
        }

        out.write_file(font_data, path.path_id, object.name());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::asset::FieldValue;
    use crate::error::AssetDumpError;
    use crate::handler::AssetSink;
    use tempfile::TempDir;

    #[test]
    fn test_empty_font_data_is_skipped() {
        let temp_dir = TempDir::new().unwrap();
        let mut sink = AssetSink::new(temp_dir.path());

        let path = AssetObjectPath::new(8, "Font");
        let object = AssetObject::new(&path)
            .with_field("m_Name", FieldValue::Text("pixel".to_string()))
            .with_field("m_FontData", FieldValue::Bytes(Vec::new()));

        let outcome = sink.extract(&FontHandler, &path, &object);
        assert!(outcome.writes.is_empty());
        assert!(matches!(outcome.error, Some(AssetDumpError::MissingField { .. })));
        assert!(!temp_dir.path().join("Font").exists());
    }

    #[test]
    fn test_font_written_as_ttf() {
        let temp_dir = TempDir::new().unwrap();
        let mut sink = AssetSink::new(temp_dir.path());

        let path = AssetObjectPath::new(9, "Font");
        let object = AssetObject::new(&path)
            .with_field("m_Name", FieldValue::Text("Arial Bold".to_string()))
            .with_field("m_FontData", FieldValue::Bytes(vec![0, 1, 0, 0]));

        sink.extract(&FontHandler, &path, &object);
        assert!(temp_dir.path().join("Font").join("Arial_Bold.ttf").exists());
    }
}
