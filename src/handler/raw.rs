use crate::asset::{AssetObject, AssetObjectPath, FieldValue};
use crate::error::Result;
use crate::handler::{CategoryWriter, ExtractHandler};
use crate::naming::ID_WIDTH;
use tracing::debug;

/// Fallback for classes without a dedicated handler: every byte field of
/// the object becomes its own file.
pub struct RawHandler {
    class_name: String,
}

impl RawHandler {
    pub fn new<S: Into<String>>(class_name: S) -> Self {
        Self {
            class_name: class_name.into(),
        }
    }
}

impl ExtractHandler for RawHandler {
    fn class_name(&self) -> &str {
        &self.class_name
    }

    fn extract(
        &self,
        path: &AssetObjectPath,
        object: &AssetObject,
        out: &mut CategoryWriter<'_>,
    ) -> Result<()> {
        let mut written = 0;

        for (field, value) in object.fields() {
            let FieldValue::Bytes(data) = value else {
                continue;
            };

            let name = match object.name() {
                Some(name) if !name.is_empty() => format!("{}_{}", name, field),
                _ => format!("{:0width$}_{}", path.path_id, field, width = ID_WIDTH),
            };

            out.write_file(data, path.path_id, Some(&name));
            written += 1;
        }

        if written == 0 {
            debug!(
                "{} object {} has no byte fields to write",
                self.class_name, path.path_id
            );
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handler::AssetSink;
    use tempfile::TempDir;

    #[test]
    fn test_one_file_per_byte_field() {
        let temp_dir = TempDir::new().unwrap();
        let mut sink = AssetSink::new(temp_dir.path());

        let path = AssetObjectPath::new(21, "SubstanceArchive");
        let object = AssetObject::new(&path)
            .with_field("m_Name", FieldValue::Text("rock".to_string()))
            .with_field("m_PackageData", FieldValue::Bytes(vec![1, 2]))
            .with_field("m_Thumbnail", FieldValue::Bytes(vec![3]))
            .with_field("m_Flags", FieldValue::Int(4));

        let handler = RawHandler::new("SubstanceArchive");
        let outcome = sink.extract(&handler, &path, &object);
        assert_eq!(outcome.written().count(), 2);

        let dir = temp_dir.path().join("SubstanceArchive");
        assert!(dir.join("rock_m_PackageData.bin").exists());
        assert!(dir.join("rock_m_Thumbnail.bin").exists());
    }

    #[test]
    fn test_unnamed_object_uses_id() {
        let temp_dir = TempDir::new().unwrap();
        let mut sink = AssetSink::new(temp_dir.path());

        let path = AssetObjectPath::new(3, "Unknown");
        let object = AssetObject::new(&path).with_field("m_Data", FieldValue::Bytes(vec![0]));

        sink.extract(&RawHandler::new("Unknown"), &path, &object);
        assert!(temp_dir.path().join("Unknown").join("000003_m_Data.bin").exists());
    }

    #[test]
    fn test_no_byte_fields_writes_nothing() {
        let temp_dir = TempDir::new().unwrap();
        let mut sink = AssetSink::new(temp_dir.path());

        let path = AssetObjectPath::new(3, "GameObject");
        let object = AssetObject::new(&path).with_field("m_Layer", FieldValue::Int(0));

        let outcome = sink.extract(&RawHandler::new("GameObject"), &path, &object);
        assert!(outcome.writes.is_empty());
        assert!(outcome.error.is_none());
    }
}
