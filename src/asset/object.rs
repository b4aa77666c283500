use crate::error::{AssetDumpError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Identifies one object inside a decoded asset file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetObjectPath {
    pub path_id: u64,
    #[serde(default)]
    pub class_id: i32,
    pub class_name: String,
}

impl AssetObjectPath {
    pub fn new<S: Into<String>>(path_id: u64, class_name: S) -> Self {
        Self {
            path_id,
            class_id: 0,
            class_name: class_name.into(),
        }
    }

    pub fn with_class_id(mut self, class_id: i32) -> Self {
        self.class_id = class_id;
        self
    }
}

/// Format and engine version of the asset file an object came from.
///
/// Handlers may consult it to pick field layouts; naming never does.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetFormat {
    pub version: u32,
    #[serde(default)]
    pub revision: String,
}

impl AssetFormat {
    pub fn new<S: Into<String>>(version: u32, revision: S) -> Self {
        Self {
            version,
            revision: revision.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    Int(i64),
    Text(String),
    Bytes(Vec<u8>),
}

/// A decoded object: named fields as produced by the deserializer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AssetObject {
    path_id: u64,
    class_name: String,
    fields: BTreeMap<String, FieldValue>,
}

impl AssetObject {
    pub fn new(path: &AssetObjectPath) -> Self {
        Self {
            path_id: path.path_id,
            class_name: path.class_name.clone(),
            fields: BTreeMap::new(),
        }
    }

    pub fn with_field<S: Into<String>>(mut self, name: S, value: FieldValue) -> Self {
        self.fields.insert(name.into(), value);
        self
    }

    pub fn insert<S: Into<String>>(&mut self, name: S, value: FieldValue) {
        self.fields.insert(name.into(), value);
    }

    pub fn get(&self, field: &str) -> Option<&FieldValue> {
        self.fields.get(field)
    }

    pub fn fields(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Display name from `m_Name`, if the object has one.
    pub fn name(&self) -> Option<&str> {
        match self.fields.get("m_Name") {
            Some(FieldValue::Text(name)) => Some(name.as_str()),
            _ => None,
        }
    }

    pub fn int(&self, field: &str) -> Result<i64> {
        match self.fields.get(field) {
            Some(FieldValue::Int(value)) => Ok(*value),
            _ => Err(self.missing(field)),
        }
    }

    pub fn text(&self, field: &str) -> Result<&str> {
        match self.fields.get(field) {
            Some(FieldValue::Text(value)) => Ok(value.as_str()),
            _ => Err(self.missing(field)),
        }
    }

    /// Raw bytes of a field. Text fields are returned as their UTF-8 bytes.
    pub fn bytes(&self, field: &str) -> Result<&[u8]> {
        match self.fields.get(field) {
            Some(FieldValue::Bytes(value)) => Ok(value.as_slice()),
            Some(FieldValue::Text(value)) => Ok(value.as_bytes()),
            _ => Err(self.missing(field)),
        }
    }

    pub fn missing(&self, field: &str) -> AssetDumpError {
        AssetDumpError::MissingField {
            path_id: self.path_id,
            class_name: self.class_name.clone(),
            field: field.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> AssetObject {
        AssetObject::new(&AssetObjectPath::new(3, "TextAsset"))
            .with_field("m_Name", FieldValue::Text("readme".to_string()))
            .with_field("m_Script", FieldValue::Text("hello".to_string()))
            .with_field("m_Data", FieldValue::Bytes(vec![1, 2, 3]))
            .with_field("m_Type", FieldValue::Int(14))
    }

    #[test]
    fn test_typed_accessors() {
        let object = sample();
        assert_eq!(object.name(), Some("readme"));
        assert_eq!(object.text("m_Script").unwrap(), "hello");
        assert_eq!(object.bytes("m_Data").unwrap(), &[1, 2, 3]);
        assert_eq!(object.bytes("m_Script").unwrap(), b"hello");
        assert_eq!(object.int("m_Type").unwrap(), 14);
    }

    #[test]
    fn test_missing_field_reports_object() {
        let object = sample();
        match object.bytes("m_AudioData") {
            Err(AssetDumpError::MissingField {
                path_id,
                class_name,
                field,
            }) => {
                assert_eq!(path_id, 3);
                assert_eq!(class_name, "TextAsset");
                assert_eq!(field, "m_AudioData");
            }
            other => panic!("unexpected result: {:?}", other),
        }

        assert!(object.int("m_Name").is_err());
    }

    #[test]
    fn test_unnamed_object() {
        let object = AssetObject::new(&AssetObjectPath::new(1, "Shader"))
            .with_field("m_Name", FieldValue::Int(0));
        assert_eq!(object.name(), None);
    }
}
