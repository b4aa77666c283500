use crate::asset::{AssetObject, AssetObjectPath};
use crate::error::Result;
use crate::handler::{CategoryWriter, ExtractHandler};

/// Engine major version from which clips are stored as FSB5 banks.
const FSB_BANK_VERSION: u32 = 5;

/// Audio clips, named after their container format.
///
/// Older assets record an FMOD sound type in `m_Type`; newer ones always
/// wrap the stream in an FSB5 bank.
pub struct AudioClipHandler;

impl AudioClipHandler {
    /// File extension for an FMOD sound type code.
    pub fn sound_type_extension(sound_type: i64) -> Option<&'static str> {
        match sound_type {
            1 => Some("aif"),
            6 => Some("flac"),
            10 => Some("it"),
            11 => Some("mid"),
            12 => Some("mod"),
            13 => Some("mp3"),
            14 => Some("ogg"),
            17 => Some("s3m"),
            20 => Some("wav"),
            21 => Some("xm"),
            22 => Some("xma"),
            24 => Some("m4a"),
            _ => None,
        }
    }
}

impl ExtractHandler for AudioClipHandler {
    fn class_name(&self) -> &str {
        "AudioClip"
    }

    fn extract(
        &self,
        path: &AssetObjectPath,
        object: &AssetObject,
        out: &mut CategoryWriter<'_>,
    ) -> Result<()> {
        let audio = object.bytes("m_AudioData")?;

        let ext = match out.asset_format() {
            Some(format) if format.version >= FSB_BANK_VERSION => Some("fsb"),
            _ => object
                .int("m_Type")
                .ok()
                .and_then(Self::sound_type_extension),
        };

        out.write_file_ext(audio, path.path_id, object.name(), ext);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::asset::{AssetFormat, FieldValue};
    use crate::handler::AssetSink;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn clip(path: &AssetObjectPath, sound_type: i64) -> AssetObject {
        AssetObject::new(path)
            .with_field("m_Name", FieldValue::Text("theme".to_string()))
            .with_field("m_Type", FieldValue::Int(sound_type))
            .with_field("m_AudioData", FieldValue::Bytes(b"OggS".to_vec()))
    }

    fn written_path(sink: &mut AssetSink, path: &AssetObjectPath, object: &AssetObject) -> PathBuf {
        let outcome = sink.extract(&AudioClipHandler, path, object);
        assert!(outcome.error.is_none());
        outcome.writes[0].path().unwrap().to_path_buf()
    }

    #[test]
    fn test_extension_from_sound_type() {
        let temp_dir = TempDir::new().unwrap();
        let mut sink = AssetSink::new(temp_dir.path());
        let path = AssetObjectPath::new(1, "AudioClip");

        let written = written_path(&mut sink, &path, &clip(&path, 14));
        assert!(written.ends_with("AudioClip/theme.ogg"));
    }

    #[test]
    fn test_unknown_sound_type_uses_default() {
        let temp_dir = TempDir::new().unwrap();
        let mut sink = AssetSink::new(temp_dir.path());
        let path = AssetObjectPath::new(1, "AudioClip");

        let written = written_path(&mut sink, &path, &clip(&path, 99));
        assert!(written.ends_with("AudioClip/theme.bin"));
    }

    #[test]
    fn test_newer_format_writes_fsb() {
        let temp_dir = TempDir::new().unwrap();
        let mut sink = AssetSink::new(temp_dir.path());
        sink.set_asset_format(Some(AssetFormat::new(5, "5.3.4f1")));
        let path = AssetObjectPath::new(1, "AudioClip");

        let written = written_path(&mut sink, &path, &clip(&path, 14));
        assert!(written.ends_with("AudioClip/theme.fsb"));
    }

    #[test]
    fn test_sound_type_table() {
        assert_eq!(AudioClipHandler::sound_type_extension(13), Some("mp3"));
        assert_eq!(AudioClipHandler::sound_type_extension(20), Some("wav"));
        assert_eq!(AudioClipHandler::sound_type_extension(0), None);
    }
}
