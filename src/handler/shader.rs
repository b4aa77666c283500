use crate::asset::{AssetObject, AssetObjectPath};
use crate::error::Result;
use crate::handler::{CategoryWriter, ExtractHandler};

pub struct ShaderHandler;

impl ExtractHandler for ShaderHandler {
    fn class_name(&self) -> &str {
        "Shader"
    }

    fn file_extension(&self) -> &str {
        "shader"
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
