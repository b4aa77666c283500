use crate::asset::{AssetObject, AssetObjectPath};
use crate::error::Result;
use crate::handler::{CategoryWriter, ExtractHandler};

/// Movie textures carry an Ogg Theora stream in `m_MovieData`.
pub struct MovieTextureHandler;

impl ExtractHandler for MovieTextureHandler {
    fn class_name(&self) -> &str {
        "MovieTexture"
    }

    fn file_extension(&self) -> &str {
        "ogv"
    }

    fn extract(
        &self,
        path: &AssetObjectPath,
        object: &AssetObject,
        out: &mut CategoryWriter<'_>,
    ) -> Result<()> {
        let movie = object.bytes("m_MovieData")?;
        out.write_file(movie, path.path_id, object.name());
        Ok(())
    }
}
