use std::path::Path;

use crate::{
    AssetError,
    material::{TextureData, TextureFormat},
};

/// Loads a standalone image file (PNG/JPEG) as an sRGB texture.
/// Used by the cube demo path for its logo texture.
pub fn load_texture(path: &Path) -> Result<TextureData, AssetError> {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());

    let img = image::open(path)
        .map_err(|source| AssetError::ImageDecode {
            name: name.clone(),
            source,
        })?
        .to_rgba8();

    let width = img.width();
    let height = img.height();

    Ok(TextureData {
        name,
        pixels: img.into_raw(),
        width,
        height,
        format: TextureFormat::Rgba8UnormSrgb,
    })
}
