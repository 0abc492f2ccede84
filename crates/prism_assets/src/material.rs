use crate::assets::Handle;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TextureFormat {
    Rgba8Unorm,     // Standard 32-bit color (0-255)
    Rgba8UnormSrgb, // Same, sampled through the sRGB curve (base color maps)
}

#[derive(Clone, Debug)]
pub struct TextureData {
    pub name: String,
    pub pixels: Vec<u8>,
    pub width: u32,
    pub height: u32,
    pub format: TextureFormat,
}

impl TextureData {
    /// 1x1 opaque white. Used as the table's null slot and as the material
    /// fallback when a texture reference cannot be resolved.
    pub fn white_pixel() -> Self {
        Self {
            name: "White Pixel".to_string(),
            pixels: vec![255, 255, 255, 255],
            width: 1,
            height: 1,
            format: TextureFormat::Rgba8Unorm,
        }
    }
}

#[derive(Clone, Debug)]
pub struct MaterialSettings {
    pub base_color: [f32; 4],
    pub roughness: f32,
    pub metallic: f32,
}

impl Default for MaterialSettings {
    fn default() -> Self {
        Self {
            base_color: [1.0, 1.0, 1.0, 1.0],
            roughness: 0.5,
            metallic: 0.0,
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct MaterialData {
    pub settings: MaterialSettings,
    pub diffuse_texture: Option<Handle<TextureData>>,
    pub normal_texture: Option<Handle<TextureData>>,
    pub metallic_roughness_texture: Option<Handle<TextureData>>,
}
