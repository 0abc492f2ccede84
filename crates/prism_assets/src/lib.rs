pub mod assets;
pub mod cube;
pub mod gltf_loader;
pub mod material;
pub mod scene;
pub mod texture_file;

pub use assets::{Handle, MeshData, Vertex};
pub use material::{MaterialData, MaterialSettings, TextureData, TextureFormat};
pub use scene::{MeshInstanceDesc, SceneData, SceneNode, ScenePayload};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AssetError {
    #[error("failed to import glTF: {0}")]
    Gltf(#[from] gltf::Error),
    #[error("failed to decode image '{name}': {source}")]
    ImageDecode {
        name: String,
        source: image::ImageError,
    },
    #[error("texture '{name}' uses unsupported pixel format {format}")]
    UnsupportedTextureFormat { name: String, format: String },
    #[error("mesh '{0}' has no positions")]
    MissingPositions(String),
    #[error("mesh '{0}' has no indices")]
    MissingIndices(String),
    #[error("scene is inconsistent: {0}")]
    InvalidScene(String),
}
