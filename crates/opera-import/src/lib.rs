//! Opera Import - Asset importers
//!
//! Reads glTF/GLB documents into an [`ImportResult`] that feeds a
//! [`opera_scene::ModelBuilder`], and decodes standalone image files for
//! textures created at runtime.

mod gltf_import;
mod types;

pub use gltf_import::{decode_texture_image, import_gltf, import_gltf_slice, load_texture_image};
pub use types::{
    ImportResult, ImportedImage, ImportedMaterial, ImportedPrimitive, ImportedTexture,
};
