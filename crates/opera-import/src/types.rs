//! Import result types

use opera_core::Result;
use opera_scene::{
    AlphaMode, ImageData, MaterialDesc, ModelBuilder, SamplerDesc, TextureDesc, TextureSlot,
};
use std::collections::BTreeMap;

/// Result of importing a file
#[derive(Debug)]
pub struct ImportResult {
    /// Decoded images, in document order
    pub images: Vec<ImportedImage>,
    /// Textures (image + sampler), in document order
    pub textures: Vec<ImportedTexture>,
    /// Materials, in document order
    pub materials: Vec<ImportedMaterial>,
    /// Every mesh primitive, flattened across meshes
    pub primitives: Vec<ImportedPrimitive>,
}

impl ImportResult {
    /// Number of primitives drawn with material `index`
    pub fn material_uses(&self, index: usize) -> usize {
        self.primitives
            .iter()
            .filter(|p| p.material_index == Some(index))
            .count()
    }

    /// Feed the imported asset into a [`ModelBuilder`]. Each primitive that
    /// uses a material adds one correlated instance of it.
    pub fn into_builder(self) -> Result<ModelBuilder> {
        let mut builder = ModelBuilder::new();

        for image in self.images {
            let mut data = ImageData::new(image.width, image.height, image.pixels);
            data.name = image.name;
            data.uri = image.uri;
            data.mime_type = image.mime_type;
            builder.add_image(data);
        }

        for texture in self.textures {
            builder.add_texture(TextureDesc {
                name: texture.name,
                image: texture.image_index,
                sampler: texture.sampler,
            })?;
        }

        for material in self.materials {
            builder.add_material(MaterialDesc {
                name: material.name,
                base_color_factor: material.base_color,
                metallic_factor: material.metallic,
                roughness_factor: material.roughness,
                emissive_factor: material.emissive,
                alpha_mode: material.alpha_mode,
                alpha_cutoff: material.alpha_cutoff,
                double_sided: material.double_sided,
                textures: material.textures,
            })?;
        }

        for primitive in &self.primitives {
            if let Some(index) = primitive.material_index {
                builder.add_material_instance(index)?;
            }
        }

        Ok(builder)
    }
}

/// A decoded image, converted to RGBA8
#[derive(Debug, Clone)]
pub struct ImportedImage {
    pub name: Option<String>,
    /// External URI; `None` for embedded images
    pub uri: Option<String>,
    pub mime_type: Option<String>,
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u8>,
}

/// An imported texture
#[derive(Debug, Clone)]
pub struct ImportedTexture {
    pub name: Option<String>,
    pub image_index: usize,
    pub sampler: SamplerDesc,
}

/// An imported PBR material
#[derive(Debug, Clone)]
pub struct ImportedMaterial {
    pub name: Option<String>,
    pub base_color: [f64; 4],
    pub metallic: f64,
    pub roughness: f64,
    pub emissive: [f64; 3],
    pub alpha_mode: AlphaMode,
    /// Authored cutoff. MASK materials without one get glTF's 0.5.
    pub alpha_cutoff: Option<f64>,
    pub double_sided: bool,
    pub textures: BTreeMap<TextureSlot, usize>,
}

/// One mesh primitive
#[derive(Debug, Clone)]
pub struct ImportedPrimitive {
    pub mesh_name: String,
    pub material_index: Option<usize>,
    pub vertex_count: usize,
}
