//! Building a loaded model's runtime objects and its correlation registry

use crate::correlated::{shared, CorrelatedObjects, Shared};
use crate::material::{check_non_negative, check_unit, AlphaMode, Material, TextureSlot};
use crate::registry::{CorrelationRegistry, Lifetime};
use crate::runtime::{ImageData, RuntimeMaterial, RuntimeTexture, Side};
use crate::texture::{MagFilter, MinFilter, Texture, WrapMode};
use opera_core::{OperaError, Result};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::rc::Rc;

/// Sampler settings of a texture description
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SamplerDesc {
    pub min_filter: MinFilter,
    pub mag_filter: MagFilter,
    pub wrap_s: WrapMode,
    pub wrap_t: WrapMode,
}

impl Default for SamplerDesc {
    fn default() -> Self {
        Self {
            min_filter: MinFilter::LinearMipmapLinear,
            mag_filter: MagFilter::Linear,
            wrap_s: WrapMode::Repeat,
            wrap_t: WrapMode::Repeat,
        }
    }
}

/// A texture as the asset describes it
#[derive(Debug, Clone, PartialEq)]
pub struct TextureDesc {
    pub name: Option<String>,
    /// Index into the builder's images
    pub image: usize,
    pub sampler: SamplerDesc,
}

impl TextureDesc {
    pub fn new(image: usize) -> Self {
        Self {
            name: None,
            image,
            sampler: SamplerDesc::default(),
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_sampler(mut self, sampler: SamplerDesc) -> Self {
        self.sampler = sampler;
        self
    }
}

/// A material as the asset describes it. Defaults follow glTF.
#[derive(Debug, Clone, PartialEq)]
pub struct MaterialDesc {
    pub name: Option<String>,
    pub base_color_factor: [f64; 4],
    pub metallic_factor: f64,
    pub roughness_factor: f64,
    pub emissive_factor: [f64; 3],
    pub alpha_mode: AlphaMode,
    pub alpha_cutoff: Option<f64>,
    pub double_sided: bool,
    /// Slot -> index into the builder's textures
    pub textures: BTreeMap<TextureSlot, usize>,
}

impl Default for MaterialDesc {
    fn default() -> Self {
        Self {
            name: None,
            base_color_factor: [1.0, 1.0, 1.0, 1.0],
            metallic_factor: 1.0,
            roughness_factor: 1.0,
            emissive_factor: [0.0, 0.0, 0.0],
            alpha_mode: AlphaMode::Opaque,
            alpha_cutoff: None,
            double_sided: false,
            textures: BTreeMap::new(),
        }
    }
}

impl MaterialDesc {
    pub fn with_texture(mut self, slot: TextureSlot, texture: usize) -> Self {
        self.textures.insert(slot, texture);
        self
    }

    fn validate(&self) -> Result<()> {
        for value in self.base_color_factor {
            check_unit("baseColorFactor", value)?;
        }
        check_unit("metallicFactor", self.metallic_factor)?;
        check_unit("roughnessFactor", self.roughness_factor)?;
        for value in self.emissive_factor {
            check_non_negative("emissiveFactor", value)?;
        }
        if let Some(cutoff) = self.alpha_cutoff {
            check_non_negative("alphaCutoff", cutoff)?;
        }
        Ok(())
    }
}

/// Collects an asset's images, textures and materials, then creates the
/// runtime objects and the registry that correlates them.
///
/// Each material gets one runtime instance per primitive that uses it
/// (`add_material_instance`), and at least one. Each texture gets one
/// runtime object per material that binds it, all sharing one image.
#[derive(Debug, Default)]
pub struct ModelBuilder {
    images: Vec<Rc<ImageData>>,
    textures: Vec<TextureDesc>,
    materials: Vec<MaterialDesc>,
    instances: Vec<usize>,
}

impl ModelBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_image(&mut self, image: ImageData) -> usize {
        self.images.push(Rc::new(image));
        self.images.len() - 1
    }

    pub fn add_texture(&mut self, texture: TextureDesc) -> Result<usize> {
        if texture.image >= self.images.len() {
            return Err(OperaError::ImportError(format!(
                "texture references missing image {}",
                texture.image
            )));
        }
        self.textures.push(texture);
        Ok(self.textures.len() - 1)
    }

    pub fn add_material(&mut self, material: MaterialDesc) -> Result<usize> {
        material.validate()?;
        if let Some((slot, index)) = material
            .textures
            .iter()
            .find(|(_, index)| **index >= self.textures.len())
        {
            return Err(OperaError::TextureNotFound(format!(
                "index {} bound to {}",
                index,
                slot.as_str()
            )));
        }
        self.materials.push(material);
        self.instances.push(0);
        Ok(self.materials.len() - 1)
    }

    /// Record one more primitive using `material`
    pub fn add_material_instance(&mut self, material: usize) -> Result<()> {
        let count = self
            .instances
            .get_mut(material)
            .ok_or_else(|| OperaError::MaterialNotFound(format!("index {}", material)))?;
        *count += 1;
        Ok(())
    }

    pub fn material_count(&self) -> usize {
        self.materials.len()
    }

    pub fn texture_count(&self) -> usize {
        self.textures.len()
    }

    /// Create the runtime objects. `generation` identifies the load.
    pub fn build(self, generation: u64) -> Result<Model> {
        let prototypes: Vec<RuntimeTexture> = self
            .textures
            .iter()
            .map(|desc| {
                let mut texture = RuntimeTexture::new(Rc::clone(&self.images[desc.image]));
                texture.name = desc.name.clone();
                texture.min_filter = desc.sampler.min_filter;
                texture.mag_filter = desc.sampler.mag_filter;
                texture.wrap_s = desc.sampler.wrap_s;
                texture.wrap_t = desc.sampler.wrap_t;
                texture
            })
            .collect();
        let mut texture_members: Vec<Vec<Shared<RuntimeTexture>>> =
            vec![Vec::new(); prototypes.len()];

        let mut material_sets = Vec::with_capacity(self.materials.len());
        for (index, desc) in self.materials.iter().enumerate() {
            // One runtime texture per (texture, material), shared by the
            // material's instances.
            let mut bound: HashMap<usize, Shared<RuntimeTexture>> = HashMap::new();
            for &texture in desc.textures.values() {
                bound.entry(texture).or_insert_with(|| {
                    let members = &mut texture_members[texture];
                    let object = if members.is_empty() {
                        shared(prototypes[texture].clone())
                    } else {
                        shared(prototypes[texture].duplicate())
                    };
                    members.push(Rc::clone(&object));
                    object
                });
            }

            let mut base = RuntimeMaterial {
                name: desc.name.clone(),
                color: desc.base_color_factor,
                metalness: desc.metallic_factor,
                roughness: desc.roughness_factor,
                emissive: desc.emissive_factor,
                side: if desc.double_sided {
                    Side::Double
                } else {
                    Side::Front
                },
                alpha_mode: desc.alpha_mode,
                alpha_cutoff: desc.alpha_cutoff,
                ..Default::default()
            };
            base.sync_alpha();
            for (&slot, texture) in &desc.textures {
                *base.slot_mut(slot) = bound.get(texture).cloned();
            }

            let count = self.instances[index].max(1);
            let mut members = Vec::with_capacity(count);
            for _ in 1..count {
                members.push(shared(base.duplicate()));
            }
            members.insert(0, shared(base));
            material_sets.push(CorrelatedObjects::new(
                members,
                &format!("material {}", index),
            )?);
        }

        let mut texture_sets = Vec::with_capacity(prototypes.len());
        for (index, (prototype, mut members)) in
            prototypes.into_iter().zip(texture_members).enumerate()
        {
            if members.is_empty() {
                members.push(shared(prototype));
            }
            texture_sets.push(CorrelatedObjects::new(
                members,
                &format!("texture {}", index),
            )?);
        }

        let registry =
            CorrelationRegistry::new(material_sets, texture_sets, Lifetime::new(generation));
        Ok(Model {
            registry: Rc::new(registry),
        })
    }
}

/// A loaded model: the entry point for scene-graph edits
pub struct Model {
    registry: Rc<CorrelationRegistry>,
}

impl Model {
    pub fn materials(&self) -> Vec<Material> {
        (0..self.registry.material_count())
            .filter_map(|index| Material::from_registry(&self.registry, index).ok())
            .collect()
    }

    pub fn material(&self, index: usize) -> Result<Material> {
        Material::from_registry(&self.registry, index)
    }

    /// First material with the given name
    pub fn material_by_name(&self, name: &str) -> Option<Material> {
        self.materials().into_iter().find(|m| m.name() == name)
    }

    pub fn textures(&self) -> Vec<Texture> {
        (0..self.registry.texture_count())
            .filter_map(|index| Texture::from_registry(&self.registry, index).ok())
            .collect()
    }

    pub fn texture(&self, index: usize) -> Result<Texture> {
        Texture::from_registry(&self.registry, index)
    }

    pub fn registry(&self) -> &CorrelationRegistry {
        &self.registry
    }

    /// False once a newer model has been loaded in its place
    pub fn is_valid(&self) -> bool {
        self.registry.lifetime().is_valid()
    }

    pub fn generation(&self) -> u64 {
        self.registry.lifetime().generation()
    }

    pub(crate) fn invalidate(&self) {
        self.registry.lifetime().invalidate();
    }
}
