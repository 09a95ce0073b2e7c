//! Editable material entities
//!
//! A [`Material`] is a handle to every runtime material correlated with one
//! glTF material. Setters validate their input, check that the model is
//! still live, then write all correlated objects. Getters read the first.

use crate::correlated::CorrelatedObjects;
use crate::registry::CorrelationRegistry;
use crate::runtime::{RuntimeMaterial, Side, ALPHA_CUTOFF_OPAQUE, DEFAULT_MASK_CUTOFF};
use crate::texture::Texture;
use opera_core::{OperaError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::rc::Rc;
use std::str::FromStr;
use tracing::debug;

/// glTF alpha rendering mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum AlphaMode {
    #[default]
    Opaque,
    Mask,
    Blend,
}

impl AlphaMode {
    pub const ALL: [&'static str; 3] = ["OPAQUE", "MASK", "BLEND"];

    pub fn as_str(&self) -> &'static str {
        match self {
            AlphaMode::Opaque => "OPAQUE",
            AlphaMode::Mask => "MASK",
            AlphaMode::Blend => "BLEND",
        }
    }
}

impl FromStr for AlphaMode {
    type Err = OperaError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "OPAQUE" => Ok(AlphaMode::Opaque),
            "MASK" => Ok(AlphaMode::Mask),
            "BLEND" => Ok(AlphaMode::Blend),
            other => Err(OperaError::invalid_enum(other, &Self::ALL)),
        }
    }
}

impl fmt::Display for AlphaMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The texture slots a glTF material exposes
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TextureSlot {
    BaseColor,
    MetallicRoughness,
    Normal,
    Occlusion,
    Emissive,
}

impl TextureSlot {
    pub const ALL: [TextureSlot; 5] = [
        TextureSlot::BaseColor,
        TextureSlot::MetallicRoughness,
        TextureSlot::Normal,
        TextureSlot::Occlusion,
        TextureSlot::Emissive,
    ];

    /// glTF property name of the slot
    pub fn as_str(&self) -> &'static str {
        match self {
            TextureSlot::BaseColor => "baseColorTexture",
            TextureSlot::MetallicRoughness => "metallicRoughnessTexture",
            TextureSlot::Normal => "normalTexture",
            TextureSlot::Occlusion => "occlusionTexture",
            TextureSlot::Emissive => "emissiveTexture",
        }
    }
}

fn check_finite(field: &str, value: f64) -> Result<()> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(OperaError::NonFiniteValue {
            field: field.to_string(),
            value,
        })
    }
}

pub(crate) fn check_range(field: &str, value: f64, min: f64, max: f64) -> Result<()> {
    check_finite(field, value)?;
    if value < min || value > max {
        return Err(OperaError::ValueOutOfRange {
            field: field.to_string(),
            min,
            max,
            value,
        });
    }
    Ok(())
}

pub(crate) fn check_unit(field: &str, value: f64) -> Result<()> {
    check_range(field, value, 0.0, 1.0)
}

pub(crate) fn check_non_negative(field: &str, value: f64) -> Result<()> {
    check_range(field, value, 0.0, f64::MAX)
}

/// State shared by every handle into one material
#[derive(Clone)]
struct MaterialHandle {
    index: usize,
    objects: CorrelatedObjects<RuntimeMaterial>,
    registry: Rc<CorrelationRegistry>,
}

impl MaterialHandle {
    fn label(&self) -> String {
        format!("material {}", self.index)
    }

    fn write(&self, property: &str, f: impl FnMut(&mut RuntimeMaterial)) -> Result<()> {
        self.registry.lifetime().check(|| self.label())?;
        let written = self.objects.write(f);
        debug!(material = self.index, property, written, "material write");
        Ok(())
    }
}

/// A glTF material
#[derive(Clone)]
pub struct Material {
    handle: MaterialHandle,
}

impl Material {
    pub(crate) fn from_registry(registry: &Rc<CorrelationRegistry>, index: usize) -> Result<Self> {
        let objects = registry
            .materials(index)
            .ok_or_else(|| OperaError::MaterialNotFound(format!("index {}", index)))?
            .clone();
        Ok(Self {
            handle: MaterialHandle {
                index,
                objects,
                registry: Rc::clone(registry),
            },
        })
    }

    /// Position of the material in the model's material list
    pub fn index(&self) -> usize {
        self.handle.index
    }

    /// The runtime materials this handle writes to
    pub fn correlated(&self) -> &CorrelatedObjects<RuntimeMaterial> {
        &self.handle.objects
    }

    /// False once the owning model has been replaced
    pub fn is_valid(&self) -> bool {
        self.handle.registry.lifetime().is_valid()
    }

    /// The material name, or `""` when the asset gives none
    pub fn name(&self) -> String {
        self.handle.objects.read(|m| m.name.clone().unwrap_or_default())
    }

    pub fn set_name(&self, name: &str) -> Result<()> {
        self.handle.write("name", |m| m.name = Some(name.to_string()))
    }

    pub fn alpha_mode(&self) -> AlphaMode {
        self.handle.objects.read(|m| m.alpha_mode)
    }

    pub fn set_alpha_mode(&self, mode: AlphaMode) -> Result<()> {
        self.handle.write("alphaMode", |m| {
            m.alpha_mode = mode;
            m.sync_alpha();
        })
    }

    /// Alpha cutoff. Materials that specify none read back the renderer's
    /// fallback: [`DEFAULT_MASK_CUTOFF`] in MASK mode, [`ALPHA_CUTOFF_OPAQUE`]
    /// otherwise.
    pub fn alpha_cutoff(&self) -> f64 {
        self.handle.objects.read(|m| match (m.alpha_cutoff, m.alpha_mode) {
            (Some(cutoff), _) => cutoff,
            (None, AlphaMode::Mask) => DEFAULT_MASK_CUTOFF,
            (None, _) => ALPHA_CUTOFF_OPAQUE,
        })
    }

    pub fn set_alpha_cutoff(&self, cutoff: f64) -> Result<()> {
        check_non_negative("alphaCutoff", cutoff)?;
        self.handle.write("alphaCutoff", |m| {
            m.alpha_cutoff = Some(cutoff);
            m.sync_alpha();
        })
    }

    pub fn double_sided(&self) -> bool {
        self.handle.objects.read(|m| m.side == Side::Double)
    }

    pub fn set_double_sided(&self, double_sided: bool) -> Result<()> {
        let side = if double_sided { Side::Double } else { Side::Front };
        self.handle.write("doubleSided", |m| m.side = side)
    }

    pub fn emissive_factor(&self) -> [f64; 3] {
        self.handle.objects.read(|m| m.emissive)
    }

    pub fn set_emissive_factor(&self, factor: [f64; 3]) -> Result<()> {
        for value in factor {
            check_non_negative("emissiveFactor", value)?;
        }
        self.handle.write("emissiveFactor", |m| m.emissive = factor)
    }

    pub fn normal_texture(&self) -> TextureInfo {
        self.texture_info(TextureSlot::Normal)
    }

    pub fn occlusion_texture(&self) -> TextureInfo {
        self.texture_info(TextureSlot::Occlusion)
    }

    pub fn emissive_texture(&self) -> TextureInfo {
        self.texture_info(TextureSlot::Emissive)
    }

    /// Any of the five texture slots
    pub fn texture_info(&self, slot: TextureSlot) -> TextureInfo {
        TextureInfo {
            handle: self.handle.clone(),
            slot,
        }
    }

    pub fn pbr_metallic_roughness(&self) -> PbrMetallicRoughness {
        PbrMetallicRoughness {
            handle: self.handle.clone(),
        }
    }
}

impl fmt::Debug for Material {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Material")
            .field("index", &self.handle.index)
            .field("name", &self.name())
            .field("correlated", &self.handle.objects.len())
            .finish()
    }
}

/// The metallic-roughness parameters of a material
#[derive(Clone)]
pub struct PbrMetallicRoughness {
    handle: MaterialHandle,
}

impl PbrMetallicRoughness {
    pub fn base_color_factor(&self) -> [f64; 4] {
        self.handle.objects.read(|m| m.color)
    }

    pub fn set_base_color_factor(&self, rgba: [f64; 4]) -> Result<()> {
        for value in rgba {
            check_unit("baseColorFactor", value)?;
        }
        self.handle.write("baseColorFactor", |m| m.color = rgba)
    }

    pub fn metallic_factor(&self) -> f64 {
        self.handle.objects.read(|m| m.metalness)
    }

    pub fn set_metallic_factor(&self, value: f64) -> Result<()> {
        check_unit("metallicFactor", value)?;
        self.handle.write("metallicFactor", |m| m.metalness = value)
    }

    pub fn roughness_factor(&self) -> f64 {
        self.handle.objects.read(|m| m.roughness)
    }

    pub fn set_roughness_factor(&self, value: f64) -> Result<()> {
        check_unit("roughnessFactor", value)?;
        self.handle.write("roughnessFactor", |m| m.roughness = value)
    }

    pub fn base_color_texture(&self) -> TextureInfo {
        TextureInfo {
            handle: self.handle.clone(),
            slot: TextureSlot::BaseColor,
        }
    }

    pub fn metallic_roughness_texture(&self) -> TextureInfo {
        TextureInfo {
            handle: self.handle.clone(),
            slot: TextureSlot::MetallicRoughness,
        }
    }
}

/// One texture slot of a material
#[derive(Clone)]
pub struct TextureInfo {
    handle: MaterialHandle,
    slot: TextureSlot,
}

impl TextureInfo {
    pub fn slot(&self) -> TextureSlot {
        self.slot
    }

    /// The texture bound to this slot, if any
    pub fn texture(&self) -> Option<Texture> {
        let bound = self
            .handle
            .objects
            .read(|m| m.slot(self.slot).cloned())?;
        let registry = &self.handle.registry;
        match registry.texture_index_of(&bound) {
            Some(index) => Texture::from_registry(registry, index).ok(),
            None => {
                let lifetime = bound
                    .borrow()
                    .owner
                    .clone()
                    .unwrap_or_else(|| registry.lifetime().clone());
                Some(Texture::standalone(bound, lifetime))
            }
        }
    }

    /// Bind `texture` to this slot on every correlated material, or clear
    /// the slot with `None`. The texture's runtime object is shared, so its
    /// decoded image is never copied.
    pub fn set_texture(&self, texture: Option<&Texture>) -> Result<()> {
        if let Some(texture) = texture {
            texture.lifetime().check(|| texture.label())?;
        }
        let bound = texture.map(|t| Rc::clone(t.representative()));
        let slot = self.slot;
        self.handle.write(slot.as_str(), |m| {
            *m.slot_mut(slot) = bound.clone();
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{MaterialDesc, Model, ModelBuilder, TextureDesc};
    use crate::runtime::ImageData;

    fn pixel(rgba: [u8; 4]) -> ImageData {
        ImageData::new(1, 1, rgba.to_vec())
    }

    /// Three materials: plain (two instances), blended double-sided, and a
    /// masked one with cutoff 0.25 using texture 0 as base color.
    fn sample_model() -> Model {
        let mut builder = ModelBuilder::new();
        let red = builder.add_image(pixel([255, 0, 0, 255]));
        let green = builder.add_image(pixel([0, 255, 0, 255]));
        builder.add_texture(TextureDesc::new(red).with_name("red")).unwrap();
        builder.add_texture(TextureDesc::new(green).with_name("green")).unwrap();

        let plain = builder.add_material(MaterialDesc::default()).unwrap();
        builder.add_material_instance(plain).unwrap();
        builder.add_material_instance(plain).unwrap();

        builder
            .add_material(MaterialDesc {
                name: Some("glass".to_string()),
                alpha_mode: AlphaMode::Blend,
                double_sided: true,
                ..Default::default()
            })
            .unwrap();
        builder
            .add_material(
                MaterialDesc {
                    name: Some("leaves".to_string()),
                    alpha_mode: AlphaMode::Mask,
                    alpha_cutoff: Some(0.25),
                    ..Default::default()
                }
                .with_texture(TextureSlot::BaseColor, 0),
            )
            .unwrap();
        builder.build(1).unwrap()
    }

    #[test]
    fn test_alpha_mode_parse() {
        assert_eq!("MASK".parse::<AlphaMode>().unwrap(), AlphaMode::Mask);
        let err = "TRANSLUCENT".parse::<AlphaMode>().unwrap_err();
        match err {
            OperaError::InvalidEnumValue { value, allowed } => {
                assert_eq!(value, "TRANSLUCENT");
                assert_eq!(allowed, vec!["OPAQUE", "MASK", "BLEND"]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_unspecified_cutoff_reads_opaque_default() {
        let model = sample_model();
        let material = model.material(0).unwrap();
        assert_eq!(material.alpha_mode(), AlphaMode::Opaque);
        assert_eq!(material.alpha_cutoff(), ALPHA_CUTOFF_OPAQUE);
        assert_eq!(material.name(), "");
    }

    #[test]
    fn test_mask_cutoff_round_trip() {
        let model = sample_model();
        let material = model.material(2).unwrap();
        assert_eq!(material.alpha_mode(), AlphaMode::Mask);
        assert_eq!(material.alpha_cutoff(), 0.25);

        material.set_alpha_cutoff(0.5).unwrap();
        assert_eq!(material.alpha_cutoff(), 0.5);
        assert_eq!(material.correlated().read(|m| m.alpha_test), 0.5);
    }

    #[test]
    fn test_set_alpha_mode() {
        let model = sample_model();
        let material = model.material(0).unwrap();
        assert_eq!(material.alpha_cutoff(), ALPHA_CUTOFF_OPAQUE);
        material.set_alpha_mode(AlphaMode::Mask).unwrap();
        assert_eq!(material.alpha_mode(), AlphaMode::Mask);
        assert_eq!(material.alpha_cutoff(), DEFAULT_MASK_CUTOFF);
        assert!(material
            .correlated()
            .iter()
            .all(|m| m.borrow().alpha_test == DEFAULT_MASK_CUTOFF));

        material.set_alpha_mode(AlphaMode::Blend).unwrap();
        assert!(material.correlated().iter().all(|m| m.borrow().transparent));
        assert_eq!(material.alpha_cutoff(), ALPHA_CUTOFF_OPAQUE);
    }

    #[test]
    fn test_built_mask_without_cutoff_matches_renderer() {
        let mut builder = ModelBuilder::new();
        builder
            .add_material(MaterialDesc {
                alpha_mode: AlphaMode::Mask,
                ..Default::default()
            })
            .unwrap();
        let model = builder.build(1).unwrap();
        let material = model.material(0).unwrap();

        assert_eq!(material.alpha_cutoff(), DEFAULT_MASK_CUTOFF);
        assert_eq!(
            material.alpha_cutoff(),
            material.correlated().read(|m| m.alpha_test)
        );
    }

    #[test]
    fn test_double_sided_round_trip() {
        let model = sample_model();
        let material = model.material(1).unwrap();
        assert!(material.double_sided());
        material.set_double_sided(false).unwrap();
        assert!(!material.double_sided());
        material.set_double_sided(true).unwrap();
        assert!(material.double_sided());
    }

    #[test]
    fn test_writes_fan_out_to_instances() {
        let model = sample_model();
        let material = model.material(0).unwrap();
        assert_eq!(material.correlated().len(), 2);

        let pbr = material.pbr_metallic_roughness();
        pbr.set_base_color_factor([0.5, 0.25, 1.0, 1.0]).unwrap();
        pbr.set_roughness_factor(0.3).unwrap();
        for object in material.correlated().iter() {
            assert_eq!(object.borrow().color, [0.5, 0.25, 1.0, 1.0]);
            assert_eq!(object.borrow().roughness, 0.3);
        }
        assert_eq!(pbr.roughness_factor(), 0.3);
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        let model = sample_model();
        let material = model.material(0).unwrap();
        let pbr = material.pbr_metallic_roughness();

        assert!(matches!(
            pbr.set_metallic_factor(1.5),
            Err(OperaError::ValueOutOfRange { .. })
        ));
        assert!(matches!(
            pbr.set_roughness_factor(f64::NAN),
            Err(OperaError::NonFiniteValue { .. })
        ));
        assert!(material.set_alpha_cutoff(-0.1).is_err());
        assert!(material.set_emissive_factor([0.0, f64::INFINITY, 0.0]).is_err());
        assert_eq!(pbr.metallic_factor(), 1.0);
    }

    #[test]
    fn test_set_texture_shares_identity() {
        let model = sample_model();
        let green = model.texture(1).unwrap();
        let material = model.material(0).unwrap();
        let slot = material.pbr_metallic_roughness().base_color_texture();
        assert!(slot.texture().is_none());

        slot.set_texture(Some(&green)).unwrap();
        let bound = slot.texture().unwrap();
        assert_eq!(bound.uuid(), green.uuid());
        assert_eq!(bound.index(), Some(1));
        for object in material.correlated().iter() {
            let object = object.borrow();
            let texture = object.map.as_ref().unwrap();
            assert!(Rc::ptr_eq(texture, green.representative()));
        }

        slot.set_texture(None).unwrap();
        assert!(slot.texture().is_none());
    }

    #[test]
    fn test_bound_texture_shares_image() {
        let model = sample_model();
        let leaves = model.material(2).unwrap();
        let existing = leaves
            .pbr_metallic_roughness()
            .base_color_texture()
            .texture()
            .unwrap();
        assert_eq!(existing.index(), Some(0));

        let normal = leaves.normal_texture();
        normal.set_texture(Some(&existing)).unwrap();
        let image = normal.texture().unwrap().source();
        assert!(image.same_data(&existing.source()));
    }

    #[test]
    fn test_stale_handle_writes_fail() {
        let model = sample_model();
        let material = model.material(1).unwrap();
        model.invalidate();

        assert!(!material.is_valid());
        assert!(matches!(
            material.set_double_sided(false),
            Err(OperaError::StaleHandle(_))
        ));
        assert!(material.double_sided());
        assert_eq!(material.name(), "glass");
    }
}
