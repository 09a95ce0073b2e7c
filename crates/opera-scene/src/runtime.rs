//! Renderer-side objects the scene graph edits
//!
//! These are the objects the rendering engine draws from. They carry
//! renderer semantics (an alpha-test threshold, a transparency flag, a
//! face-culling side) rather than glTF semantics; the entity handles in
//! `material` and `texture` translate between the two.

use crate::correlated::Shared;
use crate::material::{AlphaMode, TextureSlot};
use crate::registry::Lifetime;
use crate::texture::{MagFilter, MinFilter, WrapMode};
use opera_core::{ContentHash, ObjectId};
use std::rc::Rc;

/// Alpha-test threshold the renderer uses when alpha testing is off.
/// A material that specifies no cutoff reads back this value.
pub const ALPHA_CUTOFF_OPAQUE: f64 = 0.0;

/// glTF's default cutoff for MASK materials that do not specify one
pub const DEFAULT_MASK_CUTOFF: f64 = 0.5;

/// Which faces the renderer draws
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Front,
    Double,
}

/// A decoded image. Shared, never copied, between every texture using it.
#[derive(Debug)]
pub struct ImageData {
    pub name: Option<String>,
    pub uri: Option<String>,
    pub mime_type: Option<String>,
    pub width: u32,
    pub height: u32,
    /// Tightly packed RGBA8 pixels
    pub pixels: Vec<u8>,
    hash: ContentHash,
}

impl ImageData {
    pub fn new(width: u32, height: u32, pixels: Vec<u8>) -> Self {
        let hash = ContentHash::from_pixels(width, height, &pixels);
        Self {
            name: None,
            uri: None,
            mime_type: None,
            width,
            height,
            pixels,
            hash,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_uri(mut self, uri: impl Into<String>) -> Self {
        self.uri = Some(uri.into());
        self
    }

    pub fn with_mime_type(mut self, mime_type: impl Into<String>) -> Self {
        self.mime_type = Some(mime_type.into());
        self
    }

    pub fn content_hash(&self) -> ContentHash {
        self.hash
    }
}

/// A renderer texture: sampler state over a shared decoded image
#[derive(Debug, Clone)]
pub struct RuntimeTexture {
    pub id: ObjectId,
    pub name: Option<String>,
    pub image: Rc<ImageData>,
    pub min_filter: MinFilter,
    pub mag_filter: MagFilter,
    pub wrap_s: WrapMode,
    pub wrap_t: WrapMode,
    /// Set for textures created by a viewer rather than loaded with a model
    pub owner: Option<Lifetime>,
}

impl RuntimeTexture {
    pub fn new(image: Rc<ImageData>) -> Self {
        Self {
            id: ObjectId::new(),
            name: None,
            image,
            min_filter: MinFilter::LinearMipmapLinear,
            mag_filter: MagFilter::Linear,
            wrap_s: WrapMode::Repeat,
            wrap_t: WrapMode::Repeat,
            owner: None,
        }
    }

    /// A second renderer texture with the same state and image, new identity
    pub fn duplicate(&self) -> Self {
        Self {
            id: ObjectId::new(),
            ..self.clone()
        }
    }
}

/// A renderer material
#[derive(Debug, Clone)]
pub struct RuntimeMaterial {
    pub id: ObjectId,
    pub name: Option<String>,
    pub color: [f64; 4],
    pub metalness: f64,
    pub roughness: f64,
    pub emissive: [f64; 3],
    pub side: Side,

    pub alpha_mode: AlphaMode,
    /// Cutoff as authored; `None` when the asset gives none
    pub alpha_cutoff: Option<f64>,
    /// Threshold the renderer tests against, derived by `sync_alpha`
    pub alpha_test: f64,
    pub transparent: bool,
    pub depth_write: bool,

    pub map: Option<Shared<RuntimeTexture>>,
    pub metal_roughness_map: Option<Shared<RuntimeTexture>>,
    pub normal_map: Option<Shared<RuntimeTexture>>,
    pub ao_map: Option<Shared<RuntimeTexture>>,
    pub emissive_map: Option<Shared<RuntimeTexture>>,
}

impl Default for RuntimeMaterial {
    fn default() -> Self {
        Self {
            id: ObjectId::new(),
            name: None,
            color: [1.0, 1.0, 1.0, 1.0],
            metalness: 1.0,
            roughness: 1.0,
            emissive: [0.0, 0.0, 0.0],
            side: Side::Front,
            alpha_mode: AlphaMode::Opaque,
            alpha_cutoff: None,
            alpha_test: ALPHA_CUTOFF_OPAQUE,
            transparent: false,
            depth_write: true,
            map: None,
            metal_roughness_map: None,
            normal_map: None,
            ao_map: None,
            emissive_map: None,
        }
    }
}

impl RuntimeMaterial {
    /// Recompute the renderer's blend and alpha-test state from the alpha mode
    /// and authored cutoff
    pub fn sync_alpha(&mut self) {
        self.transparent = self.alpha_mode == AlphaMode::Blend;
        self.depth_write = !self.transparent;
        self.alpha_test = match self.alpha_mode {
            AlphaMode::Mask => self.alpha_cutoff.unwrap_or(DEFAULT_MASK_CUTOFF),
            AlphaMode::Opaque | AlphaMode::Blend => ALPHA_CUTOFF_OPAQUE,
        };
    }

    pub fn slot(&self, slot: TextureSlot) -> Option<&Shared<RuntimeTexture>> {
        match slot {
            TextureSlot::BaseColor => self.map.as_ref(),
            TextureSlot::MetallicRoughness => self.metal_roughness_map.as_ref(),
            TextureSlot::Normal => self.normal_map.as_ref(),
            TextureSlot::Occlusion => self.ao_map.as_ref(),
            TextureSlot::Emissive => self.emissive_map.as_ref(),
        }
    }

    pub fn slot_mut(&mut self, slot: TextureSlot) -> &mut Option<Shared<RuntimeTexture>> {
        match slot {
            TextureSlot::BaseColor => &mut self.map,
            TextureSlot::MetallicRoughness => &mut self.metal_roughness_map,
            TextureSlot::Normal => &mut self.normal_map,
            TextureSlot::Occlusion => &mut self.ao_map,
            TextureSlot::Emissive => &mut self.emissive_map,
        }
    }

    /// A second renderer material with the same state, new identity.
    /// Texture bindings are shared, not duplicated.
    pub fn duplicate(&self) -> Self {
        Self {
            id: ObjectId::new(),
            ..self.clone()
        }
    }
}
