//! Opera Scene - Editable scene graph over renderer-owned objects
//!
//! A loaded model is a set of runtime objects owned by the renderer. One
//! logical glTF material may be backed by several runtime materials (one
//! per primitive that uses it), and one texture by several runtime textures
//! sharing a decoded image. This crate groups those objects into
//! [`CorrelatedObjects`] sets, keeps them in a [`CorrelationRegistry`] built
//! once per load, and exposes [`Material`], [`TextureInfo`] and [`Texture`]
//! handles whose setters write every member and whose getters read the first.

mod correlated;
mod material;
mod model;
mod registry;
mod runtime;
mod texture;
mod viewer;

pub use correlated::{shared, CorrelatedObjects, Shared};
pub use material::{AlphaMode, Material, PbrMetallicRoughness, TextureInfo, TextureSlot};
pub use model::{MaterialDesc, Model, ModelBuilder, SamplerDesc, TextureDesc};
pub use registry::{CorrelationRegistry, Lifetime};
pub use runtime::{
    ImageData, RuntimeMaterial, RuntimeTexture, Side, ALPHA_CUTOFF_OPAQUE, DEFAULT_MASK_CUTOFF,
};
pub use texture::{Image, MagFilter, MinFilter, Sampler, Texture, WrapMode};
pub use viewer::{ListenerId, ModelViewer};
