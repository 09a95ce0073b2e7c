//! Texture, sampler and image entities

use crate::correlated::{CorrelatedObjects, Shared};
use crate::registry::{CorrelationRegistry, Lifetime};
use crate::runtime::{ImageData, RuntimeTexture};
use opera_core::{ContentHash, ObjectId, OperaError, Result};
use serde::{Deserialize, Serialize};
use std::rc::Rc;
use tracing::debug;

/// Minification filter, with glTF/GL enumeration codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MinFilter {
    Nearest,
    Linear,
    NearestMipmapNearest,
    LinearMipmapNearest,
    NearestMipmapLinear,
    LinearMipmapLinear,
}

impl MinFilter {
    const CODES: [&'static str; 6] = ["9728", "9729", "9984", "9985", "9986", "9987"];

    pub fn from_gl(code: u32) -> Result<Self> {
        match code {
            9728 => Ok(MinFilter::Nearest),
            9729 => Ok(MinFilter::Linear),
            9984 => Ok(MinFilter::NearestMipmapNearest),
            9985 => Ok(MinFilter::LinearMipmapNearest),
            9986 => Ok(MinFilter::NearestMipmapLinear),
            9987 => Ok(MinFilter::LinearMipmapLinear),
            other => Err(OperaError::invalid_enum(other.to_string(), &Self::CODES)),
        }
    }

    pub fn to_gl(self) -> u32 {
        match self {
            MinFilter::Nearest => 9728,
            MinFilter::Linear => 9729,
            MinFilter::NearestMipmapNearest => 9984,
            MinFilter::LinearMipmapNearest => 9985,
            MinFilter::NearestMipmapLinear => 9986,
            MinFilter::LinearMipmapLinear => 9987,
        }
    }
}

/// Magnification filter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MagFilter {
    Nearest,
    Linear,
}

impl MagFilter {
    const CODES: [&'static str; 2] = ["9728", "9729"];

    pub fn from_gl(code: u32) -> Result<Self> {
        match code {
            9728 => Ok(MagFilter::Nearest),
            9729 => Ok(MagFilter::Linear),
            other => Err(OperaError::invalid_enum(other.to_string(), &Self::CODES)),
        }
    }

    pub fn to_gl(self) -> u32 {
        match self {
            MagFilter::Nearest => 9728,
            MagFilter::Linear => 9729,
        }
    }
}

/// Texture coordinate wrapping
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WrapMode {
    ClampToEdge,
    MirroredRepeat,
    Repeat,
}

impl WrapMode {
    const CODES: [&'static str; 3] = ["33071", "33648", "10497"];

    pub fn from_gl(code: u32) -> Result<Self> {
        match code {
            33071 => Ok(WrapMode::ClampToEdge),
            33648 => Ok(WrapMode::MirroredRepeat),
            10497 => Ok(WrapMode::Repeat),
            other => Err(OperaError::invalid_enum(other.to_string(), &Self::CODES)),
        }
    }

    pub fn to_gl(self) -> u32 {
        match self {
            WrapMode::ClampToEdge => 33071,
            WrapMode::MirroredRepeat => 33648,
            WrapMode::Repeat => 10497,
        }
    }
}

/// A glTF texture: an image plus sampler state.
///
/// Backed by one runtime texture per material that uses it; all of them
/// share one decoded image. Identity (`uuid`) is the first runtime object's.
#[derive(Clone, Debug)]
pub struct Texture {
    index: Option<usize>,
    objects: CorrelatedObjects<RuntimeTexture>,
    lifetime: Lifetime,
}

impl Texture {
    pub(crate) fn from_registry(registry: &Rc<CorrelationRegistry>, index: usize) -> Result<Self> {
        let objects = registry
            .textures(index)
            .ok_or_else(|| OperaError::TextureNotFound(format!("index {}", index)))?
            .clone();
        Ok(Self {
            index: Some(index),
            objects,
            lifetime: registry.lifetime().clone(),
        })
    }

    /// A texture outside any model's texture list
    pub(crate) fn standalone(object: Shared<RuntimeTexture>, lifetime: Lifetime) -> Self {
        Self {
            index: None,
            objects: CorrelatedObjects::single(object),
            lifetime,
        }
    }

    /// Position in the model's texture list; `None` for created textures
    pub fn index(&self) -> Option<usize> {
        self.index
    }

    pub fn uuid(&self) -> ObjectId {
        self.objects.read(|t| t.id)
    }

    pub fn name(&self) -> String {
        self.objects.read(|t| t.name.clone().unwrap_or_default())
    }

    pub fn set_name(&self, name: &str) -> Result<()> {
        self.write("name", |t| t.name = Some(name.to_string()))
    }

    /// The backing image
    pub fn source(&self) -> Image {
        Image {
            data: self.objects.read(|t| Rc::clone(&t.image)),
        }
    }

    pub fn sampler(&self) -> Sampler {
        Sampler {
            texture: self.clone(),
        }
    }

    pub fn is_valid(&self) -> bool {
        self.lifetime.is_valid()
    }

    pub fn correlated(&self) -> &CorrelatedObjects<RuntimeTexture> {
        &self.objects
    }

    pub(crate) fn representative(&self) -> &Shared<RuntimeTexture> {
        self.objects.representative()
    }

    pub(crate) fn lifetime(&self) -> &Lifetime {
        &self.lifetime
    }

    pub(crate) fn label(&self) -> String {
        match self.index {
            Some(index) => format!("texture {}", index),
            None => format!("texture {}", self.uuid()),
        }
    }

    fn write(&self, property: &str, f: impl FnMut(&mut RuntimeTexture)) -> Result<()> {
        self.lifetime.check(|| self.label())?;
        let written = self.objects.write(f);
        debug!(texture = %self.label(), property, written, "texture write");
        Ok(())
    }
}

/// Sampler state of a texture
#[derive(Clone, Debug)]
pub struct Sampler {
    texture: Texture,
}

impl Sampler {
    pub fn min_filter(&self) -> MinFilter {
        self.texture.objects.read(|t| t.min_filter)
    }

    pub fn set_min_filter(&self, filter: MinFilter) -> Result<()> {
        self.texture.write("minFilter", |t| t.min_filter = filter)
    }

    pub fn mag_filter(&self) -> MagFilter {
        self.texture.objects.read(|t| t.mag_filter)
    }

    pub fn set_mag_filter(&self, filter: MagFilter) -> Result<()> {
        self.texture.write("magFilter", |t| t.mag_filter = filter)
    }

    pub fn wrap_s(&self) -> WrapMode {
        self.texture.objects.read(|t| t.wrap_s)
    }

    pub fn set_wrap_s(&self, mode: WrapMode) -> Result<()> {
        self.texture.write("wrapS", |t| t.wrap_s = mode)
    }

    pub fn wrap_t(&self) -> WrapMode {
        self.texture.objects.read(|t| t.wrap_t)
    }

    pub fn set_wrap_t(&self, mode: WrapMode) -> Result<()> {
        self.texture.write("wrapT", |t| t.wrap_t = mode)
    }
}

/// Read access to a decoded image
#[derive(Clone, Debug)]
pub struct Image {
    data: Rc<ImageData>,
}

impl Image {
    pub fn name(&self) -> String {
        self.data.name.clone().unwrap_or_default()
    }

    pub fn uri(&self) -> Option<&str> {
        self.data.uri.as_deref()
    }

    pub fn mime_type(&self) -> Option<&str> {
        self.data.mime_type.as_deref()
    }

    pub fn width(&self) -> u32 {
        self.data.width
    }

    pub fn height(&self) -> u32 {
        self.data.height
    }

    pub fn pixels(&self) -> &[u8] {
        &self.data.pixels
    }

    pub fn content_hash(&self) -> ContentHash {
        self.data.content_hash()
    }

    /// Whether both images are the same decoded buffer
    pub fn same_data(&self, other: &Image) -> bool {
        Rc::ptr_eq(&self.data, &other.data)
    }
}
