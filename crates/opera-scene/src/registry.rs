//! Registry of correlated object sets for one loaded model

use crate::correlated::{CorrelatedObjects, Shared};
use crate::runtime::{RuntimeMaterial, RuntimeTexture};
use opera_core::{OperaError, Result};
use std::cell::Cell;
use std::rc::Rc;
use tracing::warn;

/// Liveness of the handles issued for one load.
///
/// Every handle built from a model shares the same token. Loading a new
/// model invalidates it, after which writes through old handles fail with
/// `OperaError::StaleHandle`.
#[derive(Debug, Clone)]
pub struct Lifetime {
    valid: Rc<Cell<bool>>,
    generation: u64,
}

impl Lifetime {
    pub fn new(generation: u64) -> Self {
        Self {
            valid: Rc::new(Cell::new(true)),
            generation,
        }
    }

    pub fn is_valid(&self) -> bool {
        self.valid.get()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub(crate) fn invalidate(&self) {
        self.valid.set(false);
    }

    /// Fail with `StaleHandle` if the owning model has been replaced
    pub(crate) fn check(&self, what: impl FnOnce() -> String) -> Result<()> {
        if self.is_valid() {
            return Ok(());
        }
        let what = what();
        warn!(generation = self.generation, handle = %what, "write through stale handle");
        Err(OperaError::StaleHandle(what))
    }
}

/// Logical entity index -> correlated runtime objects.
///
/// Built once by `ModelBuilder::build` and never mutated afterwards; a
/// reload builds a new registry and discards this one wholesale.
#[derive(Debug)]
pub struct CorrelationRegistry {
    materials: Vec<CorrelatedObjects<RuntimeMaterial>>,
    textures: Vec<CorrelatedObjects<RuntimeTexture>>,
    lifetime: Lifetime,
}

impl CorrelationRegistry {
    pub(crate) fn new(
        materials: Vec<CorrelatedObjects<RuntimeMaterial>>,
        textures: Vec<CorrelatedObjects<RuntimeTexture>>,
        lifetime: Lifetime,
    ) -> Self {
        Self {
            materials,
            textures,
            lifetime,
        }
    }

    /// Runtime materials behind material `index`
    pub fn materials(&self, index: usize) -> Option<&CorrelatedObjects<RuntimeMaterial>> {
        self.materials.get(index)
    }

    /// Runtime textures behind texture `index`
    pub fn textures(&self, index: usize) -> Option<&CorrelatedObjects<RuntimeTexture>> {
        self.textures.get(index)
    }

    pub fn material_count(&self) -> usize {
        self.materials.len()
    }

    pub fn texture_count(&self) -> usize {
        self.textures.len()
    }

    /// The logical texture a runtime texture belongs to, if any
    pub fn texture_index_of(&self, object: &Shared<RuntimeTexture>) -> Option<usize> {
        self.textures.iter().position(|set| set.contains(object))
    }

    pub fn lifetime(&self) -> &Lifetime {
        &self.lifetime
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::correlated::shared;
    use crate::runtime::ImageData;

    #[test]
    fn test_lifetime_invalidation() {
        let lifetime = Lifetime::new(3);
        let handle_copy = lifetime.clone();
        assert!(handle_copy.check(|| "material 0".to_string()).is_ok());

        lifetime.invalidate();
        assert!(!handle_copy.is_valid());
        let err = handle_copy.check(|| "material 0".to_string()).unwrap_err();
        assert!(matches!(err, OperaError::StaleHandle(ref w) if w == "material 0"));
        assert_eq!(handle_copy.generation(), 3);
    }

    #[test]
    fn test_texture_index_lookup() {
        let image = Rc::new(ImageData::new(1, 1, vec![255; 4]));
        let a = shared(RuntimeTexture::new(image.clone()));
        let b = shared(RuntimeTexture::new(image.clone()));
        let stray = shared(RuntimeTexture::new(image));

        let registry = CorrelationRegistry::new(
            Vec::new(),
            vec![
                CorrelatedObjects::single(a.clone()),
                CorrelatedObjects::single(b.clone()),
            ],
            Lifetime::new(1),
        );
        assert_eq!(registry.texture_index_of(&b), Some(1));
        assert_eq!(registry.texture_index_of(&stray), None);
        assert!(registry.materials(0).is_none());
        assert_eq!(registry.texture_count(), 2);
    }
}
