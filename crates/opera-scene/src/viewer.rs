//! The viewer host: owns the current model and notifies load listeners

use crate::correlated::shared;
use crate::model::{Model, ModelBuilder};
use crate::registry::Lifetime;
use crate::runtime::{ImageData, RuntimeTexture};
use crate::texture::Texture;
use opera_core::Result;
use std::rc::Rc;
use tracing::info;

/// Handle returned by [`ModelViewer::on_load`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

type LoadListener = Box<dyn FnMut(&Model)>;

/// Hosts one model at a time.
///
/// Loading replaces the current model wholesale: its handles are
/// invalidated before the new model is installed, then every load listener
/// runs once with the new model.
pub struct ModelViewer {
    model: Option<Model>,
    generation: u64,
    listeners: Vec<(ListenerId, LoadListener)>,
    next_listener: u64,
    created: Lifetime,
}

impl Default for ModelViewer {
    fn default() -> Self {
        Self::new()
    }
}

impl ModelViewer {
    pub fn new() -> Self {
        Self {
            model: None,
            generation: 0,
            listeners: Vec::new(),
            next_listener: 0,
            created: Lifetime::new(0),
        }
    }

    /// Build and install a new model, discarding the current one
    pub fn load(&mut self, builder: ModelBuilder) -> Result<&Model> {
        let model = builder.build(self.generation + 1)?;
        self.unload();
        self.generation += 1;

        info!(
            generation = self.generation,
            materials = model.registry().material_count(),
            textures = model.registry().texture_count(),
            "model loaded"
        );

        let model = self.model.insert(model);
        for (_, listener) in self.listeners.iter_mut() {
            listener(model);
        }
        Ok(model)
    }

    /// Drop the current model, invalidating its handles
    pub fn unload(&mut self) {
        if let Some(previous) = self.model.take() {
            previous.invalidate();
        }
    }

    pub fn model(&self) -> Option<&Model> {
        self.model.as_ref()
    }

    /// Number of loads so far
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn on_load(&mut self, listener: impl FnMut(&Model) + 'static) -> ListenerId {
        let id = ListenerId(self.next_listener);
        self.next_listener += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    pub fn remove_listener(&mut self, id: ListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(existing, _)| *existing != id);
        self.listeners.len() != before
    }

    /// A texture over `image` that belongs to no model. It can be bound to
    /// any live model's material slots and survives reloads.
    pub fn create_texture(&self, image: ImageData) -> Texture {
        let mut texture = RuntimeTexture::new(Rc::new(image));
        texture.owner = Some(self.created.clone());
        Texture::standalone(shared(texture), self.created.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::material::TextureSlot;
    use crate::model::MaterialDesc;
    use opera_core::OperaError;
    use std::cell::RefCell;

    fn one_material() -> ModelBuilder {
        let mut builder = ModelBuilder::new();
        builder
            .add_material(MaterialDesc {
                name: Some("paint".to_string()),
                ..Default::default()
            })
            .unwrap();
        builder
    }

    #[test]
    fn test_load_fires_listeners_once() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut viewer = ModelViewer::new();
        let log = Rc::clone(&seen);
        viewer.on_load(move |model| log.borrow_mut().push(model.generation()));

        viewer.load(one_material()).unwrap();
        viewer.load(one_material()).unwrap();
        assert_eq!(*seen.borrow(), vec![1, 2]);
        assert_eq!(viewer.generation(), 2);
    }

    #[test]
    fn test_remove_listener() {
        let count = Rc::new(RefCell::new(0));
        let mut viewer = ModelViewer::new();
        let counter = Rc::clone(&count);
        let id = viewer.on_load(move |_| *counter.borrow_mut() += 1);

        viewer.load(one_material()).unwrap();
        assert!(viewer.remove_listener(id));
        assert!(!viewer.remove_listener(id));
        viewer.load(one_material()).unwrap();
        assert_eq!(*count.borrow(), 1);
    }

    #[test]
    fn test_reload_invalidates_handles() {
        let mut viewer = ModelViewer::new();
        let old = viewer.load(one_material()).unwrap().material(0).unwrap();
        old.set_name("before").unwrap();

        let fresh = viewer.load(one_material()).unwrap().material(0).unwrap();
        assert!(matches!(old.set_name("after"), Err(OperaError::StaleHandle(_))));
        assert_eq!(old.name(), "before");
        fresh.set_name("after").unwrap();
        assert_eq!(viewer.model().unwrap().material(0).unwrap().name(), "after");
    }

    #[test]
    fn test_created_texture_binds_across_reloads() {
        let mut viewer = ModelViewer::new();
        let created = viewer.create_texture(ImageData::new(1, 1, vec![7, 7, 7, 255]));
        assert_eq!(created.index(), None);

        viewer.load(one_material()).unwrap();
        viewer.load(one_material()).unwrap();
        let material = viewer.model().unwrap().material(0).unwrap();
        let slot = material.texture_info(TextureSlot::Occlusion);
        slot.set_texture(Some(&created)).unwrap();
        assert_eq!(slot.texture().unwrap().uuid(), created.uuid());

        viewer.load(one_material()).unwrap();
        let rebound = slot.texture().unwrap();
        assert!(rebound.is_valid());
        rebound.set_name("swatch").unwrap();
        assert_eq!(created.name(), "swatch");
    }

    #[test]
    fn test_stale_texture_is_rejected() {
        let mut builder = one_material();
        let image = builder.add_image(ImageData::new(1, 1, vec![0; 4]));
        builder
            .add_texture(crate::model::TextureDesc::new(image))
            .unwrap();

        let mut viewer = ModelViewer::new();
        let stale = viewer.load(builder).unwrap().texture(0).unwrap();
        let material = viewer.load(one_material()).unwrap().material(0).unwrap();
        assert!(matches!(
            material.normal_texture().set_texture(Some(&stale)),
            Err(OperaError::StaleHandle(_))
        ));
        assert!(material.normal_texture().texture().is_none());
    }
}
