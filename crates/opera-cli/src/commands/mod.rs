//! CLI command implementations

pub mod camera;
pub mod inspect;
pub mod material;

use anyhow::{Context, Result};
use opera_import::import_gltf;
use opera_scene::{Material, Model, ModelViewer, TextureSlot};
use serde::Serialize;
use std::collections::BTreeMap;

/// Import a glTF file and load it into `viewer`
pub fn load_model<'a>(viewer: &'a mut ModelViewer, path: &str) -> Result<&'a Model> {
    let builder = import_gltf(path)
        .with_context(|| format!("Failed to import '{}'", path))?
        .into_builder()
        .context("Failed to build scene graph")?;
    Ok(viewer.load(builder)?)
}

#[derive(Debug, Serialize)]
pub struct TextureSummary {
    pub index: Option<usize>,
    pub name: String,
    pub uuid: String,
    pub width: u32,
    pub height: u32,
}

#[derive(Debug, Serialize)]
pub struct MaterialSummary {
    pub index: usize,
    pub name: String,
    pub alpha_mode: String,
    pub alpha_cutoff: f64,
    pub double_sided: bool,
    pub base_color_factor: [f64; 4],
    pub metallic_factor: f64,
    pub roughness_factor: f64,
    pub emissive_factor: [f64; 3],
    /// Runtime objects backing this material
    pub instances: usize,
    pub textures: BTreeMap<&'static str, TextureSummary>,
}

impl MaterialSummary {
    pub fn from_material(material: &Material) -> Self {
        let pbr = material.pbr_metallic_roughness();
        let textures = TextureSlot::ALL
            .iter()
            .filter_map(|&slot| {
                let texture = material.texture_info(slot).texture()?;
                let image = texture.source();
                Some((
                    slot.as_str(),
                    TextureSummary {
                        index: texture.index(),
                        name: texture.name(),
                        uuid: texture.uuid().to_string(),
                        width: image.width(),
                        height: image.height(),
                    },
                ))
            })
            .collect();

        Self {
            index: material.index(),
            name: material.name(),
            alpha_mode: material.alpha_mode().to_string(),
            alpha_cutoff: material.alpha_cutoff(),
            double_sided: material.double_sided(),
            base_color_factor: pbr.base_color_factor(),
            metallic_factor: pbr.metallic_factor(),
            roughness_factor: pbr.roughness_factor(),
            emissive_factor: material.emissive_factor(),
            instances: material.correlated().len(),
            textures,
        }
    }

    pub fn to_text(&self) -> String {
        let name = if self.name.is_empty() {
            "(unnamed)"
        } else {
            self.name.as_str()
        };
        let mut out = format!(
            "[{}] {}\n  alpha: {} (cutoff {})\n  double-sided: {}\n  base color: {:?}\n  metallic/roughness: {} / {}\n  instances: {}\n",
            self.index,
            name,
            self.alpha_mode,
            self.alpha_cutoff,
            self.double_sided,
            self.base_color_factor,
            self.metallic_factor,
            self.roughness_factor,
            self.instances,
        );
        for (slot, texture) in &self.textures {
            let index = texture
                .index
                .map(|i| i.to_string())
                .unwrap_or_else(|| "created".to_string());
            out.push_str(&format!(
                "  {}: texture {} '{}' {}x{} ({})\n",
                slot, index, texture.name, texture.width, texture.height, texture.uuid
            ));
        }
        out
    }
}

/// Render summaries as `text` or `json`
pub fn format_summaries(summaries: &[MaterialSummary], format: &str) -> Result<String> {
    match format {
        "json" => Ok(serde_json::to_string_pretty(summaries)?),
        "text" => Ok(summaries
            .iter()
            .map(MaterialSummary::to_text)
            .collect::<Vec<_>>()
            .join("\n")),
        _ => anyhow::bail!("Unknown format: {}", format),
    }
}
