//! Material edit command

use super::{format_summaries, load_model, MaterialSummary};
use anyhow::{Context, Result};
use opera_import::load_texture_image;
use opera_scene::{AlphaMode, ModelViewer};

pub struct MaterialArgs {
    pub model: String,
    pub index: usize,
    pub alpha_mode: Option<String>,
    pub alpha_cutoff: Option<f64>,
    pub double_sided: Option<bool>,
    pub base_color_texture: Option<String>,
    pub format: String,
}

pub fn run(args: MaterialArgs) -> Result<()> {
    let mut viewer = ModelViewer::new();
    let texture = match &args.base_color_texture {
        Some(path) => {
            let image = load_texture_image(path)
                .with_context(|| format!("Failed to load texture '{}'", path))?;
            Some(viewer.create_texture(image))
        }
        None => None,
    };

    let model = load_model(&mut viewer, &args.model)?;
    let material = model.material(args.index)?;

    if let Some(mode) = &args.alpha_mode {
        material.set_alpha_mode(mode.parse::<AlphaMode>()?)?;
    }
    if let Some(cutoff) = args.alpha_cutoff {
        material.set_alpha_cutoff(cutoff)?;
    }
    if let Some(double_sided) = args.double_sided {
        material.set_double_sided(double_sided)?;
    }
    if let Some(texture) = &texture {
        material
            .pbr_metallic_roughness()
            .base_color_texture()
            .set_texture(Some(texture))?;
    }

    let summary = MaterialSummary::from_material(&material);
    println!("{}", format_summaries(&[summary], &args.format)?);

    Ok(())
}
