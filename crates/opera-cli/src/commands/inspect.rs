//! Inspect command

use super::{format_summaries, load_model, MaterialSummary};
use anyhow::Result;
use opera_scene::ModelViewer;

pub fn run(model_path: &str, format: &str) -> Result<()> {
    let mut viewer = ModelViewer::new();
    let model = load_model(&mut viewer, model_path)?;

    let summaries: Vec<MaterialSummary> = model
        .materials()
        .iter()
        .map(MaterialSummary::from_material)
        .collect();

    if format == "text" {
        println!(
            "{}: {} material(s), {} texture(s)\n",
            model_path,
            summaries.len(),
            model.textures().len()
        );
    }
    println!("{}", format_summaries(&summaries, format)?);

    Ok(())
}
