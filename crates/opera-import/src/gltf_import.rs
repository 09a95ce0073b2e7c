//! glTF/GLB file importer

use crate::types::{
    ImportResult, ImportedImage, ImportedMaterial, ImportedPrimitive, ImportedTexture,
};
use opera_core::{OperaError, Result};
use opera_scene::{
    AlphaMode, ImageData, MagFilter, MinFilter, SamplerDesc, TextureSlot, WrapMode,
    DEFAULT_MASK_CUTOFF,
};
use std::collections::BTreeMap;
use std::path::Path;
use tracing::{debug, warn};

/// Import a glTF or GLB file
pub fn import_gltf<P: AsRef<Path>>(path: P) -> Result<ImportResult> {
    let path = path.as_ref();
    let (document, _buffers, images) = gltf::import(path).map_err(|e| {
        OperaError::ImportError(format!("Failed to import glTF '{}': {}", path.display(), e))
    })?;
    debug!(path = %path.display(), "imported glTF");
    convert(&document, images)
}

/// Import a glTF or GLB document held in memory.
///
/// Buffers may be embedded (GLB binary chunk or data URIs). Images must live
/// in buffer views: any image given by URI, data URIs included, is rejected.
/// Use [`import_gltf`] for those.
pub fn import_gltf_slice(bytes: &[u8]) -> Result<ImportResult> {
    let (document, _buffers, images) = gltf::import_slice(bytes)
        .map_err(|e| OperaError::ImportError(format!("Failed to import glTF: {}", e)))?;
    convert(&document, images)
}

fn convert(document: &gltf::Document, images: Vec<gltf::image::Data>) -> Result<ImportResult> {
    let mut imported_images = Vec::with_capacity(images.len());
    for (image, data) in document.images().zip(images) {
        let (uri, mime_type) = match image.source() {
            gltf::image::Source::Uri { uri, mime_type } => {
                if let Some(rest) = uri.strip_prefix("data:") {
                    let mime = rest.split(';').next().map(String::from);
                    (None, mime_type.map(String::from).or(mime))
                } else {
                    (Some(uri.to_string()), mime_type.map(String::from))
                }
            }
            gltf::image::Source::View { mime_type, .. } => (None, Some(mime_type.to_string())),
        };

        let pixels = to_rgba8(&data).unwrap_or_else(|| {
            warn!(
                image = image.index(),
                format = ?data.format,
                "unsupported pixel format, substituting opaque white"
            );
            vec![255; rgba_len(data.width, data.height)]
        });

        imported_images.push(ImportedImage {
            name: image.name().map(String::from),
            uri,
            mime_type,
            width: data.width,
            height: data.height,
            pixels,
        });
    }

    let mut textures = Vec::new();
    for texture in document.textures() {
        let sampler = texture.sampler();
        let min_filter = match sampler.min_filter() {
            Some(filter) => MinFilter::from_gl(filter.as_gl_enum())?,
            None => MinFilter::LinearMipmapLinear,
        };
        let mag_filter = match sampler.mag_filter() {
            Some(filter) => MagFilter::from_gl(filter.as_gl_enum())?,
            None => MagFilter::Linear,
        };

        textures.push(ImportedTexture {
            name: texture.name().map(String::from),
            image_index: texture.source().index(),
            sampler: SamplerDesc {
                min_filter,
                mag_filter,
                wrap_s: WrapMode::from_gl(sampler.wrap_s().as_gl_enum())?,
                wrap_t: WrapMode::from_gl(sampler.wrap_t().as_gl_enum())?,
            },
        });
    }

    let mut materials = Vec::new();
    for material in document.materials() {
        let pbr = material.pbr_metallic_roughness();
        let alpha_mode = match material.alpha_mode() {
            gltf::material::AlphaMode::Opaque => AlphaMode::Opaque,
            gltf::material::AlphaMode::Mask => AlphaMode::Mask,
            gltf::material::AlphaMode::Blend => AlphaMode::Blend,
        };
        let authored = material.alpha_cutoff().map(f64::from);
        let alpha_cutoff = match alpha_mode {
            AlphaMode::Mask => Some(authored.unwrap_or(DEFAULT_MASK_CUTOFF)),
            _ => authored,
        };

        let mut slots = BTreeMap::new();
        if let Some(info) = pbr.base_color_texture() {
            slots.insert(TextureSlot::BaseColor, info.texture().index());
        }
        if let Some(info) = pbr.metallic_roughness_texture() {
            slots.insert(TextureSlot::MetallicRoughness, info.texture().index());
        }
        if let Some(info) = material.normal_texture() {
            slots.insert(TextureSlot::Normal, info.texture().index());
        }
        if let Some(info) = material.occlusion_texture() {
            slots.insert(TextureSlot::Occlusion, info.texture().index());
        }
        if let Some(info) = material.emissive_texture() {
            slots.insert(TextureSlot::Emissive, info.texture().index());
        }

        materials.push(ImportedMaterial {
            name: material.name().map(String::from),
            base_color: pbr.base_color_factor().map(f64::from),
            metallic: f64::from(pbr.metallic_factor()),
            roughness: f64::from(pbr.roughness_factor()),
            emissive: material.emissive_factor().map(f64::from),
            alpha_mode,
            alpha_cutoff,
            double_sided: material.double_sided(),
            textures: slots,
        });
    }

    let mut primitives = Vec::new();
    for mesh in document.meshes() {
        let mesh_name = mesh
            .name()
            .map(String::from)
            .unwrap_or_else(|| format!("mesh_{}", mesh.index()));

        for primitive in mesh.primitives() {
            let vertex_count = primitive
                .get(&gltf::Semantic::Positions)
                .map(|accessor| accessor.count())
                .unwrap_or(0);
            primitives.push(ImportedPrimitive {
                mesh_name: mesh_name.clone(),
                material_index: primitive.material().index(),
                vertex_count,
            });
        }
    }

    Ok(ImportResult {
        images: imported_images,
        textures,
        materials,
        primitives,
    })
}

/// Byte length of a tightly packed RGBA8 image
fn rgba_len(width: u32, height: u32) -> usize {
    width as usize * height as usize * 4
}

/// Expand a glTF image buffer to tightly packed RGBA8. Returns `None` for
/// formats that have no sensible 8-bit reading.
fn to_rgba8(data: &gltf::image::Data) -> Option<Vec<u8>> {
    use gltf::image::Format;

    let pixels = &data.pixels;
    let rgba = match data.format {
        Format::R8G8B8A8 => pixels.clone(),
        Format::R8G8B8 => pixels
            .chunks_exact(3)
            .flat_map(|p| [p[0], p[1], p[2], 255])
            .collect(),
        Format::R8G8 => pixels
            .chunks_exact(2)
            .flat_map(|p| [p[0], p[1], 0, 255])
            .collect(),
        Format::R8 => pixels.iter().flat_map(|&v| [v, v, v, 255]).collect(),
        // 16-bit channels are little-endian; keep the high byte
        Format::R16G16B16A16 => pixels.chunks_exact(2).map(|c| c[1]).collect(),
        Format::R16G16B16 => pixels
            .chunks_exact(6)
            .flat_map(|p| [p[1], p[3], p[5], 255])
            .collect(),
        _ => return None,
    };
    Some(rgba)
}

/// Decode an image file (PNG, JPEG, ...) for use as a created texture
pub fn load_texture_image<P: AsRef<Path>>(path: P) -> Result<ImageData> {
    let path = path.as_ref();
    let img = image::open(path).map_err(|e| {
        OperaError::ImportError(format!("Failed to open image '{}': {}", path.display(), e))
    })?;
    let rgba = img.to_rgba8();
    let (width, height) = rgba.dimensions();

    let mut data =
        ImageData::new(width, height, rgba.into_raw()).with_uri(path.display().to_string());
    if let Some(stem) = path.file_stem().and_then(|n| n.to_str()) {
        data = data.with_name(stem);
    }
    if let Ok(format) = image::ImageFormat::from_path(path) {
        data = data.with_mime_type(format.to_mime_type());
    }
    Ok(data)
}

/// Decode an in-memory image
pub fn decode_texture_image(bytes: &[u8]) -> Result<ImageData> {
    let format = image::guess_format(bytes)
        .map_err(|e| OperaError::ImportError(format!("Unrecognized image data: {}", e)))?;
    let img = image::load_from_memory_with_format(bytes, format)
        .map_err(|e| OperaError::ImportError(format!("Failed to decode image: {}", e)))?;
    let rgba = img.to_rgba8();
    let (width, height) = rgba.dimensions();
    Ok(ImageData::new(width, height, rgba.into_raw()).with_mime_type(format.to_mime_type()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use opera_scene::{ModelViewer, ALPHA_CUTOFF_OPAQUE};
    use std::fs;

    const PIXEL_PNG: [u8; 70] = [
        0x89, 0x50, 0x4e, 0x47, 0x0d, 0x0a, 0x1a, 0x0a, 0x00, 0x00, 0x00, 0x0d, 0x49, 0x48, 0x44,
        0x52, 0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x01, 0x08, 0x06, 0x00, 0x00, 0x00, 0x1f,
        0x15, 0xc4, 0x89, 0x00, 0x00, 0x00, 0x0d, 0x49, 0x44, 0x41, 0x54, 0x78, 0xda, 0x63, 0x64,
        0x60, 0xf8, 0x5f, 0x0f, 0x00, 0x02, 0x87, 0x01, 0x80, 0xeb, 0x47, 0xba, 0x92, 0x00, 0x00,
        0x00, 0x00, 0x49, 0x45, 0x4e, 0x44, 0xae, 0x42, 0x60, 0x82,
    ];

    /// Two meshes over one triangle. `body` is drawn by two primitives,
    /// `glass` by one, `leaves` by none; texture 0 is bound by `glass` and
    /// `leaves`.
    const SCENE_GLTF: &str = r#"{
  "asset": { "version": "2.0" },
  "buffers": [{
    "byteLength": 36,
    "uri": "data:application/octet-stream;base64,AAAAAAAAAAAAAAAAAACAPwAAAAAAAAAAAAAAAAAAgD8AAAAA"
  }],
  "bufferViews": [{ "buffer": 0, "byteOffset": 0, "byteLength": 36 }],
  "accessors": [{
    "bufferView": 0, "componentType": 5126, "count": 3, "type": "VEC3",
    "min": [0.0, 0.0, 0.0], "max": [1.0, 1.0, 0.0]
  }],
  "images": [{
    "name": "swatch",
    "uri": "data:image/png;base64,iVBORw0KGgoAAAANSUhEUgAAAAEAAAABCAYAAAAfFcSJAAAADUlEQVR42mNkYPhfDwAChwGA60e6kgAAAABJRU5ErkJggg=="
  }],
  "samplers": [{ "magFilter": 9728, "wrapS": 33071 }],
  "textures": [{ "name": "swatch", "source": 0, "sampler": 0 }],
  "materials": [
    { "name": "body" },
    { "name": "glass", "alphaMode": "BLEND", "doubleSided": true, "normalTexture": { "index": 0 } },
    {
      "name": "leaves", "alphaMode": "MASK", "alphaCutoff": 0.25,
      "pbrMetallicRoughness": { "baseColorTexture": { "index": 0 }, "metallicFactor": 0.0 }
    }
  ],
  "meshes": [
    { "name": "hull", "primitives": [
      { "attributes": { "POSITION": 0 }, "material": 0 },
      { "attributes": { "POSITION": 0 }, "material": 0 }
    ] },
    { "name": "window", "primitives": [
      { "attributes": { "POSITION": 0 }, "material": 1 },
      { "attributes": { "POSITION": 0 } }
    ] }
  ]
}"#;

    /// One triangle drawn with one material, no images
    const PLAIN_GLTF: &str = r#"{
  "asset": { "version": "2.0" },
  "buffers": [{
    "byteLength": 36,
    "uri": "data:application/octet-stream;base64,AAAAAAAAAAAAAAAAAACAPwAAAAAAAAAAAAAAAAAAgD8AAAAA"
  }],
  "bufferViews": [{ "buffer": 0, "byteOffset": 0, "byteLength": 36 }],
  "accessors": [{
    "bufferView": 0, "componentType": 5126, "count": 3, "type": "VEC3",
    "min": [0.0, 0.0, 0.0], "max": [1.0, 1.0, 0.0]
  }],
  "materials": [{ "name": "body", "alphaMode": "MASK" }],
  "meshes": [{ "primitives": [{ "attributes": { "POSITION": 0 }, "material": 0 }] }]
}"#;

    /// Write `doc` to a temporary .gltf file and import it from disk
    fn import_document(doc: &str) -> ImportResult {
        let dir = std::env::temp_dir().join(format!("opera_test_{}", uuid::Uuid::new_v4()));
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join("scene.gltf");
        fs::write(&path, doc).unwrap();

        let result = import_gltf(&path).unwrap();
        fs::remove_dir_all(&dir).ok();
        result
    }

    #[test]
    fn test_import_materials() {
        let result = import_document(SCENE_GLTF);
        assert_eq!(result.materials.len(), 3);
        assert_eq!(result.primitives.len(), 4);
        assert_eq!(result.primitives[0].vertex_count, 3);
        assert_eq!(result.material_uses(0), 2);
        assert_eq!(result.material_uses(2), 0);

        let body = &result.materials[0];
        assert_eq!(body.alpha_mode, AlphaMode::Opaque);
        assert_eq!(body.alpha_cutoff, None);

        let glass = &result.materials[1];
        assert_eq!(glass.alpha_mode, AlphaMode::Blend);
        assert!(glass.double_sided);
        assert_eq!(glass.textures.get(&TextureSlot::Normal), Some(&0));

        let leaves = &result.materials[2];
        assert_eq!(leaves.alpha_cutoff, Some(0.25));
        assert_eq!(leaves.metallic, 0.0);
    }

    #[test]
    fn test_import_images_and_samplers() {
        let result = import_document(SCENE_GLTF);
        let image = &result.images[0];
        assert_eq!((image.width, image.height), (1, 1));
        assert_eq!(image.pixels, vec![0, 0, 255, 127]);
        assert_eq!(image.uri, None);
        assert_eq!(image.mime_type.as_deref(), Some("image/png"));

        let sampler = result.textures[0].sampler;
        assert_eq!(sampler.mag_filter, MagFilter::Nearest);
        assert_eq!(sampler.min_filter, MinFilter::LinearMipmapLinear);
        assert_eq!(sampler.wrap_s, WrapMode::ClampToEdge);
        assert_eq!(sampler.wrap_t, WrapMode::Repeat);
    }

    #[test]
    fn test_imported_model_is_editable() {
        let builder = import_document(SCENE_GLTF)
            .into_builder()
            .unwrap();
        let mut viewer = ModelViewer::new();
        let model = viewer.load(builder).unwrap();

        let body = model.material_by_name("body").unwrap();
        assert_eq!(body.correlated().len(), 2);
        assert_eq!(body.alpha_cutoff(), ALPHA_CUTOFF_OPAQUE);

        let leaves = model.material(2).unwrap();
        assert_eq!(leaves.correlated().len(), 1);
        assert_eq!(leaves.alpha_cutoff(), 0.25);
        leaves.set_alpha_cutoff(0.5).unwrap();
        assert_eq!(leaves.alpha_cutoff(), 0.5);

        let texture = model.texture(0).unwrap();
        assert_eq!(texture.correlated().len(), 2);
        assert_eq!(texture.name(), "swatch");
    }

    #[test]
    fn test_mask_without_cutoff_uses_gltf_default() {
        let doc = SCENE_GLTF.replace("\"alphaCutoff\": 0.25,", "");
        let result = import_document(&doc);
        assert_eq!(result.materials[2].alpha_cutoff, Some(DEFAULT_MASK_CUTOFF));
    }

    #[test]
    fn test_import_slice_with_embedded_buffers() {
        let result = import_gltf_slice(PLAIN_GLTF.as_bytes()).unwrap();
        assert!(result.images.is_empty());
        assert_eq!(result.materials.len(), 1);
        assert_eq!(result.materials[0].alpha_cutoff, Some(DEFAULT_MASK_CUTOFF));
        assert_eq!(result.primitives[0].vertex_count, 3);
    }

    #[test]
    fn test_import_slice_rejects_uri_images() {
        let err = import_gltf_slice(SCENE_GLTF.as_bytes()).unwrap_err();
        assert!(matches!(err, OperaError::ImportError(_)));
    }

    #[test]
    #[cfg(target_pointer_width = "64")]
    fn test_rgba_len_does_not_overflow_u32() {
        assert_eq!(rgba_len(2, 3), 24);
        assert_eq!(rgba_len(65_536, 65_536), 17_179_869_184);
    }

    #[test]
    fn test_invalid_document() {
        let err = import_gltf_slice(b"{ not gltf").unwrap_err();
        assert!(matches!(err, OperaError::ImportError(_)));
    }

    #[test]
    fn test_load_texture_image() {
        let dir = std::env::temp_dir().join(format!("opera_test_{}", uuid::Uuid::new_v4()));
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join("swatch.png");
        fs::write(&path, PIXEL_PNG).unwrap();

        let image = load_texture_image(&path).unwrap();
        assert_eq!(image.name.as_deref(), Some("swatch"));
        assert_eq!(image.mime_type.as_deref(), Some("image/png"));
        assert_eq!(image.pixels, vec![0, 0, 255, 127]);

        assert!(load_texture_image(dir.join("missing.png")).is_err());
        fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_decode_texture_image() {
        let image = decode_texture_image(&PIXEL_PNG).unwrap();
        assert_eq!((image.width, image.height), (1, 1));
        assert!(decode_texture_image(b"nope").is_err());
    }
}
