//! The viewer's declarative attribute surface and its TOML persistence
//!
//! `ModelViewerConfig` mirrors the string attributes of the embeddable
//! viewer. It is stored as a flat TOML table keyed by the camelCase
//! attribute names. `ConfigDocument` patches an existing file key by key so
//! comments and ordering of unchanged content survive an editor save.

use opera_core::{OperaError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// String-valued viewer attributes. `None` means the attribute is not set.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelViewerConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub src: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub camera_orbit: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub camera_target: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field_of_view: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_camera_orbit: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_camera_orbit: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_fov: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_fov: Option<String>,
}

impl ModelViewerConfig {
    /// Load a config from a TOML file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Parse a config from a TOML string
    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Serialize the config to a TOML string
    pub fn to_toml_string(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Write the config to a TOML file, replacing its contents
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        fs::write(path, self.to_toml_string()?)?;
        Ok(())
    }

    /// (camelCase key, kebab-case attribute, value) for every field
    pub fn entries(&self) -> [(&'static str, &'static str, Option<&str>); 8] {
        [
            ("src", "src", self.src.as_deref()),
            ("cameraOrbit", "camera-orbit", self.camera_orbit.as_deref()),
            ("cameraTarget", "camera-target", self.camera_target.as_deref()),
            ("fieldOfView", "field-of-view", self.field_of_view.as_deref()),
            ("minCameraOrbit", "min-camera-orbit", self.min_camera_orbit.as_deref()),
            ("maxCameraOrbit", "max-camera-orbit", self.max_camera_orbit.as_deref()),
            ("minFov", "min-field-of-view", self.min_fov.as_deref()),
            ("maxFov", "max-field-of-view", self.max_fov.as_deref()),
        ]
    }

    /// Render the set attributes as an HTML attribute snippet, e.g.
    /// `src="a.glb" camera-orbit="0deg 75deg 2m"`
    pub fn to_attributes(&self) -> String {
        self.entries()
            .into_iter()
            .filter_map(|(_, attr, value)| {
                value.map(|v| format!("{}=\"{}\"", attr, escape_attribute(v)))
            })
            .collect::<Vec<_>>()
            .join(" ")
    }
}

fn escape_attribute(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('"', "&quot;")
        .replace('<', "&lt;")
}

/// A parsed config file that can be patched key by key
pub struct ConfigDocument {
    doc: toml_edit::DocumentMut,
}

impl ConfigDocument {
    /// Parse a config file into an editable document
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        Self::from_str(&content)
    }

    /// Parse a TOML string into an editable document
    pub fn from_str(content: &str) -> Result<Self> {
        let doc: toml_edit::DocumentMut = content
            .parse()
            .map_err(|e| OperaError::TomlParseError(format!("{}", e)))?;
        Ok(Self { doc })
    }

    /// Write every set field of `config` whose value differs from the
    /// document. Unset fields are left alone. Returns the changed keys.
    pub fn apply(&mut self, config: &ModelViewerConfig) -> Vec<&'static str> {
        let mut changed = Vec::new();

        for (key, _, value) in config.entries() {
            let Some(value) = value else {
                continue;
            };
            let current = self.doc.get(key).and_then(|item| item.as_str());
            if current != Some(value) {
                self.doc[key] = toml_edit::value(value);
                changed.push(key);
            }
        }

        changed
    }

    /// Serialize the document back to a string (preserving formatting)
    pub fn to_string(&self) -> String {
        self.doc.to_string()
    }

    /// Write the document to a file
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        fs::write(path, self.to_string())?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn temp_dir() -> PathBuf {
        let dir = std::env::temp_dir().join(format!("opera_test_{}", uuid::Uuid::new_v4()));
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn test_config_deserialization() {
        let toml_str = r#"
src = "models/helmet.glb"
cameraOrbit = "0deg 75deg 2m"
minCameraOrbit = "auto auto auto"
"#;
        let config = ModelViewerConfig::from_toml_str(toml_str).unwrap();
        assert_eq!(config.src.as_deref(), Some("models/helmet.glb"));
        assert_eq!(config.camera_orbit.as_deref(), Some("0deg 75deg 2m"));
        assert_eq!(config.field_of_view, None);
    }

    #[test]
    fn test_save_and_load() {
        let dir = temp_dir();
        let path = dir.join("viewer.toml");

        let config = ModelViewerConfig {
            field_of_view: Some("30deg".to_string()),
            ..Default::default()
        };
        config.save(&path).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert!(content.contains("fieldOfView = \"30deg\""));
        assert!(!content.contains("cameraOrbit"));
        assert_eq!(ModelViewerConfig::load(&path).unwrap(), config);

        fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_to_attributes() {
        let config = ModelViewerConfig {
            src: Some("a \"b\".glb".to_string()),
            min_fov: Some("20deg".to_string()),
            ..Default::default()
        };
        assert_eq!(
            config.to_attributes(),
            "src=\"a &quot;b&quot;.glb\" min-field-of-view=\"20deg\""
        );
    }

    #[test]
    fn test_patch_preserves_comments() {
        let original = r#"# Viewer for the product page
src = "models/helmet.glb"

# Hand-tuned framing
cameraOrbit = "0deg 75deg 2m"
fieldOfView = "30deg"
"#;
        let mut doc = ConfigDocument::from_str(original).unwrap();
        let config = ModelViewerConfig {
            src: Some("models/helmet.glb".to_string()),
            camera_orbit: Some("45deg 60deg 2.5m".to_string()),
            min_fov: Some("10deg".to_string()),
            ..Default::default()
        };
        let changed = doc.apply(&config);
        assert_eq!(changed, vec!["cameraOrbit", "minFov"]);

        let result = doc.to_string();
        assert!(result.contains("# Viewer for the product page"));
        assert!(result.contains("# Hand-tuned framing"));
        assert!(result.contains("cameraOrbit = \"45deg 60deg 2.5m\""));
        assert!(result.contains("fieldOfView = \"30deg\""));
        assert!(result.contains("minFov = \"10deg\""));
    }
}
