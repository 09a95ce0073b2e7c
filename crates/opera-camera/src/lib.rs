//! Opera Camera - Camera state and the viewer's attribute grammar
//!
//! A [`Camera`] is a partial snapshot of orbit, target, field of view and
//! limit settings. [`apply_camera_edits`] merges one into a
//! [`ModelViewerConfig`], the string-valued attribute surface of the
//! embeddable viewer; [`camera_from_config`] goes the other way.

mod camera;
mod config;
mod edits;
mod format;
mod parser;

pub use camera::Camera;
pub use config::{ConfigDocument, ModelViewerConfig};
pub use edits::{apply_camera_edits, camera_from_config};
pub use format::{get_fov, get_max_string, get_min_string, get_orbit_string, get_target_string};
pub use parser::{
    parse_fov, parse_fov_limits, parse_orbit, parse_orbit_limits, parse_target, parse_values,
    ConfigValue, Unit,
};
