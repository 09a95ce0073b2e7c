//! Merging camera edits into the viewer config and reading them back

use crate::camera::Camera;
use crate::config::ModelViewerConfig;
use crate::format::{get_fov, get_max_string, get_min_string, get_orbit_string, get_target_string};
use crate::parser::{parse_fov, parse_fov_limits, parse_orbit, parse_orbit_limits, parse_target};
use opera_core::Result;
use tracing::debug;

/// Orbit limit strings for all three axes. Yaw, pitch and radius share the
/// `minCameraOrbit`/`maxCameraOrbit` attributes, so both strings are always
/// rebuilt together; an axis the camera has no opinion on becomes `auto`.
fn orbit_limit_strings(edits: &Camera) -> Result<(String, String)> {
    let yaw = edits.yaw_limits_deg.as_ref();
    let pitch = edits.pitch_limits_deg.as_ref();
    let radius = edits.radius_limits.as_ref();

    let min = format!(
        "{} {} {}",
        get_min_string(yaw, "deg")?,
        get_min_string(pitch, "deg")?,
        get_min_string(radius, "m")?
    );
    let max = format!(
        "{} {} {}",
        get_max_string(yaw, "deg")?,
        get_max_string(pitch, "deg")?,
        get_max_string(radius, "m")?
    );
    Ok((min, max))
}

/// Apply the camera edits to the given config. Fields not set in `edits`
/// leave the corresponding config field untouched.
///
/// Every string is formatted before the config is touched, so an invalid
/// limit leaves `config` exactly as it was.
pub fn apply_camera_edits(config: &mut ModelViewerConfig, edits: &Camera) -> Result<()> {
    let orbit = edits.orbit.as_ref().map(get_orbit_string);
    let target = edits.target.as_ref().map(get_target_string);
    let fov = edits.field_of_view_deg.map(get_fov);

    let orbit_limits = if edits.has_orbit_limits() {
        Some(orbit_limit_strings(edits)?)
    } else {
        None
    };

    let fov_limits = match edits.fov_limits_deg.as_ref() {
        Some(limits) => Some((
            get_min_string(Some(limits), "deg")?,
            get_max_string(Some(limits), "deg")?,
        )),
        None => None,
    };

    if let Some(orbit) = orbit {
        config.camera_orbit = Some(orbit);
    }
    if let Some(target) = target {
        config.camera_target = Some(target);
    }
    if let Some(fov) = fov {
        config.field_of_view = Some(fov);
    }
    if let Some((min, max)) = orbit_limits {
        config.min_camera_orbit = Some(min);
        config.max_camera_orbit = Some(max);
    }
    if let Some((min, max)) = fov_limits {
        config.min_fov = Some(min);
        config.max_fov = Some(max);
    }

    debug!(?config, "applied camera edits");
    Ok(())
}

/// Read a camera snapshot back out of a config.
///
/// Attributes that are unset stay `None`. Orbit limits are only read when
/// both `minCameraOrbit` and `maxCameraOrbit` are present, and likewise for
/// the field-of-view pair.
pub fn camera_from_config(config: &ModelViewerConfig) -> Result<Camera> {
    let mut camera = Camera::INITIAL;

    if let Some(orbit) = config.camera_orbit.as_deref() {
        camera = camera.with_orbit(Some(parse_orbit(orbit)?));
    }
    if let Some(target) = config.camera_target.as_deref() {
        camera = camera.with_target(Some(parse_target(target)?));
    }
    if let Some(fov) = config.field_of_view.as_deref() {
        camera = camera.with_field_of_view_deg(Some(parse_fov(fov)?));
    }
    if let (Some(min), Some(max)) = (
        config.min_camera_orbit.as_deref(),
        config.max_camera_orbit.as_deref(),
    ) {
        let [yaw, pitch, radius] = parse_orbit_limits(min, max)?;
        camera = camera
            .with_yaw_limits_deg(Some(yaw))
            .with_pitch_limits_deg(Some(pitch))
            .with_radius_limits(Some(radius));
    }
    if let (Some(min), Some(max)) = (config.min_fov.as_deref(), config.max_fov.as_deref()) {
        camera = camera.with_fov_limits_deg(Some(parse_fov_limits(min, max)?));
    }

    Ok(camera)
}
