//! Editor state and its reducer

use opera_camera::{apply_camera_edits, Camera, ModelViewerConfig};
use opera_core::{Limits, Result, SphericalPositionDeg, Vector3D};
use serde::{Deserialize, Serialize};

/// Everything the camera editors read
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct State {
    /// Pending camera edits
    pub camera: Camera,
    /// Camera as it was when the model was loaded
    pub initial_camera: Camera,
    /// Set by any camera edit since the last load or reset
    pub is_dirty_camera: bool,
    /// The viewer config the edits apply to
    pub config: ModelViewerConfig,
}

/// A state transition
#[derive(Clone, Debug, PartialEq)]
pub enum Action {
    SetOrbit(Option<SphericalPositionDeg>),
    SetTarget(Option<Vector3D>),
    SetFieldOfView(Option<f64>),
    SetYawLimits(Option<Limits>),
    SetPitchLimits(Option<Limits>),
    SetRadiusLimits(Option<Limits>),
    SetFovLimits(Option<Limits>),
    /// Replace the pending edits wholesale
    SetCamera(Camera),
    /// Record the camera of a freshly loaded model
    SetInitialCamera(Camera),
    MarkCameraDirty,
    SetConfig(ModelViewerConfig),
    Reset,
}

impl Action {
    /// Short name for logs
    pub fn name(&self) -> &'static str {
        match self {
            Action::SetOrbit(_) => "SET_ORBIT",
            Action::SetTarget(_) => "SET_TARGET",
            Action::SetFieldOfView(_) => "SET_FIELD_OF_VIEW",
            Action::SetYawLimits(_) => "SET_YAW_LIMITS",
            Action::SetPitchLimits(_) => "SET_PITCH_LIMITS",
            Action::SetRadiusLimits(_) => "SET_RADIUS_LIMITS",
            Action::SetFovLimits(_) => "SET_FOV_LIMITS",
            Action::SetCamera(_) => "SET_CAMERA",
            Action::SetInitialCamera(_) => "SET_INITIAL_CAMERA",
            Action::MarkCameraDirty => "MARK_CAMERA_DIRTY",
            Action::SetConfig(_) => "SET_CONFIG",
            Action::Reset => "RESET",
        }
    }
}

/// The state that follows `state` after `action`
pub fn reduce(state: &State, action: Action) -> State {
    let camera = state.camera.clone();
    let edited = |camera: Camera| State {
        camera,
        is_dirty_camera: true,
        ..state.clone()
    };

    match action {
        Action::SetOrbit(orbit) => edited(camera.with_orbit(orbit)),
        Action::SetTarget(target) => edited(camera.with_target(target)),
        Action::SetFieldOfView(fov) => edited(camera.with_field_of_view_deg(fov)),
        Action::SetYawLimits(limits) => edited(camera.with_yaw_limits_deg(limits)),
        Action::SetPitchLimits(limits) => edited(camera.with_pitch_limits_deg(limits)),
        Action::SetRadiusLimits(limits) => edited(camera.with_radius_limits(limits)),
        Action::SetFovLimits(limits) => edited(camera.with_fov_limits_deg(limits)),
        Action::SetCamera(camera) => State {
            camera,
            ..state.clone()
        },
        Action::SetInitialCamera(initial_camera) => State {
            initial_camera,
            camera: Camera::INITIAL,
            is_dirty_camera: false,
            ..state.clone()
        },
        Action::MarkCameraDirty => State {
            is_dirty_camera: true,
            ..state.clone()
        },
        Action::SetConfig(config) => State {
            config,
            ..state.clone()
        },
        Action::Reset => State::default(),
    }
}

/// The config with the pending camera edits applied
pub fn effective_config(state: &State) -> Result<ModelViewerConfig> {
    let mut config = state.config.clone();
    apply_camera_edits(&mut config, &state.camera)?;
    Ok(config)
}
