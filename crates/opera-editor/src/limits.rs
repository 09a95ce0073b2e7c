//! Camera-limits editors
//!
//! Each editor (yaw, pitch, radius, field of view) is a [`LimitsPanel`]
//! over a [`LimitsEditor`] that supplies its labels, its absolute range,
//! which camera field it edits and which preview value its "set" buttons
//! capture. The panel holds the displayed `input_limits`, refreshed from
//! the store by `state_changed`, and dispatches every change back.

use crate::state::{Action, State};
use crate::store::Store;
use opera_camera::Camera;
use opera_core::{LimitBound, Limits};

/// Source of the live camera of the preview viewer
pub trait CameraPreview {
    /// Current camera, or `None` when no model is shown
    fn current_camera(&self) -> Option<Camera>;
}

impl CameraPreview for Camera {
    fn current_camera(&self) -> Option<Camera> {
        Some(self.clone())
    }
}

impl CameraPreview for Option<Camera> {
    fn current_camera(&self) -> Option<Camera> {
        self.clone()
    }
}

/// What distinguishes one limits editor from another
pub trait LimitsEditor {
    fn label(&self) -> &'static str;
    fn minimum_label(&self) -> &'static str;
    fn maximum_label(&self) -> &'static str;
    fn absolute_minimum(&self) -> f64;
    fn absolute_maximum(&self) -> f64;

    /// The camera field this editor edits
    fn limits_property<'a>(&self, camera: &'a Camera) -> Option<&'a Limits>;

    /// The action that stores `limits` in that field
    fn limits_action(&self, limits: Option<Limits>) -> Action;

    /// The preview camera's value for this axis, unrounded
    fn preview_value(&self, camera: &Camera) -> Option<f64>;
}

/// Shared editor behavior over any [`LimitsEditor`]
#[derive(Debug, Clone)]
pub struct LimitsPanel<E> {
    editor: E,
    input_limits: Limits,
    is_dirty_camera: bool,
}

impl<E: LimitsEditor> LimitsPanel<E> {
    pub fn new(editor: E) -> Self {
        let input_limits = Self::default_limits(&editor);
        Self {
            editor,
            input_limits,
            is_dirty_camera: false,
        }
    }

    fn default_limits(editor: &E) -> Limits {
        Limits::new(editor.absolute_minimum(), editor.absolute_maximum()).with_enabled(false)
    }

    pub fn editor(&self) -> &E {
        &self.editor
    }

    /// Limits as currently displayed
    pub fn input_limits(&self) -> &Limits {
        &self.input_limits
    }

    pub fn is_dirty_camera(&self) -> bool {
        self.is_dirty_camera
    }

    /// Displayed minimum; `auto` shows as the absolute minimum
    pub fn min_value(&self) -> f64 {
        self.input_limits
            .min
            .as_f64()
            .unwrap_or_else(|| self.editor.absolute_minimum())
    }

    /// Displayed maximum; `auto` shows as the absolute maximum
    pub fn max_value(&self) -> f64 {
        self.input_limits
            .max
            .as_f64()
            .unwrap_or_else(|| self.editor.absolute_maximum())
    }

    /// Refresh from the store
    pub fn state_changed(&mut self, state: &State) {
        self.input_limits = match self.editor.limits_property(&state.camera) {
            Some(limits) => limits.clone(),
            None => Self::default_limits(&self.editor),
        };
        self.is_dirty_camera = state.is_dirty_camera;
    }

    pub fn set_enabled(&mut self, store: &mut Store, enabled: bool) {
        let limits = self.input_limits.clone().with_enabled(enabled);
        self.dispatch(store, limits);
    }

    pub fn set_min(&mut self, store: &mut Store, value: f64) {
        let limits = self.input_limits.clone().with_min(self.clamp(value));
        self.dispatch(store, limits);
    }

    pub fn set_max(&mut self, store: &mut Store, value: f64) {
        let limits = self.input_limits.clone().with_max(self.clamp(value));
        self.dispatch(store, limits);
    }

    /// The preview's value for this axis rounded to a whole unit, or 0 when
    /// the preview has no camera
    pub fn current_preview_value(&self, preview: &dyn CameraPreview) -> f64 {
        preview
            .current_camera()
            .and_then(|camera| self.editor.preview_value(&camera))
            .map(f64::round)
            .unwrap_or(0.0)
    }

    pub fn set_min_from_preview(&mut self, store: &mut Store, preview: &dyn CameraPreview) {
        let value = self.current_preview_value(preview);
        self.set_min(store, value);
    }

    pub fn set_max_from_preview(&mut self, store: &mut Store, preview: &dyn CameraPreview) {
        let value = self.current_preview_value(preview);
        self.set_max(store, value);
    }

    fn clamp(&self, value: f64) -> LimitBound {
        LimitBound::Value(
            value.clamp(self.editor.absolute_minimum(), self.editor.absolute_maximum()),
        )
    }

    fn dispatch(&mut self, store: &mut Store, limits: Limits) {
        store.dispatch(self.editor.limits_action(Some(limits)));
        self.state_changed(store.state());
    }
}

/// Yaw limits: azimuth in degrees
#[derive(Debug, Clone, Copy, Default)]
pub struct YawLimits;

impl YawLimits {
    pub const DEFAULT_MIN: f64 = -180.0;
    pub const DEFAULT_MAX: f64 = 180.0;
}

impl LimitsEditor for YawLimits {
    fn label(&self) -> &'static str {
        "Apply Yaw Limits"
    }

    fn minimum_label(&self) -> &'static str {
        "Counter-Clockwise Limit"
    }

    fn maximum_label(&self) -> &'static str {
        "Clockwise Limit"
    }

    fn absolute_minimum(&self) -> f64 {
        Self::DEFAULT_MIN
    }

    fn absolute_maximum(&self) -> f64 {
        Self::DEFAULT_MAX
    }

    fn limits_property<'a>(&self, camera: &'a Camera) -> Option<&'a Limits> {
        camera.yaw_limits_deg.as_ref()
    }

    fn limits_action(&self, limits: Option<Limits>) -> Action {
        Action::SetYawLimits(limits)
    }

    fn preview_value(&self, camera: &Camera) -> Option<f64> {
        camera.orbit.as_ref().map(|orbit| orbit.theta_deg)
    }
}

/// Pitch limits: degrees from the up vector
#[derive(Debug, Clone, Copy, Default)]
pub struct PitchLimits;

impl PitchLimits {
    pub const DEFAULT_MIN: f64 = 0.0;
    pub const DEFAULT_MAX: f64 = 180.0;
}

impl LimitsEditor for PitchLimits {
    fn label(&self) -> &'static str {
        "Apply Pitch Limits"
    }

    fn minimum_label(&self) -> &'static str {
        "Top-down Limit"
    }

    fn maximum_label(&self) -> &'static str {
        "Bottom-up Limit"
    }

    fn absolute_minimum(&self) -> f64 {
        Self::DEFAULT_MIN
    }

    fn absolute_maximum(&self) -> f64 {
        Self::DEFAULT_MAX
    }

    fn limits_property<'a>(&self, camera: &'a Camera) -> Option<&'a Limits> {
        camera.pitch_limits_deg.as_ref()
    }

    fn limits_action(&self, limits: Option<Limits>) -> Action {
        Action::SetPitchLimits(limits)
    }

    fn preview_value(&self, camera: &Camera) -> Option<f64> {
        camera.orbit.as_ref().map(|orbit| orbit.phi_deg)
    }
}

/// Radius limits in meters, from zero up to a ceiling chosen per model
#[derive(Debug, Clone, Copy)]
pub struct RadiusLimits {
    ceiling: f64,
}

impl RadiusLimits {
    pub const DEFAULT_CEILING: f64 = 100.0;

    pub fn new(ceiling: f64) -> Self {
        Self {
            ceiling: ceiling.max(0.0),
        }
    }
}

impl Default for RadiusLimits {
    fn default() -> Self {
        Self::new(Self::DEFAULT_CEILING)
    }
}

impl LimitsEditor for RadiusLimits {
    fn label(&self) -> &'static str {
        "Apply Radius Limits"
    }

    fn minimum_label(&self) -> &'static str {
        "Closest Limit"
    }

    fn maximum_label(&self) -> &'static str {
        "Farthest Limit"
    }

    fn absolute_minimum(&self) -> f64 {
        0.0
    }

    fn absolute_maximum(&self) -> f64 {
        self.ceiling
    }

    fn limits_property<'a>(&self, camera: &'a Camera) -> Option<&'a Limits> {
        camera.radius_limits.as_ref()
    }

    fn limits_action(&self, limits: Option<Limits>) -> Action {
        Action::SetRadiusLimits(limits)
    }

    fn preview_value(&self, camera: &Camera) -> Option<f64> {
        camera.orbit.as_ref().map(|orbit| orbit.radius)
    }
}

/// Field-of-view limits in degrees
#[derive(Debug, Clone, Copy, Default)]
pub struct FovLimits;

impl FovLimits {
    pub const DEFAULT_MIN: f64 = 10.0;
    pub const DEFAULT_MAX: f64 = 90.0;
}

impl LimitsEditor for FovLimits {
    fn label(&self) -> &'static str {
        "Apply FOV Limits"
    }

    fn minimum_label(&self) -> &'static str {
        "Min FOV"
    }

    fn maximum_label(&self) -> &'static str {
        "Max FOV"
    }

    fn absolute_minimum(&self) -> f64 {
        Self::DEFAULT_MIN
    }

    fn absolute_maximum(&self) -> f64 {
        Self::DEFAULT_MAX
    }

    fn limits_property<'a>(&self, camera: &'a Camera) -> Option<&'a Limits> {
        camera.fov_limits_deg.as_ref()
    }

    fn limits_action(&self, limits: Option<Limits>) -> Action {
        Action::SetFovLimits(limits)
    }

    fn preview_value(&self, camera: &Camera) -> Option<f64> {
        camera.field_of_view_deg
    }
}
