//! Partial camera snapshot

use opera_core::{Limits, SphericalPositionDeg, Vector3D};
use serde::{Deserialize, Serialize};

/// Editor camera state. All units are degrees and meters.
///
/// Every field is optional: `None` means "no opinion" and leaves the
/// corresponding viewer attribute alone. A `Camera` is never edited in
/// place; the `with_*` methods return the superseding snapshot.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Camera {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub orbit: Option<SphericalPositionDeg>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field_of_view_deg: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<Vector3D>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub yaw_limits_deg: Option<Limits>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pitch_limits_deg: Option<Limits>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub radius_limits: Option<Limits>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fov_limits_deg: Option<Limits>,
}

impl Camera {
    /// Initial state: every field unset
    pub const INITIAL: Camera = Camera {
        orbit: None,
        field_of_view_deg: None,
        target: None,
        yaw_limits_deg: None,
        pitch_limits_deg: None,
        radius_limits: None,
        fov_limits_deg: None,
    };

    pub fn with_orbit(self, orbit: Option<SphericalPositionDeg>) -> Self {
        Self { orbit, ..self }
    }

    pub fn with_field_of_view_deg(self, field_of_view_deg: Option<f64>) -> Self {
        Self {
            field_of_view_deg,
            ..self
        }
    }

    pub fn with_target(self, target: Option<Vector3D>) -> Self {
        Self { target, ..self }
    }

    pub fn with_yaw_limits_deg(self, yaw_limits_deg: Option<Limits>) -> Self {
        Self {
            yaw_limits_deg,
            ..self
        }
    }

    pub fn with_pitch_limits_deg(self, pitch_limits_deg: Option<Limits>) -> Self {
        Self {
            pitch_limits_deg,
            ..self
        }
    }

    pub fn with_radius_limits(self, radius_limits: Option<Limits>) -> Self {
        Self {
            radius_limits,
            ..self
        }
    }

    pub fn with_fov_limits_deg(self, fov_limits_deg: Option<Limits>) -> Self {
        Self {
            fov_limits_deg,
            ..self
        }
    }

    /// True if any of the three axes encoded in `min/maxCameraOrbit` is set
    pub fn has_orbit_limits(&self) -> bool {
        self.yaw_limits_deg.is_some()
            || self.pitch_limits_deg.is_some()
            || self.radius_limits.is_some()
    }

    /// True if no field is set
    pub fn is_empty(&self) -> bool {
        *self == Self::INITIAL
    }
}
