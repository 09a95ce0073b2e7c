//! Camera value types

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// A point in model space, in meters
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Vector3D {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Vector3D {
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }
}

/// Camera orbit position: azimuth and polar angle in degrees, radius in meters
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SphericalPositionDeg {
    pub theta_deg: f64,
    pub phi_deg: f64,
    pub radius: f64,
}

impl SphericalPositionDeg {
    pub const fn new(theta_deg: f64, phi_deg: f64, radius: f64) -> Self {
        Self {
            theta_deg,
            phi_deg,
            radius,
        }
    }
}

/// One side of a limits range.
///
/// `Auto` is the "no override" sentinel. `Keyword` keeps any other text a
/// caller managed to store (for instance through a hand-edited config file);
/// formatting such a bound is an error rather than a silent `auto`.
#[derive(Clone, Debug, PartialEq)]
pub enum LimitBound {
    Auto,
    Value(f64),
    Keyword(String),
}

impl LimitBound {
    pub const AUTO: &'static str = "auto";

    pub fn is_auto(&self) -> bool {
        matches!(self, LimitBound::Auto)
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            LimitBound::Value(v) => Some(*v),
            _ => None,
        }
    }
}

impl From<f64> for LimitBound {
    fn from(value: f64) -> Self {
        LimitBound::Value(value)
    }
}

impl fmt::Display for LimitBound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LimitBound::Auto => write!(f, "{}", Self::AUTO),
            LimitBound::Value(v) => write!(f, "{}", v),
            LimitBound::Keyword(k) => write!(f, "{}", k),
        }
    }
}

impl Serialize for LimitBound {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            LimitBound::Auto => serializer.serialize_str(Self::AUTO),
            LimitBound::Value(v) => serializer.serialize_f64(*v),
            LimitBound::Keyword(k) => serializer.serialize_str(k),
        }
    }
}

impl<'de> Deserialize<'de> for LimitBound {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RawBound {
            Number(f64),
            Text(String),
        }

        Ok(match RawBound::deserialize(deserializer)? {
            RawBound::Number(v) => LimitBound::Value(v),
            RawBound::Text(t) if t == Self::AUTO => LimitBound::Auto,
            RawBound::Text(t) => LimitBound::Keyword(t),
        })
    }
}

static AUTO_BOUND: LimitBound = LimitBound::Auto;

/// An enable-able min/max range for one camera axis.
///
/// When `enabled` is false both bounds read as `auto`, whatever is stored;
/// the stored values are kept so re-enabling restores them.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Limits {
    pub enabled: bool,
    pub min: LimitBound,
    pub max: LimitBound,
}

impl Limits {
    /// Enabled limits with numeric bounds
    pub fn new(min: f64, max: f64) -> Self {
        Self {
            enabled: true,
            min: LimitBound::Value(min),
            max: LimitBound::Value(max),
        }
    }

    /// Disabled limits, both bounds `auto`
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            min: LimitBound::Auto,
            max: LimitBound::Auto,
        }
    }

    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    pub fn with_min(mut self, min: impl Into<LimitBound>) -> Self {
        self.min = min.into();
        self
    }

    pub fn with_max(mut self, max: impl Into<LimitBound>) -> Self {
        self.max = max.into();
        self
    }

    /// The lower bound as the viewer sees it
    pub fn effective_min(&self) -> &LimitBound {
        if self.enabled {
            &self.min
        } else {
            &AUTO_BOUND
        }
    }

    /// The upper bound as the viewer sees it
    pub fn effective_max(&self) -> &LimitBound {
        if self.enabled {
            &self.max
        } else {
            &AUTO_BOUND
        }
    }
}

impl Default for Limits {
    fn default() -> Self {
        Self::disabled()
    }
}
