//! Parser for the viewer's space-separated attribute values

use opera_core::{LimitBound, Limits, OperaError, Result, SphericalPositionDeg, Vector3D};
use pest::Parser;
use pest_derive::Parser;

#[derive(Parser)]
#[grammar = "grammar.pest"]
struct AttributeParser;

/// Unit suffix attached to a number
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Unit {
    Degrees,
    Radians,
    Meters,
    Centimeters,
    Millimeters,
    /// A bare number; angles read it as radians, lengths as meters
    None,
}

impl Unit {
    fn from_suffix(suffix: &str) -> Result<Self> {
        match suffix {
            "deg" => Ok(Unit::Degrees),
            "rad" => Ok(Unit::Radians),
            "m" => Ok(Unit::Meters),
            "cm" => Ok(Unit::Centimeters),
            "mm" => Ok(Unit::Millimeters),
            other => Err(OperaError::invalid_enum(
                other,
                &["deg", "rad", "m", "cm", "mm"],
            )),
        }
    }
}

/// One parsed attribute value
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ConfigValue {
    Auto,
    Number { value: f64, unit: Unit },
}

impl ConfigValue {
    /// Convert an angle to degrees
    pub fn to_degrees(&self, field: &str) -> Result<Option<f64>> {
        match *self {
            ConfigValue::Auto => Ok(None),
            ConfigValue::Number { value, unit } => match unit {
                Unit::Degrees => Ok(Some(value)),
                Unit::Radians | Unit::None => Ok(Some(value.to_degrees())),
                _ => Err(OperaError::ParseError(format!(
                    "{}: expected an angle, got a length",
                    field
                ))),
            },
        }
    }

    /// Convert a length to meters
    pub fn to_meters(&self, field: &str) -> Result<Option<f64>> {
        match *self {
            ConfigValue::Auto => Ok(None),
            ConfigValue::Number { value, unit } => match unit {
                Unit::Meters | Unit::None => Ok(Some(value)),
                Unit::Centimeters => Ok(Some(value / 100.0)),
                Unit::Millimeters => Ok(Some(value / 1000.0)),
                _ => Err(OperaError::ParseError(format!(
                    "{}: expected a length, got an angle",
                    field
                ))),
            },
        }
    }
}

/// Parse a space-separated list of values
pub fn parse_values(input: &str) -> Result<Vec<ConfigValue>> {
    let pairs = AttributeParser::parse(Rule::value_list, input)
        .map_err(|e| OperaError::ParseError(e.to_string()))?;

    let mut values = Vec::new();
    for pair in pairs {
        for inner in pair.into_inner() {
            match inner.as_rule() {
                Rule::auto => values.push(ConfigValue::Auto),
                Rule::quantity => values.push(parse_quantity(inner)?),
                _ => {}
            }
        }
    }

    Ok(values)
}

fn parse_quantity(pair: pest::iterators::Pair<Rule>) -> Result<ConfigValue> {
    let mut value = 0.0;
    let mut unit = Unit::None;

    for inner in pair.into_inner() {
        match inner.as_rule() {
            Rule::number => {
                value = inner
                    .as_str()
                    .parse()
                    .map_err(|_| OperaError::ParseError(format!("invalid number: {}", inner.as_str())))?;
            }
            Rule::unit => {
                unit = Unit::from_suffix(inner.as_str())?;
            }
            _ => {}
        }
    }

    Ok(ConfigValue::Number { value, unit })
}

fn parse_exact<const N: usize>(input: &str, field: &str) -> Result<[ConfigValue; N]> {
    let values = parse_values(input)?;
    let count = values.len();
    values.try_into().map_err(|_| {
        OperaError::ParseError(format!(
            "{}: expected {} values, got {} in '{}'",
            field, N, count, input
        ))
    })
}

fn require(value: Option<f64>, field: &str) -> Result<f64> {
    value.ok_or_else(|| OperaError::ParseError(format!("{}: 'auto' is not allowed here", field)))
}

/// Parse a `cameraOrbit` value such as `"33deg 75deg 1.5m"`
pub fn parse_orbit(input: &str) -> Result<SphericalPositionDeg> {
    let [theta, phi, radius] = parse_exact::<3>(input, "cameraOrbit")?;
    Ok(SphericalPositionDeg {
        theta_deg: require(theta.to_degrees("cameraOrbit theta")?, "cameraOrbit theta")?,
        phi_deg: require(phi.to_degrees("cameraOrbit phi")?, "cameraOrbit phi")?,
        radius: require(radius.to_meters("cameraOrbit radius")?, "cameraOrbit radius")?,
    })
}

/// Parse a `cameraTarget` value such as `"0m 1.2m -0.5m"`
pub fn parse_target(input: &str) -> Result<Vector3D> {
    let [x, y, z] = parse_exact::<3>(input, "cameraTarget")?;
    Ok(Vector3D {
        x: require(x.to_meters("cameraTarget x")?, "cameraTarget x")?,
        y: require(y.to_meters("cameraTarget y")?, "cameraTarget y")?,
        z: require(z.to_meters("cameraTarget z")?, "cameraTarget z")?,
    })
}

/// Parse a `fieldOfView` value such as `"30deg"`
pub fn parse_fov(input: &str) -> Result<f64> {
    let [fov] = parse_exact::<1>(input, "fieldOfView")?;
    require(fov.to_degrees("fieldOfView")?, "fieldOfView")
}

fn bound(value: Option<f64>) -> LimitBound {
    value.map(LimitBound::Value).unwrap_or(LimitBound::Auto)
}

fn limits_from_bounds(min: LimitBound, max: LimitBound) -> Limits {
    Limits {
        enabled: !(min.is_auto() && max.is_auto()),
        min,
        max,
    }
}

/// Parse a `minCameraOrbit`/`maxCameraOrbit` pair into yaw, pitch and
/// radius limits. An axis whose bounds are both `auto` comes back disabled.
pub fn parse_orbit_limits(min: &str, max: &str) -> Result<[Limits; 3]> {
    let [min_yaw, min_pitch, min_radius] = parse_exact::<3>(min, "minCameraOrbit")?;
    let [max_yaw, max_pitch, max_radius] = parse_exact::<3>(max, "maxCameraOrbit")?;

    Ok([
        limits_from_bounds(
            bound(min_yaw.to_degrees("minCameraOrbit yaw")?),
            bound(max_yaw.to_degrees("maxCameraOrbit yaw")?),
        ),
        limits_from_bounds(
            bound(min_pitch.to_degrees("minCameraOrbit pitch")?),
            bound(max_pitch.to_degrees("maxCameraOrbit pitch")?),
        ),
        limits_from_bounds(
            bound(min_radius.to_meters("minCameraOrbit radius")?),
            bound(max_radius.to_meters("maxCameraOrbit radius")?),
        ),
    ])
}

/// Parse a `minFov`/`maxFov` pair
pub fn parse_fov_limits(min: &str, max: &str) -> Result<Limits> {
    let [min] = parse_exact::<1>(min, "minFov")?;
    let [max] = parse_exact::<1>(max, "maxFov")?;
    Ok(limits_from_bounds(
        bound(min.to_degrees("minFov")?),
        bound(max.to_degrees("maxFov")?),
    ))
}
