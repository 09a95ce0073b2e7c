//! Formatting of camera values into viewer attribute strings

use opera_core::{
    format_number, round_to_digits, LimitBound, Limits, OperaError, Result, SphericalPositionDeg,
    Vector3D, DIGITS,
};

fn rounded(value: f64) -> String {
    format_number(round_to_digits(value, DIGITS))
}

/// `"<theta>deg <phi>deg <radius>m"`
pub fn get_orbit_string(orbit: &SphericalPositionDeg) -> String {
    format!(
        "{}deg {}deg {}m",
        rounded(orbit.theta_deg),
        rounded(orbit.phi_deg),
        rounded(orbit.radius)
    )
}

/// `"<x>m <y>m <z>m"`
pub fn get_target_string(target: &Vector3D) -> String {
    format!(
        "{}m {}m {}m",
        rounded(target.x),
        rounded(target.y),
        rounded(target.z)
    )
}

/// `"<fov>deg"`
pub fn get_fov(fov: f64) -> String {
    format!("{}deg", rounded(fov))
}

fn bound_string(bound: &LimitBound, side: &'static str, suffix: &str) -> Result<String> {
    match bound {
        LimitBound::Auto => Ok(LimitBound::AUTO.to_string()),
        LimitBound::Value(v) => Ok(format!("{}{}", rounded(*v), suffix)),
        LimitBound::Keyword(k) => Err(OperaError::InvalidLimitValue {
            side,
            suffix: suffix.to_string(),
            value: k.clone(),
        }),
    }
}

/// Lower bound of `limits` with `suffix`, or `"auto"` when unset or disabled
pub fn get_min_string(limits: Option<&Limits>, suffix: &str) -> Result<String> {
    match limits {
        Some(limits) => bound_string(limits.effective_min(), "Min", suffix),
        None => Ok(LimitBound::AUTO.to_string()),
    }
}

/// Upper bound of `limits` with `suffix`, or `"auto"` when unset or disabled
pub fn get_max_string(limits: Option<&Limits>, suffix: &str) -> Result<String> {
    match limits {
        Some(limits) => bound_string(limits.effective_max(), "Max", suffix),
        None => Ok(LimitBound::AUTO.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_orbit;

    #[test]
    fn test_orbit_string() {
        let orbit = SphericalPositionDeg::new(33.0, 75.123456, 1.5);
        assert_eq!(get_orbit_string(&orbit), "33deg 75.1235deg 1.5m");
    }

    #[test]
    fn test_orbit_string_parses_back() {
        let orbits = [
            SphericalPositionDeg::new(0.0, 0.0, 0.0),
            SphericalPositionDeg::new(-179.99996, 90.00004, 12.345678),
            SphericalPositionDeg::new(1e-7, 45.5, 1234.5),
        ];
        for orbit in orbits {
            let parsed = parse_orbit(&get_orbit_string(&orbit)).unwrap();
            assert!((parsed.theta_deg - orbit.theta_deg).abs() <= 5e-5);
            assert!((parsed.phi_deg - orbit.phi_deg).abs() <= 5e-5);
            assert!((parsed.radius - orbit.radius).abs() <= 5e-5);
        }
    }

    #[test]
    fn test_target_and_fov() {
        assert_eq!(get_target_string(&Vector3D::new(0.0, -0.25, 3.0)), "0m -0.25m 3m");
        assert_eq!(get_fov(30.00001), "30deg");
    }

    #[test]
    fn test_disabled_limits_are_auto() {
        let limits = Limits::new(-45.0, 45.0).with_enabled(false);
        assert_eq!(get_min_string(Some(&limits), "deg").unwrap(), "auto");
        assert_eq!(get_max_string(Some(&limits), "deg").unwrap(), "auto");
        assert_eq!(get_min_string(None, "m").unwrap(), "auto");
    }

    #[test]
    fn test_disabled_keyword_is_still_auto() {
        let limits = Limits::disabled().with_min(LimitBound::Keyword("near".to_string()));
        assert_eq!(get_min_string(Some(&limits), "m").unwrap(), "auto");
    }

    #[test]
    fn test_enabled_limits() {
        let limits = Limits::new(12.0, 34.56789).with_min(LimitBound::Auto);
        assert_eq!(get_min_string(Some(&limits), "deg").unwrap(), "auto");
        assert_eq!(get_max_string(Some(&limits), "deg").unwrap(), "34.5679deg");
    }

    #[test]
    fn test_keyword_bound_is_an_error() {
        let limits = Limits::new(0.0, 1.0).with_max(LimitBound::Keyword("far".to_string()));
        let err = get_max_string(Some(&limits), "m").unwrap_err();
        assert!(matches!(
            err,
            OperaError::InvalidLimitValue { side: "Max", ref suffix, .. } if suffix == "m"
        ));
        assert!(get_min_string(Some(&limits), "m").is_ok());
    }
}
