//! Camera commands

use anyhow::{Context, Result};
use opera_camera::{camera_from_config, ConfigDocument, ModelViewerConfig};
use opera_core::{LimitBound, Limits, SphericalPositionDeg, Vector3D};
use opera_editor::{effective_config, Action, Store};

pub struct CameraArgs {
    pub config: String,
    pub orbit: Option<[f64; 3]>,
    pub target: Option<[f64; 3]>,
    pub fov: Option<f64>,
    pub yaw_limits: Option<Limits>,
    pub pitch_limits: Option<Limits>,
    pub radius_limits: Option<Limits>,
    pub fov_limits: Option<Limits>,
    pub write: bool,
}

pub fn parse_triple(s: &str) -> Result<[f64; 3], String> {
    let parts: Vec<&str> = s.split(',').collect();
    if parts.len() != 3 {
        return Err(format!("expected 3 comma-separated values, got {}", parts.len()));
    }
    let mut values = [0.0; 3];
    for (value, part) in values.iter_mut().zip(&parts) {
        *value = part
            .trim()
            .parse()
            .map_err(|e| format!("invalid number '{}': {}", part.trim(), e))?;
    }
    Ok(values)
}

/// `min,max` where either side may be `auto`, or `off` for disabled limits
pub fn parse_limits(s: &str) -> Result<Limits, String> {
    if s.trim() == "off" {
        return Ok(Limits::disabled());
    }
    let parts: Vec<&str> = s.split(',').map(str::trim).collect();
    let [min, max] = parts.as_slice() else {
        return Err(format!("expected min,max or off, got '{}'", s));
    };
    let bound = |text: &str| -> Result<LimitBound, String> {
        if text == LimitBound::AUTO {
            return Ok(LimitBound::Auto);
        }
        text.parse::<f64>()
            .map(LimitBound::Value)
            .map_err(|e| format!("invalid bound '{}': {}", text, e))
    };
    Ok(Limits {
        enabled: true,
        min: bound(*min)?,
        max: bound(*max)?,
    })
}

/// Replay the requested edits through the editor store
fn edit_store(config: ModelViewerConfig, args: &CameraArgs) -> Result<Store> {
    let initial = camera_from_config(&config).context("Failed to read camera from config")?;

    let mut store = Store::new();
    store.dispatch(Action::SetConfig(config));
    store.dispatch(Action::SetInitialCamera(initial));

    if let Some([theta, phi, radius]) = args.orbit {
        store.dispatch(Action::SetOrbit(Some(SphericalPositionDeg::new(
            theta, phi, radius,
        ))));
    }
    if let Some([x, y, z]) = args.target {
        store.dispatch(Action::SetTarget(Some(Vector3D::new(x, y, z))));
    }
    if let Some(fov) = args.fov {
        store.dispatch(Action::SetFieldOfView(Some(fov)));
    }
    if let Some(limits) = &args.yaw_limits {
        store.dispatch(Action::SetYawLimits(Some(limits.clone())));
    }
    if let Some(limits) = &args.pitch_limits {
        store.dispatch(Action::SetPitchLimits(Some(limits.clone())));
    }
    if let Some(limits) = &args.radius_limits {
        store.dispatch(Action::SetRadiusLimits(Some(limits.clone())));
    }
    if let Some(limits) = &args.fov_limits {
        store.dispatch(Action::SetFovLimits(Some(limits.clone())));
    }

    Ok(store)
}

/// Carry the config's existing limits for axes the edits leave alone.
/// Orbit limits are written as a triple, so an edit to one axis would
/// otherwise reset the other two to `auto`.
fn keep_unedited_limits(store: &mut Store) {
    let state = store.state();
    if !state.camera.has_orbit_limits() {
        return;
    }
    let initial = state.initial_camera.clone();
    let camera = state.camera.clone();
    if camera.yaw_limits_deg.is_none() && initial.yaw_limits_deg.is_some() {
        store.dispatch(Action::SetYawLimits(initial.yaw_limits_deg));
    }
    if camera.pitch_limits_deg.is_none() && initial.pitch_limits_deg.is_some() {
        store.dispatch(Action::SetPitchLimits(initial.pitch_limits_deg));
    }
    if camera.radius_limits.is_none() && initial.radius_limits.is_some() {
        store.dispatch(Action::SetRadiusLimits(initial.radius_limits));
    }
}

pub fn run(args: CameraArgs) -> Result<()> {
    let config = ModelViewerConfig::load(&args.config)
        .with_context(|| format!("Failed to load config '{}'", args.config))?;

    let mut store = edit_store(config, &args)?;
    keep_unedited_limits(&mut store);
    let edited = effective_config(store.state()).context("Failed to apply camera edits")?;

    if args.write {
        let mut doc = ConfigDocument::from_file(&args.config)?;
        let changed = doc.apply(&edited);
        doc.save(&args.config)?;
        if changed.is_empty() {
            println!("{}: no changes", args.config);
        } else {
            println!("{}: updated {}", args.config, changed.join(", "));
        }
    } else {
        print!("{}", edited.to_toml_string()?);
        println!("\n<model-viewer {}>", edited.to_attributes());
    }

    Ok(())
}

pub fn parse(config_path: &str) -> Result<()> {
    let config = ModelViewerConfig::load(config_path)
        .with_context(|| format!("Failed to load config '{}'", config_path))?;
    let camera = camera_from_config(&config)?;
    println!("{}", serde_json::to_string_pretty(&camera)?);
    Ok(())
}
