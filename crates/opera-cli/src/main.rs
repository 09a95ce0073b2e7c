//! Opera CLI - Inspect and edit models and viewer configs from the command line

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use commands::{camera, inspect, material};
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

#[derive(Parser)]
#[command(name = "opera")]
#[command(about = "Edit glTF materials and model-viewer camera settings", long_about = None)]
#[command(version)]
struct Cli {
    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List a model's materials and textures
    Inspect {
        /// Path to a .gltf or .glb file
        model: String,

        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },

    /// Edit one material of a model and print the result
    Material {
        /// Path to a .gltf or .glb file
        model: String,

        /// Material index
        index: usize,

        /// OPAQUE, MASK or BLEND
        #[arg(long)]
        alpha_mode: Option<String>,

        #[arg(long)]
        alpha_cutoff: Option<f64>,

        #[arg(long)]
        double_sided: Option<bool>,

        /// Image file to bind as the base color texture
        #[arg(long)]
        base_color_texture: Option<String>,

        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },

    /// Apply camera edits to a viewer config
    Camera {
        /// Path to the viewer config (TOML)
        #[arg(long)]
        config: String,

        /// Orbit as theta,phi,radius (degrees, degrees, meters)
        #[arg(long, value_parser = camera::parse_triple)]
        orbit: Option<[f64; 3]>,

        /// Target as x,y,z (meters)
        #[arg(long, value_parser = camera::parse_triple)]
        target: Option<[f64; 3]>,

        /// Field of view in degrees
        #[arg(long)]
        fov: Option<f64>,

        /// Yaw limits as min,max in degrees (either may be auto), or off
        #[arg(long, value_parser = camera::parse_limits, allow_hyphen_values = true)]
        yaw_limits: Option<opera_core::Limits>,

        /// Pitch limits as min,max in degrees, or off
        #[arg(long, value_parser = camera::parse_limits, allow_hyphen_values = true)]
        pitch_limits: Option<opera_core::Limits>,

        /// Radius limits as min,max in meters, or off
        #[arg(long, value_parser = camera::parse_limits)]
        radius_limits: Option<opera_core::Limits>,

        /// Field-of-view limits as min,max in degrees, or off
        #[arg(long, value_parser = camera::parse_limits)]
        fov_limits: Option<opera_core::Limits>,

        /// Patch the config file in place instead of printing
        #[arg(long)]
        write: bool,
    },

    /// Print the camera described by a viewer config
    CameraParse {
        /// Path to the viewer config (TOML)
        config: String,
    },
}

fn init_logging(log_level: &str) -> Result<()> {
    let level = match log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::WARN,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(true)
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(&cli.log_level)?;

    match cli.command {
        Commands::Inspect { model, format } => inspect::run(&model, &format),
        Commands::Material {
            model,
            index,
            alpha_mode,
            alpha_cutoff,
            double_sided,
            base_color_texture,
            format,
        } => material::run(material::MaterialArgs {
            model,
            index,
            alpha_mode,
            alpha_cutoff,
            double_sided,
            base_color_texture,
            format,
        }),
        Commands::Camera {
            config,
            orbit,
            target,
            fov,
            yaw_limits,
            pitch_limits,
            radius_limits,
            fov_limits,
            write,
        } => camera::run(camera::CameraArgs {
            config,
            orbit,
            target,
            fov,
            yaw_limits,
            pitch_limits,
            radius_limits,
            fov_limits,
            write,
        }),
        Commands::CameraParse { config } => camera::parse(&config),
    }
}
