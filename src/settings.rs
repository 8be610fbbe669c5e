use anyhow::Result;
use clap::Parser;
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::env;
use std::fmt;

use crate::ior::Ior;
use crate::layer::{Layer, Stack};
use crate::model::{Bolton, ReflectanceModel, TransferMatrix};
use crate::spectrum::WavelengthGrid;

#[cfg(test)]
mod tests {

    use super::*;

    fn base_settings() -> Settings {
        Settings {
            wavelength_min: 380.0,
            wavelength_max: 780.0,
            wavelength_step: 1.0,
            incidence: 45.0,
            ambient: MediumSettings { n: 1.0, k: 0.0 },
            substrate: MediumSettings { n: 1.5, k: 0.0 },
            film_a: FilmSettings {
                n: 1.6,
                k: 0.0,
                thickness: 90.6,
                thickness_sd: 8.0,
            },
            film_b: FilmSettings {
                n: 1.5,
                k: 0.0,
                thickness: 60.0,
                thickness_sd: 8.0,
            },
            layers: 100,
            model: Model::Tmm,
            realizations: 32,
            seed: Some(1),
            directory: ".".to_string(),
        }
    }

    #[test]
    fn stack_has_bounding_media() {
        let settings = base_settings();
        let stack = settings.stack().unwrap();
        assert_eq!(stack.layers.len(), 102);
        assert!(stack.layers[0].is_semi_infinite());
        assert!(stack.layers[101].is_semi_infinite());
        assert_eq!(stack.layers[1].variance, 64.0);
    }

    #[test]
    fn grid_matches_bounds() {
        let settings = base_settings();
        let grid = settings.grid().unwrap();
        assert_eq!(grid.len(), 400);
    }

    #[test]
    fn evaluator_follows_model() {
        let mut settings = base_settings();
        assert_eq!(settings.evaluator().name(), "tmm");
        settings.model = Model::Bolton;
        assert_eq!(settings.evaluator().name(), "bolton");
    }
}

/// Reflectance evaluation strategy selected by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Model {
    Tmm,
    Bolton,
}

/// One semi-infinite bounding medium.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MediumSettings {
    pub n: f64,
    pub k: f64,
}

/// One lamellae film of the alternating structure.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FilmSettings {
    pub n: f64,
    pub k: f64,
    /// Mean thickness in nm.
    pub thickness: f64,
    /// Standard deviation of the thickness in nm.
    pub thickness_sd: f64,
}

impl FilmSettings {
    fn layer(&self) -> Layer {
        Layer::film(
            self.thickness,
            self.thickness_sd * self.thickness_sd,
            Ior::constant(self.n, self.k),
        )
    }
}

/// Runtime configuration for the application.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    pub wavelength_min: f64,
    pub wavelength_max: f64,
    pub wavelength_step: f64,
    /// Global angle of incidence in degrees.
    pub incidence: f64,
    pub ambient: MediumSettings,
    pub substrate: MediumSettings,
    pub film_a: FilmSettings,
    pub film_b: FilmSettings,
    /// Number of interior lamellae in the alternating stack.
    pub layers: usize,
    pub model: Model,
    /// Stochastic realizations averaged per wavelength sample.
    pub realizations: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
    #[serde(default = "default_directory")]
    pub directory: String,
}

fn default_directory() -> String {
    ".".to_string()
}

impl Settings {
    pub fn grid(&self) -> Result<WavelengthGrid> {
        WavelengthGrid::new(
            self.wavelength_min,
            self.wavelength_max,
            self.wavelength_step,
        )
    }

    /// Builds the alternating stack described by the configuration.
    pub fn stack(&self) -> Result<Stack> {
        Stack::alternating(
            Layer::semi_infinite(Ior::constant(self.ambient.n, self.ambient.k)),
            self.film_a.layer(),
            self.film_b.layer(),
            Layer::semi_infinite(Ior::constant(self.substrate.n, self.substrate.k)),
            self.layers,
            self.incidence,
        )
    }

    pub fn evaluator(&self) -> Box<dyn ReflectanceModel> {
        match self.model {
            Model::Tmm => Box::new(TransferMatrix),
            Model::Bolton => Box::new(Bolton),
        }
    }
}

pub fn load_default_config() -> Result<Settings> {
    let root_dir = retrieve_project_root();
    let default_config_file = root_dir.join("config/default.toml");

    let settings: Config = Config::builder()
        .add_source(File::from(default_config_file).required(true))
        .build()
        .unwrap_or_else(|err| {
            eprintln!("Error loading configuration: {}", err);
            std::process::exit(1);
        });

    let config: Settings = settings.try_deserialize().unwrap_or_else(|err| {
        eprintln!("Error deserializing configuration: {}", err);
        std::process::exit(1);
    });

    validate_config(&config);

    Ok(config)
}

pub fn load_config() -> Result<Settings> {
    let root_dir = retrieve_project_root();

    let default_config_file = root_dir.join("config/default.toml");
    let local_config = root_dir.join("config/local.toml");

    // Check if local config exists, if not use default
    let config_file = if local_config.exists() {
        println!("Using local configuration: {:?}", local_config);
        local_config
    } else {
        println!("Using default configuration: {:?}", default_config_file);
        default_config_file
    };

    let settings: Config = Config::builder()
        .add_source(File::from(config_file).required(true))
        .add_source(Environment::with_prefix("schiller"))
        .build()
        .unwrap_or_else(|err| {
            eprintln!("Error loading configuration: {}", err);
            std::process::exit(1);
        });

    let mut config: Settings = settings.try_deserialize().unwrap_or_else(|err| {
        eprintln!("Error deserializing configuration: {}", err);
        std::process::exit(1);
    });

    // Parse command-line arguments and override values
    let args = CliArgs::parse();

    if let Some(min) = args.wmin {
        config.wavelength_min = min;
    }
    if let Some(max) = args.wmax {
        config.wavelength_max = max;
    }
    if let Some(step) = args.wstep {
        config.wavelength_step = step;
    }
    if let Some(incidence) = args.incidence {
        config.incidence = incidence;
    }
    if let Some(layers) = args.layers {
        config.layers = layers;
    }
    if let Some(model) = args.model {
        config.model = model;
    }
    if let Some(realizations) = args.realizations {
        config.realizations = realizations;
    }
    if let Some(seed) = args.seed {
        config.seed = Some(seed);
    }
    if let Some(dir) = args.dir {
        config.directory = dir;
    }

    validate_config(&config);

    println!("{}", config);

    Ok(config)
}

/// Retrieve the project root directory.
/// This function tries to find the project root directory in different ways:
/// 1. If the CARGO_MANIFEST_DIR environment variable is set, use it.
/// 2. If the SCHILLER_ROOT_DIR environment variable is set, use it.
/// 3. If the "config" subdirectory is found in the executable directory or any of its parents, use it.
/// If none of these methods work, the function will panic.
fn retrieve_project_root() -> std::path::PathBuf {
    if let Ok(manifest_dir) = env::var("CARGO_MANIFEST_DIR") {
        // When running through cargo (e.g. cargo run, cargo test)
        std::path::PathBuf::from(manifest_dir)
    } else if let Ok(path) = env::var("SCHILLER_ROOT_DIR") {
        // Allow explicit configuration via environment variable
        std::path::PathBuf::from(path)
    } else {
        // Fallback: walk upward from the executable directory until a
        // "config" subdirectory is found
        let exe_path = env::current_exe().expect("Failed to get current executable path");
        let mut current_dir = exe_path
            .parent()
            .expect("Failed to get executable directory")
            .to_path_buf();
        let mut found = false;

        while !found && current_dir.parent().is_some() {
            if current_dir.join("config").is_dir() {
                found = true;
            } else {
                current_dir = current_dir.parent().unwrap().to_path_buf();
            }
        }

        if found {
            current_dir
        } else {
            panic!("Could not find project root directory");
        }
    }
}

fn validate_config(config: &Settings) {
    assert!(
        config.wavelength_min > 0.0,
        "Wavelength minimum must be greater than 0"
    );
    assert!(
        config.wavelength_max > config.wavelength_min,
        "Wavelength maximum must exceed the minimum"
    );
    assert!(
        config.wavelength_step > 0.0,
        "Wavelength step must be greater than 0"
    );
    assert!(
        (0.0..90.0).contains(&config.incidence),
        "Incidence angle must lie in [0, 90) degrees"
    );
    assert!(
        config.realizations > 0,
        "At least one realization is required"
    );
    assert!(
        config.film_a.thickness > 0.0 && config.film_b.thickness > 0.0,
        "Film thickness must be greater than 0"
    );
}

#[derive(Parser, Debug)]
#[command(
    version,
    about = "SCHILLER - Spectral reflectance of stochastic thin-film multilayer stacks"
)]
pub struct CliArgs {
    /// Lower edge of the wavelength grid in nm.
    #[arg(long)]
    wmin: Option<f64>,

    /// Upper edge of the wavelength grid in nm.
    #[arg(long)]
    wmax: Option<f64>,

    /// Wavelength grid step in nm.
    #[arg(long)]
    wstep: Option<f64>,

    /// Global angle of incidence in degrees.
    #[arg(short, long)]
    incidence: Option<f64>,

    /// Number of interior lamellae in the alternating stack.
    #[arg(short, long)]
    layers: Option<usize>,

    /// Reflectance evaluator: "tmm" (exact) or "bolton" (closed form).
    #[arg(short, long, value_parser = parse_model)]
    model: Option<Model>,

    /// Stochastic realizations averaged per wavelength sample.
    #[arg(short, long)]
    realizations: Option<usize>,

    /// Random seed for reproducible thickness sampling.
    #[arg(short, long)]
    seed: Option<u64>,

    /// Output directory for result files.
    #[arg(short, long)]
    dir: Option<String>,
}

fn parse_model(s: &str) -> Result<Model, String> {
    match s {
        "tmm" => Ok(Model::Tmm),
        "bolton" => Ok(Model::Bolton),
        other => Err(format!(
            "Unknown model '{}'. Expected 'tmm' or 'bolton'",
            other
        )),
    }
}

impl fmt::Display for Settings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Settings:
  - Wavelengths: {:.1} to {:.1} nm, step {:.3}
  - Incidence: {:.2} deg
  - Ambient: n = {:.4} + {:.4}i
  - Substrate: n = {:.4} + {:.4}i
  - Film A: n = {:.4} + {:.4}i, d = {:.2} nm, sd = {:.2} nm
  - Film B: n = {:.4} + {:.4}i, d = {:.2} nm, sd = {:.2} nm
  - Interior layers: {}
  - Model: {:?}
  - Realizations: {}
  ",
            self.wavelength_min,
            self.wavelength_max,
            self.wavelength_step,
            self.incidence,
            self.ambient.n,
            self.ambient.k,
            self.substrate.n,
            self.substrate.k,
            self.film_a.n,
            self.film_a.k,
            self.film_a.thickness,
            self.film_a.thickness_sd,
            self.film_b.n,
            self.film_b.k,
            self.film_b.thickness,
            self.film_b.thickness_sd,
            self.layers,
            self.model,
            self.realizations,
        )
    }
}
