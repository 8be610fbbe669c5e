use std::{fs::File, io::BufWriter, path::Path};

use anyhow::Result;
use itertools::izip;
use std::io::Write;

use crate::result::SpectralResult;
use crate::settings::Settings;


/// Write the averaged spectrum to a file as wavelength, reflectance and
/// transmittance columns.
pub fn write_spectrum(result: &SpectralResult, directory: &str) -> Result<()> {
    let path = Path::new(directory).join("reflectance_spectrum");
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);

    match &result.transmittance {
        Some(transmittance) => {
            for (lambda, r, t) in izip!(&result.wavelengths, &result.reflectance, transmittance) {
                writeln!(writer, "{} {} {}", lambda, r, t)?;
            }
        }
        None => {
            for (lambda, r) in izip!(&result.wavelengths, &result.reflectance) {
                writeln!(writer, "{} {}", lambda, r)?;
            }
        }
    }

    Ok(())
}

/// Write the colour summary and run metadata as JSON.
pub fn write_summary(result: &SpectralResult, settings: &Settings, directory: &str) -> Result<()> {
    let path = Path::new(directory).join("summary.json");
    let file = File::create(path)?;
    let writer = BufWriter::new(file);

    let summary = serde_json::json!({
        "timestamp": chrono::Local::now().to_rfc3339(),
        "model": settings.model,
        "realizations": settings.realizations,
        "seed": settings.seed,
        "incidence": settings.incidence,
        "layers": settings.layers,
        "wavelengths": {
            "min": settings.wavelength_min,
            "max": settings.wavelength_max,
            "step": settings.wavelength_step,
        },
        "xyz": result.xyz,
        "rgb": result.rgb,
        "mean_reflectance": result.reflectance.mean(),
    });

    serde_json::to_writer_pretty(writer, &summary)?;
    Ok(())
}

/// Write a copy of the settings the run actually used.
pub fn write_settings(settings: &Settings, directory: &str) -> Result<()> {
    let path = Path::new(directory).join("settings_used.toml");
    let contents = toml::to_string(settings)?;
    std::fs::write(path, contents)?;
    Ok(())
}
