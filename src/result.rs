use anyhow::Result;
use ndarray::Array1;

use crate::color;
use crate::spectrum::WavelengthGrid;

/// Spectral response of one stack evaluation or ensemble average.
#[derive(Debug, PartialEq, Clone)]
pub struct SpectralResult {
    pub wavelengths: Array1<f64>,
    pub reflectance: Array1<f64>,
    pub transmittance: Option<Array1<f64>>,
    pub xyz: Option<[f64; 3]>,
    pub rgb: Option<[f64; 3]>,
}

impl SpectralResult {
    /// Creates a new `SpectralResult` with zeroed spectra over the grid.
    pub fn new_empty(grid: &WavelengthGrid) -> Self {
        let wavelengths = grid.samples();
        let reflectance = Array1::zeros(wavelengths.len());
        Self {
            wavelengths,
            reflectance,
            transmittance: None,
            xyz: None,
            rgb: None,
        }
    }

    /// Integrates the reflectance spectrum into XYZ and clamped linear sRGB.
    pub fn compute_color(&mut self) -> Result<()> {
        let spectrum = self
            .reflectance
            .as_slice()
            .ok_or_else(|| anyhow::anyhow!("reflectance spectrum is not contiguous"))?;
        let wavelengths = self
            .wavelengths
            .as_slice()
            .ok_or_else(|| anyhow::anyhow!("wavelength grid is not contiguous"))?;

        self.xyz = Some(color::spectrum_to_xyz(spectrum, wavelengths)?);
        self.rgb = Some(color::spectrum_to_rgb(spectrum, wavelengths)?);
        Ok(())
    }

    pub fn print(&self) {
        if let Some(xyz) = self.xyz {
            println!("  XYZ: {:.6} {:.6} {:.6}", xyz[0], xyz[1], xyz[2]);
        }
        if let Some(rgb) = self.rgb {
            println!("  RGB: {:.6} {:.6} {:.6}", rgb[0], rgb[1], rgb[2]);
        }
        let mean_r = self.reflectance.mean().unwrap_or(0.0);
        println!("  Mean reflectance: {mean_r:.6}");
        if let Some(ref t) = self.transmittance {
            println!("  Mean transmittance: {:.6}", t.mean().unwrap_or(0.0));
        }
    }
}
