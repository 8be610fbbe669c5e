use anyhow::Result;
use ndarray::Array1;
use serde::{Deserialize, Serialize};

#[cfg(test)]
mod tests {

    use super::*;

    #[test]
    fn visible_grid() {
        let grid = WavelengthGrid::new(380.0, 780.0, 1.0).unwrap();
        assert_eq!(grid.len(), 400);
        let samples = grid.samples();
        assert_eq!(samples[0], 380.0);
        assert_eq!(samples[399], 779.0);
    }

    #[test]
    fn fractional_step() {
        // 471 samples across the full CIE domain
        let grid = WavelengthGrid::new(360.0, 830.0, 470.0 / 471.0).unwrap();
        assert_eq!(grid.len(), 471);
        assert!((grid.samples()[470] - (830.0 - 470.0 / 471.0)).abs() < 1e-9);
    }

    #[test]
    fn rejects_reversed_bounds() {
        assert!(WavelengthGrid::new(780.0, 380.0, 1.0).is_err());
    }

    #[test]
    fn rejects_nonpositive_step() {
        assert!(WavelengthGrid::new(380.0, 780.0, 0.0).is_err());
        assert!(WavelengthGrid::new(380.0, 780.0, -1.0).is_err());
    }
}

/// Uniform wavelength sampling domain for spectral integration (nm).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WavelengthGrid {
    pub min: f64,
    pub max: f64,
    pub step: f64,
}

impl WavelengthGrid {
    pub fn new(min: f64, max: f64, step: f64) -> Result<Self> {
        if !(max > min) {
            return Err(anyhow::anyhow!(
                "wavelength grid maximum ({max}) must exceed minimum ({min})"
            ));
        }
        if !(step > 0.0) {
            return Err(anyhow::anyhow!(
                "wavelength grid step must be positive, got {step}"
            ));
        }
        let grid = Self { min, max, step };
        if grid.len() < 1 {
            return Err(anyhow::anyhow!("wavelength grid contains no samples"));
        }
        Ok(grid)
    }

    /// Number of samples in the grid.
    pub fn len(&self) -> usize {
        ((self.max - self.min) / self.step).round() as usize
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Sampled wavelengths, monotonically increasing with uniform step.
    pub fn samples(&self) -> Array1<f64> {
        Array1::from_iter((0..self.len()).map(|i| self.min + i as f64 * self.step))
    }

    /// Width of the sampling domain.
    pub fn span(&self) -> f64 {
        self.max - self.min
    }
}
