//! Spectral integration against the CIE standard observer.
//!
//! This module turns a sampled spectrum into CIE XYZ tristimulus values and
//! a displayable linear-sRGB triple. The colour-matching functions of the
//! CIE 1931 2 degree observer and the D65 illuminant power distribution are
//! embedded as read-only 5 nm tables and sampled by linear interpolation.
//!
//! The integrator provides:
//! - Rectangular-rule integration over a uniform wavelength grid
//! - Normalization against the D65-weighted luminance integral, computed
//!   from the same tables and grid so a perfect reflector reproduces the
//!   white point by construction
//! - The fixed XYZ to linear-sRGB matrix pair with channel clamping

use anyhow::Result;

use crate::config;

#[cfg(test)]
mod tests {

    use super::*;

    #[test]
    fn matrices_round_trip() {
        let rgb = [0.3, 0.5, 0.7];
        let back = xyz_to_rgb(rgb_to_xyz(rgb));
        for c in 0..3 {
            assert!((back[c] - rgb[c]).abs() < 1e-4, "channel {c}: {back:?}");
        }
    }

    #[test]
    fn cmf_peaks() {
        // luminance peaks near 555 nm
        let [_, y_550, _] = cmf_at(550.0);
        let [_, y_555, _] = cmf_at(555.0);
        let [_, y_650, _] = cmf_at(650.0);
        assert!(y_555 > 0.99);
        assert!(y_550 < y_555 + 1e-9);
        assert!(y_650 < 0.2);
    }

    #[test]
    fn interpolation_between_table_nodes() {
        let y_at_nodes = (cmf_at(550.0)[1] + cmf_at(555.0)[1]) / 2.0;
        assert!((cmf_at(552.5)[1] - y_at_nodes).abs() < 1e-12);
    }

    #[test]
    fn rejects_mismatched_lengths() {
        assert!(spectrum_to_xyz(&[1.0, 1.0], &[500.0, 501.0, 502.0]).is_err());
    }

    #[test]
    fn rejects_non_uniform_grid() {
        let wavelengths = [500.0, 501.0, 503.0];
        assert!(spectrum_to_xyz(&[1.0, 1.0, 1.0], &wavelengths).is_err());
    }

    #[test]
    fn rejects_decreasing_grid() {
        let wavelengths = [502.0, 501.0, 500.0];
        assert!(spectrum_to_xyz(&[1.0, 1.0, 1.0], &wavelengths).is_err());
    }

    #[test]
    fn d65_white_point() {
        // the illuminant's own spectrum must integrate to the white point
        let n = 471;
        let step = (config::CIE_LAMBDA_MAX - config::CIE_LAMBDA_MIN) / n as f64;
        let wavelengths: Vec<f64> = (0..n)
            .map(|i| config::CIE_LAMBDA_MIN + i as f64 * step)
            .collect();
        let spectrum: Vec<f64> = wavelengths.iter().map(|&l| d65_at(l)).collect();

        let xyz = spectrum_to_xyz(&spectrum, &wavelengths).unwrap();
        assert!((xyz[1] - 1.0).abs() < 1e-9, "Y = {}", xyz[1]);
        assert!((xyz[0] - 0.9505).abs() < 0.02, "X = {}", xyz[0]);
        assert!((xyz[2] - 1.0888).abs() < 0.03, "Z = {}", xyz[2]);

        let rgb = spectrum_to_rgb(&spectrum, &wavelengths).unwrap();
        for c in 0..3 {
            assert!((rgb[c] - 1.0).abs() < 0.05, "white point rgb: {rgb:?}");
        }
    }

    #[test]
    fn monochromatic_red_laser() {
        let n = 471;
        let step = (config::CIE_LAMBDA_MAX - config::CIE_LAMBDA_MIN) / n as f64;
        let wavelengths: Vec<f64> = (0..n)
            .map(|i| config::CIE_LAMBDA_MIN + i as f64 * step)
            .collect();
        let spectrum: Vec<f64> = wavelengths
            .iter()
            .map(|&l| if (l - 650.0).abs() < 5.0 { 50.0 } else { 0.0 })
            .collect();

        let rgb = spectrum_to_rgb(&spectrum, &wavelengths).unwrap();
        assert!(rgb[0] > rgb[1]);
        assert!(rgb[0] > rgb[2]);
    }
}

const TABLE_STEP: f64 = 5.0;
const TABLE_LEN: usize = 95;

/// CIE 1931 2 degree observer x-bar, 5 nm steps over 360..=830 nm.
static CIE_X: [f64; TABLE_LEN] = [
    0.000130, 0.000232, 0.000415, 0.000742, 0.001368, 0.002236, 0.004243, 0.007650, 0.014310,
    0.023190, 0.043510, 0.077630, 0.134380, 0.214770, 0.283900, 0.328500, 0.348280, 0.348060,
    0.336200, 0.318700, 0.290800, 0.251100, 0.195360, 0.142100, 0.095640, 0.057950, 0.032010,
    0.014700, 0.004900, 0.002400, 0.009300, 0.029100, 0.063270, 0.109600, 0.165500, 0.225750,
    0.290400, 0.359700, 0.433450, 0.512050, 0.594500, 0.678400, 0.762100, 0.842500, 0.916300,
    0.978600, 1.026300, 1.056700, 1.062200, 1.045600, 1.002600, 0.938400, 0.854450, 0.751400,
    0.642400, 0.541900, 0.447900, 0.360800, 0.283500, 0.218700, 0.164900, 0.121200, 0.087400,
    0.063600, 0.046770, 0.032900, 0.022700, 0.015840, 0.011359, 0.008111, 0.005790, 0.004109,
    0.002899, 0.002049, 0.001440, 0.001000, 0.000690, 0.000476, 0.000332, 0.000235, 0.000166,
    0.000117, 0.000083, 0.000059, 0.000042, 0.000029, 0.000021, 0.000015, 0.000011, 0.000007,
    0.000005, 0.000004, 0.000003, 0.000002, 0.000001,
];

/// CIE 1931 2 degree observer y-bar (luminance), 5 nm steps over 360..=830 nm.
static CIE_Y: [f64; TABLE_LEN] = [
    0.000004, 0.000007, 0.000012, 0.000022, 0.000039, 0.000064, 0.000120, 0.000217, 0.000396,
    0.000640, 0.001210, 0.002180, 0.004000, 0.007300, 0.011600, 0.016840, 0.023000, 0.029800,
    0.038000, 0.048000, 0.060000, 0.073900, 0.090980, 0.112600, 0.139020, 0.169300, 0.208020,
    0.258600, 0.323000, 0.407300, 0.503000, 0.608200, 0.710000, 0.793200, 0.862000, 0.914850,
    0.954000, 0.980300, 0.994950, 1.000000, 0.995000, 0.978600, 0.952000, 0.915400, 0.870000,
    0.816300, 0.757000, 0.694900, 0.631000, 0.566800, 0.503000, 0.441200, 0.381000, 0.321000,
    0.265000, 0.217000, 0.175000, 0.138200, 0.107000, 0.081600, 0.061000, 0.044580, 0.032000,
    0.023200, 0.017000, 0.011920, 0.008210, 0.005723, 0.004102, 0.002929, 0.002091, 0.001484,
    0.001047, 0.000740, 0.000520, 0.000361, 0.000249, 0.000172, 0.000120, 0.000085, 0.000060,
    0.000042, 0.000030, 0.000021, 0.000015, 0.000011, 0.000007, 0.000005, 0.000004, 0.000003,
    0.000002, 0.000001, 0.000001, 0.000001, 0.000000,
];

/// CIE 1931 2 degree observer z-bar, 5 nm steps over 360..=830 nm.
static CIE_Z: [f64; TABLE_LEN] = [
    0.000606, 0.001086, 0.001946, 0.003486, 0.006450, 0.010550, 0.020050, 0.036210, 0.067850,
    0.110200, 0.207400, 0.371300, 0.645600, 1.039050, 1.385600, 1.622960, 1.747060, 1.782600,
    1.772110, 1.744100, 1.669200, 1.528100, 1.287640, 1.041900, 0.812950, 0.616200, 0.465180,
    0.353300, 0.272000, 0.212300, 0.158200, 0.111700, 0.078250, 0.057250, 0.042160, 0.029840,
    0.020300, 0.013400, 0.008750, 0.005750, 0.003900, 0.002750, 0.002100, 0.001800, 0.001650,
    0.001400, 0.001100, 0.001000, 0.000800, 0.000600, 0.000340, 0.000240, 0.000190, 0.000100,
    0.000050, 0.000030, 0.000020, 0.000010, 0.000000, 0.000000, 0.000000, 0.000000, 0.000000,
    0.000000, 0.000000, 0.000000, 0.000000, 0.000000, 0.000000, 0.000000, 0.000000, 0.000000,
    0.000000, 0.000000, 0.000000, 0.000000, 0.000000, 0.000000, 0.000000, 0.000000, 0.000000,
    0.000000, 0.000000, 0.000000, 0.000000, 0.000000, 0.000000, 0.000000, 0.000000, 0.000000,
    0.000000, 0.000000, 0.000000, 0.000000, 0.000000,
];

/// CIE standard illuminant D65 relative spectral power, 5 nm steps over
/// 360..=830 nm, normalized to 100 at 560 nm.
static CIE_D65: [f64; TABLE_LEN] = [
    46.6383, 49.3637, 52.0891, 51.0323, 49.9755, 52.3118, 54.6482, 68.7015, 82.7549, 87.1204,
    91.4860, 92.4589, 93.4318, 90.0570, 86.6823, 95.7736, 104.8650, 110.9360, 117.0080, 117.4100,
    117.8120, 116.3360, 114.8610, 115.3920, 115.9230, 112.3670, 108.8110, 109.0820, 109.3540,
    108.5780, 107.8020, 106.2960, 104.7900, 106.2390, 107.6890, 106.0470, 104.4050, 104.2250,
    104.0460, 102.0230, 100.0000, 98.1671, 96.3342, 96.0611, 95.7880, 92.2368, 88.6856, 89.3459,
    90.0062, 89.8026, 89.5991, 88.6489, 87.6987, 85.4936, 83.2886, 83.4939, 83.6992, 81.8630,
    80.0268, 80.1207, 80.2146, 81.2462, 82.2778, 80.2810, 78.2842, 74.0027, 69.7213, 70.6652,
    71.6091, 72.9790, 74.3490, 67.9765, 61.6040, 65.7448, 69.8856, 72.4863, 75.0870, 69.3398,
    63.5927, 55.0054, 46.4182, 56.6118, 66.8054, 65.0941, 63.3828, 63.8434, 64.3040, 61.8779,
    59.4519, 55.7054, 51.9590, 54.6998, 57.4406, 58.8765, 60.3125,
];

fn lerp_table(table: &[f64; TABLE_LEN], lambda: f64) -> f64 {
    let pos = (lambda - config::CIE_LAMBDA_MIN) / TABLE_STEP;
    if pos <= 0.0 {
        return table[0];
    }
    if pos >= (TABLE_LEN - 1) as f64 {
        return table[TABLE_LEN - 1];
    }
    let idx = pos.floor() as usize;
    let frac = pos - idx as f64;
    table[idx] * (1.0 - frac) + table[idx + 1] * frac
}

/// Colour-matching functions (x-bar, y-bar, z-bar) at a wavelength in nm.
pub fn cmf_at(lambda: f64) -> [f64; 3] {
    [
        lerp_table(&CIE_X, lambda),
        lerp_table(&CIE_Y, lambda),
        lerp_table(&CIE_Z, lambda),
    ]
}

/// D65 relative spectral power at a wavelength in nm.
pub fn d65_at(lambda: f64) -> f64 {
    lerp_table(&CIE_D65, lambda)
}

/// Converts XYZ tristimulus values to linear sRGB (unclamped).
pub fn xyz_to_rgb(xyz: [f64; 3]) -> [f64; 3] {
    [
        xyz[0] * 3.2404542 + xyz[1] * -1.5371385 + xyz[2] * -0.4985314,
        xyz[0] * -0.9692660 + xyz[1] * 1.8760108 + xyz[2] * 0.0415560,
        xyz[0] * 0.0556434 + xyz[1] * -0.2040259 + xyz[2] * 1.0572252,
    ]
}

/// Converts linear sRGB to XYZ tristimulus values.
pub fn rgb_to_xyz(rgb: [f64; 3]) -> [f64; 3] {
    [
        rgb[0] * 0.4124564 + rgb[1] * 0.3575761 + rgb[2] * 0.1804375,
        rgb[0] * 0.2126729 + rgb[1] * 0.7151522 + rgb[2] * 0.0721750,
        rgb[0] * 0.0193339 + rgb[1] * 0.1191920 + rgb[2] * 0.9503041,
    ]
}

fn validate_grid(spectrum: &[f64], wavelengths: &[f64]) -> Result<f64> {
    if spectrum.len() != wavelengths.len() {
        return Err(anyhow::anyhow!(
            "spectrum has {} samples but grid has {}",
            spectrum.len(),
            wavelengths.len()
        ));
    }
    if wavelengths.len() < 2 {
        return Err(anyhow::anyhow!(
            "spectral integration needs at least 2 samples"
        ));
    }

    let step = wavelengths[1] - wavelengths[0];
    if !(step > 0.0) {
        return Err(anyhow::anyhow!("wavelength grid is not increasing"));
    }
    for pair in wavelengths.windows(2) {
        let d = pair[1] - pair[0];
        if ((d - step) / step).abs() > config::GRID_UNIFORMITY_TOLERANCE {
            return Err(anyhow::anyhow!(
                "wavelength grid is not uniform: step {d} differs from {step}"
            ));
        }
    }
    Ok(step)
}

/// Integrates a spectrum against the colour-matching functions into XYZ.
///
/// Rectangular rule over a uniform grid. The result is scaled by
/// `span / (N * Y_integral)` where `Y_integral` is the D65-weighted
/// luminance integral over the same grid, so feeding the illuminant's own
/// spectrum yields Y = 1 exactly.
pub fn spectrum_to_xyz(spectrum: &[f64], wavelengths: &[f64]) -> Result<[f64; 3]> {
    let step = validate_grid(spectrum, wavelengths)?;

    let y_integral: f64 = wavelengths
        .iter()
        .map(|&l| cmf_at(l)[1] * d65_at(l) * step)
        .sum();

    // span / (N * Y_integral) with span = N * step
    let scale = step / y_integral;

    let mut xyz = [0.0; 3];
    for (&s, &l) in spectrum.iter().zip(wavelengths) {
        let cmf = cmf_at(l);
        xyz[0] += cmf[0] * s;
        xyz[1] += cmf[1] * s;
        xyz[2] += cmf[2] * s;
    }

    Ok([xyz[0] * scale, xyz[1] * scale, xyz[2] * scale])
}

/// Integrates a spectrum into a displayable linear sRGB triple, each channel
/// clamped to [0, 1]. Lossy and many-to-one; no round trip is implied.
pub fn spectrum_to_rgb(spectrum: &[f64], wavelengths: &[f64]) -> Result<[f64; 3]> {
    let rgb = xyz_to_rgb(spectrum_to_xyz(spectrum, wavelengths)?);
    Ok([
        rgb[0].clamp(0.0, 1.0),
        rgb[1].clamp(0.0, 1.0),
        rgb[2].clamp(0.0, 1.0),
    ])
}
