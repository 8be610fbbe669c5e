//! Wavelength-dependent complex refractive index from fitted colour primaries.
//!
//! This module maps a tristimulus index-of-refraction descriptor to a single
//! complex refractive index n + ik at a given wavelength. The descriptor
//! carries one coefficient per colour primary for the real and imaginary
//! parts; sampling weights those coefficients by the fitted "optimal"
//! red/green/blue reflectance basis functions of Burns.
//!
//! The basis functions are sigmoidal fits of the optimal-primary reflectance
//! curves and are valid on the CIE wavelength domain [360, 830] nm. They sum
//! to approximately one at every wavelength, so a descriptor with equal
//! coefficients behaves as a dispersion-free medium.

use nalgebra::Complex;
use serde::{Deserialize, Serialize};

#[cfg(test)]
mod tests {

    use super::*;

    #[test]
    fn basis_partitions_unity() {
        for lambda in [400.0, 450.0, 500.0, 550.0, 600.0, 650.0, 700.0] {
            let [r, g, b] = optimal_basis(lambda);
            let sum = r + g + b;
            assert!((sum - 1.0).abs() < 0.06, "basis sum at {lambda}: {sum}");
        }
    }

    #[test]
    fn constant_descriptor_is_flat() {
        let ior = Ior::constant(1.56, 0.0);
        let n1 = ior.sample(450.0);
        let n2 = ior.sample(650.0);
        assert!((n1.re - 1.56).abs() < 0.08);
        assert!((n2.re - 1.56).abs() < 0.08);
        assert_eq!(n1.im, 0.0);
        assert_eq!(n2.im, 0.0);
    }

    #[test]
    fn absorbing_descriptor() {
        let ior = Ior::constant(1.5, 0.2);
        let n = ior.sample(550.0);
        assert!(n.im > 0.1);
    }
}

/// Tristimulus-fit complex index of refraction descriptor.
///
/// **Context**: Measured refractive indices are spectral curves, but
/// RGB-based pipelines describe media with one value per colour primary.
/// Weighting those per-primary coefficients by the optimal reflectance basis
/// recovers a smooth spectral curve suitable for per-wavelength evaluation.
///
/// **How it Works**: Stores three real coefficients each for n and k. The
/// sampled index at a wavelength is the dot product of the coefficients with
/// the basis functions evaluated at that wavelength, assembled into a single
/// complex number.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Ior {
    pub n: [f64; 3],
    pub k: [f64; 3],
}

impl Ior {
    pub fn new(n: [f64; 3], k: [f64; 3]) -> Self {
        Self { n, k }
    }

    /// Descriptor with the same coefficient for all three primaries.
    pub fn constant(n: f64, k: f64) -> Self {
        Self {
            n: [n; 3],
            k: [k; 3],
        }
    }

    /// Samples the descriptor at a wavelength in nm, yielding n + ik.
    ///
    /// Callers are expected to stay within [360, 830] nm; the fitted basis
    /// is unconstrained outside that domain.
    pub fn sample(&self, lambda: f64) -> Complex<f64> {
        let basis = optimal_basis(lambda);
        let n = self.n[0] * basis[0] + self.n[1] * basis[1] + self.n[2] * basis[2];
        let k = self.k[0] * basis[0] + self.k[1] * basis[1] + self.k[2] * basis[2];
        Complex::new(n, k)
    }
}

fn sigmoid_rational(x: f64, a: f64, b: f64, c: f64, d: f64) -> f64 {
    d + (a - d) / (1.0 + (x / c).powf(b))
}

fn sigmoid_logistic(x: f64, a: f64, b: f64, c: f64) -> f64 {
    a / (1.0 + (-b * (x - c)).exp())
}

/// Fitted optimal red/green/blue reflectance basis at a wavelength in nm.
pub fn optimal_basis(lambda: f64) -> [f64; 3] {
    let r = if lambda > 560.0 {
        sigmoid_rational(lambda, 0.0144, 135.0296, 590.4639, 0.9761)
    } else {
        sigmoid_rational(lambda, 0.0289, 38.6766, 454.7233, 0.0062)
    };
    let g = if lambda < 545.0 {
        sigmoid_rational(lambda, 0.0123, 63.3450, 488.7451, 0.9711)
    } else {
        sigmoid_rational(lambda, 0.0127, -116.3503, 590.4987, 0.9699)
    };
    let b = if lambda < 500.0 {
        sigmoid_logistic(lambda, 0.9622, -0.1542, 489.6339)
    } else {
        sigmoid_rational(lambda, 0.0122, -37.0407, 405.3482, 344.2237)
    };
    [r, g, b]
}
