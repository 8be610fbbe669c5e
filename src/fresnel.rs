//! Fresnel equations and characteristic matrices for layer interfaces.
//!
//! This module implements the electromagnetic boundary conditions at the
//! interface between two stack media and the phase accumulation across a
//! layer. Together they provide the building blocks the transfer-matrix
//! composer chains into a global stack response.
//!
//! The module provides:
//! - Amplitude reflection/transmission coefficients for s and p polarizations
//! - Complex refractive index support for absorbing materials
//! - The interface ("D") matrix coupling forward and backward amplitudes
//! - The propagation ("P") matrix for phase accumulation through a layer
//!
//! # Physical Foundation
//!
//! Based on Maxwell's equations at material boundaries:
//! - Continuity of tangential electric and magnetic fields
//! - Impedance relationships between adjacent media
//! - Phase advance proportional to optical path length

use nalgebra::{Complex, Matrix2};

use crate::config;

#[cfg(test)]
mod tests {

    use super::*;

    const ONE: Complex<f64> = Complex::new(1.0, 0.0);

    #[test]
    fn normal_incidence_amplitudes() {
        let n1 = Complex::new(1.0, 0.0);
        let n2 = Complex::new(1.5, 0.0);
        let f = fresnel(n1, n2, ONE, ONE);

        // classical two-medium amplitudes
        assert!((f.r_s - Complex::new(-0.2, 0.0)).norm() < 1e-12);
        assert!((f.r_p - Complex::new(0.2, 0.0)).norm() < 1e-12);
        assert!((f.t_s - Complex::new(0.8, 0.0)).norm() < 1e-12);
        assert!((f.t_p - Complex::new(0.8, 0.0)).norm() < 1e-12);
    }

    #[test]
    fn stokes_reciprocity() {
        // r_ij = -r_ji and t_ij t_ji + r_ij^2 = 1 for lossless media
        let n1 = Complex::new(1.0, 0.0);
        let n2 = Complex::new(1.6, 0.0);
        let fwd = fresnel(n1, n2, ONE, ONE);
        let bwd = fresnel(n2, n1, ONE, ONE);

        assert!((fwd.r_s + bwd.r_s).norm() < 1e-12);
        assert!((fwd.t_s * bwd.t_s + fwd.r_s * fwd.r_s - ONE).norm() < 1e-12);
    }

    #[test]
    fn d_matrix_single_interface() {
        // for a lone interface the amplitude ratio recovers r_ij
        let n1 = Complex::new(1.0, 0.0);
        let n2 = Complex::new(1.5, 0.0);
        let fwd = fresnel(n1, n2, ONE, ONE);
        let bwd = fresnel(n2, n1, ONE, ONE);
        let d = d_mat(fwd.r_s, bwd.r_s, fwd.t_s, bwd.t_s);

        let r = d[(1, 0)] / d[(0, 0)];
        assert!((r - fwd.r_s).norm() < 1e-12);
    }

    #[test]
    fn p_matrix_lossless_is_unimodular() {
        let n = Complex::new(1.56, 0.0);
        let p = p_mat(550.0, n, 100.0, ONE);
        assert!((p[(0, 0)].norm() - 1.0).abs() < 1e-12);
        assert!((p[(1, 1)].norm() - 1.0).abs() < 1e-12);
        assert_eq!(p[(0, 1)], Complex::new(0.0, 0.0));
        assert_eq!(p[(1, 0)], Complex::new(0.0, 0.0));
    }

    #[test]
    fn p_matrix_absorbing_attenuates() {
        let n = Complex::new(1.5, 0.05);
        let p = p_mat(550.0, n, 200.0, ONE);
        // the incident-side entry grows with absorption so that the
        // transmitted amplitude 1/T[0,0] decays
        assert!(p[(0, 0)].norm() > 1.0);
        assert!(p[(1, 1)].norm() < 1.0);
    }

    #[test]
    fn p_matrix_semi_infinite_keeps_unit_modulus() {
        let n = Complex::new(1.5, 0.2);
        let p = p_mat(550.0, n, config::INFINITE_THICKNESS, ONE);
        assert!((p[(0, 0)].norm() - 1.0).abs() < 1e-9);
        assert!((p[(1, 1)].norm() - 1.0).abs() < 1e-9);
    }
}

/// Fresnel amplitude coefficients for one interface, both polarizations.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FresnelCoeffs {
    pub r_p: Complex<f64>,
    pub r_s: Complex<f64>,
    pub t_p: Complex<f64>,
    pub t_s: Complex<f64>,
}

/// Computes all four Fresnel coefficients for the interface between an
/// incidence medium `m` and a transmission medium `l`.
///
/// **Context**: When a wave crosses the boundary between media of different
/// refractive index, the reflected and transmitted amplitudes depend on
/// polarization, the two complex indices, and the propagation angles on both
/// sides. Each interface of the stack needs the full coefficient set in both
/// traversal directions.
///
/// **How it Works**: Evaluates the classic Fresnel formulas from four shared
/// complex subproducts. Division by a near-zero denominator (grazing
/// incidence with matched impedances) is not guarded; the resulting
/// large-magnitude or NaN values propagate to the caller.
pub fn fresnel(
    n_m: Complex<f64>,
    n_l: Complex<f64>,
    cos_theta_m: Complex<f64>,
    cos_theta_l: Complex<f64>,
) -> FresnelCoeffs {
    let a = n_m * cos_theta_m;
    let b = n_m * cos_theta_l;
    let c = n_l * cos_theta_l;
    let d = n_l * cos_theta_m;

    let denom_1 = b + d;
    let denom_2 = a + c;

    let numer_1 = 2.0 * a;

    FresnelCoeffs {
        r_p: (d - b) / denom_1,
        r_s: (a - c) / denom_2,
        t_p: numer_1 / denom_1,
        t_s: numer_1 / denom_2,
    }
}

/// Interface matrix from forward (`_ij`) and backward (`_ji`) coefficients.
///
/// Couples the forward and backward travelling amplitudes across one
/// interface. Composes with propagation matrices by multiplication in stack
/// order.
pub fn d_mat(
    r_ij: Complex<f64>,
    r_ji: Complex<f64>,
    t_ij: Complex<f64>,
    t_ji: Complex<f64>,
) -> Matrix2<Complex<f64>> {
    Matrix2::new(
        Complex::new(1.0, 0.0),
        -r_ji,
        r_ij,
        t_ij * t_ji - r_ij * r_ji,
    ) * (1.0 / t_ij)
}

/// Propagation matrix for a layer of complex index `n` and thickness `d` nm.
///
/// The phase argument uses only the real part of the refraction cosine while
/// the index stays fully complex, so absorption still attenuates the
/// amplitude through the complex exponent. Semi-infinite media keep only the
/// real parts, leaving a unit-modulus matrix whose arbitrary global phase
/// cancels in the reflectance and transmittance moduli.
pub fn p_mat(
    lambda: f64,
    n: Complex<f64>,
    d: f64,
    cos_theta: Complex<f64>,
) -> Matrix2<Complex<f64>> {
    let angular = (2.0 * std::f64::consts::PI / lambda) * d;

    let phi = if d >= config::INFINITE_THICKNESS {
        Complex::new(0.0, n.re * cos_theta.re * angular)
    } else {
        n * Complex::new(0.0, cos_theta.re * angular)
    };

    let zero = Complex::new(0.0, 0.0);
    Matrix2::new((-phi).exp(), zero, zero, phi.exp())
}
