//! Snell's law propagation of the refraction cosine for complex media.
//!
//! This module carries the cosine of the refraction angle from the ambient
//! medium into an arbitrary layer of the stack. Both indices may be complex;
//! beyond the critical angle the principal-branch complex square root yields
//! an evanescent (complex) cosine rather than an error, which is the
//! physically meaningful continuation for total internal reflection and
//! absorbing media.

use nalgebra::Complex;


/// Cosine of the refraction angle in a layer of index `n_i`, given the
/// ambient index `n_0` and the ambient refraction cosine.
///
/// Uses `sin^2(theta_i) = (n_0/n_i)^2 (1 - cos^2(theta_0))` and the
/// principal branch of the complex square root.
pub fn cos_theta_i(
    n_0: Complex<f64>,
    n_i: Complex<f64>,
    cos_theta_0: Complex<f64>,
) -> Complex<f64> {
    let ratio = n_0 / n_i;
    let sin_theta_sq = ratio * ratio * (1.0 - cos_theta_0 * cos_theta_0);
    (1.0 - sin_theta_sq).sqrt()
}
