//! Gaussian lamellae thickness sampling via the Box-Muller transform.
//!
//! Natural lamellae vary in thickness around their mean, which broadens the
//! interference peaks of the reflected spectrum. This module draws layer
//! thicknesses from a normal distribution using the polar Box-Muller
//! transform, with the random source passed explicitly so ensemble runs can
//! use independently seeded streams.

use std::f64::consts::PI;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::config;


/// Draws one thickness from a normal distribution with the given mean (nm)
/// and variance (nm^2).
///
/// **Context**: The transfer-matrix recursion re-samples every layer once per
/// wavelength, so repeated calls inject gaussian-distributed disorder into
/// the stack. This models the biological variance of lamellae thickness and
/// produces the washed-out spectral peaks characteristic of natural
/// iridescence.
///
/// **How it Works**: Consumes exactly two uniform draws from the supplied
/// generator. The first is clamped away from zero before the logarithm so a
/// degenerate draw cannot produce log(0). No state persists between calls
/// beyond the generator itself.
pub fn sample_thickness<R: Rng + ?Sized>(mean: f64, variance: f64, rng: &mut R) -> f64 {
    let u1 = rng.random::<f64>().max(config::UNIFORM_EPSILON);
    let u2 = rng.random::<f64>();

    let r = (-2.0 * u1.ln()).sqrt();
    let theta = 2.0 * PI * u2;

    mean + variance.sqrt() * r * theta.cos()
}

/// Independently seeded generator for one realization of an ensemble.
///
/// With a fixed base seed each stream index maps to a deterministic
/// generator, keeping parallel ensemble runs reproducible regardless of
/// worker scheduling. Without a seed the stream is drawn from the operating
/// system entropy source.
pub fn stream_rng(seed: Option<u64>, index: u64) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed ^ index.wrapping_mul(0x9E37_79B9_7F4A_7C15)),
        None => StdRng::from_os_rng(),
    }
}
