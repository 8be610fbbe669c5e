//! Exact multilayer reflectance via the transfer-matrix method.
//!
//! This module chains interface and propagation matrices across a layer
//! stack to obtain the global reflectance and transmittance at one
//! wavelength. The s and p polarizations are tracked through independent
//! 2x2 complex chains and averaged at the end, modelling unpolarized
//! incident light.
//!
//! The composer provides:
//! - Arbitrary-length stacks with semi-infinite bounding media
//! - Independent stochastic thickness draws for every finite layer
//! - Energy-flux scaling of the transmittance across the medium change
//! - Stateless evaluation, one invocation per wavelength sample

use anyhow::Result;
use nalgebra::{Complex, Matrix2};
use rand::Rng;

use crate::fresnel;
use crate::layer::{SampledLayer, Stack};

#[cfg(test)]
mod tests {

    use super::*;
    use crate::ior::Ior;
    use crate::layer::Layer;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn single_interface_reduces_to_fresnel() {
        let ambient = Ior::constant(1.0, 0.0);
        let substrate = Ior::constant(1.5, 0.0);
        let stack = Stack::new(
            vec![
                Layer::semi_infinite(ambient),
                Layer::semi_infinite(substrate),
            ],
            0.0,
        )
        .unwrap();

        let lambda = 550.0;
        let mut rng = StdRng::seed_from_u64(0);
        let (r, _t) = reflectance(&stack, lambda, &mut rng).unwrap();

        // classical two-medium reflectance with the sampled indices
        let n1 = ambient.sample(lambda).re;
        let n2 = substrate.sample(lambda).re;
        let expected = ((n1 - n2) / (n1 + n2)).powi(2);
        assert!((r - expected).abs() < 1e-9, "r = {r}, expected {expected}");
    }

    #[test]
    fn single_interface_conserves_energy() {
        let stack = Stack::new(
            vec![
                Layer::semi_infinite(Ior::constant(1.0, 0.0)),
                Layer::semi_infinite(Ior::constant(1.5, 0.0)),
            ],
            0.0,
        )
        .unwrap();

        let mut rng = StdRng::seed_from_u64(0);
        let (r, t) = reflectance(&stack, 550.0, &mut rng).unwrap();
        assert!((r + t - 1.0).abs() < 1e-9, "R + T = {}", r + t);
    }

    #[test]
    fn zero_variance_is_deterministic() {
        let stack = Stack::alternating(
            Layer::semi_infinite(Ior::constant(1.0, 0.0)),
            Layer::film(90.6, 0.0, Ior::constant(1.6, 0.0)),
            Layer::film(60.0, 0.0, Ior::constant(1.5, 0.0)),
            Layer::semi_infinite(Ior::constant(1.5, 0.0)),
            10,
            45.0,
        )
        .unwrap();

        let mut rng_a = StdRng::seed_from_u64(1);
        let mut rng_b = StdRng::seed_from_u64(99);
        let (r_a, t_a) = reflectance(&stack, 550.0, &mut rng_a).unwrap();
        let (r_b, t_b) = reflectance(&stack, 550.0, &mut rng_b).unwrap();

        assert!((r_a - r_b).abs() < 1e-12);
        assert!((t_a - t_b).abs() < 1e-12);
    }

    #[test]
    fn rejects_empty_stack() {
        let stack = Stack {
            layers: vec![],
            cos_theta_0: 1.0,
        };
        let mut rng = StdRng::seed_from_u64(0);
        assert!(reflectance(&stack, 550.0, &mut rng).is_err());
    }
}

/// Computes the stack reflectance and transmittance at one wavelength.
///
/// **Context**: The optical response of a multilayer follows from the
/// boundary conditions at every interface and the phase accumulated across
/// every layer. Chaining the corresponding 2x2 complex matrices in stack
/// order reduces the whole structure to four amplitude ratios.
///
/// **How it Works**: Samples every layer once (index, refraction cosine,
/// and a thickness draw for finite films), then walks adjacent layer pairs
/// accumulating `T <- T * P_i * D_ij` for each polarization. The reflectance
/// is the squared modulus of `T[1,0]/T[0,0]`; the transmittance scales
/// `|1/T[0,0]|^2` by the ratio of substrate to ambient index-cosine products
/// to conserve energy flux across the change of medium.
pub fn reflectance<R: Rng + ?Sized>(
    stack: &Stack,
    lambda: f64,
    rng: &mut R,
) -> Result<(f64, f64)> {
    if stack.layers.len() < 2 {
        return Err(anyhow::anyhow!(
            "transfer-matrix chain needs at least 2 layers, got {}",
            stack.layers.len()
        ));
    }

    let ambient_ior = stack.ambient().ior;
    let samples: Vec<SampledLayer> = stack
        .layers
        .iter()
        .map(|layer| layer.sample(lambda, &ambient_ior, stack.cos_theta_0, rng))
        .collect();

    let mut ts: Matrix2<Complex<f64>> = Matrix2::identity();
    let mut tp: Matrix2<Complex<f64>> = Matrix2::identity();

    for pair in samples.windows(2) {
        let (i, j) = (&pair[0], &pair[1]);

        let fwd = fresnel::fresnel(i.n, j.n, i.cos_theta, j.cos_theta);
        let bwd = fresnel::fresnel(j.n, i.n, j.cos_theta, i.cos_theta);

        let ds = fresnel::d_mat(fwd.r_s, bwd.r_s, fwd.t_s, bwd.t_s);
        let dp = fresnel::d_mat(fwd.r_p, bwd.r_p, fwd.t_p, bwd.t_p);
        let p = fresnel::p_mat(lambda, i.n, i.thickness, i.cos_theta);

        ts = ts * p * ds;
        tp = tp * p * dp;
    }

    let r_s = ts[(1, 0)] / ts[(0, 0)];
    let r_p = tp[(1, 0)] / tp[(0, 0)];

    let t_s = 1.0 / ts[(0, 0)];
    let t_p = 1.0 / tp[(0, 0)];

    let ambient = &samples[0];
    let substrate = &samples[samples.len() - 1];

    // flux scaling across the medium change; the ambient denominator keeps
    // only real parts (near-normal, transparent-ambient assumption)
    let x = substrate.n * substrate.cos_theta;
    let y = substrate.n.conj() * substrate.cos_theta;
    let z = ambient.n.re * ambient.cos_theta.re;

    let big_r = 0.5 * (r_s.norm_sqr() + r_p.norm_sqr());
    let big_t = 0.5 * (t_s.norm_sqr() * x.re / z + t_p.norm_sqr() * y.re / z);

    Ok((big_r, big_t))
}
