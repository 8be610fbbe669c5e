//! Reflectance evaluator strategies over the shared stack model.
//!
//! The exact transfer-matrix recursion and the Bolton closed form are
//! alternative algorithms over the same [`Stack`] data: one chains matrices
//! per layer, the other collapses a two-film alternating structure into an
//! analytic expression. Callers select a strategy through the
//! [`ReflectanceModel`] capability rather than through inheritance.

use anyhow::Result;
use rand::RngCore;

use crate::bolton;
use crate::layer::Stack;
use crate::tmm;


/// Single-wavelength response of a reflectance evaluator.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Response {
    pub reflectance: f64,
    /// Transmittance where the strategy computes one.
    pub transmittance: Option<f64>,
}

/// A reflectance algorithm over the stack data model.
pub trait ReflectanceModel: Send + Sync {
    /// Evaluates the stack response at one wavelength in nm.
    fn evaluate(&self, stack: &Stack, lambda: f64, rng: &mut dyn RngCore) -> Result<Response>;

    fn name(&self) -> &'static str;
}

/// Exact transfer-matrix recursion, one matrix chain per polarization.
#[derive(Debug, Clone, Copy, Default)]
pub struct TransferMatrix;

impl ReflectanceModel for TransferMatrix {
    fn evaluate(&self, stack: &Stack, lambda: f64, rng: &mut dyn RngCore) -> Result<Response> {
        let (r, t) = tmm::reflectance(stack, lambda, rng)?;
        Ok(Response {
            reflectance: r,
            transmittance: Some(t),
        })
    }

    fn name(&self) -> &'static str {
        "tmm"
    }
}

/// Bolton closed-form approximation for two-film alternating stacks.
#[derive(Debug, Clone, Copy, Default)]
pub struct Bolton;

impl ReflectanceModel for Bolton {
    fn evaluate(&self, stack: &Stack, lambda: f64, _rng: &mut dyn RngCore) -> Result<Response> {
        let interior = stack.interior();
        if interior.len() < 2 {
            return Err(anyhow::anyhow!(
                "the Bolton model needs two alternating films, got {} interior layer(s)",
                interior.len()
            ));
        }

        let r = bolton::reflectance(
            lambda,
            &interior[0],
            &interior[1],
            stack.ambient(),
            stack.cos_theta_0,
        );
        Ok(Response {
            reflectance: r,
            transmittance: None,
        })
    }

    fn name(&self) -> &'static str {
        "bolton"
    }
}
