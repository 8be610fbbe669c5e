use anyhow::Result;
use nalgebra::Complex;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::{config, ior::Ior, random, snell};


/// One medium of the stack: a thin film or a semi-infinite bounding medium.
///
/// The thickness is a gaussian mean; each evaluation draws an actual
/// thickness from the associated distribution. Semi-infinite media carry the
/// [`config::INFINITE_THICKNESS`] sentinel and are never drawn.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Layer {
    /// Mean thickness in nm, or the semi-infinite sentinel.
    pub thickness: f64,
    /// Thickness variance in nm^2.
    pub variance: f64,
    pub ior: Ior,
}

/// Per-wavelength sampled state of a layer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SampledLayer {
    pub n: Complex<f64>,
    pub cos_theta: Complex<f64>,
    pub thickness: f64,
}

impl Layer {
    /// Creates a thin film with the given mean thickness (nm) and thickness
    /// variance (nm^2).
    pub fn film(thickness: f64, variance: f64, ior: Ior) -> Self {
        Self {
            thickness,
            variance,
            ior,
        }
    }

    /// Creates a semi-infinite bounding medium (ambient or substrate).
    pub fn semi_infinite(ior: Ior) -> Self {
        Self {
            thickness: config::INFINITE_THICKNESS,
            variance: 0.0,
            ior,
        }
    }

    pub fn is_semi_infinite(&self) -> bool {
        self.thickness >= config::INFINITE_THICKNESS
    }

    /// Thickness variance relative to the squared mean thickness.
    pub fn relative_variance(&self) -> f64 {
        self.variance / (self.thickness * self.thickness)
    }

    /// Samples the layer state at a wavelength: complex index, refraction
    /// cosine from Snell's law, and a thickness draw for finite films.
    pub fn sample<R: Rng + ?Sized>(
        &self,
        lambda: f64,
        ambient: &Ior,
        cos_theta_0: f64,
        rng: &mut R,
    ) -> SampledLayer {
        let n = self.ior.sample(lambda);
        let n_0 = ambient.sample(lambda);
        let cos_theta = snell::cos_theta_i(n_0, n, Complex::new(cos_theta_0, 0.0));
        let thickness = if self.is_semi_infinite() {
            self.thickness
        } else {
            random::sample_thickness(self.thickness, self.variance, rng)
        };

        SampledLayer {
            n,
            cos_theta,
            thickness,
        }
    }
}

/// Ordered layer stack bounded by semi-infinite ambient and substrate media.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stack {
    /// Layers in traversal order; the first and last are semi-infinite.
    pub layers: Vec<Layer>,
    /// Cosine of the global angle of incidence in the ambient medium.
    pub cos_theta_0: f64,
}

impl Stack {
    /// Creates a stack from layers in traversal order and an incidence angle
    /// in degrees. Fails fast on malformed stacks before any sampling.
    pub fn new(layers: Vec<Layer>, incidence_deg: f64) -> Result<Self> {
        if layers.len() < 2 {
            return Err(anyhow::anyhow!(
                "stack needs at least ambient and substrate media, got {} layer(s)",
                layers.len()
            ));
        }
        Ok(Self {
            layers,
            cos_theta_0: incidence_deg.to_radians().cos(),
        })
    }

    /// Builds the Bragg-mirror-like structure: ambient, `interior` layers
    /// alternating between `film_a` and `film_b`, then the substrate. The
    /// material adjacent to the substrate follows from the interior count
    /// parity.
    pub fn alternating(
        ambient: Layer,
        film_a: Layer,
        film_b: Layer,
        substrate: Layer,
        interior: usize,
        incidence_deg: f64,
    ) -> Result<Self> {
        let mut layers = Vec::with_capacity(interior + 2);
        layers.push(ambient);
        for i in 0..interior {
            layers.push(if i % 2 == 0 { film_a } else { film_b });
        }
        layers.push(substrate);
        Self::new(layers, incidence_deg)
    }

    pub fn ambient(&self) -> &Layer {
        &self.layers[0]
    }

    pub fn substrate(&self) -> &Layer {
        &self.layers[self.layers.len() - 1]
    }

    /// Interior (finite) layers between the bounding media.
    pub fn interior(&self) -> &[Layer] {
        &self.layers[1..self.layers.len() - 1]
    }
}
