//! Spectral reflectance of stochastic thin-film multilayer stacks.
//!
//! This crate models the structural colour of Bragg-mirror-like stacks of
//! thin dielectric or absorbing layers, the mechanism behind iridescence
//! phenomena such as the "Schiller" effect in labradorite. It computes the
//! wavelength-dependent reflectance and transmittance of a layer stack and
//! integrates the resulting spectrum into a displayable RGB colour.
//!
//! The crate provides:
//! - Complex refractive index sampling from fitted colour-primary curves
//! - A gaussian lamellae thickness model using the Box-Muller transform
//! - Fresnel interface and phase propagation operators for both polarizations
//! - An exact transfer-matrix reflectance solver for arbitrary stacks
//! - The Bolton closed-form approximation for two-film alternating stacks
//! - CIE spectral integration from reflectance spectra to tristimulus RGB
//!
//! # Key Modules
//!
//! - [`layer`]: layer and stack data model
//! - [`tmm`]: exact transfer-matrix reflectance
//! - [`bolton`]: closed-form approximate reflectance
//! - [`color`]: spectral to XYZ/RGB integration
//! - [`multiproblem`]: ensemble averaging over stochastic realizations

pub mod bolton;
pub mod color;
pub mod config;
pub mod fresnel;
pub mod ior;
pub mod layer;
pub mod model;
pub mod multiproblem;
pub mod output;
pub mod problem;
pub mod random;
pub mod result;
pub mod settings;
pub mod snell;
pub mod spectrum;
pub mod tmm;
