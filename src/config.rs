/// Thickness sentinel for semi-infinite ambient/substrate media.
pub const INFINITE_THICKNESS: f64 = 1e31;
/// Smallest uniform draw fed to the Box-Muller logarithm.
pub const UNIFORM_EPSILON: f64 = 1e-12;
/// Reference index of refraction for the Bolton base Fresnel correction.
pub const BOLTON_REFERENCE_IOR: f64 = 1.56;
/// Lower edge of the wavelength domain covered by the CIE tables (nm).
pub const CIE_LAMBDA_MIN: f64 = 360.0;
/// Upper edge of the wavelength domain covered by the CIE tables (nm).
pub const CIE_LAMBDA_MAX: f64 = 830.0;
/// Maximum relative deviation between wavelength steps for a grid to count as uniform.
pub const GRID_UNIFORMITY_TOLERANCE: f64 = 1e-6;
