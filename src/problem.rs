use anyhow::Result;
use ndarray::Array1;
use rand::RngCore;

use crate::{
    layer::Stack,
    result::SpectralResult,
    settings::{self, Settings},
};

#[cfg(test)]
mod tests {

    use super::*;
    use crate::random;
    use crate::settings::Model;

    fn test_settings() -> Settings {
        Settings {
            wavelength_min: 400.0,
            wavelength_max: 700.0,
            wavelength_step: 10.0,
            incidence: 45.0,
            ambient: crate::settings::MediumSettings { n: 1.0, k: 0.0 },
            substrate: crate::settings::MediumSettings { n: 1.5, k: 0.0 },
            film_a: crate::settings::FilmSettings {
                n: 1.6,
                k: 0.0,
                thickness: 90.6,
                thickness_sd: 8.0,
            },
            film_b: crate::settings::FilmSettings {
                n: 1.5,
                k: 0.0,
                thickness: 60.0,
                thickness_sd: 8.0,
            },
            layers: 20,
            model: Model::Tmm,
            realizations: 1,
            seed: Some(7),
            directory: ".".to_string(),
        }
    }

    #[test]
    fn run_fills_spectra() {
        let mut problem = Problem::new(None, Some(test_settings()));
        let mut rng = random::stream_rng(Some(7), 0);
        problem.run(&mut rng).unwrap();

        assert_eq!(problem.result.reflectance.len(), 30);
        assert!(problem.result.transmittance.is_some());
        assert!(problem
            .result
            .reflectance
            .iter()
            .all(|r| (0.0..=1.0).contains(r)));
    }

    #[test]
    fn seeded_runs_repeat() {
        let settings = test_settings();
        let mut a = Problem::new(None, Some(settings.clone()));
        let mut b = Problem::new(None, Some(settings));

        a.run(&mut random::stream_rng(Some(3), 0)).unwrap();
        b.run(&mut random::stream_rng(Some(3), 0)).unwrap();

        assert_eq!(a.result.reflectance, b.result.reflectance);
    }
}

/// A solvable reflectance problem: one stochastic realization of the stack
/// response over the wavelength grid.
#[derive(Debug, Clone)]
pub struct Problem {
    pub stack: Stack,              // layer stack to evaluate
    pub settings: Settings,        // runtime settings
    pub result: SpectralResult,    // results of the problem
}

impl Problem {
    /// Creates a problem from an optional stack and settings; missing parts
    /// are built from the configuration.
    pub fn new(stack: Option<Stack>, settings: Option<Settings>) -> Self {
        let settings = settings
            .unwrap_or_else(|| settings::load_config().expect("Failed to load config"));
        let stack = stack.unwrap_or_else(|| {
            settings
                .stack()
                .expect("Failed to build layer stack from settings")
        });
        let grid = settings.grid().expect("Failed to build wavelength grid");
        let result = SpectralResult::new_empty(&grid);

        Self {
            stack,
            settings,
            result,
        }
    }

    /// Evaluates the selected model once per wavelength sample, in grid
    /// order, drawing layer thicknesses from the supplied random source.
    pub fn run(&mut self, rng: &mut dyn RngCore) -> Result<()> {
        let grid = self.settings.grid()?;
        let model = self.settings.evaluator();
        let wavelengths = grid.samples();

        let mut reflectance = Array1::zeros(wavelengths.len());
        let mut transmittance: Option<Array1<f64>> = None;

        for (i, &lambda) in wavelengths.iter().enumerate() {
            let response = model.evaluate(&self.stack, lambda, rng)?;
            reflectance[i] = response.reflectance;
            if let Some(t) = response.transmittance {
                transmittance
                    .get_or_insert_with(|| Array1::zeros(wavelengths.len()))[i] = t;
            }
        }

        self.result.wavelengths = wavelengths;
        self.result.reflectance = reflectance;
        self.result.transmittance = transmittance;
        Ok(())
    }
}
