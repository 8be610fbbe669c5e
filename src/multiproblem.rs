//! Ensemble simulation orchestration and realization averaging.
//!
//! A single stochastic realization of the stack carries the full thickness
//! disorder of one physical sample patch; the observable colour comes from
//! averaging many such realizations. This module runs independent
//! realizations in parallel, reduces their spectra on the fly, and
//! integrates the averaged spectrum into a colour.
//!
//! The ensemble system provides:
//! - Parallel realization processing with rayon
//! - Progress tracking for long-running ensembles
//! - Reproducible per-realization random streams from a base seed
//! - On-the-fly result reduction and normalization
//! - Output file generation for the averaged spectrum and colour

use std::time::Instant;

use crate::{
    output,
    problem::Problem,
    random,
    result::SpectralResult,
    settings::Settings,
};
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use rayon::prelude::*;

#[cfg(test)]
mod tests {

    use super::*;
    use crate::settings::{FilmSettings, MediumSettings, Model};

    fn test_settings(realizations: usize) -> Settings {
        Settings {
            wavelength_min: 400.0,
            wavelength_max: 700.0,
            wavelength_step: 10.0,
            incidence: 45.0,
            ambient: MediumSettings { n: 1.0, k: 0.0 },
            substrate: MediumSettings { n: 1.5, k: 0.0 },
            film_a: FilmSettings {
                n: 1.6,
                k: 0.0,
                thickness: 90.6,
                thickness_sd: 8.0,
            },
            film_b: FilmSettings {
                n: 1.5,
                k: 0.0,
                thickness: 60.0,
                thickness_sd: 8.0,
            },
            layers: 20,
            model: Model::Tmm,
            realizations,
            seed: Some(11),
            directory: ".".to_string(),
        }
    }

    #[test]
    fn solve_produces_color() {
        let mut multiproblem = MultiProblem::new(None, Some(test_settings(4)));
        multiproblem.solve().unwrap();

        let rgb = multiproblem.result.rgb.unwrap();
        assert!(rgb.iter().all(|c| (0.0..=1.0).contains(c)));
        assert!(multiproblem
            .result
            .reflectance
            .iter()
            .all(|r| (0.0..=1.0).contains(r)));
    }

    #[test]
    fn seeded_ensembles_repeat() {
        let mut a = MultiProblem::new(None, Some(test_settings(8)));
        let mut b = MultiProblem::new(None, Some(test_settings(8)));
        a.solve().unwrap();
        b.solve().unwrap();
        assert_eq!(a.result.reflectance, b.result.reflectance);
    }
}

/// Ensemble reflectance simulation with realization averaging.
///
/// **Context**: The stochastic thickness model makes every evaluation of the
/// stack a different sample of the disorder distribution. Perceived colour
/// corresponds to the ensemble mean, which requires running many independent
/// realizations and averaging their spectra with parallel computation for
/// efficiency.
///
/// **How it Works**: Clones a base problem per realization, runs them in
/// parallel with independently seeded random streams, reduces the spectra
/// by summation on the fly, normalizes by the realization count, and
/// integrates the averaged spectrum into XYZ/RGB.
#[derive(Debug)]
pub struct MultiProblem {
    pub settings: Settings, // runtime settings
    pub result: SpectralResult, // averaged result of the problems
    problem_base: Problem,
}

impl MultiProblem {
    pub fn new(stack: Option<crate::layer::Stack>, settings: Option<Settings>) -> Self {
        let problem_base = Problem::new(stack, settings);
        let settings = problem_base.settings.clone();
        let grid = settings.grid().expect("Failed to build wavelength grid");
        let result = SpectralResult::new_empty(&grid);

        Self {
            settings,
            result,
            problem_base,
        }
    }

    /// Executes the parallel ensemble with progress tracking, then averages
    /// and converts the spectrum to a colour.
    pub fn solve(&mut self) -> anyhow::Result<()> {
        let start = Instant::now();
        println!("Solving ensemble...");

        let grid = self.settings.grid()?;
        let n = self.settings.realizations;
        let seed = self.settings.seed;

        // base problem that each realization clones and reruns
        let problem_base = self.problem_base.clone();

        let m = MultiProgress::new();
        let pb = m.add(ProgressBar::new(n as u64));
        pb.set_style(
            ProgressStyle::with_template(
            "{spinner:.green} [{elapsed_precise}] {bar:40.green/blue} {pos:>5}/{len:5} {msg} ETA: {eta_precise}",
            )
            .unwrap()
            .progress_chars("█▇▆▅▄▃▂▁")
        );
        pb.set_message("realization".to_string());

        // Solve each realization and reduce results on the fly
        self.result = (0..n)
            .into_par_iter()
            .map(|index| {
                let mut problem = problem_base.clone();
                let mut rng = random::stream_rng(seed, index as u64);

                problem
                    .run(&mut rng)
                    .expect("realization failed to evaluate");

                pb.inc(1);
                problem.result
            })
            .reduce(
                || SpectralResult::new_empty(&grid),
                |accum, item| Self::reduce_results(accum, item),
            );

        self.normalize_results(n as f64);
        self.result.compute_color()?;

        let end = Instant::now();
        let duration = end.duration_since(start);
        println!(
            "Time taken: {:.2?}, Time per realization: {:.2?}",
            duration,
            duration / n as u32
        );

        println!("Results:");
        self.result.print();
        Ok(())
    }

    /// Element-wise accumulation of one realization into the running sum.
    fn reduce_results(mut acc: SpectralResult, item: SpectralResult) -> SpectralResult {
        for (a, i) in acc.reflectance.iter_mut().zip(item.reflectance.iter()) {
            *a += i;
        }

        match (&mut acc.transmittance, &item.transmittance) {
            (Some(acc_t), Some(item_t)) => {
                for (a, i) in acc_t.iter_mut().zip(item_t.iter()) {
                    *a += i;
                }
            }
            (None, Some(item_t)) => {
                acc.transmittance = Some(item_t.clone());
            }
            _ => {}
        }

        acc
    }

    /// Divides the accumulated spectra by the number of realizations.
    fn normalize_results(&mut self, num_realizations: f64) {
        for r in self.result.reflectance.iter_mut() {
            *r /= num_realizations;
        }
        if let Some(ref mut t) = self.result.transmittance {
            for v in t.iter_mut() {
                *v /= num_realizations;
            }
        }
    }

    /// Writes the averaged spectrum and colour summary to output files.
    pub fn writeup(&self) {
        let _ = output::write_spectrum(&self.result, &self.settings.directory);
        let _ = output::write_summary(&self.result, &self.settings, &self.settings.directory);
        let _ = output::write_settings(&self.settings, &self.settings.directory);
    }
}
