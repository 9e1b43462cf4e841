//! Outer extraction loop
//!
//! [`Decomposer`] is a lazy iterator: every call to `next` extracts at most
//! one IMF from the running residual, and the residual itself is the last
//! element once it has at most one extremum. Dropping the iterator early
//! stops all further work.

use crate::config::{validate_threshold, DecompositionConfig, DEFAULT_MAX_IMFS};
use crate::extrema::{count_extrema, has_at_most_one_extremum};
use crate::interpolation::{Interpolation, InterpolationKind};
use crate::sifting::{sift_to_convergence, DEFAULT_MAX_SIFT_ITERATIONS};
use emd_core::{reconstruct, subtract, EmdResult};
use serde::{Deserialize, Serialize};
use std::iter::FusedIterator;
use tracing::{debug, warn};

/// Lazily decompose `input` into IMFs followed by the residual
///
/// Fails with [`emd_core::EmdError::ThresholdOutOfRange`] before any work
/// when `std_threshold` is not strictly positive.
pub fn decompose<I: Interpolation>(
    input: &[f64],
    interpolation: I,
    std_threshold: f64,
) -> EmdResult<Decomposer<I>> {
    Decomposer::new(input, interpolation, std_threshold)
}

/// Run a decomposition to completion
pub fn decompose_all<I: Interpolation>(
    input: &[f64],
    interpolation: I,
    std_threshold: f64,
) -> EmdResult<Decomposition> {
    Decomposer::new(input, interpolation, std_threshold)?.collect_decomposition()
}

/// Pull-based EMD over an owned copy of the input
#[derive(Debug, Clone)]
pub struct Decomposer<I> {
    interpolation: I,
    std_threshold: f64,
    max_imfs: usize,
    max_sift_iterations: usize,
    /// `None` once the final element has been yielded or an error occurred
    residual: Option<Vec<f64>>,
    extracted: usize,
    truncated: bool,
}

impl<I: Interpolation> Decomposer<I> {
    pub fn new(input: &[f64], interpolation: I, std_threshold: f64) -> EmdResult<Self> {
        validate_threshold(std_threshold)?;

        Ok(Self {
            interpolation,
            std_threshold,
            max_imfs: DEFAULT_MAX_IMFS,
            max_sift_iterations: DEFAULT_MAX_SIFT_ITERATIONS,
            residual: Some(input.to_vec()),
            extracted: 0,
            truncated: false,
        })
    }

    /// Override the IMF and per-IMF sift caps
    ///
    /// Every IMF is sifted at least once, so a sift cap of 0 is raised to 1.
    pub fn with_limits(mut self, max_imfs: usize, max_sift_iterations: usize) -> Self {
        self.max_imfs = max_imfs;
        self.max_sift_iterations = max_sift_iterations.max(1);
        self
    }

    /// Number of IMFs yielded so far
    pub fn imfs_extracted(&self) -> usize {
        self.extracted
    }

    /// True when the IMF cap cut the decomposition short
    pub fn is_truncated(&self) -> bool {
        self.truncated
    }

    /// Drain the iterator into a [`Decomposition`]
    pub fn collect_decomposition(mut self) -> EmdResult<Decomposition> {
        let mut components = Vec::new();
        for component in self.by_ref() {
            components.push(component?);
        }

        // The iterator always ends with the residual unless it failed
        let residual = components.pop().unwrap_or_default();

        Ok(Decomposition {
            imfs: components,
            residual,
            truncated: self.truncated,
        })
    }
}

impl Decomposer<InterpolationKind> {
    /// Build from a validated configuration, using its interpolation strategy
    pub fn from_config(input: &[f64], config: &DecompositionConfig) -> EmdResult<Self> {
        config.validate()?;

        Ok(Self::new(input, config.interpolation, config.std_threshold)?
            .with_limits(config.max_imfs, config.max_sift_iterations))
    }
}

impl<I: Interpolation> Iterator for Decomposer<I> {
    type Item = EmdResult<Vec<f64>>;

    fn next(&mut self) -> Option<Self::Item> {
        let residual = self.residual.take()?;

        if has_at_most_one_extremum(&residual) {
            debug!(imfs = self.extracted, "residual has at most one extremum");
            return Some(Ok(residual));
        }

        if self.extracted >= self.max_imfs {
            warn!(
                max_imfs = self.max_imfs,
                "IMF cap reached, emitting oscillating residual"
            );
            self.truncated = true;
            return Some(Ok(residual));
        }

        let report = match sift_to_convergence(
            &residual,
            &self.interpolation,
            self.std_threshold,
            self.max_sift_iterations,
        ) {
            Ok(report) => report,
            Err(e) => return Some(Err(e)),
        };

        self.extracted += 1;
        let residual = subtract(&residual, &report.imf);

        debug!(
            imf = self.extracted,
            iterations = report.iterations,
            statistic = report.statistic,
            residual_extrema = count_extrema(&residual),
            "extracted IMF"
        );

        self.residual = Some(residual);
        Some(Ok(report.imf))
    }
}

impl<I: Interpolation> FusedIterator for Decomposer<I> {}

/// Fully materialized decomposition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Decomposition {
    /// Extracted IMFs, highest frequency first
    pub imfs: Vec<Vec<f64>>,
    /// Final residual trend
    pub residual: Vec<f64>,
    /// True when the IMF cap stopped extraction early
    pub truncated: bool,
}

impl Decomposition {
    /// IMFs plus the residual
    pub fn component_count(&self) -> usize {
        self.imfs.len() + 1
    }

    /// Components in yield order, residual last
    pub fn components(&self) -> impl Iterator<Item = &[f64]> {
        self.imfs
            .iter()
            .map(Vec::as_slice)
            .chain(std::iter::once(self.residual.as_slice()))
    }

    /// Elementwise sum of all components
    pub fn reconstruct(&self) -> Vec<f64> {
        let components: Vec<&[f64]> = self.components().collect();
        reconstruct(&components)
    }

    pub fn into_components(self) -> Vec<Vec<f64>> {
        let mut components = self.imfs;
        components.push(self.residual);
        components
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interpolation::{LinearInterpolation, LinearSpline, PchipInterpolation};
    use emd_core::EmdError;
    use std::cell::Cell;

    fn line_and_sine() -> Vec<f64> {
        (0..100)
            .map(|i| i as f64 / 100.0 + (0.7 * i as f64).sin())
            .collect()
    }

    fn assert_reconstructs(input: &[f64], components: &[Vec<f64>]) {
        let sum = reconstruct(components);
        assert_eq!(sum.len(), input.len());
        for (a, b) in sum.iter().zip(input) {
            assert!((a - b).abs() < 1e-9, "reconstruction drift: {} vs {}", a, b);
        }
    }

    #[test]
    fn test_line_and_sine_needs_several_components() {
        let components: Vec<Vec<f64>> = decompose(&line_and_sine(), PchipInterpolation, 1.0)
            .unwrap()
            .collect::<EmdResult<_>>()
            .unwrap();

        assert!(components.len() > 2);
    }

    #[test]
    fn test_lengths_and_reconstruction() {
        let input = line_and_sine();

        for interpolation in [InterpolationKind::Linear, InterpolationKind::Pchip] {
            let components: Vec<Vec<f64>> = decompose(&input, interpolation, 1.0)
                .unwrap()
                .collect::<EmdResult<_>>()
                .unwrap();

            assert!(components.iter().all(|c| c.len() == input.len()));
            assert_reconstructs(&input, &components);
        }
    }

    #[test]
    fn test_short_inputs_keep_length() {
        for n in 3..12 {
            let input: Vec<f64> = (0..n).map(|i| ((i * 7) % 5) as f64).collect();
            let decomposition = decompose_all(&input, LinearInterpolation, 1.0).unwrap();

            assert!(decomposition.components().all(|c| c.len() == n));
            assert_reconstructs(&input, &decomposition.into_components());
        }
    }

    #[test]
    fn test_monotonic_input_yields_itself() {
        let increasing: Vec<f64> = (0..50).map(|i| i as f64 * 0.5).collect();
        let components: Vec<Vec<f64>> = decompose(&increasing, PchipInterpolation, 1.0)
            .unwrap()
            .collect::<EmdResult<_>>()
            .unwrap();
        assert_eq!(components, vec![increasing]);

        let constant = vec![3.0; 20];
        let decomposition = decompose_all(&constant, PchipInterpolation, 1.0).unwrap();
        assert!(decomposition.imfs.is_empty());
        assert_eq!(decomposition.residual, constant);
    }

    #[test]
    fn test_threshold_rejected_before_work() {
        let input = line_and_sine();

        for threshold in [0.0, -1.0, f64::NAN] {
            let result = decompose(&input, PchipInterpolation, threshold);
            assert!(matches!(result, Err(EmdError::ThresholdOutOfRange { .. })));
        }
    }

    #[test]
    fn test_deterministic() {
        let input = line_and_sine();
        let first = decompose_all(&input, PchipInterpolation, 1.0).unwrap();
        let second = decompose_all(&input, PchipInterpolation, 1.0).unwrap();

        assert_eq!(first, second);
    }

    #[test]
    fn test_lazy_extraction() {
        let input = line_and_sine();
        let fits = Cell::new(0usize);
        let counting = |xs: &[f64], ys: &[f64]| {
            fits.set(fits.get() + 1);
            LinearSpline::new(xs, ys)
        };

        let mut decomposer = decompose(&input, counting, 1.0).unwrap();
        assert_eq!(fits.get(), 0);

        let first = decomposer.next().unwrap().unwrap();
        assert_eq!(first.len(), input.len());
        let after_first = fits.get();
        assert!(after_first > 0);
        assert_eq!(decomposer.imfs_extracted(), 1);

        // Abandoning iteration performs no further fits
        drop(decomposer);
        assert_eq!(fits.get(), after_first);
    }

    #[test]
    fn test_imf_cap_truncates() {
        let input = line_and_sine();
        let decomposition = Decomposer::new(&input, PchipInterpolation, 1.0)
            .unwrap()
            .with_limits(1, 100)
            .collect_decomposition()
            .unwrap();

        assert_eq!(decomposition.imfs.len(), 1);
        assert!(decomposition.truncated);
        assert_eq!(decomposition.component_count(), 2);
        assert_reconstructs(&input, &decomposition.into_components());
    }

    #[test]
    fn test_zero_sift_cap_still_sifts_once() {
        let input = line_and_sine();
        let mut decomposer = Decomposer::new(&input, LinearInterpolation, 1.0)
            .unwrap()
            .with_limits(4, 0);

        let first = decomposer.next().unwrap().unwrap();
        assert_eq!(first.len(), input.len());
        assert_ne!(first, input);
        assert_eq!(decomposer.imfs_extracted(), 1);
    }

    #[test]
    fn test_interpolation_error_ends_iteration() {
        let input = line_and_sine();
        let failing = |_: &[f64], _: &[f64]| -> EmdResult<LinearSpline> {
            Err(EmdError::Interpolation {
                reason: "rejected".to_string(),
            })
        };

        let mut decomposer = decompose(&input, failing, 1.0).unwrap();
        assert!(matches!(decomposer.next(), Some(Err(EmdError::Interpolation { .. }))));
        assert!(decomposer.next().is_none());
    }

    #[test]
    fn test_from_config() {
        let input = line_and_sine();
        let config = DecompositionConfig::fast();

        let decomposition = Decomposer::from_config(&input, &config)
            .unwrap()
            .collect_decomposition()
            .unwrap();
        assert_reconstructs(&input, &decomposition.clone().into_components());
        assert_eq!(decomposition.reconstruct().len(), input.len());

        let mut invalid = config;
        invalid.max_imfs = 0;
        assert!(Decomposer::from_config(&input, &invalid).is_err());
    }

    #[test]
    fn test_empty_input() {
        let decomposition = decompose_all(&[], LinearInterpolation, 1.0).unwrap();
        assert!(decomposition.imfs.is_empty());
        assert!(decomposition.residual.is_empty());
    }
}
