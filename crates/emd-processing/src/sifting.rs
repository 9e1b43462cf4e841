//! Inner sifting loop: repeat single sifts until the statistic settles

use crate::envelope::sift_once;
use crate::interpolation::Interpolation;
use emd_core::EmdResult;
use tracing::{trace, warn};

/// Default cap on sifts per IMF
pub const DEFAULT_MAX_SIFT_ITERATIONS: usize = 10_000;

/// An extracted IMF and how it was reached
#[derive(Debug, Clone, PartialEq)]
pub struct SiftReport {
    pub imf: Vec<f64>,
    /// Number of sifts performed
    pub iterations: usize,
    /// Statistic of the last sift
    pub statistic: f64,
    /// True when the iteration cap stopped the loop
    pub capped: bool,
}

/// Sift `h0` until the statistic drops below `std_threshold`
///
/// The loop runs while `statistic >= std_threshold`, so at least one sift
/// always happens. A NaN statistic fails that comparison and ends the loop;
/// an infinite one keeps it going. `max_iterations` bounds the loop; when
/// it is hit the current candidate is returned as the IMF.
pub fn sift_to_convergence<I>(
    h0: &[f64],
    interpolation: &I,
    std_threshold: f64,
    max_iterations: usize,
) -> EmdResult<SiftReport>
where
    I: Interpolation + ?Sized,
{
    let mut current = h0.to_vec();
    let mut statistic = std_threshold;
    let mut iterations = 0;

    while statistic >= std_threshold {
        if iterations >= max_iterations {
            warn!(
                iterations,
                statistic, std_threshold, "sift iteration cap reached, accepting candidate"
            );
            return Ok(SiftReport {
                imf: current,
                iterations,
                statistic,
                capped: true,
            });
        }

        let outcome = sift_once(&current, interpolation)?;
        statistic = outcome.statistic;
        current = outcome.signal;
        iterations += 1;

        trace!(iterations, statistic, "sift");
    }

    Ok(SiftReport {
        imf: current,
        iterations,
        statistic,
        capped: false,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interpolation::{Interpolant, LinearInterpolation, PchipInterpolation};

    fn line_and_sine() -> Vec<f64> {
        (0..100)
            .map(|i| i as f64 / 100.0 + (0.7 * i as f64).sin())
            .collect()
    }

    struct Zero;

    struct Flat(f64);

    impl Interpolant for Flat {
        fn evaluate(&self, _x: f64) -> f64 {
            self.0
        }
    }

    impl Interpolant for Zero {
        fn evaluate(&self, _x: f64) -> f64 {
            0.0
        }
    }

    #[test]
    fn test_runs_at_least_once() {
        // Degenerate candidate: first sift returns statistic 0 and stops
        let h: Vec<f64> = (0..10).map(|i| i as f64).collect();
        let report = sift_to_convergence(&h, &PchipInterpolation, 0.5, 100).unwrap();

        assert_eq!(report.iterations, 1);
        assert_eq!(report.statistic, 0.0);
        assert_eq!(report.imf, h);
        assert!(!report.capped);
    }

    #[test]
    fn test_converges_below_threshold() {
        let h = line_and_sine();
        let report = sift_to_convergence(&h, &PchipInterpolation, 1.0, 10_000).unwrap();

        assert_eq!(report.imf.len(), h.len());
        assert!(report.iterations >= 1);
        assert!(report.capped || !(report.statistic >= 1.0));
    }

    #[test]
    fn test_nan_statistic_ends_loop() {
        // sin(0) is exactly zero and the zero envelope leaves it at zero: 0/0
        let h: Vec<f64> = (0..80)
            .map(|i| (i as f64 * std::f64::consts::PI / 10.0).sin())
            .collect();
        let zero = |_: &[f64], _: &[f64]| -> EmdResult<Zero> { Ok(Zero) };

        let report = sift_to_convergence(&h, &zero, 1e-9, 100).unwrap();
        assert_eq!(report.iterations, 1);
        assert!(report.statistic.is_nan());
        assert!(!report.capped);
    }

    #[test]
    fn test_iteration_cap() {
        let h = line_and_sine();
        let report = sift_to_convergence(&h, &LinearInterpolation, 1e-300, 3).unwrap();

        assert_eq!(report.iterations, 3);
        assert_eq!(report.imf.len(), h.len());
        assert!(report.capped);
    }

    #[test]
    fn test_infinite_statistic_runs_to_cap() {
        // A flat envelope mean equal to h[10] zeroes that sample on the first sift
        let h = line_and_sine();
        let level = h[10];
        let flat = move |_: &[f64], _: &[f64]| -> EmdResult<Flat> { Ok(Flat(level)) };

        let first = sift_once(&h, &flat).unwrap();
        assert!(first.statistic.is_infinite());

        let report = sift_to_convergence(&h, &flat, 1.0, 5).unwrap();
        assert_eq!(report.iterations, 5);
        assert!(report.capped);
        assert_eq!(report.imf.len(), h.len());
    }
}
