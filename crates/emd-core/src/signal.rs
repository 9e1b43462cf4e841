//! Signal helpers: elementwise arithmetic and summary statistics
//!
//! Signals are plain `f64` slices; the sample index doubles as time.

use serde::{Deserialize, Serialize};

/// Elementwise `a - b`, truncated to the shorter input
pub fn subtract(a: &[f64], b: &[f64]) -> Vec<f64> {
    a.iter().zip(b.iter()).map(|(x, y)| x - y).collect()
}

/// Elementwise sum of equally long components
///
/// Returns an empty vector when `components` is empty.
pub fn reconstruct<S: AsRef<[f64]>>(components: &[S]) -> Vec<f64> {
    let len = components.first().map(|c| c.as_ref().len()).unwrap_or(0);
    let mut sum = vec![0.0; len];

    for component in components {
        for (acc, value) in sum.iter_mut().zip(component.as_ref()) {
            *acc += value;
        }
    }

    sum
}

/// Basic statistics for a signal
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignalStats {
    pub mean: f64,
    pub rms: f64,
    pub std_dev: f64,
    pub min: f64,
    pub max: f64,
    pub peak_to_peak: f64,
}

impl SignalStats {
    pub fn calculate(data: &[f64]) -> Self {
        if data.is_empty() {
            return Self {
                mean: 0.0,
                rms: 0.0,
                std_dev: 0.0,
                min: 0.0,
                max: 0.0,
                peak_to_peak: 0.0,
            };
        }

        let n = data.len() as f64;
        let mean = data.iter().sum::<f64>() / n;
        let rms = (data.iter().map(|x| x * x).sum::<f64>() / n).sqrt();

        let variance = data.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / n;
        let std_dev = variance.sqrt();

        let min = data.iter().fold(f64::INFINITY, |a, &b| a.min(b));
        let max = data.iter().fold(f64::NEG_INFINITY, |a, &b| a.max(b));

        Self {
            mean,
            rms,
            std_dev,
            min,
            max,
            peak_to_peak: max - min,
        }
    }
}
