//! Deterministic signal components evaluated per sample index

use serde::{Deserialize, Serialize};

/// One additive signal component
///
/// Frequencies are in radians per sample, so a pattern is independent of
/// any sampling rate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SignalPattern {
    /// Constant offset
    Constant { level: f64 },
    /// Straight-line trend
    Linear { intercept: f64, slope: f64 },
    /// Pure tone
    Sinusoid {
        angular_frequency: f64,
        amplitude: f64,
        phase: f64,
    },
    /// Tone whose angular frequency sweeps linearly across the signal
    Chirp {
        start_frequency: f64,
        end_frequency: f64,
        amplitude: f64,
        length: usize,
    },
    /// Tone with exponentially decaying amplitude
    Damped {
        angular_frequency: f64,
        amplitude: f64,
        decay_rate: f64,
    },
}

impl SignalPattern {
    /// Component value at sample `index`
    pub fn value_at(&self, index: usize) -> f64 {
        let t = index as f64;

        match self {
            SignalPattern::Constant { level } => *level,

            SignalPattern::Linear { intercept, slope } => intercept + slope * t,

            SignalPattern::Sinusoid { angular_frequency, amplitude, phase } => {
                amplitude * (angular_frequency * t + phase).sin()
            }

            SignalPattern::Chirp { start_frequency, end_frequency, amplitude, length } => {
                let span = (*length).max(1) as f64;
                let sweep = (end_frequency - start_frequency) / span;
                // Phase is the integral of the instantaneous frequency
                amplitude * (start_frequency * t + 0.5 * sweep * t * t).sin()
            }

            SignalPattern::Damped { angular_frequency, amplitude, decay_rate } => {
                amplitude * (-decay_rate * t).exp() * (angular_frequency * t).sin()
            }
        }
    }

    /// Get pattern description
    pub fn description(&self) -> &'static str {
        match self {
            SignalPattern::Constant { .. } => "Constant offset",
            SignalPattern::Linear { .. } => "Linear trend",
            SignalPattern::Sinusoid { .. } => "Pure tone",
            SignalPattern::Chirp { .. } => "Frequency sweep",
            SignalPattern::Damped { .. } => "Damped tone",
        }
    }

    /// Sum of `patterns` at sample `index`
    pub fn sum_at(patterns: &[SignalPattern], index: usize) -> f64 {
        patterns.iter().map(|p| p.value_at(index)).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pattern_values() {
        assert_eq!(SignalPattern::Constant { level: 0.4 }.value_at(17), 0.4);
        assert_eq!(SignalPattern::Linear { intercept: 1.0, slope: 0.5 }.value_at(4), 3.0);

        let tone = SignalPattern::Sinusoid { angular_frequency: 0.7, amplitude: 2.0, phase: 0.0 };
        assert_eq!(tone.value_at(0), 0.0);
        assert!((tone.value_at(3) - 2.0 * 2.1f64.sin()).abs() < 1e-12);

        let damped = SignalPattern::Damped { angular_frequency: 1.0, amplitude: 1.0, decay_rate: 0.1 };
        assert!(damped.value_at(100).abs() < 1e-4);
    }

    #[test]
    fn test_sum_and_serde() {
        let patterns = [
            SignalPattern::Linear { intercept: 0.0, slope: 0.01 },
            SignalPattern::Sinusoid { angular_frequency: 0.7, amplitude: 1.0, phase: 0.0 },
        ];
        let expected = 0.05 + 3.5f64.sin();
        assert!((SignalPattern::sum_at(&patterns, 5) - expected).abs() < 1e-12);

        let json = serde_json::to_string(&patterns[1]).unwrap();
        assert!(json.contains("\"kind\":\"sinusoid\""));
        let back: SignalPattern = serde_json::from_str(&json).unwrap();
        assert_eq!(back, patterns[1]);
        assert_eq!(back.description(), "Pure tone");
    }
}
