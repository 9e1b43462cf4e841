//! Configuration management for decomposition runs

use crate::interpolation::InterpolationKind;
use crate::sifting::DEFAULT_MAX_SIFT_ITERATIONS;
use emd_core::{config_error, EmdError, EmdResult};
use serde::{Deserialize, Serialize};

/// Default cap on extracted IMFs
pub const DEFAULT_MAX_IMFS: usize = 64;

/// Parameters for one decomposition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DecompositionConfig {
    /// Sifting stops once the convergence statistic falls below this
    pub std_threshold: f64,
    /// Envelope interpolation strategy
    pub interpolation: InterpolationKind,
    /// Most IMFs extracted before the residual is emitted
    pub max_imfs: usize,
    /// Most sifts spent on a single IMF
    pub max_sift_iterations: usize,
}

impl DecompositionConfig {
    /// Piecewise-linear envelopes with a loose threshold
    pub fn fast() -> Self {
        Self {
            std_threshold: 1.0,
            interpolation: InterpolationKind::Linear,
            ..Self::default()
        }
    }

    /// PCHIP envelopes with a tight threshold
    pub fn precise() -> Self {
        Self {
            std_threshold: 0.2,
            interpolation: InterpolationKind::Pchip,
            ..Self::default()
        }
    }

    /// Check every field before any computation starts
    pub fn validate(&self) -> EmdResult<()> {
        validate_threshold(self.std_threshold)?;

        if self.max_imfs == 0 {
            return Err(config_error!("max_imfs must be greater than 0"));
        }

        if self.max_sift_iterations == 0 {
            return Err(config_error!("max_sift_iterations must be greater than 0"));
        }

        Ok(())
    }

    /// Export configuration to JSON
    pub fn to_json(&self) -> EmdResult<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| config_error!("Failed to serialize configuration: {}", e))
    }

    /// Import configuration from JSON
    pub fn from_json(json: &str) -> EmdResult<Self> {
        serde_json::from_str(json)
            .map_err(|e| config_error!("Failed to deserialize configuration: {}", e))
    }
}

impl Default for DecompositionConfig {
    fn default() -> Self {
        Self {
            std_threshold: 1.0,
            interpolation: InterpolationKind::Pchip,
            max_imfs: DEFAULT_MAX_IMFS,
            max_sift_iterations: DEFAULT_MAX_SIFT_ITERATIONS,
        }
    }
}

/// Thresholds must be strictly positive; NaN is rejected too
pub fn validate_threshold(std_threshold: f64) -> EmdResult<()> {
    if std_threshold > 0.0 {
        Ok(())
    } else {
        Err(EmdError::ThresholdOutOfRange {
            threshold: std_threshold,
        })
    }
}
