//! Error handling for the EMD framework
//!
//! Every failure the decomposition can report is a precondition violation
//! raised at the call boundary. Numerically degenerate sifts are not errors
//! and never surface here.

/// Result type alias for EMD framework operations
pub type EmdResult<T> = Result<T, EmdError>;

/// Error type for all EMD framework operations
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[non_exhaustive]
pub enum EmdError {
    /// Sifting threshold is zero, negative or not a number
    #[error("Sifting threshold out of range: {threshold} (must be > 0)")]
    ThresholdOutOfRange {
        /// Threshold supplied by the caller
        threshold: f64,
    },

    /// Invalid decomposition or simulation configuration
    #[error("Invalid configuration: {reason}")]
    InvalidConfig {
        /// Description of the configuration error
        reason: String,
    },

    /// The interpolation capability rejected its knots
    #[error("Interpolation error: {reason}")]
    Interpolation {
        /// Description of the rejected input
        reason: String,
    },

    /// Signal data could not be used
    #[error("Invalid signal: {reason}")]
    InvalidSignal {
        /// Description of the signal issue
        reason: String,
    },
}

/// Convenience macro for creating configuration errors
#[macro_export]
macro_rules! config_error {
    ($($arg:tt)*) => {
        $crate::error::EmdError::InvalidConfig {
            reason: format!($($arg)*),
        }
    };
}

/// Convenience macro for creating interpolation errors
#[macro_export]
macro_rules! interpolation_error {
    ($($arg:tt)*) => {
        $crate::error::EmdError::Interpolation {
            reason: format!($($arg)*),
        }
    };
}
