//! EMD-Processing: Empirical mode decomposition
//!
//! Extrema scanning, envelope sifting with boundary extrapolation, the inner
//! convergence loop and the lazy outer extraction loop.

pub mod extrema;
pub mod interpolation;
pub mod envelope;
pub mod sifting;
pub mod decomposer;
pub mod config;

pub use extrema::{count_extrema, find_extrema, has_at_most_one_extremum, Extrema, Extremum};
pub use interpolation::{
    Interpolant, Interpolation, InterpolationKind, LinearInterpolation, LinearSpline,
    PchipInterpolation, PchipSpline, Spline,
};
pub use envelope::{sift_once, EnvelopeKnots, SiftOutcome};
pub use sifting::{sift_to_convergence, SiftReport};
pub use decomposer::{decompose, decompose_all, Decomposer, Decomposition};
pub use config::DecompositionConfig;
