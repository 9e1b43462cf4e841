//! EMD-Simulation: test signal generation
//!
//! Builds reproducible multi-component signals (trends, tones, chirps and
//! Gaussian noise) for tests, benchmarks and the command-line tool.

pub mod signal_patterns;
pub mod simulator;

pub use signal_patterns::*;
pub use simulator::*;
