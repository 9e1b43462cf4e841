//! EMD-Core: Foundation types for empirical mode decomposition
//!
//! Error taxonomy and plain-slice signal helpers shared by the processing,
//! simulation and command-line crates.

pub mod error;
pub mod signal;

pub use error::{EmdError, EmdResult};
pub use signal::{reconstruct, subtract, SignalStats};
