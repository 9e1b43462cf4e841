//! Subcommand implementations

use anyhow::{anyhow, bail, Context, Result};
use clap::Args;
use emd_core::SignalStats;
use emd_processing::{Decomposer, Decomposition, DecompositionConfig, InterpolationKind};
use emd_simulation::{SignalSimulator, SimulatorConfig};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Debug, Args)]
pub struct DecomposeArgs {
    /// JSON file holding an array of samples
    #[arg(long, conflicts_with = "preset")]
    pub input: Option<PathBuf>,
    /// Simulated signal preset used when no input file is given
    #[arg(long, default_value = "line-and-sine")]
    pub preset: String,
    /// Samples to simulate for a preset
    #[arg(long, default_value_t = 100)]
    pub samples: usize,
    /// JSON decomposition config; flags below override its fields
    #[arg(long)]
    pub config: Option<PathBuf>,
    /// Sifting convergence threshold
    #[arg(long)]
    pub threshold: Option<f64>,
    /// Envelope interpolation: linear or pchip
    #[arg(long)]
    pub interpolation: Option<InterpolationKind>,
    /// Cap on extracted IMFs
    #[arg(long)]
    pub max_imfs: Option<usize>,
    /// Write the report here instead of stdout
    #[arg(long)]
    pub output: Option<PathBuf>,
}

#[derive(Debug, Args)]
pub struct GenerateArgs {
    /// Signal preset
    #[arg(long, default_value = "line-and-sine")]
    pub preset: String,
    /// Number of samples
    #[arg(long, default_value_t = 100)]
    pub samples: usize,
    /// Seed for the noise generator
    #[arg(long)]
    pub seed: Option<u64>,
    /// Write the signal here instead of stdout
    #[arg(long)]
    pub output: Option<PathBuf>,
}

/// Decomposition plus per-component summary written by `decompose`
#[derive(Debug, Serialize)]
pub struct DecompositionReport {
    pub config: DecompositionConfig,
    pub sample_count: usize,
    pub component_stats: Vec<SignalStats>,
    pub max_reconstruction_error: f64,
    pub decomposition: Decomposition,
}

impl DecompositionReport {
    pub fn new(config: DecompositionConfig, input: &[f64], decomposition: Decomposition) -> Self {
        let component_stats = decomposition.components().map(SignalStats::calculate).collect();
        let max_reconstruction_error = decomposition
            .reconstruct()
            .iter()
            .zip(input)
            .map(|(a, b)| (a - b).abs())
            .fold(0.0, f64::max);

        Self {
            config,
            sample_count: input.len(),
            component_stats,
            max_reconstruction_error,
            decomposition,
        }
    }
}

pub fn decompose(args: DecomposeArgs) -> Result<()> {
    let config = load_config(&args)?;
    let signal = match &args.input {
        Some(path) => read_signal(path)?,
        None => simulate(&args.preset, args.samples, None)?,
    };

    info!(
        samples = signal.len(),
        interpolation = %config.interpolation,
        threshold = config.std_threshold,
        "decomposing signal"
    );

    let decomposition = Decomposer::from_config(&signal, &config)
        .context("invalid decomposition parameters")?
        .collect_decomposition()
        .context("decomposition failed")?;

    info!(
        imfs = decomposition.imfs.len(),
        truncated = decomposition.truncated,
        "decomposition complete"
    );

    let report = DecompositionReport::new(config, &signal, decomposition);
    write_json(&report, args.output.as_deref())
}

pub fn generate(args: GenerateArgs) -> Result<()> {
    let signal = simulate(&args.preset, args.samples, args.seed)?;
    info!(samples = signal.len(), preset = %args.preset, "generated signal");
    write_json(&signal, args.output.as_deref())
}

/// Config file (or defaults) with command-line overrides applied
pub fn load_config(args: &DecomposeArgs) -> Result<DecompositionConfig> {
    let mut config = match &args.config {
        Some(path) => {
            let json = fs::read_to_string(path)
                .with_context(|| format!("failed to read config {}", path.display()))?;
            DecompositionConfig::from_json(&json)?
        }
        None => DecompositionConfig::default(),
    };

    if let Some(threshold) = args.threshold {
        config.std_threshold = threshold;
    }
    if let Some(interpolation) = args.interpolation {
        config.interpolation = interpolation;
    }
    if let Some(max_imfs) = args.max_imfs {
        config.max_imfs = max_imfs;
    }

    config.validate()?;
    Ok(config)
}

fn read_signal(path: &Path) -> Result<Vec<f64>> {
    let json = fs::read_to_string(path)
        .with_context(|| format!("failed to read signal {}", path.display()))?;
    let signal: Vec<f64> = serde_json::from_str(&json)
        .with_context(|| format!("{} is not a JSON array of numbers", path.display()))?;

    if signal.is_empty() {
        bail!("signal {} has no samples", path.display());
    }

    Ok(signal)
}

fn simulate(preset: &str, samples: usize, seed: Option<u64>) -> Result<Vec<f64>> {
    let mut config = SimulatorConfig::preset(preset, samples).ok_or_else(|| {
        anyhow!(
            "unknown preset '{}', expected one of: {}",
            preset,
            SimulatorConfig::preset_names().join(", ")
        )
    })?;

    if seed.is_some() {
        config.seed = seed;
    }

    Ok(SignalSimulator::new(config)?.generate()?)
}

fn write_json<T: Serialize>(value: &T, output: Option<&Path>) -> Result<()> {
    let json = serde_json::to_string_pretty(value)?;

    match output {
        Some(path) => fs::write(path, json)
            .with_context(|| format!("failed to write {}", path.display()))?,
        None => println!("{}", json),
    }

    Ok(())
}
