//! Command-line interface for modulus sweeps

use crate::analysis::comparator::ComparatorConfig;
use crate::experiment::driver::{ExperimentConfig, OutputOptions, RowSpec, SamplerKind};
use crate::ifs::sampler::SamplerConfig;
use crate::io::configuration::{
    DEFAULT_BURN_IN, DEFAULT_CELL_SCALE, DEFAULT_COMPARISON_REGIONS, DEFAULT_HUTCHINSON_DEPTH,
    DEFAULT_ITERATIONS, DEFAULT_MODULUS, DEFAULT_ROW_COUNT, DEFAULT_SAMPLE_IMAGE_SIZE,
    DEFAULT_SEED, DEFAULT_TOLERANCE,
};
use crate::io::error::Result;
use crate::io::image::{Layout, RenderOptions};
use crate::pattern::encoder::{EncoderOptions, EncodingMode};
use clap::{ArgAction, Parser, ValueEnum};
use std::path::PathBuf;

/// Attractor approximation selectable from the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SamplerChoice {
    /// Random chaos game
    Chaos,
    /// Every map address up to `--depth`
    Deterministic,
    /// Hutchinson passes on the raster grid
    Hutchinson,
}

#[derive(Parser, Debug)]
#[command(name = "pascal-ifs")]
#[command(
    author,
    version,
    about = "Compare Pascal's triangle modulo m with attractors of synthesised IFSs"
)]
/// Command-line arguments for a sweep
// Each output and behaviour toggle is an independent flag
#[allow(clippy::struct_excessive_bools)]
pub struct Cli {
    /// Moduli to sweep, comma separated
    #[arg(short, long, value_delimiter = ',', default_values_t = [DEFAULT_MODULUS])]
    pub moduli: Vec<u64>,

    /// Rows generated for every modulus
    #[arg(short, long, conflicts_with = "power")]
    pub rows: Option<usize>,

    /// Generate m^POWER rows for modulus m
    #[arg(short, long)]
    pub power: Option<u32>,

    /// Points recorded by the chaos game
    #[arg(short, long, default_value_t = DEFAULT_ITERATIONS)]
    pub iterations: usize,

    /// Chaos-game steps discarded before recording
    #[arg(long, default_value_t = DEFAULT_BURN_IN)]
    pub burn_in: usize,

    /// Random seed for reproducible sampling
    #[arg(short, long, default_value_t = DEFAULT_SEED)]
    pub seed: u64,

    /// Ignore the seed and sample from OS entropy
    #[arg(long)]
    pub entropy: bool,

    /// Match radius in cells when scoring
    #[arg(short, long, default_value_t = DEFAULT_TOLERANCE)]
    pub tolerance: f64,

    /// Diagnostic regions per side in the comparison
    #[arg(long, default_value_t = DEFAULT_COMPARISON_REGIONS)]
    pub regions: usize,

    /// Residue encoding: binary or continuous
    #[arg(long, default_value_t = EncodingMode::Continuous)]
    pub mode: EncodingMode,

    /// Treat residue 0 as a foreground class
    #[arg(long)]
    pub keep_zero: bool,

    /// Attractor approximation
    #[arg(long, value_enum, default_value_t = SamplerChoice::Chaos)]
    pub sampler: SamplerChoice,

    /// Address length or pass count for deterministic samplers
    #[arg(short, long, default_value_t = DEFAULT_HUTCHINSON_DEPTH)]
    pub depth: u32,

    /// Directory for the CSV report and images
    #[arg(short, long, value_name = "DIR")]
    pub output: Option<PathBuf>,

    /// Write triangle and attractor PNGs (requires --output)
    #[arg(long, requires = "output")]
    pub render: bool,

    /// Pixels per triangle entry; must be even
    #[arg(long, default_value_t = DEFAULT_CELL_SCALE)]
    pub scale: u32,

    /// Triangle layout: aligned or centered
    #[arg(long, default_value_t = Layout::Aligned)]
    pub layout: Layout,

    /// Side of attractor images in pixels
    #[arg(long, default_value_t = DEFAULT_SAMPLE_IMAGE_SIZE)]
    pub image_size: u32,

    /// Write a GIF of the chaos game filling in (requires --output)
    #[arg(short, long, requires = "output")]
    pub animate: bool,

    /// Run moduli in parallel
    #[arg(long)]
    pub parallel: bool,

    /// Suppress progress output
    #[arg(short, long)]
    pub quiet: bool,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

impl Cli {
    /// Check if progress should be displayed
    pub const fn should_show_progress(&self) -> bool {
        !self.quiet
    }

    /// Seed passed to the sampler
    pub const fn effective_seed(&self) -> Option<u64> {
        if self.entropy { None } else { Some(self.seed) }
    }

    /// Build and validate the sweep configuration
    ///
    /// # Errors
    ///
    /// Returns the first invalid modulus, row count or parameter
    pub fn to_config(&self) -> Result<ExperimentConfig> {
        let rows = match (self.power, self.rows) {
            (Some(power), _) => RowSpec::PowerOfModulus(power),
            (None, Some(rows)) => RowSpec::Fixed(rows),
            (None, None) => RowSpec::Fixed(DEFAULT_ROW_COUNT),
        };
        let sampler_kind = match self.sampler {
            SamplerChoice::Chaos => SamplerKind::ChaosGame,
            SamplerChoice::Deterministic => SamplerKind::Addresses { depth: self.depth },
            SamplerChoice::Hutchinson => SamplerKind::Hutchinson { depth: self.depth },
        };
        let output = self.output.as_ref().map(|directory| OutputOptions {
            directory: directory.clone(),
            render: self.render,
            animate: self.animate,
            render_options: RenderOptions {
                scale: self.scale,
                layout: self.layout,
            },
            sample_image_size: self.image_size,
        });

        let config = ExperimentConfig {
            moduli: self.moduli.clone(),
            rows,
            encoder: EncoderOptions {
                mode: self.mode,
                zero_as_background: !self.keep_zero,
            },
            sampler_kind,
            sampler: SamplerConfig {
                iterations: self.iterations,
                burn_in: self.burn_in,
                seed: self.effective_seed(),
                ..SamplerConfig::default()
            },
            comparator: ComparatorConfig {
                tolerance: self.tolerance,
                regions: self.regions,
            },
            output,
            parallel: self.parallel,
        };
        config.validate()?;
        Ok(config)
    }
}
