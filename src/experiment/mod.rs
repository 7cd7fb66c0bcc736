//! Parameter sweeps over moduli

/// Session cache of generated rasters
pub mod cache;
/// Sweep orchestration
pub mod driver;
/// Per-run and per-sweep results
pub mod report;

pub use cache::{RasterKey, TriangleCache};
pub use driver::{ExperimentConfig, ExperimentDriver, OutputOptions, RowSpec, SamplerKind};
pub use report::{RunReport, SweepReport};
