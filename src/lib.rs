//! Pascal's triangle modulo m as the attractor of an iterated function system
//!
//! Triangles are generated row by row, encoded into class rasters and split
//! into blocks to find their self-similar motif. Each motif yields a
//! candidate IFS whose attractor is sampled and scored against the raster.

#![forbid(unsafe_code)]

/// Block decomposition of rasters and scoring of attractor samples
pub mod analysis;
/// Cooperative cancellation for long sweeps
pub mod cancellation;
/// Sweeps over moduli, raster caching and reports
pub mod experiment;
/// Contraction maps, candidate systems and attractor sampling
pub mod ifs;
/// Input/output operations and error handling
pub mod io;
/// Mathematical utilities for interpolation, probability and integer powers
pub mod math;
/// Residue encoding and colour palettes
pub mod pattern;
/// One-call entry points for each pipeline stage
pub mod pipeline;
/// Modular triangle generation and rasters
pub mod triangle;

pub use io::error::{PatternError, Result};
pub use pipeline::{
    analyze_self_similarity, build_ifs_candidate, compare, generate_triangle, sample_attractor,
};
