//! One-call entry points for each pipeline stage
//!
//! These use default settings for everything they do not take as
//! arguments. Callers needing more control use the component types
//! directly.

use crate::analysis::comparator::{ComparatorConfig, ComparisonResult, PatternComparator};
use crate::analysis::similarity::{SelfSimilarityAnalyzer, SimilarityVerdict};
use crate::experiment::driver::generate_raster;
use crate::ifs::candidate::IfsCandidate;
use crate::ifs::sampler::{AttractorSample, AttractorSampler, SamplerConfig};
use crate::io::error::Result;
use crate::pattern::encoder::EncoderOptions;
use crate::triangle::Raster;

/// Rows `0..rows` of Pascal's triangle modulo `modulus`, encoded with the
/// default options (one class per residue, zero as background)
///
/// The raster keeps a dense `rows x rows` label grid, so `rows` is capped at
/// [`MAX_RASTER_ROWS`] (8192 rows, about 1 GiB of labels).
///
/// [`MAX_RASTER_ROWS`]: crate::io::configuration::MAX_RASTER_ROWS
///
/// # Errors
///
/// Returns `InvalidModulus` if `modulus < 2` and `InvalidRowCount` if `rows`
/// is zero or larger than the cap
pub fn generate_triangle(modulus: u64, rows: usize) -> Result<Raster> {
    generate_raster(modulus, rows, EncoderOptions::default(), None)
}

/// Block decomposition of `raster` for `modulus`
///
/// The modulus need not be the one the raster was generated with; a
/// triangle mod 4 can be tested against 2-blocks, for instance.
///
/// # Errors
///
/// Returns `InvalidModulus` if `modulus < 2` and `InsufficientRows` if the
/// raster has fewer than `modulus` rows
pub fn analyze_self_similarity(raster: &Raster, modulus: u64) -> Result<SimilarityVerdict> {
    SelfSimilarityAnalyzer::new(modulus)?.analyze(raster)
}

/// One contraction per non-empty block of the verdict's motif
///
/// # Errors
///
/// Returns `EmptyMapSet` when the motif has no non-empty block
pub fn build_ifs_candidate(modulus: u64, verdict: &SimilarityVerdict) -> Result<IfsCandidate> {
    IfsCandidate::from_verdict(modulus, verdict)
}

/// Run the chaos game for `iterations` recorded points
///
/// Identical seeds give identical samples.
///
/// # Errors
///
/// Returns `InvalidParameter` if `iterations` is zero
pub fn sample_attractor(
    candidate: &IfsCandidate,
    iterations: usize,
    seed: Option<u64>,
) -> Result<AttractorSample> {
    let config = SamplerConfig {
        iterations,
        seed,
        ..SamplerConfig::default()
    };
    AttractorSampler::new(candidate, config)?.sample()
}

/// Score `sample` against `raster` with a match radius of `tolerance` cells
///
/// # Errors
///
/// Returns `InvalidParameter` if `tolerance` is negative or not finite
pub fn compare(raster: &Raster, sample: &AttractorSample, tolerance: f64) -> Result<ComparisonResult> {
    let comparator = PatternComparator::new(ComparatorConfig {
        tolerance,
        ..ComparatorConfig::default()
    })?;
    Ok(comparator.compare(raster, sample))
}
