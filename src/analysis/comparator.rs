//! Similarity between a triangle raster and a sampled attractor
//!
//! The sample is rasterized at the raster's resolution. A truth cell is
//! covered when a sampled cell lies within the tolerance (Chebyshev distance
//! in cells), and a sampled cell is supported when a truth cell lies within
//! the same tolerance. The score is the harmonic mean of both fractions.

use ndarray::Array2;
use tracing::debug;

use crate::ifs::sampler::AttractorSample;
use crate::io::configuration::{DEFAULT_COMPARISON_REGIONS, DEFAULT_TOLERANCE};
use crate::io::error::{Result, invalid_parameter};
use crate::triangle::{Occupancy, Raster};

/// Comparison settings
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ComparatorConfig {
    /// Match radius in cells; fractional parts are truncated
    pub tolerance: f64,
    /// Diagnostic regions per side
    pub regions: usize,
}

impl Default for ComparatorConfig {
    fn default() -> Self {
        Self {
            tolerance: DEFAULT_TOLERANCE,
            regions: DEFAULT_COMPARISON_REGIONS,
        }
    }
}

/// Score and diagnostics of one comparison
#[derive(Debug, Clone, PartialEq)]
pub struct ComparisonResult {
    /// Harmonic mean of `recall` and `precision`, in `[0, 1]`
    pub score: f64,
    /// Fraction of truth cells with a sampled cell nearby
    pub recall: f64,
    /// Fraction of sampled cells with a truth cell nearby
    pub precision: f64,
    /// Occupied cells in the raster
    pub truth_cells: usize,
    /// Occupied cells in the rasterized sample
    pub sample_cells: usize,
    /// Truth cells with no sampled cell nearby
    pub truth_missed: usize,
    /// Sampled cells with no truth cell nearby
    pub sample_stray: usize,
    /// Missed plus stray cells per region, `regions x regions`
    pub region_mismatches: Array2<usize>,
    /// Tolerance the comparison used
    pub tolerance: f64,
}

impl ComparisonResult {
    /// Whether both patterns agree everywhere within tolerance
    pub const fn is_exact(&self) -> bool {
        self.truth_missed == 0 && self.sample_stray == 0
    }
}

/// Scores attractor samples against rasters
#[derive(Debug, Clone, Copy)]
pub struct PatternComparator {
    config: ComparatorConfig,
}

impl PatternComparator {
    /// Create a comparator
    ///
    /// # Errors
    ///
    /// Returns `InvalidParameter` if the tolerance is negative or not finite,
    /// or if `regions` is zero
    pub fn new(config: ComparatorConfig) -> Result<Self> {
        if !config.tolerance.is_finite() || config.tolerance < 0.0 {
            return Err(invalid_parameter(
                "tolerance",
                &config.tolerance,
                &"tolerance must be a finite, non-negative number of cells",
            ));
        }
        if config.regions == 0 {
            return Err(invalid_parameter(
                "regions",
                &config.regions,
                &"at least one region is required",
            ));
        }
        Ok(Self { config })
    }

    /// Settings in use
    pub const fn config(&self) -> ComparatorConfig {
        self.config
    }

    /// Compare a sample against a raster
    pub fn compare(&self, raster: &Raster, sample: &AttractorSample) -> ComparisonResult {
        let truth = raster.occupancy();
        let sampled = sample.rasterize(raster.rows());
        self.compare_occupancy(&truth, &sampled)
    }

    /// Compare two bitmaps of equal side
    ///
    /// Mismatched sides are compared over the smaller grid.
    pub fn compare_occupancy(&self, truth: &Occupancy, sampled: &Occupancy) -> ComparisonResult {
        let side = truth.side().min(sampled.side());
        // Any radius of at least `side` already covers the whole grid
        let radius = (self.config.tolerance.floor() as usize).min(side);
        let regions = self.config.regions;
        let truth_table = SummedArea::new(truth, side);
        let sample_table = SummedArea::new(sampled, side);

        let mut region_mismatches = Array2::zeros((regions, regions));
        let mut tally = |row: usize, col: usize| {
            let region = (row * regions / side.max(1), col * regions / side.max(1));
            if let Some(count) = region_mismatches.get_mut(region) {
                *count += 1;
            }
        };

        let mut truth_cells = 0;
        let mut truth_missed = 0;
        for (row, col) in truth.iter_occupied().filter(|&(r, c)| r < side && c < side) {
            truth_cells += 1;
            if !sample_table.any_within(row, col, radius) {
                truth_missed += 1;
                tally(row, col);
            }
        }

        let mut sample_cells = 0;
        let mut sample_stray = 0;
        for (row, col) in sampled.iter_occupied().filter(|&(r, c)| r < side && c < side) {
            sample_cells += 1;
            if !truth_table.any_within(row, col, radius) {
                sample_stray += 1;
                tally(row, col);
            }
        }

        let fraction = |good: usize, total: usize| {
            if total == 0 {
                1.0
            } else {
                good as f64 / total as f64
            }
        };
        let recall = fraction(truth_cells - truth_missed, truth_cells);
        let precision = fraction(sample_cells - sample_stray, sample_cells);
        let score = if recall + precision > 0.0 {
            2.0 * recall * precision / (recall + precision)
        } else {
            0.0
        };

        debug!(
            score,
            recall, precision, truth_cells, sample_cells, "compared patterns"
        );

        ComparisonResult {
            score,
            recall,
            precision,
            truth_cells,
            sample_cells,
            truth_missed,
            sample_stray,
            region_mismatches,
            tolerance: self.config.tolerance,
        }
    }
}

/// Summed-area table answering "any occupied cell in this window" in O(1)
struct SummedArea {
    sums: Array2<u32>,
    side: usize,
}

impl SummedArea {
    fn new(occupancy: &Occupancy, side: usize) -> Self {
        let mut sums = Array2::<u32>::zeros((side + 1, side + 1));
        for row in 0..side {
            for col in 0..side {
                let own = u32::from(occupancy.get(row, col));
                let above = sums.get((row, col + 1)).copied().unwrap_or(0);
                let left = sums.get((row + 1, col)).copied().unwrap_or(0);
                let diagonal = sums.get((row, col)).copied().unwrap_or(0);
                if let Some(cell) = sums.get_mut((row + 1, col + 1)) {
                    *cell = own + above + left - diagonal;
                }
            }
        }
        Self { sums, side }
    }

    fn any_within(&self, row: usize, col: usize, radius: usize) -> bool {
        let top = row.saturating_sub(radius);
        let left = col.saturating_sub(radius);
        let bottom = row.saturating_add(radius).saturating_add(1).min(self.side);
        let right = col.saturating_add(radius).saturating_add(1).min(self.side);
        let at = |r: usize, c: usize| self.sums.get((r, c)).copied().unwrap_or(0);
        at(bottom, right) + at(top, left) > at(top, right) + at(bottom, left)
    }
}
