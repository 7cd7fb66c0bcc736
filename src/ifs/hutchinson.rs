//! Deterministic attractor rendering by repeated application of the
//! Hutchinson operator `H(S) = f_1(S) ∪ ... ∪ f_n(S)`
//!
//! Each pass maps every occupied cell of the previous pass through every
//! map and marks the cells its image square overlaps. The seed defaults to
//! the filled unit square; any seed whose cells lie inside the attractor's
//! basin converges to the same grid once the passes reach the grid's scale.

use std::ops::Range;
use tracing::debug;

use crate::cancellation::{CancellationToken, is_cancelled};
use crate::ifs::candidate::IfsCandidate;
use crate::ifs::contraction::ContractionMap;
use crate::ifs::sampler::AttractorSample;
use crate::io::error::{PatternError, Result, invalid_parameter};
use crate::triangle::Occupancy;

/// Renders an attractor on a fixed grid
#[derive(Debug, Clone)]
pub struct HutchinsonRenderer {
    resolution: usize,
    depth: u32,
    seed: Option<Occupancy>,
    cancellation: Option<CancellationToken>,
}

/// Slack for image edges that land on cell boundaries up to rounding
const EDGE_EPSILON: f64 = 1e-9;

impl HutchinsonRenderer {
    /// Create a renderer for a `resolution x resolution` grid and `depth` passes
    ///
    /// # Errors
    ///
    /// Returns `InvalidParameter` if the resolution or depth is zero
    pub fn new(resolution: usize, depth: u32) -> Result<Self> {
        if resolution == 0 {
            return Err(invalid_parameter(
                "resolution",
                &resolution,
                &"grid must have at least one cell",
            ));
        }
        if depth == 0 {
            return Err(invalid_parameter(
                "depth",
                &depth,
                &"at least one pass is required",
            ));
        }
        Ok(Self {
            resolution,
            depth,
            seed: None,
            cancellation: None,
        })
    }

    /// Start from `seed` instead of the filled square
    ///
    /// # Errors
    ///
    /// Returns `InvalidParameter` if the seed's side differs from the
    /// renderer's resolution
    pub fn with_seed(mut self, seed: Occupancy) -> Result<Self> {
        if seed.side() != self.resolution {
            return Err(invalid_parameter(
                "seed",
                &seed.side(),
                &format!("seed side must equal the resolution {}", self.resolution),
            ));
        }
        self.seed = Some(seed);
        Ok(self)
    }

    /// Stop between passes once `token` is cancelled
    #[must_use]
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = Some(token);
        self
    }

    /// Occupancy after every pass
    ///
    /// # Errors
    ///
    /// Returns `Cancelled` if the token fired between passes
    pub fn render(&self, candidate: &IfsCandidate) -> Result<Occupancy> {
        let side = self.resolution;
        let mut current = self.seed.clone().unwrap_or_else(|| {
            let mut full = Occupancy::new(side);
            for row in 0..side {
                for col in 0..side {
                    full.set(row, col);
                }
            }
            full
        });

        for _ in 0..self.depth {
            if is_cancelled(self.cancellation.as_ref()) {
                return Err(PatternError::Cancelled {
                    operation: "hutchinson rendering",
                });
            }
            let mut next = Occupancy::new(side);
            for (row, col) in current.iter_occupied() {
                for map in candidate.maps() {
                    let (rows, cols) = image_cells(map, row, col, side);
                    for image_row in rows {
                        for image_col in cols.clone() {
                            next.set(image_row, image_col);
                        }
                    }
                }
            }
            current = next;
        }

        debug!(
            resolution = side,
            depth = self.depth,
            occupied = current.count(),
            "rendered attractor"
        );
        Ok(current)
    }

    /// Occupied cell centres after every pass, as a sample
    ///
    /// # Errors
    ///
    /// Returns `Cancelled` if the token fired between passes
    pub fn sample(&self, candidate: &IfsCandidate) -> Result<AttractorSample> {
        Ok(AttractorSample::from_points(
            self.render(candidate)?.cell_centres(),
        ))
    }
}

/// Cells overlapped by the image of cell `(row, col)` under `map`
///
/// Quarter turns and reflections keep the image an axis-aligned square, so
/// two opposite corners bound it. At least one cell is always returned for
/// an image inside the grid.
fn image_cells(
    map: &ContractionMap,
    row: usize,
    col: usize,
    side: usize,
) -> (Range<usize>, Range<usize>) {
    let n = side as f64;
    let [ax, ay] = map.apply([col as f64 / n, row as f64 / n]);
    let [bx, by] = map.apply([(col + 1) as f64 / n, (row + 1) as f64 / n]);
    let span = |a: f64, b: f64| {
        let start = (a.min(b) * n + EDGE_EPSILON).floor().clamp(0.0, n) as usize;
        let end = (a.max(b) * n - EDGE_EPSILON).ceil().clamp(0.0, n) as usize;
        start..end.max(start + 1).min(side)
    };
    (span(ay, by), span(ax, bx))
}
