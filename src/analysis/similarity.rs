//! Block self-similarity of a modular triangle
//!
//! For modulus m and a raster with at least m rows, the largest prefix of
//! m^k rows is split into blocks of m^(k-1) rows. Block `(a, b)` with
//! `0 <= b <= a < m` covers rows `a*s .. (a+1)*s` and columns
//! `b*s .. (b+1)*s`; its triangular part (local col <= local row) is compared
//! against block `(0, 0)`. The rest of each off-diagonal block is a gap that
//! a self-similar pattern leaves empty. The check repeats inside block
//! `(0, 0)` until blocks are single cells, whose occupancy is the motif.
//!
//! Nothing here assumes the modulus is prime. Composite moduli are run
//! through the same decomposition and reported as found.

use bitvec::prelude::*;
use std::collections::HashMap;
use tracing::{debug, info};

use crate::io::error::{PatternError, Result, validate_modulus};
use crate::math::largest_power_at_most;
use crate::triangle::{Cell, Raster};

/// Position of a block within one level of the decomposition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BlockPosition {
    /// Block row `a`
    pub row: usize,
    /// Block column `b`, never greater than `row`
    pub col: usize,
}

impl BlockPosition {
    /// Index in the row-major triangular enumeration `(0,0), (1,0), (1,1), ...`
    pub const fn triangular_index(self) -> usize {
        self.row * (self.row + 1) / 2 + self.col
    }
}

/// Every block position for modulus `m`, in triangular order
pub fn block_positions(modulus: usize) -> impl Iterator<Item = BlockPosition> {
    (0..modulus).flat_map(|row| (0..=row).map(move |col| BlockPosition { row, col }))
}

/// Which of the `m(m+1)/2` block positions are non-empty
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockMotif {
    modulus: usize,
    occupied: BitVec,
}

impl BlockMotif {
    /// Motif with every position empty
    pub fn empty(modulus: usize) -> Self {
        Self {
            modulus,
            occupied: bitvec![0; modulus * (modulus + 1) / 2],
        }
    }

    /// Motif with every position occupied
    pub fn full(modulus: usize) -> Self {
        Self {
            modulus,
            occupied: bitvec![1; modulus * (modulus + 1) / 2],
        }
    }

    /// Motif with exactly the given positions occupied
    ///
    /// Positions outside the triangle for `modulus` are ignored.
    pub fn from_positions(modulus: usize, positions: &[BlockPosition]) -> Self {
        let mut motif = Self::empty(modulus);
        for &position in positions {
            motif.set(position, true);
        }
        motif
    }

    fn set(&mut self, position: BlockPosition, occupied: bool) {
        if position.col <= position.row && position.row < self.modulus {
            self.occupied.set(position.triangular_index(), occupied);
        }
    }

    /// Modulus the motif was found for
    pub const fn modulus(&self) -> usize {
        self.modulus
    }

    /// Total number of block positions, `m(m+1)/2`
    pub fn total_positions(&self) -> usize {
        self.occupied.len()
    }

    /// Whether a block position is non-empty
    pub fn contains(&self, position: BlockPosition) -> bool {
        position.col <= position.row
            && position.row < self.modulus
            && self.occupied.get(position.triangular_index()).as_deref() == Some(&true)
    }

    /// Number of non-empty positions
    pub fn non_empty_count(&self) -> usize {
        self.occupied.count_ones()
    }

    /// Non-empty positions in triangular order
    pub fn non_empty(&self) -> Vec<BlockPosition> {
        block_positions(self.modulus)
            .filter(|&position| self.contains(position))
            .collect()
    }
}

/// Findings for one block at one level
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockReport {
    /// Where the block sits
    pub position: BlockPosition,
    /// Occupied cells in the block's triangular part
    pub occupied_cells: usize,
    /// Whether the block is a relabelling of block `(0, 0)`
    ///
    /// Always false for empty blocks.
    pub congruent: bool,
}

impl BlockReport {
    /// Whether any cell of the triangular part is occupied
    pub const fn is_non_empty(&self) -> bool {
        self.occupied_cells > 0
    }
}

/// Findings for one level of the recursion
#[derive(Debug, Clone, PartialEq)]
pub struct LevelReport {
    /// Rows covered by this level
    pub level_size: usize,
    /// Rows per block
    pub block_size: usize,
    /// One report per block position, in triangular order
    pub blocks: Vec<BlockReport>,
    /// Occupied cells found in the gaps of off-diagonal blocks
    pub gap_cells_occupied: usize,
    /// Total gap cells checked
    pub gap_cells_total: usize,
}

impl LevelReport {
    /// Number of non-empty blocks
    pub fn non_empty_count(&self) -> usize {
        self.blocks.iter().filter(|b| b.is_non_empty()).count()
    }

    /// Occupancy of this level as a motif
    pub fn motif(&self, modulus: usize) -> BlockMotif {
        let mut motif = BlockMotif::empty(modulus);
        for block in &self.blocks {
            motif.set(block.position, block.is_non_empty());
        }
        motif
    }

    fn agreement(&self, motif: &BlockMotif) -> f64 {
        let total = self.blocks.len();
        if total == 0 {
            return 0.0;
        }
        let agreeing = self
            .blocks
            .iter()
            .filter(|block| {
                let expected = motif.contains(block.position);
                block.is_non_empty() == expected && (!expected || block.congruent)
            })
            .count();
        let gap_factor = if self.gap_cells_total == 0 {
            1.0
        } else {
            1.0 - self.gap_cells_occupied as f64 / self.gap_cells_total as f64
        };
        agreeing as f64 / total as f64 * gap_factor
    }
}

/// Outcome of a self-similarity analysis
#[derive(Debug, Clone, PartialEq)]
pub struct SimilarityVerdict {
    /// Modulus the raster was analysed for
    pub modulus: u64,
    /// Rows in the analysed power-of-modulus prefix
    pub rows_analyzed: usize,
    /// Exponent k with `rows_analyzed = m^k`
    pub depth: u32,
    /// Reports from the coarsest level down to single-cell blocks
    pub levels: Vec<LevelReport>,
    /// Base motif: block occupancy of the finest level
    pub motif: BlockMotif,
    /// Mean agreement of every level with the base motif, in `[0, 1]`
    pub confidence: f64,
    /// Every level reproduces the motif with congruent blocks and empty gaps
    pub self_similar: bool,
}

impl SimilarityVerdict {
    /// Verdict for an arbitrary hypothesised motif, without a raster
    ///
    /// Used to feed hand-written motifs into candidate construction.
    pub fn from_motif(modulus: u64, motif: BlockMotif) -> Self {
        Self {
            modulus,
            rows_analyzed: 0,
            depth: 0,
            levels: Vec::new(),
            motif,
            confidence: 0.0,
            self_similar: false,
        }
    }
}

/// Detects recursive block self-similarity in rasters
#[derive(Debug, Clone, Copy)]
pub struct SelfSimilarityAnalyzer {
    modulus: u64,
}

impl SelfSimilarityAnalyzer {
    /// Create an analyzer for one modulus
    ///
    /// # Errors
    ///
    /// Returns `InvalidModulus` if `modulus < 2`
    pub fn new(modulus: u64) -> Result<Self> {
        Ok(Self {
            modulus: validate_modulus(modulus)?,
        })
    }

    /// Analyse the largest power-of-modulus prefix of `raster`
    ///
    /// # Errors
    ///
    /// Returns `InsufficientRows` if the raster has fewer than `modulus` rows
    pub fn analyze(&self, raster: &Raster) -> Result<SimilarityVerdict> {
        let rows = raster.rows();
        let insufficient = PatternError::InsufficientRows {
            rows,
            modulus: self.modulus,
        };
        let modulus = match usize::try_from(self.modulus) {
            Ok(m) if m <= rows => m,
            _ => return Err(insufficient),
        };
        let Some((depth, prefix)) = largest_power_at_most(rows, modulus) else {
            return Err(insufficient);
        };
        if depth == 0 {
            return Err(insufficient);
        }

        let mut levels = Vec::with_capacity(depth as usize);
        let mut level_size = prefix;
        while level_size >= modulus {
            levels.push(analyze_level(raster, level_size, modulus));
            level_size /= modulus;
        }

        let motif = levels.last().map_or_else(
            || BlockMotif::empty(modulus),
            |finest| finest.motif(modulus),
        );
        let confidence =
            levels.iter().map(|level| level.agreement(&motif)).sum::<f64>() / levels.len() as f64;
        let self_similar = levels.iter().all(|level| level.agreement(&motif) >= 1.0);

        debug!(
            modulus = self.modulus,
            rows_analyzed = prefix,
            depth,
            non_empty = motif.non_empty_count(),
            "analysed block decomposition"
        );
        if !self_similar {
            info!(
                modulus = self.modulus,
                confidence, "decomposition is not exactly self-similar"
            );
        }

        Ok(SimilarityVerdict {
            modulus: self.modulus,
            rows_analyzed: prefix,
            depth,
            levels,
            motif,
            confidence,
            self_similar,
        })
    }
}

fn analyze_level(raster: &Raster, level_size: usize, modulus: usize) -> LevelReport {
    let block_size = level_size / modulus;
    let cell = |row: usize, col: usize| raster.label(row, col).unwrap_or(Cell::Absent);
    let reference: Vec<Cell> = triangle_cells(block_size)
        .map(|(r, c)| cell(r, c))
        .collect();

    let mut blocks = Vec::with_capacity(modulus * (modulus + 1) / 2);
    let mut gap_cells_occupied = 0;
    let mut gap_cells_total = 0;

    for position in block_positions(modulus) {
        let origin_row = position.row * block_size;
        let origin_col = position.col * block_size;

        let labels: Vec<Cell> = triangle_cells(block_size)
            .map(|(r, c)| cell(origin_row + r, origin_col + c))
            .collect();
        let occupied_cells = labels.iter().filter(|label| label.is_occupied()).count();
        let congruent = occupied_cells > 0 && is_relabelling(&reference, &labels);
        blocks.push(BlockReport {
            position,
            occupied_cells,
            congruent,
        });

        if position.col < position.row {
            for (r, c) in gap_cells(block_size) {
                gap_cells_total += 1;
                if cell(origin_row + r, origin_col + c).is_occupied() {
                    gap_cells_occupied += 1;
                }
            }
        }
    }

    LevelReport {
        level_size,
        block_size,
        blocks,
        gap_cells_occupied,
        gap_cells_total,
    }
}

/// Local `(row, col)` with `col <= row` inside a block
fn triangle_cells(size: usize) -> impl Iterator<Item = (usize, usize)> {
    (0..size).flat_map(|r| (0..=r).map(move |c| (r, c)))
}

/// Local `(row, col)` with `col > row` inside a block
fn gap_cells(size: usize) -> impl Iterator<Item = (usize, usize)> {
    (0..size).flat_map(move |r| (r + 1..size).map(move |c| (r, c)))
}

/// Whether a single bijection between labels maps `reference` onto `candidate`
fn is_relabelling(reference: &[Cell], candidate: &[Cell]) -> bool {
    if reference.len() != candidate.len() {
        return false;
    }
    let mut forward: HashMap<Cell, Cell> = HashMap::new();
    let mut backward: HashMap<Cell, Cell> = HashMap::new();
    reference.iter().zip(candidate).all(|(&from, &to)| {
        *forward.entry(from).or_insert(to) == to && *backward.entry(to).or_insert(from) == from
    })
}
