//! Square grids of class labels derived from a triangle
//!
//! A raster for N rows is N x N. Cell `(i, k)` with `k <= i` holds the
//! encoded class of `C(i, k) mod m`; cells above the diagonal are
//! [`Cell::Absent`], which is distinct from a background residue.

use bitvec::prelude::*;
use ndarray::{Array2, Axis, Slice};

/// One raster cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Cell {
    /// Outside the triangle (upper-triangular half)
    #[default]
    Absent,
    /// Inside the triangle but rendered as empty
    Background,
    /// Inside the triangle with a foreground class label
    Class(u64),
}

impl Cell {
    /// Whether the cell counts as part of the drawn pattern
    pub const fn is_occupied(self) -> bool {
        matches!(self, Self::Class(_))
    }
}

/// Class-labelled view of a triangle
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Raster {
    labels: Array2<Cell>,
    modulus: u64,
    class_count: u64,
}

impl Raster {
    /// Wrap a label grid
    ///
    /// `class_count` is the number of distinct foreground labels the
    /// encoder can produce, used to size palettes.
    pub const fn new(labels: Array2<Cell>, modulus: u64, class_count: u64) -> Self {
        Self {
            labels,
            modulus,
            class_count,
        }
    }

    /// Side length of the square grid (the row count)
    pub fn rows(&self) -> usize {
        self.labels.nrows()
    }

    /// Modulus of the source triangle
    pub const fn modulus(&self) -> u64 {
        self.modulus
    }

    /// Number of foreground classes the encoder can emit
    pub const fn class_count(&self) -> u64 {
        self.class_count
    }

    /// Underlying label grid
    pub const fn labels(&self) -> &Array2<Cell> {
        &self.labels
    }

    /// Label at `(row, col)`, `None` outside the grid
    pub fn label(&self, row: usize, col: usize) -> Option<Cell> {
        self.labels.get((row, col)).copied()
    }

    /// Whether `(row, col)` holds a foreground class
    pub fn is_occupied(&self, row: usize, col: usize) -> bool {
        self.label(row, col).is_some_and(Cell::is_occupied)
    }

    /// Row-major iterator over occupied coordinates
    pub fn occupied_cells(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.labels
            .indexed_iter()
            .filter(|(_, cell)| cell.is_occupied())
            .map(|(index, _)| index)
    }

    /// Number of occupied cells
    pub fn occupied_count(&self) -> usize {
        self.labels.iter().filter(|cell| cell.is_occupied()).count()
    }

    /// The top-left `rows x rows` corner, i.e. the raster of the first
    /// `rows` triangle rows
    ///
    /// Requests larger than the raster return a full copy.
    pub fn prefix(&self, rows: usize) -> Self {
        let side = rows.min(self.rows());
        Self {
            labels: self
                .labels
                .slice_axis(Axis(0), Slice::from(..side))
                .slice_axis(Axis(1), Slice::from(..side))
                .to_owned(),
            modulus: self.modulus,
            class_count: self.class_count,
        }
    }

    /// Occupancy bitmap of the whole grid
    pub fn occupancy(&self) -> Occupancy {
        let mut occupancy = Occupancy::new(self.rows());
        for (row, col) in self.occupied_cells() {
            occupancy.set(row, col);
        }
        occupancy
    }
}

/// Square bitmap of occupied cells in row-major order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Occupancy {
    side: usize,
    bits: BitVec,
}

impl Occupancy {
    /// Create an empty `side x side` bitmap
    pub fn new(side: usize) -> Self {
        Self {
            side,
            bits: bitvec![0; side * side],
        }
    }

    /// Bitmap of the cells hit by points in the unit square
    ///
    /// A point `[x, y]` lands in row `floor(y * side)` and column
    /// `floor(x * side)`. Points outside `[0, 1]` are clamped to the edge.
    pub fn from_points(points: &[[f64; 2]], side: usize) -> Self {
        let mut occupancy = Self::new(side);
        if side == 0 {
            return occupancy;
        }
        let max_index = (side - 1) as f64;
        for &[x, y] in points {
            if !x.is_finite() || !y.is_finite() {
                continue;
            }
            let col = (x * side as f64).floor().clamp(0.0, max_index) as usize;
            let row = (y * side as f64).floor().clamp(0.0, max_index) as usize;
            occupancy.set(row, col);
        }
        occupancy
    }

    /// Side length of the grid
    pub const fn side(&self) -> usize {
        self.side
    }

    /// Mark `(row, col)` occupied; out-of-range coordinates are ignored
    pub fn set(&mut self, row: usize, col: usize) {
        if row < self.side && col < self.side {
            self.bits.set(row * self.side + col, true);
        }
    }

    /// Whether `(row, col)` is occupied
    pub fn get(&self, row: usize, col: usize) -> bool {
        row < self.side
            && col < self.side
            && self.bits.get(row * self.side + col).as_deref() == Some(&true)
    }

    /// Number of occupied cells
    pub fn count(&self) -> usize {
        self.bits.count_ones()
    }

    /// Row-major iterator over occupied coordinates
    pub fn iter_occupied(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        let side = self.side.max(1);
        self.bits
            .iter_ones()
            .map(move |index| (index / side, index % side))
    }

    /// Cell centres of every occupied cell, in unit-square coordinates
    pub fn cell_centres(&self) -> Vec<[f64; 2]> {
        let side = self.side as f64;
        self.iter_occupied()
            .map(|(row, col)| [(col as f64 + 0.5) / side, (row as f64 + 0.5) / side])
            .collect()
    }
}
