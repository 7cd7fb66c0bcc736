//! Rows of Pascal's triangle modulo m
//!
//! Rows are produced with `C(i, k) = C(i-1, k-1) + C(i-1, k)` reduced at
//! every step, so no intermediate value ever leaves `[0, m)` and no
//! binomial coefficient is computed directly.

use crate::cancellation::{CancellationToken, is_cancelled};
use crate::io::error::{PatternError, Result, validate_modulus, validate_row_count};
use tracing::debug;

/// Overflow-free `(a + b) mod m` for `a, b < m`
const fn add_mod(a: u64, b: u64, modulus: u64) -> u64 {
    let headroom = modulus - a;
    if b >= headroom { b - headroom } else { a + b }
}

/// Generator for rows `0..row_count` of the triangle modulo `modulus`
#[derive(Debug, Clone)]
pub struct ModularTriangleGenerator {
    modulus: u64,
    row_count: usize,
    cancellation: Option<CancellationToken>,
}

impl ModularTriangleGenerator {
    /// Validate parameters and create a generator
    ///
    /// # Errors
    ///
    /// Returns `InvalidModulus` if `modulus < 2` and `InvalidRowCount` if
    /// `row_count == 0`
    pub fn new(modulus: u64, row_count: usize) -> Result<Self> {
        Ok(Self {
            modulus: validate_modulus(modulus)?,
            row_count: validate_row_count(row_count)?,
            cancellation: None,
        })
    }

    /// Stop producing rows once `token` is cancelled
    #[must_use]
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = Some(token);
        self
    }

    /// Modulus the entries are reduced by
    pub const fn modulus(&self) -> u64 {
        self.modulus
    }

    /// Number of rows the generator produces
    pub const fn row_count(&self) -> usize {
        self.row_count
    }

    /// Lazily iterate over the rows
    ///
    /// Each call starts again from row 0. Only the previous row is held,
    /// so streaming consumers use O(N) memory.
    pub fn rows(&self) -> Rows<'_> {
        Rows {
            modulus: self.modulus,
            remaining: self.row_count,
            current: Vec::with_capacity(self.row_count),
            cancellation: self.cancellation.as_ref(),
        }
    }

    /// Materialise every row into a [`Triangle`]
    ///
    /// # Errors
    ///
    /// Returns `Cancelled` if the cancellation token fired before the last row
    pub fn generate(&self) -> Result<Triangle> {
        debug!(
            modulus = self.modulus,
            rows = self.row_count,
            "generating triangle"
        );
        let rows: Vec<Vec<u64>> = self.rows().collect();
        if rows.len() < self.row_count {
            return Err(PatternError::Cancelled {
                operation: "triangle generation",
            });
        }
        Ok(Triangle {
            modulus: self.modulus,
            rows,
        })
    }
}

/// Lazy row iterator returned by [`ModularTriangleGenerator::rows`]
#[derive(Debug)]
pub struct Rows<'a> {
    modulus: u64,
    remaining: usize,
    current: Vec<u64>,
    cancellation: Option<&'a CancellationToken>,
}

impl Iterator for Rows<'_> {
    type Item = Vec<u64>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 || is_cancelled(self.cancellation) {
            return None;
        }
        self.remaining -= 1;

        // Update right to left so each sum still reads the previous row
        let len = self.current.len();
        for k in (1..len).rev() {
            if let (Some(&left), Some(&right)) = (self.current.get(k - 1), self.current.get(k)) {
                if let Some(slot) = self.current.get_mut(k) {
                    *slot = add_mod(left, right, self.modulus);
                }
            }
        }
        self.current.push(1);

        Some(self.current.clone())
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        if self.cancellation.is_some() {
            (0, Some(self.remaining))
        } else {
            (self.remaining, Some(self.remaining))
        }
    }
}

/// Rows of the triangle held in memory
///
/// Row `i` has exactly `i + 1` entries, each in `[0, modulus)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Triangle {
    modulus: u64,
    rows: Vec<Vec<u64>>,
}

impl Triangle {
    /// Generate rows `0..row_count` modulo `modulus`
    ///
    /// # Errors
    ///
    /// Returns `InvalidModulus` or `InvalidRowCount` for invalid parameters
    pub fn generate(modulus: u64, row_count: usize) -> Result<Self> {
        ModularTriangleGenerator::new(modulus, row_count)?.generate()
    }

    /// Modulus the entries are reduced by
    pub const fn modulus(&self) -> u64 {
        self.modulus
    }

    /// Number of rows held
    pub const fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// All rows in order
    pub fn rows(&self) -> &[Vec<u64>] {
        &self.rows
    }

    /// One row, if it exists
    pub fn row(&self, index: usize) -> Option<&[u64]> {
        self.rows.get(index).map(Vec::as_slice)
    }

    /// Entry `C(row, col) mod m`, or `None` outside the triangle
    pub fn entry(&self, row: usize, col: usize) -> Option<u64> {
        self.rows.get(row)?.get(col).copied()
    }
}
