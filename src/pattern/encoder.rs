//! Residue classification for rasters
//!
//! Encoding is a pure function of the residue and the options, so two
//! encodings of the same triangle are always identical.

use crate::triangle::{Cell, Raster, Triangle};
use ndarray::Array2;
use std::fmt;
use std::str::FromStr;

/// How residues map onto class labels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum EncodingMode {
    /// Two classes: zero residues are class 0, everything else class 1
    Binary,
    /// One class per residue
    #[default]
    Continuous,
}

impl fmt::Display for EncodingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Binary => f.write_str("binary"),
            Self::Continuous => f.write_str("continuous"),
        }
    }
}

impl FromStr for EncodingMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "binary" => Ok(Self::Binary),
            "continuous" => Ok(Self::Continuous),
            other => Err(format!(
                "unknown encoding mode '{other}' (expected 'binary' or 'continuous')"
            )),
        }
    }
}

/// Encoder configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EncoderOptions {
    /// Residue-to-class mapping
    pub mode: EncodingMode,
    /// Render residue 0 as background instead of a foreground class
    pub zero_as_background: bool,
}

impl Default for EncoderOptions {
    fn default() -> Self {
        Self {
            mode: EncodingMode::Continuous,
            zero_as_background: true,
        }
    }
}

/// Maps residues to raster cells
#[derive(Debug, Clone, Copy, Default)]
pub struct PatternEncoder {
    options: EncoderOptions,
}

impl PatternEncoder {
    /// Create an encoder with the given options
    pub const fn new(options: EncoderOptions) -> Self {
        Self { options }
    }

    /// Options this encoder applies
    pub const fn options(&self) -> EncoderOptions {
        self.options
    }

    /// Number of foreground labels produced for `modulus`
    pub const fn class_count(&self, modulus: u64) -> u64 {
        match self.options.mode {
            EncodingMode::Binary => 2,
            EncodingMode::Continuous => modulus,
        }
    }

    /// Classify a single residue
    pub const fn classify(&self, residue: u64) -> Cell {
        if residue == 0 && self.options.zero_as_background {
            return Cell::Background;
        }
        match self.options.mode {
            EncodingMode::Binary => Cell::Class(if residue == 0 { 0 } else { 1 }),
            EncodingMode::Continuous => Cell::Class(residue),
        }
    }

    /// Classify one row of residues
    pub fn encode_row(&self, row: &[u64]) -> Vec<Cell> {
        row.iter().map(|&residue| self.classify(residue)).collect()
    }

    /// Encode a whole triangle into a square raster
    pub fn encode(&self, triangle: &Triangle) -> Raster {
        self.encode_rows(triangle.rows(), triangle.row_count(), triangle.modulus())
    }

    /// Encode rows streamed from a generator
    ///
    /// Rows beyond `row_count` are ignored; missing rows stay absent.
    pub fn encode_rows<I>(&self, rows: I, row_count: usize, modulus: u64) -> Raster
    where
        I: IntoIterator,
        I::Item: AsRef<[u64]>,
    {
        let mut labels = Array2::from_elem((row_count, row_count), Cell::Absent);
        for (i, row) in rows.into_iter().take(row_count).enumerate() {
            for (k, &residue) in row.as_ref().iter().enumerate().take(i + 1) {
                if let Some(cell) = labels.get_mut((i, k)) {
                    *cell = self.classify(residue);
                }
            }
        }
        Raster::new(labels, modulus, self.class_count(modulus))
    }
}
