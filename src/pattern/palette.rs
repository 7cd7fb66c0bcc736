//! Colours for raster cells

use crate::io::error::{PatternError, Result};
use crate::math::interpolation::ColorRamp;
use crate::triangle::Cell;

/// Anchor colours of the default dark-to-bright ramp
const RAMP_ANCHORS: [[u8; 3]; 5] = [
    [40, 11, 84],
    [101, 21, 110],
    [188, 55, 84],
    [249, 142, 9],
    [252, 255, 164],
];

const BACKGROUND: [u8; 4] = [0, 0, 0, 255];
const ABSENT: [u8; 4] = [0, 0, 0, 0];

#[derive(Debug, Clone)]
enum ClassColors {
    Fixed(Vec<[u8; 4]>),
    // Evaluated per label so very large moduli do not allocate a table
    Ramp { ramp: ColorRamp, count: u64 },
}

/// Colour assignment for every kind of cell
#[derive(Debug, Clone)]
pub struct Palette {
    background: [u8; 4],
    absent: [u8; 4],
    classes: ClassColors,
}

impl Palette {
    /// Palette with explicit class colours
    pub const fn fixed(classes: Vec<[u8; 4]>, background: [u8; 4]) -> Self {
        Self {
            background,
            absent: ABSENT,
            classes: ClassColors::Fixed(classes),
        }
    }

    /// Two-colour palette for binary encodings: class 0 dark, class 1 bright
    pub fn binary() -> Self {
        Self::fixed(vec![[40, 11, 84, 255], [252, 255, 164, 255]], BACKGROUND)
    }

    /// Smooth ramp spread across `class_count` labels
    pub fn ramp(class_count: u64) -> Self {
        let classes = ColorRamp::new(&RAMP_ANCHORS).map_or_else(
            || ClassColors::Fixed(vec![[255, 255, 255, 255]]),
            |ramp| ClassColors::Ramp {
                ramp,
                count: class_count,
            },
        );
        Self {
            background: BACKGROUND,
            absent: ABSENT,
            classes,
        }
    }

    /// Replace the background colour
    #[must_use]
    pub const fn with_background(mut self, background: [u8; 4]) -> Self {
        self.background = background;
        self
    }

    /// Number of class labels with a colour
    pub fn class_count(&self) -> u64 {
        match &self.classes {
            ClassColors::Fixed(colors) => colors.len() as u64,
            ClassColors::Ramp { count, .. } => *count,
        }
    }

    /// Colour of one cell
    ///
    /// # Errors
    ///
    /// Returns `InvalidClassLabel` if the palette has no colour for the label
    pub fn color(&self, cell: Cell) -> Result<[u8; 4]> {
        match cell {
            Cell::Absent => Ok(self.absent),
            Cell::Background => Ok(self.background),
            Cell::Class(label) => self.class_color(label),
        }
    }

    fn class_color(&self, label: u64) -> Result<[u8; 4]> {
        let missing = || PatternError::InvalidClassLabel {
            label,
            palette_len: self.class_count(),
        };
        match &self.classes {
            ClassColors::Fixed(colors) => usize::try_from(label)
                .ok()
                .and_then(|index| colors.get(index).copied())
                .ok_or_else(missing),
            ClassColors::Ramp { ramp, count } => {
                if label >= *count {
                    return Err(missing());
                }
                let t = if *count <= 1 {
                    1.0
                } else {
                    label as f64 / (*count - 1) as f64
                };
                Ok(ramp.sample(t))
            }
        }
    }
}
