//! Affine contractions of the unit square
//!
//! Points are `[x, y]` with x the column axis and y the row axis, so the
//! unit square lines up with a raster whose row 0 is at the top.

use crate::io::error::{Result, invalid_parameter};

/// Quarter-turn rotation about the centre of the unit square
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Rotation {
    /// No rotation
    #[default]
    None,
    /// 90 degrees
    Quarter,
    /// 180 degrees
    Half,
    /// 270 degrees
    ThreeQuarter,
}

impl Rotation {
    const fn turns(self) -> u8 {
        match self {
            Self::None => 0,
            Self::Quarter => 1,
            Self::Half => 2,
            Self::ThreeQuarter => 3,
        }
    }
}

const fn quarter_turn([x, y]: [f64; 2]) -> [f64; 2] {
    [1.0 - y, x]
}

const fn inverse_quarter_turn([x, y]: [f64; 2]) -> [f64; 2] {
    [y, 1.0 - x]
}

/// `p -> scale * orient(p) + translation`
///
/// `orient` first mirrors x (when `reflect` is set) and then applies the
/// rotation, both about the square's centre, so an oriented unit square is
/// still the unit square.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContractionMap {
    scale: f64,
    rotation: Rotation,
    reflect: bool,
    translation: [f64; 2],
}

impl ContractionMap {
    /// Create a map with a scale in `(0, 1)`
    ///
    /// # Errors
    ///
    /// Returns `InvalidParameter` if the scale is not a strict contraction or
    /// the translation is not finite
    pub fn new(scale: f64, translation: [f64; 2]) -> Result<Self> {
        if !(scale > 0.0 && scale < 1.0) {
            return Err(invalid_parameter(
                "scale",
                &scale,
                &"contraction scale must lie strictly between 0 and 1",
            ));
        }
        if !translation.iter().all(|t| t.is_finite()) {
            return Err(invalid_parameter(
                "translation",
                &format!("{translation:?}"),
                &"translation must be finite",
            ));
        }
        Ok(Self {
            scale,
            rotation: Rotation::None,
            reflect: false,
            translation,
        })
    }

    /// Apply a rotation before scaling
    #[must_use]
    pub const fn with_rotation(mut self, rotation: Rotation) -> Self {
        self.rotation = rotation;
        self
    }

    /// Mirror x before rotating
    #[must_use]
    pub const fn with_reflection(mut self, reflect: bool) -> Self {
        self.reflect = reflect;
        self
    }

    /// Contraction ratio
    pub const fn scale(&self) -> f64 {
        self.scale
    }

    /// Rotation applied before scaling
    pub const fn rotation(&self) -> Rotation {
        self.rotation
    }

    /// Whether x is mirrored before rotating
    pub const fn reflect(&self) -> bool {
        self.reflect
    }

    /// Offset added after scaling
    pub const fn translation(&self) -> [f64; 2] {
        self.translation
    }

    fn orient(&self, point: [f64; 2]) -> [f64; 2] {
        let mut p = point;
        if self.reflect {
            p = [1.0 - p[0], p[1]];
        }
        for _ in 0..self.rotation.turns() {
            p = quarter_turn(p);
        }
        p
    }

    fn unorient(&self, point: [f64; 2]) -> [f64; 2] {
        let mut p = point;
        for _ in 0..self.rotation.turns() {
            p = inverse_quarter_turn(p);
        }
        if self.reflect {
            p = [1.0 - p[0], p[1]];
        }
        p
    }

    /// Image of a point
    pub fn apply(&self, point: [f64; 2]) -> [f64; 2] {
        let [x, y] = self.orient(point);
        [
            self.scale.mul_add(x, self.translation[0]),
            self.scale.mul_add(y, self.translation[1]),
        ]
    }

    /// Preimage of a point
    pub fn inverse_apply(&self, point: [f64; 2]) -> [f64; 2] {
        let q = [
            (point[0] - self.translation[0]) / self.scale,
            (point[1] - self.translation[1]) / self.scale,
        ];
        self.unorient(q)
    }
}
