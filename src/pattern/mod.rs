//! Residue-to-class encoding and colour palettes

/// Residue classification into raster labels
pub mod encoder;
/// Colours for class labels
pub mod palette;

pub use encoder::{EncoderOptions, EncodingMode, PatternEncoder};
pub use palette::Palette;
