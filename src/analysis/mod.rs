//! Analysis of modular-triangle rasters

/// Raster-versus-attractor similarity scoring
pub mod comparator;
/// Recursive block self-similarity detection
pub mod similarity;

pub use comparator::{ComparatorConfig, ComparisonResult, PatternComparator};
pub use similarity::{BlockMotif, BlockPosition, SelfSimilarityAnalyzer, SimilarityVerdict};
