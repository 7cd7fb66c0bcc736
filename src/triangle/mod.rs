//! Pascal's triangle reduced modulo m and its raster form

/// Streaming row generator using the additive recurrence
pub mod generator;
/// Class-labelled rasters and occupancy bitmaps
pub mod raster;

pub use generator::{ModularTriangleGenerator, Rows, Triangle};
pub use raster::{Cell, Occupancy, Raster};
