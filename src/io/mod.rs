//! Command line, rendering, progress, logging and error handling

/// Command-line interface
pub mod cli;
/// Defaults and limits
pub mod configuration;
/// Error types
pub mod error;
/// PNG rendering
pub mod image;
/// Logging setup
pub mod logging;
/// Progress display
pub mod progress;
/// GIF animation of chaos-game runs
pub mod visualization;
