//! Defaults and limits for experiments

// Triangle generation
/// Modulus used when none is given
pub const DEFAULT_MODULUS: u64 = 2;
/// Rows generated when neither a row count nor a power is given
pub const DEFAULT_ROW_COUNT: usize = 64;
/// Largest raster side; rasters are stored in full (N x N)
pub const MAX_RASTER_ROWS: usize = 8192;

// Chaos game
/// Points recorded per sampling run
pub const DEFAULT_ITERATIONS: usize = 100_000;
/// Steps discarded before recording
pub const DEFAULT_BURN_IN: usize = 20;
/// Seed used by the CLI unless `--entropy` is given
pub const DEFAULT_SEED: u64 = 42;

// Deterministic sampling
/// Address length / pass count for deterministic sampling
pub const DEFAULT_HUTCHINSON_DEPTH: u32 = 6;
/// Cap on enumerated addresses for address-indexed sampling
pub const MAX_ADDRESS_POINTS: usize = 10_000_000;

// Comparison
/// Match radius in cells
pub const DEFAULT_TOLERANCE: f64 = 1.0;
/// Diagnostic regions per side
pub const DEFAULT_COMPARISON_REGIONS: usize = 4;

// Rendering
/// Pixels per triangle entry (must be even for centred layouts)
pub const DEFAULT_CELL_SCALE: u32 = 2;
/// Side of rendered attractor images in pixels
pub const DEFAULT_SAMPLE_IMAGE_SIZE: u32 = 512;
/// Frames in chaos-game animations
pub const DEFAULT_ANIMATION_FRAMES: usize = 60;
/// Delay between GIF animation frames
pub const GIF_FRAME_DELAY_MS: u32 = 20;
/// Minimum frame delay that viewers reliably support (in milliseconds)
pub const VIEWER_MIN_FRAME_DELAY_MS: u32 = 50;

// Progress bar display settings
/// Threshold for switching to batch progress mode
pub const MAX_INDIVIDUAL_PROGRESS_BARS: usize = 5;

// Output settings
/// Triangle render file suffix
pub const TRIANGLE_SUFFIX: &str = "_triangle.png";
/// Attractor render file suffix
pub const ATTRACTOR_SUFFIX: &str = "_attractor.png";
/// Chaos-game animation file suffix
pub const ANIMATION_SUFFIX: &str = "_chaos.gif";
/// Sweep report file name
pub const REPORT_FILE_NAME: &str = "report.csv";
