//! PNG rendering of rasters and attractor samples

use image::{ImageBuffer, Rgba, RgbaImage};
use std::fmt;
use std::path::Path;
use std::str::FromStr;
use tracing::debug;

use crate::ifs::sampler::AttractorSample;
use crate::io::configuration::DEFAULT_CELL_SCALE;
use crate::io::error::{PatternError, Result, file_system_error, invalid_parameter};
use crate::pattern::palette::Palette;
use crate::triangle::{Cell, Raster};

/// Placement of triangle rows in the image
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Layout {
    /// Row `i` occupies columns `0..=i` (matches raster coordinates)
    #[default]
    Aligned,
    /// Rows centred horizontally, giving an isosceles triangle
    Centered,
}

impl fmt::Display for Layout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Aligned => f.write_str("aligned"),
            Self::Centered => f.write_str("centered"),
        }
    }
}

impl FromStr for Layout {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "aligned" => Ok(Self::Aligned),
            "centered" | "centred" => Ok(Self::Centered),
            other => Err(format!(
                "unknown layout '{other}' (expected 'aligned' or 'centered')"
            )),
        }
    }
}

/// Raster rendering settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderOptions {
    /// Pixels per entry along each axis; even and at least 2
    pub scale: u32,
    /// Row placement
    pub layout: Layout,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            scale: DEFAULT_CELL_SCALE,
            layout: Layout::Aligned,
        }
    }
}

impl RenderOptions {
    /// Check the scale
    ///
    /// # Errors
    ///
    /// Returns `InvalidParameter` if the scale is odd or zero
    pub fn validate(&self) -> Result<()> {
        if self.scale == 0 || self.scale % 2 != 0 {
            return Err(invalid_parameter(
                "scale",
                &self.scale,
                &"scale must be a positive even number",
            ));
        }
        Ok(())
    }
}

/// Render a raster into an RGBA image of side `rows * scale`
///
/// Absent cells stay transparent.
///
/// # Errors
///
/// Returns `InvalidParameter` for an invalid scale or oversized image, and
/// `InvalidClassLabel` if the palette lacks a colour for some label
pub fn render_raster(
    raster: &Raster,
    palette: &Palette,
    options: RenderOptions,
) -> Result<RgbaImage> {
    options.validate()?;
    let rows = raster.rows();
    let scale = options.scale as usize;
    let size = u32::try_from(rows * scale).map_err(|e| {
        invalid_parameter("rows", &rows, &format!("rendered image is too large: {e}"))
    })?;
    let mut img: RgbaImage = ImageBuffer::from_pixel(size, size, Rgba([0, 0, 0, 0]));
    let half = scale / 2;

    for i in 0..rows {
        let row_start = i * scale;
        for k in 0..=i {
            let Some(cell) = raster.label(i, k) else {
                continue;
            };
            let color = Rgba(palette.color(cell)?);
            let left = match options.layout {
                Layout::Aligned => k * scale,
                Layout::Centered => (rows * scale) / 2 - half * (i + 1) + scale * k,
            };
            for y in row_start..row_start + scale {
                for x in left..left + scale {
                    if x < size as usize && y < size as usize {
                        img.put_pixel(x as u32, y as u32, color);
                    }
                }
            }
        }
    }
    Ok(img)
}

/// Render a sample as a point-density plot on a `size x size` canvas
///
/// Pixel brightness follows the log of the hit count so sparse regions of
/// the attractor stay visible.
pub fn render_sample(sample: &AttractorSample, size: u32) -> RgbaImage {
    let side = size as usize;
    let mut hits = vec![0u32; side * side];
    let max_index = side.saturating_sub(1) as f64;
    for &[x, y] in sample.points() {
        if !x.is_finite() || !y.is_finite() {
            continue;
        }
        let col = (x * side as f64).floor().clamp(0.0, max_index) as usize;
        let row = (y * side as f64).floor().clamp(0.0, max_index) as usize;
        if let Some(count) = hits.get_mut(row * side + col) {
            *count = count.saturating_add(1);
        }
    }

    let peak = f64::from(hits.iter().copied().max().unwrap_or(0)).ln_1p();
    let palette = Palette::ramp(256);
    let mut img: RgbaImage = ImageBuffer::from_pixel(size, size, Rgba([0, 0, 0, 255]));
    for (index, &count) in hits.iter().enumerate() {
        if count == 0 || peak <= 0.0 {
            continue;
        }
        let level = (f64::from(count).ln_1p() / peak * 255.0).round() as u64;
        let color = palette
            .color(Cell::Class(level.min(255)))
            .unwrap_or([255, 255, 255, 255]);
        img.put_pixel((index % side) as u32, (index / side) as u32, Rgba(color));
    }
    img
}

/// Write an image, creating parent directories as needed
///
/// # Errors
///
/// Returns `FileSystem` if the directory cannot be created and
/// `ImageExport` if encoding or writing fails
pub fn save_image(img: &RgbaImage, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .map_err(|e| file_system_error(parent, "create directory", e))?;
    }
    img.save(path).map_err(|e| PatternError::ImageExport {
        path: path.to_path_buf(),
        source: e,
    })?;
    debug!(path = %path.display(), "wrote image");
    Ok(())
}

/// Render and save a raster
///
/// # Errors
///
/// Propagates rendering and file errors
pub fn export_raster_png(
    raster: &Raster,
    palette: &Palette,
    options: RenderOptions,
    path: &Path,
) -> Result<()> {
    save_image(&render_raster(raster, palette, options)?, path)
}

/// Render and save a sample
///
/// # Errors
///
/// Propagates file errors
pub fn export_sample_png(sample: &AttractorSample, size: u32, path: &Path) -> Result<()> {
    if size == 0 {
        return Err(invalid_parameter("size", &size, &"image must have pixels"));
    }
    save_image(&render_sample(sample, size), path)
}
