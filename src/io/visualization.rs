//! Animated GIFs of a chaos game filling in its attractor

use crate::ifs::sampler::AttractorSample;
use crate::io::configuration::VIEWER_MIN_FRAME_DELAY_MS;
use crate::io::error::{PatternError, Result, file_system_error, invalid_parameter};
use crate::io::image::render_sample;
use image::Frame;
use std::path::Path;

/// Captures the growth of a sample for animation
///
/// Frame `j` shows the first `j * len / frames` points, so later frames
/// reveal how the chaos game settles onto the attractor.
pub struct ChaosAnimation<'a> {
    sample: &'a AttractorSample,
    frames: usize,
    size: u32,
}

impl<'a> ChaosAnimation<'a> {
    /// Prepare an animation with `frames` frames on a `size x size` canvas
    ///
    /// # Errors
    ///
    /// Returns `InvalidParameter` if `frames` or `size` is zero
    pub fn new(sample: &'a AttractorSample, frames: usize, size: u32) -> Result<Self> {
        if frames == 0 {
            return Err(invalid_parameter(
                "frames",
                &frames,
                &"at least one frame is required",
            ));
        }
        if size == 0 {
            return Err(invalid_parameter("size", &size, &"image must have pixels"));
        }
        Ok(Self {
            sample,
            frames,
            size,
        })
    }

    /// Number of points shown in each frame
    pub fn frame_point_counts(&self) -> Vec<usize> {
        let total = self.sample.len();
        let mut counts: Vec<usize> = (1..=self.frames)
            .map(|j| j * total / self.frames)
            .filter(|&count| count > 0)
            .collect();
        counts.dedup();
        counts
    }

    /// Export the frames as a GIF
    ///
    /// Frame delays below what viewers support are raised to the minimum and
    /// frames are skipped to keep the apparent speed. The final frame is held
    /// longer.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The sample has no points
    /// - File system operations fail
    /// - GIF encoding fails
    pub fn export_gif(&self, output_path: &Path, frame_delay_ms: u32) -> Result<()> {
        if self.sample.is_empty() {
            return Err(invalid_parameter(
                "sample",
                &0,
                &"no points captured for animation",
            ));
        }

        let effective_delay_ms = frame_delay_ms.max(VIEWER_MIN_FRAME_DELAY_MS);
        let skip_factor = if frame_delay_ms < VIEWER_MIN_FRAME_DELAY_MS {
            VIEWER_MIN_FRAME_DELAY_MS.div_ceil(frame_delay_ms.max(1)) as usize
        } else {
            1
        };

        let frames = self.generate_frames(effective_delay_ms, skip_factor);

        if let Some(parent) = output_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .map_err(|e| file_system_error(parent, "create directory", e))?;
        }
        let file = std::fs::File::create(output_path)
            .map_err(|e| file_system_error(output_path, "create file", e))?;

        let mut encoder = image::codecs::gif::GifEncoder::new(file);
        encoder
            .encode_frames(frames)
            .map_err(|e| PatternError::ImageExport {
                path: output_path.to_path_buf(),
                source: e,
            })
    }

    fn generate_frames(&self, delay_ms: u32, skip_factor: usize) -> Vec<Frame> {
        let counts = self.frame_point_counts();
        let last = counts.len().saturating_sub(1);
        let mut frames: Vec<Frame> = counts
            .iter()
            .enumerate()
            .filter(|&(index, _)| index % skip_factor.max(1) == 0 || index == last)
            .map(|(_, &count)| {
                let prefix = self.sample.points().get(..count).unwrap_or_default();
                let img = render_sample(&AttractorSample::from_points(prefix.to_vec()), self.size);
                Frame::from_parts(img, 0, 0, image::Delay::from_numer_denom_ms(delay_ms, 1))
            })
            .collect();

        // Hold the finished attractor on screen
        if let Some(final_frame) = frames.last().map(|f| f.buffer().clone()) {
            frames.push(Frame::from_parts(
                final_frame,
                0,
                0,
                image::Delay::from_numer_denom_ms(delay_ms * 25, 1),
            ));
        }
        frames
    }
}
