// THEORY:
// The `frame` module is the bridge between whatever the camera hands us and the
// working representation every later stage reads. It performs, in order:
//
// 1.  **Resize**: scale to a fixed working width, keeping the aspect ratio, so
//     that every pixel threshold downstream (minimum radii, morphology) means
//     the same physical size regardless of capture resolution.
// 2.  **Rotate**: the camera is mounted upside down, so the frame is flipped on
//     both axes (a 180 degree rotation).
// 3.  **Blur**: a mild Gaussian blur suppresses sensor and compression noise
//     before thresholding.
// 4.  **Convert**: each pixel goes through `Pixel::to_hsv` into an `HsvFrame`.
//
// The preprocessor is a pure transform. Frames are assumed well formed; raw
// byte buffers are validated once at the edge (`frame_from_rgba` and
// `frame_from_rgb`) and rejected with a `FrameError` there.

use image::{imageops, RgbImage};

use crate::core_modules::pixel::pixel::{Hsv, Pixel};
use crate::error::FrameError;
use crate::pipeline::PipelineConfig;

/// A frame in the 8-bit HSV convention, row-major.
#[derive(Debug, Clone, PartialEq)]
pub struct HsvFrame {
    width: u32,
    height: u32,
    pixels: Vec<Hsv>,
}

impl HsvFrame {
    /// Converts every pixel of an RGB frame.
    pub fn from_rgb(frame: &RgbImage) -> Self {
        let (width, height) = frame.dimensions();
        let pixels = frame.pixels().map(|p| Pixel::from(p).to_hsv()).collect();
        Self {
            width,
            height,
            pixels,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// The pixel at `(x, y)`, or `None` outside the frame.
    pub fn get(&self, x: u32, y: u32) -> Option<Hsv> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.pixels.get(y as usize * self.width as usize + x as usize).copied()
    }

    pub fn pixels(&self) -> &[Hsv] {
        &self.pixels
    }
}

/// Scales `frame` to `width`, keeping the aspect ratio.
/// A frame already at `width`, or a `width` of zero, is returned unchanged.
pub fn resize_to_width(frame: &RgbImage, width: u32) -> RgbImage {
    let (current_width, current_height) = frame.dimensions();
    if width == 0 || current_width == width || current_width == 0 {
        return frame.clone();
    }
    let ratio = f64::from(width) / f64::from(current_width);
    let height = ((f64::from(current_height) * ratio) as u32).max(1);
    imageops::resize(frame, width, height, imageops::FilterType::Triangle)
}

/// Resize, rotate and blur; the RGB half of preprocessing.
pub fn normalize(frame: &RgbImage, config: &PipelineConfig) -> RgbImage {
    let mut working = resize_to_width(frame, config.working_width);
    if config.rotate_180 {
        working = imageops::rotate180(&working);
    }
    if config.blur_sigma > 0.0 {
        working = imageproc::filter::gaussian_blur_f32(&working, config.blur_sigma);
    }
    working
}

/// Full preprocessing: `normalize` followed by HSV conversion.
pub fn preprocess(frame: &RgbImage, config: &PipelineConfig) -> HsvFrame {
    HsvFrame::from_rgb(&normalize(frame, config))
}

fn check_buffer(width: u32, height: u32, channels: usize, len: usize) -> Result<(), FrameError> {
    if width == 0 || height == 0 {
        return Err(FrameError::empty(width, height));
    }
    let expected = (width as usize)
        .checked_mul(height as usize)
        .and_then(|n| n.checked_mul(channels))
        .unwrap_or(usize::MAX);
    if expected != len {
        return Err(FrameError::buffer_mismatch(expected, len));
    }
    Ok(())
}

/// Builds a frame from a packed RGBA8 buffer, dropping alpha.
pub fn frame_from_rgba(width: u32, height: u32, rgba: &[u8]) -> Result<RgbImage, FrameError> {
    check_buffer(width, height, 4, rgba.len())?;
    let rgb: Vec<u8> = rgba
        .chunks_exact(4)
        .flat_map(|px| [px[0], px[1], px[2]])
        .collect();
    RgbImage::from_raw(width, height, rgb)
        .ok_or_else(|| FrameError::buffer_mismatch(width as usize * height as usize * 3, rgba.len() / 4 * 3))
}

/// Builds a frame from a packed RGB8 buffer.
pub fn frame_from_rgb(width: u32, height: u32, rgb: &[u8]) -> Result<RgbImage, FrameError> {
    check_buffer(width, height, 3, rgb.len())?;
    RgbImage::from_raw(width, height, rgb.to_vec())
        .ok_or_else(|| FrameError::buffer_mismatch(width as usize * height as usize * 3, rgb.len()))
}
