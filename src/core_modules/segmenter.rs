// THEORY:
// The `segmenter` turns one `HsvFrame` and one `TargetDefinition` into a binary
// mask. A pixel is foreground when its hue sits inside the target's band and
// both saturation and value clear the target's floors. Nothing else is
// considered: no neighbours, no history.
//
// Masks are `GrayImage`s holding 0 or 255 so they can go straight into the
// morphology and contour stages.

use image::{GrayImage, Luma};

use crate::core_modules::catalog::TargetDefinition;
use crate::core_modules::frame::HsvFrame;
use crate::core_modules::pixel::pixel::Hsv;

/// Binary mask: `FOREGROUND` or `BACKGROUND` per pixel.
pub type Mask = GrayImage;

pub const FOREGROUND: u8 = 255;
pub const BACKGROUND: u8 = 0;

/// True if `hsv` falls inside the target's hue band and clears both floors.
pub fn matches(hsv: Hsv, target: &TargetDefinition) -> bool {
    let (low, high) = target.hue_band();
    let hue = i16::from(hsv.hue);
    hue >= low
        && hue <= high
        && hsv.saturation >= target.min_saturation
        && hsv.value >= target.min_value
}

/// Builds the foreground mask for one target.
pub fn segment(frame: &HsvFrame, target: &TargetDefinition) -> Mask {
    let (width, height) = frame.dimensions();
    let data = frame
        .pixels()
        .iter()
        .map(|&hsv| if matches(hsv, target) { FOREGROUND } else { BACKGROUND })
        .collect();
    Mask::from_raw(width, height, data).unwrap_or_else(|| GrayImage::new(width, height))
}

pub fn foreground_count(mask: &Mask) -> usize {
    mask.pixels().filter(|Luma([v])| *v != BACKGROUND).count()
}
