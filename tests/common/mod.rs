//! Synthetic frame painters shared by the integration tests.

#![allow(dead_code)]

use image::{Rgb, RgbImage};

/// Pure colors that land exactly on each catalog hue in the 8-bit convention.
pub const GREEN: Rgb<u8> = Rgb([170, 255, 0]);
pub const BLUE: Rgb<u8> = Rgb([0, 170, 255]);
pub const ORANGE: Rgb<u8> = Rgb([255, 128, 0]);
pub const PINK: Rgb<u8> = Rgb([255, 0, 128]);
/// Nose color: zero saturation, outside every band.
pub const WHITE: Rgb<u8> = Rgb([255, 255, 255]);

pub fn black_frame(w: u32, h: u32) -> RgbImage {
    RgbImage::new(w, h)
}

/// Paints every pixel whose center lies within `radius` of `center`.
pub fn paint_disc(img: &mut RgbImage, center: [f32; 2], radius: f32, color: Rgb<u8>) {
    let (w, h) = img.dimensions();
    for y in 0..h {
        for x in 0..w {
            let dx = x as f32 - center[0];
            let dy = y as f32 - center[1];
            if (dx * dx + dy * dy).sqrt() <= radius {
                img.put_pixel(x, y, color);
            }
        }
    }
}

/// A body disc with a white nose disc inside it.
pub fn paint_marker(
    img: &mut RgbImage,
    color: Rgb<u8>,
    body_center: [f32; 2],
    body_radius: f32,
    nose_center: [f32; 2],
    nose_radius: f32,
) {
    paint_disc(img, body_center, body_radius, color);
    paint_disc(img, nose_center, nose_radius, WHITE);
}

/// Packs an RGB frame as RGBA8 with opaque alpha.
pub fn to_rgba(img: &RgbImage) -> Vec<u8> {
    img.pixels()
        .flat_map(|p| [p[0], p[1], p[2], 255])
        .collect()
}
