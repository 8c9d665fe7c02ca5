// THEORY:
// The mask refiner is a morphological opening: `n` rounds of erosion followed by
// `n` rounds of dilation, each round using a 3x3 square. Erosion deletes specks
// and hairlines that cannot contain the structuring element; dilation grows the
// survivors back to roughly their original outline. Large blobs come through
// nearly unchanged, small ones vanish.
//
// Holes inside a blob are not closed by an opening. That matters: the nose
// marker shows up as a hole in its body's mask and must survive refinement.

use imageproc::distance_transform::Norm;
use imageproc::morphology::{dilate, erode};

use crate::core_modules::segmenter::Mask;

/// Chebyshev radius of one round: a 3x3 square.
const ROUND_RADIUS: u8 = 1;

pub fn refine(mask: &Mask, iterations: u8) -> Mask {
    let mut refined = mask.clone();
    for _ in 0..iterations {
        refined = erode(&refined, Norm::LInf, ROUND_RADIUS);
    }
    for _ in 0..iterations {
        refined = dilate(&refined, Norm::LInf, ROUND_RADIUS);
    }
    refined
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core_modules::segmenter::{foreground_count, FOREGROUND};
    use image::{GrayImage, Luma};

    fn square_mask(size: u32, x0: u32, y0: u32, side: u32) -> Mask {
        GrayImage::from_fn(size, size, |x, y| {
            let inside = x >= x0 && x < x0 + side && y >= y0 && y < y0 + side;
            Luma([if inside { FOREGROUND } else { 0 }])
        })
    }

    #[test]
    fn isolated_specks_are_removed() {
        let mut mask = GrayImage::new(20, 20);
        mask.put_pixel(5, 5, Luma([FOREGROUND]));
        mask.put_pixel(12, 12, Luma([FOREGROUND]));
        mask.put_pixel(13, 12, Luma([FOREGROUND]));
        assert_eq!(foreground_count(&refine(&mask, 2)), 0);
    }

    #[test]
    fn large_square_survives_unchanged() {
        let mask = square_mask(40, 10, 10, 20);
        let refined = refine(&mask, 2);
        assert_eq!(refined, mask);
    }

    #[test]
    fn small_square_is_removed() {
        // A 4x4 square cannot hold the 5x5 footprint of two rounds.
        let mask = square_mask(20, 8, 8, 4);
        assert_eq!(foreground_count(&refine(&mask, 2)), 0);
    }

    #[test]
    fn holes_survive_opening() {
        let mut mask = square_mask(40, 5, 5, 30);
        for y in 18..22 {
            for x in 18..22 {
                mask.put_pixel(x, y, Luma([0]));
            }
        }
        let refined = refine(&mask, 2);
        assert_eq!(refined.get_pixel(19, 19)[0], 0);
        assert_eq!(refined.get_pixel(10, 10)[0], FOREGROUND);
    }

    #[test]
    fn zero_iterations_is_identity() {
        let mask = square_mask(10, 2, 2, 1);
        assert_eq!(refine(&mask, 0), mask);
    }
}
