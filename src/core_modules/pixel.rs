// THEORY (single-pixel color heuristics):
// The `Pixel` module is the most fundamental unit of the marker engine. It is a
// "dumb" data container for one RGB sample plus the heuristics that can be
// computed from that sample alone: hue, chroma, HSV saturation and HSV value.
// Anything that needs neighbours (blur, morphology, contours) lives higher up.
//
// The segmenter does not work in degrees and unit intervals. It works in the
// compact 8-bit HSV convention used by camera tooling:
//   • hue        0..=179  (degrees / 2, so a full turn fits in a byte)
//   • saturation 0..=255  (chroma / value, scaled)
//   • value      0..=255  (max channel)
// `Pixel::to_hsv` is the single place where that scaling happens, so catalog
// hues and thresholds can be written in the same units everywhere.
//
// Key principles:
// 1) Single-pixel scope: heuristics never read neighbours or history.
// 2) Normalized channels are precomputed once in `new`.
// 3) Gray and black pixels have an undefined hue; they report hue 0 with
//    saturation 0 so that the saturation floor rejects them.

pub mod pixel {
    use image::Rgb;

    pub type Channel = u8;
    pub type NormalizedChannel = f32;
    pub type HueDegrees = f32;
    pub type Chroma = f32;
    pub type SaturationHSV = f32;

    /// Number of hue steps in the 8-bit convention (one step = 2 degrees).
    pub const HUE_STEPS: u16 = 180;
    /// Largest representable 8-bit hue.
    pub const MAX_HUE: u8 = 179;

    /// A "dumb" data container representing a single RGB pixel.
    #[derive(Debug, Clone, Copy, PartialEq, Default)]
    pub struct Pixel {
        pub red: Channel,
        pub green: Channel,
        pub blue: Channel,
        pub red_normalized: NormalizedChannel,
        pub green_normalized: NormalizedChannel,
        pub blue_normalized: NormalizedChannel,
    }

    /// An 8-bit HSV triple. Hue is in `0..=179`.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Hsv {
        pub hue: u8,
        pub saturation: u8,
        pub value: u8,
    }

    impl Hsv {
        pub fn new(hue: u8, saturation: u8, value: u8) -> Self {
            Self {
                hue,
                saturation,
                value,
            }
        }
    }

    impl Pixel {
        pub fn new(red: Channel, green: Channel, blue: Channel) -> Self {
            Pixel {
                red,
                green,
                blue,
                red_normalized: red as NormalizedChannel / 255.0,
                green_normalized: green as NormalizedChannel / 255.0,
                blue_normalized: blue as NormalizedChannel / 255.0,
            }
        }

        fn max_normalized(&self) -> NormalizedChannel {
            self.red_normalized
                .max(self.green_normalized.max(self.blue_normalized))
        }

        fn min_normalized(&self) -> NormalizedChannel {
            self.red_normalized
                .min(self.green_normalized.min(self.blue_normalized))
        }

        /// Chroma (C): max(R,G,B) - min(R,G,B) on normalized channels.
        pub fn chroma(&self) -> Chroma {
            self.max_normalized() - self.min_normalized()
        }

        /// Hue angle in degrees `[0, 360)`. Returns 0 for achromatic pixels.
        pub fn hue_degrees(&self) -> HueDegrees {
            let maximum_channel = self.max_normalized();
            let chroma = self.chroma();

            if chroma <= 1e-6 {
                return 0.0;
            }

            let inverse_chroma = 1.0 / chroma;

            let (base_difference, sector_offset) = if maximum_channel == self.red_normalized {
                (self.green_normalized - self.blue_normalized, 0.0)
            } else if maximum_channel == self.green_normalized {
                (self.blue_normalized - self.red_normalized, 2.0)
            } else {
                (self.red_normalized - self.green_normalized, 4.0)
            };

            let mut hue_degrees = (base_difference * inverse_chroma + sector_offset) * 60.0;
            if hue_degrees < 0.0 {
                hue_degrees += 360.0;
            }
            hue_degrees
        }

        /// HSV saturation: chroma / value, 0 for black.
        pub fn saturation_hsv(&self) -> SaturationHSV {
            let maximum_channel = self.max_normalized();
            if maximum_channel <= 1e-6 {
                return 0.0;
            }
            self.chroma() / maximum_channel
        }

        /// Converts to the 8-bit HSV convention used by the segmenter.
        pub fn to_hsv(&self) -> Hsv {
            let hue = (self.hue_degrees() / 2.0).round() as u16 % HUE_STEPS;
            let saturation = (self.saturation_hsv() * 255.0).round().clamp(0.0, 255.0);
            Hsv {
                hue: hue as u8,
                saturation: saturation as u8,
                value: self.red.max(self.green.max(self.blue)),
            }
        }
    }

    impl From<&Rgb<u8>> for Pixel {
        fn from(rgb: &Rgb<u8>) -> Self {
            let [red, green, blue] = rgb.0;
            Pixel::new(red, green, blue)
        }
    }

    impl From<Pixel> for Rgb<u8> {
        fn from(pixel: Pixel) -> Self {
            Rgb([pixel.red, pixel.green, pixel.blue])
        }
    }

}
