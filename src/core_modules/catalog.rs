// THEORY:
// The `catalog` module is the fixed palette of marker bodies the engine knows how
// to find. Each target is identified by its body color alone; the nose marker is
// found geometrically (nested inside the body), so it needs no entry here.
//
// Key architectural principles:
// 1.  **Closed Palette**: `MarkerColor` enumerates the known body colors. Their
//     hue centers and value floors are domain knowledge, not runtime data.
// 2.  **Open Definition**: `TargetDefinition` is what the pipeline actually
//     consumes. It carries every threshold the segmenter needs, so a caller can
//     build a custom catalog (or retune one color) without touching the enum.
// 3.  **Ordering**: A catalog is an ordered `Vec`. The order of definitions is
//     the order of detections in every frame result.

use std::fmt;

use crate::core_modules::pixel::pixel::MAX_HUE;

/// Half-width of the accepted hue band, in 8-bit hue steps.
pub const DEFAULT_HUE_TOLERANCE: u8 = 15;
/// Saturation floor shared by every palette color.
pub const DEFAULT_MIN_SATURATION: u8 = 80;
/// Value floor for colors that hold up under ambient light.
pub const DEFAULT_MIN_VALUE: u8 = 100;
/// Value floor for orange, which picks up warm ambient light otherwise.
pub const STRICT_MIN_VALUE: u8 = 140;

/// The known body colors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MarkerColor {
    Green,
    Blue,
    Orange,
    Pink,
}

impl MarkerColor {
    /// Every palette color in catalog order.
    pub const ALL: [MarkerColor; 4] = [
        MarkerColor::Green,
        MarkerColor::Blue,
        MarkerColor::Orange,
        MarkerColor::Pink,
    ];

    pub fn label(self) -> &'static str {
        match self {
            MarkerColor::Green => "Green",
            MarkerColor::Blue => "Blue",
            MarkerColor::Orange => "Orange",
            MarkerColor::Pink => "Pink",
        }
    }

    /// Expected body hue in 8-bit steps (`0..=179`).
    pub fn expected_hue(self) -> u8 {
        match self {
            MarkerColor::Green => 40,
            MarkerColor::Blue => 100,
            MarkerColor::Orange => 15,
            MarkerColor::Pink => 165,
        }
    }

    pub fn min_value(self) -> u8 {
        match self {
            MarkerColor::Orange => STRICT_MIN_VALUE,
            _ => DEFAULT_MIN_VALUE,
        }
    }

    /// Builds the segmentation thresholds for this color.
    pub fn definition(self) -> TargetDefinition {
        TargetDefinition::new(self.label(), self.expected_hue()).with_min_value(self.min_value())
    }
}

impl fmt::Display for MarkerColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Everything the segmenter needs to know about one target.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TargetDefinition {
    /// Label copied into every detection of this target.
    pub label: String,
    /// Hue center in 8-bit steps (`0..=179`).
    pub expected_hue: u8,
    /// Accepted hue band is `expected_hue ± hue_tolerance`, without wraparound.
    pub hue_tolerance: u8,
    /// Inclusive saturation floor.
    pub min_saturation: u8,
    /// Inclusive value floor.
    pub min_value: u8,
}

impl TargetDefinition {
    /// Creates a definition with the default tolerance and floors.
    /// Hues above 179 are clamped.
    pub fn new(label: impl Into<String>, expected_hue: u8) -> Self {
        Self {
            label: label.into(),
            expected_hue: expected_hue.min(MAX_HUE),
            hue_tolerance: DEFAULT_HUE_TOLERANCE,
            min_saturation: DEFAULT_MIN_SATURATION,
            min_value: DEFAULT_MIN_VALUE,
        }
    }

    #[must_use]
    pub fn with_min_value(mut self, min_value: u8) -> Self {
        self.min_value = min_value;
        self
    }

    #[must_use]
    pub fn with_min_saturation(mut self, min_saturation: u8) -> Self {
        self.min_saturation = min_saturation;
        self
    }

    #[must_use]
    pub fn with_hue_tolerance(mut self, hue_tolerance: u8) -> Self {
        self.hue_tolerance = hue_tolerance;
        self
    }

    /// Inclusive hue band. The bounds may fall outside `0..=179`; hues are
    /// never wrapped, so a band near either end is clipped in effect.
    pub fn hue_band(&self) -> (i16, i16) {
        let center = i16::from(self.expected_hue);
        let tolerance = i16::from(self.hue_tolerance);
        (center - tolerance, center + tolerance)
    }
}

impl From<MarkerColor> for TargetDefinition {
    fn from(color: MarkerColor) -> Self {
        color.definition()
    }
}

/// The reference palette: Green, Blue, Orange, Pink.
pub fn default_catalog() -> Vec<TargetDefinition> {
    MarkerColor::ALL.iter().map(|c| c.definition()).collect()
}
