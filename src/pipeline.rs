// THEORY:
// The `pipeline` module is the top-level API of the marker engine. It wires the
// stages together and hides them behind one call:
//
//   frame -> preprocess -> for each catalog entry:
//       segment -> refine -> trace regions -> select body -> select nose
//       -> centroids -> heading -> Detection
//
// Each target runs a single pass through a small state machine. Every way out
// of it other than a detection is an ordinary outcome, recorded as a
// `TargetOutcome`, and simply leaves that target out of the frame result.
// The pipeline itself holds only its configuration and the immutable catalog,
// so repeated calls on the same frame return the same result.

use std::time::{Duration, Instant};

use image::RgbImage;
use tracing::{debug, trace, warn};

use crate::core_modules::blob_selector::blob_selector::{
    select_body, select_orientation, BodySelection, OrientationSelection,
};
use crate::core_modules::catalog::{default_catalog, TargetDefinition};
use crate::core_modules::frame::{frame_from_rgba, preprocess, HsvFrame};
use crate::core_modules::heading::heading;
use crate::core_modules::moment::Moments;
use crate::core_modules::morphology::refine;
use crate::core_modules::region::RegionTree;
use crate::core_modules::segmenter::{foreground_count, segment};
use crate::error::FrameError;

// Re-export key data structures for the public API.
pub use crate::core_modules::catalog::MarkerColor;
pub use crate::core_modules::moment::Centroid;

/// Configuration for the pipeline, defaulting to the reference tuning.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PipelineConfig {
    /// Frames are scaled to this width before processing. Zero keeps the
    /// capture width.
    pub working_width: u32,
    /// Rotate every frame by 180 degrees (camera mounted upside down).
    pub rotate_180: bool,
    /// Gaussian blur sigma applied before HSV conversion. Zero disables it.
    pub blur_sigma: f32,
    /// Rounds of erosion, then the same number of dilation, per mask.
    pub refine_iterations: u8,
    /// A body's enclosing radius must be strictly greater than this.
    pub min_body_radius: f64,
    /// A nose's enclosing radius must be strictly greater than this.
    pub min_orientation_radius: f64,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            working_width: 800,
            rotate_180: true,
            blur_sigma: 2.0,
            refine_iterations: 2,
            min_body_radius: 10.0,
            min_orientation_radius: 5.0,
        }
    }
}

impl PipelineConfig {
    #[must_use]
    pub fn with_working_width(mut self, working_width: u32) -> Self {
        self.working_width = working_width;
        self
    }

    #[must_use]
    pub fn with_rotate_180(mut self, rotate_180: bool) -> Self {
        self.rotate_180 = rotate_180;
        self
    }

    #[must_use]
    pub fn with_blur_sigma(mut self, blur_sigma: f32) -> Self {
        self.blur_sigma = blur_sigma.max(0.0);
        self
    }

    #[must_use]
    pub fn with_refine_iterations(mut self, refine_iterations: u8) -> Self {
        self.refine_iterations = refine_iterations;
        self
    }

    #[must_use]
    pub fn with_min_body_radius(mut self, min_body_radius: f64) -> Self {
        self.min_body_radius = min_body_radius;
        self
    }

    #[must_use]
    pub fn with_min_orientation_radius(mut self, min_orientation_radius: f64) -> Self {
        self.min_orientation_radius = min_orientation_radius;
        self
    }
}

/// One located target: body centroid in working-frame pixels plus heading.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Detection {
    pub label: String,
    pub x: i32,
    pub y: i32,
    /// Screen-space angle from nose to body, in `(-PI, PI]`.
    pub heading_radians: f64,
}

/// All detections of one frame, in catalog order.
pub type FrameResult = Vec<Detection>;

/// Terminal state of one target's pass through the pipeline.
#[derive(Debug, Clone, PartialEq)]
pub enum TargetOutcome {
    /// Segmentation found no pixel in the target's band.
    NoMaskPixels,
    /// No top-level region survived refinement, or the largest one failed the
    /// body radius gate (`largest_radius` is then set).
    NoBodyCandidate { largest_radius: Option<f64> },
    /// The body region encloses no area.
    DegenerateBodyCentroid { body_radius: f64 },
    /// The body has no direct child that passes the nose gate.
    NoOrientationCandidate { body: Centroid, body_radius: f64 },
    /// The nose region encloses no area.
    DegenerateOrientationCentroid { body: Centroid, body_radius: f64 },
    Detected(Detection),
}

impl TargetOutcome {
    pub fn detection(&self) -> Option<&Detection> {
        match self {
            TargetOutcome::Detected(detection) => Some(detection),
            _ => None,
        }
    }

    pub fn into_detection(self) -> Option<Detection> {
        match self {
            TargetOutcome::Detected(detection) => Some(detection),
            _ => None,
        }
    }
}

/// Outcome for one catalog entry.
#[derive(Debug, Clone, PartialEq)]
pub struct TargetReport {
    pub label: String,
    pub outcome: TargetOutcome,
}

/// The diagnostic view of one frame: every target's outcome, in catalog order.
#[derive(Debug, Clone)]
pub struct FrameAnalysis {
    pub targets: Vec<TargetReport>,
    pub elapsed: Duration,
}

impl FrameAnalysis {
    pub fn detections(&self) -> FrameResult {
        self.targets
            .iter()
            .filter_map(|t| t.outcome.detection().cloned())
            .collect()
    }

    pub fn into_detections(self) -> FrameResult {
        self.targets
            .into_iter()
            .filter_map(|t| t.outcome.into_detection())
            .collect()
    }
}

/// Runs segmentation through heading for one target on a preprocessed frame.
pub fn detect_target(frame: &HsvFrame, target: &TargetDefinition, config: &PipelineConfig) -> TargetOutcome {
    let raw_mask = segment(frame, target);
    if foreground_count(&raw_mask) == 0 {
        return TargetOutcome::NoMaskPixels;
    }

    let mask = refine(&raw_mask, config.refine_iterations);
    let tree = RegionTree::extract(&mask);
    trace!(label = %target.label, regions = tree.len(), "regions traced");

    let body = match select_body(&tree, config.min_body_radius) {
        BodySelection::Missing => return TargetOutcome::NoBodyCandidate { largest_radius: None },
        BodySelection::TooSmall { radius } => {
            return TargetOutcome::NoBodyCandidate {
                largest_radius: Some(radius),
            };
        }
        BodySelection::Found(candidate) => candidate,
    };

    let body_radius = body.circle.radius;
    let body_centroid = match locate_body(&body.moments, body_radius) {
        Ok(centroid) => centroid,
        Err(outcome) => return outcome,
    };

    let nose = match select_orientation(&tree, body.region.id, config.min_orientation_radius) {
        OrientationSelection::Found(candidate) => candidate,
        OrientationSelection::Missing => {
            return TargetOutcome::NoOrientationCandidate {
                body: body_centroid,
                body_radius,
            };
        }
        OrientationSelection::TooSmall { radius } => {
            trace!(label = %target.label, radius, "nose below size gate");
            return TargetOutcome::NoOrientationCandidate {
                body: body_centroid,
                body_radius,
            };
        }
    };

    orient(&target.label, body_centroid, body_radius, &nose.moments)
}

/// Body centroid, or the outcome for a body that encloses no area.
fn locate_body(moments: &Moments, body_radius: f64) -> Result<Centroid, TargetOutcome> {
    moments
        .centroid()
        .ok_or(TargetOutcome::DegenerateBodyCentroid { body_radius })
}

/// Final step: nose centroid and heading.
fn orient(label: &str, body: Centroid, body_radius: f64, nose: &Moments) -> TargetOutcome {
    let Some(nose_centroid) = nose.centroid() else {
        return TargetOutcome::DegenerateOrientationCentroid { body, body_radius };
    };
    TargetOutcome::Detected(Detection {
        label: label.to_owned(),
        x: body.x,
        y: body.y,
        heading_radians: heading(body, nose_centroid),
    })
}

/// Detects every catalog target in `frame` using the reference tuning.
pub fn detect(frame: &RgbImage, catalog: &[TargetDefinition]) -> FrameResult {
    MarkerPipeline::new(PipelineConfig::default(), catalog.to_vec()).detect(frame)
}

/// The main, top-level struct for the marker engine.
#[derive(Debug, Clone)]
pub struct MarkerPipeline {
    config: PipelineConfig,
    catalog: Vec<TargetDefinition>,
}

impl MarkerPipeline {
    pub fn new(config: PipelineConfig, catalog: Vec<TargetDefinition>) -> Self {
        Self { config, catalog }
    }

    pub fn with_default_catalog(config: PipelineConfig) -> Self {
        Self::new(config, default_catalog())
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    pub fn catalog(&self) -> &[TargetDefinition] {
        &self.catalog
    }

    /// Detections for one frame, in catalog order.
    pub fn detect(&self, frame: &RgbImage) -> FrameResult {
        self.analyze(frame).into_detections()
    }

    /// Like `detect`, for a packed RGBA8 buffer. Malformed buffers are rejected.
    pub fn detect_buffer(&self, width: u32, height: u32, rgba: &[u8]) -> Result<FrameResult, FrameError> {
        let frame = frame_from_rgba(width, height, rgba)?;
        Ok(self.detect(&frame))
    }

    /// Every target's outcome for one frame, in catalog order.
    pub fn analyze(&self, frame: &RgbImage) -> FrameAnalysis {
        let start = Instant::now();
        let (width, height) = frame.dimensions();
        if width == 0 || height == 0 {
            warn!(width, height, "rejecting empty frame");
            return FrameAnalysis {
                targets: Vec::new(),
                elapsed: start.elapsed(),
            };
        }

        let working = preprocess(frame, &self.config);
        let targets = self.analyze_working_frame(&working);
        let elapsed = start.elapsed();
        debug!(
            elapsed_ms = elapsed.as_secs_f64() * 1000.0,
            detections = targets.iter().filter(|t| t.outcome.detection().is_some()).count(),
            "frame analyzed"
        );
        FrameAnalysis { targets, elapsed }
    }

    /// Runs the catalog over an already preprocessed frame.
    pub fn analyze_working_frame(&self, working: &HsvFrame) -> Vec<TargetReport> {
        self.catalog
            .iter()
            .map(|target| {
                let outcome = detect_target(working, target, &self.config);
                debug!(label = %target.label, ?outcome, "target processed");
                TargetReport {
                    label: target.label.clone(),
                    outcome,
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    #[test]
    fn default_config_is_reference_tuning() {
        let config = PipelineConfig::default();
        assert_eq!(config.working_width, 800);
        assert!(config.rotate_180);
        assert_eq!(config.refine_iterations, 2);
        assert_eq!(config.min_body_radius, 10.0);
        assert_eq!(config.blur_sigma, 2.0);
    }

    #[test]
    fn builders_override_fields() {
        let config = PipelineConfig::default()
            .with_working_width(320)
            .with_rotate_180(false)
            .with_blur_sigma(-1.0)
            .with_refine_iterations(1)
            .with_min_body_radius(4.0)
            .with_min_orientation_radius(0.0);
        assert_eq!(config.working_width, 320);
        assert!(!config.rotate_180);
        assert_eq!(config.blur_sigma, 0.0);
        assert_eq!(config.refine_iterations, 1);
        assert_eq!(config.min_body_radius, 4.0);
        assert_eq!(config.min_orientation_radius, 0.0);
    }

    #[test]
    fn empty_catalog_gives_empty_result() {
        let frame = RgbImage::from_pixel(40, 30, Rgb([170, 255, 0]));
        assert!(detect(&frame, &[]).is_empty());
    }

    #[test]
    fn black_frame_reports_no_mask_pixels_for_every_target() {
        let pipeline = MarkerPipeline::with_default_catalog(PipelineConfig::default().with_working_width(64));
        let analysis = pipeline.analyze(&RgbImage::new(64, 48));
        assert_eq!(analysis.targets.len(), 4);
        assert!(analysis.targets.iter().all(|t| t.outcome == TargetOutcome::NoMaskPixels));
        assert!(analysis.detections().is_empty());
    }

    #[test]
    fn zero_sized_frame_is_rejected() {
        let pipeline = MarkerPipeline::with_default_catalog(PipelineConfig::default());
        assert!(pipeline.analyze(&RgbImage::new(0, 0)).targets.is_empty());
    }

    #[test]
    fn malformed_buffer_is_an_error() {
        let pipeline = MarkerPipeline::with_default_catalog(PipelineConfig::default());
        assert_eq!(
            pipeline.detect_buffer(4, 4, &[0; 10]),
            Err(FrameError::buffer_mismatch(64, 10))
        );
    }

    #[test]
    fn speckle_never_becomes_a_body() {
        let mut frame = RgbImage::new(64, 48);
        frame.put_pixel(10, 10, Rgb([170, 255, 0]));
        let config = PipelineConfig::default()
            .with_working_width(64)
            .with_blur_sigma(0.0)
            .with_rotate_180(false);
        let working = preprocess(&frame, &config);
        let outcome = detect_target(&working, &MarkerColor::Green.definition(), &config);
        assert_eq!(outcome, TargetOutcome::NoBodyCandidate { largest_radius: None });
    }

    #[test]
    fn body_without_area_is_degenerate() {
        assert_eq!(
            locate_body(&Moments::default(), 12.5),
            Err(TargetOutcome::DegenerateBodyCentroid { body_radius: 12.5 })
        );
        let square = Moments {
            m00: 100.0,
            m10: 2000.0,
            m01: 1500.0,
        };
        assert_eq!(locate_body(&square, 12.5), Ok(Centroid { x: 20, y: 15 }));
    }

    #[test]
    fn nose_without_area_keeps_the_body() {
        let body = Centroid { x: 40, y: 30 };
        assert_eq!(
            orient("Green", body, 22.0, &Moments::default()),
            TargetOutcome::DegenerateOrientationCentroid { body, body_radius: 22.0 }
        );
    }

    #[test]
    fn nose_left_of_body_points_along_x() {
        let nose = Moments {
            m00: 10.0,
            m10: 250.0,
            m01: 300.0,
        };
        let outcome = orient("Blue", Centroid { x: 40, y: 30 }, 22.0, &nose);
        let detection = outcome.detection().unwrap();
        assert_eq!(detection.label, "Blue");
        assert_eq!((detection.x, detection.y), (40, 30));
        assert_eq!(detection.heading_radians, 0.0);
    }

    #[test]
    fn outcome_accessors() {
        let detection = Detection {
            label: "Green".into(),
            x: 1,
            y: 2,
            heading_radians: 0.5,
        };
        let outcome = TargetOutcome::Detected(detection.clone());
        assert_eq!(outcome.detection(), Some(&detection));
        assert_eq!(outcome.into_detection(), Some(detection));
        assert_eq!(TargetOutcome::NoMaskPixels.detection(), None);
    }
}
