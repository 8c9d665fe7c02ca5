// THEORY:
// This file is the main entry point for the `herd_vision` library crate.
// It exposes the `MarkerPipeline` and its associated data structures
// (`PipelineConfig`, `Detection`, `TargetOutcome`, ...) as the high-level
// interface: hand it a frame, get back one position and heading per colored
// marker it could find.
//
// The stages themselves live in `core_modules` and stay public so that hosts
// can drive individual steps (segmentation, region tracing) when debugging a
// camera setup.

pub mod core_modules;
pub mod error;
pub mod parallel_pipeline;
pub mod pipeline;

pub use core_modules::catalog::{default_catalog, MarkerColor, TargetDefinition};
pub use error::{FrameError, PipelineError};
pub use parallel_pipeline::ParallelPipeline;
pub use pipeline::{detect, Detection, FrameAnalysis, FrameResult, MarkerPipeline, PipelineConfig, TargetOutcome};
