//! Error types for frame ingestion and the parallel pipeline.
//!
//! Per-target misses (no mask pixels, no body, no nose) are not errors; they
//! are reported as `TargetOutcome` variants. Only contract violations at the
//! raw-buffer boundary and worker failures surface here.

use thiserror::Error;

/// Errors raised when a raw buffer cannot be turned into a frame.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FrameError {
    /// One of the dimensions is zero.
    #[error("empty frame: {width}x{height}")]
    EmptyFrame {
        /// Declared width in pixels.
        width: u32,
        /// Declared height in pixels.
        height: u32,
    },

    /// Buffer length does not match `width * height * channels`.
    #[error("buffer size mismatch: expected {expected}, got {actual}")]
    BufferSizeMismatch {
        /// Expected buffer length in bytes.
        expected: usize,
        /// Actual buffer length in bytes.
        actual: usize,
    },
}

impl FrameError {
    /// Creates a buffer size mismatch error.
    #[must_use]
    pub const fn buffer_mismatch(expected: usize, actual: usize) -> Self {
        Self::BufferSizeMismatch { expected, actual }
    }

    /// Creates an empty frame error.
    #[must_use]
    pub const fn empty(width: u32, height: u32) -> Self {
        Self::EmptyFrame { width, height }
    }
}

/// Errors raised by `ParallelPipeline`.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// A per-target worker panicked or was cancelled.
    #[error("target worker failed: {0}")]
    Worker(#[from] tokio::task::JoinError),

    /// The pipeline was shut down before the frame could be scheduled.
    #[error("worker pool closed")]
    PoolClosed,

    /// The input frame was rejected.
    #[error(transparent)]
    Frame(#[from] FrameError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn buffer_mismatch_display() {
        let err = FrameError::buffer_mismatch(1200, 1199);
        let msg = format!("{err}");
        assert!(msg.contains("1200"));
        assert!(msg.contains("1199"));
    }

    #[test]
    fn empty_frame_display() {
        let msg = format!("{}", FrameError::empty(0, 480));
        assert!(msg.contains("0x480"));
    }

    #[test]
    fn frame_error_converts_into_pipeline_error() {
        let err: PipelineError = FrameError::empty(640, 0).into();
        assert!(matches!(err, PipelineError::Frame(FrameError::EmptyFrame { .. })));
        assert!(format!("{err}").contains("640x0"));
    }
}
