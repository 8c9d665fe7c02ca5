// THEORY:
// `ParallelPipeline` runs the same per-target state machine as `MarkerPipeline`
// but fans the catalog out over tokio's blocking pool: the frame is
// preprocessed once, then each target gets its own `spawn_blocking` task.
// Targets share nothing but the read-only working frame, so there is no
// locking beyond the semaphore that caps how many run at once.
//
// Results are joined in catalog order, which keeps the output identical to the
// sequential pipeline no matter how the workers are scheduled.

use std::sync::Arc;
use std::time::Instant;

use futures::future::join_all;
use image::RgbImage;
use tokio::sync::Semaphore;
use tracing::{debug, warn};

use crate::core_modules::catalog::{default_catalog, TargetDefinition};
use crate::core_modules::frame::{frame_from_rgba, preprocess, HsvFrame};
use crate::error::PipelineError;
use crate::pipeline::{detect_target, FrameAnalysis, FrameResult, PipelineConfig, TargetReport};

pub struct ParallelPipeline {
    config: Arc<PipelineConfig>,
    catalog: Arc<Vec<TargetDefinition>>,
    permits: Arc<Semaphore>,
    worker_limit: usize,
}

impl ParallelPipeline {
    /// One worker per logical CPU.
    pub fn new(config: PipelineConfig, catalog: Vec<TargetDefinition>) -> Self {
        Self::with_worker_limit(config, catalog, num_cpus::get())
    }

    pub fn with_default_catalog(config: PipelineConfig) -> Self {
        Self::new(config, default_catalog())
    }

    /// Caps the number of targets processed concurrently. Zero is treated as one.
    pub fn with_worker_limit(config: PipelineConfig, catalog: Vec<TargetDefinition>, worker_limit: usize) -> Self {
        let worker_limit = worker_limit.max(1);
        Self {
            config: Arc::new(config),
            catalog: Arc::new(catalog),
            permits: Arc::new(Semaphore::new(worker_limit)),
            worker_limit,
        }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    pub fn worker_limit(&self) -> usize {
        self.worker_limit
    }

    /// Stops accepting frames. Later calls fail with `PipelineError::PoolClosed`;
    /// targets already running finish normally.
    pub fn shutdown(&self) {
        self.permits.close();
    }

    pub fn is_shut_down(&self) -> bool {
        self.permits.is_closed()
    }

    pub async fn detect(&self, frame: &RgbImage) -> Result<FrameResult, PipelineError> {
        Ok(self.analyze(frame).await?.into_detections())
    }

    pub async fn detect_buffer(&self, width: u32, height: u32, rgba: &[u8]) -> Result<FrameResult, PipelineError> {
        let frame = frame_from_rgba(width, height, rgba)?;
        self.detect(&frame).await
    }

    pub async fn analyze(&self, frame: &RgbImage) -> Result<FrameAnalysis, PipelineError> {
        let start = Instant::now();
        let (width, height) = frame.dimensions();
        if width == 0 || height == 0 {
            warn!(width, height, "rejecting empty frame");
            return Ok(FrameAnalysis {
                targets: Vec::new(),
                elapsed: start.elapsed(),
            });
        }

        if self.is_shut_down() {
            return Err(PipelineError::PoolClosed);
        }

        let owned = frame.clone();
        let config = Arc::clone(&self.config);
        let working: Arc<HsvFrame> = Arc::new(tokio::task::spawn_blocking(move || preprocess(&owned, &config)).await?);

        let mut handles = Vec::with_capacity(self.catalog.len());
        for index in 0..self.catalog.len() {
            let permit = Arc::clone(&self.permits)
                .acquire_owned()
                .await
                .map_err(|_| PipelineError::PoolClosed)?;
            let working = Arc::clone(&working);
            let config = Arc::clone(&self.config);
            let catalog = Arc::clone(&self.catalog);
            handles.push(tokio::task::spawn_blocking(move || {
                let _permit = permit;
                let target = &catalog[index];
                TargetReport {
                    label: target.label.clone(),
                    outcome: detect_target(&working, target, &config),
                }
            }));
        }

        let targets = join_all(handles)
            .await
            .into_iter()
            .collect::<Result<Vec<TargetReport>, _>>()?;

        let elapsed = start.elapsed();
        debug!(
            elapsed_ms = elapsed.as_secs_f64() * 1000.0,
            workers = self.worker_limit,
            "frame analyzed in parallel"
        );
        Ok(FrameAnalysis { targets, elapsed })
    }
}
