use std::env;

use anyhow::{bail, Context, Result};
use herd_vision::pipeline::{MarkerPipeline, PipelineConfig};
use tracing::info;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    // --- 1. Argument Parsing ---
    let paths: Vec<String> = env::args().skip(1).collect();
    if paths.is_empty() {
        bail!("usage: herd_vision <image>...");
    }

    // --- 2. Pipeline Initialization ---
    let pipeline = MarkerPipeline::with_default_catalog(PipelineConfig::default());

    // --- 3. Replay Loop ---
    for path in &paths {
        let frame = image::open(path)
            .with_context(|| format!("failed to decode {path}"))?
            .to_rgb8();
        let analysis = pipeline.analyze(&frame);
        info!(
            path = %path,
            elapsed_ms = analysis.elapsed.as_secs_f64() * 1000.0,
            "frame processed"
        );
        for detection in analysis.detections() {
            println!(
                "{} {} {} {:.4}",
                detection.label, detection.x, detection.y, detection.heading_radians
            );
        }
    }

    Ok(())
}
