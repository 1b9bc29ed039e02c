//! Face tracking demo runner.
//!
//! The core consumes frames it does not capture, so the binary stands in a
//! synthetic source: a textured patch wandering over a flat background,
//! processed at the scheduler cadence with results logged. Useful for
//! eyeballing the pipeline and tuning heuristics without a camera.

use anyhow::{Context, Result};
use clap::Parser;
use face_tracker::config::Config;
use face_tracker::pipeline::{DetectionPipeline, RgbaFrame};
use face_tracker::scheduler::{DetectionSession, DetectionSink, FrameScheduler, FrameSource};
use log::{debug, info};
use std::sync::Arc;
use std::time::Duration;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to configuration file (YAML format)
    #[arg(short = 'C', long)]
    config: Option<String>,

    /// Synthetic frame width
    #[arg(long, default_value = "640")]
    width: usize,

    /// Synthetic frame height
    #[arg(long, default_value = "480")]
    height: usize,

    /// How long to run the demo, in seconds
    #[arg(long, default_value = "5")]
    duration_secs: u64,

    /// Print an example configuration file and exit
    #[arg(long)]
    print_example_config: bool,

    /// Enable debug output
    #[arg(short, long)]
    debug: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    if args.debug {
        env_logger::init_from_env(env_logger::Env::new().default_filter_or("debug"));
    } else {
        env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));
    }

    if args.print_example_config {
        print!("{}", face_tracker::config::EXAMPLE_CONFIG);
        return Ok(());
    }

    info!("Face Tracker - synthetic demo");

    let config = if let Some(config_path) = &args.config {
        info!("Loading configuration from: {config_path}");
        Config::from_file(config_path).with_context(|| format!("failed to load config {config_path}"))?
    } else {
        Config::default()
    };
    config.validate().context("invalid configuration")?;

    let session = Arc::new(DetectionSession::new(
        Box::new(DetectionPipeline::new(&config)),
        &config.smoothing,
    ));

    let source = SyntheticSource::new(args.width, args.height);
    let mut scheduler = FrameScheduler::new(Arc::clone(&session), Box::new(source), &config.scheduler);
    scheduler.add_sink(Box::new(LogSink::default()));

    let handle = scheduler.handle();
    let worker = std::thread::spawn(move || scheduler.run());

    std::thread::sleep(Duration::from_secs(args.duration_secs));
    handle.stop();
    worker
        .join()
        .map_err(|_| anyhow::anyhow!("scheduler thread panicked"))?;

    info!("demo finished");
    Ok(())
}

/// Frame source producing a face-like checkerboard patch drifting over a
/// flat background.
struct SyntheticSource {
    width: usize,
    height: usize,
    frame_index: u64,
}

impl SyntheticSource {
    fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            frame_index: 0,
        }
    }
}

impl FrameSource for SyntheticSource {
    fn next_frame(&mut self) -> Option<RgbaFrame> {
        let t = self.frame_index as f64 * 0.05;
        self.frame_index += 1;

        let (w, h) = (self.width, self.height);
        let patch_w = 100usize;
        let patch_h = 120usize;

        // Patch centre orbits the frame centre at a quarter of each span
        let cx = (w as f64 / 2.0 + (w as f64 / 4.0) * t.cos()) as usize;
        let cy = (h as f64 / 2.0 + (h as f64 / 4.0) * t.sin()) as usize;
        let x0 = cx.saturating_sub(patch_w / 2).min(w.saturating_sub(patch_w));
        let y0 = cy.saturating_sub(patch_h / 2).min(h.saturating_sub(patch_h));

        let mut data = vec![140u8; w * h * 4];
        for px in data.iter_mut().skip(3).step_by(4) {
            *px = 255;
        }
        for y in y0..(y0 + patch_h).min(h) {
            for x in x0..(x0 + patch_w).min(w) {
                // 110/170 checker: mean 140, variance 900
                let value = if (x + y) % 2 == 0 { 110 } else { 170 };
                let offset = (y * w + x) * 4;
                data[offset] = value;
                data[offset + 1] = value;
                data[offset + 2] = value;
            }
        }

        Some(RgbaFrame { data, width: w, height: h })
    }
}

/// Sink logging each emitted result
#[derive(Default)]
struct LogSink {
    frames: u64,
}

impl DetectionSink for LogSink {
    fn publish(&mut self, result: &face_tracker::pose_estimation::DetectionResult) {
        self.frames += 1;
        if result.detected {
            info!(
                "frame {}: pitch {:+.1} yaw {:+.1} conf {:.2} mouth {} size {:.0}",
                self.frames, result.x_angle, result.y_angle, result.confidence, result.mouth_open, result.face_size
            );
        } else {
            debug!("frame {}: no face", self.frames);
        }
    }
}
