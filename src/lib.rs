//! Heuristic face tracking core for avatar rendering.
//!
//! This library ingests raw RGBA frames, finds the most prominent face-like
//! region with a lightweight brightness/contrast heuristic (no trained
//! model, no computer-vision library), estimates head pose and a coarse
//! expression state, smooths the signal over time, and emits one
//! [`pose_estimation::DetectionResult`] per frame for a rendering consumer.
//!
//! The pipeline runs once per captured frame:
//! 1. Grayscale reduction of the RGBA buffer
//! 2. Sliding-window region scan with probe deduplication
//! 3. Selection of the largest candidate region
//! 4. Pose and expression estimation from region position and statistics
//! 5. Exponential temporal smoothing with a bounded history
//!
//! Frame capture and avatar rendering are external collaborators: the core
//! consumes buffers it did not capture and emits records it does not draw.
//!
//! # Examples
//!
//! ## Processing a single frame
//!
//! ```
//! use face_tracker::config::Config;
//! use face_tracker::pipeline::{DetectionPipeline, FrameProcessor, RgbaFrame};
//!
//! # fn main() -> face_tracker::Result<()> {
//! let pipeline = DetectionPipeline::new(&Config::default());
//!
//! // A flat gray frame: no face-like contrast anywhere
//! let frame = RgbaFrame {
//!     data: vec![128; 320 * 240 * 4],
//!     width: 320,
//!     height: 240,
//! };
//!
//! let result = pipeline.process(&frame)?;
//! assert!(!result.detected);
//! # Ok(())
//! # }
//! ```
//!
//! ## Smoothing a detection stream
//!
//! ```
//! use face_tracker::config::SmoothingConfig;
//! use face_tracker::pose_estimation::DetectionResult;
//! use face_tracker::smoothing::{PoseSmoother, SmoothingState};
//!
//! let smoother = PoseSmoother::new(&SmoothingConfig::default());
//! let mut state = SmoothingState::new();
//!
//! let mut detection = DetectionResult::none();
//! detection.detected = true;
//! detection.y_angle = 12.0;
//!
//! // The first positive detection passes through unsmoothed
//! let first = smoother.apply(detection.clone(), &mut state);
//! assert_eq!(first.y_angle, 12.0);
//!
//! // Later detections blend toward the previous pose
//! detection.y_angle = 0.0;
//! let second = smoother.apply(detection, &mut state);
//! assert!((second.y_angle - 8.4).abs() < 1e-9);
//! ```
//!
//! ## Driving the scheduler
//!
//! ```
//! use std::sync::Arc;
//! use face_tracker::config::Config;
//! use face_tracker::pipeline::{DetectionPipeline, RgbaFrame};
//! use face_tracker::scheduler::{DetectionSession, FrameScheduler, FrameSource};
//!
//! struct OneFrame(Option<RgbaFrame>);
//!
//! impl FrameSource for OneFrame {
//!     fn next_frame(&mut self) -> Option<RgbaFrame> {
//!         self.0.take()
//!     }
//! }
//!
//! let config = Config::default();
//! let session = Arc::new(DetectionSession::new(
//!     Box::new(DetectionPipeline::new(&config)),
//!     &config.smoothing,
//! ));
//!
//! let source = OneFrame(Some(RgbaFrame {
//!     data: vec![128; 64 * 64 * 4],
//!     width: 64,
//!     height: 64,
//! }));
//!
//! let mut scheduler = FrameScheduler::new(Arc::clone(&session), Box::new(source), &config.scheduler);
//! let handle = scheduler.handle();
//! handle.stop(); // stop immediately; a real consumer runs this on a thread
//! scheduler.run();
//! ```

/// Grayscale reduction from RGBA pixel buffers
pub mod grayscale;

/// Heuristic face-candidate detection and selection
pub mod face_detection;

/// Pose and expression estimation from the selected region
pub mod pose_estimation;

/// Temporal smoothing of the detection stream
pub mod smoothing;

/// Per-frame pipeline composition
pub mod pipeline;

/// Frame scheduling, session state and result delivery
pub mod scheduler;

/// Error types and result handling
pub mod error;

/// Constants used throughout the application
pub mod constants;

/// Configuration management
pub mod config;

pub use error::{Error, Result};
