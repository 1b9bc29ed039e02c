//! Per-frame detection pipeline.
//!
//! Composes the grayscale reducer, region scanner, candidate selector and
//! pose estimator into one sequential pass: pixel buffer → luminance →
//! candidates → selected region → raw pose estimate. Smoothing and cadence
//! live in the scheduler; data flows strictly forward.

use crate::config::Config;
use crate::face_detection::{select_largest, FaceScanner};
use crate::grayscale::rgba_to_luminance;
use crate::pose_estimation::{DetectionResult, PoseEstimator};
use crate::{Error, Result};

/// One captured frame as supplied by a frame source
#[derive(Debug, Clone)]
pub struct RgbaFrame {
    /// Interleaved RGBA bytes, row-major, length `width * height * 4`
    pub data: Vec<u8>,
    pub width: usize,
    pub height: usize,
}

impl RgbaFrame {
    /// Whether the frame has renderable dimensions
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

/// A per-frame processing stage the scheduler can drive.
///
/// The seam exists so the scheduler's single-flight discipline can be
/// exercised with an artificial slow stage in tests.
pub trait FrameProcessor: Send + Sync {
    /// Process one frame into a raw (unsmoothed) detection result
    ///
    /// # Errors
    ///
    /// Implementations report precondition violations (malformed buffers)
    /// as errors; the scheduler contains them. Absence of a face is a
    /// normal `detected = false` result, never an error.
    fn process(&self, frame: &RgbaFrame) -> Result<DetectionResult>;
}

/// The heuristic face detection pipeline
pub struct DetectionPipeline {
    scanner: FaceScanner,
    estimator: PoseEstimator,
}

impl Default for DetectionPipeline {
    fn default() -> Self {
        Self::new(&Config::default())
    }
}

impl DetectionPipeline {
    /// Build the pipeline from configuration
    #[must_use]
    pub fn new(config: &Config) -> Self {
        Self {
            scanner: FaceScanner::new(config.scanner.clone()),
            estimator: PoseEstimator::new(config.estimator.clone()),
        }
    }
}

impl FrameProcessor for DetectionPipeline {
    fn process(&self, frame: &RgbaFrame) -> Result<DetectionResult> {
        if frame.is_empty() {
            return Err(Error::InvalidInput(format!(
                "frame has zero dimension: {}x{}",
                frame.width, frame.height
            )));
        }

        let gray = rgba_to_luminance(&frame.data, frame.width, frame.height)?;
        let candidates = self.scanner.scan(&gray);

        Ok(match select_largest(candidates) {
            Some(region) => self.estimator.estimate(&region, frame.width, frame.height),
            None => DetectionResult::none(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn uniform_frame(width: usize, height: usize, value: u8) -> RgbaFrame {
        let mut data = Vec::with_capacity(width * height * 4);
        for _ in 0..width * height {
            data.extend_from_slice(&[value, value, value, 255]);
        }
        RgbaFrame { data, width, height }
    }

    #[test]
    fn test_uniform_frame_is_a_non_detection() {
        let pipeline = DetectionPipeline::default();
        let result = pipeline.process(&uniform_frame(640, 480, 140)).unwrap();
        assert!(!result.detected);
        assert_eq!(result.confidence, 0.0);
    }

    #[test]
    fn test_malformed_buffer_is_an_error() {
        let pipeline = DetectionPipeline::default();
        let frame = RgbaFrame {
            data: vec![0; 16],
            width: 640,
            height: 480,
        };
        assert!(pipeline.process(&frame).is_err());
    }

    #[test]
    fn test_zero_dimension_frame_is_an_error() {
        let pipeline = DetectionPipeline::default();
        let frame = RgbaFrame {
            data: Vec::new(),
            width: 0,
            height: 480,
        };
        assert!(pipeline.process(&frame).is_err());
    }

    #[test]
    fn test_tiny_frame_is_a_non_detection() {
        let pipeline = DetectionPipeline::default();
        let result = pipeline.process(&uniform_frame(39, 39, 140)).unwrap();
        assert!(!result.detected);
    }
}
