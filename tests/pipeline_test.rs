//! Integration tests for the frame-to-detection pipeline

use face_tracker::config::Config;
use face_tracker::pipeline::{DetectionPipeline, FrameProcessor, RgbaFrame};
use face_tracker::scheduler::{DetectionSession, TickOutcome};
use std::sync::Arc;

/// Flat background frame with a checkerboard patch. The 110/170 checker has
/// mean 140 and population variance 900, inside every acceptance band.
fn patch_frame(size: usize, x0: usize, y0: usize, patch_w: usize, patch_h: usize) -> RgbaFrame {
    let mut data = vec![140u8; size * size * 4];
    for px in data.iter_mut().skip(3).step_by(4) {
        *px = 255;
    }
    for y in y0..y0 + patch_h {
        for x in x0..x0 + patch_w {
            let value = if (x + y) % 2 == 0 { 110 } else { 170 };
            let offset = (y * size + x) * 4;
            data[offset] = value;
            data[offset + 1] = value;
            data[offset + 2] = value;
        }
    }
    RgbaFrame {
        data,
        width: size,
        height: size,
    }
}

fn uniform_frame(size: usize, value: u8) -> RgbaFrame {
    let mut data = vec![value; size * size * 4];
    for px in data.iter_mut().skip(3).step_by(4) {
        *px = 255;
    }
    RgbaFrame {
        data,
        width: size,
        height: size,
    }
}

#[test]
fn test_synthetic_face_is_detected_with_expected_size() {
    let pipeline = DetectionPipeline::new(&Config::default());
    // 100x120 patch centred in a 360x360 frame; candidate windows on this
    // frame are min(120, 360/3) = 120 square
    let frame = patch_frame(360, 130, 120, 100, 120);

    let result = pipeline.process(&frame).unwrap();
    assert!(result.detected);
    assert_eq!(result.face_size, 120.0);
    assert!(result.confidence > 0.0 && result.confidence <= 1.0);
    assert_eq!(result.eyes_open.left, result.eyes_open.right);
    assert!(!result.mouth_open, "square window never passes the elongation test");

    // Position is the centre offset from the frame centre
    assert_eq!(result.position.x, result.face_center.x - 180.0);
    assert_eq!(result.position.y, result.face_center.y - 180.0);
}

#[test]
fn test_uniform_extremes_are_non_detections() {
    let pipeline = DetectionPipeline::new(&Config::default());
    for value in [0u8, 255u8] {
        let result = pipeline.process(&uniform_frame(400, value)).unwrap();
        assert!(!result.detected, "uniform {value} frame must not detect");
        assert_eq!(result.confidence, 0.0);
    }
}

#[test]
fn test_pipeline_is_deterministic() {
    let pipeline = DetectionPipeline::new(&Config::default());
    let frame = patch_frame(360, 130, 120, 100, 120);

    let first = pipeline.process(&frame).unwrap();
    let second = pipeline.process(&frame).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_session_smooths_between_positions() {
    let config = Config::default();
    let session = DetectionSession::new(Box::new(DetectionPipeline::new(&config)), &config.smoothing);

    let left = patch_frame(360, 80, 120, 100, 120);
    let right = patch_frame(360, 180, 120, 100, 120);

    let TickOutcome::Processed(first) = session.run_once(&left) else {
        panic!("unexpected busy outcome");
    };
    assert!(first.detected);

    let TickOutcome::Processed(second) = session.run_once(&right) else {
        panic!("unexpected busy outcome");
    };
    assert!(second.detected);

    // The smoothed yaw sits strictly between the first pose and what the
    // second frame alone would have produced
    let unsmoothed = DetectionPipeline::new(&config).process(&right).unwrap();
    assert!(unsmoothed.y_angle > first.y_angle);
    assert!(second.y_angle > first.y_angle);
    assert!(second.y_angle < unsmoothed.y_angle);
}

#[test]
fn test_session_history_is_bounded() {
    let config = Config::default();
    let session = Arc::new(DetectionSession::new(
        Box::new(DetectionPipeline::new(&config)),
        &config.smoothing,
    ));

    let frame = patch_frame(360, 130, 120, 100, 120);
    for _ in 0..5 {
        match session.run_once(&frame) {
            TickOutcome::Processed(result) => assert!(result.detected),
            TickOutcome::Busy => panic!("sequential runs can never be busy"),
        }
    }
    assert_eq!(session.history_len(), 3);
}

#[test]
fn test_gap_retains_previous_pose_by_default() {
    let config = Config::default();
    let session = DetectionSession::new(Box::new(DetectionPipeline::new(&config)), &config.smoothing);

    let face = patch_frame(360, 130, 120, 100, 120);
    let blank = uniform_frame(360, 140);

    let TickOutcome::Processed(first) = session.run_once(&face) else {
        panic!("unexpected busy outcome");
    };
    assert!(first.detected);

    for _ in 0..3 {
        let TickOutcome::Processed(missed) = session.run_once(&blank) else {
            panic!("unexpected busy outcome");
        };
        assert!(!missed.detected);
    }
    assert!(session.has_previous(), "default policy bridges gaps indefinitely");
}
