//! Pose and expression estimation from a selected candidate region.
//!
//! Angles are derived from screen-space offset, not true 3D geometry:
//! horizontal offset drives yaw (the larger range), vertical offset drives
//! pitch. Expression state is a coarse proxy over region statistics.

use crate::config::EstimatorConfig;
use crate::constants;
use crate::face_detection::CandidateRegion;

/// 2D point or offset in pixel coordinates
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

/// Per-eye openness estimate.
///
/// Both eyes always report identically: the region-level heuristic cannot
/// distinguish left from right. The two fields are kept so a per-side
/// heuristic would be a local change.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EyeState {
    pub left: bool,
    pub right: bool,
}

/// The externally visible per-frame artifact of the pipeline.
///
/// When `detected` is false every other field is zeroed/defaulted and must
/// be treated as "no signal" by consumers.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DetectionResult {
    /// Whether a face candidate survived selection this frame
    pub detected: bool,
    /// Heuristic score in [0, 1]
    pub confidence: f64,
    /// Pitch in degrees, clamped to ±30
    pub x_angle: f64,
    /// Yaw in degrees, clamped to ±45
    pub y_angle: f64,
    /// Pixel offset of the face centre from the frame centre
    pub position: Point,
    /// Absolute pixel coordinates of the face centre
    pub face_center: Point,
    /// `max(width, height)` of the surviving region
    pub face_size: f64,
    /// Mouth-open estimate from region elongation and texture variance
    pub mouth_open: bool,
    /// Eye-open estimates
    pub eyes_open: EyeState,
    /// Mean luminance of the surviving region
    pub brightness: f64,
    /// Luminance variance of the surviving region
    pub variance: f64,
}

impl DetectionResult {
    /// The "no signal" result for frames without a surviving candidate
    #[must_use]
    pub fn none() -> Self {
        Self::default()
    }

    /// Map the detection onto avatar rig parameters.
    ///
    /// Rotations are damped radians ready for a rendered head; eye and
    /// mouth scales match the reference avatar (closed eyes collapse to a
    /// sliver, an open mouth grows by half). `None` when nothing was
    /// detected, so a renderer holds its last pose instead of snapping to
    /// zero.
    #[must_use]
    pub fn avatar_pose(&self) -> Option<AvatarPose> {
        if !self.detected {
            return None;
        }
        Some(AvatarPose {
            rotation_x: -self.x_angle.to_radians() * constants::AVATAR_ROTATION_FACTOR,
            rotation_y: self.y_angle.to_radians() * constants::AVATAR_ROTATION_FACTOR,
            left_eye_scale: eye_scale(self.eyes_open.left),
            right_eye_scale: eye_scale(self.eyes_open.right),
            mouth_scale: if self.mouth_open {
                constants::AVATAR_OPEN_MOUTH_SCALE
            } else {
                1.0
            },
        })
    }
}

fn eye_scale(open: bool) -> f64 {
    if open {
        1.0
    } else {
        constants::AVATAR_CLOSED_EYE_SCALE
    }
}

/// Renderable avatar parameters derived from one detection
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AvatarPose {
    /// Head rotation about the horizontal axis, radians
    pub rotation_x: f64,
    /// Head rotation about the vertical axis, radians
    pub rotation_y: f64,
    pub left_eye_scale: f64,
    pub right_eye_scale: f64,
    pub mouth_scale: f64,
}

/// Converts a selected region and the frame dimensions into a
/// [`DetectionResult`]. Purely arithmetic; always succeeds given a valid
/// region.
pub struct PoseEstimator {
    config: EstimatorConfig,
}

impl Default for PoseEstimator {
    fn default() -> Self {
        Self::new(EstimatorConfig::default())
    }
}

impl PoseEstimator {
    /// Create an estimator with the given gains and thresholds
    #[must_use]
    pub fn new(config: EstimatorConfig) -> Self {
        Self { config }
    }

    /// Estimate pose and expression for the surviving region
    #[must_use]
    pub fn estimate(&self, region: &CandidateRegion, frame_width: usize, frame_height: usize) -> DetectionResult {
        let half_w = frame_width as f64 / 2.0;
        let half_h = frame_height as f64 / 2.0;

        // In [-1, 1] for centred regions; may exceed slightly for
        // partially-clipped windows
        let x_offset = (region.center_x - half_w) / half_w;
        let y_offset = (region.center_y - half_h) / half_h;

        let cfg = &self.config;
        let y_angle = (x_offset * cfg.yaw_gain).clamp(-cfg.yaw_limit, cfg.yaw_limit);
        let x_angle = (y_offset * cfg.pitch_gain).clamp(-cfg.pitch_limit, cfg.pitch_limit);

        let aspect_ratio = region.height / region.width;
        let mouth_open = region.variance > cfg.mouth_variance_threshold && aspect_ratio > cfg.mouth_aspect_threshold;

        let eye_open =
            region.mean_brightness > cfg.eye_brightness_threshold && region.variance > cfg.eye_variance_threshold;

        DetectionResult {
            detected: true,
            confidence: region.confidence,
            x_angle,
            y_angle,
            position: Point {
                x: region.center_x - half_w,
                y: region.center_y - half_h,
            },
            face_center: Point {
                x: region.center_x,
                y: region.center_y,
            },
            face_size: region.width.max(region.height),
            mouth_open,
            eyes_open: EyeState {
                left: eye_open,
                right: eye_open,
            },
            brightness: region.mean_brightness,
            variance: region.variance,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn region(cx: f64, cy: f64, width: f64, height: f64, mean: f64, variance: f64) -> CandidateRegion {
        CandidateRegion {
            center_x: cx,
            center_y: cy,
            width,
            height,
            area: width * height,
            confidence: 0.7,
            mean_brightness: mean,
            variance,
        }
    }

    #[test]
    fn test_centered_region_has_zero_angles() {
        let estimator = PoseEstimator::default();
        let result = estimator.estimate(&region(320.0, 240.0, 120.0, 150.0, 140.0, 900.0), 640, 480);
        assert!(result.detected);
        assert_eq!(result.x_angle, 0.0);
        assert_eq!(result.y_angle, 0.0);
        assert_eq!(result.position, Point { x: 0.0, y: 0.0 });
        assert_eq!(result.face_size, 150.0);
    }

    #[test]
    fn test_offset_drives_angles() {
        let estimator = PoseEstimator::default();
        // Centre at 3/4 of the width: x_offset = 0.5 -> yaw = 15
        let result = estimator.estimate(&region(480.0, 240.0, 120.0, 150.0, 140.0, 900.0), 640, 480);
        assert!((result.y_angle - 15.0).abs() < 1e-9);
        assert_eq!(result.x_angle, 0.0);
    }

    #[test]
    fn test_angles_clamped_for_out_of_frame_centres() {
        let estimator = PoseEstimator::default();
        // Centre far outside the frame: offsets well beyond 1
        let result = estimator.estimate(&region(1280.0, -480.0, 120.0, 150.0, 140.0, 900.0), 640, 480);
        assert_eq!(result.y_angle, 45.0);
        assert_eq!(result.x_angle, -30.0);

        let result = estimator.estimate(&region(-1280.0, 960.0, 120.0, 150.0, 140.0, 900.0), 640, 480);
        assert_eq!(result.y_angle, -45.0);
        assert_eq!(result.x_angle, 30.0);
    }

    #[test]
    fn test_mouth_requires_variance_and_elongation() {
        let estimator = PoseEstimator::default();
        // Elongated and textured: open
        let open = estimator.estimate(&region(320.0, 240.0, 100.0, 150.0, 140.0, 1300.0), 640, 480);
        assert!(open.mouth_open);
        // Textured but square: closed
        let square = estimator.estimate(&region(320.0, 240.0, 120.0, 120.0, 140.0, 1300.0), 640, 480);
        assert!(!square.mouth_open);
        // Elongated but flat: closed
        let flat = estimator.estimate(&region(320.0, 240.0, 100.0, 150.0, 140.0, 1100.0), 640, 480);
        assert!(!flat.mouth_open);
    }

    #[test]
    fn test_eyes_report_identically() {
        let estimator = PoseEstimator::default();
        let bright = estimator.estimate(&region(320.0, 240.0, 120.0, 150.0, 140.0, 900.0), 640, 480);
        assert_eq!(bright.eyes_open, EyeState { left: true, right: true });

        let dim = estimator.estimate(&region(320.0, 240.0, 120.0, 150.0, 85.0, 900.0), 640, 480);
        assert_eq!(dim.eyes_open, EyeState { left: false, right: false });
    }

    #[test]
    fn test_avatar_pose_mapping() {
        let estimator = PoseEstimator::default();
        let result = estimator.estimate(&region(480.0, 240.0, 120.0, 150.0, 140.0, 900.0), 640, 480);
        let pose = result.avatar_pose().unwrap();
        assert!((pose.rotation_y - 15.0_f64.to_radians() * 0.6).abs() < 1e-12);
        assert_eq!(pose.rotation_x, -0.0);
        assert_eq!(pose.left_eye_scale, 1.0);
        assert_eq!(pose.mouth_scale, 1.0);

        assert!(DetectionResult::none().avatar_pose().is_none());
    }
}
