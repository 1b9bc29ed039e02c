//! Constants used throughout the application

/// Probe grid stride in pixels, both axes
pub const PROBE_STRIDE: usize = 10;

/// Margin kept clear of every frame edge before probing starts
pub const PROBE_MARGIN: usize = 20;

/// Candidate window width cap in pixels (actual width is `min(cap, W/3)`)
pub const MAX_WINDOW_WIDTH: f64 = 120.0;

/// Candidate window height cap in pixels (actual height is `min(cap, H/3)`)
pub const MAX_WINDOW_HEIGHT: f64 = 150.0;

/// Acceptable mean-luminance band for a face window (exclusive bounds)
pub const MIN_BRIGHTNESS: f64 = 80.0;
pub const MAX_BRIGHTNESS: f64 = 200.0;

/// Acceptable luminance-variance band for a face window (exclusive bounds)
pub const MIN_VARIANCE: f64 = 400.0;
pub const MAX_VARIANCE: f64 = 3000.0;

/// Minimum candidate window dimensions in pixels
pub const MIN_WINDOW_WIDTH: f64 = 40.0;
pub const MIN_WINDOW_HEIGHT: f64 = 50.0;

/// Dedup neighbourhood half-extent around an accepted probe, and the stride
/// at which that neighbourhood is marked visited
pub const DEDUP_RADIUS: i64 = 20;
pub const DEDUP_STRIDE: i64 = 5;

/// Normalizers for the heuristic confidence score
pub const CONFIDENCE_VARIANCE_SCALE: f64 = 1000.0;
pub const CONFIDENCE_BRIGHTNESS_SCALE: f64 = 150.0;

/// Screen-offset-to-angle gains, in degrees per unit offset
pub const YAW_GAIN: f64 = 30.0;
pub const PITCH_GAIN: f64 = 25.0;

/// Angle clamps, in degrees
pub const YAW_LIMIT: f64 = 45.0;
pub const PITCH_LIMIT: f64 = 30.0;

/// Mouth-open heuristic thresholds (texture variance and region elongation)
pub const MOUTH_VARIANCE_THRESHOLD: f64 = 1200.0;
pub const MOUTH_ASPECT_THRESHOLD: f64 = 1.4;

/// Eyes-open heuristic thresholds
pub const EYE_BRIGHTNESS_THRESHOLD: f64 = 90.0;
pub const EYE_VARIANCE_THRESHOLD: f64 = 500.0;

/// Smoothing weight given to the previous pose
pub const SMOOTHING_ALPHA: f64 = 0.7;

/// Bounded detection history length
pub const HISTORY_CAPACITY: usize = 3;

/// Scheduler cadence when idle (~30 Hz) and retry delay when a pass is
/// already in flight
pub const FRAME_INTERVAL_MS: u64 = 33;
pub const BUSY_RETRY_MS: u64 = 50;

/// Avatar mapping: degrees-to-radians rotation damping used by the renderer
pub const AVATAR_ROTATION_FACTOR: f64 = 0.6;

/// Avatar mapping: scale applied to a closed eye and to an open mouth
pub const AVATAR_CLOSED_EYE_SCALE: f64 = 0.1;
pub const AVATAR_OPEN_MOUTH_SCALE: f64 = 1.5;
