//! Configuration management for the face tracking pipeline

use crate::constants;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Region scanner configuration
    pub scanner: ScannerConfig,

    /// Pose and expression estimator configuration
    pub estimator: EstimatorConfig,

    /// Temporal smoothing configuration
    pub smoothing: SmoothingConfig,

    /// Frame scheduler configuration
    pub scheduler: SchedulerConfig,
}

/// Region scanner parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScannerConfig {
    /// Probe grid stride in pixels
    pub probe_stride: usize,

    /// Margin kept clear of every frame edge
    pub probe_margin: usize,

    /// Candidate window width cap (actual width is `min(cap, W/3)`)
    pub max_window_width: f64,

    /// Candidate window height cap (actual height is `min(cap, H/3)`)
    pub max_window_height: f64,

    /// Mean-luminance acceptance band, exclusive bounds
    pub min_brightness: f64,
    pub max_brightness: f64,

    /// Variance acceptance band, exclusive bounds
    pub min_variance: f64,
    pub max_variance: f64,

    /// Minimum candidate window dimensions
    pub min_window_width: f64,
    pub min_window_height: f64,

    /// Minimum confidence for a window to count as a candidate.
    /// 0.0 accepts every window passing the brightness/variance/size
    /// heuristics; the original tracker used 0.3.
    pub min_confidence: f64,
}

/// Pose and expression estimator parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EstimatorConfig {
    /// Degrees of yaw per unit of horizontal screen offset
    pub yaw_gain: f64,

    /// Yaw clamp in degrees
    pub yaw_limit: f64,

    /// Degrees of pitch per unit of vertical screen offset
    pub pitch_gain: f64,

    /// Pitch clamp in degrees
    pub pitch_limit: f64,

    /// Variance above which the mouth may be considered open
    pub mouth_variance_threshold: f64,

    /// Height/width elongation above which the mouth may be considered open
    pub mouth_aspect_threshold: f64,

    /// Mean luminance above which the eyes may be considered open
    pub eye_brightness_threshold: f64,

    /// Variance above which the eyes may be considered open
    pub eye_variance_threshold: f64,
}

/// Temporal smoothing parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SmoothingConfig {
    /// Weight given to the previous pose, in [0, 1)
    pub alpha: f64,

    /// Bounded history length
    pub history_capacity: usize,

    /// Number of consecutive non-detection frames after which the retained
    /// previous pose is considered stale and dropped. `None` retains it
    /// indefinitely, bridging occlusions of any length.
    pub max_gap_frames: Option<u64>,
}

/// Frame scheduler parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SchedulerConfig {
    /// Tick interval when idle, in milliseconds (~33 for 30 Hz)
    pub frame_interval_ms: u64,

    /// Retry delay when a pass is already in flight, in milliseconds
    pub busy_retry_ms: u64,
}

impl Default for ScannerConfig {
    fn default() -> Self {
        Self {
            probe_stride: constants::PROBE_STRIDE,
            probe_margin: constants::PROBE_MARGIN,
            max_window_width: constants::MAX_WINDOW_WIDTH,
            max_window_height: constants::MAX_WINDOW_HEIGHT,
            min_brightness: constants::MIN_BRIGHTNESS,
            max_brightness: constants::MAX_BRIGHTNESS,
            min_variance: constants::MIN_VARIANCE,
            max_variance: constants::MAX_VARIANCE,
            min_window_width: constants::MIN_WINDOW_WIDTH,
            min_window_height: constants::MIN_WINDOW_HEIGHT,
            min_confidence: 0.0,
        }
    }
}

impl Default for EstimatorConfig {
    fn default() -> Self {
        Self {
            yaw_gain: constants::YAW_GAIN,
            yaw_limit: constants::YAW_LIMIT,
            pitch_gain: constants::PITCH_GAIN,
            pitch_limit: constants::PITCH_LIMIT,
            mouth_variance_threshold: constants::MOUTH_VARIANCE_THRESHOLD,
            mouth_aspect_threshold: constants::MOUTH_ASPECT_THRESHOLD,
            eye_brightness_threshold: constants::EYE_BRIGHTNESS_THRESHOLD,
            eye_variance_threshold: constants::EYE_VARIANCE_THRESHOLD,
        }
    }
}

impl Default for SmoothingConfig {
    fn default() -> Self {
        Self {
            alpha: constants::SMOOTHING_ALPHA,
            history_capacity: constants::HISTORY_CAPACITY,
            max_gap_frames: None,
        }
    }
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            frame_interval_ms: constants::FRAME_INTERVAL_MS,
            busy_retry_ms: constants::BUSY_RETRY_MS,
        }
    }
}

impl Config {
    /// Load configuration from a YAML file
    ///
    /// # Errors
    ///
    /// Returns `Error::Io` if the file cannot be read and
    /// `Error::ConfigError` if it cannot be parsed.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;

        serde_yaml::from_str(&content).map_err(|e| Error::ConfigError(format!("Failed to parse config: {e}")))
    }

    /// Save configuration to a YAML file
    ///
    /// # Errors
    ///
    /// Returns `Error::ConfigError` on serialization failure and
    /// `Error::Io` if the file cannot be written.
    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content =
            serde_yaml::to_string(self).map_err(|e| Error::ConfigError(format!("Failed to serialize config: {e}")))?;

        std::fs::write(path, content)?;

        Ok(())
    }

    /// Validate configuration
    ///
    /// # Errors
    ///
    /// Returns `Error::ConfigError` describing the first parameter found out
    /// of range.
    pub fn validate(&self) -> Result<()> {
        if self.scanner.probe_stride == 0 {
            return Err(Error::ConfigError("Probe stride must be greater than 0".to_string()));
        }
        if self.scanner.min_brightness >= self.scanner.max_brightness {
            return Err(Error::ConfigError(
                "Brightness band must satisfy min < max".to_string(),
            ));
        }
        if self.scanner.min_variance >= self.scanner.max_variance {
            return Err(Error::ConfigError("Variance band must satisfy min < max".to_string()));
        }
        if !(0.0..=1.0).contains(&self.scanner.min_confidence) {
            return Err(Error::ConfigError(
                "Minimum confidence must be between 0.0 and 1.0".to_string(),
            ));
        }
        if self.scanner.max_window_width <= 0.0 || self.scanner.max_window_height <= 0.0 {
            return Err(Error::ConfigError(
                "Window size caps must be greater than 0".to_string(),
            ));
        }

        if self.estimator.yaw_limit <= 0.0 || self.estimator.pitch_limit <= 0.0 {
            return Err(Error::ConfigError("Angle limits must be greater than 0".to_string()));
        }

        if !(0.0..1.0).contains(&self.smoothing.alpha) {
            return Err(Error::ConfigError(
                "Smoothing alpha must be in [0.0, 1.0)".to_string(),
            ));
        }
        if self.smoothing.history_capacity == 0 {
            return Err(Error::ConfigError(
                "History capacity must be greater than 0".to_string(),
            ));
        }

        if self.scheduler.frame_interval_ms == 0 {
            return Err(Error::ConfigError(
                "Frame interval must be greater than 0 ms".to_string(),
            ));
        }
        if self.scheduler.busy_retry_ms == 0 {
            return Err(Error::ConfigError(
                "Busy retry delay must be greater than 0 ms".to_string(),
            ));
        }

        Ok(())
    }
}

/// Example configuration file content
pub const EXAMPLE_CONFIG: &str = r"# Face Tracker Configuration

# Region scanner heuristics
scanner:
  probe_stride: 10
  probe_margin: 20
  max_window_width: 120.0
  max_window_height: 150.0
  min_brightness: 80.0
  max_brightness: 200.0
  min_variance: 400.0
  max_variance: 3000.0
  min_window_width: 40.0
  min_window_height: 50.0
  min_confidence: 0.0

# Screen-offset to angle mapping and expression thresholds
estimator:
  yaw_gain: 30.0
  yaw_limit: 45.0
  pitch_gain: 25.0
  pitch_limit: 30.0
  mouth_variance_threshold: 1200.0
  mouth_aspect_threshold: 1.4
  eye_brightness_threshold: 90.0
  eye_variance_threshold: 500.0

# Temporal smoothing
smoothing:
  alpha: 0.7
  history_capacity: 3
  max_gap_frames: null

# Frame cadence
scheduler:
  frame_interval_ms: 33
  busy_retry_ms: 50
";
