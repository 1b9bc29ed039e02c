//! Temporal smoothing of detection results.
//!
//! A single-pole exponential smoother over the continuous pose fields, with
//! a bounded observation log of recent detections. Booleans and statistics
//! pass through unblended.

use crate::config::SmoothingConfig;
use crate::pose_estimation::DetectionResult;
use log::debug;
use std::collections::VecDeque;

/// Mutable per-session smoothing state.
///
/// Owned by the detection session for the lifetime of an active stream and
/// reset when the stream is re-acquired. `previous` only ever holds a
/// positive detection.
#[derive(Debug, Default)]
pub struct SmoothingState {
    previous: Option<DetectionResult>,
    history: VecDeque<DetectionResult>,
    gap_frames: u64,
}

impl SmoothingState {
    /// Fresh state for a new detection session
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The last positive detection the filter blended against, if any
    #[must_use]
    pub fn previous(&self) -> Option<&DetectionResult> {
        self.previous.as_ref()
    }

    /// Bounded FIFO of recent smoothed detections, oldest first.
    ///
    /// Retained for downstream multi-frame analysis (velocity estimation
    /// and the like); the blend itself does not consume it.
    #[must_use]
    pub fn history(&self) -> &VecDeque<DetectionResult> {
        &self.history
    }

    /// Consecutive non-detection frames since the last positive detection
    #[must_use]
    pub fn gap_frames(&self) -> u64 {
        self.gap_frames
    }

    /// Discard all carried state
    pub fn reset(&mut self) {
        self.previous = None;
        self.history.clear();
        self.gap_frames = 0;
    }
}

/// Exponential pose smoother.
///
/// Blends the current detection against the previous one with weight
/// `alpha` on the previous value, applied independently to `x_angle`,
/// `y_angle` and the position offsets.
pub struct PoseSmoother {
    alpha: f64,
    history_capacity: usize,
    max_gap_frames: Option<u64>,
}

impl Default for PoseSmoother {
    fn default() -> Self {
        Self::new(&SmoothingConfig::default())
    }
}

impl PoseSmoother {
    /// Create a smoother from configuration
    #[must_use]
    pub fn new(config: &SmoothingConfig) -> Self {
        Self {
            alpha: config.alpha,
            history_capacity: config.history_capacity,
            max_gap_frames: config.max_gap_frames,
        }
    }

    /// Smooth the current frame's result against the session state.
    ///
    /// Non-detections pass through untouched and never become the blend
    /// reference; they only widen the gap. When the gap exceeds the
    /// configured staleness window the retained pose is dropped, so a
    /// detection reappearing much later restarts unsmoothed instead of
    /// blending against a stale pose.
    pub fn apply(&self, current: DetectionResult, state: &mut SmoothingState) -> DetectionResult {
        if !current.detected {
            state.gap_frames = state.gap_frames.saturating_add(1);
            if let Some(max_gap) = self.max_gap_frames {
                if state.gap_frames >= max_gap && state.previous.is_some() {
                    debug!(
                        "dropping retained pose after {} consecutive missed frames",
                        state.gap_frames
                    );
                    state.previous = None;
                }
            }
            return current;
        }

        let mut smoothed = current;
        if let Some(prev) = &state.previous {
            let alpha = self.alpha;
            smoothed.x_angle = prev.x_angle * alpha + smoothed.x_angle * (1.0 - alpha);
            smoothed.y_angle = prev.y_angle * alpha + smoothed.y_angle * (1.0 - alpha);
            smoothed.position.x = prev.position.x * alpha + smoothed.position.x * (1.0 - alpha);
            smoothed.position.y = prev.position.y * alpha + smoothed.position.y * (1.0 - alpha);
        }

        state.gap_frames = 0;
        if state.history.len() >= self.history_capacity {
            state.history.pop_front();
        }
        state.history.push_back(smoothed.clone());
        state.previous = Some(smoothed.clone());

        smoothed
    }
}
