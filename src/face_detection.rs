//! Face-candidate detection over a luminance buffer.
//!
//! Detection is purely heuristic: a coarse grid of probe points is slid over
//! the frame, each probe proposes a fixed-proportion window, and windows are
//! accepted on brightness and contrast statistics alone. No trained model,
//! no feature detection. Fidelity is intentionally low; the signal is meant
//! to drive an avatar, not to recognize anyone.

use crate::config::ScannerConfig;
use crate::grayscale::LuminanceBuffer;
use log::trace;
use std::collections::HashSet;

/// A rectangular window proposed as possibly containing a face.
///
/// Produced by [`FaceScanner::scan`], consumed by [`select_largest`] within
/// the same frame, never persisted. Geometry is `f64` because window sizes
/// derived from `W/3` can be fractional on small frames.
#[derive(Debug, Clone, PartialEq)]
pub struct CandidateRegion {
    /// Window centre, absolute pixel coordinates
    pub center_x: f64,
    pub center_y: f64,
    /// Proposed window dimensions before clipping
    pub width: f64,
    pub height: f64,
    /// `width * height`
    pub area: f64,
    /// Heuristic score in [0, 1]; not a calibrated probability
    pub confidence: f64,
    /// Mean luminance over the clipped window
    pub mean_brightness: f64,
    /// Population variance of luminance over the clipped window
    pub variance: f64,
}

/// Sliding-window region scanner.
pub struct FaceScanner {
    config: ScannerConfig,
}

impl Default for FaceScanner {
    fn default() -> Self {
        Self::new(ScannerConfig::default())
    }
}

impl FaceScanner {
    /// Create a scanner with the given heuristics
    #[must_use]
    pub fn new(config: ScannerConfig) -> Self {
        Self { config }
    }

    /// Collect all candidate regions in the frame.
    ///
    /// Probes are visited row-major. Once a probe is accepted, a
    /// neighbourhood around it is marked visited so overlapping probes are
    /// skipped; this bounds the candidate count but does not guarantee
    /// global non-overlap. An empty result is a normal outcome, not an
    /// error: frames smaller than twice the probe margin yield zero probes.
    #[must_use]
    pub fn scan(&self, gray: &LuminanceBuffer) -> Vec<CandidateRegion> {
        let margin = self.config.probe_margin;
        let stride = self.config.probe_stride.max(1);
        let x_end = gray.width().saturating_sub(margin);
        let y_end = gray.height().saturating_sub(margin);

        let mut regions = Vec::new();
        let mut visited: HashSet<(i64, i64)> = HashSet::new();

        for y in (margin..y_end).step_by(stride) {
            for x in (margin..x_end).step_by(stride) {
                if visited.contains(&(x as i64, y as i64)) {
                    continue;
                }

                if let Some(region) = self.evaluate_window(x, y, gray) {
                    regions.push(region);
                    self.mark_visited(&mut visited, x as i64, y as i64);
                }
            }
        }

        trace!("scan produced {} candidate region(s)", regions.len());
        regions
    }

    /// Evaluate the candidate window centred on a probe point.
    fn evaluate_window(&self, cx: usize, cy: usize, gray: &LuminanceBuffer) -> Option<CandidateRegion> {
        let frame_w = gray.width() as f64;
        let frame_h = gray.height() as f64;

        let win_w = self.config.max_window_width.min(frame_w / 3.0);
        let win_h = self.config.max_window_height.min(frame_h / 3.0);

        let cx_f = cx as f64;
        let cy_f = cy as f64;

        // Clip to image bounds before gathering statistics
        let x1 = (cx_f - win_w / 2.0).max(0.0);
        let y1 = (cy_f - win_h / 2.0).max(0.0);
        let x2 = (cx_f + win_w / 2.0).min(frame_w);
        let y2 = (cy_f + win_h / 2.0).min(frame_h);

        let x_start = x1 as usize;
        let y_start = y1 as usize;
        let x_stop = (x2.ceil() as usize).min(gray.width());
        let y_stop = (y2.ceil() as usize).min(gray.height());

        if x_start >= x_stop || y_start >= y_stop {
            return None;
        }

        let data = gray.data();
        let width = gray.width();
        let count = ((x_stop - x_start) * (y_stop - y_start)) as f64;

        let mut sum = 0.0;
        for y in y_start..y_stop {
            let row = y * width;
            for x in x_start..x_stop {
                sum += f64::from(data[row + x]);
            }
        }
        let mean = sum / count;

        let mut sq_diff = 0.0;
        for y in y_start..y_stop {
            let row = y * width;
            for x in x_start..x_stop {
                let d = f64::from(data[row + x]) - mean;
                sq_diff += d * d;
            }
        }
        let variance = sq_diff / count;

        let cfg = &self.config;
        let is_likely_face = mean > cfg.min_brightness
            && mean < cfg.max_brightness
            && variance > cfg.min_variance
            && variance < cfg.max_variance
            && win_w > cfg.min_window_width
            && win_h > cfg.min_window_height;

        if !is_likely_face {
            return None;
        }

        let confidence = ((variance / crate::constants::CONFIDENCE_VARIANCE_SCALE)
            * (mean / crate::constants::CONFIDENCE_BRIGHTNESS_SCALE))
            .min(1.0);

        if confidence < cfg.min_confidence {
            return None;
        }

        Some(CandidateRegion {
            center_x: cx_f,
            center_y: cy_f,
            width: win_w,
            height: win_h,
            area: win_w * win_h,
            confidence,
            mean_brightness: mean,
            variance,
        })
    }

    /// Mark the dedup neighbourhood around an accepted probe as visited.
    ///
    /// Visited-state is a set of discrete grid coordinates, not a
    /// continuous mask.
    fn mark_visited(&self, visited: &mut HashSet<(i64, i64)>, cx: i64, cy: i64) {
        let radius = crate::constants::DEDUP_RADIUS;
        let step = crate::constants::DEDUP_STRIDE;
        let mut dy = -radius;
        while dy <= radius {
            let mut dx = -radius;
            while dx <= radius {
                visited.insert((cx + dx, cy + dy));
                dx += step;
            }
            dy += step;
        }
    }
}

/// Reduce the candidate set to the single largest-area region.
///
/// Among equal areas the first candidate in scan order wins. `None` on
/// empty input, which maps to a `detected = false` result downstream.
#[must_use]
pub fn select_largest(candidates: Vec<CandidateRegion>) -> Option<CandidateRegion> {
    candidates
        .into_iter()
        .reduce(|best, current| if current.area > best.area { current } else { best })
}
