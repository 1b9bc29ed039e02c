//! Frame scheduling and session state.
//!
//! The scheduler drives the pipeline at a fixed cadence (~30 Hz), enforces
//! single-flight execution so no two frames are ever analyzed concurrently,
//! contains stage failures, and pushes smoothed results to registered
//! sinks. Tearing the scheduler down discards the session's smoothing state
//! and delivers no further results.

use crate::config::{SchedulerConfig, SmoothingConfig};
use crate::pipeline::{FrameProcessor, RgbaFrame};
use crate::pose_estimation::DetectionResult;
use crate::smoothing::{PoseSmoother, SmoothingState};
use log::{info, trace, warn};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::{Duration, Instant};

/// Supplies frames on demand.
///
/// `None` means the source is not ready yet; the scheduler skips the tick
/// and retries. End-of-stream is the owner's concern, signalled by stopping
/// the scheduler.
pub trait FrameSource: Send {
    fn next_frame(&mut self) -> Option<RgbaFrame>;
}

/// Consumes the per-frame detection stream.
///
/// Sinks must tolerate `detected = false` records and must not assume
/// monotonically increasing confidence.
pub trait DetectionSink: Send {
    fn publish(&mut self, result: &DetectionResult);
}

/// Structural single-flight guard: at most one holder at a time.
#[derive(Debug, Default)]
pub struct SingleFlight {
    active: AtomicBool,
}

impl SingleFlight {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Try to enter the critical section; `None` while another holder is
    /// active. The section is released when the guard drops.
    #[must_use]
    pub fn try_acquire(&self) -> Option<FlightGuard<'_>> {
        if self
            .active
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
        {
            Some(FlightGuard { flight: self })
        } else {
            None
        }
    }
}

/// RAII token for one in-flight pipeline pass
pub struct FlightGuard<'a> {
    flight: &'a SingleFlight,
}

impl Drop for FlightGuard<'_> {
    fn drop(&mut self) {
        self.flight.active.store(false, Ordering::Release);
    }
}

/// Outcome of one scheduled pipeline run
#[derive(Debug)]
pub enum TickOutcome {
    /// The frame was analyzed; result is smoothed and ready to publish
    Processed(DetectionResult),
    /// A previous pass is still in flight; retry after the busy backoff
    Busy,
}

/// One detection session: processor, smoother and the state they share.
///
/// The single-flight guard makes concurrent `run_once` calls from any
/// number of threads yield at most one active pipeline pass; the mutex
/// serializes all writes to the smoothing state.
pub struct DetectionSession {
    processor: Box<dyn FrameProcessor>,
    smoother: PoseSmoother,
    state: Mutex<SmoothingState>,
    flight: SingleFlight,
}

impl DetectionSession {
    /// Create a session around a frame processor
    #[must_use]
    pub fn new(processor: Box<dyn FrameProcessor>, smoothing: &SmoothingConfig) -> Self {
        Self {
            processor,
            smoother: PoseSmoother::new(smoothing),
            state: Mutex::new(SmoothingState::new()),
            flight: SingleFlight::new(),
        }
    }

    /// Run the pipeline for one frame under the single-flight discipline.
    ///
    /// Stage failures are contained here: they are logged and downgraded to
    /// a `detected = false` result for this frame, never propagated.
    pub fn run_once(&self, frame: &RgbaFrame) -> TickOutcome {
        let Some(_guard) = self.flight.try_acquire() else {
            return TickOutcome::Busy;
        };

        let raw = match self.processor.process(frame) {
            Ok(result) => result,
            Err(e) => {
                warn!("frame processing failed, treating as no detection: {e}");
                DetectionResult::none()
            }
        };

        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        let smoothed = self.smoother.apply(raw, &mut state);
        TickOutcome::Processed(smoothed)
    }

    /// Discard the session's smoothing state (stream re-acquired)
    pub fn reset(&self) {
        self.state.lock().unwrap_or_else(PoisonError::into_inner).reset();
    }

    /// Length of the bounded detection history
    #[must_use]
    pub fn history_len(&self) -> usize {
        self.state.lock().unwrap_or_else(PoisonError::into_inner).history().len()
    }

    /// Whether a previous positive detection is currently retained
    #[must_use]
    pub fn has_previous(&self) -> bool {
        self.state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .previous()
            .is_some()
    }
}

/// Remote stop control for a running scheduler
#[derive(Debug, Clone)]
pub struct SchedulerHandle {
    running: Arc<AtomicBool>,
}

impl SchedulerHandle {
    /// Halt the scheduler's recurring activation after the current tick
    pub fn stop(&self) {
        self.running.store(false, Ordering::SeqCst);
    }

    /// Whether the scheduler is still active
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }
}

/// Drives the detection session at a fixed cadence.
pub struct FrameScheduler {
    session: Arc<DetectionSession>,
    source: Box<dyn FrameSource>,
    sinks: Vec<Box<dyn DetectionSink>>,
    frame_interval: Duration,
    busy_retry: Duration,
    running: Arc<AtomicBool>,
}

impl FrameScheduler {
    /// Create a scheduler over a session and a frame source
    #[must_use]
    pub fn new(session: Arc<DetectionSession>, source: Box<dyn FrameSource>, config: &SchedulerConfig) -> Self {
        Self {
            session,
            source,
            sinks: Vec::new(),
            frame_interval: Duration::from_millis(config.frame_interval_ms),
            busy_retry: Duration::from_millis(config.busy_retry_ms),
            running: Arc::new(AtomicBool::new(true)),
        }
    }

    /// Register a consumer of the detection stream
    pub fn add_sink(&mut self, sink: Box<dyn DetectionSink>) {
        self.sinks.push(sink);
    }

    /// Handle for stopping the loop from another thread
    #[must_use]
    pub fn handle(&self) -> SchedulerHandle {
        SchedulerHandle {
            running: Arc::clone(&self.running),
        }
    }

    /// Run the scheduling loop on the calling thread until stopped.
    ///
    /// Each tick reads a frame if the source is ready, runs the session
    /// once, and publishes the result. A busy session defers the tick by
    /// the busy backoff instead of queueing; a missing frame is an idle
    /// skip. On exit the session state is discarded and no further result
    /// is delivered.
    pub fn run(&mut self) {
        info!(
            "starting detection loop at {:?} cadence ({:?} busy retry)",
            self.frame_interval, self.busy_retry
        );

        while self.running.load(Ordering::SeqCst) {
            let tick_started = Instant::now();
            let mut delay = self.frame_interval;

            match self.source.next_frame() {
                None => trace!("frame source not ready, skipping tick"),
                Some(frame) if frame.is_empty() => trace!("empty frame, skipping tick"),
                Some(frame) => match self.session.run_once(&frame) {
                    TickOutcome::Busy => {
                        trace!("previous pass still in flight, backing off");
                        delay = self.busy_retry;
                    }
                    TickOutcome::Processed(result) => {
                        // Teardown may have been requested while the pass
                        // ran; deliver nothing after that point.
                        if !self.running.load(Ordering::SeqCst) {
                            break;
                        }
                        for sink in &mut self.sinks {
                            sink.publish(&result);
                        }
                    }
                },
            }

            let elapsed = tick_started.elapsed();
            if delay > elapsed {
                std::thread::sleep(delay - elapsed);
            }
        }

        self.session.reset();
        info!("detection loop stopped, session state discarded");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_flight_excludes_second_holder() {
        let flight = SingleFlight::new();
        let first = flight.try_acquire();
        assert!(first.is_some());
        assert!(flight.try_acquire().is_none());
        drop(first);
        assert!(flight.try_acquire().is_some());
    }

    #[test]
    fn test_handle_stops_loop_state() {
        let handle = SchedulerHandle {
            running: Arc::new(AtomicBool::new(true)),
        };
        assert!(handle.is_running());
        handle.stop();
        assert!(!handle.is_running());
    }
}
