//! Time management for the host loop.

use std::time::{Duration, Instant};

/// Where frame deltas come from.
#[derive(Debug, Clone, Copy)]
enum ClockSource {
    /// Measured from the wall clock.
    Wall { last_frame: Instant },
    /// Constant step per frame; deterministic.
    Fixed { step: Duration },
}

/// Supplies the per-frame time step that drives gameplay updates.
#[derive(Debug)]
pub struct Time {
    source: ClockSource,
    /// Duration of the last frame.
    delta: Duration,
    /// Total elapsed time since start.
    elapsed: Duration,
    /// Frame count since start.
    frame_count: u64,
    /// Upper bound on a single delta, so a stalled frame doesn't teleport things.
    max_delta: Duration,
}

impl Default for Time {
    fn default() -> Self {
        Self::new()
    }
}

impl Time {
    /// Wall-clock timer.
    pub fn new() -> Self {
        Self::with_source(ClockSource::Wall {
            last_frame: Instant::now(),
        })
    }

    /// Fixed-step timer advancing `step_seconds` every frame.
    pub fn fixed(step_seconds: f32) -> Self {
        Self::with_source(ClockSource::Fixed {
            step: Duration::from_secs_f32(step_seconds.max(0.0)),
        })
    }

    fn with_source(source: ClockSource) -> Self {
        Self {
            source,
            delta: Duration::ZERO,
            elapsed: Duration::ZERO,
            frame_count: 0,
            max_delta: Duration::from_millis(250),
        }
    }

    /// Update timing at the start of a new frame.
    pub fn update(&mut self) {
        let delta = match &mut self.source {
            ClockSource::Wall { last_frame } => {
                let now = Instant::now();
                let delta = now - *last_frame;
                *last_frame = now;
                delta
            }
            ClockSource::Fixed { step } => *step,
        };
        self.delta = delta.min(self.max_delta);
        self.elapsed += self.delta;
        self.frame_count += 1;
    }

    /// Get the delta time in seconds.
    pub fn delta_seconds(&self) -> f32 {
        self.delta.as_secs_f32()
    }

    /// Get total elapsed time in seconds.
    pub fn elapsed_seconds(&self) -> f32 {
        self.elapsed.as_secs_f32()
    }

    /// Get the current frame count.
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    pub fn is_fixed(&self) -> bool {
        matches!(self.source, ClockSource::Fixed { .. })
    }

    /// Clamp for a single frame's delta.
    pub fn set_max_delta(&mut self, seconds: f32) {
        self.max_delta = Duration::from_secs_f32(seconds.max(0.0));
    }
}
