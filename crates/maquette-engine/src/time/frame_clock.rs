use std::time::{Duration, Instant};

/// Frame timing snapshot.
#[derive(Debug, Copy, Clone)]
pub struct FrameTime {
    /// Time elapsed since the previous frame tick, in seconds.
    pub dt: f32,

    /// Monotonic timestamp taken at the tick.
    pub now: Instant,

    /// Monotonic frame counter.
    pub frame_index: u64,

    /// Smoothed display rate in frames per second.
    ///
    /// Measured over a sliding ~half-second window; 0 until the first window
    /// completes.
    pub fps: f32,
}

/// Frame clock producing `FrameTime` snapshots.
///
/// Delta time is clamped to avoid pathological values when the application is
/// paused by the debugger, minimized, or stalls.
#[derive(Debug, Clone)]
pub struct FrameClock {
    last: Instant,
    frame_index: u64,
    dt_min: Duration,
    dt_max: Duration,

    // Display-rate measurement window.
    window_start: Instant,
    window_frames: u32,
    fps: f32,
}

const FPS_WINDOW: Duration = Duration::from_millis(500);

impl FrameClock {
    /// Creates a new clock with default clamps.
    ///
    /// Clamp rationale:
    /// - minimum prevents zero-dt behavior from tight loops on some platforms
    /// - maximum prevents downstream explosions after long stalls
    pub fn new() -> Self {
        let now = Instant::now();
        Self {
            last: now,
            frame_index: 0,
            dt_min: Duration::from_micros(100),
            dt_max: Duration::from_millis(250),
            window_start: now,
            window_frames: 0,
            fps: 0.0,
        }
    }

    /// Resets the clock baseline.
    ///
    /// Useful after surface reconfigure events or when resuming from
    /// suspension.
    pub fn reset(&mut self) {
        let now = Instant::now();
        self.last = now;
        self.window_start = now;
        self.window_frames = 0;
    }

    /// Current smoothed display rate.
    pub fn fps(&self) -> f32 {
        self.fps
    }

    /// Advances the clock and returns a new `FrameTime`.
    pub fn tick(&mut self) -> FrameTime {
        let now = Instant::now();
        let mut dt = now.saturating_duration_since(self.last);

        // Clamp delta time to keep downstream systems stable.
        if dt < self.dt_min {
            dt = self.dt_min;
        } else if dt > self.dt_max {
            dt = self.dt_max;
        }

        self.last = now;

        self.window_frames += 1;
        let window = now.saturating_duration_since(self.window_start);
        if window >= FPS_WINDOW {
            self.fps = self.window_frames as f32 / window.as_secs_f32();
            self.window_start = now;
            self.window_frames = 0;
        }

        let ft = FrameTime {
            dt: dt.as_secs_f32(),
            now,
            frame_index: self.frame_index,
            fps: self.fps,
        };

        self.frame_index = self.frame_index.wrapping_add(1);

        ft
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tick_increments_frame_index() {
        let mut clock = FrameClock::new();
        let a = clock.tick();
        let b = clock.tick();
        assert_eq!(b.frame_index, a.frame_index + 1);
    }

    #[test]
    fn dt_is_clamped_to_minimum() {
        let mut clock = FrameClock::new();
        // Two immediate ticks cannot produce a dt below the clamp.
        clock.tick();
        let ft = clock.tick();
        assert!(ft.dt >= 0.0001 - f32::EPSILON);
    }
}
