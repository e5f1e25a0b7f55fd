use std::time::Duration;

/// Frame timing snapshot.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct FrameTime {
    /// Time elapsed since the previous tick, in seconds. Zero on the first tick.
    pub dt: f32,

    /// Monotonic platform timestamp taken at the tick.
    pub now: Duration,

    /// Monotonic frame counter.
    pub frame_index: u64,
}

/// Frame clock producing `FrameTime` snapshots from platform timestamps.
///
/// The clock never reads wall time itself; callers pass the platform's
/// monotonic time so a scripted platform drives it deterministically.
///
/// An optional upper clamp keeps downstream consumers stable after the process
/// was paused (debugger, minimized window). It is off by default.
#[derive(Debug, Clone, Default)]
pub struct FrameClock {
    last: Option<Duration>,
    frame_index: u64,
    dt_max: Option<Duration>,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a clock whose reported delta never exceeds `dt_max`.
    pub fn with_max_dt(dt_max: Duration) -> Self {
        Self {
            dt_max: Some(dt_max),
            ..Self::default()
        }
    }

    /// Forgets the previous timestamp; the next tick reports zero.
    pub fn reset(&mut self) {
        self.last = None;
    }

    /// Timestamp of the previous tick, if any.
    pub fn last_timestamp(&self) -> Option<Duration> {
        self.last
    }

    /// Advances the clock to `now` and returns the new `FrameTime`.
    pub fn tick(&mut self, now: Duration) -> FrameTime {
        // saturating: a platform clock going backwards reports zero, not negative.
        let mut dt = match self.last {
            Some(last) => now.saturating_sub(last),
            None => Duration::ZERO,
        };

        if let Some(max) = self.dt_max {
            dt = dt.min(max);
        }

        self.last = Some(now);

        let ft = FrameTime {
            dt: dt.as_secs_f32(),
            now,
            frame_index: self.frame_index,
        };

        self.frame_index = self.frame_index.wrapping_add(1);

        ft
    }
}
