use std::time::Duration;

use super::FrameRate;

/// Upper bound for a controller-produced tick interval.
pub const MAX_TICK_INTERVAL: Duration = Duration::from_millis(500);

/// Proportional / integral / derivative gains.
///
/// Errors and outputs are both in seconds, so the gains are dimensionless.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct PidGains {
    pub kp: f64,
    pub ki: f64,
    pub kd: f64,
}

impl Default for PidGains {
    fn default() -> Self {
        Self { kp: 0.2, ki: 0.5, kd: 0.05 }
    }
}

/// Error history carried between control steps.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct PidState {
    pub prev_error: f64,
    pub prev_prev_error: f64,
}

/// One control step (velocity form).
///
/// `error` is `required_frame_time - measured_frame_time` in seconds: positive
/// when frames come in faster than the target, which lengthens the interval.
/// The result is clamped to `[0, MAX_TICK_INTERVAL]`. A non-finite `error`
/// leaves both the interval and the state unchanged.
pub fn next_interval(
    current: Duration,
    error: f64,
    gains: PidGains,
    state: PidState,
) -> (Duration, PidState) {
    if !error.is_finite() {
        return (current, state);
    }

    let p = error - state.prev_error;
    let i = error;
    let d = error - 2.0 * state.prev_error + state.prev_prev_error;

    let delta = gains.kp * p + gains.ki * i + gains.kd * d;
    let next = (current.as_secs_f64() + delta).clamp(0.0, MAX_TICK_INTERVAL.as_secs_f64());
    if !next.is_finite() {
        return (current, state);
    }

    let state = PidState {
        prev_error: error,
        prev_prev_error: state.prev_error,
    };

    (Duration::from_secs_f64(next), state)
}

/// Adjusts the tick interval so the measured frame time tracks a target rate.
///
/// Frame times are averaged over a control period (default 0.5 s); one PID
/// step runs per period. An `Unlimited` target leaves the interval alone.
#[derive(Debug, Clone)]
pub struct FrameRateController {
    gains: PidGains,
    state: PidState,
    period: Duration,
    elapsed: Duration,
    frames: u32,
}

impl FrameRateController {
    pub const DEFAULT_PERIOD: Duration = Duration::from_millis(500);

    pub fn new(gains: PidGains) -> Self {
        Self::with_period(gains, Self::DEFAULT_PERIOD)
    }

    pub fn with_period(gains: PidGains, period: Duration) -> Self {
        Self {
            gains,
            state: PidState::default(),
            period,
            elapsed: Duration::ZERO,
            frames: 0,
        }
    }

    pub fn gains(&self) -> PidGains {
        self.gains
    }

    /// Drops accumulated measurements and error history.
    pub fn reset(&mut self) {
        self.state = PidState::default();
        self.elapsed = Duration::ZERO;
        self.frames = 0;
    }

    /// Records one frame; returns a new interval at each period boundary.
    pub fn observe(
        &mut self,
        dt: Duration,
        current: Duration,
        target: FrameRate,
    ) -> Option<Duration> {
        self.elapsed += dt;
        self.frames += 1;

        if self.elapsed < self.period {
            return None;
        }

        let measured = self.elapsed.as_secs_f64() / f64::from(self.frames);
        self.elapsed = Duration::ZERO;
        self.frames = 0;

        let fps = target.fps()?;
        let required = 1.0 / f64::from(fps);

        let (next, state) = next_interval(current, required - measured, self.gains, self.state);
        self.state = state;
        Some(next)
    }
}
