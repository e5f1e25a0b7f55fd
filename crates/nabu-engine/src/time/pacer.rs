use std::time::Duration;

use super::{FrameRate, FrameRateController, Ticker};

/// Frame cadence: a fixed-rate ticker, optionally steered by a PID controller.
///
/// Without a controller the tick interval is exactly `rate.interval()`.
#[derive(Debug, Clone)]
pub struct FramePacer {
    rate: FrameRate,
    ticker: Ticker,
    controller: Option<FrameRateController>,
}

impl FramePacer {
    pub fn new(rate: FrameRate) -> Self {
        Self {
            rate,
            ticker: Ticker::new(rate.interval()),
            controller: None,
        }
    }

    pub fn with_controller(mut self, controller: FrameRateController) -> Self {
        self.controller = Some(controller);
        self
    }

    pub fn frame_rate(&self) -> FrameRate {
        self.rate
    }

    /// Current tick interval (may differ from `rate.interval()` under PID control).
    pub fn interval(&self) -> Duration {
        self.ticker.interval()
    }

    pub fn is_controlled(&self) -> bool {
        self.controller.is_some()
    }

    /// Applies a new target; the interval restarts from the target's nominal value.
    pub fn set_frame_rate(&mut self, rate: FrameRate) {
        self.rate = rate;
        self.ticker.set_interval(rate.interval());
        if let Some(c) = self.controller.as_mut() {
            c.reset();
        }
        log::debug!("frame rate set to {rate} (interval {:?})", self.ticker.interval());
    }

    /// Enables or disables feedback control. Disabling restores the fixed interval.
    pub fn set_controller(&mut self, controller: Option<FrameRateController>) {
        self.controller = controller;
        self.ticker.set_interval(self.rate.interval());
    }

    /// Feeds one measured frame time (seconds) to the controller, if any.
    pub fn observe(&mut self, dt: f32) {
        let Some(controller) = self.controller.as_mut() else { return };

        let current = self.ticker.interval();
        let dt = Duration::from_secs_f32(dt.max(0.0));
        if let Some(next) = controller.observe(dt, current, self.rate) {
            log::trace!("pid: tick interval {current:?} -> {next:?}");
            self.ticker.set_interval(next);
        }
    }

    /// Blocks until the next tick boundary.
    pub fn wait(&mut self) {
        self.ticker.wait();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::PidGains;

    #[test]
    fn fixed_rate_uses_nominal_interval() {
        let mut p = FramePacer::new(FrameRate::Capped(60));
        p.observe(0.5);
        assert_eq!(p.interval(), FrameRate::Capped(60).interval());

        p.set_frame_rate(FrameRate::Unlimited);
        assert_eq!(p.interval(), Duration::from_nanos(1));
    }

    #[test]
    fn controller_adjusts_interval() {
        let controller =
            FrameRateController::with_period(PidGains::default(), Duration::from_millis(50));
        let mut p = FramePacer::new(FrameRate::Capped(100)).with_controller(controller);

        // 30 ms frames against a 10 ms target.
        for _ in 0..2 {
            p.observe(0.030);
        }
        assert!(p.interval() < FrameRate::Capped(100).interval());
    }

    #[test]
    fn disabling_controller_restores_interval() {
        let controller =
            FrameRateController::with_period(PidGains::default(), Duration::from_millis(10));
        let mut p = FramePacer::new(FrameRate::Capped(100)).with_controller(controller);
        p.observe(0.030);
        p.set_controller(None);
        assert!(!p.is_controlled());
        assert_eq!(p.interval(), FrameRate::Capped(100).interval());
    }

    #[test]
    fn zero_fps_target_keeps_pacing_under_control() {
        let controller =
            FrameRateController::with_period(PidGains::default(), Duration::from_millis(10));
        let mut p = FramePacer::new(FrameRate::Capped(0)).with_controller(controller);
        assert_eq!(p.interval(), Duration::from_millis(200));

        for _ in 0..20 {
            p.observe(0.016);
        }
        assert!(p.interval() <= crate::time::MAX_TICK_INTERVAL);
    }
}
