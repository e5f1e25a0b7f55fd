use std::fmt;
use std::time::Duration;

/// Frame-rate target.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum FrameRate {
    /// Tick at most this many times per second.
    Capped(u32),
    /// Tick as fast as the loop allows.
    Unlimited,
}

impl FrameRate {
    /// Lowest selectable target.
    pub const MIN_FPS: u32 = 5;
    /// Highest selectable value; selecting it means `Unlimited`.
    pub const MAX_FPS: u32 = 400;

    /// A capped target with `fps` raised to at least `MIN_FPS`.
    pub fn capped(fps: u32) -> Self {
        FrameRate::Capped(fps.max(Self::MIN_FPS))
    }

    /// Interpretation of a settings-slider value in `[MIN_FPS, MAX_FPS]`.
    ///
    /// Out-of-range values are clamped; the top stop selects `Unlimited`.
    pub fn from_slider(value: u32) -> Self {
        let v = value.clamp(Self::MIN_FPS, Self::MAX_FPS);
        if v >= Self::MAX_FPS {
            FrameRate::Unlimited
        } else {
            FrameRate::Capped(v)
        }
    }

    /// Inverse of `from_slider`.
    pub fn slider_value(self) -> u32 {
        match self {
            FrameRate::Capped(fps) => fps.clamp(Self::MIN_FPS, Self::MAX_FPS),
            FrameRate::Unlimited => Self::MAX_FPS,
        }
    }

    /// Tick interval implied by the target.
    ///
    /// `Unlimited` maps to the smallest non-zero duration.
    pub fn interval(self) -> Duration {
        match self.fps() {
            Some(fps) => Duration::from_secs(1) / fps,
            None => Duration::from_nanos(1),
        }
    }

    /// Target frames per second, if capped; never below `MIN_FPS`.
    pub fn fps(self) -> Option<u32> {
        match self {
            FrameRate::Capped(fps) => Some(fps.max(Self::MIN_FPS)),
            FrameRate::Unlimited => None,
        }
    }
}

impl Default for FrameRate {
    fn default() -> Self {
        FrameRate::Capped(60)
    }
}

impl fmt::Display for FrameRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FrameRate::Capped(fps) => write!(f, "FPS: {fps}"),
            FrameRate::Unlimited => f.write_str("FPS: UNLIMITED"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sixty_fps_interval() {
        let i = FrameRate::Capped(60).interval();
        assert_eq!(i, Duration::from_nanos(16_666_666));
        assert!((i.as_secs_f64() - 1.0 / 60.0).abs() < 1e-6);
    }

    #[test]
    fn unlimited_is_minimum_interval() {
        assert_eq!(FrameRate::Unlimited.interval(), Duration::from_nanos(1));
    }

    #[test]
    fn slider_bounds() {
        assert_eq!(FrameRate::from_slider(0), FrameRate::Capped(5));
        assert_eq!(FrameRate::from_slider(60), FrameRate::Capped(60));
        assert_eq!(FrameRate::from_slider(399), FrameRate::Capped(399));
        assert_eq!(FrameRate::from_slider(400), FrameRate::Unlimited);
        assert_eq!(FrameRate::from_slider(9000), FrameRate::Unlimited);
    }

    #[test]
    fn slider_round_trip() {
        for v in [5, 30, 144, 399, 400] {
            assert_eq!(FrameRate::from_slider(v).slider_value(), v);
        }
    }

    #[test]
    fn targets_below_the_minimum_are_raised() {
        assert_eq!(FrameRate::capped(0), FrameRate::Capped(5));
        assert_eq!(FrameRate::Capped(0).fps(), Some(5));
        assert_eq!(FrameRate::Capped(0).interval(), Duration::from_millis(200));
        assert_eq!(FrameRate::capped(90), FrameRate::Capped(90));
    }

    #[test]
    fn labels() {
        assert_eq!(FrameRate::Capped(75).to_string(), "FPS: 75");
        assert_eq!(FrameRate::Unlimited.to_string(), "FPS: UNLIMITED");
    }
}
