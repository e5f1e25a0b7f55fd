//! Time subsystem.
//!
//! Provides stable, testable frame timing utilities without coupling to the runtime.
//! Intended usage:
//! - one `FrameClock` per loop; call `tick(platform.now())` once per frame
//! - one `FramePacer` per loop; call `wait()` between ticks
//!
//! The PID step (`next_interval`) is a pure function so its convergence can be
//! checked without wall-clock waits.

mod frame_clock;
mod frame_rate;
mod pacer;
mod pid;
mod ticker;

pub use frame_clock::{FrameClock, FrameTime};
pub use frame_rate::FrameRate;
pub use pacer::FramePacer;
pub use pid::{next_interval, FrameRateController, PidGains, PidState, MAX_TICK_INTERVAL};
pub use ticker::Ticker;
