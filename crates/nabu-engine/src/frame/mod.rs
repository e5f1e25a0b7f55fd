//! Frame driver.
//!
//! One tick runs Idle → Polling → Snapshotting → Composing → Submitting →
//! Presenting → Idle, strictly in sequence; there is never more than one
//! frame in flight.

mod driver;
mod snapshot;

pub use driver::{DriverConfig, FrameDriver, FramePhase, TickOutcome};
pub use snapshot::{FrameSnapshot, DEFAULT_MIN_DISPLAY_SIZE, OFFSCREEN_CURSOR};
