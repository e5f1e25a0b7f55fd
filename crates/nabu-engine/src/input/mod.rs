//! Input subsystem.
//!
//! Public API is platform-agnostic and does not expose winit types.
//! Platform adapters push events through `InputSink`; the frame driver pulls one
//! `FrameSnapshot` per tick from the `InputAggregator`.

mod aggregator;
mod pending;
mod sink;
mod types;

pub use aggregator::InputAggregator;
pub use pending::PendingInput;
pub use sink::{InputSink, NullSink};
pub use types::{
    button_index,
    ButtonAction,
    KeyAction,
    KeyCode,
    KeyInput,
    Modifiers,
    MouseButton,
    TRACKED_BUTTONS,
    TRACKED_BUTTON_COUNT,
};
