use crate::coords::Vec2;
use crate::input::{KeyInput, Modifiers, TRACKED_BUTTON_COUNT};

/// Cursor position reported while the window is unfocused.
///
/// Far outside any widget bounds, so nothing is hovered.
pub const OFFSCREEN_CURSOR: Vec2 = Vec2::new(-f32::MAX, -f32::MAX);

/// Smallest display width/height handed to the GUI and renderer.
pub const DEFAULT_MIN_DISPLAY_SIZE: f32 = 500.0;

/// Per-frame view of input, timing and display geometry.
///
/// Rebuilt from scratch every tick by `InputAggregator::snapshot`; the frame
/// driver owns it for the duration of that tick only.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameSnapshot {
    pub frame_index: u64,

    /// Window size in logical points, floored per component.
    pub display_size: Vec2,

    /// Drawable size in physical pixels.
    pub framebuffer_size: [u32; 2],

    pub focused: bool,

    /// Logical cursor position, or `OFFSCREEN_CURSOR` when unfocused.
    pub cursor_position: Vec2,

    /// Left, right, middle. Edge latch OR live held state.
    pub button_down: [bool; TRACKED_BUTTON_COUNT],

    /// Seconds since the previous tick; `0.0` on the first tick.
    pub delta_time: f32,

    /// Wheel lines accumulated since the previous snapshot.
    pub wheel_delta: Vec2,

    pub modifiers: Modifiers,
    pub keys: Vec<KeyInput>,
    pub text: String,
}

impl FrameSnapshot {
    /// Whether the cursor lies inside the window (never true for the sentinel).
    pub fn cursor_in_window(&self) -> bool {
        let p = self.cursor_position;
        p.x >= 0.0 && p.y >= 0.0 && p.x < self.display_size.x && p.y < self.display_size.y
    }

    /// Framebuffer pixels per logical point (horizontal axis).
    pub fn pixels_per_point(&self) -> f32 {
        if self.display_size.x <= 0.0 || self.framebuffer_size[0] == 0 {
            1.0
        } else {
            self.framebuffer_size[0] as f32 / self.display_size.x
        }
    }
}
