use std::time::Duration;

use crate::coords::Vec2;
use crate::input::{InputSink, MouseButton};

use super::CursorShape;

/// Capability interface over the operating window.
///
/// Every method must be called from the thread that owns the loop. Only the
/// frame driver holds a `Platform`, so window and graphics calls cannot leak to
/// other execution contexts.
///
/// Construction failure (no display server, no context) is a startup error of
/// the implementor's constructor; the steady-state methods do not fail.
pub trait Platform {
    /// Platform cursor handle produced by `create_cursor`.
    type Cursor;

    /// Window size in logical points.
    fn size(&self) -> Vec2;

    /// Drawable size in physical pixels.
    fn framebuffer_size(&self) -> [u32; 2];

    fn is_focused(&self) -> bool;

    /// Cursor position in logical points, if the platform knows it.
    fn cursor_position(&self) -> Option<Vec2>;

    /// Live ("is held right now") state of a pointer button.
    fn raw_button_state(&self, button: MouseButton) -> bool;

    /// Drains the OS event queue without blocking.
    ///
    /// Input callbacks on `sink` run synchronously inside this call.
    fn poll_events(&mut self, sink: &mut dyn InputSink);

    /// Finishes the frame on the window side (buffer swap / present notification).
    fn present(&mut self);

    /// Whether the window asked to close.
    fn should_stop(&self) -> bool;

    /// Monotonic time since the platform started.
    fn now(&self) -> Duration;

    fn clipboard_text(&mut self) -> Option<String>;

    fn set_clipboard_text(&mut self, text: &str);

    /// Creates the platform handle for a logical cursor shape.
    fn create_cursor(&mut self, shape: CursorShape) -> Self::Cursor;

    /// Shows `cursor`, or hides the platform cursor when `None`.
    fn set_cursor(&mut self, cursor: Option<&Self::Cursor>);
}
