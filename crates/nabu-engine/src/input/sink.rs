use super::types::{ButtonAction, KeyAction, KeyCode, MouseButton};

/// Receiver for push-model platform events.
///
/// The platform adapter invokes these synchronously from `poll_events`. The
/// input aggregator is the production implementor; tests may record calls.
pub trait InputSink {
    fn on_button(&mut self, button: MouseButton, action: ButtonAction);

    /// Wheel delta in lines (positive y scrolls content up).
    fn on_scroll(&mut self, dx: f32, dy: f32);

    fn on_key(&mut self, key: KeyCode, action: KeyAction);

    fn on_char(&mut self, ch: char);

    /// Framebuffer size in physical pixels. Informational: the aggregator reads
    /// the current size from the platform when it takes a snapshot.
    fn on_resize(&mut self, width: u32, height: u32);

    /// Cursor position in logical points.
    fn on_cursor(&mut self, x: f32, y: f32) {
        let _ = (x, y);
    }

    fn on_focus(&mut self, focused: bool) {
        let _ = focused;
    }
}

/// Sink that drops everything. Used while the platform is still starting up.
#[derive(Debug, Default)]
pub struct NullSink;

impl InputSink for NullSink {
    fn on_button(&mut self, _: MouseButton, _: ButtonAction) {}
    fn on_scroll(&mut self, _: f32, _: f32) {}
    fn on_key(&mut self, _: KeyCode, _: KeyAction) {}
    fn on_char(&mut self, _: char) {}
    fn on_resize(&mut self, _: u32, _: u32) {}
}
