//! Scripted in-memory platform for tests.

use std::collections::VecDeque;
use std::time::Duration;

use crate::coords::Vec2;
use crate::input::{button_index, ButtonAction, InputSink, KeyAction, KeyCode, MouseButton};

use super::{CursorShape, Platform};

/// One event delivered during a scripted `poll_events`.
#[derive(Debug, Clone)]
pub(crate) enum ScriptedEvent {
    Press(MouseButton),
    Release(MouseButton),
    Scroll(f32, f32),
    Key(KeyCode, KeyAction),
    Char(char),
    Cursor(f32, f32),
    Resize(u32, u32),
    Focus(bool),
}

/// Fake window: every `poll_events` consumes one entry of `script`, advances
/// the clock by `frame_time` (except on the first poll) and reports stop once
/// the script is exhausted.
#[derive(Debug)]
pub(crate) struct ScriptedPlatform {
    pub size: Vec2,
    pub framebuffer: [u32; 2],
    pub focused: bool,
    pub cursor: Option<Vec2>,
    pub held: [bool; 3],
    pub script: VecDeque<Vec<ScriptedEvent>>,
    pub frame_time: Duration,
    pub polls: u32,
    pub presented: u32,
    pub clipboard: String,
    pub cursors_created: usize,
    pub shown_cursor: Option<CursorShape>,
    pub stop_when_exhausted: bool,
}

impl ScriptedPlatform {
    pub fn new() -> Self {
        Self {
            size: Vec2::new(1600.0, 900.0),
            framebuffer: [1600, 900],
            focused: true,
            cursor: Some(Vec2::new(10.0, 10.0)),
            held: [false; 3],
            script: VecDeque::new(),
            frame_time: Duration::from_millis(16),
            polls: 0,
            presented: 0,
            clipboard: String::new(),
            cursors_created: 0,
            shown_cursor: None,
            stop_when_exhausted: true,
        }
    }

    pub fn with_script(script: Vec<Vec<ScriptedEvent>>) -> Self {
        Self {
            script: script.into(),
            ..Self::new()
        }
    }
}

impl Platform for ScriptedPlatform {
    type Cursor = CursorShape;

    fn size(&self) -> Vec2 {
        self.size
    }

    fn framebuffer_size(&self) -> [u32; 2] {
        self.framebuffer
    }

    fn is_focused(&self) -> bool {
        self.focused
    }

    fn cursor_position(&self) -> Option<Vec2> {
        self.cursor
    }

    fn raw_button_state(&self, button: MouseButton) -> bool {
        button_index(button).is_some_and(|i| self.held[i])
    }

    fn poll_events(&mut self, sink: &mut dyn InputSink) {
        self.polls += 1;
        let Some(events) = self.script.pop_front() else { return };

        for ev in events {
            match ev {
                ScriptedEvent::Press(b) => {
                    if let Some(i) = button_index(b) {
                        self.held[i] = true;
                    }
                    sink.on_button(b, ButtonAction::Press);
                }
                ScriptedEvent::Release(b) => {
                    if let Some(i) = button_index(b) {
                        self.held[i] = false;
                    }
                    sink.on_button(b, ButtonAction::Release);
                }
                ScriptedEvent::Scroll(dx, dy) => sink.on_scroll(dx, dy),
                ScriptedEvent::Key(k, a) => sink.on_key(k, a),
                ScriptedEvent::Char(c) => sink.on_char(c),
                ScriptedEvent::Cursor(x, y) => {
                    self.cursor = Some(Vec2::new(x, y));
                    sink.on_cursor(x, y);
                }
                ScriptedEvent::Resize(w, h) => {
                    self.framebuffer = [w, h];
                    self.size = Vec2::new(w as f32, h as f32);
                    sink.on_resize(w, h);
                }
                ScriptedEvent::Focus(f) => {
                    self.focused = f;
                    sink.on_focus(f);
                }
            }
        }
    }

    fn present(&mut self) {
        self.presented += 1;
    }

    fn should_stop(&self) -> bool {
        self.stop_when_exhausted && self.polls > 0 && self.script.is_empty()
    }

    fn now(&self) -> Duration {
        self.frame_time * self.polls.saturating_sub(1)
    }

    fn clipboard_text(&mut self) -> Option<String> {
        Some(self.clipboard.clone())
    }

    fn set_clipboard_text(&mut self, text: &str) {
        self.clipboard = text.to_string();
    }

    fn create_cursor(&mut self, shape: CursorShape) -> CursorShape {
        self.cursors_created += 1;
        shape
    }

    fn set_cursor(&mut self, cursor: Option<&CursorShape>) {
        self.shown_cursor = cursor.copied();
    }
}
