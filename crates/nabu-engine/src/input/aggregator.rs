use crate::coords::Vec2;
use crate::frame::{FrameSnapshot, OFFSCREEN_CURSOR};
use crate::platform::Platform;
use crate::time::FrameTime;

use super::pending::PendingInput;
use super::sink::InputSink;
use super::types::{
    button_index, ButtonAction, KeyAction, KeyCode, KeyInput, MouseButton, TRACKED_BUTTONS,
};

/// Converts push-model platform events into one pull-model snapshot per frame.
///
/// Callbacks (via `InputSink`) only ever write into `PendingInput`; the frame
/// driver calls `snapshot` once per tick after polling has completed, which
/// reads the level state from the platform and drains the accumulators.
#[derive(Debug, Default)]
pub struct InputAggregator {
    pending: PendingInput,
}

impl InputAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read-only view of the accumulated state.
    pub fn pending(&self) -> &PendingInput {
        &self.pending
    }

    /// Builds the frame snapshot and resets the per-frame accumulators.
    ///
    /// - display size components are floored at `min_display_size`
    /// - cursor is `OFFSCREEN_CURSOR` whenever the window is unfocused
    /// - `button_down[i]` is the edge latch OR the live held state; latches clear
    /// - wheel delta, key transitions and text are moved out
    pub fn snapshot<P>(
        &mut self,
        platform: &P,
        time: FrameTime,
        min_display_size: f32,
    ) -> FrameSnapshot
    where
        P: Platform + ?Sized,
    {
        let focused = platform.is_focused();

        let cursor_position = if focused {
            platform
                .cursor_position()
                .or(self.pending.last_cursor)
                .unwrap_or(OFFSCREEN_CURSOR)
        } else {
            OFFSCREEN_CURSOR
        };

        let mut button_down = [false; TRACKED_BUTTONS.len()];
        for (i, button) in TRACKED_BUTTONS.iter().enumerate() {
            button_down[i] = self.pending.just_pressed[i] || platform.raw_button_state(*button);
            self.pending.just_pressed[i] = false;
        }

        FrameSnapshot {
            frame_index: time.frame_index,
            display_size: platform.size().max_each(min_display_size),
            framebuffer_size: platform.framebuffer_size(),
            focused,
            cursor_position,
            button_down,
            delta_time: time.dt,
            wheel_delta: std::mem::take(&mut self.pending.wheel),
            modifiers: self.pending.modifiers,
            keys: std::mem::take(&mut self.pending.keys),
            text: std::mem::take(&mut self.pending.text),
        }
    }
}

impl InputSink for InputAggregator {
    fn on_button(&mut self, button: MouseButton, action: ButtonAction) {
        // Releases are not latched: the live held state covers them.
        if action != ButtonAction::Press {
            return;
        }
        match button_index(button) {
            Some(i) => self.pending.just_pressed[i] = true,
            None => log::trace!("ignoring untracked button {button:?}"),
        }
    }

    fn on_scroll(&mut self, dx: f32, dy: f32) {
        self.pending.wheel += Vec2::new(dx, dy);
    }

    fn on_key(&mut self, key: KeyCode, action: KeyAction) {
        let pressed = match action {
            KeyAction::Press | KeyAction::Repeat => {
                self.pending.keys_down.insert(key);
                true
            }
            KeyAction::Release => {
                self.pending.keys_down.remove(&key);
                false
            }
        };

        // Per-side platform modifier flags are not trusted across systems.
        self.pending.refresh_modifiers();

        self.pending.keys.push(KeyInput {
            key,
            pressed,
            repeat: action == KeyAction::Repeat,
            modifiers: self.pending.modifiers,
        });
    }

    fn on_char(&mut self, ch: char) {
        // Shortcut chords produce characters on some platforms.
        if self.pending.modifiers.command() {
            log::trace!("dropping {ch:?} typed under a command modifier");
            return;
        }
        self.pending.text.push(ch);
    }

    fn on_resize(&mut self, width: u32, height: u32) {
        // Sizes are re-read from the platform at snapshot time.
        log::debug!("framebuffer resized to {width}x{height}");
    }

    fn on_cursor(&mut self, x: f32, y: f32) {
        self.pending.last_cursor = Some(Vec2::new(x, y));
    }

    fn on_focus(&mut self, focused: bool) {
        if !focused {
            // Avoids stuck keys when focus changes mid-press.
            self.pending.keys_down.clear();
            self.pending.refresh_modifiers();
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use proptest::prelude::*;

    use super::*;
    use crate::input::Modifiers;
    use crate::platform::scripted::ScriptedPlatform;

    fn time(dt: f32) -> FrameTime {
        FrameTime { dt, now: Duration::ZERO, frame_index: 0 }
    }

    fn snap(agg: &mut InputAggregator, p: &ScriptedPlatform) -> FrameSnapshot {
        agg.snapshot(p, time(0.016), 500.0)
    }

    // ── buttons ───────────────────────────────────────────────────────────

    #[test]
    fn press_and_release_within_one_frame_is_reported_down() {
        let p = ScriptedPlatform::new();
        let mut agg = InputAggregator::new();

        agg.on_button(MouseButton::Left, ButtonAction::Press);
        agg.on_button(MouseButton::Left, ButtonAction::Release);

        assert_eq!(snap(&mut agg, &p).button_down, [true, false, false]);
        assert_eq!(snap(&mut agg, &p).button_down, [false, false, false]);
    }

    #[test]
    fn held_button_stays_down_without_new_events() {
        let mut p = ScriptedPlatform::new();
        p.held = [false, true, false];
        let mut agg = InputAggregator::new();

        assert_eq!(snap(&mut agg, &p).button_down, [false, true, false]);
        assert_eq!(snap(&mut agg, &p).button_down, [false, true, false]);
    }

    #[test]
    fn untracked_button_is_ignored() {
        let p = ScriptedPlatform::new();
        let mut agg = InputAggregator::new();

        agg.on_button(MouseButton::Back, ButtonAction::Press);
        agg.on_button(MouseButton::Other(9), ButtonAction::Press);

        assert_eq!(snap(&mut agg, &p).button_down, [false; 3]);
    }

    // ── wheel ─────────────────────────────────────────────────────────────

    #[test]
    fn wheel_resets_after_snapshot() {
        let p = ScriptedPlatform::new();
        let mut agg = InputAggregator::new();

        agg.on_scroll(0.0, 1.0);
        agg.on_scroll(0.5, -3.0);
        assert_eq!(snap(&mut agg, &p).wheel_delta, Vec2::new(0.5, -2.0));
        assert_eq!(snap(&mut agg, &p).wheel_delta, Vec2::zero());
    }

    // ── display / cursor ──────────────────────────────────────────────────

    #[test]
    fn display_size_is_floored() {
        let mut p = ScriptedPlatform::new();
        p.size = Vec2::new(100.0, 50.0);
        let mut agg = InputAggregator::new();

        assert_eq!(snap(&mut agg, &p).display_size, Vec2::new(500.0, 500.0));

        p.size = Vec2::new(1600.0, 420.0);
        assert_eq!(snap(&mut agg, &p).display_size, Vec2::new(1600.0, 500.0));
    }

    #[test]
    fn unfocused_cursor_is_offscreen() {
        let mut p = ScriptedPlatform::new();
        p.cursor = Some(Vec2::new(12.0, 34.0));
        p.focused = false;
        let mut agg = InputAggregator::new();

        assert_eq!(snap(&mut agg, &p).cursor_position, OFFSCREEN_CURSOR);

        p.focused = true;
        assert_eq!(snap(&mut agg, &p).cursor_position, Vec2::new(12.0, 34.0));
    }

    #[test]
    fn cursor_falls_back_to_last_callback_position() {
        let mut p = ScriptedPlatform::new();
        p.cursor = None;
        let mut agg = InputAggregator::new();

        assert_eq!(snap(&mut agg, &p).cursor_position, OFFSCREEN_CURSOR);

        agg.on_cursor(7.0, 8.0);
        assert_eq!(snap(&mut agg, &p).cursor_position, Vec2::new(7.0, 8.0));
    }

    // ── keys ──────────────────────────────────────────────────────────────

    #[test]
    fn modifiers_follow_either_side() {
        let p = ScriptedPlatform::new();
        let mut agg = InputAggregator::new();

        agg.on_key(KeyCode::ControlLeft, KeyAction::Press);
        agg.on_key(KeyCode::ControlRight, KeyAction::Press);
        agg.on_key(KeyCode::ControlLeft, KeyAction::Release);
        assert!(agg.pending().modifiers.ctrl, "right ctrl still held");

        agg.on_key(KeyCode::ControlRight, KeyAction::Release);
        agg.on_key(KeyCode::ShiftRight, KeyAction::Press);

        let s = snap(&mut agg, &p);
        assert_eq!(s.modifiers, Modifiers { shift: true, ..Default::default() });
        assert_eq!(s.keys.len(), 5);
        assert!(s.keys[1].modifiers.ctrl);
        assert!(!s.keys[3].modifiers.ctrl);
    }

    #[test]
    fn repeat_is_forwarded_as_press() {
        let p = ScriptedPlatform::new();
        let mut agg = InputAggregator::new();

        agg.on_key(KeyCode::Backspace, KeyAction::Press);
        agg.on_key(KeyCode::Backspace, KeyAction::Repeat);

        let keys = snap(&mut agg, &p).keys;
        assert_eq!(keys.len(), 2);
        assert!(keys[1].pressed && keys[1].repeat);
        assert!(snap(&mut agg, &p).keys.is_empty());
    }

    #[test]
    fn focus_loss_clears_held_modifiers() {
        let mut agg = InputAggregator::new();

        agg.on_key(KeyCode::AltLeft, KeyAction::Press);
        agg.on_focus(false);

        assert!(!agg.pending().modifiers.alt);
        assert!(agg.pending().keys_down.is_empty());
    }

    #[test]
    fn text_is_drained() {
        let p = ScriptedPlatform::new();
        let mut agg = InputAggregator::new();

        agg.on_char('h');
        agg.on_char('é');
        assert_eq!(snap(&mut agg, &p).text, "hé");
        assert_eq!(snap(&mut agg, &p).text, "");
    }

    #[test]
    fn text_keeps_the_modifiers_it_was_typed_with() {
        let p = ScriptedPlatform::new();
        let mut agg = InputAggregator::new();

        agg.on_key(KeyCode::A, KeyAction::Press);
        agg.on_char('a');
        agg.on_key(KeyCode::A, KeyAction::Release);
        agg.on_key(KeyCode::ControlLeft, KeyAction::Press);
        agg.on_key(KeyCode::C, KeyAction::Press);
        agg.on_char('c');

        let s = snap(&mut agg, &p);
        assert!(s.modifiers.ctrl);
        assert_eq!(s.text, "a");
    }

    // ── properties ────────────────────────────────────────────────────────

    fn tracked_button() -> impl Strategy<Value = MouseButton> {
        prop_oneof![
            Just(MouseButton::Left),
            Just(MouseButton::Right),
            Just(MouseButton::Middle),
        ]
    }

    proptest! {
        #[test]
        fn any_press_between_polls_is_seen(
            events in proptest::collection::vec((tracked_button(), any::<bool>()), 0..24)
        ) {
            let mut p = ScriptedPlatform::new();
            let mut agg = InputAggregator::new();
            let mut pressed = [false; 3];

            for (button, press) in &events {
                let i = button_index(*button).unwrap();
                let action = if *press { ButtonAction::Press } else { ButtonAction::Release };
                agg.on_button(*button, action);
                p.held[i] = *press;
                pressed[i] |= *press;
            }

            let down = snap(&mut agg, &p).button_down;
            for i in 0..3 {
                prop_assert_eq!(down[i], pressed[i] || p.held[i]);
            }
        }

        #[test]
        fn wheel_is_the_sum_of_callbacks(
            deltas in proptest::collection::vec((-8i32..8, -8i32..8), 0..32)
        ) {
            let p = ScriptedPlatform::new();
            let mut agg = InputAggregator::new();
            let (mut sx, mut sy) = (0.0f32, 0.0f32);

            for (dx, dy) in &deltas {
                agg.on_scroll(*dx as f32, *dy as f32);
                sx += *dx as f32;
                sy += *dy as f32;
            }

            prop_assert_eq!(snap(&mut agg, &p).wheel_delta, Vec2::new(sx, sy));
            prop_assert_eq!(snap(&mut agg, &p).wheel_delta, Vec2::zero());
        }
    }
}
