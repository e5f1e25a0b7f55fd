use std::collections::HashMap;

use egui::Key;

use crate::input::KeyCode;

/// Keys the GUI library understands, paired with their platform codes.
const KEY_TABLE: &[(Key, KeyCode)] = &[
    (Key::Tab, KeyCode::Tab),
    (Key::ArrowLeft, KeyCode::ArrowLeft),
    (Key::ArrowRight, KeyCode::ArrowRight),
    (Key::ArrowUp, KeyCode::ArrowUp),
    (Key::ArrowDown, KeyCode::ArrowDown),
    (Key::PageUp, KeyCode::PageUp),
    (Key::PageDown, KeyCode::PageDown),
    (Key::Home, KeyCode::Home),
    (Key::End, KeyCode::End),
    (Key::Insert, KeyCode::Insert),
    (Key::Delete, KeyCode::Delete),
    (Key::Backspace, KeyCode::Backspace),
    (Key::Space, KeyCode::Space),
    (Key::Enter, KeyCode::Enter),
    (Key::Escape, KeyCode::Escape),
    (Key::A, KeyCode::A),
    (Key::B, KeyCode::B),
    (Key::C, KeyCode::C),
    (Key::D, KeyCode::D),
    (Key::E, KeyCode::E),
    (Key::F, KeyCode::F),
    (Key::G, KeyCode::G),
    (Key::H, KeyCode::H),
    (Key::I, KeyCode::I),
    (Key::J, KeyCode::J),
    (Key::K, KeyCode::K),
    (Key::L, KeyCode::L),
    (Key::M, KeyCode::M),
    (Key::N, KeyCode::N),
    (Key::O, KeyCode::O),
    (Key::P, KeyCode::P),
    (Key::Q, KeyCode::Q),
    (Key::R, KeyCode::R),
    (Key::S, KeyCode::S),
    (Key::T, KeyCode::T),
    (Key::U, KeyCode::U),
    (Key::V, KeyCode::V),
    (Key::W, KeyCode::W),
    (Key::X, KeyCode::X),
    (Key::Y, KeyCode::Y),
    (Key::Z, KeyCode::Z),
    (Key::Num0, KeyCode::Digit0),
    (Key::Num1, KeyCode::Digit1),
    (Key::Num2, KeyCode::Digit2),
    (Key::Num3, KeyCode::Digit3),
    (Key::Num4, KeyCode::Digit4),
    (Key::Num5, KeyCode::Digit5),
    (Key::Num6, KeyCode::Digit6),
    (Key::Num7, KeyCode::Digit7),
    (Key::Num8, KeyCode::Digit8),
    (Key::Num9, KeyCode::Digit9),
    (Key::F1, KeyCode::F1),
    (Key::F2, KeyCode::F2),
    (Key::F3, KeyCode::F3),
    (Key::F4, KeyCode::F4),
    (Key::F5, KeyCode::F5),
    (Key::F6, KeyCode::F6),
    (Key::F7, KeyCode::F7),
    (Key::F8, KeyCode::F8),
    (Key::F9, KeyCode::F9),
    (Key::F10, KeyCode::F10),
    (Key::F11, KeyCode::F11),
    (Key::F12, KeyCode::F12),
];

/// Two-way lookup between GUI keys and platform key codes.
///
/// Immutable after construction. Modifier keys are intentionally absent: the
/// GUI receives them as a `Modifiers` state, not as key events.
#[derive(Debug, Clone)]
pub struct KeyMapping {
    to_gui: HashMap<KeyCode, Key>,
    to_platform: HashMap<Key, KeyCode>,
}

impl KeyMapping {
    pub fn new() -> Self {
        let mut to_gui = HashMap::with_capacity(KEY_TABLE.len());
        let mut to_platform = HashMap::with_capacity(KEY_TABLE.len());
        for &(key, code) in KEY_TABLE {
            to_gui.insert(code, key);
            to_platform.insert(key, code);
        }
        Self { to_gui, to_platform }
    }

    #[inline]
    pub fn gui_key(&self, code: KeyCode) -> Option<Key> {
        self.to_gui.get(&code).copied()
    }

    #[inline]
    pub fn platform_key(&self, key: Key) -> Option<KeyCode> {
        self.to_platform.get(&key).copied()
    }

    pub fn len(&self) -> usize {
        self.to_gui.len()
    }

    pub fn is_empty(&self) -> bool {
        self.to_gui.is_empty()
    }
}

impl Default for KeyMapping {
    fn default() -> Self {
        Self::new()
    }
}
