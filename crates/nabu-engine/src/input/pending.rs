use std::collections::HashSet;

use crate::coords::Vec2;

use super::types::{KeyCode, KeyInput, Modifiers, TRACKED_BUTTON_COUNT};

/// Input accumulated between two frame boundaries.
///
/// Written by platform callbacks during polling, drained once per frame by
/// `InputAggregator::snapshot`. Both phases run on the loop thread, so the
/// struct is owned by the aggregator and needs no lock.
#[derive(Debug, Default)]
pub struct PendingInput {
    /// Edge latches: set on press, cleared only when a snapshot is taken.
    pub just_pressed: [bool; TRACKED_BUTTON_COUNT],

    /// Wheel delta summed over every scroll callback since the last snapshot.
    pub wheel: Vec2,

    /// Last cursor position reported by a callback.
    pub last_cursor: Option<Vec2>,

    /// Live key-state table (platform key codes currently held).
    pub keys_down: HashSet<KeyCode>,

    /// Modifier state derived from `keys_down`.
    pub modifiers: Modifiers,

    /// Key transitions in arrival order.
    pub keys: Vec<KeyInput>,

    /// Committed characters in arrival order.
    pub text: String,
}

impl PendingInput {
    /// Re-derives modifiers from both left and right variants of each key.
    pub fn refresh_modifiers(&mut self) {
        let keys = &self.keys_down;
        let down = |a: KeyCode, b: KeyCode| keys.contains(&a) || keys.contains(&b);
        self.modifiers = Modifiers {
            shift: down(KeyCode::ShiftLeft, KeyCode::ShiftRight),
            ctrl: down(KeyCode::ControlLeft, KeyCode::ControlRight),
            alt: down(KeyCode::AltLeft, KeyCode::AltRight),
            meta: down(KeyCode::SuperLeft, KeyCode::SuperRight),
        };
    }
}
