use std::fmt;

/// Platform-native key code.
///
/// The platform adapter maps its own scancodes/keycodes into these variants.
/// Left and right modifier keys are distinct: modifier state is re-derived from
/// both variants on every key event.
///
/// For unsupported keys, `KeyCode::Unknown(u32)` carries a stable platform code.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum KeyCode {
    // Common control keys
    Escape,
    Enter,
    Tab,
    Backspace,
    Space,

    Insert,
    Delete,
    Home,
    End,
    PageUp,
    PageDown,

    ArrowUp,
    ArrowDown,
    ArrowLeft,
    ArrowRight,

    // Modifiers, one per physical side
    ShiftLeft,
    ShiftRight,
    ControlLeft,
    ControlRight,
    AltLeft,
    AltRight,
    SuperLeft,
    SuperRight,

    // Letters
    A, B, C, D, E, F, G, H, I, J, K, L, M,
    N, O, P, Q, R, S, T, U, V, W, X, Y, Z,

    // Digits
    Digit0, Digit1, Digit2, Digit3, Digit4,
    Digit5, Digit6, Digit7, Digit8, Digit9,

    // Function keys
    F1, F2, F3, F4, F5, F6,
    F7, F8, F9, F10, F11, F12,

    /// Platform-dependent key not represented here.
    Unknown(u32),
}

impl fmt::Display for KeyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum KeyAction {
    Press,
    Release,
    /// Auto-repeat while held; forwarded as a press.
    Repeat,
}

/// Mouse button identifier.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
    Back,
    Forward,
    Other(u16),
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum ButtonAction {
    Press,
    Release,
}

/// Number of pointer buttons tracked per frame.
pub const TRACKED_BUTTON_COUNT: usize = 3;

/// Tracked buttons in snapshot index order (primary, secondary, tertiary).
pub const TRACKED_BUTTONS: [MouseButton; TRACKED_BUTTON_COUNT] =
    [MouseButton::Left, MouseButton::Right, MouseButton::Middle];

/// Inverse of `TRACKED_BUTTONS`. Untracked buttons map to `None`.
#[inline]
pub fn button_index(button: MouseButton) -> Option<usize> {
    match button {
        MouseButton::Left => Some(0),
        MouseButton::Right => Some(1),
        MouseButton::Middle => Some(2),
        _ => None,
    }
}

/// Modifier keys state.
///
/// Stored as booleans rather than bitflags to keep it explicit and stable.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    /// Super / Command / Windows key.
    pub meta: bool,
}

impl Modifiers {
    /// The platform's "command" modifier: Cmd on macOS, Ctrl elsewhere.
    pub fn command(&self) -> bool {
        if cfg!(target_os = "macos") { self.meta } else { self.ctrl }
    }
}

/// One key transition queued for the GUI library.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct KeyInput {
    pub key: KeyCode,
    pub pressed: bool,
    pub repeat: bool,
    /// Modifier state after this event was applied.
    pub modifiers: Modifiers,
}
