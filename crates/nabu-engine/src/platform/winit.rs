use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{bail, Context, Result};
use winit::application::ApplicationHandler;
use winit::dpi::{LogicalSize, PhysicalPosition};
use winit::event::{
    ElementState, Ime, MouseButton as WinitMouseButton, MouseScrollDelta, WindowEvent,
};
use winit::event_loop::{ActiveEventLoop, EventLoop};
use winit::keyboard::{KeyCode as WinitKeyCode, PhysicalKey};
use winit::platform::pump_events::{EventLoopExtPumpEvents, PumpStatus};
use winit::window::{CursorIcon, Window, WindowId};

use crate::coords::Vec2;
use crate::input::{
    button_index, ButtonAction, InputSink, KeyAction, KeyCode, MouseButton, NullSink,
    TRACKED_BUTTON_COUNT,
};

use super::{CursorShape, Platform};

/// Logical points per wheel "line" when the OS reports pixel deltas.
const POINTS_PER_LINE: f32 = 50.0;

/// Upper bound on startup pumps while waiting for the window to appear.
const STARTUP_PUMPS: u32 = 200;

/// `Platform` backed by a winit window.
///
/// The event loop is pumped (never run), so the frame driver keeps control of
/// the cadence. Clipboard access goes through `arboard`.
pub struct WinitPlatform {
    event_loop: EventLoop<()>,
    state: WindowState,
    window: Arc<Window>,
    clipboard: Option<arboard::Clipboard>,
    started: Instant,
}

struct WindowState {
    title: String,
    initial_size: LogicalSize<f64>,
    window: Option<Arc<Window>>,
    create_error: Option<winit::error::OsError>,
    focused: bool,
    cursor: Option<Vec2>,
    held: [bool; TRACKED_BUTTON_COUNT],
    close_requested: bool,
}

impl WinitPlatform {
    /// Opens the window. Failure here is fatal to startup.
    pub fn new(title: &str, initial_size: LogicalSize<f64>) -> Result<Self> {
        let mut event_loop = EventLoop::new().context("failed to create winit EventLoop")?;

        let mut state = WindowState {
            title: title.to_string(),
            initial_size,
            window: None,
            create_error: None,
            focused: false,
            cursor: None,
            held: [false; TRACKED_BUTTON_COUNT],
            close_requested: false,
        };

        // Windows can only be created once the loop reports `resumed`.
        let mut sink = NullSink;
        for _ in 0..STARTUP_PUMPS {
            let mut pump = Pump { state: &mut state, sink: &mut sink };
            if let PumpStatus::Exit(code) =
                event_loop.pump_app_events(Some(Duration::from_millis(10)), &mut pump)
            {
                bail!("event loop exited during startup (code {code})");
            }
            if state.window.is_some() || state.create_error.is_some() {
                break;
            }
        }

        if let Some(err) = state.create_error.take() {
            return Err(err).context("failed to create window");
        }
        let Some(window) = state.window.clone() else {
            bail!("platform never resumed; no window was created");
        };

        let clipboard = match arboard::Clipboard::new() {
            Ok(cb) => Some(cb),
            Err(e) => {
                log::warn!("clipboard unavailable: {e}");
                None
            }
        };

        let size = window.inner_size();
        log::info!(
            "window created: {}x{} px (scale {:.2})",
            size.width,
            size.height,
            window.scale_factor()
        );

        Ok(Self {
            event_loop,
            state,
            window,
            clipboard,
            started: Instant::now(),
        })
    }

    /// Window handle for surface creation.
    pub(crate) fn window(&self) -> Arc<Window> {
        self.window.clone()
    }
}

impl Platform for WinitPlatform {
    type Cursor = CursorIcon;

    fn size(&self) -> Vec2 {
        let logical: LogicalSize<f32> =
            self.window.inner_size().to_logical(self.window.scale_factor());
        Vec2::new(logical.width, logical.height)
    }

    fn framebuffer_size(&self) -> [u32; 2] {
        let size = self.window.inner_size();
        [size.width, size.height]
    }

    fn is_focused(&self) -> bool {
        self.state.focused
    }

    fn cursor_position(&self) -> Option<Vec2> {
        self.state.cursor
    }

    fn raw_button_state(&self, button: MouseButton) -> bool {
        button_index(button).is_some_and(|i| self.state.held[i])
    }

    fn poll_events(&mut self, sink: &mut dyn InputSink) {
        let mut pump = Pump { state: &mut self.state, sink };
        let status = self.event_loop.pump_app_events(Some(Duration::ZERO), &mut pump);
        if let PumpStatus::Exit(code) = status {
            log::info!("event loop exited (code {code})");
            self.state.close_requested = true;
        }
    }

    fn present(&mut self) {
        self.window.pre_present_notify();
    }

    fn should_stop(&self) -> bool {
        self.state.close_requested
    }

    fn now(&self) -> Duration {
        self.started.elapsed()
    }

    fn clipboard_text(&mut self) -> Option<String> {
        let cb = self.clipboard.as_mut()?;
        match cb.get_text() {
            Ok(text) => Some(text),
            Err(e) => {
                log::debug!("clipboard read failed: {e}");
                None
            }
        }
    }

    fn set_clipboard_text(&mut self, text: &str) {
        let Some(cb) = self.clipboard.as_mut() else { return };
        if let Err(e) = cb.set_text(text.to_owned()) {
            log::warn!("clipboard write failed: {e}");
        }
    }

    fn create_cursor(&mut self, shape: CursorShape) -> CursorIcon {
        match shape {
            CursorShape::Arrow => CursorIcon::Default,
            CursorShape::TextInput => CursorIcon::Text,
            CursorShape::ResizeAll => CursorIcon::Move,
            CursorShape::ResizeNS => CursorIcon::NsResize,
            CursorShape::ResizeEW => CursorIcon::EwResize,
            CursorShape::ResizeNESW => CursorIcon::NeswResize,
            CursorShape::ResizeNWSE => CursorIcon::NwseResize,
            CursorShape::Hand => CursorIcon::Pointer,
            CursorShape::NotAllowed => CursorIcon::NotAllowed,
        }
    }

    fn set_cursor(&mut self, cursor: Option<&CursorIcon>) {
        match cursor {
            Some(icon) => {
                self.window.set_cursor_visible(true);
                self.window.set_cursor(*icon);
            }
            None => self.window.set_cursor_visible(false),
        }
    }
}

/// Borrowed view handed to winit for the duration of one pump.
struct Pump<'a> {
    state: &'a mut WindowState,
    sink: &'a mut dyn InputSink,
}

impl ApplicationHandler for Pump<'_> {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.state.window.is_some() {
            return;
        }

        let attrs = Window::default_attributes()
            .with_title(self.state.title.clone())
            .with_inner_size(self.state.initial_size);

        match event_loop.create_window(attrs) {
            Ok(window) => {
                self.state.focused = window.has_focus();
                self.state.window = Some(Arc::new(window));
            }
            Err(e) => self.state.create_error = Some(e),
        }
    }

    fn window_event(
        &mut self,
        _event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        let Some(window) = self.state.window.clone() else { return };
        let sink = &mut *self.sink;

        match event {
            WindowEvent::CloseRequested => self.state.close_requested = true,

            WindowEvent::Focused(f) => {
                self.state.focused = f;
                if !f {
                    self.state.held = [false; TRACKED_BUTTON_COUNT];
                }
                sink.on_focus(f);
            }

            WindowEvent::CursorMoved { position, .. } => {
                let p = to_logical(&window, position);
                self.state.cursor = Some(p);
                sink.on_cursor(p.x, p.y);
            }

            WindowEvent::MouseInput { state, button, .. } => {
                let button = map_mouse_button(button);
                let action = match state {
                    ElementState::Pressed => ButtonAction::Press,
                    ElementState::Released => ButtonAction::Release,
                };
                if let Some(i) = button_index(button) {
                    self.state.held[i] = action == ButtonAction::Press;
                }
                sink.on_button(button, action);
            }

            WindowEvent::MouseWheel { delta, .. } => {
                let (dx, dy) = match delta {
                    MouseScrollDelta::LineDelta(x, y) => (x, y),
                    MouseScrollDelta::PixelDelta(p) => {
                        let p = to_logical(&window, p);
                        (p.x / POINTS_PER_LINE, p.y / POINTS_PER_LINE)
                    }
                };
                sink.on_scroll(dx, dy);
            }

            WindowEvent::KeyboardInput { event, .. } => {
                let action = match (event.state, event.repeat) {
                    (ElementState::Pressed, false) => KeyAction::Press,
                    (ElementState::Pressed, true) => KeyAction::Repeat,
                    (ElementState::Released, _) => KeyAction::Release,
                };
                sink.on_key(map_key(event.physical_key), action);

                if event.state == ElementState::Pressed {
                    if let Some(text) = event.text.as_ref() {
                        for ch in text.chars().filter(|c| !c.is_control()) {
                            sink.on_char(ch);
                        }
                    }
                }
            }

            WindowEvent::Ime(Ime::Commit(text)) => {
                for ch in text.chars().filter(|c| !c.is_control()) {
                    sink.on_char(ch);
                }
            }

            WindowEvent::Resized(size) => sink.on_resize(size.width, size.height),

            _ => {}
        }
    }
}

fn to_logical(window: &Window, pos: PhysicalPosition<f64>) -> Vec2 {
    let logical = pos.to_logical::<f64>(window.scale_factor());
    Vec2::new(logical.x as f32, logical.y as f32)
}

fn map_mouse_button(b: WinitMouseButton) -> MouseButton {
    match b {
        WinitMouseButton::Left => MouseButton::Left,
        WinitMouseButton::Right => MouseButton::Right,
        WinitMouseButton::Middle => MouseButton::Middle,
        WinitMouseButton::Back => MouseButton::Back,
        WinitMouseButton::Forward => MouseButton::Forward,
        WinitMouseButton::Other(v) => MouseButton::Other(v),
    }
}

fn map_key(pk: PhysicalKey) -> KeyCode {
    let PhysicalKey::Code(code) = pk else {
        // NativeKeyCode carries no stable numeric.
        return KeyCode::Unknown(0);
    };

    match code {
        WinitKeyCode::Escape => KeyCode::Escape,
        WinitKeyCode::Enter | WinitKeyCode::NumpadEnter => KeyCode::Enter,
        WinitKeyCode::Tab => KeyCode::Tab,
        WinitKeyCode::Backspace => KeyCode::Backspace,
        WinitKeyCode::Space => KeyCode::Space,

        WinitKeyCode::Insert => KeyCode::Insert,
        WinitKeyCode::Delete => KeyCode::Delete,
        WinitKeyCode::Home => KeyCode::Home,
        WinitKeyCode::End => KeyCode::End,
        WinitKeyCode::PageUp => KeyCode::PageUp,
        WinitKeyCode::PageDown => KeyCode::PageDown,

        WinitKeyCode::ArrowUp => KeyCode::ArrowUp,
        WinitKeyCode::ArrowDown => KeyCode::ArrowDown,
        WinitKeyCode::ArrowLeft => KeyCode::ArrowLeft,
        WinitKeyCode::ArrowRight => KeyCode::ArrowRight,

        WinitKeyCode::ShiftLeft => KeyCode::ShiftLeft,
        WinitKeyCode::ShiftRight => KeyCode::ShiftRight,
        WinitKeyCode::ControlLeft => KeyCode::ControlLeft,
        WinitKeyCode::ControlRight => KeyCode::ControlRight,
        WinitKeyCode::AltLeft => KeyCode::AltLeft,
        WinitKeyCode::AltRight => KeyCode::AltRight,
        WinitKeyCode::SuperLeft => KeyCode::SuperLeft,
        WinitKeyCode::SuperRight => KeyCode::SuperRight,

        WinitKeyCode::KeyA => KeyCode::A,
        WinitKeyCode::KeyB => KeyCode::B,
        WinitKeyCode::KeyC => KeyCode::C,
        WinitKeyCode::KeyD => KeyCode::D,
        WinitKeyCode::KeyE => KeyCode::E,
        WinitKeyCode::KeyF => KeyCode::F,
        WinitKeyCode::KeyG => KeyCode::G,
        WinitKeyCode::KeyH => KeyCode::H,
        WinitKeyCode::KeyI => KeyCode::I,
        WinitKeyCode::KeyJ => KeyCode::J,
        WinitKeyCode::KeyK => KeyCode::K,
        WinitKeyCode::KeyL => KeyCode::L,
        WinitKeyCode::KeyM => KeyCode::M,
        WinitKeyCode::KeyN => KeyCode::N,
        WinitKeyCode::KeyO => KeyCode::O,
        WinitKeyCode::KeyP => KeyCode::P,
        WinitKeyCode::KeyQ => KeyCode::Q,
        WinitKeyCode::KeyR => KeyCode::R,
        WinitKeyCode::KeyS => KeyCode::S,
        WinitKeyCode::KeyT => KeyCode::T,
        WinitKeyCode::KeyU => KeyCode::U,
        WinitKeyCode::KeyV => KeyCode::V,
        WinitKeyCode::KeyW => KeyCode::W,
        WinitKeyCode::KeyX => KeyCode::X,
        WinitKeyCode::KeyY => KeyCode::Y,
        WinitKeyCode::KeyZ => KeyCode::Z,

        WinitKeyCode::Digit0 => KeyCode::Digit0,
        WinitKeyCode::Digit1 => KeyCode::Digit1,
        WinitKeyCode::Digit2 => KeyCode::Digit2,
        WinitKeyCode::Digit3 => KeyCode::Digit3,
        WinitKeyCode::Digit4 => KeyCode::Digit4,
        WinitKeyCode::Digit5 => KeyCode::Digit5,
        WinitKeyCode::Digit6 => KeyCode::Digit6,
        WinitKeyCode::Digit7 => KeyCode::Digit7,
        WinitKeyCode::Digit8 => KeyCode::Digit8,
        WinitKeyCode::Digit9 => KeyCode::Digit9,

        WinitKeyCode::F1 => KeyCode::F1,
        WinitKeyCode::F2 => KeyCode::F2,
        WinitKeyCode::F3 => KeyCode::F3,
        WinitKeyCode::F4 => KeyCode::F4,
        WinitKeyCode::F5 => KeyCode::F5,
        WinitKeyCode::F6 => KeyCode::F6,
        WinitKeyCode::F7 => KeyCode::F7,
        WinitKeyCode::F8 => KeyCode::F8,
        WinitKeyCode::F9 => KeyCode::F9,
        WinitKeyCode::F10 => KeyCode::F10,
        WinitKeyCode::F11 => KeyCode::F11,
        WinitKeyCode::F12 => KeyCode::F12,

        other => KeyCode::Unknown(other as u32),
    }
}
