use crate::frame::FrameSnapshot;
use crate::gui::CursorMode;
use crate::time::FrameRate;

/// Per-frame context passed to `core::App::on_frame`.
pub struct FrameCtx<'a> {
    /// egui context with the frame's pass already begun.
    pub gui: &'a egui::Context,
    pub snapshot: &'a FrameSnapshot,
    pub frame_rate: FrameRate,
    /// Whether the feedback controller steers the tick interval.
    pub pacing_controlled: bool,
    pub cursor_mode: CursorMode,
    pub runtime: &'a mut RuntimeCtx,
}

impl FrameCtx<'_> {
    /// Seconds since the previous frame.
    pub fn dt(&self) -> f32 {
        self.snapshot.delta_time
    }
}

/// Runtime context passed to the application.
///
/// Commands are buffered and applied after the current callback returns, in
/// the order they were issued.
#[derive(Debug, Default)]
pub struct RuntimeCtx {
    commands: Vec<Command>,
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub(crate) enum Command {
    SetFrameRate(FrameRate),
    SetCursorMode(CursorMode),
    SetPacingControl(bool),
    Exit,
}

impl RuntimeCtx {
    pub fn set_frame_rate(&mut self, rate: FrameRate) {
        self.commands.push(Command::SetFrameRate(rate));
    }

    pub fn set_cursor_mode(&mut self, mode: CursorMode) {
        self.commands.push(Command::SetCursorMode(mode));
    }

    /// Turns the PID frame-rate controller on or off.
    pub fn set_pacing_control(&mut self, enabled: bool) {
        self.commands.push(Command::SetPacingControl(enabled));
    }

    /// Stops the loop once the current tick has been presented.
    pub fn exit(&mut self) {
        self.commands.push(Command::Exit);
    }

    pub fn exit_requested(&self) -> bool {
        self.commands.contains(&Command::Exit)
    }

    pub(crate) fn drain(&mut self) -> std::vec::Drain<'_, Command> {
        self.commands.drain(..)
    }
}
