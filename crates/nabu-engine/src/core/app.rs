use super::ctx::FrameCtx;

/// Control directive returned by app callbacks.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum AppControl {
    Continue,
    Exit,
}

/// Application contract implemented by higher layers.
pub trait App {
    /// Called once per tick between the GUI pass begin and end.
    ///
    /// Only immediate-mode calls on `ctx.gui` belong here; the callback must
    /// not block.
    fn on_frame(&mut self, ctx: &mut FrameCtx<'_>) -> AppControl;
}

impl<F> App for F
where
    F: FnMut(&mut FrameCtx<'_>) -> AppControl,
{
    fn on_frame(&mut self, ctx: &mut FrameCtx<'_>) -> AppControl {
        self(ctx)
    }
}
