use thiserror::Error;

use crate::coords::Vec2;
use crate::device::SurfaceErrorAction;
use crate::gui::DrawData;

/// Per-frame render failure. Every variant except a fatal surface error only
/// costs the current frame.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("surface acquisition failed ({0})")]
    Surface(SurfaceErrorAction),

    #[error("draw data needs a {needed}-byte buffer; device limit is {limit}")]
    BufferTooLarge { needed: u64, limit: u64 },

    #[error("framebuffer has zero area")]
    ZeroFramebuffer,
}

impl RenderError {
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Surface(SurfaceErrorAction::Fatal))
    }
}

/// Consumer of the GUI's finished draw-command list.
pub trait RenderBackend {
    /// Draws one frame.
    ///
    /// `display` is in logical points, `framebuffer` in physical pixels; their
    /// ratio scales every clip rect.
    fn render(
        &mut self,
        display: Vec2,
        framebuffer: [u32; 2],
        draw: &DrawData,
    ) -> Result<(), RenderError>;

    /// Presents the last successfully rendered frame. No-op if there is none.
    fn present(&mut self);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_surface_oom_is_fatal() {
        assert!(RenderError::Surface(SurfaceErrorAction::Fatal).is_fatal());
        assert!(!RenderError::Surface(SurfaceErrorAction::SkipFrame).is_fatal());
        assert!(!RenderError::Surface(SurfaceErrorAction::Reconfigured).is_fatal());
        assert!(!RenderError::BufferTooLarge { needed: 2, limit: 1 }.is_fatal());
        assert!(!RenderError::ZeroFramebuffer.is_fatal());
    }

    #[test]
    fn messages_name_the_cause() {
        let e = RenderError::BufferTooLarge { needed: 300, limit: 256 };
        assert_eq!(e.to_string(), "draw data needs a 300-byte buffer; device limit is 256");
        assert_eq!(
            RenderError::Surface(SurfaceErrorAction::SkipFrame).to_string(),
            "surface acquisition failed (frame skipped)"
        );
    }
}
