//! Render submission.
//!
//! `RenderBackend` is the seam the frame driver submits through;
//! `GuiRenderer` is the wgpu implementation for egui draw data.

mod backend;
mod batch;
mod gui_renderer;

pub use backend::{RenderBackend, RenderError};
pub use gui_renderer::GuiRenderer;
