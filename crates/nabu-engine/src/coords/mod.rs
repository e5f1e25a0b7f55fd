//! Coordinate types shared by the input, GUI and render layers.
//!
//! Canonical CPU space:
//! - Logical points (what the window system calls "screen coordinates")
//! - Origin top-left
//! - +X right, +Y down
//!
//! Physical pixels only appear at the framebuffer boundary (`ScissorRect`).

mod rect;
mod vec2;

pub use rect::ScissorRect;
pub use vec2::Vec2;
