//! Runtime entry point.
//!
//! Wires the winit platform, the wgpu renderer and the egui bridge into a
//! `FrameDriver` and runs it.

mod runtime;

pub use runtime::{Runtime, RuntimeConfig};
pub use winit::dpi::LogicalSize;
