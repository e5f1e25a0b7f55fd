//! Nabu engine crate.
//!
//! Frame-synchronization core between a winit window, the egui
//! immediate-mode GUI and a wgpu renderer: per-frame input snapshots, frame
//! pacing, and the tick loop that ties them together.

pub mod coords;
pub mod core;
pub mod device;
pub mod frame;
pub mod gui;
pub mod input;
pub mod logging;
pub mod platform;
pub mod render;
pub mod time;
pub mod window;

pub use egui;
