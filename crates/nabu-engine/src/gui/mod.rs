//! Bridge between frame snapshots and the egui immediate-mode library.

mod bridge;
mod keymap;

pub use bridge::{CursorMode, DrawData, GuiBridge, GuiConfig, GuiOutput};
pub use keymap::KeyMapping;
